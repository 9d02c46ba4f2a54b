use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("请求已取消")]
    Cancelled,

    #[error("缺少必需的数组字段: gameInfo")]
    MissingGameInfo,

    #[error("无效的表格文档: {0}")]
    InvalidDocument(String),

    #[error("类型转换错误: {0}")]
    TypeConversion(serde_json::Error),

    #[error("Serde JSON错误: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("无效的URL: {0}")]
    InvalidUrl(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

impl AppError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}

pub type AppResult<T> = Result<T, AppError>;
