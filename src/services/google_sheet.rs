use std::future::IntoFuture;
use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::config::CONFIG;
use crate::services::transport::{ReqwestTransport, Transport};
use crate::services::web_request::WebRequest;
use crate::utils::error::{AppError, AppResult};
use crate::utils::sheet_json::convert_game_info;

// 取消的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CancelMode {
    // 请求完成后再检查取消
    CheckAfter,
    // 取消时立即中止请求
    AbortInFlight,
}

// Google表格(GAS)服务，获取主数据
#[derive(Clone)]
pub struct GoogleSheetService {
    transport: Arc<dyn Transport>,
}

impl GoogleSheetService {
    // 使用全局配置创建服务
    pub fn new() -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new(&CONFIG)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    // 构建请求URL: <url>?sheetName=<sheet_name>
    pub fn build_request_url(url: &str, sheet_name: &str) -> AppResult<String> {
        let mut request_url =
            Url::parse(url).map_err(|e| AppError::InvalidUrl(format!("{url}: {e}")))?;
        request_url
            .query_pairs_mut()
            .append_pair("sheetName", sheet_name);
        Ok(request_url.into())
    }

    async fn send(
        &self,
        url: &str,
        sheet_name: &str,
        token: &CancellationToken,
        mode: CancelMode,
    ) -> AppResult<WebRequest> {
        let request = WebRequest::get(Self::build_request_url(url, sheet_name)?);
        let operation = request.send_web_request(Arc::clone(&self.transport));

        match mode {
            CancelMode::CheckAfter => operation.await,
            CancelMode::AbortInFlight => {
                tokio::select! {
                    _ = operation.into_future() => {}
                    _ = token.cancelled() => request.abort(),
                }
            }
        }

        if token.is_cancelled() {
            request.abort();
            log::debug!("获取表格已取消: {}", sheet_name);
            return Err(AppError::Cancelled);
        }

        Ok(request)
    }

    // 从表格获取游戏信息并转换为目标类型，网络错误时返回默认值
    pub async fn get_game_info<T>(
        &self,
        url: &str,
        sheet_name: &str,
        token: &CancellationToken,
    ) -> AppResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let request = self
            .send(url, sheet_name, token, CancelMode::CheckAfter)
            .await?;

        if request.result().is_error() {
            log::warn!(
                "从Google表格获取数据失败: {} ({})",
                sheet_name,
                request.error().unwrap_or_default()
            );
            return Ok(T::default());
        }

        let json = request.text().unwrap_or_default();
        convert_game_info(&json)
    }

    // 从表格获取原始JSON字符串，网络错误时返回 None
    pub async fn get_game_info_text(
        &self,
        url: &str,
        sheet_name: &str,
        token: &CancellationToken,
    ) -> AppResult<Option<String>> {
        let request = self
            .send(url, sheet_name, token, CancelMode::AbortInFlight)
            .await?;

        if request.result().is_error() {
            // 被中止的请求视为取消，而不是网络错误
            if request.is_aborted() {
                log::debug!("请求被中止: {}", sheet_name);
                return Err(AppError::Cancelled);
            }

            log::error!(
                "从Google表格获取数据失败: {}",
                request.error().unwrap_or_default()
            );
            return Ok(None);
        }

        let json = request.text().unwrap_or_default();
        log::info!("数据获取成功: {} ({} 字节)", sheet_name, json.len());
        log::debug!("数据内容: {}", json);
        Ok(Some(json))
    }

    // 使用配置中的 SHEET_BASE_URL
    pub async fn get_master_data<T>(&self, sheet_name: &str, token: &CancellationToken) -> AppResult<T>
    where
        T: DeserializeOwned + Default,
    {
        self.get_game_info(&CONFIG.base_url, sheet_name, token).await
    }

    pub async fn get_master_data_text(
        &self,
        sheet_name: &str,
        token: &CancellationToken,
    ) -> AppResult<Option<String>> {
        self.get_game_info_text(&CONFIG.base_url, sheet_name, token)
            .await
    }
}

impl Default for GoogleSheetService {
    fn default() -> Self {
        Self::new()
    }
}
