//! 从表格脚本网关获取主数据，并将参数化的 `gameInfo` 行转换为只含值的形式。

pub mod config;
pub mod models;
pub mod services;
pub mod utils;

pub use services::GoogleSheetService;
pub use utils::error::{AppError, AppResult};
