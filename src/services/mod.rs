pub mod google_sheet;
pub mod transport;
pub mod web_request;

// 重新导出主要的结构体，以便可以直接从 services 模块导入
pub use google_sheet::GoogleSheetService;
pub use transport::{ReqwestTransport, Transport, TransportFuture};
pub use web_request::{AsyncOperation, WebRequest};
