pub mod awaiter;
pub mod error;
pub mod sheet_json;
