pub mod request;
pub mod sheet;

pub use request::*;
pub use sheet::*;
