pub mod category;
pub mod request;

pub use category::DocumentCategory;
pub use request::{RetrievalRequest, Timings, REPORT_EXTENSION};
