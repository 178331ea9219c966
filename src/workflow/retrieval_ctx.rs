//! 采集上下文
//!
//! 封装"我正在下载哪个月份的哪类报表"这一信息，主要用于日志前缀

use std::fmt::Display;

use crate::models::{DocumentCategory, RetrievalRequest};

#[derive(Debug, Clone)]
pub struct RetrievalCtx {
    pub category: DocumentCategory,
    pub month: String,
    pub year: String,
}

impl RetrievalCtx {
    pub fn new(category: DocumentCategory, request: &RetrievalRequest) -> Self {
        Self {
            category,
            month: request.month().to_string(),
            year: request.year().to_string(),
        }
    }
}

impl Display for RetrievalCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}/{}]", self.category, self.month, self.year)
    }
}
