//! 测试用的假门户
//!
//! 按脚本模拟门户页面：记录所有操作，导出后按类别决定是否显示错误提示，
//! 点击下载链接时往下载目录写一个随机名字的文件。

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use mprr_collector::services::ERROR_BANNER;
use mprr_collector::workflow::portal;
use mprr_collector::{BrowserControl, DocumentCategory, Selector, Timings};

#[derive(Default)]
pub struct FakePortal {
    /// 没有数据的类别
    pub unavailable: HashSet<DocumentCategory>,
    /// 导航耗时
    pub navigate_delay: Option<Duration>,
    /// 点击该选择器时报错
    pub failing_click: Option<Selector>,
    /// 这些类别点击下载后不写文件
    pub lost_downloads: HashSet<DocumentCategory>,
    /// 查询错误提示时报错
    pub failing_query: bool,

    pub calls: Mutex<Vec<String>>,
    pub download_dir: Mutex<Option<PathBuf>>,
    pub current_report: Mutex<Option<DocumentCategory>>,
    pub exported: Mutex<bool>,
    pub downloads: Mutex<usize>,
}

impl FakePortal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn download_count(&self) -> usize {
        *self.downloads.lock().unwrap()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn download_is_lost(&self) -> bool {
        self.current_report
            .lock()
            .unwrap()
            .is_some_and(|c| self.lost_downloads.contains(&c))
    }
}

/// 报表类型下拉框的选项值对应的类别
pub fn category_for(selection_id: &str) -> Option<DocumentCategory> {
    DocumentCategory::ALL
        .into_iter()
        .find(|c| c.selection_id() == selection_id)
}

#[async_trait]
impl BrowserControl for FakePortal {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.record(format!("navigate {}", url));
        if let Some(delay) = self.navigate_delay {
            tokio::time::sleep(delay).await;
        }
        *self.current_report.lock().unwrap() = None;
        *self.exported.lock().unwrap() = false;
        Ok(())
    }

    async fn set_field_value(&self, selector: Selector, value: &str) -> Result<()> {
        self.record(format!("set {} {}", selector.as_str(), value));
        if selector == portal::REPORT_TYPE_FIELD {
            let category = category_for(value)
                .ok_or_else(|| anyhow!("未知的报表类型: {}", value))?;
            *self.current_report.lock().unwrap() = Some(category);
        }
        Ok(())
    }

    async fn click(&self, selector: Selector) -> Result<()> {
        self.record(format!("click {}", selector.as_str()));
        if self.failing_click == Some(selector) {
            return Err(anyhow!("未找到元素: {}", selector));
        }

        if selector == portal::EMIT_WORKSHEET_BUTTON {
            *self.exported.lock().unwrap() = true;
        } else if selector == portal::DOWNLOAD_ANCHOR && !self.download_is_lost() {
            let dir = self
                .download_dir
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| anyhow!("下载目录未设置"))?;
            let mut downloads = self.downloads.lock().unwrap();
            *downloads += 1;
            std::fs::write(dir.join(format!("{:08x}-download", *downloads)), b"PK\x03\x04")?;
        }
        Ok(())
    }

    async fn query_exists(&self, selector: Selector) -> Result<bool> {
        if self.failing_query {
            return Err(anyhow!("Runtime.evaluate 失败"));
        }
        if selector != ERROR_BANNER {
            return Ok(true);
        }
        let exported = *self.exported.lock().unwrap();
        let current = *self.current_report.lock().unwrap();
        Ok(exported && current.is_some_and(|c| self.unavailable.contains(&c)))
    }

    async fn configure_download_destination(&self, directory: &Path) -> Result<()> {
        self.record(format!("download_dir {}", directory.display()));
        *self.download_dir.lock().unwrap() = Some(directory.to_path_buf());
        Ok(())
    }
}

/// 测试用的极短等待
pub fn fast_timings() -> Timings {
    Timings::uniform(Duration::from_millis(2), Duration::from_secs(10))
}

/// 目录中的文件名（排序后）
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
