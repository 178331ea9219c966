//! 浏览器控制接口 - 基础设施层
//!
//! 工作流只通过这个窄接口操作页面，真实实现见 `ChromePage`，测试中替换为脚本化的假实现。

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

/// 页面元素选择器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// CSS 选择器
    Css(&'static str),
    /// XPath 表达式
    XPath(&'static str),
}

impl Selector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Selector::Css(s) | Selector::XPath(s) => *s,
        }
    }

    /// 生成在页面中定位该元素的 JS 表达式（找不到时为 null）
    pub fn js_lookup(&self) -> Result<String> {
        let quoted = serde_json::to_string(self.as_str())?;
        Ok(match self {
            Selector::Css(_) => format!("document.querySelector({})", quoted),
            Selector::XPath(_) => format!(
                "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
                quoted
            ),
        })
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Css(s) => write!(f, "css:{}", s),
            Selector::XPath(s) => write!(f, "xpath:{}", s),
        }
    }
}

/// 浏览器控制能力
///
/// 所有方法都不自带超时，由调用方通过 `ExecContext` 约束。
#[async_trait]
pub trait BrowserControl: Send + Sync {
    /// 导航到指定地址
    async fn navigate(&self, url: &str) -> Result<()>;

    /// 设置表单字段的值
    async fn set_field_value(&self, selector: Selector, value: &str) -> Result<()>;

    /// 点击元素
    async fn click(&self, selector: Selector) -> Result<()>;

    /// 查询元素是否存在
    async fn query_exists(&self, selector: Selector) -> Result<bool>;

    /// 设置浏览器下载目录
    async fn configure_download_destination(&self, directory: &Path) -> Result<()>;

    /// 固定等待
    async fn sleep(&self, duration: Duration) -> Result<()> {
        tokio::time::sleep(duration).await;
        Ok(())
    }
}
