//! Chrome 页面 - 基础设施层
//!
//! `BrowserControl` 的真实实现。持有唯一的 page 资源，
//! 表单赋值和存在性查询通过执行 JS 完成，点击走 CDP 的鼠标事件。

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::Page;
use tracing::debug;

use crate::infrastructure::browser_control::{BrowserControl, Selector};

pub struct ChromePage {
    page: Page,
}

impl ChromePage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 并取回布尔结果
    async fn eval_bool(&self, js_code: String) -> Result<bool> {
        let result = self.page.evaluate(js_code).await?;
        let value: bool = result.into_value()?;
        Ok(value)
    }
}

#[async_trait]
impl BrowserControl for ChromePage {
    async fn navigate(&self, url: &str) -> Result<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .with_context(|| format!("导航到 {} 失败", url))?;
        Ok(())
    }

    async fn set_field_value(&self, selector: Selector, value: &str) -> Result<()> {
        debug!("设置 {} = {}", selector, value);
        let js_code = format!(
            r#"
            (() => {{
                const el = {lookup};
                if (!el) return false;
                el.value = {value};
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return true;
            }})()
            "#,
            lookup = selector.js_lookup()?,
            value = serde_json::to_string(value)?,
        );

        if !self.eval_bool(js_code).await? {
            return Err(anyhow!("未找到元素: {}", selector));
        }
        Ok(())
    }

    async fn click(&self, selector: Selector) -> Result<()> {
        debug!("点击 {}", selector);
        let element = match selector {
            Selector::Css(css) => self.page.find_element(css).await,
            Selector::XPath(xpath) => self.page.find_xpath(xpath).await,
        }
        .with_context(|| format!("未找到元素: {}", selector))?;

        element
            .click()
            .await
            .with_context(|| format!("点击 {} 失败", selector))?;
        Ok(())
    }

    async fn query_exists(&self, selector: Selector) -> Result<bool> {
        let js_code = format!("({}) !== null", selector.js_lookup()?);
        self.eval_bool(js_code).await
    }

    async fn configure_download_destination(&self, directory: &Path) -> Result<()> {
        debug!("设置下载目录: {}", directory.display());
        let params = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::AllowAndName)
            .download_path(directory.to_string_lossy().to_string())
            .events_enabled(true)
            .build()
            .map_err(|e| anyhow!("下载行为参数无效: {}", e))?;

        self.page
            .execute(params)
            .await
            .context("设置下载目录失败")?;
        Ok(())
    }
}
