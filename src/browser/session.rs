//! 浏览器会话
//!
//! 一次运行只有一个会话，由协调层独占持有，运行结束时无论成败都要关闭。

use std::time::Duration;

use anyhow::Result;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::Browser;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::browser::{connect_to_browser, launch_headless_browser, LaunchOptions, USER_AGENT};
use crate::config::Config;
use crate::infrastructure::ChromePage;

pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: ChromePage,
    /// 浏览器由本进程启动（而不是连接到已有实例）
    owned: bool,
}

impl BrowserSession {
    /// 启动或连接浏览器并打开一个空白页
    pub async fn open(config: &Config) -> Result<Self> {
        let (browser, handler, owned) = match config.browser_debug_port {
            Some(port) => {
                let (browser, handler) = connect_to_browser(port).await?;
                (browser, handler, false)
            }
            None => {
                let options = LaunchOptions {
                    headless: config.headless,
                    chrome_executable: config.chrome_executable.clone(),
                };
                let (browser, handler) = launch_headless_browser(&options).await?;
                (browser, handler, true)
            }
        };

        // 等待浏览器状态同步
        sleep(Duration::from_millis(300)).await;

        let page = browser.new_page("about:blank").await?;
        page.execute(SetUserAgentOverrideParams::new(USER_AGENT.to_string()))
            .await?;
        debug!("空白页已创建");

        Ok(Self {
            browser,
            handler,
            page: ChromePage::new(page),
            owned,
        })
    }

    pub fn page(&self) -> &ChromePage {
        &self.page
    }

    /// 关闭会话
    pub async fn close(mut self) {
        if self.owned {
            if let Err(e) = self.browser.close().await {
                warn!("关闭浏览器失败: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                debug!("等待浏览器进程退出失败: {}", e);
            }
        } else if let Err(e) = self.page.page().clone().close().await {
            warn!("关闭页面失败: {}", e);
        }
        self.handler.abort();
        info!("浏览器会话已关闭");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
