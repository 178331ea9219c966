use std::path::PathBuf;

use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::browser::USER_AGENT;

/// 启动参数
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
}

/// 启动无头浏览器，返回浏览器和事件处理任务
pub async fn launch_headless_browser(options: &LaunchOptions) -> Result<(Browser, JoinHandle<()>)> {
    info!("🚀 启动浏览器 (headless={})...", options.headless);

    let mut builder = BrowserConfig::builder();
    builder = if options.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(path) = &options.chrome_executable {
        debug!("浏览器路径: {}", path.display());
        builder = builder.chrome_executable(path);
    }

    let config = builder
        .args(vec![
            "--no-sandbox".to_string(),             // 容器中运行需要
            "--disable-gpu".to_string(),            // 无头模式禁用 GPU
            "--disable-dev-shm-usage".to_string(),  // 防止共享内存不足
            format!("--user-agent={}", USER_AGENT),
        ])
        .build()
        .map_err(|e| {
            error!("配置浏览器失败: {}", e);
            anyhow::anyhow!("配置浏览器失败: {}", e)
        })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        anyhow::anyhow!("启动浏览器失败: {}", e)
    })?;
    debug!("浏览器启动成功");

    // 在后台处理浏览器事件
    let handle = tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    Ok((browser, handle))
}
