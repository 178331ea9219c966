//! 应用入口 - 编排层
//!
//! 负责配置校验、输出目录准备和浏览器会话的生命周期。
//! 配置有误时在启动浏览器之前就返回错误。

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::{AppResult, RetrievalError, RetrievalOutcome};
use crate::models::RetrievalRequest;
use crate::orchestrator::RunCoordinator;
use crate::utils::logging::{log_outcome, log_startup};

/// 应用主结构
#[derive(Debug)]
pub struct App {
    config: Config,
    request: RetrievalRequest,
}

impl App {
    /// 初始化应用：校验年月、创建输出目录
    pub fn initialize(config: Config) -> AppResult<Self> {
        let output_directory = config.prepare_output_folder()?;
        let request = config.to_request(&output_directory)?;
        Ok(Self { config, request })
    }

    pub fn request(&self) -> &RetrievalRequest {
        &self.request
    }

    /// 运行一次完整采集
    ///
    /// 会话在任何退出路径上都会被关闭。
    pub async fn run(&self) -> RetrievalOutcome {
        log_startup(&self.request);

        let session = BrowserSession::open(&self.config)
            .await
            .map_err(RetrievalError::Session)?;

        let mut coordinator = RunCoordinator::new(&self.request, self.config.portal_url.clone());
        let outcome = coordinator.run(session.page()).await;
        session.close().await;

        log_outcome(&outcome, coordinator.history());
        outcome
    }
}
