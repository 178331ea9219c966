//! 运行协调器 - 编排层
//!
//! ## 职责
//!
//! 按类别顺序串行执行采集流程，汇总文件路径，并在整次运行上施加总截止时间。
//!
//! - 任一类别失败立即终止整次运行，不重试，不返回部分结果
//! - 失败时删除本次运行已经生成的文件
//! - 两个类别绝不并发，下载对账依赖这一点

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::{AppResult, RetrievalOutcome};
use crate::infrastructure::{BrowserControl, ExecContext};
use crate::models::{DocumentCategory, RetrievalRequest};
use crate::workflow::{RetrievalFlow, RunState};

pub struct RunCoordinator<'a> {
    request: &'a RetrievalRequest,
    flow: RetrievalFlow<'a>,
}

impl<'a> RunCoordinator<'a> {
    pub fn new(request: &'a RetrievalRequest, portal_url: impl Into<String>) -> Self {
        Self {
            request,
            flow: RetrievalFlow::new(request, portal_url),
        }
    }

    pub fn state(&self) -> &RunState {
        self.flow.state()
    }

    pub fn history(&self) -> &[RunState] {
        self.flow.history()
    }

    /// 执行整次运行
    pub async fn run(&mut self, browser: &dyn BrowserControl) -> RetrievalOutcome {
        let ctx = ExecContext::with_timeout(self.request.timings().overall_deadline);
        let mut produced: Vec<PathBuf> = Vec::with_capacity(DocumentCategory::ALL.len());

        for category in DocumentCategory::ALL {
            match self.run_category(browser, &ctx, category).await {
                Ok(path) => produced.push(path),
                Err(e) => {
                    self.flow.transition(RunState::Failed(e.to_string()));
                    discard(&produced).await;
                    return Err(e);
                }
            }
        }

        self.flow.transition(RunState::Done);
        info!("✅ 全部 {} 个报表下载完成", produced.len());
        Ok(produced)
    }

    async fn run_category(
        &mut self,
        browser: &dyn BrowserControl,
        ctx: &ExecContext,
        category: DocumentCategory,
    ) -> AppResult<PathBuf> {
        self.flow.navigate_and_select(browser, ctx, category).await?;
        self.flow.export_and_download(browser, ctx, category).await
    }
}

/// 删除本次运行已生成的文件
async fn discard(produced: &[PathBuf]) {
    for path in produced {
        match tokio::fs::remove_file(path).await {
            Ok(()) => warn!("已删除不完整运行的文件: {}", path.display()),
            Err(e) => warn!("删除文件 {} 失败: {}", path.display(), e),
        }
    }
}
