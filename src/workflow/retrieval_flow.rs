//! 报表采集流程 - 流程层
//!
//! 核心职责：定义"一类报表"的完整采集流程
//!
//! 流程顺序：
//! 1. 打开门户 → 切到薪酬页签 → 设置下载目录
//! 2. 选择月份 → 年份 → 报表类型
//! 3. 点击生成 → 探测是否有数据
//! 4. 记录下载目录快照 → 点击下载 → 等待写盘 → 对账重命名
//!
//! 页面不提供任何完成信号，每个操作之后都是固定等待（见 `Timings`）。

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{AppResult, RetrievalError};
use crate::infrastructure::{BrowserControl, ExecContext, StepError};
use crate::models::{DocumentCategory, RetrievalRequest};
use crate::services::{Availability, AvailabilityProber, DownloadReconciler};
use crate::workflow::portal;
use crate::workflow::retrieval_ctx::RetrievalCtx;
use crate::workflow::run_state::RunState;

/// 报表采集流程
///
/// - 不持有浏览器，每次调用由协调器传入
/// - 记录状态迁移历史
pub struct RetrievalFlow<'a> {
    request: &'a RetrievalRequest,
    portal_url: String,
    prober: AvailabilityProber,
    reconciler: DownloadReconciler,
    history: Vec<RunState>,
}

impl<'a> RetrievalFlow<'a> {
    pub fn new(request: &'a RetrievalRequest, portal_url: impl Into<String>) -> Self {
        let timings = request.timings();
        Self {
            request,
            portal_url: portal_url.into(),
            prober: AvailabilityProber::new(
                timings.probe_settle,
                timings.probe_timeout,
                timings.probe_poll_interval,
            ),
            reconciler: DownloadReconciler::new(timings.recency_window),
            history: vec![RunState::Init],
        }
    }

    pub fn state(&self) -> &RunState {
        self.history.last().unwrap_or(&RunState::Init)
    }

    pub fn history(&self) -> &[RunState] {
        &self.history
    }

    pub(crate) fn transition(&mut self, next: RunState) {
        debug!("状态迁移: {} -> {}", self.state(), next);
        self.history.push(next);
    }

    /// 打开门户并完成月份、年份、报表类型的选择
    pub async fn navigate_and_select(
        &mut self,
        browser: &dyn BrowserControl,
        ctx: &ExecContext,
        category: DocumentCategory,
    ) -> AppResult<()> {
        let rctx = RetrievalCtx::new(category, self.request);
        let delay = self.request.timings().inter_step_delay;

        self.transition(RunState::Navigating(category));
        info!("{} 🌐 正在打开门户...", rctx);
        step(category, "navigate", ctx.run(browser.navigate(&self.portal_url)).await)?;
        pause(browser, ctx, category, "navigate", delay).await?;
        step(category, "open_reports_tab", ctx.run(browser.click(portal::REPORTS_TAB)).await)?;
        pause(browser, ctx, category, "open_reports_tab", delay).await?;
        step(
            category,
            "configure_download",
            ctx.run(browser.configure_download_destination(self.request.output_directory()))
                .await,
        )?;
        info!("{} ✓ 门户已打开", rctx);

        self.transition(RunState::Selecting(category));
        info!("{} 选择月份 {}...", rctx, self.request.month());
        step(
            category,
            "select_month",
            ctx.run(browser.set_field_value(portal::MONTH_FIELD, self.request.month()))
                .await,
        )?;
        pause(browser, ctx, category, "select_month", delay).await?;

        info!("{} 选择年份 {}...", rctx, self.request.year());
        step(
            category,
            "select_year",
            ctx.run(browser.set_field_value(portal::YEAR_FIELD, self.request.year()))
                .await,
        )?;
        pause(browser, ctx, category, "select_year", delay).await?;

        // 报表类型要设置两次，门户的联动脚本偶尔会吞掉第一次变更
        info!("{} 选择报表类型 {}...", rctx, category.selection_id());
        for _ in 0..2 {
            step(
                category,
                "select_report",
                ctx.run(browser.set_field_value(portal::REPORT_TYPE_FIELD, category.selection_id()))
                    .await,
            )?;
            pause(browser, ctx, category, "select_report", delay).await?;
        }
        info!("{} ✓ 选择完成", rctx);

        Ok(())
    }

    /// 生成表格并下载，返回规范文件路径
    pub async fn export_and_download(
        &mut self,
        browser: &dyn BrowserControl,
        ctx: &ExecContext,
        category: DocumentCategory,
    ) -> AppResult<PathBuf> {
        let rctx = RetrievalCtx::new(category, self.request);
        let timings = *self.request.timings();
        let export_ctx = ctx.child(timings.export_timeout);

        self.transition(RunState::Exporting(category));
        info!("{} 📄 点击生成表格...", rctx);
        step(
            category,
            "click_export",
            export_ctx.run(browser.click(portal::EMIT_WORKSHEET_BUTTON)).await,
        )?;
        pause(browser, &export_ctx, category, "click_export", timings.post_click_settle).await?;

        self.transition(RunState::Probing(category));
        info!("{} 🔍 检查是否有数据...", rctx);
        let availability = step(
            category,
            "probe",
            self.prober.probe(browser, &export_ctx).await,
        )?;
        match availability {
            Availability::Available => info!("{} ✓ 有数据", rctx),
            Availability::Unavailable => {
                warn!("{} ⚠️ 门户没有该月份的报表", rctx);
                return Err(RetrievalError::DataUnavailable {
                    category,
                    month: self.request.month().to_string(),
                    year: self.request.year().to_string(),
                });
            }
            Availability::Unknown(reason) => {
                // 无法判断时继续下载，没有文件会在对账时报 NoDownloadFound
                warn!("{} ⚠️ 无法确认是否有数据 ({})，继续下载", rctx, reason);
            }
        }

        self.transition(RunState::Downloading(category));
        let before = self
            .reconciler
            .snapshot(self.request.output_directory())
            .await
            .map_err(|source| RetrievalError::Download { category, source })?;
        info!("{} ⬇️ 点击下载...", rctx);
        step(
            category,
            "click_download",
            export_ctx.run(browser.click(portal::DOWNLOAD_ANCHOR)).await,
        )?;
        pause(browser, &export_ctx, category, "click_download", timings.post_click_settle).await?;
        debug!(
            "{} 等待浏览器写入文件 {:?}",
            rctx, timings.download_settle_timeout
        );
        pause(browser, ctx, category, "download_settle", timings.download_settle_timeout).await?;

        self.transition(RunState::Reconciling(category));
        let target = self.request.target_path(category);
        let saved = self
            .reconciler
            .reconcile(self.request.output_directory(), &target, &before)
            .await
            .map_err(|source| RetrievalError::Download { category, source })?;

        info!("{} ✅ 下载完成", rctx);
        Ok(saved)
    }
}

/// 把单步错误归类为采集错误
fn step<T>(
    category: DocumentCategory,
    step: &'static str,
    result: Result<T, StepError>,
) -> AppResult<T> {
    result.map_err(|e| match e {
        StepError::DeadlineExceeded => RetrievalError::Timeout { category, step },
        StepError::Failed(source) => RetrievalError::Navigation {
            category,
            step,
            source,
        },
    })
}

async fn pause(
    browser: &dyn BrowserControl,
    ctx: &ExecContext,
    category: DocumentCategory,
    after: &'static str,
    duration: Duration,
) -> AppResult<()> {
    step(category, after, ctx.run(browser.sleep(duration)).await)
}
