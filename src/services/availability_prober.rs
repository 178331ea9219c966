//! 可用性探测服务 - 业务能力层
//!
//! 只负责判断"导出之后页面上有没有出现错误提示"

use std::time::Duration;

use tracing::{debug, warn};

use crate::infrastructure::{BrowserControl, ExecContext, Selector, StepError};

/// 门户在没有数据时显示的错误提示
pub const ERROR_BANNER: Selector = Selector::Css(
    "body > div.wrapper > div > div > section.content > div.alert.alert-error > div",
);

/// 探测结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// 子截止时间内没有出现错误提示
    Available,
    /// 错误提示已确认出现
    Unavailable,
    /// 查询本身失败，无法判断
    Unknown(String),
}

/// 可用性探测服务
pub struct AvailabilityProber {
    settle: Duration,
    timeout: Duration,
    poll_interval: Duration,
}

impl AvailabilityProber {
    pub fn new(settle: Duration, timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            settle,
            timeout,
            poll_interval,
        }
    }

    /// 探测当前页面
    ///
    /// 先等待 `settle`，再在子截止时间内轮询错误提示。
    /// 只有父上下文到期才返回错误；子截止时间到期视为错误提示未出现。
    pub async fn probe(
        &self,
        browser: &dyn BrowserControl,
        ctx: &ExecContext,
    ) -> Result<Availability, StepError> {
        ctx.run(browser.sleep(self.settle)).await?;

        let sub = ctx.child(self.timeout);
        loop {
            match sub.run(browser.query_exists(ERROR_BANNER)).await {
                Ok(true) => {
                    debug!("检测到错误提示: {}", ERROR_BANNER);
                    return Ok(Availability::Unavailable);
                }
                Ok(false) => {}
                Err(StepError::DeadlineExceeded) => break,
                Err(StepError::Failed(e)) => {
                    if ctx.is_expired() {
                        return Err(StepError::DeadlineExceeded);
                    }
                    warn!("⚠️ 查询错误提示失败: {}", e);
                    return Ok(Availability::Unknown(e.to_string()));
                }
            }

            if let Err(StepError::DeadlineExceeded) =
                sub.run(browser.sleep(self.poll_interval)).await
            {
                break;
            }
        }

        if ctx.is_expired() {
            return Err(StepError::DeadlineExceeded);
        }
        debug!("{:?} 内未出现错误提示", self.timeout);
        Ok(Availability::Available)
    }
}
