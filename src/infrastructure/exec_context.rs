//! 执行上下文 - 基础设施层
//!
//! 所有浏览器操作和等待都绑定在一个带截止时间的上下文上。
//! 截止时间到期会中断正在进行的操作，并以 `StepError::DeadlineExceeded` 返回。

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// 单步操作错误
#[derive(Debug)]
pub enum StepError {
    /// 上下文截止时间已过
    DeadlineExceeded,
    /// 操作本身失败
    Failed(anyhow::Error),
}

impl std::fmt::Display for StepError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepError::DeadlineExceeded => write!(f, "截止时间已过"),
            StepError::Failed(e) => write!(f, "{}", e),
        }
    }
}

/// 带截止时间的执行上下文
#[derive(Debug, Clone, Copy)]
pub struct ExecContext {
    deadline: Instant,
}

impl ExecContext {
    /// 从现在起 `timeout` 后到期
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Instant::now() + timeout,
        }
    }

    /// 派生子上下文，到期时间取父子两者中较早的一个
    pub fn child(&self, timeout: Duration) -> Self {
        Self {
            deadline: self.deadline.min(Instant::now() + timeout),
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }

    /// 在截止时间内执行一个操作
    ///
    /// 操作自身报错时，如果此时上下文已到期，同样归类为 `DeadlineExceeded`。
    pub async fn run<T, F>(&self, operation: F) -> Result<T, StepError>
    where
        F: Future<Output = anyhow::Result<T>>,
    {
        if self.is_expired() {
            return Err(StepError::DeadlineExceeded);
        }
        match tokio::time::timeout_at(self.deadline, operation).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_)) if self.is_expired() => Err(StepError::DeadlineExceeded),
            Ok(Err(e)) => Err(StepError::Failed(e)),
            Err(_) => Err(StepError::DeadlineExceeded),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_passes_through_success() {
        let ctx = ExecContext::with_timeout(Duration::from_secs(1));
        let value = ctx.run(async { Ok::<_, anyhow::Error>(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_run_interrupts_slow_operation() {
        let ctx = ExecContext::with_timeout(Duration::from_millis(20));
        let result = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, anyhow::Error>(())
            })
            .await;
        assert!(matches!(result, Err(StepError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn test_run_keeps_ordinary_failures() {
        let ctx = ExecContext::with_timeout(Duration::from_secs(1));
        let result: Result<(), _> = ctx.run(async { Err(anyhow::anyhow!("未找到元素")) }).await;
        assert!(matches!(result, Err(StepError::Failed(_))));
    }

    #[tokio::test]
    async fn test_failure_after_expiry_is_deadline() {
        let ctx = ExecContext::with_timeout(Duration::from_millis(10));
        let result: Result<(), _> = ctx
            .run(async {
                // 阻塞到截止时间之后，再以驱动层的"上下文已取消"错误返回
                std::thread::sleep(Duration::from_millis(30));
                Err(anyhow::anyhow!("context canceled"))
            })
            .await;
        assert!(matches!(result, Err(StepError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn test_child_never_outlives_parent() {
        let parent = ExecContext::with_timeout(Duration::from_millis(50));
        let child = parent.child(Duration::from_secs(60));
        assert_eq!(child.deadline(), parent.deadline());

        let shorter = parent.child(Duration::from_millis(1));
        assert!(shorter.deadline() < parent.deadline());
    }
}
