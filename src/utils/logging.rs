//! 日志工具模块
//!
//! 日志统一写到 stderr，stdout 只输出下载结果

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::RetrievalOutcome;
use crate::models::RetrievalRequest;
use crate::workflow::RunState;

/// 初始化日志
///
/// 默认级别 info，可通过 `RUST_LOG` 覆盖。重复调用是安全的。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(request: &RetrievalRequest) {
    let timings = request.timings();
    info!("{}", "=".repeat(60));
    info!(
        "🚀 开始采集 {}/{} - {}",
        request.month(),
        request.year(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📁 输出目录: {}", request.output_directory().display());
    info!(
        "⏱️ 步骤间隔: {:?} | 下载等待: {:?} | 总超时: {:?}",
        timings.inter_step_delay, timings.download_settle_timeout, timings.overall_deadline
    );
    info!("{}", "=".repeat(60));
}

/// 记录运行结果
///
/// 失败时只记录退出码和中断时所在的步骤，错误本身由进程入口统一输出一次。
pub fn log_outcome(outcome: &RetrievalOutcome, history: &[RunState]) {
    info!("{}", "─".repeat(60));
    info!("{}", outcome_summary(outcome, history));
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "─".repeat(60));
}

fn outcome_summary(outcome: &RetrievalOutcome, history: &[RunState]) -> String {
    match outcome {
        Ok(paths) => format!("✅ 完成: {} 个文件", paths.len()),
        Err(e) => {
            let interrupted_at = history
                .iter()
                .rev()
                .find(|s| !s.is_terminal())
                .unwrap_or(&RunState::Init);
            format!(
                "❌ 终止于 {} (退出码 {})",
                interrupted_at,
                e.exit_status().code()
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RetrievalError;
    use crate::models::DocumentCategory;

    #[test]
    fn test_failure_summary_names_step_not_error() {
        let err = RetrievalError::DataUnavailable {
            category: DocumentCategory::IndemnityReport,
            month: "7".to_string(),
            year: "2021".to_string(),
        };
        let message = err.to_string();
        let history = vec![
            RunState::Init,
            RunState::Probing(DocumentCategory::IndemnityReport),
            RunState::Failed(message.clone()),
        ];

        let summary = outcome_summary(&Err(err), &history);
        assert_eq!(summary, "❌ 终止于 Probing(indenizatorias) (退出码 4)");
        assert!(!summary.contains(&message));
    }

    #[test]
    fn test_success_summary_counts_files() {
        let outcome = Ok(vec!["a.xlsx".into(), "b.xlsx".into()]);
        assert_eq!(outcome_summary(&outcome, &[RunState::Done]), "✅ 完成: 2 个文件");
    }
}
