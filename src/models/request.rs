use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::models::DocumentCategory;

/// 下载文件的扩展名
pub const REPORT_EXTENSION: &str = "xlsx";

/// 工作流中各个等待步骤的时长
///
/// 门户不提供任何"完成"信号，所以每一步之后都是固定等待。
/// 测试中可以把它们全部缩小到毫秒级。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// 每次表单操作之后的等待
    pub inter_step_delay: Duration,
    /// 点击下载链接后等待浏览器写完文件
    pub download_settle_timeout: Duration,
    /// 整次运行的截止时间
    pub overall_deadline: Duration,
    /// 点击按钮后的固定等待
    pub post_click_settle: Duration,
    /// 探测错误提示之前的等待
    pub probe_settle: Duration,
    /// 探测错误提示的子截止时间
    pub probe_timeout: Duration,
    /// 探测轮询间隔
    pub probe_poll_interval: Duration,
    /// 导出阶段（点击导出 → 探测 → 点击下载）的子截止时间
    pub export_timeout: Duration,
    /// 下载对账的时间窗口
    pub recency_window: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        let inter_step_delay = Duration::from_secs(5);
        Self {
            inter_step_delay,
            download_settle_timeout: Duration::from_secs(20),
            overall_deadline: Duration::from_secs(6 * 60),
            post_click_settle: inter_step_delay,
            probe_settle: Duration::from_secs(3),
            probe_timeout: Duration::from_secs(10),
            probe_poll_interval: Duration::from_millis(500),
            export_timeout: Duration::from_secs(50),
            recency_window: Duration::from_secs(60),
        }
    }
}

impl Timings {
    /// 所有等待都缩小到同一个值，截止时间单独指定
    pub fn uniform(step: Duration, overall_deadline: Duration) -> Self {
        Self {
            inter_step_delay: step,
            download_settle_timeout: step,
            overall_deadline,
            post_click_settle: step,
            probe_settle: step,
            probe_timeout: step * 4,
            probe_poll_interval: step,
            export_timeout: overall_deadline,
            recency_window: Duration::from_secs(60),
        }
    }
}

/// 一次采集请求，构造后只读
#[derive(Debug, Clone)]
pub struct RetrievalRequest {
    year: String,
    month: String,
    output_directory: PathBuf,
    timings: Timings,
}

impl RetrievalRequest {
    /// 创建请求
    ///
    /// 年份和月份必须能解析为整数；不做日历校验，门户会对无效组合返回空结果。
    pub fn new(
        year: impl Into<String>,
        month: impl Into<String>,
        output_directory: impl Into<PathBuf>,
        timings: Timings,
    ) -> Result<Self, ConfigError> {
        let year: String = year.into();
        let month: String = month.into();
        let year = year.trim().to_string();
        let month = month.trim().to_string();
        ensure_integer("YEAR", &year)?;
        ensure_integer("MONTH", &month)?;

        Ok(Self {
            year,
            month,
            output_directory: output_directory.into(),
            timings,
        })
    }

    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn timings(&self) -> &Timings {
        &self.timings
    }

    /// 规范文件名：`membros-ativos-{前缀}-{月}-{年}.xlsx`
    pub fn canonical_file_name(&self, category: DocumentCategory) -> String {
        format!(
            "membros-ativos-{}-{}-{}.{}",
            category.prefix(),
            self.month,
            self.year,
            REPORT_EXTENSION
        )
    }

    /// 目标文件的完整路径
    pub fn target_path(&self, category: DocumentCategory) -> PathBuf {
        self.output_directory
            .join(self.canonical_file_name(category))
    }
}

pub(crate) fn ensure_integer(var_name: &'static str, value: &str) -> Result<(), ConfigError> {
    value
        .parse::<i64>()
        .map(|_| ())
        .map_err(|_| ConfigError::InvalidNumber {
            var_name,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_file_names() {
        let request =
            RetrievalRequest::new("2021", "3", "/output", Timings::default()).unwrap();
        assert_eq!(
            request.canonical_file_name(DocumentCategory::PaycheckReport),
            "membros-ativos-contracheque-3-2021.xlsx"
        );
        assert_eq!(
            request.target_path(DocumentCategory::IndemnityReport),
            PathBuf::from("/output/membros-ativos-indenizatorias-3-2021.xlsx")
        );
    }

    #[test]
    fn test_month_is_kept_verbatim() {
        // 不做零填充，"03" 和 "3" 是两个不同的文件名
        let request =
            RetrievalRequest::new("2021", "03", "/output", Timings::default()).unwrap();
        assert_eq!(
            request.canonical_file_name(DocumentCategory::PaycheckReport),
            "membros-ativos-contracheque-03-2021.xlsx"
        );
    }

    #[test]
    fn test_non_numeric_period_is_rejected() {
        let err = RetrievalRequest::new("20x1", "3", "/output", Timings::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var_name: "YEAR", .. }));

        let err = RetrievalRequest::new("2021", "march", "/output", Timings::default()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var_name: "MONTH", .. }));
    }

    #[test]
    fn test_no_calendar_validation() {
        assert!(RetrievalRequest::new("1999", "13", "/output", Timings::default()).is_ok());
    }
}
