use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::models::request::ensure_integer;
use crate::models::{RetrievalRequest, Timings};
use crate::utils::duration::parse_duration;

/// 门户入口地址
pub const DEFAULT_PORTAL_URL: &str = "https://www.mprr.mp.br/web/transparencia/opcoesvencimentos";

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 年份（原样保留，用于文件名）
    pub year: String,
    /// 月份（原样保留，用于文件名）
    pub month: String,
    /// 输出目录
    pub output_folder: PathBuf,
    /// 各步骤等待时长
    pub timings: Timings,
    /// 门户入口地址
    pub portal_url: String,
    /// 是否无头运行
    pub headless: bool,
    /// 浏览器可执行文件
    pub chrome_executable: Option<PathBuf>,
    /// 已有浏览器的调试端口，设置后不再启动新浏览器
    pub browser_debug_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源读取配置
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let month = get("MONTH").ok_or(ConfigError::MissingVar { var_name: "MONTH" })?;
        ensure_integer("MONTH", month.trim())?;
        let year = get("YEAR").ok_or(ConfigError::MissingVar { var_name: "YEAR" })?;
        ensure_integer("YEAR", year.trim())?;

        let defaults = Timings::default();
        let inter_step_delay =
            duration_var(&get, "TIME_BETWEEN_STEPS", defaults.inter_step_delay)?;
        let timings = Timings {
            inter_step_delay,
            post_click_settle: inter_step_delay,
            download_settle_timeout: duration_var(
                &get,
                "DOWNLOAD_TIMEOUT",
                defaults.download_settle_timeout,
            )?,
            overall_deadline: duration_var(&get, "GENERAL_TIMEOUT", defaults.overall_deadline)?,
            recency_window: duration_var(
                &get,
                "DOWNLOAD_RECENCY_WINDOW",
                defaults.recency_window,
            )?,
            ..defaults
        };

        let browser_debug_port = match get("BROWSER_DEBUG_PORT") {
            Some(v) => Some(v.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                var_name: "BROWSER_DEBUG_PORT",
                value: v.clone(),
            })?),
            None => None,
        };

        Ok(Self {
            year: year.trim().to_string(),
            month: month.trim().to_string(),
            output_folder: get("OUTPUT_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/output")),
            timings,
            portal_url: get("PORTAL_URL").unwrap_or_else(|| DEFAULT_PORTAL_URL.to_string()),
            headless: bool_var(&get, "HEADLESS", true)?,
            chrome_executable: get("CHROME_EXECUTABLE").map(PathBuf::from),
            browser_debug_port,
        })
    }

    /// 创建输出目录并返回其绝对路径
    pub fn prepare_output_folder(&self) -> Result<PathBuf, ConfigError> {
        let wrap = |source| ConfigError::OutputFolder {
            path: self.output_folder.clone(),
            source,
        };
        std::fs::create_dir_all(&self.output_folder).map_err(wrap)?;
        std::fs::canonicalize(&self.output_folder).map_err(wrap)
    }

    /// 构造采集请求
    pub fn to_request(&self, output_directory: &Path) -> Result<RetrievalRequest, ConfigError> {
        RetrievalRequest::new(
            self.year.clone(),
            self.month.clone(),
            output_directory,
            self.timings,
        )
    }
}

fn duration_var<G>(get: &G, var_name: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(var_name) {
        Some(value) => parse_duration(&value).map_err(|e| ConfigError::InvalidDuration {
            var_name,
            value,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn bool_var<G>(get: &G, var_name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let Some(value) = get(var_name) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var_name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("YEAR", "2021"), ("MONTH", "4")])).unwrap();
        assert_eq!(config.output_folder, PathBuf::from("/output"));
        assert_eq!(config.timings.download_settle_timeout, Duration::from_secs(20));
        assert_eq!(config.timings.overall_deadline, Duration::from_secs(360));
        assert_eq!(config.timings.inter_step_delay, Duration::from_secs(5));
        assert_eq!(config.portal_url, DEFAULT_PORTAL_URL);
        assert!(config.headless);
        assert_eq!(config.browser_debug_port, None);
    }

    #[test]
    fn test_duration_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("YEAR", "2021"),
            ("MONTH", "4"),
            ("DOWNLOAD_TIMEOUT", "45s"),
            ("GENERAL_TIMEOUT", "10m"),
            ("TIME_BETWEEN_STEPS", "1500ms"),
            ("OUTPUT_FOLDER", "/tmp/out"),
        ]))
        .unwrap();
        assert_eq!(config.timings.download_settle_timeout, Duration::from_secs(45));
        assert_eq!(config.timings.overall_deadline, Duration::from_secs(600));
        assert_eq!(config.timings.inter_step_delay, Duration::from_millis(1500));
        assert_eq!(config.timings.post_click_settle, Duration::from_millis(1500));
        assert_eq!(config.output_folder, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_malformed_period_is_rejected() {
        let err = Config::from_lookup(lookup(&[("YEAR", "2021"), ("MONTH", "abril")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var_name: "MONTH", .. }));

        let err = Config::from_lookup(lookup(&[("YEAR", "two"), ("MONTH", "4")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { var_name: "YEAR", .. }));

        let err = Config::from_lookup(lookup(&[("MONTH", "4")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar { var_name: "YEAR" }));
    }

    #[test]
    fn test_malformed_duration_is_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("YEAR", "2021"),
            ("MONTH", "4"),
            ("DOWNLOAD_TIMEOUT", "twenty"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidDuration { var_name: "DOWNLOAD_TIMEOUT", .. }
        ));
    }

    #[test]
    fn test_headless_flag() {
        for (value, expected) in [("0", false), ("no", false), ("FALSE", false), ("1", true), ("yes", true)] {
            let config = Config::from_lookup(lookup(&[
                ("YEAR", "2021"),
                ("MONTH", "4"),
                ("HEADLESS", value),
            ]))
            .unwrap();
            assert_eq!(config.headless, expected, "HEADLESS={}", value);
        }

        let err = Config::from_lookup(lookup(&[
            ("YEAR", "2021"),
            ("MONTH", "4"),
            ("HEADLESS", "talvez"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBool { var_name: "HEADLESS", .. }));
    }

    #[test]
    fn test_prepare_output_folder_creates_absolute_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        let config = Config::from_lookup(lookup(&[
            ("YEAR", "2021"),
            ("MONTH", "4"),
            ("OUTPUT_FOLDER", nested.to_str().unwrap()),
        ]))
        .unwrap();

        let dir = config.prepare_output_folder().unwrap();
        assert!(dir.is_absolute());
        assert!(dir.is_dir());

        let request = config.to_request(&dir).unwrap();
        assert_eq!(request.output_directory(), dir.as_path());
    }
}
