use std::path::PathBuf;

use thiserror::Error;

use crate::models::DocumentCategory;

/// 采集错误类型
///
/// 每个错误都会立即向上传播，协调器不会越过失败的类别继续执行。
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// 配置错误（运行前）
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 浏览器会话无法建立
    #[error("浏览器会话错误: {0}")]
    Session(#[source] anyhow::Error),

    /// 导航或表单选择阶段的浏览器操作失败
    #[error("[{category}] 步骤 '{step}' 失败: {source}")]
    Navigation {
        category: DocumentCategory,
        step: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// 门户确认该月份没有报表
    #[error("[{category}] {month}/{year} 没有可用的报表")]
    DataUnavailable {
        category: DocumentCategory,
        month: String,
        year: String,
    },

    /// 下载文件无法对应到目标文件名
    #[error("[{category}] 下载错误: {source}")]
    Download {
        category: DocumentCategory,
        #[source]
        source: DownloadError,
    },

    /// 截止时间已过
    #[error("[{category}] 步骤 '{step}' 超时")]
    Timeout {
        category: DocumentCategory,
        step: &'static str,
    },
}

/// 下载对账错误
#[derive(Debug, Error)]
pub enum DownloadError {
    /// 时间窗口内没有任何文件
    #[error("目录 {dir} 中 {window_secs} 秒内没有新文件")]
    NoDownloadFound { dir: PathBuf, window_secs: u64 },

    /// 多个文件拥有相同的最新修改时间，无法判断哪个是本次下载
    #[error("目录中有多个最新文件，无法确定下载结果: {candidates:?}")]
    AmbiguousDownload { candidates: Vec<PathBuf> },

    /// 最新文件仍是浏览器的临时下载文件
    #[error("下载尚未完成: {path}")]
    DownloadIncomplete { path: PathBuf },

    /// 读取目录失败
    #[error("读取目录 {dir} 失败: {source}")]
    ReadDirFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 重命名失败
    #[error("重命名 {from} -> {to} 失败: {source}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 重命名后目标文件不存在
    #[error("重命名后未找到文件: {path}")]
    RenameVerificationFailed { path: PathBuf },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 必需的环境变量不存在
    #[error("环境变量 {var_name} 不存在")]
    MissingVar { var_name: &'static str },

    /// 数值解析失败
    #[error("环境变量 {var_name} 的值 '{value}' 不是整数")]
    InvalidNumber { var_name: &'static str, value: String },

    /// 布尔值解析失败
    #[error("环境变量 {var_name} 的值 '{value}' 不是布尔值 (true/false/1/0/yes/no)")]
    InvalidBool { var_name: &'static str, value: String },

    /// 时长解析失败
    #[error("环境变量 {var_name} 的值 '{value}' 不是有效时长: {reason}")]
    InvalidDuration {
        var_name: &'static str,
        value: String,
        reason: String,
    },

    /// 输出目录无法创建
    #[error("无法创建输出目录 {path}: {source}")]
    OutputFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 进程退出码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Ok = 0,
    Unknown = 1,
    DataUnavailable = 4,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl RetrievalError {
    /// 映射到进程退出码
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            RetrievalError::DataUnavailable { .. } => ExitStatus::DataUnavailable,
            _ => ExitStatus::Unknown,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RetrievalError::Timeout { .. })
    }
}

/// 采集结果：按类别顺序排列的文件路径，或类型化的失败
pub type RetrievalOutcome = Result<Vec<PathBuf>, RetrievalError>;

/// 采集结果类型
pub type AppResult<T> = Result<T, RetrievalError>;
