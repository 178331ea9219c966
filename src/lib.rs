//! # MPRR Collector
//!
//! 从 MPRR 透明门户下载指定月份的工资单和补偿款表格
//!
//! 门户没有 API，只能驱动浏览器填写表单、点击生成、再把浏览器下载的文件
//! 重命名为规范文件名。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `BrowserControl` - 浏览器控制的窄接口，`ChromePage` 为真实实现
//! - `ExecContext` - 带截止时间的执行上下文
//!
//! ### ② 业务能力层（Services）
//! - `AvailabilityProber` - 判断门户是否返回了数据
//! - `DownloadReconciler` - 把浏览器下载的文件对应到规范文件名
//!
//! ### ③ 流程层（Workflow）
//! - `RetrievalFlow` - 单个类别：导航 → 选择 → 生成 → 探测 → 下载 → 对账
//!
//! ### ④ 编排层（Orchestration）
//! - `RunCoordinator` - 按类别串行执行，施加总截止时间
//! - `App` - 配置校验和浏览器会话生命周期

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{
    AppResult, ConfigError, DownloadError, ExitStatus, RetrievalError, RetrievalOutcome,
};
pub use infrastructure::{BrowserControl, ExecContext, Selector};
pub use models::{DocumentCategory, RetrievalRequest, Timings};
pub use orchestrator::{App, RunCoordinator};
pub use workflow::RunState;
