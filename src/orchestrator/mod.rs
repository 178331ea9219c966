//! 编排层（Orchestration Layer）
//!
//! ```text
//! app (配置校验、会话生命周期)
//!     ↓
//! run_coordinator (按类别串行、总截止时间、失败归类)
//!     ↓
//! workflow::RetrievalFlow (单个类别)
//!     ↓
//! services (能力层：可用性探测 / 下载对账)
//!     ↓
//! infrastructure (基础设施：BrowserControl / ExecContext)
//! ```
//!
//! 只有编排层持有浏览器会话。

pub mod app;
pub mod run_coordinator;

pub use app::App;
pub use run_coordinator::RunCoordinator;
