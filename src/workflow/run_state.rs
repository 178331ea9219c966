use std::fmt::Display;

use crate::models::DocumentCategory;

/// 单次运行的状态
///
/// `Done` 和 `Failed` 是终止状态。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Init,
    Navigating(DocumentCategory),
    Selecting(DocumentCategory),
    Exporting(DocumentCategory),
    Probing(DocumentCategory),
    Downloading(DocumentCategory),
    Reconciling(DocumentCategory),
    Done,
    Failed(String),
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed(_))
    }
}

impl Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Init => write!(f, "Init"),
            RunState::Navigating(c) => write!(f, "Navigating({})", c),
            RunState::Selecting(c) => write!(f, "Selecting({})", c),
            RunState::Exporting(c) => write!(f, "Exporting({})", c),
            RunState::Probing(c) => write!(f, "Probing({})", c),
            RunState::Downloading(c) => write!(f, "Downloading({})", c),
            RunState::Reconciling(c) => write!(f, "Reconciling({})", c),
            RunState::Done => write!(f, "Done"),
            RunState::Failed(reason) => write!(f, "Failed({})", reason),
        }
    }
}
