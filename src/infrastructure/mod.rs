pub mod browser_control;
pub mod chrome_page;
pub mod exec_context;

pub use browser_control::{BrowserControl, Selector};
pub use chrome_page::ChromePage;
pub use exec_context::{ExecContext, StepError};
