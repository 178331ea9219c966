pub mod connection;
pub mod headless;
pub mod session;

pub use connection::connect_to_browser;
pub use headless::{launch_headless_browser, LaunchOptions};
pub use session::BrowserSession;

/// 固定的桌面浏览器 UA
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/77.0.3830.0 Safari/537.36";
