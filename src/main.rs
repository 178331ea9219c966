use std::process::ExitCode;

use mprr_collector::utils::logging;
use mprr_collector::{App, Config, RetrievalError};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    // 初始化日志
    logging::init();

    match run().await {
        Ok(paths) => {
            let lines: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
            println!("{}", lines.join("\n"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_status().code())
        }
    }
}

async fn run() -> Result<Vec<std::path::PathBuf>, RetrievalError> {
    // 加载配置
    let config = Config::from_env()?;

    // 初始化并运行应用
    App::initialize(config)?.run().await
}
