use genforge::cli::CliApp;
use genforge::errors::AppError;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match CliApp::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = match err.downcast_ref::<AppError>() {
                Some(app_error) => {
                    tracing::debug!(category = app_error.category(), "command failed");
                    app_error.exit_code()
                }
                None => 1,
            };
            eprintln!("Error: {:#}", err);
            ExitCode::from(code as u8)
        }
    }
}
