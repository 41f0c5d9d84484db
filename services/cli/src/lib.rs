mod cli;
mod infra;
mod intake;

use talent_intake::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
