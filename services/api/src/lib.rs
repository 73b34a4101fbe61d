mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use launch_tms::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
