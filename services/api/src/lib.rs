mod cli;
mod demo;
mod infra;
mod mongo;
mod routes;
mod server;

use careers::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
