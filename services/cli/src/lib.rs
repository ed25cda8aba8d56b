mod cli;
mod render;

use health_risk::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
