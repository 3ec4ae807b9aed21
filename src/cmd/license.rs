use clap::{Args, Subcommand};

use crate::context::AppContext;
use crate::error::{AppError, AppResult};

#[derive(Args, Debug, Clone)]
pub struct LicenseArgs {
    #[command(subcommand)]
    pub command: LicenseCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LicenseCommand {
    /// Check a license key against the licensing service.
    Check {
        /// Key to check; defaults to the configured one.
        key: Option<String>,
    },
}

pub async fn run(ctx: &AppContext, command: LicenseCommand) -> AppResult<()> {
    match command {
        LicenseCommand::Check { key } => {
            let key = key.or_else(|| ctx.config.license_key.clone()).ok_or_else(|| {
                AppError::Configuration("no license key given or configured".to_string())
            })?;

            let status = ctx.license.validate(&key).await?;
            if status.valid {
                println!("License active.");
            } else {
                let reason = status.error.as_deref().unwrap_or("no reason given");
                println!("License not valid: {reason}");
            }
            Ok(())
        }
    }
}
