//! Validate config command implementation

use crate::config::{load_config, AppConfig, UploadTarget};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates as well
        match load_config(config_path) {
            Ok(config) => {
                println!("Configuration is valid");
                println!();
                print_summary(&config);
                Ok(0)
            }
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                println!();
                Ok(2)
            }
        }
    }
}

/// Print the settings a run would use; secrets are never shown
fn print_summary(config: &AppConfig) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Dry Run: {}", config.application.dry_run);
    println!("  Data Service: {}", config.source.base_url);
    println!("  Format: {}", config.source.format);
    println!("  TLS Verify: {}", config.source.tls_verify);
    println!("  Upload Target: {}", config.upload.target);
    println!(
        "  File Name: <{}>[-<{}>]{}",
        config.upload.date_format, config.upload.date_format, config.upload.file_extension
    );

    match config.upload.target {
        UploadTarget::Sftp => {
            if let Some(ref sftp) = config.sftp {
                println!("  SFTP Server: {}:{}", sftp.host, sftp.port);
                println!("  SFTP User: {}", sftp.username);
                println!(
                    "  SFTP Directory: {}",
                    sftp.remote_dir.as_deref().unwrap_or("(login directory)")
                );
            }
        }
        UploadTarget::SharePoint => {
            if let Some(ref sharepoint) = config.sharepoint {
                println!("  SharePoint Site: {}", sharepoint.site_url);
                println!("  SharePoint Library: {}", sharepoint.list_name);
                println!("  SharePoint User: {}", sharepoint.username);
            }
        }
    }

    if config.notification.enabled {
        println!(
            "  Notifications: {}:{} -> {}",
            config.notification.smtp_host,
            config.notification.smtp_port,
            config.notification.to.join(", ")
        );
    } else {
        println!("  Notifications: disabled");
    }

    if config.logging.local_enabled {
        println!(
            "  Log File: {}/{} (rotation: {})",
            config.logging.local_path, config.logging.local_file, config.logging.local_rotation
        );
    }
    println!();
}
