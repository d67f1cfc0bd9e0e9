//! Init command implementation
//!
//! Writes a sample configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "dataexport.toml")]
    pub output: String,

    /// Include every section with comments and example values
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(()) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set upload.target to 'sftp' or 'sharepoint'");
                println!("  3. Export the referenced secrets, or put them in a .env file:");
                println!("     - DATAEXPORT_TOKEN");
                println!("     - SFTP_PASSWORD or SHAREPOINT_PASSWORD");
                println!("  4. Validate configuration: dataexport validate-config");
                println!("  5. Try it without uploading: dataexport run --dry-run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    fn generate_minimal_config() -> String {
        r#"# dataexport configuration

[source]
base_url = "https://data.example.com/ea-dataservice/export.service"
token = "${DATAEXPORT_TOKEN}"

[upload]
target = "sftp"
file_extension = ".csv"

[sftp]
host = "sftp.example.com"
username = "uploader"
password = "${SFTP_PASSWORD}"

[logging]
local_enabled = false
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# dataexport configuration
#
# Values of the form ${VAR} are read from the environment (or a .env file).
# Any key can also be overridden with DATAEXPORT_<SECTION>_<KEY>, for
# example DATAEXPORT_UPLOAD_TARGET=sharepoint.

[application]
# trace, debug, info, warn, error
log_level = "info"
# Fetch and validate the export, skip the upload
dry_run = false

[source]
base_url = "https://data.example.com/ea-dataservice/export.service"
token = "${DATAEXPORT_TOKEN}"
# Sent as the "type" query parameter
format = "csv"
# Format of startDate/endDate
date_format = "%m%d%Y"
timeout_seconds = 60
connect_timeout_seconds = 9
max_redirects = 10
# The data service has historically been called without certificate checks
tls_verify = false
# A 200 response containing any of these is treated as a failed export
error_markers = ["ERROR:", "Data can only be exported"]

[upload]
# sftp or sharepoint
target = "sharepoint"
file_extension = ".csv"
# Dates in the filename: 20240115.csv or 20240101-20240131.csv
date_format = "%Y%m%d"

[sftp]
host = "sftp.example.com"
port = 22
username = "uploader"
password = "${SFTP_PASSWORD}"
remote_dir = "/incoming"
timeout_seconds = 30

[sharepoint]
username = "svc-export@contoso.onmicrosoft.com"
password = "${SHAREPOINT_PASSWORD}"
tenant_url = "https://contoso.sharepoint.com"
site_url = "https://contoso.sharepoint.com/sites/reporting"
list_name = "Exports"
security_token_url = "https://login.microsoftonline.com/extSTS.srf"
request_timeout_seconds = 60
# positional: the first two Set-Cookie values after dropping the third
# named: the cookies listed in cookie_names
cookie_selection = "positional"
cookie_names = ["rtFa", "FedAuth"]

[notification]
enabled = false
smtp_host = "smtp.example.com"
smtp_port = 587
# starttls, tls or none
smtp_security = "starttls"
smtp_username = "alerts@example.com"
smtp_password = "${SMTP_PASSWORD}"
from = "Data Export <alerts@example.com>"
to = ["ops@example.com"]
download_subject = "Data export: download failed"
download_message = "The scheduled data export could not be downloaded."
upload_subject = "Data export: upload failed"
upload_message = "The scheduled data export could not be uploaded."

[logging]
local_enabled = true
local_path = "/var/log/dataexport"
local_file = "dataexport.log"
# never, daily or hourly
local_rotation = "never"
"#
        .to_string()
    }
}
