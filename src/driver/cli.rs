//! CLI Argument Parsing
//!
//! CLIの引数解析

use clap::{Parser, Subcommand};

/// FreeStyle LibreのエクスポートをTidepoolへ変換・アップロードするCLI
#[derive(Parser, Debug, Clone)]
#[command(name = "libresync")]
#[command(about = "Convert and upload FreeStyle Libre readings to Tidepool", long_about = None)]
pub struct Args {
    /// Tidepool API endpoint
    #[arg(long, default_value = "https://api.tidepool.org")]
    pub host: String,

    /// Tidepool upload API endpoint
    #[arg(long, default_value = "https://uploads.tidepool.org")]
    pub upload_host: String,

    /// Tidepool data API endpoint
    #[arg(long, default_value = "https://api.tidepool.org")]
    pub data_host: String,

    /// Tidepool username
    #[arg(long)]
    pub username: Option<String>,

    /// Tidepool password
    #[arg(long)]
    pub password: Option<String>,

    /// Timezone name recorded in the dataset metadata
    #[arg(long, default_value = "Europe/London")]
    pub timezone: String,

    /// Run with verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// サブコマンド
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the platform server time
    Time,

    /// Show device data stored on the platform
    Show {
        /// Only return entries after this date (ISO 8601)
        #[arg(long)]
        start_date: Option<String>,

        /// Only return entries before this date (ISO 8601)
        #[arg(long)]
        end_date: Option<String>,
    },

    /// Parse a TSV export and print normalized readings as JSON
    Parse {
        /// TSV file exported from the FreeStyle Libre reader
        #[arg(long)]
        tsv: String,

        /// The FreeStyle Libre reader serial number
        #[arg(long)]
        device_serial_number: String,
    },

    /// Parse a TSV export and upload the readings
    Upload {
        /// TSV file exported from the FreeStyle Libre reader
        #[arg(long)]
        tsv: String,

        /// The FreeStyle Libre reader serial number
        #[arg(long)]
        device_serial_number: String,

        /// Dry run mode - don't actually upload
        #[arg(long)]
        dry_run: bool,
    },

    /// Merge TSV exports, dropping duplicated rows
    Dedupe {
        /// TSV files to merge, in order
        files: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_default_hosts() {
        let args = Args::parse_from(["libresync", "time"]);

        assert_eq!(args.host, "https://api.tidepool.org");
        assert_eq!(args.upload_host, "https://uploads.tidepool.org");
        assert_eq!(args.data_host, "https://api.tidepool.org");
        assert!(args.username.is_none());
        assert!(!args.verbose);
        assert!(matches!(args.command, Command::Time));
    }

    #[test]
    fn test_args_default_timezone() {
        let args = Args::parse_from(["libresync", "time"]);

        assert_eq!(args.timezone, "Europe/London");
    }

    #[test]
    fn test_args_parse_command() {
        let args = Args::parse_from([
            "libresync",
            "parse",
            "--tsv",
            "export.tsv",
            "--device-serial-number",
            "JCMY846-K1284",
        ]);

        match args.command {
            Command::Parse {
                tsv,
                device_serial_number,
            } => {
                assert_eq!(tsv, "export.tsv");
                assert_eq!(device_serial_number, "JCMY846-K1284");
            }
            _ => panic!("expected parse command"),
        }
    }

    #[test]
    fn test_args_parse_requires_tsv() {
        let result = Args::try_parse_from([
            "libresync",
            "parse",
            "--device-serial-number",
            "JCMY846-K1284",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn test_args_upload_with_credentials() {
        let args = Args::parse_from([
            "libresync",
            "--username",
            "user@example.com",
            "--password",
            "secret",
            "upload",
            "--tsv",
            "export.tsv",
            "--device-serial-number",
            "JCMY846-K1284",
        ]);

        assert_eq!(args.username.as_deref(), Some("user@example.com"));
        match args.command {
            Command::Upload { dry_run, .. } => assert!(!dry_run),
            _ => panic!("expected upload command"),
        }
    }

    #[test]
    fn test_args_upload_dry_run() {
        let args = Args::parse_from([
            "libresync",
            "upload",
            "--tsv",
            "export.tsv",
            "--device-serial-number",
            "JCMY846-K1284",
            "--dry-run",
        ]);

        match args.command {
            Command::Upload { dry_run, .. } => assert!(dry_run),
            _ => panic!("expected upload command"),
        }
    }

    #[test]
    fn test_args_show_date_range() {
        let args = Args::parse_from([
            "libresync",
            "show",
            "--start-date",
            "2019-01-01T00:00:00Z",
            "--end-date",
            "2019-12-31T23:59:59Z",
        ]);

        match args.command {
            Command::Show {
                start_date,
                end_date,
            } => {
                assert_eq!(start_date.as_deref(), Some("2019-01-01T00:00:00Z"));
                assert_eq!(end_date.as_deref(), Some("2019-12-31T23:59:59Z"));
            }
            _ => panic!("expected show command"),
        }
    }

    #[test]
    fn test_args_dedupe_files() {
        let args = Args::parse_from(["libresync", "dedupe", "a.tsv", "b.tsv"]);

        match args.command {
            Command::Dedupe { files } => assert_eq!(files, vec!["a.tsv", "b.tsv"]),
            _ => panic!("expected dedupe command"),
        }
    }

    #[test]
    fn test_args_verbose_flag() {
        let args = Args::parse_from(["libresync", "-v", "time"]);

        assert!(args.verbose);
    }
}
