// Copyright © 2025 CattyMail
// Licensed under CattyMail License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use clap::{builder::ValueParser, Parser};
use std::{collections::HashSet, sync::LazyLock};

#[cfg(not(test))]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::parse);

#[cfg(test)]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::new_for_test);

#[derive(Debug, Parser)]
#[clap(
    name = "cattymail",
    about = "A disposable email gateway: claim short-lived addresses under catch-all domains,
    ingest their mail from an upstream IMAP mailbox, and read it over a REST/SSE API.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// cattymail log level (default: "info")
    #[clap(
        long,
        default_value = "info",
        env,
        help = "Set the log level for cattymail"
    )]
    pub cattymail_log_level: String,

    /// Enable ANSI logs (default: true)
    #[clap(long, default_value = "true", env, help = "Enable ANSI formatted logs")]
    pub cattymail_ansi_logs: bool,

    /// Enable log file output (default: false)
    /// If false, logs will be printed to stdout
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable log file output (otherwise logs go to stdout)"
    )]
    pub cattymail_log_to_file: bool,

    #[clap(
        long,
        default_value = "logs",
        env,
        help = "Directory for rolling log files when file logging is enabled"
    )]
    pub cattymail_log_dir: String,

    #[clap(
        long,
        default_value = "7",
        env,
        help = "Maximum number of daily server log files to retain"
    )]
    pub cattymail_max_server_log_files: usize,

    /// cattymail HTTP port (default: 8080)
    #[clap(
        long,
        default_value = "8080",
        env,
        help = "Set the HTTP port for cattymail"
    )]
    pub cattymail_http_port: u16,

    /// The IP address the API server binds to, in IPv4 format.
    #[clap(
        long,
        env,
        default_value = "0.0.0.0",
        help = "The IP address that the API server binds to, in IPv4 format (e.g., 192.168.1.1)",
        value_parser = ValueParser::new(|s: &str| {
            if s.parse::<std::net::Ipv4Addr>().is_err() {
                return Err("The bind IP address must be a valid IPv4 address.".to_string());
            }
            Ok(s.to_string())
        })
    )]
    pub cattymail_bind_ip: String,

    /// CORS allowed origins (default: "*")
    #[clap(
        long,
        default_value = "*",
        env,
        help = "Set the allowed CORS origins (comma-separated list, e.g., \"https://example.com, https://another.com\")",
        value_parser = ValueParser::new(|s: &str| -> Result<HashSet<String>, String> {
            let set: HashSet<String> = s.split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
            Ok(set)
        })
    )]
    pub cattymail_cors_origins: HashSet<String>,

    /// CORS max age in seconds (default: 86400)
    #[clap(
        long,
        default_value = "86400",
        env,
        help = "Set the CORS max age in seconds"
    )]
    pub cattymail_cors_max_age: i32,

    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable HTTP response compression"
    )]
    pub cattymail_http_compression_enabled: bool,

    /// Redis connection URL; the store holds every piece of shared state.
    #[clap(
        long,
        default_value = "redis://localhost:6379/0",
        env,
        help = "Set the Redis URL for the shared state store"
    )]
    pub cattymail_redis_url: String,

    /// Upstream catch-all IMAP host; dynamic store overrides win at runtime.
    #[clap(
        long,
        default_value = "",
        env,
        help = "Set the upstream IMAP server host (empty disables polling until configured)"
    )]
    pub cattymail_imap_host: String,

    #[clap(
        long,
        default_value = "993",
        env,
        help = "Set the upstream IMAP server port"
    )]
    pub cattymail_imap_port: u16,

    #[clap(
        long,
        default_value = "",
        env,
        help = "Set the upstream IMAP login user"
    )]
    pub cattymail_imap_user: String,

    #[clap(
        long,
        default_value = "",
        env,
        help = "Set the upstream IMAP login password"
    )]
    pub cattymail_imap_pass: String,

    /// Verify the upstream IMAP TLS certificate (default: false).
    /// Catch-all mailboxes commonly live on hosts with self-signed certs;
    /// production deployments SHOULD turn this on.
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Verify the upstream IMAP server TLS certificate"
    )]
    pub cattymail_imap_tls_verify: bool,

    /// Permanent allow-list of catch-all domains; admin-added dynamic
    /// domains from the store are merged on top.
    #[clap(
        long,
        default_value = "catty.my.id,cattyprems.top",
        env,
        help = "Set the static allow-list of catch-all domains (comma-separated)",
        value_delimiter = ',',
        value_parser = ValueParser::new(|s: &str| -> Result<String, String> {
            let domain = s.trim().to_lowercase();
            if domain.is_empty() {
                return Err("Allowed domains must not be empty.".to_string());
            }
            Ok(domain)
        })
    )]
    pub cattymail_allowed_domains: Vec<String>,

    /// Retention window R: every ephemeral key expires this many seconds
    /// after its last write.
    #[clap(
        long,
        default_value = "86400",
        env,
        help = "Set the retention window in seconds for all ephemeral state"
    )]
    pub cattymail_ttl_seconds: u64,

    #[clap(
        long,
        default_value = "20",
        env,
        help = "Set the IMAP polling period in seconds"
    )]
    pub cattymail_poll_seconds: u64,

    /// Messages larger than this are skipped without a record.
    #[clap(
        long,
        default_value = "5242880",
        env,
        help = "Set the maximum raw message size in bytes"
    )]
    pub cattymail_max_email_bytes: usize,

    #[clap(
        long,
        default_value = "10",
        env,
        help = "Set the per-client address creation limit per minute"
    )]
    pub cattymail_rate_limit_create_per_min: u32,

    #[clap(
        long,
        default_value = "60",
        env,
        help = "Set the per-client inbox fetch limit per minute"
    )]
    pub cattymail_rate_limit_fetch_per_min: u32,

    /// Optional service sunset date in DD/MM/YYYY; once past end-of-day,
    /// the API answers 503 except for health and status.
    #[clap(
        long,
        env,
        help = "Set the service expiry date (DD/MM/YYYY); unset means never"
    )]
    pub cattymail_service_expiry_date: Option<String>,

    /// Bearer token for the admin API; unset disables the admin surface.
    #[clap(long, env, help = "Set the admin API bearer token")]
    pub cattymail_admin_token: Option<String>,

    #[clap(long, default_value = "true", env, help = "Run the REST API server")]
    pub cattymail_api_enabled: bool,

    #[clap(long, default_value = "true", env, help = "Run the IMAP ingestor")]
    pub cattymail_ingestor_enabled: bool,
}

#[cfg(test)]
impl Settings {
    pub fn new_for_test() -> Self {
        Settings::parse_from(["cattymail"])
    }
}
