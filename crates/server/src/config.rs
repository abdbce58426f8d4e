use fintech_core::services::mail_service::MailConfig;

/// Server configuration, resolved from environment variables once at
/// startup. `.env` files are honored (loaded in `main` before this).
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    /// Path of the line-delimited portfolio file.
    pub portfolio_file: String,
    /// Directory where rendered history charts are written.
    pub graphs_dir: String,
    /// SMTP settings; `None` when any of the mail variables is unset,
    /// in which case the send_graph endpoint reports the sender as
    /// unconfigured instead of failing at startup.
    pub mail: Option<MailConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        let mail = match (
            std::env::var("TTM_SMTP_HOST"),
            std::env::var("TTM_MAIL_USER"),
            std::env::var("TTM_MAIL_PASS"),
        ) {
            (Ok(smtp_host), Ok(username), Ok(password)) => {
                let from = std::env::var("TTM_MAIL_FROM").unwrap_or_else(|_| username.clone());
                Some(MailConfig {
                    smtp_host,
                    username,
                    password,
                    from,
                })
            }
            _ => None,
        };

        Self {
            listen_addr: std::env::var("TTM_LISTEN_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            portfolio_file: std::env::var("TTM_PORTFOLIO_FILE")
                .unwrap_or_else(|_| "portfolio.txt".to_string()),
            graphs_dir: std::env::var("TTM_GRAPHS_DIR").unwrap_or_else(|_| "graphs".to_string()),
            mail,
        }
    }
}
