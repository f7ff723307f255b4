use anyhow::{Context, Result};
use clap::Args;
use postbox_core::mail::{ImapConfig, LoginRequest, SmtpConfig};

use super::Runtime;

#[derive(Args)]
pub struct LoginArgs {
    /// Account email address
    email: String,
    /// Account password (falls back to POSTBOX_PASSWORD)
    #[arg(long)]
    password: Option<String>,
    /// IMAP host (defaults to imap.<domain>)
    #[arg(long)]
    imap_host: Option<String>,
    #[arg(long, default_value_t = 993)]
    imap_port: u16,
    /// Connect to IMAP without SSL
    #[arg(long)]
    no_imap_ssl: bool,
    /// SMTP host (defaults to smtp.<domain>)
    #[arg(long)]
    smtp_host: Option<String>,
    #[arg(long, default_value_t = 587)]
    smtp_port: u16,
    /// Connect to SMTP without STARTTLS
    #[arg(long)]
    no_smtp_tls: bool,
}

impl LoginArgs {
    fn into_request(self) -> Result<LoginRequest> {
        let password = match self.password {
            Some(password) => password,
            None => std::env::var("POSTBOX_PASSWORD")
                .context("No password given (use --password or POSTBOX_PASSWORD)")?,
        };
        let domain = self
            .email
            .split_once('@')
            .map(|(_, domain)| domain.to_string())
            .unwrap_or_default();

        let imap_config = ImapConfig {
            host: self.imap_host.unwrap_or_else(|| format!("imap.{domain}")),
            port: self.imap_port,
            use_ssl: !self.no_imap_ssl,
        };
        let smtp_config = SmtpConfig {
            host: self.smtp_host.unwrap_or_else(|| format!("smtp.{domain}")),
            port: self.smtp_port,
            use_tls: !self.no_smtp_tls,
        };

        Ok(LoginRequest {
            email: self.email,
            password,
            imap_config,
            smtp_config,
        })
    }
}

pub async fn login(runtime: &Runtime, args: LoginArgs) -> Result<()> {
    let session = runtime.auth_service().login(args.into_request()?).await?;
    println!("Signed in as {} ({})", session.email(), session.user_id());
    Ok(())
}

pub async fn logout(runtime: &Runtime) -> Result<()> {
    runtime.auth_service().logout().await?;
    println!("Signed out");
    Ok(())
}

pub fn whoami(runtime: &Runtime) {
    match runtime.auth_service().current_session() {
        Some(session) => println!("{} ({})", session.email(), session.user_id()),
        None => println!("Not signed in"),
    }
}
