//! Outbound account emails.

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or, env_required};
use eyre::{Result, WrapErr};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::instrument;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification_email(&self, to: &str, token: &str) -> Result<()>;

    async fn send_password_reset_email(&self, to: &str, token: &str) -> Result<()>;
}

/// - `SMTP_HOST` (required), `SMTP_PORT` (default: 587)
/// - `SMTP_USERNAME`, `SMTP_PASSWORD` (optional; empty means no auth)
/// - `SMTP_USE_TLS` (default: true)
/// - `EMAIL_FROM` (required)
/// - `PUBLIC_BASE_URL` (default: http://localhost:8080/api), prefix for links
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub use_tls: bool,
    pub from: String,
    pub public_base_url: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("use_tls", &self.use_tls)
            .field("from", &self.from)
            .field("public_base_url", &self.public_base_url)
            .finish()
    }
}

impl FromEnv for SmtpConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env_required("SMTP_HOST")?,
            port: env_parse_or("SMTP_PORT", 587)?,
            username: env_or_default("SMTP_USERNAME", ""),
            password: env_or_default("SMTP_PASSWORD", ""),
            use_tls: env_parse_or("SMTP_USE_TLS", true)?,
            from: env_required("EMAIL_FROM")?,
            public_base_url: env_or_default("PUBLIC_BASE_URL", "http://localhost:8080/api")
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

pub fn verification_link(base_url: &str, token: &str) -> String {
    format!("{base_url}/users/verify/{token}")
}

pub fn password_reset_link(base_url: &str, token: &str) -> String {
    format!("{base_url}/users/password/reset/{token}")
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    public_base_url: String,
}

impl SmtpMailer {
    pub fn new(config: SmtpConfig) -> Result<Self> {
        let builder = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .wrap_err("Failed to create SMTP relay")?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        };

        let builder = if config.username.is_empty() {
            builder
        } else {
            builder.credentials(Credentials::new(config.username, config.password))
        };

        let from: Mailbox = config.from.parse().wrap_err("Invalid EMAIL_FROM address")?;

        Ok(Self {
            transport: builder.port(config.port).build(),
            from,
            public_base_url: config.public_base_url,
        })
    }

    async fn send_text(&self, to: &str, subject: &str, body: String) -> Result<()> {
        let to: Mailbox = to.parse().wrap_err("Invalid recipient address")?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .wrap_err("Failed to build email")?;

        self.transport
            .send(message)
            .await
            .wrap_err("SMTP send failed")?;
        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, token))]
    async fn send_verification_email(&self, to: &str, token: &str) -> Result<()> {
        let link = verification_link(&self.public_base_url, token);
        self.send_text(
            to,
            "Verify Your Email",
            format!("Click the link to verify your email: {link}\r\n"),
        )
        .await
    }

    #[instrument(skip(self, token))]
    async fn send_password_reset_email(&self, to: &str, token: &str) -> Result<()> {
        let link = password_reset_link(&self.public_base_url, token);
        self.send_text(
            to,
            "Reset Your Password",
            format!(
                "Click the link to reset your password: {link}\r\nThe link expires in one hour.\r\n"
            ),
        )
        .await
    }
}
