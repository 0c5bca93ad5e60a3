use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use parterre_store::app_config::EmailConfig;
use tracing::{error, info};

/// OTP delivery. With no SMTP host configured the code is logged instead,
/// which is how local development runs.
pub struct Mailer {
    config: EmailConfig,
}

impl Mailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Delivery is best-effort: registration already succeeded and the code
    /// expires on its own, so failures are logged, not surfaced.
    pub async fn send_otp(&self, to: &str, code: &str) {
        let Some(host) = self.config.smtp_host.clone() else {
            info!(%to, code, "OTP issued (no SMTP configured, logging instead)");
            return;
        };

        let config = self.config.clone();
        let to = to.to_string();
        let body = format!("Your verification code is {}. It expires in 5 minutes.", code);

        // lettre's SMTP transport is blocking.
        let result = tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            let message = Message::builder()
                .from(config.from_address.parse()?)
                .to(to.parse()?)
                .subject("Your verification code")
                .header(ContentType::TEXT_PLAIN)
                .body(body)?;

            let mut builder = SmtpTransport::relay(&host)?.port(config.smtp_port);
            if let (Some(user), Some(pass)) = (config.smtp_username, config.smtp_password) {
                builder = builder.credentials(Credentials::new(user, pass));
            }
            builder.build().send(&message)?;
            Ok(())
        })
        .await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "Failed to send OTP email"),
            Err(e) => error!(error = %e, "OTP mail task panicked"),
        }
    }
}
