//! Outbound email, used by the password-recovery flow.
//!
//! The SMTP transport is configured for Gmail and built once at startup from
//! the application config; handlers reach it through the `Mailer` trait held
//! in `AppState`, so tests can swap in a recording fake.

use async_trait::async_trait;
use common::config;
use lettre::{
    AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header},
    transport::smtp::{
        AsyncSmtpTransport,
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Dirección de correo inválida: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("No se pudo construir el correo: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("Error enviando el correo: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends the password-reset email containing the reset link for `token`.
    async fn send_password_reset(&self, to_email: &str, token: &str) -> Result<(), EmailError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn from_config() -> Self {
        let tls_parameters =
            TlsParameters::new("smtp.gmail.com".to_string()).expect("Failed to create TLS parameters");

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay("smtp.gmail.com")
            .expect("Failed to create SMTP transport")
            .port(587)
            .tls(Tls::Required(tls_parameters))
            .credentials(Credentials::new(
                config::gmail_username(),
                config::gmail_app_password(),
            ))
            .build();

        Self { transport }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_password_reset(&self, to_email: &str, token: &str) -> Result<(), EmailError> {
        let reset_link = format!("{}/reset-password/{}", config::frontend_url(), token);
        let expiry_minutes = config::reset_token_expiry_minutes();

        let plain = format!(
            "Recuperar contraseña\n\n\
             Abre el siguiente link para resetear tu contraseña:\n{reset_link}\n\n\
             Este link expira en {expiry_minutes} minutos."
        );

        let html = format!(
            "<h2>Recuperar contraseña</h2>\
             <p>Haz clic en el siguiente link para resetear tu contraseña:</p>\
             <a href=\"{reset_link}\">Resetear contraseña</a>\
             <p>Este link expira en {expiry_minutes} minutos.</p>"
        );

        let message = Message::builder()
            .from(
                format!("{} <{}>", config::email_from_name(), config::gmail_username())
                    .parse()
                    .map_err(EmailError::Address)?,
            )
            .to(to_email.parse().map_err(EmailError::Address)?)
            .subject("Recuperar contraseña")
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(plain),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )?;

        self.transport.send(message).await?;
        Ok(())
    }
}
