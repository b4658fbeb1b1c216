use async_trait::async_trait;

use crate::error::AppResult;

/// Outbound messages to users. Delivery channels (SMTP, SMS) plug in here.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_otp(&self, email: &str, name: &str, otp: &str) -> AppResult<()>;

    async fn send_welcome(&self, email: &str, name: &str) -> AppResult<()>;

    async fn send_password_reset(&self, email: &str, name: &str, token: &str) -> AppResult<()>;

    async fn send_password_changed(&self, email: &str, name: &str) -> AppResult<()>;
}

/// Development notifier: writes every message to the log instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_otp(&self, email: &str, name: &str, otp: &str) -> AppResult<()> {
        tracing::info!(%email, %name, %otp, "otp email (not delivered)");
        Ok(())
    }

    async fn send_welcome(&self, email: &str, name: &str) -> AppResult<()> {
        tracing::info!(%email, %name, "welcome email (not delivered)");
        Ok(())
    }

    async fn send_password_reset(&self, email: &str, name: &str, token: &str) -> AppResult<()> {
        tracing::info!(%email, %name, %token, "password reset email (not delivered)");
        Ok(())
    }

    async fn send_password_changed(&self, email: &str, name: &str) -> AppResult<()> {
        tracing::info!(%email, %name, "password changed email (not delivered)");
        Ok(())
    }
}
