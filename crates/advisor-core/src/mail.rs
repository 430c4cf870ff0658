//! Strategy report delivery over SMTP

use crate::config::SmtpConfig;
use crate::error::{AdvisorError, Result};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use tracing::warn;

/// Sends the generated strategy to one fixed recipient.
///
/// Submission goes over a STARTTLS-upgraded connection authenticated with
/// the sender credentials. One attempt per call, no retry.
pub struct StrategyMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl StrategyMailer {
    /// Build the transport from the injected SMTP settings
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let from: Mailbox = config
            .username
            .parse()
            .map_err(|e| AdvisorError::Mail(format!("Invalid sender address: {e}")))?;
        let to: Mailbox = config
            .recipient
            .parse()
            .map_err(|e| AdvisorError::Mail(format!("Invalid recipient address: {e}")))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| AdvisorError::Mail(format!("SMTP transport error: {e}")))?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from,
            to,
        })
    }

    /// Send the strategy report. Failures become a descriptive status
    /// string rather than propagating.
    pub async fn send(&self, company_name: &str, strategy: &str) -> String {
        match self.try_send(company_name, strategy).await {
            Ok(()) => "이메일 전송 성공".to_string(),
            Err(err) => {
                warn!(company_name, %err, "Email delivery failed");
                format!("이메일 전송 오류: {err}")
            }
        }
    }

    async fn try_send(&self, company_name: &str, strategy: &str) -> Result<()> {
        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject_line(company_name))
            .header(ContentType::TEXT_PLAIN)
            .body(body_text(company_name, strategy))
            .map_err(|e| AdvisorError::Mail(format!("Failed to build email: {e}")))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| AdvisorError::Mail(format!("Failed to send email: {e}")))?;

        Ok(())
    }
}

fn subject_line(company_name: &str) -> String {
    format!("{company_name} 투자 전략 보고서")
}

fn body_text(company_name: &str, strategy: &str) -> String {
    format!("[회사 이름]: {company_name}\n\n[GPT 투자 전략]\n{strategy}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smtp_config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            username: "sender@example.com".to_string(),
            password: "app-password".to_string(),
            recipient: "receiver@example.com".to_string(),
        }
    }

    #[test]
    fn test_mailer_construction() {
        assert!(StrategyMailer::new(&smtp_config()).is_ok());
    }

    #[test]
    fn test_invalid_addresses_are_rejected() {
        let mut config = smtp_config();
        config.username = "not an address".to_string();
        assert!(matches!(
            StrategyMailer::new(&config),
            Err(AdvisorError::Mail(_))
        ));

        let mut config = smtp_config();
        config.recipient = String::new();
        assert!(StrategyMailer::new(&config).is_err());
    }

    #[test]
    fn test_message_content() {
        assert_eq!(subject_line("Tesla"), "Tesla 투자 전략 보고서");

        let body = body_text("Tesla", "분할 매수를 권장합니다.");
        assert!(body.starts_with("[회사 이름]: Tesla"));
        assert!(body.contains("[GPT 투자 전략]\n분할 매수를 권장합니다."));
    }
}
