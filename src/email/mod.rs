//! 邮件通知
//! 表单提交成功后发送通知邮件；发送失败只记录告警，不影响持久化结果

pub mod templates;

use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::{config::EmailConfig, models::contact::Submission};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("email delivery is not configured")]
    NotConfigured,

    #[error("email request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// 邮件投递服务
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, submission: &Submission) -> Result<(), MailError>;
}

/// 未配置 API 密钥时使用：每次发送都返回 NotConfigured
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _submission: &Submission) -> Result<(), MailError> {
        Err(MailError::NotConfigured)
    }
}

/// Resend HTTP API 请求体
#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: String,
}

/// 通过 Resend HTTP API 发送邮件
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: Secret<String>,
    api_base: String,
    from: String,
    to: String,
}

impl ResendMailer {
    pub fn new(
        api_key: Secret<String>,
        api_base: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Result<Self, MailError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_key,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            from: from.into(),
            to: to.into(),
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, submission: &Submission) -> Result<(), MailError> {
        let rendered = templates::render(submission);

        let body = SendEmailBody {
            from: &self.from,
            to: vec![self.to.as_str()],
            subject: rendered.subject,
            html: rendered.html,
        };

        self.client
            .post(format!("{}/emails", self.api_base))
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        tracing::debug!(kind = submission.kind(), "Notification email accepted");
        Ok(())
    }
}

/// 根据配置选择邮件实现
pub fn mailer_from_config(config: &EmailConfig) -> Result<Box<dyn Mailer>, MailError> {
    match (&config.resend_api_key, &config.to) {
        (Some(key), Some(to)) => Ok(Box::new(ResendMailer::new(
            key.clone(),
            config.api_base.clone(),
            config.from.clone(),
            to.clone(),
        )?)),
        _ => {
            tracing::warn!("Email notifications disabled: resend_api_key or email.to not configured");
            Ok(Box::new(DisabledMailer))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contact::Quotation;

    fn quotation() -> Submission {
        Submission::Quotation(Quotation {
            first_name: "Ana".to_string(),
            last_name: "Pérez".to_string(),
            email: "ana@example.com".to_string(),
            phone: String::new(),
            address: String::new(),
            role: String::new(),
        })
    }

    #[tokio::test]
    async fn test_disabled_mailer_reports_not_configured() {
        let result = DisabledMailer.send(&quotation()).await;
        assert!(matches!(result, Err(MailError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_unconfigured_email_uses_disabled_mailer() {
        let config = EmailConfig {
            resend_api_key: None,
            api_base: "https://api.resend.com".to_string(),
            from: "Formulario Web <onboarding@resend.dev>".to_string(),
            to: Some("ventas@example.com".to_string()),
        };

        let mailer = mailer_from_config(&config).unwrap();
        assert!(matches!(
            mailer.send(&quotation()).await,
            Err(MailError::NotConfigured)
        ));
    }
}
