//! Company domain models.
//!
//! Companies optionally carry their own SMTP settings; when present they
//! override the globally configured sender for mail addressed to that
//! company's users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-company SMTP configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CompanySmtpSettings {
    #[serde(default)]
    pub smtp_server: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default = "default_smtp_tls")]
    pub smtp_use_tls: bool,
    #[serde(default)]
    pub smtp_use_ssl: bool,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
    #[serde(default)]
    pub smtp_sender_name: Option<String>,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_smtp_tls() -> bool {
    true
}

impl CompanySmtpSettings {
    /// A company only overrides the global sender with full credentials.
    pub fn is_configured(&self) -> bool {
        self.smtp_username.as_deref().is_some_and(|u| !u.is_empty())
            && self.smtp_password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Request to create or update a company.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CompanyInput {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub smtp: CompanySmtpSettings,
}

/// Company representation returned by the API.
///
/// The SMTP password is never echoed back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CompanyItem {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub has_email_config: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smtp_is_configured_requires_credentials() {
        let mut smtp = CompanySmtpSettings {
            smtp_server: Some("smtp.example.com".into()),
            smtp_port: 587,
            smtp_use_tls: true,
            smtp_use_ssl: false,
            smtp_username: None,
            smtp_password: None,
            smtp_sender_name: None,
        };
        assert!(!smtp.is_configured());

        smtp.smtp_username = Some("mailer".into());
        assert!(!smtp.is_configured());

        smtp.smtp_password = Some("hunter2".into());
        assert!(smtp.is_configured());

        smtp.smtp_username = Some(String::new());
        assert!(!smtp.is_configured());
    }
}
