//! Company entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the companies table.
///
/// SMTP credentials are stored alongside the company; the persistence layer
/// returns them only to the mailer, never through listing queries.
#[derive(Debug, Clone, FromRow)]
pub struct CompanyEntity {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub smtp_server: Option<String>,
    pub smtp_port: i32,
    pub smtp_use_tls: bool,
    pub smtp_use_ssl: bool,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_sender_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
