//! One-time-password repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{OtpEntity, OtpPurposeDb};
use crate::metrics::QueryTimer;

/// Repository for OTP code database operations.
#[derive(Clone)]
pub struct OtpRepository {
    pool: PgPool,
}

impl OtpRepository {
    /// Creates a new OtpRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a new OTP hash, invalidating any earlier unused codes for the
    /// same user and purpose.
    pub async fn create(
        &self,
        user_id: Uuid,
        code_hash: &str,
        purpose: OtpPurposeDb,
        ttl_minutes: i32,
    ) -> Result<OtpEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_otp");
        let result = async {
            let mut tx = self.pool.begin().await?;
            sqlx::query(
                "UPDATE otp_codes SET used = TRUE WHERE user_id = $1 AND purpose = $2 AND used = FALSE",
            )
            .bind(user_id)
            .bind(purpose)
            .execute(&mut *tx)
            .await?;

            let otp = sqlx::query_as::<_, OtpEntity>(
                r#"
                INSERT INTO otp_codes (user_id, code_hash, purpose, expires_at)
                VALUES ($1, $2, $3, NOW() + make_interval(mins => $4))
                RETURNING id, user_id, code_hash, purpose, used, expires_at, created_at
                "#,
            )
            .bind(user_id)
            .bind(code_hash)
            .bind(purpose)
            .bind(ttl_minutes)
            .fetch_one(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok(otp)
        }
        .await;
        timer.record();
        result
    }

    /// Find the latest unused, unexpired code for a user and purpose.
    pub async fn find_active(
        &self,
        user_id: Uuid,
        purpose: OtpPurposeDb,
    ) -> Result<Option<OtpEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_active_otp");
        let result = sqlx::query_as::<_, OtpEntity>(
            r#"
            SELECT id, user_id, code_hash, purpose, used, expires_at, created_at
            FROM otp_codes
            WHERE user_id = $1 AND purpose = $2 AND used = FALSE AND expires_at > NOW()
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(purpose)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Mark a code consumed.
    pub async fn mark_used(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("mark_otp_used");
        let result = sqlx::query("UPDATE otp_codes SET used = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }
}
