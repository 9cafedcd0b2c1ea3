//! Company repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::company::CompanyInput;

use crate::entities::CompanyEntity;
use crate::metrics::QueryTimer;

const COMPANY_COLUMNS: &str = "id, name, address, phone, email, smtp_server, smtp_port, \
     smtp_use_tls, smtp_use_ssl, smtp_username, smtp_password, smtp_sender_name, \
     created_at, updated_at";

/// Repository for company database operations.
#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    /// Creates a new CompanyRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a company.
    pub async fn create(&self, input: &CompanyInput) -> Result<CompanyEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_company");
        let result = sqlx::query_as::<_, CompanyEntity>(&format!(
            r#"
            INSERT INTO companies
                (name, address, phone, email, smtp_server, smtp_port, smtp_use_tls,
                 smtp_use_ssl, smtp_username, smtp_password, smtp_sender_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(input.address.as_deref())
        .bind(input.phone.as_deref())
        .bind(input.email.as_deref())
        .bind(input.smtp.smtp_server.as_deref())
        .bind(i32::from(input.smtp.smtp_port))
        .bind(input.smtp.smtp_use_tls)
        .bind(input.smtp.smtp_use_ssl)
        .bind(input.smtp.smtp_username.as_deref())
        .bind(input.smtp.smtp_password.as_deref())
        .bind(input.smtp.smtp_sender_name.as_deref())
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a company by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CompanyEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_company_by_id");
        let result = sqlx::query_as::<_, CompanyEntity>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List companies, sorted by name.
    pub async fn list(&self) -> Result<Vec<CompanyEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_companies");
        let result = sqlx::query_as::<_, CompanyEntity>(&format!(
            "SELECT {COMPANY_COLUMNS} FROM companies ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a company.
    pub async fn update(
        &self,
        id: Uuid,
        input: &CompanyInput,
    ) -> Result<Option<CompanyEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_company");
        let result = sqlx::query_as::<_, CompanyEntity>(&format!(
            r#"
            UPDATE companies
            SET name = $2, address = $3, phone = $4, email = $5, smtp_server = $6,
                smtp_port = $7, smtp_use_tls = $8, smtp_use_ssl = $9, smtp_username = $10,
                smtp_password = COALESCE($11, smtp_password), smtp_sender_name = $12,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COMPANY_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.name)
        .bind(input.address.as_deref())
        .bind(input.phone.as_deref())
        .bind(input.email.as_deref())
        .bind(input.smtp.smtp_server.as_deref())
        .bind(i32::from(input.smtp.smtp_port))
        .bind(input.smtp.smtp_use_tls)
        .bind(input.smtp.smtp_use_ssl)
        .bind(input.smtp.smtp_username.as_deref())
        .bind(input.smtp.smtp_password.as_deref())
        .bind(input.smtp.smtp_sender_name.as_deref())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Delete a company.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_company");
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Count rows in other tables still pointing at a company.
    pub async fn count_references(&self, id: Uuid) -> Result<CompanyReferences, sqlx::Error> {
        let timer = QueryTimer::new("count_company_references");
        let result = sqlx::query_as::<_, CompanyReferences>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users WHERE company_id = $1) AS users,
                (SELECT COUNT(*) FROM equipment WHERE company_id = $1) AS equipment,
                (SELECT COUNT(*) FROM equipment_categories WHERE company_id = $1) AS categories,
                (SELECT COUNT(*) FROM teams WHERE company_id = $1) AS teams
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

/// Per-table reference counts used by the delete guard.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompanyReferences {
    pub users: i64,
    pub equipment: i64,
    pub categories: i64,
    pub teams: i64,
}

impl CompanyReferences {
    pub fn total(&self) -> i64 {
        self.users + self.equipment + self.categories + self.teams
    }
}
