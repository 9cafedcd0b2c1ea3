//! User repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{UserEntity, UserWithLoadEntity};
use crate::metrics::QueryTimer;

const USER_COLUMNS: &str = "id, username, email, password_hash, full_name, is_admin, \
     is_third_party, email_verified, phone, position, employee_id, hire_date, \
     department_id, company_id, is_active, created_at, updated_at";

/// Fields for creating a user account.
#[derive(Debug, Clone)]
pub struct UserInsert {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub is_admin: bool,
    pub is_third_party: bool,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub employee_id: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub department_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
}

/// Fields for updating a user account.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub email: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub employee_id: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub department_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub is_active: bool,
    /// Replaced only when a new password was supplied.
    pub password_hash: Option<String>,
}

/// Repository for user-related database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a user account.
    pub async fn create(&self, input: &UserInsert) -> Result<UserEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_user");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            INSERT INTO users
                (username, email, password_hash, full_name, is_admin, is_third_party,
                 phone, position, employee_id, hire_date, department_id, company_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(input.full_name.as_deref())
        .bind(input.is_admin)
        .bind(input.is_third_party)
        .bind(input.phone.as_deref())
        .bind(input.position.as_deref())
        .bind(input.employee_id.as_deref())
        .bind(input.hire_date)
        .bind(input.department_id)
        .bind(input.company_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_id");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by username.
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_username");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_by_email");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List non-admin workers with their open allocated request counts.
    pub async fn list_workers_with_load(&self) -> Result<Vec<UserWithLoadEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_workers_with_load");
        let result = sqlx::query_as::<_, UserWithLoadEntity>(&format!(
            r#"
            SELECT {USER_COLUMNS},
                   (SELECT COUNT(*) FROM maintenance_requests mr
                    WHERE mr.allocated_to = users.id
                      AND mr.allocation_status IN ('allocated', 'accepted', 'in_progress')
                   ) AS open_request_count
            FROM users
            WHERE is_admin = FALSE
            ORDER BY username
            "#
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a user account. The password hash only changes when supplied.
    pub async fn update(
        &self,
        id: Uuid,
        update: &UserUpdate,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_user");
        let result = sqlx::query_as::<_, UserEntity>(&format!(
            r#"
            UPDATE users
            SET email = $2, full_name = $3, phone = $4, position = $5, employee_id = $6,
                hire_date = $7, department_id = $8, company_id = $9, is_active = $10,
                password_hash = COALESCE($11, password_hash), updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&update.email)
        .bind(update.full_name.as_deref())
        .bind(update.phone.as_deref())
        .bind(update.position.as_deref())
        .bind(update.employee_id.as_deref())
        .bind(update.hire_date)
        .bind(update.department_id)
        .bind(update.company_id)
        .bind(update.is_active)
        .bind(update.password_hash.as_deref())
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace a user's password hash.
    pub async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("set_user_password_hash");
        let result =
            sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(password_hash)
                .execute(&self.pool)
                .await
                .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Mark a user's email address verified.
    pub async fn mark_email_verified(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("mark_user_email_verified");
        let result =
            sqlx::query("UPDATE users SET email_verified = TRUE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Deactivate a worker account. Accounts are never hard-deleted because
    /// closed requests keep referencing them.
    pub async fn deactivate(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("deactivate_user");
        let result =
            sqlx::query("UPDATE users SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
                .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Count users belonging to a department.
    pub async fn count_for_department(&self, department_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_users_for_department");
        let result =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE department_id = $1")
                .bind(department_id)
                .fetch_one(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Fetch every active admin as a recipient (id, email, name).
    pub async fn find_admin_recipients(
        &self,
    ) -> Result<Vec<(Uuid, String, Option<String>)>, sqlx::Error> {
        let timer = QueryTimer::new("find_admin_recipients");
        let result = sqlx::query_as::<_, (Uuid, String, Option<String>)>(
            "SELECT id, email, full_name FROM users WHERE is_admin = TRUE AND is_active = TRUE",
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Fetch recipients (id, email, name) for a set of user IDs.
    pub async fn find_recipients(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<(Uuid, String, Option<String>)>, sqlx::Error> {
        let timer = QueryTimer::new("find_user_recipients");
        let result = sqlx::query_as::<_, (Uuid, String, Option<String>)>(
            "SELECT id, email, full_name FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
