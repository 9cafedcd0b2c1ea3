//! Team repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{TeamEntity, TeamWithCountsEntity};
use crate::metrics::QueryTimer;

const TEAM_COUNTS_QUERY: &str = r#"
SELECT t.id, t.name, t.company_id,
       (SELECT COUNT(*) FROM team_members tm WHERE tm.team_id = t.id) AS member_count,
       (SELECT COUNT(*) FROM equipment e WHERE e.team_id = t.id) AS equipment_count,
       (SELECT COUNT(*) FROM maintenance_requests mr WHERE mr.team_id = t.id) AS request_count,
       (SELECT COUNT(*) FROM maintenance_requests mr
        WHERE mr.team_id = t.id AND mr.stage IN ('new', 'in_progress')) AS open_request_count,
       t.created_at
FROM teams t
"#;

/// Repository for maintenance team database operations.
#[derive(Clone)]
pub struct TeamRepository {
    pool: PgPool,
}

impl TeamRepository {
    /// Creates a new TeamRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a team and attach its initial members.
    pub async fn create(
        &self,
        name: &str,
        company_id: Option<Uuid>,
        member_ids: &[Uuid],
    ) -> Result<TeamEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_team");
        let result = async {
            let mut tx = self.pool.begin().await?;
            let team = sqlx::query_as::<_, TeamEntity>(
                r#"
                INSERT INTO teams (name, company_id)
                VALUES ($1, $2)
                RETURNING id, name, company_id, created_at, updated_at
                "#,
            )
            .bind(name)
            .bind(company_id)
            .fetch_one(&mut *tx)
            .await?;

            for member_id in member_ids {
                sqlx::query(
                    "INSERT INTO team_members (team_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
                )
                .bind(team.id)
                .bind(member_id)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;
            Ok(team)
        }
        .await;
        timer.record();
        result
    }

    /// Find a team by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<TeamEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_team_by_id");
        let result = sqlx::query_as::<_, TeamEntity>(
            "SELECT id, name, company_id, created_at, updated_at FROM teams WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a team by ID with its usage counters.
    pub async fn find_with_counts(
        &self,
        id: Uuid,
    ) -> Result<Option<TeamWithCountsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_team_with_counts");
        let result = sqlx::query_as::<_, TeamWithCountsEntity>(&format!(
            "{TEAM_COUNTS_QUERY} WHERE t.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List teams with usage counters, sorted by name.
    pub async fn list_with_counts(&self) -> Result<Vec<TeamWithCountsEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_teams_with_counts");
        let result = sqlx::query_as::<_, TeamWithCountsEntity>(&format!(
            "{TEAM_COUNTS_QUERY} ORDER BY t.name"
        ))
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update a team and replace its member set.
    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        company_id: Option<Uuid>,
        member_ids: &[Uuid],
    ) -> Result<Option<TeamEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_team");
        let result = async {
            let mut tx = self.pool.begin().await?;
            let team = sqlx::query_as::<_, TeamEntity>(
                r#"
                UPDATE teams SET name = $2, company_id = $3, updated_at = NOW()
                WHERE id = $1
                RETURNING id, name, company_id, created_at, updated_at
                "#,
            )
            .bind(id)
            .bind(name)
            .bind(company_id)
            .fetch_optional(&mut *tx)
            .await?;

            if team.is_some() {
                sqlx::query("DELETE FROM team_members WHERE team_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                for member_id in member_ids {
                    sqlx::query("INSERT INTO team_members (team_id, user_id) VALUES ($1, $2)")
                        .bind(id)
                        .bind(member_id)
                        .execute(&mut *tx)
                        .await?;
                }
            }

            tx.commit().await?;
            Ok(team)
        }
        .await;
        timer.record();
        result
    }

    /// Delete a team. Reference checks are done by the caller.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_team");
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }
}
