//! Equipment repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::equipment::{EquipmentDefaults, EquipmentInput};

use crate::entities::EquipmentEntity;
use crate::metrics::QueryTimer;

const EQUIPMENT_COLUMNS: &str = "id, name, serial_number, purchase_date, warranty_information, \
     location, description, assigned_date, used_in_location, health_percentage, \
     owner_id, department_id, team_id, technician_id, category_id, company_id, \
     work_center_id, scrap, scrap_date, created_at, updated_at";

/// Repository for equipment database operations.
#[derive(Clone)]
pub struct EquipmentRepository {
    pool: PgPool,
}

impl EquipmentRepository {
    /// Creates a new EquipmentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an equipment record.
    pub async fn create(&self, input: &EquipmentInput) -> Result<EquipmentEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_equipment");
        let result = sqlx::query_as::<_, EquipmentEntity>(&format!(
            r#"
            INSERT INTO equipment
                (name, serial_number, purchase_date, warranty_information, location,
                 description, assigned_date, used_in_location, health_percentage,
                 owner_id, department_id, team_id, technician_id, category_id,
                 company_id, work_center_id, scrap)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING {EQUIPMENT_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(input.serial_number.as_deref())
        .bind(input.purchase_date)
        .bind(input.warranty_information.as_deref())
        .bind(input.location.as_deref())
        .bind(input.description.as_deref())
        .bind(input.assigned_date)
        .bind(input.used_in_location.as_deref())
        .bind(input.health_percentage)
        .bind(input.owner_id)
        .bind(input.department_id)
        .bind(input.team_id)
        .bind(input.technician_id)
        .bind(input.category_id)
        .bind(input.company_id)
        .bind(input.work_center_id)
        .bind(input.scrap)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find an equipment unit by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<EquipmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_equipment_by_id");
        let result = sqlx::query_as::<_, EquipmentEntity>(&format!(
            "SELECT {EQUIPMENT_COLUMNS} FROM equipment WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List equipment, optionally filtered by a case-insensitive name/serial
    /// search, excluding scrapped units unless asked otherwise.
    pub async fn list(
        &self,
        search: Option<&str>,
        include_scrapped: bool,
    ) -> Result<Vec<EquipmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_equipment");
        let pattern = search.map(|s| format!("%{s}%"));
        let result = match pattern {
            Some(pattern) => {
                sqlx::query_as::<_, EquipmentEntity>(&format!(
                    r#"
                    SELECT {EQUIPMENT_COLUMNS} FROM equipment
                    WHERE (name ILIKE $1 OR serial_number ILIKE $1) AND (scrap = FALSE OR $2)
                    ORDER BY name
                    "#
                ))
                .bind(pattern)
                .bind(include_scrapped)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, EquipmentEntity>(&format!(
                    r#"
                    SELECT {EQUIPMENT_COLUMNS} FROM equipment
                    WHERE scrap = FALSE OR $1
                    ORDER BY name
                    "#
                ))
                .bind(include_scrapped)
                .fetch_all(&self.pool)
                .await
            }
        };
        timer.record();
        result
    }

    /// Update an equipment record.
    pub async fn update(
        &self,
        id: Uuid,
        input: &EquipmentInput,
    ) -> Result<Option<EquipmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_equipment");
        let result = sqlx::query_as::<_, EquipmentEntity>(&format!(
            r#"
            UPDATE equipment
            SET name = $2, serial_number = $3, purchase_date = $4, warranty_information = $5,
                location = $6, description = $7, assigned_date = $8, used_in_location = $9,
                health_percentage = $10, owner_id = $11, department_id = $12, team_id = $13,
                technician_id = $14, category_id = $15, company_id = $16, work_center_id = $17,
                scrap = $18,
                scrap_date = CASE WHEN $18 AND scrap_date IS NULL THEN CURRENT_DATE
                                  WHEN NOT $18 THEN NULL
                                  ELSE scrap_date END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EQUIPMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&input.name)
        .bind(input.serial_number.as_deref())
        .bind(input.purchase_date)
        .bind(input.warranty_information.as_deref())
        .bind(input.location.as_deref())
        .bind(input.description.as_deref())
        .bind(input.assigned_date)
        .bind(input.used_in_location.as_deref())
        .bind(input.health_percentage)
        .bind(input.owner_id)
        .bind(input.department_id)
        .bind(input.team_id)
        .bind(input.technician_id)
        .bind(input.category_id)
        .bind(input.company_id)
        .bind(input.work_center_id)
        .bind(input.scrap)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Flag an equipment unit as scrapped (used instead of deletion).
    pub async fn mark_scrapped(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("mark_equipment_scrapped");
        let result = sqlx::query(
            r#"
            UPDATE equipment
            SET scrap = TRUE,
                scrap_date = COALESCE(scrap_date, CURRENT_DATE),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map(|r| r.rows_affected() > 0);
        timer.record();
        result
    }

    /// Defaults copied onto a new maintenance request for this unit.
    pub async fn defaults_for_request(
        &self,
        id: Uuid,
    ) -> Result<Option<EquipmentDefaults>, sqlx::Error> {
        let timer = QueryTimer::new("equipment_defaults_for_request");
        let result = sqlx::query_as::<_, (Option<Uuid>, Uuid, Option<Uuid>)>(
            "SELECT category_id, team_id, technician_id FROM equipment WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map(|row| {
            row.map(|(category_id, team_id, technician_id)| EquipmentDefaults {
                category_id,
                team_id: Some(team_id),
                technician_id,
            })
        });
        timer.record();
        result
    }

    /// Count equipment referencing a category.
    pub async fn count_for_category(&self, category_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_equipment_for_category");
        let result =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM equipment WHERE category_id = $1")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Count equipment referencing a department.
    pub async fn count_for_department(&self, department_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_equipment_for_department");
        let result =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM equipment WHERE department_id = $1")
                .bind(department_id)
                .fetch_one(&self.pool)
                .await;
        timer.record();
        result
    }

    /// Count equipment referencing a team.
    pub async fn count_for_team(&self, team_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_equipment_for_team");
        let result =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM equipment WHERE team_id = $1")
                .bind(team_id)
                .fetch_one(&self.pool)
                .await;
        timer.record();
        result
    }
}
