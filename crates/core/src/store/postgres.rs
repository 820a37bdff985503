use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use uuid::Uuid;

use super::{ResourceStore, SectionStore, StoreError, StoreResult, UserStore};
use crate::resource::model::ResourceRow;
use crate::resource::{ResourceKind, ResourceRecord};
use crate::section::{GlobalSection, NewGlobalSection, SectionFilter, SectionUpdate};
use crate::user::{User, UserChanges, UserDraft, UserRow};

/// PostgreSQL-backed store. Schema lives in `migrations/`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Turn a unique-constraint violation into [`StoreError::Conflict`].
fn conflict_on_unique(what: String) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |err| {
        let unique = matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation());
        if unique {
            StoreError::Conflict(what)
        } else {
            StoreError::Database(err)
        }
    }
}

#[async_trait]
impl SectionStore for PgStore {
    async fn list_sections(&self, filter: &SectionFilter) -> StoreResult<Vec<GlobalSection>> {
        let sections = sqlx::query_as::<_, GlobalSection>(
            r#"
            SELECT *
            FROM global_sections
            WHERE ($1::text IS NULL OR section_key = $1)
              AND ($2::boolean IS NULL OR is_active = $2)
            ORDER BY created_at, id
            "#,
        )
        .bind(filter.section_key.as_deref())
        .bind(filter.is_active)
        .fetch_all(&self.pool)
        .await?;
        Ok(sections)
    }

    async fn find_section(&self, id: Uuid) -> StoreResult<Option<GlobalSection>> {
        let section =
            sqlx::query_as::<_, GlobalSection>("SELECT * FROM global_sections WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(section)
    }

    async fn find_section_by_key(&self, key: &str) -> StoreResult<Option<GlobalSection>> {
        let section = sqlx::query_as::<_, GlobalSection>(
            "SELECT * FROM global_sections WHERE section_key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(section)
    }

    async fn insert_section(&self, section: NewGlobalSection) -> StoreResult<GlobalSection> {
        sqlx::query_as::<_, GlobalSection>(
            r#"
            INSERT INTO global_sections (id, section_key, data_fr, data_en, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&section.section_key)
        .bind(&section.data_fr)
        .bind(&section.data_en)
        .bind(section.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(conflict_on_unique(format!("section `{}`", section.section_key)))
    }

    async fn update_section(
        &self,
        id: Uuid,
        update: SectionUpdate,
    ) -> StoreResult<Option<GlobalSection>> {
        let key_label = format!(
            "section `{}`",
            update.section_key.as_deref().unwrap_or_default()
        );
        // The version predicate makes the check and the write one statement.
        let updated = sqlx::query_as::<_, GlobalSection>(
            r#"
            UPDATE global_sections
            SET section_key = COALESCE($2, section_key),
                data_fr = COALESCE($3, data_fr),
                data_en = COALESCE($4, data_en),
                is_active = COALESCE($5, is_active),
                version = version + 1,
                updated_at = now()
            WHERE id = $1 AND ($6::integer IS NULL OR version = $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(update.section_key.as_deref())
        .bind(&update.data_fr)
        .bind(&update.data_en)
        .bind(update.is_active)
        .bind(update.version)
        .fetch_optional(&self.pool)
        .await
        .map_err(conflict_on_unique(key_label))?;

        if updated.is_some() {
            return Ok(updated);
        }
        match (update.version, self.find_section(id).await?) {
            (Some(expected), Some(current)) => Err(StoreError::VersionConflict {
                expected,
                actual: current.version,
            }),
            _ => Ok(None),
        }
    }

    async fn delete_section(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM global_sections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// Table names come from `ResourceKind::table`, never from request input.
#[async_trait]
impl ResourceStore for PgStore {
    async fn list_resources(&self, kind: ResourceKind) -> StoreResult<Vec<ResourceRecord>> {
        let sql = format!(
            "SELECT id, data, created_at, updated_at FROM {} ORDER BY created_at, id",
            kind.table()
        );
        let rows = sqlx::query_as::<_, ResourceRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.into_record(kind)).collect())
    }

    async fn find_resource(
        &self,
        kind: ResourceKind,
        id: Uuid,
    ) -> StoreResult<Option<ResourceRecord>> {
        let sql = format!(
            "SELECT id, data, created_at, updated_at FROM {} WHERE id = $1",
            kind.table()
        );
        let row = sqlx::query_as::<_, ResourceRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.into_record(kind)))
    }

    async fn insert_resource(
        &self,
        kind: ResourceKind,
        data: Map<String, Value>,
    ) -> StoreResult<ResourceRecord> {
        let sql = format!(
            "INSERT INTO {} (id, data) VALUES ($1, $2) RETURNING id, data, created_at, updated_at",
            kind.table()
        );
        let row = sqlx::query_as::<_, ResourceRow>(&sql)
            .bind(Uuid::now_v7())
            .bind(Value::Object(data))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into_record(kind))
    }

    async fn update_resource(
        &self,
        kind: ResourceKind,
        id: Uuid,
        changes: Map<String, Value>,
    ) -> StoreResult<Option<ResourceRecord>> {
        let sql = format!(
            r#"
            UPDATE {}
            SET data = data || $2, updated_at = now()
            WHERE id = $1
            RETURNING id, data, created_at, updated_at
            "#,
            kind.table()
        );
        let row = sqlx::query_as::<_, ResourceRow>(&sql)
            .bind(id)
            .bind(Value::Object(changes))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.into_record(kind)))
    }

    async fn delete_resource(&self, kind: ResourceKind, id: Uuid) -> StoreResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn insert_user(&self, draft: UserDraft) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, email, name, role, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(&draft.email)
        .bind(&draft.name)
        .bind(draft.role.as_str())
        .bind(&draft.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(conflict_on_unique(format!("user `{}`", draft.email)))?;
        Ok(row.into())
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        let email_label = format!("user `{}`", changes.email.as_deref().unwrap_or_default());
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                name = COALESCE($3, name),
                role = COALESCE($4, role),
                password_hash = COALESCE($5, password_hash),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.email.as_deref())
        .bind(changes.name.as_deref())
        .bind(changes.role.map(|r| r.as_str()))
        .bind(changes.password_hash.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(conflict_on_unique(email_label))?;
        Ok(row.map(User::from))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
