use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend,
    EntityTrait, IsolationLevel, QueryFilter, QueryResult, Set, SqlErr, Statement,
    TransactionTrait, Value,
};
use uuid::Uuid;

use super::{ChefStore, StoreError};
use crate::entity::chef;
use crate::models::chef::{Chef, ChefIdentity, ChefRecipes, NewChef};
use crate::models::recipe::Recipe;
use crate::models::shared::escape_like;
use crate::recipe::query::{RecipeFilter, group_by_chef};

/// PostgreSQL-backed store. One row per chef, recipes in a JSONB array.
#[derive(Debug, Clone)]
pub struct PgChefStore {
    db: DatabaseConnection,
}

impl PgChefStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Matches one unnested recipe `r.recipe` against `$1` (title pattern),
/// `$2` (labels) and `$3` (ingredients). Empty arrays disable a filter.
const MATCHES_SQL: &str = r#"
    FROM chef c
    CROSS JOIN LATERAL jsonb_array_elements(c.recipes) WITH ORDINALITY AS r(recipe, ord)
    WHERE ($1::text IS NULL OR r.recipe->>'title' ILIKE $1 ESCAPE '\')
      AND (jsonb_array_length($2::jsonb) = 0 OR EXISTS (
            SELECT 1 FROM jsonb_array_elements_text(r.recipe->'labels') l
            WHERE l IN (SELECT jsonb_array_elements_text($2::jsonb))))
      AND (jsonb_array_length($3::jsonb) = 0 OR EXISTS (
            SELECT 1 FROM jsonb_array_elements_text(r.recipe->'ingredients') i
            WHERE i IN (SELECT jsonb_array_elements_text($3::jsonb))))
"#;

fn filter_values(filter: &RecipeFilter) -> Vec<Value> {
    let title = filter
        .title
        .as_deref()
        .map(|t| format!("%{}%", escape_like(t)));
    vec![
        title.into(),
        serde_json::json!(filter.labels).into(),
        serde_json::json!(filter.ingredients).into(),
    ]
}

fn into_chef(model: chef::Model) -> Result<Chef, StoreError> {
    let recipes: Vec<Recipe> = serde_json::from_value(model.recipes)?;
    Ok(Chef {
        id: model.id,
        name: model.name,
        email: model.email,
        password_hash: model.password,
        recipes,
        created_at: model.created_at,
    })
}

fn matched_row(row: &QueryResult) -> Result<(ChefIdentity, Recipe), StoreError> {
    let identity = ChefIdentity {
        chef_id: row.try_get("", "chef_id")?,
        name: row.try_get("", "name")?,
        email: row.try_get("", "email")?,
    };
    let recipe: serde_json::Value = row.try_get("", "recipe")?;
    Ok((identity, serde_json::from_value(recipe)?))
}

#[async_trait]
impl ChefStore for PgChefStore {
    async fn create_chef(&self, new_chef: NewChef) -> Result<Chef, StoreError> {
        let model = chef::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(new_chef.name),
            email: Set(new_chef.email),
            password: Set(new_chef.password_hash),
            recipes: Set(serde_json::json!([])),
            created_at: Set(Utc::now()),
        };

        let model = model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                StoreError::Conflict("Chef name or email is already registered".into())
            }
            _ => StoreError::from(e),
        })?;
        into_chef(model)
    }

    async fn find_chef_by_name(&self, name: &str) -> Result<Option<Chef>, StoreError> {
        chef::Entity::find()
            .filter(chef::Column::Name.eq(name))
            .one(&self.db)
            .await?
            .map(into_chef)
            .transpose()
    }

    async fn append_recipe(&self, chef_id: Uuid, recipe: &Recipe) -> Result<(), StoreError> {
        let doc = serde_json::to_value(recipe)?;
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "UPDATE chef SET recipes = recipes || jsonb_build_array($1::jsonb) WHERE id = $2",
            [doc.into(), chef_id.into()],
        );
        let result = self.db.execute_raw(stmt).await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Chef {chef_id} not found")));
        }
        Ok(())
    }

    async fn aggregate_recipes(
        &self,
        filter: &RecipeFilter,
        skip: u64,
        limit: u64,
    ) -> Result<(Vec<ChefRecipes>, u64), StoreError> {
        // Both statements read one snapshot so `total` matches the page.
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::RepeatableRead), Some(AccessMode::ReadOnly))
            .await?;

        let count_stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!("SELECT count(*) AS total {MATCHES_SQL}"),
            filter_values(filter),
        );
        let total: i64 = match txn.query_one_raw(count_stmt).await? {
            Some(row) => row.try_get("", "total")?,
            None => 0,
        };

        let mut values = filter_values(filter);
        values.push(i64::try_from(skip).unwrap_or(i64::MAX).into());
        values.push(i64::try_from(limit).unwrap_or(i64::MAX).into());
        let page_stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            format!(
                "SELECT c.id AS chef_id, c.name, c.email, r.recipe {MATCHES_SQL} \
                 ORDER BY c.created_at, c.id, r.ord OFFSET $4 LIMIT $5"
            ),
            values,
        );
        let rows = txn.query_all_raw(page_stmt).await?;
        txn.commit().await?;

        let matched = rows
            .iter()
            .map(matched_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((group_by_chef(matched), u64::try_from(total).unwrap_or_default()))
    }
}
