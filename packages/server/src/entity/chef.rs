use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Chef document. Recipes are embedded as a JSONB array in insertion order.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chef")]
pub struct Model {
    /// UUIDv7 primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 PHC string.
    pub password: String,

    #[sea_orm(column_type = "JsonBinary")]
    pub recipes: serde_json::Value,

    #[sea_orm(indexed)]
    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
