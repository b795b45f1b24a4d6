//! Document persistence for chefs and their embedded recipes.

mod memory;
mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::chef::{Chef, ChefRecipes, NewChef};
use crate::models::recipe::Recipe;
use crate::recipe::query::RecipeFilter;

pub use memory::MemoryChefStore;
pub use postgres::PgChefStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Backend(format!("malformed recipe document: {err}"))
    }
}

/// Chef document store.
///
/// Implementations must make `append_recipe` atomic per chef document so
/// concurrent appends to the same chef are never lost.
#[async_trait]
pub trait ChefStore: Send + Sync {
    /// Create a chef. Fails with `Conflict` if the name or email is taken.
    async fn create_chef(&self, chef: NewChef) -> Result<Chef, StoreError>;

    /// Look a chef up by exact name.
    async fn find_chef_by_name(&self, name: &str) -> Result<Option<Chef>, StoreError>;

    /// Append a recipe to the end of a chef's recipe list.
    async fn append_recipe(&self, chef_id: Uuid, recipe: &Recipe) -> Result<(), StoreError>;

    /// Run the flatten/filter/group pipeline.
    ///
    /// Returns the groups for the `skip`/`limit` window of matching recipes,
    /// and the total number of matches before paging.
    async fn aggregate_recipes(
        &self,
        filter: &RecipeFilter,
        skip: u64,
        limit: u64,
    ) -> Result<(Vec<ChefRecipes>, u64), StoreError>;
}
