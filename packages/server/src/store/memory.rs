use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use super::{ChefStore, StoreError};
use crate::models::chef::{Chef, ChefRecipes, NewChef};
use crate::models::recipe::Recipe;
use crate::recipe::query::{RecipeFilter, flatten_filter_group};

/// In-process document store.
///
/// Each chef document sits in its own map entry, so an append only holds
/// that entry's shard lock and never across an `.await`.
#[derive(Debug, Default)]
pub struct MemoryChefStore {
    chefs: DashMap<Uuid, Chef>,
    by_name: DashMap<String, Uuid>,
    by_email: DashMap<String, Uuid>,
}

impl MemoryChefStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chefs ordered by creation.
    fn snapshot(&self) -> Vec<Chef> {
        let mut chefs: Vec<Chef> = self.chefs.iter().map(|e| e.value().clone()).collect();
        chefs.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        chefs
    }
}

#[async_trait]
impl ChefStore for MemoryChefStore {
    async fn create_chef(&self, chef: NewChef) -> Result<Chef, StoreError> {
        let id = Uuid::now_v7();
        let email_key = chef.email.to_lowercase();

        match self.by_email.entry(email_key.clone()) {
            Entry::Occupied(_) => {
                return Err(StoreError::Conflict("Email is already registered".into()));
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }
        match self.by_name.entry(chef.name.clone()) {
            Entry::Occupied(_) => {
                self.by_email.remove(&email_key);
                return Err(StoreError::Conflict("Chef name is already taken".into()));
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let chef = Chef {
            id,
            name: chef.name,
            email: chef.email,
            password_hash: chef.password_hash,
            recipes: Vec::new(),
            created_at: Utc::now(),
        };
        self.chefs.insert(id, chef.clone());
        Ok(chef)
    }

    async fn find_chef_by_name(&self, name: &str) -> Result<Option<Chef>, StoreError> {
        let Some(id) = self.by_name.get(name).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        Ok(self.chefs.get(&id).map(|entry| entry.value().clone()))
    }

    async fn append_recipe(&self, chef_id: Uuid, recipe: &Recipe) -> Result<(), StoreError> {
        let mut chef = self
            .chefs
            .get_mut(&chef_id)
            .ok_or_else(|| StoreError::NotFound(format!("Chef {chef_id} not found")))?;
        chef.recipes.push(recipe.clone());
        Ok(())
    }

    async fn aggregate_recipes(
        &self,
        filter: &RecipeFilter,
        skip: u64,
        limit: u64,
    ) -> Result<(Vec<ChefRecipes>, u64), StoreError> {
        let chefs = self.snapshot();
        Ok(flatten_filter_group(&chefs, filter, skip, limit))
    }
}
