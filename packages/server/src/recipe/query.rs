use std::sync::Arc;

use crate::models::chef::{Chef, ChefIdentity, ChefRecipes};
use crate::models::recipe::Recipe;
use crate::models::shared::{Pagination, split_list};
use crate::store::{ChefStore, StoreError};

/// Optional, conjunctive recipe filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Case-insensitive title substring.
    pub title: Option<String>,
    /// Matches recipes sharing at least one label.
    pub labels: Vec<String>,
    /// Matches recipes sharing at least one ingredient.
    pub ingredients: Vec<String>,
}

impl RecipeFilter {
    /// Build a filter from raw query strings. Lists are comma-separated.
    pub fn from_raw(title: Option<&str>, labels: Option<&str>, ingredients: Option<&str>) -> Self {
        Self {
            title: title
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            labels: split_list(labels),
            ingredients: split_list(ingredients),
        }
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        if let Some(title) = &self.title
            && !recipe.title.to_lowercase().contains(&title.to_lowercase())
        {
            return false;
        }
        if !self.labels.is_empty() && !intersects(&recipe.labels, &self.labels) {
            return false;
        }
        if !self.ingredients.is_empty() && !intersects(&recipe.ingredients, &self.ingredients) {
            return false;
        }
        true
    }
}

fn intersects(have: &[String], wanted: &[String]) -> bool {
    have.iter().any(|item| wanted.contains(item))
}

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub const DEFAULT_PAGE: u64 = 1;
    pub const DEFAULT_LIMIT: u64 = 10;
    pub const MAX_LIMIT: u64 = 100;

    /// Clamp loosely-typed input: a missing or non-positive `page` becomes 1,
    /// a missing or non-positive `limit` becomes 10, and `limit` is capped at 100.
    pub fn from_raw(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page
            .and_then(|p| u64::try_from(p).ok())
            .filter(|&p| p >= 1)
            .unwrap_or(Self::DEFAULT_PAGE);
        let limit = limit
            .and_then(|l| u64::try_from(l).ok())
            .filter(|&l| l >= 1)
            .map_or(Self::DEFAULT_LIMIT, |l| l.min(Self::MAX_LIMIT));
        Self { page, limit }
    }

    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// One page of grouped results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipePage {
    pub data: Vec<ChefRecipes>,
    pub pagination: Pagination,
}

/// Runs filtered, paginated recipe queries against a [`ChefStore`].
#[derive(Clone)]
pub struct RecipeQueryEngine {
    store: Arc<dyn ChefStore>,
}

impl RecipeQueryEngine {
    pub fn new(store: Arc<dyn ChefStore>) -> Self {
        Self { store }
    }

    pub async fn query(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<RecipePage, StoreError> {
        let (data, total) = self
            .store
            .aggregate_recipes(filter, page.skip(), page.limit)
            .await?;
        tracing::debug!(total, groups = data.len(), "recipe query");

        Ok(RecipePage {
            data,
            pagination: Pagination::new(page.page, page.limit, total),
        })
    }
}

/// Flatten chefs into (chef, recipe) rows, keep the matching ones, take the
/// `skip`/`limit` window, and regroup by chef.
///
/// `chefs` must already be in creation order. Returns the groups and the
/// total match count before paging.
pub fn flatten_filter_group<'a>(
    chefs: impl IntoIterator<Item = &'a Chef>,
    filter: &RecipeFilter,
    skip: u64,
    limit: u64,
) -> (Vec<ChefRecipes>, u64) {
    let mut total = 0u64;
    let mut window = Vec::new();

    for chef in chefs {
        for recipe in chef.recipes.iter().filter(|r| filter.matches(r)) {
            if total >= skip && total - skip < limit {
                window.push((chef.identity(), recipe.clone()));
            }
            total += 1;
        }
    }

    (group_by_chef(window), total)
}

/// Regroup ordered rows by chef. Groups appear in order of their first row.
pub fn group_by_chef(rows: impl IntoIterator<Item = (ChefIdentity, Recipe)>) -> Vec<ChefRecipes> {
    let mut groups: Vec<ChefRecipes> = Vec::new();
    for (identity, recipe) in rows {
        match groups.iter_mut().find(|g| g.chef_id == identity.chef_id) {
            Some(group) => group.recipes.push(recipe),
            None => {
                let mut group = ChefRecipes::new(identity);
                group.recipes.push(recipe);
                groups.push(group);
            }
        }
    }
    groups
}
