use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use super::shared::Pagination;
use super::chef::ChefRecipes;

/// A recipe embedded in its chef's document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Recipe ID (UUIDv7).
    #[schema(example = "01936f0e-1234-7abc-8000-000000000001")]
    pub id: Uuid,
    #[schema(example = "Soup")]
    pub title: String,
    pub publication_date: DateTime<Utc>,
    #[schema(example = json!(["vegan"]))]
    pub labels: Vec<String>,
    #[schema(example = "A warm tomato soup")]
    pub description: String,
    #[schema(example = json!(["tomato", "salt"]))]
    pub ingredients: Vec<String>,
    #[schema(example = json!(["chop", "boil"]))]
    pub steps: Vec<String>,
    /// Path of the resized 800x600 JPEG.
    #[schema(example = "uploads/resized/1700000000000-0f9e.jpg")]
    pub recipe_image: String,
}

/// Query parameters for listing recipes.
///
/// `page` and `limit` stay loosely typed here; `PageRequest::from_raw`
/// applies the defaults and clamping.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListQuery {
    /// 1-based page number. Default 1.
    pub page: Option<i64>,
    /// Page size, 1-100. Default 10.
    pub limit: Option<i64>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Comma-separated labels; a recipe matches if it has any of them.
    pub labels: Option<String>,
    /// Comma-separated ingredients; a recipe matches if it uses any of them.
    pub ingredients: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RecipeListResponse {
    pub data: Vec<ChefRecipes>,
    pub pagination: Pagination,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CreateRecipeResponse {
    #[schema(example = "Recipe added successfully")]
    pub message: String,
    pub recipe: Recipe,
}
