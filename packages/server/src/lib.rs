pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod recipe;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;

use std::time::Duration;

use axum::http::HeaderValue;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as ScalarServable};

use crate::config::CorsConfig;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Recipe Sharing API",
        version = "1.0.0",
        description = "Chefs publish recipes with a photo; anyone can browse them grouped by chef"
    ),
    paths(
        handlers::chef::register_chef,
        handlers::recipe::create_recipe,
        handlers::recipe::list_recipes,
    ),
    components(schemas(
        error::ErrorBody,
        models::chef::RegisterChefRequest,
        models::chef::ChefResponse,
        models::chef::ChefRecipes,
        models::recipe::Recipe,
        models::recipe::CreateRecipeResponse,
        models::recipe::RecipeListResponse,
        models::shared::Pagination,
    )),
    tags(
        (name = "Chefs", description = "Chef signup"),
        (name = "Recipes", description = "Recipe upload and search"),
    ),
)]
struct ApiDoc;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allow_origins
        .iter()
        .filter_map(|s| HeaderValue::from_str(s).ok())
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(config.max_age))
}

/// Build the application router.
pub fn build_router(state: AppState) -> axum::Router {
    let cors = cors_layer(&state.config.server.cors);

    axum::Router::new()
        .nest("/api", routes::api_routes())
        .with_state(state)
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
