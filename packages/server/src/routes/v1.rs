use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/chefs", chef_routes())
        .nest("/recipes", recipe_routes())
}

fn chef_routes() -> Router<AppState> {
    Router::new().route("/", post(handlers::chef::register_chef))
}

fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::recipe::list_recipes).post(handlers::recipe::create_recipe),
        )
        .layer(handlers::recipe::recipe_upload_body_limit())
}
