use axum::extract::multipart::Field;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::{Json, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::query::AppQuery;
use crate::models::recipe::{CreateRecipeResponse, RecipeListQuery, RecipeListResponse};
use crate::recipe::{IngestRequest, PageRequest, RecipeFields, RecipeFilter, UploadedImage};
use crate::state::AppState;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "recipeImage";

/// Must stay above `media.max_upload_bytes` so oversized images reach the validator.
pub fn recipe_upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(16 * 1024 * 1024) // 16 MB
}

#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    tag = "Recipes",
    operation_id = "createRecipe",
    summary = "Add a recipe to a chef",
    description = "Multipart upload. Text fields: `name` (chef), `title`, `description`, \
        `publicationDate` (RFC 3339, optional). Repeatable fields: `labels`, `ingredients`, \
        `steps` (a trailing `[]` on the field name is accepted). File field: `recipeImage`, \
        any `image/*` type up to the configured size. The image is stored as an 800x600 JPEG.",
    request_body(content_type = "multipart/form-data", description = "Recipe fields and image"),
    responses(
        (status = 201, description = "Recipe added", body = CreateRecipeResponse),
        (
            status = 400,
            description = "Bad input (VALIDATION_ERROR, UNSUPPORTED_MEDIA_TYPE, PAYLOAD_TOO_LARGE)",
            body = ErrorBody
        ),
        (status = 404, description = "Chef not found (NOT_FOUND)", body = ErrorBody),
        (
            status = 500,
            description = "Image could not be processed (INTERNAL_ERROR)",
            body = ErrorBody
        ),
    ),
)]
#[instrument(skip(state, multipart))]
pub async fn create_recipe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let max_size = state.ingestor.media().max_upload_bytes;

    let mut chef_name: Option<String> = None;
    let mut fields = RecipeFields::default();
    let mut image: Option<UploadedImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let Some(name) = field.name().map(|n| n.trim_end_matches("[]").to_string()) else {
            continue;
        };

        match name.as_str() {
            IMAGE_FIELD => image = Some(read_image(field, max_size).await?),
            "name" => chef_name = Some(field_text(field).await?),
            "title" => fields.title = Some(field_text(field).await?),
            "description" => fields.description = Some(field_text(field).await?),
            "publicationDate" => fields.publication_date = Some(field_text(field).await?),
            "labels" => fields.labels.push(field_text(field).await?),
            "ingredients" => fields.ingredients.push(field_text(field).await?),
            "steps" => fields.steps.push(field_text(field).await?),
            _ => {} // Ignore unknown fields.
        }
    }

    let recipe = state
        .ingestor
        .ingest(IngestRequest {
            chef_name,
            fields,
            image,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateRecipeResponse {
            message: "Recipe added successfully".into(),
            recipe,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    tag = "Recipes",
    operation_id = "listRecipes",
    summary = "List recipes grouped by chef",
    description = "Filters are optional and combine with AND. Pagination counts recipes, \
        not chefs; each page is regrouped by chef in creation order.",
    params(RecipeListQuery),
    responses(
        (status = 200, description = "Recipe page", body = RecipeListResponse),
        (status = 400, description = "Malformed query (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query), fields(page = ?query.page, limit = ?query.limit))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RecipeListQuery>,
) -> Result<Json<RecipeListResponse>, AppError> {
    let page = PageRequest::from_raw(query.page, query.limit);
    let filter = RecipeFilter::from_raw(
        query.title.as_deref(),
        query.labels.as_deref(),
        query.ingredients.as_deref(),
    );

    let result = state.queries.query(&filter, page).await?;

    Ok(Json(RecipeListResponse {
        data: result.data,
        pagination: result.pagination,
    }))
}

async fn field_text(field: Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or_default().to_string();
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))
}

/// Buffer the file part. Reading stops once `size` passes `max_size`, which
/// leaves the validator a size it will reject.
async fn read_image(mut field: Field<'_>, max_size: u64) -> Result<UploadedImage, AppError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);

    let mut data = Vec::new();
    let mut size: u64 = 0;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        size += chunk.len() as u64;
        if size > max_size {
            break;
        }
        data.extend_from_slice(&chunk);
    }

    Ok(UploadedImage {
        file_name,
        content_type,
        size,
        data,
    })
}
