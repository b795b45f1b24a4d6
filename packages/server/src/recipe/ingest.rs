use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::MediaConfig;
use common::media::{
    MediaError, StagingStore, Transcoder, UploadDescriptor, validate_upload,
};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::recipe::Recipe;
use crate::store::{ChefStore, StoreError};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{0}")]
    Validation(String),

    #[error("chef '{0}' not found")]
    ChefNotFound(String),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Recipe fields as submitted, before validation.
#[derive(Debug, Clone, Default)]
pub struct RecipeFields {
    pub title: Option<String>,
    pub description: Option<String>,
    /// RFC 3339 timestamp; defaults to the ingestion time.
    pub publication_date: Option<String>,
    pub labels: Vec<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
}

/// An uploaded image held in memory.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    /// Bytes received. May exceed `data.len()` when the upload was cut off
    /// at the size ceiling.
    pub size: u64,
    pub data: Vec<u8>,
}

impl UploadedImage {
    fn descriptor(&self) -> UploadDescriptor {
        UploadDescriptor {
            content_type: self.content_type.clone(),
            size: self.size,
        }
    }
}

/// A complete ingestion request.
#[derive(Debug, Clone, Default)]
pub struct IngestRequest {
    pub chef_name: Option<String>,
    pub fields: RecipeFields,
    pub image: Option<UploadedImage>,
}

/// Validated recipe content, waiting for its image.
#[derive(Debug)]
struct RecipeDraft {
    title: String,
    description: String,
    publication_date: DateTime<Utc>,
    labels: Vec<String>,
    ingredients: Vec<String>,
    steps: Vec<String>,
}

impl RecipeDraft {
    fn into_recipe(self, recipe_image: String) -> Recipe {
        Recipe {
            id: Uuid::now_v7(),
            title: self.title,
            publication_date: self.publication_date,
            labels: self.labels,
            description: self.description,
            ingredients: self.ingredients,
            steps: self.steps,
            recipe_image,
        }
    }
}

/// Runs validate, stage, transcode and attach for new recipes.
///
/// Every artifact written on behalf of a request is removed again if the
/// request fails or is dropped before the append starts. Once it starts, the
/// append and the asset commit finish together even if the caller goes away.
pub struct RecipeIngestor {
    store: Arc<dyn ChefStore>,
    staging: StagingStore,
    transcoder: Transcoder,
    media: MediaConfig,
    #[cfg(test)]
    checkpoint: Option<Arc<tests::Checkpoint>>,
}

impl RecipeIngestor {
    /// Create the ingestor and its directories.
    pub async fn new(store: Arc<dyn ChefStore>, media: MediaConfig) -> Result<Self, MediaError> {
        let staging = StagingStore::new(&media.staging_dir).await?;
        let transcoder = Transcoder::new(&media.resized_dir, media.jpeg_quality).await?;
        Ok(Self {
            store,
            staging,
            transcoder,
            media,
            #[cfg(test)]
            checkpoint: None,
        })
    }

    pub fn media(&self) -> &MediaConfig {
        &self.media
    }

    pub async fn ingest(&self, request: IngestRequest) -> Result<Recipe, IngestError> {
        let chef_name = required(request.chef_name.as_deref(), "name")?;
        let draft = validate_fields(request.fields)?;
        let image = request
            .image
            .ok_or_else(|| IngestError::Validation("recipeImage is required".into()))?;

        validate_upload(&image.descriptor(), self.media.max_upload_bytes)?;

        // Resolve the owner before touching the disk so a missing chef
        // never leaves an orphaned asset behind.
        let chef = self
            .store
            .find_chef_by_name(&chef_name)
            .await?
            .ok_or_else(|| IngestError::ChefNotFound(chef_name.clone()))?;

        let staged = self
            .staging
            .stage(
                image.file_name.as_deref(),
                image.content_type.as_deref(),
                &image.data,
            )
            .await?;
        drop(image);

        let transcoded = self
            .transcoder
            .transcode(
                staged.path(),
                self.media.target_width,
                self.media.target_height,
            )
            .await;

        #[cfg(test)]
        if let Some(checkpoint) = &self.checkpoint {
            checkpoint.pause().await;
        }

        let staged_path = staged.path().to_path_buf();
        if let Err(e) = staged.discard().await {
            warn!(path = %staged_path.display(), "Failed to remove staged original: {e}");
        }
        let asset = transcoded?;

        let recipe = draft.into_recipe(asset.path().to_string_lossy().into_owned());

        // Detached so a dropped request cannot land between a persisted
        // append and the commit. On append failure `asset` drops inside the
        // task and takes the resized file with it.
        let store = self.store.clone();
        let chef_id = chef.id;
        let persisted = recipe.clone();
        tokio::spawn(async move {
            store.append_recipe(chef_id, &persisted).await?;
            asset.commit();
            Ok::<_, StoreError>(())
        })
        .await
        .map_err(|e| StoreError::Backend(format!("append task failed: {e}")))??;

        info!(chef = %chef_name, recipe_id = %recipe.id, "Recipe ingested");
        Ok(recipe)
    }
}

fn required(value: Option<&str>, field: &str) -> Result<String, IngestError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(IngestError::Validation(format!("{field} is required"))),
    }
}

/// Trim entries, drop blank ones, and require at least one to remain.
fn required_list(values: Vec<String>, field: &str) -> Result<Vec<String>, IngestError> {
    let cleaned = clean_list(values);
    if cleaned.is_empty() {
        return Err(IngestError::Validation(format!(
            "{field} must contain at least one entry"
        )));
    }
    Ok(cleaned)
}

fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn validate_fields(fields: RecipeFields) -> Result<RecipeDraft, IngestError> {
    let title = required(fields.title.as_deref(), "title")?;
    let description = required(fields.description.as_deref(), "description")?;
    let ingredients = required_list(fields.ingredients, "ingredients")?;
    let steps = required_list(fields.steps, "steps")?;

    let publication_date = match fields.publication_date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => DateTime::parse_from_rfc3339(raw)
            .map_err(|_| {
                IngestError::Validation("publicationDate must be an RFC 3339 timestamp".into())
            })?
            .with_timezone(&Utc),
        _ => Utc::now(),
    };

    let mut labels: Vec<String> = Vec::new();
    for label in clean_list(fields.labels) {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    Ok(RecipeDraft {
        title,
        description,
        publication_date,
        labels,
        ingredients,
        steps,
    })
}
