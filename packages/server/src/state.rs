use std::sync::Arc;

use common::media::MediaError;

use crate::config::AppConfig;
use crate::recipe::{RecipeIngestor, RecipeQueryEngine};
use crate::store::ChefStore;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn ChefStore>,
    pub ingestor: Arc<RecipeIngestor>,
    pub queries: RecipeQueryEngine,
}

impl AppState {
    /// Wire the services together. Creates the upload directories once, here.
    pub async fn new(config: AppConfig, store: Arc<dyn ChefStore>) -> Result<Self, MediaError> {
        let ingestor = RecipeIngestor::new(store.clone(), config.media.clone()).await?;
        Ok(Self {
            queries: RecipeQueryEngine::new(store.clone()),
            ingestor: Arc::new(ingestor),
            store,
            config,
        })
    }
}
