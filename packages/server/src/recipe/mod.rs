//! Recipe ingestion and querying.

pub mod ingest;
pub mod query;

pub use ingest::{IngestError, IngestRequest, RecipeFields, RecipeIngestor, UploadedImage};
pub use query::{PageRequest, RecipeFilter, RecipePage, RecipeQueryEngine};
