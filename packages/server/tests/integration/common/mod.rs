use std::io::Cursor;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ::common::MediaConfig;
use image::{ImageFormat, Rgb, RgbImage};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tempfile::TempDir;

use server::config::{AppConfig, CorsConfig, DatabaseConfig, ServerConfig};
use server::state::AppState;
use server::store::{ChefStore, MemoryChefStore};

pub mod routes {
    pub const CHEFS: &str = "/api/v1/chefs";
    pub const RECIPES: &str = "/api/v1/recipes";
    pub const SCALAR: &str = "/scalar";
}

/// A running test server backed by the in-memory store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<dyn ChefStore>,
    pub media: MediaConfig,
    _root: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

/// Multipart recipe submission. Fields left as `None` are not sent.
#[derive(Clone)]
pub struct RecipeForm {
    pub name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub labels: Vec<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub image: Option<(String, String, Vec<u8>)>,
}

impl RecipeForm {
    /// A complete, valid submission for `chef`.
    pub fn new(chef: &str, title: &str) -> Self {
        Self {
            name: Some(chef.into()),
            title: Some(title.into()),
            description: Some(format!("How to make {title}")),
            labels: vec!["vegan".into()],
            ingredients: vec!["tomato".into(), "salt".into()],
            steps: vec!["chop".into(), "boil".into()],
            image: Some(("photo.png".into(), "image/png".into(), png_bytes(1200, 900))),
        }
    }

    pub fn labels(mut self, labels: &[&str]) -> Self {
        self.labels = labels.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn ingredients(mut self, ingredients: &[&str]) -> Self {
        self.ingredients = ingredients.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn image(mut self, file_name: &str, mime: &str, bytes: Vec<u8>) -> Self {
        self.image = Some((file_name.into(), mime.into(), bytes));
        self
    }

    fn into_form(self) -> Form {
        let mut form = Form::new();
        for (key, value) in [
            ("name", self.name),
            ("title", self.title),
            ("description", self.description),
        ] {
            if let Some(value) = value {
                form = form.text(key, value);
            }
        }
        for label in self.labels {
            form = form.text("labels[]", label);
        }
        for ingredient in self.ingredients {
            form = form.text("ingredients", ingredient);
        }
        for step in self.steps {
            form = form.text("steps", step);
        }
        if let Some((file_name, mime, bytes)) = self.image {
            let part = Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(&mime)
                .expect("Failed to set MIME type");
            form = form.part("recipeImage", part);
        }
        form
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_store(Arc::new(MemoryChefStore::new())).await
    }

    pub async fn spawn_with_store(store: Arc<dyn ChefStore>) -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let media = MediaConfig::rooted_at(root.path());

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 1,
            },
            media: media.clone(),
        };

        let state = AppState::new(app_config, store.clone())
            .await
            .expect("Failed to build app state");
        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            store,
            media,
            _root: root,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn upload_recipe(&self, form: RecipeForm) -> TestResponse {
        let res = self
            .client
            .post(self.url(routes::RECIPES))
            .multipart(form.into_form())
            .send()
            .await
            .expect("Failed to send multipart upload request");

        TestResponse::from_response(res).await
    }

    /// Register a chef via the API and return its `id`.
    pub async fn create_chef(&self, name: &str) -> String {
        let res = self
            .post_json(
                routes::CHEFS,
                &serde_json::json!({
                    "name": name,
                    "email": format!("{name}@example.com"),
                    "password": "pass1234",
                }),
            )
            .await;
        assert_eq!(res.status, 201, "create_chef failed: {}", res.text);
        res.body["id"]
            .as_str()
            .expect("response body should contain 'id'")
            .to_string()
    }

    /// Upload a valid recipe and assert it was accepted.
    pub async fn create_recipe(&self, form: RecipeForm) -> Value {
        let res = self.upload_recipe(form).await;
        assert_eq!(res.status, 201, "create_recipe failed: {}", res.text);
        res.body["recipe"].clone()
    }

    pub async fn list_recipes(&self, query: &str) -> TestResponse {
        self.get(&format!("{}?{query}", routes::RECIPES)).await
    }

    /// Files (not directories) left in the staging directory.
    pub fn staged_files(&self) -> Vec<PathBuf> {
        files_in(&self.media.staging_dir)
    }

    pub fn resized_files(&self) -> Vec<PathBuf> {
        files_in(&self.media.resized_dir)
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn code(&self) -> &str {
        self.body["code"]
            .as_str()
            .expect("error body should contain 'code'")
    }
}

fn files_in(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Encode a solid-color PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 80, 40]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("Failed to encode PNG");
    out.into_inner()
}
