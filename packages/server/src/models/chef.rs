use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recipe::Recipe;
use crate::error::AppError;

/// A chef document with its embedded recipes, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chef {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub recipes: Vec<Recipe>,
    pub created_at: DateTime<Utc>,
}

impl Chef {
    pub fn identity(&self) -> ChefIdentity {
        ChefIdentity {
            chef_id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Fields needed to create a chef.
#[derive(Debug, Clone)]
pub struct NewChef {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Public identity of a chef, carried alongside matching recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChefIdentity {
    pub chef_id: Uuid,
    pub name: String,
    pub email: String,
}

/// One chef and the subset of their recipes selected by a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChefRecipes {
    pub chef_id: Uuid,
    #[schema(example = "gordon")]
    pub name: String,
    #[schema(example = "gordon@example.com")]
    pub email: String,
    pub recipes: Vec<Recipe>,
}

impl ChefRecipes {
    pub fn new(identity: ChefIdentity) -> Self {
        Self {
            chef_id: identity.chef_id,
            name: identity.name,
            email: identity.email,
            recipes: Vec::new(),
        }
    }
}

/// Request body for chef signup.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RegisterChefRequest {
    /// Unique chef name (1-64 characters).
    #[schema(example = "gordon")]
    pub name: String,
    /// Unique email address.
    #[schema(example = "gordon@example.com")]
    pub email: String,
    /// Password (8-128 characters).
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

pub fn validate_register_request(payload: &RegisterChefRequest) -> Result<(), AppError> {
    let name = payload.name.trim();
    if name.is_empty() || name.chars().count() > 64 {
        return Err(AppError::Validation("Name must be 1-64 characters".into()));
    }
    if !is_valid_email(payload.email.trim()) {
        return Err(AppError::Validation("Invalid email address".into()));
    }
    if payload.password.len() < 8 || payload.password.len() > 128 {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

/// Loose `local@domain.tld` shape check.
fn is_valid_email(email: &str) -> bool {
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Successful signup response.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChefResponse {
    pub id: Uuid,
    #[schema(example = "gordon")]
    pub name: String,
    #[schema(example = "gordon@example.com")]
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<Chef> for ChefResponse {
    fn from(chef: Chef) -> Self {
        Self {
            id: chef.id,
            name: chef.name,
            email: chef.email,
            created_at: chef.created_at,
        }
    }
}
