pub mod chef;
pub mod recipe;
