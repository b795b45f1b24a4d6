pub mod chef;
pub mod recipe;
pub mod shared;
