pub mod chef;
