pub mod addresses;
pub mod database;
pub mod escape;
