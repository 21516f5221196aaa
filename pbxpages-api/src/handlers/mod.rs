pub mod directory;
pub mod extension_status;
