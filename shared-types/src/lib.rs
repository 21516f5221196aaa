pub mod contact;
pub mod registration;

pub use contact::{ContactNumber, DirectoryEntry, NumberType};
pub use registration::{DeviceInfo, RegistrationContact};
