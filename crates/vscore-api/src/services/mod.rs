//! Business logic services.

pub mod uploads;

pub use uploads::UploadStore;
