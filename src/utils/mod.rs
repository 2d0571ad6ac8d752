//! Shared utilities

pub mod validation;

pub use validation::UploadValidator;
