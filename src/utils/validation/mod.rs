//! Consolidated validation utilities

pub mod upload;

pub use upload::UploadValidator;
