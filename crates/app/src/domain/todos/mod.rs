//! Todos

pub mod data;
pub mod errors;
pub mod positions;
pub mod records;
mod repository;
pub mod service;

pub use errors::TodosServiceError;
pub use service::*;
