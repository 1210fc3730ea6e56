//! Authentication

mod binding;
mod errors;
mod models;
mod password;
mod service;
mod token;

pub use binding::*;
pub use errors::*;
pub use models::*;
pub use password::*;
pub use service::*;
pub use token::*;
