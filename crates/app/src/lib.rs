//! Todo application domain, persistence and authentication.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod sessions;

#[cfg(test)]
mod test;

mod uuids;

pub use domain::{todos, users};
