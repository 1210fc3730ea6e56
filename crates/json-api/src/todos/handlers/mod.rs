//! Todo Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod index;
pub(crate) mod reposition;
pub(crate) mod search;
pub(crate) mod update;
