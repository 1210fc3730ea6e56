//! Plain acknowledgement bodies.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// Single human-readable acknowledgement
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
