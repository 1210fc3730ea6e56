//! Auth request and response bodies.

use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use zeroize::Zeroizing;

use todo_app::auth::Credentials;

use crate::extensions::*;

/// Email and password, as sent to register and login
#[derive(Deserialize, ToSchema, Validate)]
pub(crate) struct CredentialsRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("email", &self.email)
            .field("password", &"**redacted**")
            .finish()
    }
}

impl CredentialsRequest {
    /// Reject blank passwords and anything that isn't a valid email address.
    pub(crate) fn into_credentials(mut self) -> Result<Credentials, StatusError> {
        self.email = self.email.trim().to_owned();

        self.validate().or_400("invalid credentials")?;

        Ok(Credentials {
            email: self.email,
            password: Zeroizing::new(self.password),
        })
    }
}

/// Successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LoginResponse {
    /// External identifier of the logged in user
    pub user_id: Uuid,

    /// Bearer token, valid together with the session cookie
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn request(email: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn well_formed_credentials_are_accepted() -> TestResult {
        let credentials = request(" test@example.com ", "secret").into_credentials()?;

        assert_eq!(credentials.email, "test@example.com");
        assert_eq!(credentials.password.as_str(), "secret");

        Ok(())
    }

    #[test]
    fn malformed_credentials_are_rejected() {
        for (email, password) in [
            ("", "secret"),
            ("no-at-sign", "secret"),
            ("@example.com", "secret"),
            ("test@", "secret"),
            ("a@b@c", "secret"),
            ("not an email@x", "secret"),
            ("<script>@x y", "secret"),
            ("test@exa mple.com", "secret"),
            ("test@example.com", ""),
        ] {
            assert!(
                request(email, password).into_credentials().is_err(),
                "expected {email:?} / {password:?} to be rejected"
            );
        }
    }
}
