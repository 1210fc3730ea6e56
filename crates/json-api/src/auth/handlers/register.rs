//! Register Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};

use crate::{
    auth::{into_status_error, models::CredentialsRequest},
    extensions::*,
    messages::MessageResponse,
    state::State,
};

/// Register Handler
///
/// Creates an account. The password is stored only as a hash.
#[endpoint(
    tags("auth"),
    summary = "Register",
    responses(
        (status_code = StatusCode::CREATED, description = "User registered"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request"),
        (status_code = StatusCode::CONFLICT, description = "User already registered"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CredentialsRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<MessageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let credentials = json.into_inner().into_credentials()?;

    state
        .app
        .auth
        .register(credentials)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(MessageResponse::new("User registered")))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use todo_app::auth::{AuthServiceError, MockAuthService};

    use crate::test_helpers::{Mocks, make_user, public_service};

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        public_service(
            Mocks::with_auth(auth),
            Router::with_path("register").post(handler),
        )
    }

    #[tokio::test]
    async fn test_register_success_returns_201() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_register()
            .once()
            .withf(|credentials| {
                credentials.email == "test@example.com"
                    && credentials.password.as_str() == "correct-password"
            })
            .return_once(|_| Ok(make_user(None)));

        let mut res = TestClient::post("http://example.com/register")
            .json(&json!({ "email": "test@example.com", "password": "correct-password" }))
            .send(&make_service(auth))
            .await;

        let body: MessageResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.message, "User registered");

        Ok(())
    }

    #[tokio::test]
    async fn test_register_duplicate_email_returns_409() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_register()
            .once()
            .return_once(|_| Err(AuthServiceError::AlreadyRegistered));

        let mut res = TestClient::post("http://example.com/register")
            .json(&json!({ "email": "test@example.com", "password": "correct-password" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
        assert!(res.take_string().await?.contains("User already registered"));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_invalid_email_returns_400() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_register().never();

        let res = TestClient::post("http://example.com/register")
            .json(&json!({ "email": "not an email@x", "password": "correct-password" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_register_missing_password_returns_400() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_register().never();

        let res = TestClient::post("http://example.com/register")
            .json(&json!({ "email": "test@example.com" }))
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
