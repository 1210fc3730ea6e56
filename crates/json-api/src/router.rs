//! App Router

use salvo::Router;

use crate::{auth, todos, users};

/// Version prefix shared by every API route.
pub(crate) const API_PREFIX: &str = "api/v1";

pub(crate) fn api_router() -> Router {
    Router::with_path(API_PREFIX)
        .push(Router::with_path("register").post(auth::register::handler))
        .push(Router::with_path("login").post(auth::login::handler))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(Router::with_path("logout").post(auth::logout::handler))
                .push(
                    Router::with_path("users/me")
                        .get(users::get::handler)
                        .patch(users::update::handler)
                        .delete(users::delete::handler),
                )
                .push(
                    Router::with_path("todos")
                        .get(todos::index::handler)
                        .post(todos::create::handler)
                        .push(Router::with_path("search").get(todos::search::handler))
                        .push(
                            Router::with_path("{id}")
                                .put(todos::update::handler)
                                .delete(todos::delete::handler)
                                .push(
                                    Router::with_path("position")
                                        .patch(todos::reposition::handler),
                                ),
                        ),
                ),
        )
}
