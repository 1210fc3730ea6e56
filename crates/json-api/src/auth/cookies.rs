//! Session cookie handling.

use std::time::Duration;

use salvo::{
    Request,
    http::cookie::{Cookie, SameSite, time::Duration as CookieDuration},
};

use todo_app::sessions::SessionId;

/// How the session id travels between browser and server.
#[derive(Debug, Clone)]
pub(crate) struct SessionCookie {
    name: String,
    secure: bool,
    max_age: Duration,
}

impl SessionCookie {
    pub(crate) fn new(name: impl Into<String>, secure: bool, max_age: Duration) -> Self {
        Self {
            name: name.into(),
            secure,
            max_age,
        }
    }

    /// Session id presented by the client. Malformed values count as absent.
    pub(crate) fn read(&self, req: &Request) -> Option<SessionId> {
        req.cookie(&self.name)
            .and_then(|cookie| cookie.value().parse().ok())
    }

    /// Cookie carrying `session`, living as long as its access token.
    pub(crate) fn issue(&self, session: &SessionId) -> Cookie<'static> {
        let max_age = i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX);

        self.build(session.as_str().to_owned(), CookieDuration::seconds(max_age))
    }

    /// Cookie that makes the browser forget the session.
    pub(crate) fn removal(&self) -> Cookie<'static> {
        self.build(String::new(), CookieDuration::ZERO)
    }

    fn build(&self, value: String, max_age: CookieDuration) -> Cookie<'static> {
        Cookie::build((self.name.clone(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(max_age)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookie(secure: bool) -> SessionCookie {
        SessionCookie::new("todo_session", secure, Duration::from_secs(3600))
    }

    #[test]
    fn issued_cookie_is_http_only_lax_and_scoped_to_root() {
        let session = SessionId::generate();
        let issued = cookie(false).issue(&session);

        assert_eq!(issued.name(), "todo_session");
        assert_eq!(issued.value(), session.as_str());
        assert_eq!(issued.path(), Some("/"));
        assert_eq!(issued.http_only(), Some(true));
        assert_eq!(issued.same_site(), Some(SameSite::Lax));
        assert_eq!(issued.max_age(), Some(CookieDuration::seconds(3600)));
        assert_eq!(issued.secure(), Some(false));
    }

    #[test]
    fn secure_flag_follows_settings() {
        let issued = cookie(true).issue(&SessionId::generate());

        assert_eq!(issued.secure(), Some(true));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let removal = cookie(false).removal();

        assert_eq!(removal.value(), "");
        assert_eq!(removal.max_age(), Some(CookieDuration::ZERO));
    }
}
