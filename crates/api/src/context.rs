use shopfront_auth::AuthUser;

/// Authenticated user for a request, inserted by the bearer middleware.
///
/// Immutable once set; present on every route behind the middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    user: AuthUser,
}

impl UserContext {
    pub fn new(user: AuthUser) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &AuthUser {
        &self.user
    }
}
