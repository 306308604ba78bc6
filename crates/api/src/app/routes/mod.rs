use axum::Router;

use crate::middleware::AuthState;

pub mod common;
pub mod products;
pub mod reviews;
pub mod system;
pub mod user;

/// Register every `/api` endpoint on `router`. Called once at startup.
pub fn register(router: Router, auth: AuthState) -> Router {
    let router = user::register(router, auth);
    let router = products::register(router);
    reviews::register(router)
}
