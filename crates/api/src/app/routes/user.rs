use axum::{
    Json, Router,
    extract::Extension,
    response::{IntoResponse, Response},
    routing::get,
};

use crate::context::UserContext;
use crate::middleware::{self, AuthState};

/// `GET /user`, behind the bearer-token middleware.
pub fn register(router: Router, auth: AuthState) -> Router {
    let protected = Router::new()
        .route("/user", get(current))
        .route_layer(axum::middleware::from_fn_with_state(
            auth,
            middleware::auth_middleware,
        ));

    router.merge(protected)
}

pub async fn current(Extension(ctx): Extension<UserContext>) -> Response {
    Json(ctx.user()).into_response()
}
