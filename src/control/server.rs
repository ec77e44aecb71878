//! Control listener routes and handlers
//!
//! Three fixed paths map onto registry operations; anything else is an
//! explicit 404. Successful commands answer 204 with no body. The platform
//! sits behind a mutex, so each command runs its mutation to completion
//! before the next one is dispatched.

use crate::error::PlatformError;
use crate::platform::Platform;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error};

/// Platform state shared with the control handlers
pub type SharedPlatform = Arc<Mutex<Platform>>;

/// Build the control listener router
pub fn router(platform: SharedPlatform) -> Router {
    Router::new()
        .route("/add", any(add))
        .route("/reachability", any(reachability))
        .route("/remove", any(remove))
        .fallback(not_found)
        .with_state(platform)
}

/// `/add`: create and register one accessory under the default name
async fn add(State(platform): State<SharedPlatform>) -> Response {
    debug!("Control: add");
    let mut platform = platform.lock().await;
    respond(platform.add_accessory(None).map(|_| ()))
}

/// `/reachability`: mark every accessory unreachable
async fn reachability(State(platform): State<SharedPlatform>) -> Response {
    debug!("Control: reachability");
    let mut platform = platform.lock().await;
    respond(platform.update_reachability())
}

/// `/remove`: unregister and clear the entire registry
async fn remove(State(platform): State<SharedPlatform>) -> Response {
    debug!("Control: remove");
    let mut platform = platform.lock().await;
    respond(platform.remove_all().map(|_| ()))
}

/// Unmatched paths get an explicit not-found instead of a dropped connection
async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "unknown control path\n").into_response()
}

fn respond(result: crate::error::Result<()>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Control command failed: {}", e);
            (status_for(&e), format!("{}\n", e)).into_response()
        }
    }
}

fn status_for(error: &PlatformError) -> StatusCode {
    match error {
        PlatformError::DuplicateAccessory(_) => StatusCode::CONFLICT,
        PlatformError::Registration(_) => StatusCode::BAD_GATEWAY,
        PlatformError::InvalidSetupInput(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
