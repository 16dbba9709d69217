// ABOUTME: HTTP server for mlrund, exposing the frontend-spec endpoint over Axum.
// ABOUTME: Wires shared state, the identity-service client, and route assembly.

pub mod api;
pub mod app_state;
pub mod identity;
pub mod routes;
pub mod testing;

pub use app_state::{AppState, SharedState};
pub use identity::{IdentityClient, IdentityError, IguazioClient};
pub use routes::create_router;
