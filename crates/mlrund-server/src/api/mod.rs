// ABOUTME: API module containing the HTTP handler functions for the mlrund REST API.
// ABOUTME: Currently holds the frontend-spec endpoint.

pub mod frontend_spec;
