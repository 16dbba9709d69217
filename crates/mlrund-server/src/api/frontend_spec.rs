// ABOUTME: The frontend-spec resolver and its GET handler.
// ABOUTME: Assembles feature flags, image templates, resource defaults, and the jobs dashboard URL.

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use mlrund_core::schemas::{
    PreemptionNodesFeatureFlag, ProjectMembershipFeatureFlag, resolve_nuclio_streams_flag,
};
use mlrund_core::{AuthInfo, FeatureFlags, FrontendSpec, MlrunConfig, config::AuthMode, runtimes};

use crate::app_state::{AppState, SharedState};

/// Path appended to the dashboard base URL. The `{filter_name}` and
/// `{filter_value}` tokens are substituted by the UI, not by us.
const JOBS_DASHBOARD_PATH: &str =
    "/d/mlrun-jobs-monitoring/mlrun-jobs-monitoring?orgId=1&var-groupBy={filter_name}&var-filter={filter_value}";

/// GET /frontend-spec - Resolve the composite configuration record for the UI.
///
/// Always returns 200; the dashboard URL is best-effort enrichment and its
/// failures degrade to a null field rather than an error response.
pub async fn get_frontend_spec(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Json<FrontendSpec> {
    let session = session_cookie(&headers);
    Json(resolve_frontend_spec(&state, session.as_deref()).await)
}

/// Resolve the frontend spec for a request carrying an optional session token.
pub async fn resolve_frontend_spec(state: &AppState, session: Option<&str>) -> FrontendSpec {
    let config = &state.config;

    let jobs_dashboard_url = resolve_jobs_dashboard_url(state, session).await;

    // The nuclio version is resolved once per process and pinned; the iguazio
    // version is static configuration.
    let nuclio_version = state
        .nuclio_version
        .get_or_compute(|| config.nuclio_version.clone());

    let feature_flags = FeatureFlags {
        project_membership: if config.project_membership {
            ProjectMembershipFeatureFlag::Enabled
        } else {
            ProjectMembershipFeatureFlag::Disabled
        },
        authentication: config.auth_mode.as_feature_flag(),
        nuclio_streams: resolve_nuclio_streams_flag(
            config.igz_version.as_deref(),
            nuclio_version.as_deref(),
        ),
        preemption_nodes: if config.preemption_nodes {
            PreemptionNodesFeatureFlag::Enabled
        } else {
            PreemptionNodesFeatureFlag::Disabled
        },
    };

    FrontendSpec {
        jobs_dashboard_url,
        abortable_function_kinds: runtimes::abortable_runtimes(),
        feature_flags,
        default_function_priority_class_name: config.default_function_priority_class_name.clone(),
        default_function_image_by_kind: runtimes::default_image_by_kind(),
        function_deployment_target_image_template: target_image_template(config),
        function_deployment_target_image_name_prefix_template: config
            .function_target_image_name_prefix_template
            .clone(),
        function_deployment_target_image_registries_to_enforce_prefix:
            runtimes::registries_to_enforce_prefix(&config.docker_registry),
        function_deployment_mlrun_command: config.mlrun_install_command(),
        default_artifact_path: config.default_artifact_path.clone(),
        default_function_pod_resources: config.default_function_pod_resources.clone(),
        default_function_preemption_mode: config.default_function_preemption_mode,
    }
}

/// The template deployed function images are named after. Only the registry
/// host is interpolated here; `{project}`, `{name}`, and `{tag}` stay literal
/// for the builder to fill in.
fn target_image_template(config: &MlrunConfig) -> String {
    format!("{}/func-{{project}}-{{name}}:{{tag}}", config.docker_registry)
}

/// Resolve the jobs monitoring dashboard deep link, if one is reachable.
///
/// Short-circuits without any identity-service call when no session is
/// available, and calls the dashboard lookup at most once per request. Every
/// failure along the chain collapses to `None`.
async fn resolve_jobs_dashboard_url(state: &AppState, session: Option<&str>) -> Option<String> {
    let auth_info = match state.config.auth_mode {
        // In iguazio mode the verified identity is authoritative, whether the
        // session arrived as a cookie or through the platform's auth layer.
        AuthMode::Iguazio => {
            match state
                .identity
                .verify_session(session.unwrap_or_default())
                .await
            {
                Ok(auth_info) => auth_info,
                Err(err) => {
                    tracing::debug!(error = %err, "session verification failed, omitting jobs dashboard url");
                    return None;
                }
            }
        }
        _ => AuthInfo::from_session(session?),
    };

    if auth_info.session.is_empty() {
        return None;
    }

    match state.identity.resolve_dashboard_url(&auth_info).await {
        Ok(Some(base_url)) => Some(format!("{base_url}{JOBS_DASHBOARD_PATH}")),
        Ok(None) => None,
        Err(err) => {
            tracing::warn!(error = %err, "dashboard url resolution failed, omitting jobs dashboard url");
            None
        }
    }
}

/// Extract the `session` cookie value from request headers, if present.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(http::header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix("session="))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
