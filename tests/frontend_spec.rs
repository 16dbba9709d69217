// ABOUTME: End-to-end tests for the GET /frontend-spec endpoint.
// ABOUTME: Exercises flag defaults, image templates, dashboard URL resolution, and nuclio-streams gating.

use std::sync::Arc;

use axum::body::Body;
use http::Request;
use mlrund_core::schemas::{
    AuthenticationFeatureFlag, NuclioStreamsFeatureFlag, PreemptionMode,
    PreemptionNodesFeatureFlag, ProjectMembershipFeatureFlag,
};
use mlrund_core::{FrontendSpec, MlrunConfig, ResourceSpec, Resources, config::AuthMode, runtimes};
use mlrund_server::testing::MockIdentityClient;
use mlrund_server::{AppState, SharedState, create_router};
use tower::ServiceExt;

fn test_state(config: MlrunConfig, identity: Arc<MockIdentityClient>) -> SharedState {
    Arc::new(AppState::new(config, identity))
}

/// Fire a GET /frontend-spec through the router and parse the response.
async fn get_frontend_spec(state: &SharedState, session_cookie: Option<&str>) -> FrontendSpec {
    let app = create_router(Arc::clone(state));
    let mut request = Request::get("/frontend-spec");
    if let Some(session) = session_cookie {
        request = request.header("cookie", format!("session={session}"));
    }

    let resp = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), 200, "frontend-spec should always return 200");

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn frontend_spec_defaults_and_templates() {
    let pod_resources = Resources {
        requests: ResourceSpec {
            cpu: "25m".to_string(),
            memory: "1Mi".to_string(),
            gpu: String::new(),
        },
        limits: ResourceSpec {
            cpu: "2".to_string(),
            memory: "20Gi".to_string(),
            gpu: String::new(),
        },
    };
    let config = MlrunConfig {
        docker_registry: "quay.io/some-repo".to_string(),
        default_function_pod_resources: pod_resources.clone(),
        ..MlrunConfig::default()
    };
    let state = test_state(config.clone(), Arc::new(MockIdentityClient::new()));

    let spec = get_frontend_spec(&state, None).await;

    assert_eq!(
        spec.abortable_function_kinds,
        runtimes::abortable_runtimes()
    );

    assert_eq!(
        spec.feature_flags.project_membership,
        ProjectMembershipFeatureFlag::Disabled
    );
    assert_eq!(
        spec.feature_flags.authentication,
        AuthenticationFeatureFlag::None
    );
    assert_eq!(
        spec.feature_flags.nuclio_streams,
        NuclioStreamsFeatureFlag::Disabled
    );
    assert_eq!(
        spec.feature_flags.preemption_nodes,
        PreemptionNodesFeatureFlag::Disabled
    );

    assert!(!spec.default_function_image_by_kind.is_empty());
    assert!(!spec.function_deployment_mlrun_command.is_empty());
    assert!(!spec.default_artifact_path.is_empty());

    // Fields the UI expects to find in the template.
    assert!(
        spec.function_deployment_target_image_template
            .contains("quay.io/some-repo")
    );
    for token in ["{project}", "{name}", "{tag}"] {
        assert!(
            spec.function_deployment_target_image_template.contains(token),
            "missing {} in {}",
            token,
            spec.function_deployment_target_image_template
        );
    }

    // Pod resources pass through byte-for-byte.
    assert_eq!(
        serde_json::to_value(&spec.default_function_pod_resources).unwrap(),
        serde_json::to_value(&pod_resources).unwrap()
    );

    assert_eq!(
        spec.function_deployment_target_image_name_prefix_template,
        config.function_target_image_name_prefix_template
    );
    assert_eq!(
        spec.function_deployment_target_image_registries_to_enforce_prefix,
        runtimes::registries_to_enforce_prefix(&config.docker_registry)
    );

    assert_eq!(
        spec.default_function_preemption_mode,
        PreemptionMode::Prevent
    );
}

#[tokio::test]
async fn frontend_spec_jobs_dashboard_url_resolution() {
    const EXPECTED_URL: &str = "some-url.com/d/mlrun-jobs-monitoring/mlrun-jobs-monitoring\
                                ?orgId=1&var-groupBy={filter_name}&var-filter={filter_value}";

    // No cookie so no url, and the identity service is never consulted.
    let identity = Arc::new(MockIdentityClient::new().with_dashboard_url("some-url.com"));
    let state = test_state(MlrunConfig::default(), Arc::clone(&identity));
    let spec = get_frontend_spec(&state, None).await;
    assert_eq!(spec.jobs_dashboard_url, None);
    assert_eq!(identity.dashboard_calls(), 0);

    // No dashboard service installed, so no url.
    let identity = Arc::new(MockIdentityClient::new().with_verified_session("some-session"));
    let config = MlrunConfig {
        auth_mode: AuthMode::Iguazio,
        ..MlrunConfig::default()
    };
    let state = test_state(config.clone(), Arc::clone(&identity));
    let spec = get_frontend_spec(&state, None).await;
    assert_eq!(spec.jobs_dashboard_url, None);
    assert_eq!(identity.dashboard_calls(), 1);

    // Happy scenario: dashboard url found, templated correctly.
    let identity = Arc::new(
        MockIdentityClient::new()
            .with_verified_session("some-session")
            .with_dashboard_url("some-url.com"),
    );
    let state = test_state(config, Arc::clone(&identity));
    let spec = get_frontend_spec(&state, None).await;
    assert_eq!(spec.jobs_dashboard_url.as_deref(), Some(EXPECTED_URL));
    assert_eq!(identity.dashboard_calls(), 1);

    // Now via the session cookie path, without platform auth.
    let identity = Arc::new(MockIdentityClient::new().with_dashboard_url("some-url.com"));
    let state = test_state(MlrunConfig::default(), Arc::clone(&identity));
    let spec = get_frontend_spec(&state, Some("some-session-cookie")).await;
    assert_eq!(spec.jobs_dashboard_url.as_deref(), Some(EXPECTED_URL));
    assert_eq!(identity.dashboard_calls(), 1);
    assert_eq!(identity.verify_calls(), 0);
}

#[tokio::test]
async fn frontend_spec_nuclio_streams() {
    let cases = [
        (Some("3.2.0"), Some("1.6.23"), NuclioStreamsFeatureFlag::Disabled),
        (None, Some("1.6.23"), NuclioStreamsFeatureFlag::Disabled),
        (None, Some("1.7.8"), NuclioStreamsFeatureFlag::Disabled),
        (Some("3.4.0"), Some("1.7.8"), NuclioStreamsFeatureFlag::Enabled),
    ];

    for (igz_version, nuclio_version, expected) in cases {
        let config = MlrunConfig {
            igz_version: igz_version.map(str::to_string),
            nuclio_version: nuclio_version.map(str::to_string),
            ..MlrunConfig::default()
        };
        let state = test_state(config, Arc::new(MockIdentityClient::new()));
        // Start each case from an unset cache, mirroring a fresh process.
        state.nuclio_version.invalidate();

        let spec = get_frontend_spec(&state, None).await;
        assert_eq!(
            spec.feature_flags.nuclio_streams, expected,
            "igz={:?} nuclio={:?}",
            igz_version, nuclio_version
        );

        // Identical fresh inputs resolve identically on a repeat request.
        let spec = get_frontend_spec(&state, None).await;
        assert_eq!(spec.feature_flags.nuclio_streams, expected);
    }
}
