// ABOUTME: Wire schemas for the frontend-spec endpoint: the FrontendSpec record and feature flags.
// ABOUTME: Includes the pure nuclio-streams gating rule driven by platform and engine versions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::Resources;
use crate::runtimes::RuntimeKind;
use crate::version::Version;

/// Minimum iguazio platform version with stream support in the UI.
const NUCLIO_STREAMS_MIN_IGUAZIO_VERSION: Version = Version::new(3, 4, 0);
/// Minimum nuclio version exposing the stream management APIs.
const NUCLIO_STREAMS_MIN_NUCLIO_VERSION: Version = Version::new(1, 7, 8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectMembershipFeatureFlag {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthenticationFeatureFlag {
    None,
    Basic,
    Bearer,
    Iguazio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NuclioStreamsFeatureFlag {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreemptionNodesFeatureFlag {
    Enabled,
    Disabled,
}

/// Policy governing whether a function's pods may be scheduled on preemptible nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreemptionMode {
    Allow,
    Constrain,
    Prevent,
    None,
}

/// Enum-valued toggles gating platform capabilities for the requesting client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub project_membership: ProjectMembershipFeatureFlag,
    pub authentication: AuthenticationFeatureFlag,
    pub nuclio_streams: NuclioStreamsFeatureFlag,
    pub preemption_nodes: PreemptionNodesFeatureFlag,
}

/// The composite configuration record served to the UI by `GET /frontend-spec`.
///
/// Every field is derived at request time from process configuration, the
/// runtime registry, and (for the dashboard URL only) the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontendSpec {
    pub jobs_dashboard_url: Option<String>,
    pub abortable_function_kinds: Vec<RuntimeKind>,
    pub feature_flags: FeatureFlags,
    pub default_function_priority_class_name: Option<String>,
    pub default_function_image_by_kind: HashMap<RuntimeKind, String>,
    pub function_deployment_target_image_template: String,
    pub function_deployment_target_image_name_prefix_template: String,
    pub function_deployment_target_image_registries_to_enforce_prefix: Vec<String>,
    pub function_deployment_mlrun_command: String,
    pub default_artifact_path: String,
    pub default_function_pod_resources: Resources,
    pub default_function_preemption_mode: PreemptionMode,
}

/// Identity attributes for a verified session, as returned by the identity service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthInfo {
    pub username: Option<String>,
    pub session: String,
    pub user_id: Option<String>,
    pub user_group_ids: Vec<String>,
}

impl AuthInfo {
    /// Auth info carrying only a raw session token, for auth modes without
    /// explicit verification.
    pub fn from_session(session: &str) -> Self {
        Self {
            session: session.to_string(),
            ..Self::default()
        }
    }
}

/// Nuclio streams are exposed in the UI only when both the iguazio platform
/// and the nuclio engine are recent enough. A missing or malformed version on
/// either side disables the feature.
pub fn resolve_nuclio_streams_flag(
    igz_version: Option<&str>,
    nuclio_version: Option<&str>,
) -> NuclioStreamsFeatureFlag {
    let igz = igz_version.and_then(|v| Version::parse(v).ok());
    let nuclio = nuclio_version.and_then(|v| Version::parse(v).ok());

    match (igz, nuclio) {
        (Some(igz), Some(nuclio))
            if igz >= NUCLIO_STREAMS_MIN_IGUAZIO_VERSION
                && nuclio >= NUCLIO_STREAMS_MIN_NUCLIO_VERSION =>
        {
            NuclioStreamsFeatureFlag::Enabled
        }
        _ => NuclioStreamsFeatureFlag::Disabled,
    }
}
