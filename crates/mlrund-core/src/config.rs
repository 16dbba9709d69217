// ABOUTME: Process-wide configuration for the mlrund API server, loaded from environment variables.
// ABOUTME: Covers bind address, registry/image settings, auth mode, component versions, and pod resource defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schemas::{AuthenticationFeatureFlag, PreemptionMode};

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MLRUND_BIND is not a valid socket address: {0}")]
    InvalidBind(String),

    #[error("MLRUND_AUTH_MODE is not a recognized mode: {0}")]
    UnknownAuthMode(String),

    #[error("MLRUND_DEFAULT_FUNCTION_PREEMPTION_MODE is not a recognized mode: {0}")]
    UnknownPreemptionMode(String),

    #[error("MLRUND_DEFAULT_FUNCTION_POD_RESOURCES is not valid resources JSON: {0}")]
    InvalidResources(#[from] serde_json::Error),
}

/// How inbound API requests are authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    None,
    Basic,
    Bearer,
    Iguazio,
}

impl AuthMode {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw {
            "none" => Ok(Self::None),
            "basic" => Ok(Self::Basic),
            "bearer" => Ok(Self::Bearer),
            "iguazio" => Ok(Self::Iguazio),
            other => Err(ConfigError::UnknownAuthMode(other.to_string())),
        }
    }

    /// The feature-flag value mirrored to the UI for this mode.
    pub fn as_feature_flag(self) -> AuthenticationFeatureFlag {
        match self {
            Self::None => AuthenticationFeatureFlag::None,
            Self::Basic => AuthenticationFeatureFlag::Basic,
            Self::Bearer => AuthenticationFeatureFlag::Bearer,
            Self::Iguazio => AuthenticationFeatureFlag::Iguazio,
        }
    }
}

/// Quantity strings for one side of a resource specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    pub cpu: String,
    pub memory: String,
    pub gpu: String,
}

/// Default pod resources applied to functions that declare none.
/// Passed through to the UI verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resources {
    pub requests: ResourceSpec,
    pub limits: ResourceSpec,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            requests: ResourceSpec {
                cpu: "25m".to_string(),
                memory: "1Mi".to_string(),
                gpu: String::new(),
            },
            limits: ResourceSpec {
                cpu: "2".to_string(),
                memory: "1Gi".to_string(),
                gpu: String::new(),
            },
        }
    }
}

/// Server configuration loaded once at startup.
#[derive(Debug, Clone)]
pub struct MlrunConfig {
    pub bind: SocketAddr,
    pub docker_registry: String,
    pub function_target_image_name_prefix_template: String,
    pub default_function_pod_resources: Resources,
    pub auth_mode: AuthMode,
    pub igz_version: Option<String>,
    pub nuclio_version: Option<String>,
    pub iguazio_api_url: Option<String>,
    pub default_artifact_path: String,
    pub mlrun_version: String,
    pub project_membership: bool,
    pub preemption_nodes: bool,
    pub default_function_preemption_mode: PreemptionMode,
    pub default_function_priority_class_name: Option<String>,
}

impl Default for MlrunConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080),
            docker_registry: String::new(),
            function_target_image_name_prefix_template: "func-{project}-{name}".to_string(),
            default_function_pod_resources: Resources::default(),
            auth_mode: AuthMode::None,
            igz_version: None,
            nuclio_version: None,
            iguazio_api_url: None,
            default_artifact_path: "v3io:///projects/{project}/artifacts".to_string(),
            mlrun_version: "unstable".to_string(),
            project_membership: false,
            preemption_nodes: false,
            default_function_preemption_mode: PreemptionMode::Prevent,
            default_function_priority_class_name: None,
        }
    }
}

impl MlrunConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - MLRUND_BIND: socket address to bind (default: 127.0.0.1:8080)
    /// - MLRUND_DOCKER_REGISTRY: registry host for built function images
    /// - MLRUND_TARGET_IMAGE_NAME_PREFIX_TEMPLATE: enforced image name prefix template
    /// - MLRUND_DEFAULT_FUNCTION_POD_RESOURCES: JSON requests/limits override
    /// - MLRUND_AUTH_MODE: none | basic | bearer | iguazio (default: none)
    /// - MLRUND_IGZ_VERSION / MLRUND_NUCLIO_VERSION: installed component versions
    /// - MLRUND_IGUAZIO_API_URL: identity service base URL (optional)
    /// - MLRUND_DEFAULT_ARTIFACT_PATH: artifact path template
    /// - MLRUND_MLRUN_VERSION: client package version pinned by the install command
    /// - MLRUND_PROJECT_MEMBERSHIP / MLRUND_PREEMPTION_NODES: feature gates
    /// - MLRUND_DEFAULT_FUNCTION_PREEMPTION_MODE: allow | constrain | prevent | none
    /// - MLRUND_DEFAULT_FUNCTION_PRIORITY_CLASS_NAME: scheduling priority class
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind = match std::env::var("MLRUND_BIND") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidBind(raw))?,
            Err(_) => defaults.bind,
        };

        let default_function_pod_resources =
            match std::env::var("MLRUND_DEFAULT_FUNCTION_POD_RESOURCES") {
                Ok(raw) => serde_json::from_str(&raw)?,
                Err(_) => defaults.default_function_pod_resources,
            };

        let auth_mode = match std::env::var("MLRUND_AUTH_MODE") {
            Ok(raw) => AuthMode::parse(&raw)?,
            Err(_) => defaults.auth_mode,
        };

        let default_function_preemption_mode =
            match std::env::var("MLRUND_DEFAULT_FUNCTION_PREEMPTION_MODE") {
                Ok(raw) => match raw.as_str() {
                    "allow" => PreemptionMode::Allow,
                    "constrain" => PreemptionMode::Constrain,
                    "prevent" => PreemptionMode::Prevent,
                    "none" => PreemptionMode::None,
                    other => return Err(ConfigError::UnknownPreemptionMode(other.to_string())),
                },
                Err(_) => defaults.default_function_preemption_mode,
            };

        Ok(Self {
            bind,
            docker_registry: env_or("MLRUND_DOCKER_REGISTRY", defaults.docker_registry),
            function_target_image_name_prefix_template: env_or(
                "MLRUND_TARGET_IMAGE_NAME_PREFIX_TEMPLATE",
                defaults.function_target_image_name_prefix_template,
            ),
            default_function_pod_resources,
            auth_mode,
            igz_version: env_opt("MLRUND_IGZ_VERSION"),
            nuclio_version: env_opt("MLRUND_NUCLIO_VERSION"),
            iguazio_api_url: env_opt("MLRUND_IGUAZIO_API_URL"),
            default_artifact_path: env_or(
                "MLRUND_DEFAULT_ARTIFACT_PATH",
                defaults.default_artifact_path,
            ),
            mlrun_version: env_or("MLRUND_MLRUN_VERSION", defaults.mlrun_version),
            project_membership: env_flag("MLRUND_PROJECT_MEMBERSHIP"),
            preemption_nodes: env_flag("MLRUND_PREEMPTION_NODES"),
            default_function_preemption_mode,
            default_function_priority_class_name: env_opt(
                "MLRUND_DEFAULT_FUNCTION_PRIORITY_CLASS_NAME",
            ),
        })
    }

    /// The pip command the UI shows for installing a client matching this server.
    ///
    /// Development builds are versioned "unstable" and install whatever is
    /// latest; released builds pin their exact version.
    pub fn mlrun_install_command(&self) -> String {
        if self.mlrun_version == "unstable" {
            "python -m pip install \"mlrun[complete]\"".to_string()
        } else {
            format!(
                "python -m pip install \"mlrun[complete]=={}\"",
                self.mlrun_version
            )
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| v == "true" || v == "1" || v == "yes" || v == "enabled")
        .unwrap_or(false)
}
