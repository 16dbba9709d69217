// ABOUTME: Core library for mlrund, containing configuration, wire schemas, and pure resolution logic.
// ABOUTME: This crate defines the shared data model used across all mlrund components.

pub mod cache;
pub mod config;
pub mod runtimes;
pub mod schemas;
pub mod version;

pub use cache::VersionCache;
pub use config::{AuthMode, ConfigError, MlrunConfig, ResourceSpec, Resources};
pub use runtimes::RuntimeKind;
pub use schemas::{
    AuthInfo, AuthenticationFeatureFlag, FeatureFlags, FrontendSpec, NuclioStreamsFeatureFlag,
    PreemptionMode, PreemptionNodesFeatureFlag, ProjectMembershipFeatureFlag,
    resolve_nuclio_streams_flag,
};
pub use version::Version;
