// ABOUTME: Runtime-kind registry: which kinds exist, which support abort, and their default images.
// ABOUTME: Also resolves which registries require the enforced target-image name prefix.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The kinds of compute runtimes the platform can deploy functions to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeKind {
    Job,
    Dask,
    Mpijob,
    Spark,
    #[serde(rename = "remote-spark")]
    RemoteSpark,
    Nuclio,
    Serving,
}

/// Runtime kinds that support aborting a run mid-execution.
///
/// Nuclio-backed kinds (nuclio, serving) are excluded: their invocations are
/// managed by the nuclio control loop, not by our run objects.
pub fn abortable_runtimes() -> Vec<RuntimeKind> {
    vec![
        RuntimeKind::Job,
        RuntimeKind::Dask,
        RuntimeKind::Mpijob,
        RuntimeKind::Spark,
        RuntimeKind::RemoteSpark,
    ]
}

/// Default container image per runtime kind when a function declares none.
pub fn default_image_by_kind() -> HashMap<RuntimeKind, String> {
    HashMap::from([
        (RuntimeKind::Job, "mlrun/mlrun".to_string()),
        (RuntimeKind::Dask, "mlrun/ml-base".to_string()),
        (RuntimeKind::Mpijob, "mlrun/mlrun".to_string()),
        (RuntimeKind::Spark, "mlrun/mlrun".to_string()),
        (RuntimeKind::RemoteSpark, "mlrun/mlrun".to_string()),
        (RuntimeKind::Nuclio, "mlrun/mlrun".to_string()),
        (RuntimeKind::Serving, "mlrun/mlrun".to_string()),
    ])
}

/// Registries for which built target images must carry the configured name prefix.
///
/// Only the platform's own registry is enforced. The host is compared
/// scheme-less and with a trailing slash so prefix matching against image
/// references is unambiguous.
pub fn registries_to_enforce_prefix(docker_registry: &str) -> Vec<String> {
    let host = docker_registry
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    if host.is_empty() {
        return Vec::new();
    }
    vec![format!("{host}/")]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abortable_runtimes_excludes_nuclio_kinds() {
        let kinds = abortable_runtimes();
        assert!(kinds.contains(&RuntimeKind::Job));
        assert!(!kinds.contains(&RuntimeKind::Nuclio));
        assert!(!kinds.contains(&RuntimeKind::Serving));
    }

    #[test]
    fn every_kind_has_a_default_image() {
        let images = default_image_by_kind();
        for kind in [
            RuntimeKind::Job,
            RuntimeKind::Dask,
            RuntimeKind::Mpijob,
            RuntimeKind::Spark,
            RuntimeKind::RemoteSpark,
            RuntimeKind::Nuclio,
            RuntimeKind::Serving,
        ] {
            assert!(images.contains_key(&kind), "missing image for {:?}", kind);
            assert!(!images[&kind].is_empty());
        }
    }

    #[test]
    fn runtime_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&RuntimeKind::RemoteSpark).unwrap(),
            "\"remote-spark\""
        );
        assert_eq!(serde_json::to_string(&RuntimeKind::Job).unwrap(), "\"job\"");
    }

    #[test]
    fn enforce_prefix_strips_scheme_and_normalizes() {
        assert_eq!(
            registries_to_enforce_prefix("https://quay.io/some-repo"),
            vec!["quay.io/some-repo/".to_string()]
        );
        assert_eq!(
            registries_to_enforce_prefix("index.docker.io/"),
            vec!["index.docker.io/".to_string()]
        );
    }

    #[test]
    fn enforce_prefix_empty_registry_yields_empty_set() {
        assert!(registries_to_enforce_prefix("").is_empty());
    }
}
