// ABOUTME: Identity-service client capability: session verification and dashboard URL discovery.
// ABOUTME: IguazioClient is the production reqwest implementation; tests substitute a mock.

use std::time::Duration;

use async_trait::async_trait;
use mlrund_core::AuthInfo;
use thiserror::Error;

/// Outbound calls to the identity service are best-effort enrichment; a hung
/// service must not stall frontend-spec responses indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the identity-service client.
///
/// Callers on the frontend-spec path absorb these (the dashboard URL is
/// optional enrichment); they are never surfaced as HTTP errors.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity service is not configured")]
    NotConfigured,

    #[error("session verification rejected with status {0}")]
    Unauthorized(u16),

    #[error("identity service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected identity service response: {0}")]
    UnexpectedResponse(String),
}

/// Capability interface over the identity service.
///
/// Split out as a trait so the resolver logic is testable with a double and
/// the real network client stays swappable.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Verify a request session token, returning the identity it belongs to.
    async fn verify_session(&self, session: &str) -> Result<AuthInfo, IdentityError>;

    /// Resolve the monitoring dashboard base URL for a verified identity.
    /// `Ok(None)` means the dashboard service is not installed, which is a
    /// valid absence rather than an error.
    async fn resolve_dashboard_url(&self, auth_info: &AuthInfo)
    -> Result<Option<String>, IdentityError>;
}

/// Identity client backed by the iguazio platform API.
pub struct IguazioClient {
    api_url: Option<String>,
    http: reqwest::Client,
}

impl IguazioClient {
    /// Create a client for the given platform API base URL. A `None` URL
    /// produces a client that reports the service as not configured, which
    /// downstream resolves to absent enrichment.
    pub fn new(api_url: Option<String>) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            api_url: api_url.map(|u| u.trim_end_matches('/').to_string()),
            http,
        })
    }
}

#[async_trait]
impl IdentityClient for IguazioClient {
    async fn verify_session(&self, session: &str) -> Result<AuthInfo, IdentityError> {
        let api_url = self.api_url.as_deref().ok_or(IdentityError::NotConfigured)?;

        let response = self
            .http
            .post(format!("{api_url}/api/sessions/verifications"))
            .header(http::header::COOKIE.as_str(), format!("session={session}"))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IdentityError::Unauthorized(response.status().as_u16()));
        }

        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        Ok(AuthInfo {
            username: header("x-remote-user"),
            session: session.to_string(),
            user_id: header("x-user-id"),
            user_group_ids: header("x-user-group-ids")
                .map(|raw| raw.split(',').map(str::to_string).collect())
                .unwrap_or_default(),
        })
    }

    async fn resolve_dashboard_url(
        &self,
        auth_info: &AuthInfo,
    ) -> Result<Option<String>, IdentityError> {
        let Some(api_url) = self.api_url.as_deref() else {
            return Ok(None);
        };

        let response = self
            .http
            .get(format!("{api_url}/api/app_services_manifests"))
            .header(
                http::header::COOKIE.as_str(),
                format!("session={}", auth_info.session),
            )
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(IdentityError::UnexpectedResponse(format!(
                "app services manifest returned status {}",
                response.status()
            )));
        }

        let manifest: serde_json::Value = response.json().await?;
        Ok(find_grafana_url(&manifest))
    }
}

/// Scan an app-services manifest for a ready grafana service and return its
/// external URL, if any.
fn find_grafana_url(manifest: &serde_json::Value) -> Option<String> {
    let services = manifest
        .get("data")?
        .as_array()?
        .iter()
        .flat_map(|entry| {
            entry
                .pointer("/attributes/spec/app_services")
                .and_then(|s| s.as_array())
                .into_iter()
                .flatten()
        });

    for service in services {
        let kind = service.pointer("/spec/kind").and_then(|k| k.as_str());
        let state = service.pointer("/status/state").and_then(|s| s.as_str());
        if kind != Some("grafana") || state != Some("ready") {
            continue;
        }
        if let Some(url) = service
            .pointer("/status/urls/0")
            .and_then(|u| u.as_str())
            .filter(|u| !u.is_empty())
        {
            return Some(url.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(kind: &str, state: &str, url: &str) -> serde_json::Value {
        serde_json::json!({
            "data": [{
                "attributes": {
                    "spec": {
                        "app_services": [{
                            "spec": { "kind": kind },
                            "status": { "state": state, "urls": [url] }
                        }]
                    }
                }
            }]
        })
    }

    #[test]
    fn finds_ready_grafana_service() {
        let m = manifest("grafana", "ready", "https://grafana.example.com");
        assert_eq!(
            find_grafana_url(&m).as_deref(),
            Some("https://grafana.example.com")
        );
    }

    #[test]
    fn skips_non_ready_grafana() {
        let m = manifest("grafana", "provisioning", "https://grafana.example.com");
        assert_eq!(find_grafana_url(&m), None);
    }

    #[test]
    fn skips_other_services() {
        let m = manifest("jupyter", "ready", "https://jupyter.example.com");
        assert_eq!(find_grafana_url(&m), None);
    }

    #[test]
    fn tolerates_empty_manifest() {
        assert_eq!(find_grafana_url(&serde_json::json!({})), None);
        assert_eq!(find_grafana_url(&serde_json::json!({ "data": [] })), None);
    }

    #[tokio::test]
    async fn unconfigured_client_reports_not_configured() {
        let client = IguazioClient::new(None).unwrap();

        let err = client.verify_session("some-session").await.unwrap_err();
        assert!(matches!(err, IdentityError::NotConfigured));

        let url = client
            .resolve_dashboard_url(&AuthInfo::from_session("some-session"))
            .await
            .unwrap();
        assert_eq!(url, None);
    }
}
