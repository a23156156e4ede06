//! Service principal token exchange

use crate::core::config::Settings;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";
const MANAGEMENT_RESOURCE: &str = "https://management.azure.com/";

/// Credential exchange failures; all abort the run before any step
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("principal rejected ({code}): {description}")]
    Rejected { code: String, description: String },

    #[error("malformed token response: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// An acquired bearer token
///
/// Obtained once per run and discarded with the run; expiry is governed
/// by the identity service, not tracked here.
#[derive(Clone)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Value for the `Authorization: Bearer` header
    pub fn bearer(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("token", &"<redacted>").finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Client for the identity service's client-credentials grant
pub struct TokenClient {
    http: reqwest::Client,
    authority: String,
}

impl Default for TokenClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenClient {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            authority: DEFAULT_AUTHORITY.to_string(),
        }
    }

    /// Override the identity endpoint (used by tests)
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    /// Exchange the service principal secret for a bearer token
    pub async fn exchange(&self, settings: &Settings) -> Result<Credentials, AuthError> {
        let url = format!("{}/{}/oauth2/token", self.authority, settings.tenant);
        debug!(tenant = %settings.tenant, "requesting management token");

        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", settings.client_id.as_str()),
            ("client_secret", settings.client_secret.as_str()),
            ("resource", MANAGEMENT_RESOURCE),
        ];

        let response = self.http.post(&url).form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(rejection_from_body(status.as_u16(), &body));
        }

        parse_token_response(&body)
    }
}

/// Parse a successful token response body
fn parse_token_response(body: &str) -> Result<Credentials, AuthError> {
    let token: TokenResponse =
        serde_json::from_str(body).map_err(AuthError::Malformed)?;
    Ok(Credentials::new(token.access_token))
}

/// Build a rejection error from an error-status response body
fn rejection_from_body(status: u16, body: &str) -> AuthError {
    let detail: TokenErrorBody = serde_json::from_str(body).unwrap_or(TokenErrorBody {
        error: None,
        error_description: None,
    });
    AuthError::Rejected {
        code: detail
            .error
            .unwrap_or_else(|| format!("http_{}", status)),
        description: detail
            .error_description
            .unwrap_or_else(|| "no detail provided".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_token_response() {
        let body = r#"{"token_type":"Bearer","expires_in":"3599","access_token":"eyJ0eXAi"}"#;
        let credentials = parse_token_response(body).unwrap();
        assert_eq!(credentials.bearer(), "eyJ0eXAi");
    }

    #[test]
    fn test_parse_token_response_malformed() {
        let err = parse_token_response(r#"{"token_type":"Bearer"}"#).unwrap_err();
        assert!(matches!(err, AuthError::Malformed(_)));
    }

    #[test]
    fn test_rejection_with_service_detail() {
        let body = r#"{"error":"invalid_client","error_description":"AADSTS7000215: Invalid client secret."}"#;
        match rejection_from_body(401, body) {
            AuthError::Rejected { code, description } => {
                assert_eq!(code, "invalid_client");
                assert!(description.contains("AADSTS7000215"));
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_rejection_with_opaque_body() {
        match rejection_from_body(502, "bad gateway") {
            AuthError::Rejected { code, .. } => assert_eq!(code, "http_502"),
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_credentials_debug_redacts_token() {
        let credentials = Credentials::new("super-secret");
        let rendered = format!("{:?}", credentials);
        assert!(!rendered.contains("super-secret"));
    }
}
