//! REST implementation of the management collaborators

use crate::arm::{
    auth::Credentials, models::*, ApiError, ResourceGroups, StorageAccounts, Usages,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_ENDPOINT: &str = "https://management.azure.com";
const RESOURCES_API_VERSION: &str = "2021-04-01";
const STORAGE_API_VERSION: &str = "2023-01-01";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_MAX_POLLS: u32 = 60;

/// Thin client over the resource and storage management endpoints
///
/// One instance serves all three collaborator traits; it is cheap to share
/// behind an `Arc` and safe for concurrent use.
pub struct ArmClient {
    http: reqwest::Client,
    endpoint: String,
    subscription_id: String,
    credentials: Credentials,
    poll_interval: Duration,
    max_polls: u32,
}

impl ArmClient {
    pub fn new(credentials: Credentials, subscription_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            subscription_id: subscription_id.into(),
            credentials,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Override the management endpoint (used by tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Tune the provisioning poll loop
    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    fn subscription_url(&self) -> String {
        format!("{}/subscriptions/{}", self.endpoint, self.subscription_id)
    }

    fn group_url(&self, group: &str) -> String {
        format!("{}/resourcegroups/{}", self.subscription_url(), group)
    }

    fn storage_provider_url(&self) -> String {
        format!("{}/providers/Microsoft.Storage", self.subscription_url())
    }

    fn account_url(&self, group: &str, account: &str) -> String {
        format!(
            "{}/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts/{}",
            self.subscription_url(),
            group,
            account
        )
    }

    /// Send a request and decode a success body
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        api_version: &str,
    ) -> Result<T, ApiError> {
        let response = request
            .query(&[("api-version", api_version)])
            .bearer_auth(self.credentials.bearer())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(service_error(status.as_u16(), &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Poll the account until provisioning reaches a terminal state
    async fn wait_for_provisioning(
        &self,
        group: &str,
        account: &str,
    ) -> Result<StorageAccount, ApiError> {
        for attempt in 1..=self.max_polls {
            tokio::time::sleep(self.poll_interval).await;
            let current = self.get_properties(group, account).await?;
            if current.is_provisioned() {
                info!(account, attempt, "storage account provisioned");
                return Ok(current);
            }
            debug!(account, attempt, "storage account still provisioning");
        }
        Err(ApiError::ProvisioningTimeout {
            attempts: self.max_polls,
        })
    }
}

#[async_trait]
impl ResourceGroups for ArmClient {
    async fn create_or_update(
        &self,
        group: &str,
        params: ResourceGroupParams,
    ) -> Result<ResourceGroup, ApiError> {
        debug!(group, "creating resource group");
        self.execute(
            self.http.put(self.group_url(group)).json(&params),
            RESOURCES_API_VERSION,
        )
        .await
    }
}

#[async_trait]
impl StorageAccounts for ArmClient {
    async fn create(
        &self,
        group: &str,
        account: &str,
        params: StorageAccountCreateParams,
    ) -> Result<StorageAccount, ApiError> {
        debug!(group, account, "creating storage account");
        let response = self
            .http
            .put(self.account_url(group, account))
            .query(&[("api-version", STORAGE_API_VERSION)])
            .bearer_auth(self.credentials.bearer())
            .json(&params)
            .send()
            .await?;

        let status = response.status();
        // Creation is a long-running operation; the service usually answers
        // 202 with an empty body and provisions in the background.
        if status == reqwest::StatusCode::ACCEPTED {
            return self.wait_for_provisioning(group, account).await;
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(service_error(status.as_u16(), &body));
        }

        let created: StorageAccount = serde_json::from_str(&body)?;
        if created.is_provisioned() {
            Ok(created)
        } else {
            self.wait_for_provisioning(group, account).await
        }
    }

    async fn get_properties(
        &self,
        group: &str,
        account: &str,
    ) -> Result<StorageAccount, ApiError> {
        self.execute(
            self.http.get(self.account_url(group, account)),
            STORAGE_API_VERSION,
        )
        .await
    }

    async fn list_by_resource_group(
        &self,
        group: &str,
    ) -> Result<ListResult<StorageAccount>, ApiError> {
        let url = format!(
            "{}/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts",
            self.subscription_url(),
            group
        );
        self.execute(self.http.get(url), STORAGE_API_VERSION).await
    }

    async fn list(&self) -> Result<ListResult<StorageAccount>, ApiError> {
        let url = format!("{}/storageAccounts", self.storage_provider_url());
        self.execute(self.http.get(url), STORAGE_API_VERSION).await
    }

    async fn list_keys(&self, group: &str, account: &str) -> Result<KeyList, ApiError> {
        let url = format!("{}/listKeys", self.account_url(group, account));
        self.execute(self.http.post(url), STORAGE_API_VERSION).await
    }

    async fn regenerate_key(
        &self,
        group: &str,
        account: &str,
        key_name: &str,
    ) -> Result<KeyList, ApiError> {
        debug!(group, account, key_name, "regenerating storage account key");
        let url = format!("{}/regenerateKey", self.account_url(group, account));
        let body = serde_json::json!({ "keyName": key_name });
        self.execute(self.http.post(url).json(&body), STORAGE_API_VERSION)
            .await
    }

    async fn update(
        &self,
        group: &str,
        account: &str,
        params: StorageAccountUpdateParams,
    ) -> Result<StorageAccount, ApiError> {
        debug!(group, account, "updating storage account");
        self.execute(
            self.http.patch(self.account_url(group, account)).json(&params),
            STORAGE_API_VERSION,
        )
        .await
    }

    async fn check_name_availability(
        &self,
        name: &str,
    ) -> Result<NameAvailability, ApiError> {
        let url = format!("{}/checkNameAvailability", self.storage_provider_url());
        let body = CheckNameRequest::storage_account(name);
        self.execute(self.http.post(url).json(&body), STORAGE_API_VERSION)
            .await
    }
}

#[async_trait]
impl Usages for ArmClient {
    async fn list(&self) -> Result<ListResult<Usage>, ApiError> {
        let url = format!("{}/usages", self.storage_provider_url());
        self.execute(self.http.get(url), STORAGE_API_VERSION).await
    }
}

/// The management API wraps failures as `{"error": {"code", "message"}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

fn service_error(status: u16, body: &str) -> ApiError {
    let envelope: ErrorEnvelope =
        serde_json::from_str(body).unwrap_or(ErrorEnvelope { error: None });
    let detail = envelope.error.unwrap_or(ErrorDetail {
        code: None,
        message: None,
    });
    ApiError::Service {
        status,
        code: detail.code.unwrap_or_else(|| format!("http_{}", status)),
        message: detail
            .message
            .unwrap_or_else(|| "no detail provided".to_string()),
    }
}
