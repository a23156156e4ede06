//! Collaborator contracts for the management APIs
//!
//! The pipeline only ever talks to these traits; [`rest_client::ArmClient`]
//! is the REST implementation and the test suites substitute scripted
//! mocks.

pub mod auth;
pub mod models;
pub mod rest_client;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub use auth::{AuthError, Credentials, TokenClient};
pub use models::*;
pub use rest_client::ArmClient;

/// Error detail for a single failed remote call
#[derive(Debug, Error)]
pub enum ApiError {
    /// The service answered with an error status
    #[error("{code}: {message} (http {status})")]
    Service {
        status: u16,
        code: String,
        message: String,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Body(#[from] serde_json::Error),

    /// Account creation accepted but never reached a terminal state
    #[error("provisioning did not complete after {attempts} polls")]
    ProvisioningTimeout { attempts: u32 },
}

impl ApiError {
    /// An error-status response with the given service error code
    pub fn service(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Service {
            status,
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Resource group operations
#[async_trait]
pub trait ResourceGroups: Send + Sync {
    async fn create_or_update(
        &self,
        group: &str,
        params: ResourceGroupParams,
    ) -> Result<ResourceGroup, ApiError>;
}

/// Storage account operations
#[async_trait]
pub trait StorageAccounts: Send + Sync {
    async fn create(
        &self,
        group: &str,
        account: &str,
        params: StorageAccountCreateParams,
    ) -> Result<StorageAccount, ApiError>;

    async fn get_properties(
        &self,
        group: &str,
        account: &str,
    ) -> Result<StorageAccount, ApiError>;

    async fn list_by_resource_group(
        &self,
        group: &str,
    ) -> Result<ListResult<StorageAccount>, ApiError>;

    async fn list(&self) -> Result<ListResult<StorageAccount>, ApiError>;

    async fn list_keys(&self, group: &str, account: &str) -> Result<KeyList, ApiError>;

    async fn regenerate_key(
        &self,
        group: &str,
        account: &str,
        key_name: &str,
    ) -> Result<KeyList, ApiError>;

    async fn update(
        &self,
        group: &str,
        account: &str,
        params: StorageAccountUpdateParams,
    ) -> Result<StorageAccount, ApiError>;

    async fn check_name_availability(&self, name: &str)
        -> Result<NameAvailability, ApiError>;
}

/// Subscription-level storage usage
#[async_trait]
pub trait Usages: Send + Sync {
    async fn list(&self) -> Result<ListResult<Usage>, ApiError>;
}

/// The collaborator handles the walkthrough steps are built against
#[derive(Clone)]
pub struct Clients {
    pub resource_groups: Arc<dyn ResourceGroups>,
    pub storage_accounts: Arc<dyn StorageAccounts>,
    pub usages: Arc<dyn Usages>,
}

impl Clients {
    /// Point all three handles at a single management client
    pub fn from_arm(arm: Arc<ArmClient>) -> Self {
        Self {
            resource_groups: arm.clone(),
            storage_accounts: arm.clone(),
            usages: arm,
        }
    }
}
