//! Wire models for the resource and storage management APIs

use serde::{Deserialize, Serialize};

/// Parameters for creating or updating a resource group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceGroupParams {
    pub location: String,
}

/// A resource group as returned by the management API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub properties: Option<ResourceGroupProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupProperties {
    #[serde(default)]
    pub provisioning_state: Option<String>,
}

/// Storage account pricing tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sku {
    pub name: String,
}

impl Sku {
    pub fn standard_lrs() -> Self {
        Sku {
            name: "Standard_LRS".to_string(),
        }
    }

    pub fn standard_grs() -> Self {
        Sku {
            name: "Standard_GRS".to_string(),
        }
    }
}

/// Parameters for creating a storage account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageAccountCreateParams {
    pub location: String,
    pub sku: Sku,
    pub kind: String,
}

impl StorageAccountCreateParams {
    /// The walkthrough's defaults: Standard_LRS, classic `Storage` kind
    pub fn standard(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            sku: Sku::standard_lrs(),
            kind: "Storage".to_string(),
        }
    }
}

/// Parameters for updating a storage account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageAccountUpdateParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
}

/// A storage account as returned by the management API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccount {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub sku: Option<Sku>,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub properties: Option<StorageAccountProperties>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountProperties {
    #[serde(default)]
    pub provisioning_state: Option<String>,
    #[serde(default)]
    pub primary_location: Option<String>,
    #[serde(default)]
    pub status_of_primary: Option<String>,
}

impl StorageAccount {
    /// Whether the account has finished provisioning
    pub fn is_provisioned(&self) -> bool {
        self.properties
            .as_ref()
            .and_then(|p| p.provisioning_state.as_deref())
            .map(|s| s.eq_ignore_ascii_case("Succeeded"))
            .unwrap_or(false)
    }
}

/// An access key for a storage account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageAccountKey {
    pub key_name: String,
    pub value: String,
    #[serde(default)]
    pub permissions: Option<String>,
}

/// Result of listing or regenerating storage account keys
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyList {
    #[serde(default)]
    pub keys: Vec<StorageAccountKey>,
}

/// Request body for a name availability check
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckNameRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
}

impl CheckNameRequest {
    pub fn storage_account(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_type: "Microsoft.Storage/storageAccounts".to_string(),
        }
    }
}

/// Result of a name availability check
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameAvailability {
    pub name_available: bool,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One usage entry for the storage provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    #[serde(default)]
    pub unit: Option<String>,
    pub current_value: i64,
    pub limit: i64,
    #[serde(default)]
    pub name: Option<UsageName>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageName {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub localized_value: Option<String>,
}

/// The management API's list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResult<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}
