//! Shared mock collaborators and assertion helpers

use armstor::arm::{
    ApiError, Clients, KeyList, ListResult, NameAvailability, ResourceGroup,
    ResourceGroupParams, ResourceGroupProperties, ResourceGroups, Sku, StorageAccount,
    StorageAccountCreateParams, StorageAccountKey, StorageAccountProperties,
    StorageAccountUpdateParams, StorageAccounts, Usage, UsageName, Usages,
};
use armstor::core::Settings;
use armstor::execution::{PipelineRunner, RunEvent};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// The error every failing mock produces
pub fn conflict() -> ApiError {
    ApiError::service(409, "Conflict", "operation conflicts with an in-flight change")
}

/// A canned storage account response
pub fn sample_account(group: &str, name: &str) -> StorageAccount {
    StorageAccount {
        id: Some(format!(
            "/subscriptions/sub/resourceGroups/{}/providers/Microsoft.Storage/storageAccounts/{}",
            group, name
        )),
        name: name.to_string(),
        location: Some("westus".to_string()),
        sku: Some(Sku::standard_lrs()),
        kind: Some("Storage".to_string()),
        properties: Some(StorageAccountProperties {
            provisioning_state: Some("Succeeded".to_string()),
            primary_location: Some("westus".to_string()),
            status_of_primary: Some("available".to_string()),
        }),
    }
}

fn sample_keys() -> KeyList {
    KeyList {
        keys: vec![
            StorageAccountKey {
                key_name: "key1".to_string(),
                value: "AAAA".to_string(),
                permissions: Some("FULL".to_string()),
            },
            StorageAccountKey {
                key_name: "key2".to_string(),
                value: "BBBB".to_string(),
                permissions: Some("FULL".to_string()),
            },
        ],
    }
}

/// Mock resource group service that records the names it was called with
#[derive(Default)]
pub struct MockResourceGroups {
    pub fail: bool,
    pub calls: Mutex<usize>,
    pub seen_groups: Mutex<Vec<String>>,
}

#[async_trait]
impl ResourceGroups for MockResourceGroups {
    async fn create_or_update(
        &self,
        group: &str,
        params: ResourceGroupParams,
    ) -> Result<ResourceGroup, ApiError> {
        *self.calls.lock().unwrap() += 1;
        self.seen_groups.lock().unwrap().push(group.to_string());
        if self.fail {
            return Err(conflict());
        }
        Ok(ResourceGroup {
            id: Some(format!("/subscriptions/sub/resourceGroups/{}", group)),
            name: group.to_string(),
            location: params.location,
            properties: Some(ResourceGroupProperties {
                provisioning_state: Some("Succeeded".to_string()),
            }),
        })
    }
}

/// Mock storage account service
///
/// Counts calls per operation, records every group/account name it sees,
/// and can be scripted to fail a single operation.
#[derive(Default)]
pub struct MockStorageAccounts {
    fail_on: Option<&'static str>,
    counts: Mutex<HashMap<&'static str, usize>>,
    pub seen_groups: Mutex<Vec<String>>,
    pub seen_accounts: Mutex<Vec<String>>,
    pub seen_key_names: Mutex<Vec<String>>,
}

impl MockStorageAccounts {
    pub fn failing_at(operation: &'static str) -> Self {
        Self {
            fail_on: Some(operation),
            ..Self::default()
        }
    }

    pub fn count(&self, operation: &str) -> usize {
        self.counts.lock().unwrap().get(operation).copied().unwrap_or(0)
    }

    fn track(
        &self,
        operation: &'static str,
        group: Option<&str>,
        account: Option<&str>,
    ) -> Result<(), ApiError> {
        *self.counts.lock().unwrap().entry(operation).or_insert(0) += 1;
        if let Some(group) = group {
            self.seen_groups.lock().unwrap().push(group.to_string());
        }
        if let Some(account) = account {
            self.seen_accounts.lock().unwrap().push(account.to_string());
        }
        if self.fail_on == Some(operation) {
            return Err(conflict());
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAccounts for MockStorageAccounts {
    async fn create(
        &self,
        group: &str,
        account: &str,
        _params: StorageAccountCreateParams,
    ) -> Result<StorageAccount, ApiError> {
        self.track("create", Some(group), Some(account))?;
        Ok(sample_account(group, account))
    }

    async fn get_properties(
        &self,
        group: &str,
        account: &str,
    ) -> Result<StorageAccount, ApiError> {
        self.track("get_properties", Some(group), Some(account))?;
        Ok(sample_account(group, account))
    }

    async fn list_by_resource_group(
        &self,
        group: &str,
    ) -> Result<ListResult<StorageAccount>, ApiError> {
        self.track("list_by_resource_group", Some(group), None)?;
        Ok(ListResult {
            value: vec![sample_account(group, "someacc")],
        })
    }

    async fn list(&self) -> Result<ListResult<StorageAccount>, ApiError> {
        self.track("list", None, None)?;
        Ok(ListResult {
            value: vec![sample_account("somerg", "someacc")],
        })
    }

    async fn list_keys(&self, group: &str, account: &str) -> Result<KeyList, ApiError> {
        self.track("list_keys", Some(group), Some(account))?;
        Ok(sample_keys())
    }

    async fn regenerate_key(
        &self,
        group: &str,
        account: &str,
        key_name: &str,
    ) -> Result<KeyList, ApiError> {
        self.seen_key_names.lock().unwrap().push(key_name.to_string());
        self.track("regenerate_key", Some(group), Some(account))?;
        Ok(sample_keys())
    }

    async fn update(
        &self,
        group: &str,
        account: &str,
        params: StorageAccountUpdateParams,
    ) -> Result<StorageAccount, ApiError> {
        self.track("update", Some(group), Some(account))?;
        let mut account = sample_account(group, account);
        account.sku = params.sku;
        Ok(account)
    }

    async fn check_name_availability(
        &self,
        name: &str,
    ) -> Result<NameAvailability, ApiError> {
        self.track("check_name_availability", None, Some(name))?;
        Ok(NameAvailability {
            name_available: false,
            reason: Some("AlreadyExists".to_string()),
            message: Some(format!("The storage account named {} is taken.", name)),
        })
    }
}

/// Mock usage service
#[derive(Default)]
pub struct MockUsages {
    pub fail: bool,
    pub calls: Mutex<usize>,
}

#[async_trait]
impl Usages for MockUsages {
    async fn list(&self) -> Result<ListResult<Usage>, ApiError> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            return Err(conflict());
        }
        Ok(ListResult {
            value: vec![Usage {
                unit: Some("Count".to_string()),
                current_value: 5,
                limit: 250,
                name: Some(UsageName {
                    value: Some("StorageAccounts".to_string()),
                    localized_value: Some("Storage Accounts".to_string()),
                }),
            }],
        })
    }
}

/// Bundle mocks into the collaborator handles the walkthrough expects
pub fn mock_clients(
    resource_groups: Arc<MockResourceGroups>,
    storage_accounts: Arc<MockStorageAccounts>,
    usages: Arc<MockUsages>,
) -> Clients {
    let resource_groups: Arc<dyn ResourceGroups> = resource_groups;
    let storage_accounts: Arc<dyn StorageAccounts> = storage_accounts;
    let usages: Arc<dyn Usages> = usages;
    Clients {
        resource_groups,
        storage_accounts,
        usages,
    }
}

/// Settings that never touch the real environment
pub fn test_settings() -> Settings {
    Settings {
        client_id: "app-id".to_string(),
        tenant: "tenant-id".to_string(),
        client_secret: "s3cret".to_string(),
        subscription_id: "sub-id".to_string(),
        location: "westus".to_string(),
        group_prefix: "testrg".to_string(),
        account_prefix: "testacc".to_string(),
    }
}

/// A runner whose events are captured into a shared vector
pub fn recording_runner() -> (PipelineRunner, Arc<Mutex<Vec<RunEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let mut runner = PipelineRunner::new();
    runner.add_event_handler(move |event| sink.lock().unwrap().push(event.clone()));
    (runner, events)
}

/// Labels of progress observations, in emission order
pub fn completed_labels(events: &[RunEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            RunEvent::StepCompleted { label, .. } => Some(label.clone()),
            _ => None,
        })
        .collect()
}

/// Labels of failure observations, in emission order
pub fn failed_labels(events: &[RunEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            RunEvent::StepFailed { label, .. } => Some(label.clone()),
            _ => None,
        })
        .collect()
}

/// Number of completion observations
pub fn completion_count(events: &[RunEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, RunEvent::RunCompleted { .. }))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_storage_accounts_counts_and_failure() {
        let mock = MockStorageAccounts::failing_at("regenerate_key");

        mock.list_keys("rg", "acc").await.unwrap();
        let err = mock.regenerate_key("rg", "acc", "key1").await.unwrap_err();

        assert!(matches!(err, ApiError::Service { status: 409, .. }));
        assert_eq!(mock.count("list_keys"), 1);
        assert_eq!(mock.count("regenerate_key"), 1);
        assert_eq!(mock.count("update"), 0);
        assert_eq!(*mock.seen_key_names.lock().unwrap(), vec!["key1"]);
    }
}
