//! The storage-account management walkthrough
//!
//! Builds the fixed ten-step sequence the pipeline runner executes. The
//! ordering is rigid and data-dependent: the inputs (group and account
//! names) are fixed up front in the [`RunContext`], but each step's
//! remote-side success depends on the side effects of the previous one
//! (keys cannot be listed before the account exists).

use crate::arm::{
    ApiError, ArmClient, Clients, ResourceGroupParams, ResourceGroups, StorageAccounts,
    StorageAccountCreateParams, StorageAccountUpdateParams, Sku, TokenClient, Usages,
};
use crate::core::{RunContext, Settings, Step, StepAction};
use crate::execution::{PipelineError, PipelineRunner};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Number of steps in the walkthrough
pub const STEP_COUNT: usize = 10;

/// The key regenerated midway through the walkthrough
const REGENERATED_KEY: &str = "key1";

/// Build the walkthrough steps against the given collaborators
pub fn storage_walkthrough(clients: &Clients) -> Vec<Step> {
    vec![
        Step::new(
            "create_resource_group",
            CreateResourceGroup {
                client: clients.resource_groups.clone(),
            },
        ),
        Step::new(
            "create_storage_account",
            CreateStorageAccount {
                client: clients.storage_accounts.clone(),
            },
        ),
        Step::new(
            "get_storage_account",
            GetStorageAccount {
                client: clients.storage_accounts.clone(),
            },
        ),
        Step::new(
            "list_accounts_by_group",
            ListAccountsByGroup {
                client: clients.storage_accounts.clone(),
            },
        ),
        Step::new(
            "list_accounts",
            ListAccounts {
                client: clients.storage_accounts.clone(),
            },
        ),
        Step::new(
            "list_keys",
            ListKeys {
                client: clients.storage_accounts.clone(),
            },
        ),
        Step::new(
            "regenerate_keys",
            RegenerateKeys {
                client: clients.storage_accounts.clone(),
            },
        ),
        Step::new(
            "update_storage_account",
            UpdateStorageAccount {
                client: clients.storage_accounts.clone(),
            },
        ),
        Step::new(
            "check_name_availability",
            CheckNameAvailability {
                client: clients.storage_accounts.clone(),
            },
        ),
        Step::new(
            "list_usage",
            ListUsage {
                client: clients.usages.clone(),
            },
        ),
    ]
}

/// Authenticate and run the full walkthrough against the live endpoints
///
/// Returns the run's context so the caller can report the created resource
/// names. Resources created before a failure are left in place.
pub async fn run_live(
    settings: &Settings,
    runner: &PipelineRunner,
) -> Result<RunContext, PipelineError> {
    let credentials = TokenClient::new().exchange(settings).await?;
    let arm = Arc::new(ArmClient::new(
        credentials,
        settings.subscription_id.clone(),
    ));
    let clients = Clients::from_arm(arm);

    let mut ctx = RunContext::new(settings);
    let steps = storage_walkthrough(&clients);
    runner.run(steps, &mut ctx).await?;
    Ok(ctx)
}

struct CreateResourceGroup {
    client: Arc<dyn ResourceGroups>,
}

#[async_trait]
impl StepAction for CreateResourceGroup {
    async fn run(&self, ctx: &mut RunContext) -> Result<Value, ApiError> {
        let params = ResourceGroupParams {
            location: ctx.location.clone(),
        };
        let group = self
            .client
            .create_or_update(&ctx.resource_group, params)
            .await?;
        Ok(serde_json::to_value(group)?)
    }
}

struct CreateStorageAccount {
    client: Arc<dyn StorageAccounts>,
}

#[async_trait]
impl StepAction for CreateStorageAccount {
    async fn run(&self, ctx: &mut RunContext) -> Result<Value, ApiError> {
        let params = StorageAccountCreateParams::standard(ctx.location.clone());
        let account = self
            .client
            .create(&ctx.resource_group, &ctx.account_name, params)
            .await?;
        ctx.account_id = account.id.clone();
        Ok(serde_json::to_value(account)?)
    }
}

struct GetStorageAccount {
    client: Arc<dyn StorageAccounts>,
}

#[async_trait]
impl StepAction for GetStorageAccount {
    async fn run(&self, ctx: &mut RunContext) -> Result<Value, ApiError> {
        let account = self
            .client
            .get_properties(&ctx.resource_group, &ctx.account_name)
            .await?;
        Ok(serde_json::to_value(account)?)
    }
}

struct ListAccountsByGroup {
    client: Arc<dyn StorageAccounts>,
}

#[async_trait]
impl StepAction for ListAccountsByGroup {
    async fn run(&self, ctx: &mut RunContext) -> Result<Value, ApiError> {
        let accounts = self
            .client
            .list_by_resource_group(&ctx.resource_group)
            .await?;
        Ok(serde_json::to_value(accounts)?)
    }
}

struct ListAccounts {
    client: Arc<dyn StorageAccounts>,
}

#[async_trait]
impl StepAction for ListAccounts {
    async fn run(&self, _ctx: &mut RunContext) -> Result<Value, ApiError> {
        let accounts = self.client.list().await?;
        Ok(serde_json::to_value(accounts)?)
    }
}

struct ListKeys {
    client: Arc<dyn StorageAccounts>,
}

#[async_trait]
impl StepAction for ListKeys {
    async fn run(&self, ctx: &mut RunContext) -> Result<Value, ApiError> {
        let keys = self
            .client
            .list_keys(&ctx.resource_group, &ctx.account_name)
            .await?;
        Ok(serde_json::to_value(keys)?)
    }
}

struct RegenerateKeys {
    client: Arc<dyn StorageAccounts>,
}

#[async_trait]
impl StepAction for RegenerateKeys {
    async fn run(&self, ctx: &mut RunContext) -> Result<Value, ApiError> {
        let keys = self
            .client
            .regenerate_key(&ctx.resource_group, &ctx.account_name, REGENERATED_KEY)
            .await?;
        Ok(serde_json::to_value(keys)?)
    }
}

struct UpdateStorageAccount {
    client: Arc<dyn StorageAccounts>,
}

#[async_trait]
impl StepAction for UpdateStorageAccount {
    async fn run(&self, ctx: &mut RunContext) -> Result<Value, ApiError> {
        // The walkthrough upgrades the account from LRS to GRS replication.
        let params = StorageAccountUpdateParams {
            sku: Some(Sku::standard_grs()),
        };
        let account = self
            .client
            .update(&ctx.resource_group, &ctx.account_name, params)
            .await?;
        Ok(serde_json::to_value(account)?)
    }
}

struct CheckNameAvailability {
    client: Arc<dyn StorageAccounts>,
}

#[async_trait]
impl StepAction for CheckNameAvailability {
    async fn run(&self, ctx: &mut RunContext) -> Result<Value, ApiError> {
        let result = self
            .client
            .check_name_availability(&ctx.account_name)
            .await?;
        Ok(serde_json::to_value(result)?)
    }
}

struct ListUsage {
    client: Arc<dyn Usages>,
}

#[async_trait]
impl StepAction for ListUsage {
    async fn run(&self, _ctx: &mut RunContext) -> Result<Value, ApiError> {
        let usages = self.client.list().await?;
        Ok(serde_json::to_value(usages)?)
    }
}
