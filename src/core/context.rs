//! Run context - state threaded through the steps of one run

use crate::core::config::Settings;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Mutable state owned by exactly one in-flight run
///
/// The resource names are generated once at construction and stay constant
/// for the lifetime of the run; a retry is a brand new run with fresh
/// names, since the management API is not safe to replay with fixed names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunContext {
    /// Unique id of this run
    pub run_id: Uuid,

    /// Generated resource group name
    pub resource_group: String,

    /// Generated storage account name
    pub account_name: String,

    /// Region for the created resources
    pub location: String,

    /// Fully qualified id of the created storage account, once known
    pub account_id: Option<String>,

    /// Result payload of the most recently completed step
    pub last_payload: Option<Value>,
}

impl RunContext {
    /// Create a context for a new run, generating the resource names
    pub fn new(settings: &Settings) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            resource_group: generate_name(&settings.group_prefix),
            account_name: generate_name(&settings.account_prefix),
            location: settings.location.clone(),
            account_id: None,
            last_payload: None,
        }
    }

    /// Record a step's success payload as the most recent result
    pub fn record(&mut self, payload: Value) {
        self.last_payload = Some(payload);
    }
}

/// Generate a resource name: prefix plus a short random suffix
///
/// Storage account names must be lowercase alphanumeric and at most 24
/// characters, so the suffix is a slice of a v4 uuid's hex form.
pub fn generate_name(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}{}", prefix, &suffix[..6])
}
