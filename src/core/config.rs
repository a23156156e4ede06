//! Run settings from the process environment and an optional profile file

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Environment variable names for the required identity settings.
pub const ENV_CLIENT_ID: &str = "CLIENT_ID";
pub const ENV_TENANT: &str = "DOMAIN";
pub const ENV_CLIENT_SECRET: &str = "APPLICATION_SECRET";
pub const ENV_SUBSCRIPTION_ID: &str = "AZURE_SUBSCRIPTION_ID";

const DEFAULT_LOCATION: &str = "westus";
const DEFAULT_GROUP_PREFIX: &str = "testrg";
const DEFAULT_ACCOUNT_PREFIX: &str = "testacc";

/// Configuration errors raised before any remote call is attempted
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Every missing required value is collected and reported together.
    #[error("missing required settings: {}", .missing.join(", "))]
    Missing { missing: Vec<String> },

    #[error("failed to read profile '{path}': {source}")]
    ProfileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile '{path}': {source}")]
    ProfileParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Optional profile file (YAML). Every field may be omitted; environment
/// variables take priority over profile values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default)]
    pub tenant: Option<String>,

    #[serde(default)]
    pub client_secret: Option<String>,

    #[serde(default)]
    pub subscription_id: Option<String>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub group_prefix: Option<String>,

    #[serde(default)]
    pub account_prefix: Option<String>,
}

impl Profile {
    /// Load a profile from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let display = path.as_ref().display().to_string();
        let content =
            std::fs::read_to_string(&path).map_err(|source| ConfigError::ProfileIo {
                path: display.clone(),
                source,
            })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::ProfileParse {
            path: display,
            source,
        })
    }
}

/// Fully resolved settings for one run
///
/// Constructed once at the process boundary and passed by reference into
/// the rest of the program; no component reads ambient configuration
/// itself.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Service principal (application) id
    pub client_id: String,

    /// Directory tenant the principal lives in
    pub tenant: String,

    /// Service principal secret
    pub client_secret: String,

    /// Subscription the walkthrough operates on
    pub subscription_id: String,

    /// Region for the created resources
    pub location: String,

    /// Prefix for the generated resource group name
    pub group_prefix: String,

    /// Prefix for the generated storage account name
    pub account_prefix: String,
}

impl Settings {
    /// Load settings from the environment, layered over an optional profile
    pub fn load(profile_path: Option<&Path>) -> Result<Self, ConfigError> {
        let profile = match profile_path {
            Some(path) => Profile::from_file(path)?,
            None => Profile::default(),
        };
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::resolve(&env, &profile)
    }

    /// Resolve settings from explicit sources
    ///
    /// Required values come from the environment first, then the profile.
    /// All missing required values are reported in one error, in a fixed
    /// order, rather than one at a time.
    pub fn resolve(
        env: &HashMap<String, String>,
        profile: &Profile,
    ) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();

        let client_id = required(env, ENV_CLIENT_ID, &profile.client_id, &mut missing);
        let tenant = required(env, ENV_TENANT, &profile.tenant, &mut missing);
        let client_secret =
            required(env, ENV_CLIENT_SECRET, &profile.client_secret, &mut missing);
        let subscription_id = required(
            env,
            ENV_SUBSCRIPTION_ID,
            &profile.subscription_id,
            &mut missing,
        );

        if !missing.is_empty() {
            return Err(ConfigError::Missing { missing });
        }

        Ok(Settings {
            client_id,
            tenant,
            client_secret,
            subscription_id,
            location: profile
                .location
                .clone()
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            group_prefix: profile
                .group_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_GROUP_PREFIX.to_string()),
            account_prefix: profile
                .account_prefix
                .clone()
                .unwrap_or_else(|| DEFAULT_ACCOUNT_PREFIX.to_string()),
        })
    }
}

/// Look up a required value; an unset or empty environment variable does
/// not count as present.
fn required(
    env: &HashMap<String, String>,
    key: &str,
    fallback: &Option<String>,
    missing: &mut Vec<String>,
) -> String {
    match env.get(key).filter(|v| !v.is_empty()) {
        Some(value) => value.clone(),
        None => match fallback {
            Some(value) => value.clone(),
            None => {
                missing.push(key.to_string());
                String::new()
            }
        },
    }
}
