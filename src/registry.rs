use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;
use crate::normalize::normalize_name;

/// The deployment shipped with the binaries.
pub const BUILTIN_DEPLOYMENT: &str = include_str!("../config/matsya.toml");

fn default_fallback_customer() -> String {
    "Walk-ins".to_string()
}

/// On-disk shape of a deployment file.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentConfig {
    pub name: String,
    pub account_id: String,
    #[serde(default = "default_fallback_customer")]
    pub fallback_customer: String,
    pub customers: BTreeMap<String, String>,
}

impl DeploymentConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
}

/// Table name to customer identifier lookup. Keys are stored normalized.
#[derive(Debug)]
pub struct CustomerRegistry {
    customers: HashMap<String, String>,
    fallback_id: String,
}

impl CustomerRegistry {
    pub fn new<I, K, V>(customers: I, fallback_customer: &str) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut normalized: HashMap<String, String> = HashMap::new();
        let mut originals: HashMap<String, String> = HashMap::new();

        for (name, id) in customers {
            let (name, id) = (name.as_ref(), id.as_ref().trim());
            if id.is_empty() {
                return Err(ConfigError::BlankIdentifier(name.to_string()));
            }

            let key = normalize_name(name);
            if let Some(previous) = normalized.get(&key) {
                if previous != id {
                    return Err(ConfigError::DuplicateCustomer {
                        first: originals.remove(&key).unwrap_or_default(),
                        second: name.to_string(),
                    });
                }
            }
            originals.insert(key.clone(), name.to_string());
            normalized.insert(key, id.to_string());
        }

        let fallback_id = normalized
            .get(&normalize_name(fallback_customer))
            .cloned()
            .ok_or_else(|| ConfigError::MissingFallback(fallback_customer.to_string()))?;

        Ok(Self {
            customers: normalized,
            fallback_id,
        })
    }

    /// Exact lookup; `name` is normalized first.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.customers.get(&normalize_name(name)).map(String::as_str)
    }

    pub fn fallback_id(&self) -> &str {
        &self.fallback_id
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }
}

/// One accounting setup: who gets invoiced and which revenue account the
/// lines post against.
#[derive(Debug, Clone)]
pub struct Deployment {
    pub name: String,
    pub account_id: String,
    pub registry: Arc<CustomerRegistry>,
}

impl Deployment {
    pub fn from_config(config: DeploymentConfig) -> Result<Self, ConfigError> {
        let account_id = config.account_id.trim();
        if account_id.is_empty() {
            return Err(ConfigError::MissingAccount);
        }

        let registry = CustomerRegistry::new(&config.customers, &config.fallback_customer)?;
        info!(
            deployment = %config.name,
            customers = registry.len(),
            "loaded customer registry"
        );

        Ok(Self {
            account_id: account_id.to_string(),
            name: config.name,
            registry: Arc::new(registry),
        })
    }

    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_config(DeploymentConfig::from_toml(BUILTIN_DEPLOYMENT)?)
    }

    /// Loads the deployment at `path`, or the built-in one without a path.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_config(DeploymentConfig::load(path)?),
            None => Self::builtin(),
        }
    }
}
