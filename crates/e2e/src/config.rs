//! Declarative YAML store definitions

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::Path;

use rust_decimal::Decimal;
use storecheck_common::{Catalog, CatalogEntry};

use crate::error::{E2eError, E2eResult};

/// Everything a funnel scenario needs to know about one store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Unique name for this store scenario
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering scenarios
    #[serde(default)]
    pub tags: Vec<String>,

    /// Landing page of the store
    pub base_url: String,

    /// Category card on the home page that leads to the product
    pub product_category_name: String,

    /// Product and add-ons to purchase
    pub catalog: Catalog,

    /// IP address entered on the configure page
    pub ip_address: String,

    /// Sections expected on the checkout page, in order
    #[serde(default = "default_checkout_sections")]
    pub checkout_sections: Vec<String>,
}

fn default_checkout_sections() -> Vec<String> {
    [
        "Personal Information",
        "Billing Address",
        "Account Security",
        "Terms & Conditions",
        "Payment Details",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "cpanel-solo-cloud".to_string(),
            description: "cPanel Solo license with CloudLinux, LiteSpeed and Imunify360".to_string(),
            tags: vec!["smoke".to_string()],
            base_url: "https://store.cpanel.net/".to_string(),
            product_category_name: "cPanel Licenses".to_string(),
            catalog: Catalog::new(
                CatalogEntry::new("cPanel Solo® Cloud (1 Account)", Decimal::new(2699, 2)),
                vec![
                    CatalogEntry::new("Monthly CloudLinux for cPanel License", Decimal::new(16, 0)),
                    CatalogEntry::new("LiteSpeed 8GB", Decimal::new(25, 0)),
                    CatalogEntry::new("Monthly Imunify360 For cPanel Solo(R)", Decimal::new(12, 0)),
                ],
            ),
            ip_address: "2.2.2.2".to_string(),
            checkout_sections: default_checkout_sections(),
        }
    }
}

impl StoreConfig {
    /// Parse a store config from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a store config from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| E2eError::ConfigParse(format!("{}: {}", path.display(), e)))
    }

    /// Load all store configs from a directory
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut stores = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            stores.push(Self::from_file(entry.path())?);
        }

        Ok(stores)
    }

    /// Filter stores by tag
    pub fn filter_by_tag<'a>(stores: &'a [Self], tag: &str) -> Vec<&'a Self> {
        stores.iter().filter(|s| s.tags.iter().any(|t| t == tag)).collect()
    }

    pub fn validate(&self) -> E2eResult<()> {
        self.catalog.validate()?;

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(E2eError::InvalidConfig(format!(
                "base_url must be http(s): {}",
                self.base_url
            )));
        }

        self.ip_address.parse::<IpAddr>().map_err(|_| {
            E2eError::InvalidConfig(format!("ip_address is not an IP: {}", self.ip_address))
        })?;

        Ok(())
    }
}
