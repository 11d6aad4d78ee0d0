use crate::core::{Country, Customer, CustomerId, Division, ReferenceDataProvider};
use crate::utils::error::{CrmError, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

pub const COUNTRIES_FILE: &str = "countries.csv";
pub const DIVISIONS_FILE: &str = "divisions.csv";
pub const CUSTOMERS_FILE: &str = "customers.csv";

/// Reference store backed by three CSV files in one directory.
#[derive(Debug, Clone)]
pub struct CsvStore {
    base_path: PathBuf,
    operator: String,
}

impl CsvStore {
    pub fn new(base_path: impl Into<PathBuf>, operator: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            operator: operator.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn read_rows<T: DeserializeOwned>(&self, operation: &str, file: &str) -> Result<Vec<T>> {
        let path = self.base_path.join(file);
        let mut reader = csv::Reader::from_path(&path).map_err(|e| {
            CrmError::data_access(operation, format!("cannot open {}: {}", path.display(), e))
        })?;

        let mut rows = Vec::new();
        for row in reader.deserialize::<T>() {
            rows.push(row?);
        }
        tracing::debug!("Read {} rows from {}", rows.len(), path.display());
        Ok(rows)
    }

    /// Per-process staging file, so concurrent writers never share one.
    fn staging_path(&self) -> PathBuf {
        self.base_path
            .join(format!("{}.{}.tmp", CUSTOMERS_FILE, std::process::id()))
    }

    /// Writes the full customer table next to the original, then swaps it in.
    fn replace_customers(&self, customers: &[Customer]) -> Result<()> {
        let path = self.base_path.join(CUSTOMERS_FILE);
        let staging = self.staging_path();

        let written = (|| -> Result<()> {
            let mut writer = csv::Writer::from_path(&staging)?;
            for customer in customers {
                writer.serialize(customer)?;
            }
            writer.flush()?;
            Ok(())
        })();

        if let Err(e) = written {
            let _ = fs::remove_file(&staging);
            return Err(CrmError::data_access(
                "update_customer",
                format!("writing {} failed: {}", staging.display(), e),
            ));
        }

        fs::rename(&staging, &path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            CrmError::data_access(
                "update_customer",
                format!("replacing {} failed: {}", path.display(), e),
            )
        })
    }
}

#[async_trait]
impl ReferenceDataProvider for CsvStore {
    async fn list_countries(&self) -> Result<Vec<Country>> {
        self.read_rows("list_countries", COUNTRIES_FILE)
    }

    async fn list_divisions(&self) -> Result<Vec<Division>> {
        self.read_rows("list_divisions", DIVISIONS_FILE)
    }

    async fn fetch_customer(&self, id: CustomerId) -> Result<Customer> {
        let customers: Vec<Customer> = self.read_rows("fetch_customer", CUSTOMERS_FILE)?;
        customers
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CrmError::not_found("Customer", id))
    }

    async fn update_customer(&self, customer: &Customer) -> Result<Customer> {
        let divisions: Vec<Division> = self.read_rows("update_customer", DIVISIONS_FILE)?;
        if !divisions.iter().any(|d| d.id == customer.division_id) {
            return Err(CrmError::not_found("Division", customer.division_id));
        }

        let mut customers: Vec<Customer> = self.read_rows("update_customer", CUSTOMERS_FILE)?;
        let slot = customers
            .iter_mut()
            .find(|c| c.id == customer.id)
            .ok_or_else(|| CrmError::not_found("Customer", customer.id))?;

        let mut updated = customer.clone();
        updated.last_update = Some(Utc::now());
        updated.last_updated_by = Some(self.operator.clone());
        *slot = updated.clone();

        self.replace_customers(&customers)?;
        tracing::info!(
            "Stored customer {} (updated by {})",
            updated.id,
            self.operator
        );
        Ok(updated)
    }
}
