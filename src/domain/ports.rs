use crate::domain::model::{Country, Customer, CustomerId, Division, Screen};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Source of reference data and sink for customer updates.
///
/// `update_customer` is all-or-nothing: on error the stored record is unchanged.
#[async_trait]
pub trait ReferenceDataProvider: Send + Sync {
    async fn list_countries(&self) -> Result<Vec<Country>>;
    async fn list_divisions(&self) -> Result<Vec<Division>>;
    async fn fetch_customer(&self, id: CustomerId) -> Result<Customer>;
    async fn update_customer(&self, customer: &Customer) -> Result<Customer>;
}

#[async_trait]
impl<T: ReferenceDataProvider + ?Sized> ReferenceDataProvider for Arc<T> {
    async fn list_countries(&self) -> Result<Vec<Country>> {
        (**self).list_countries().await
    }

    async fn list_divisions(&self) -> Result<Vec<Division>> {
        (**self).list_divisions().await
    }

    async fn fetch_customer(&self, id: CustomerId) -> Result<Customer> {
        (**self).fetch_customer(id).await
    }

    async fn update_customer(&self, customer: &Customer) -> Result<Customer> {
        (**self).update_customer(customer).await
    }
}

pub trait Navigator {
    fn go_to(&mut self, screen: Screen);
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn operator(&self) -> &str;
    fn verbose(&self) -> bool;
}
