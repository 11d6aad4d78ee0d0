pub mod division_filter;
pub mod edit_form;
pub mod field_validator;

pub use crate::domain::model::{Country, CountryId, Customer, CustomerId, Division, DivisionId, Screen};
pub use crate::domain::ports::{ConfigProvider, Navigator, ReferenceDataProvider};
pub use crate::utils::error::Result;
