pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{CsvStore, ScreenLog};
pub use crate::app::{CustomerEdits, EditEngine, EditReport};
pub use crate::config::TomlConfig;
pub use crate::core::edit_form::{CustomerEditForm, FormState, SaveOutcome};
pub use crate::core::field_validator::{validate_fields, FieldErrors, FormField, FormValues};
pub use crate::utils::error::{CrmError, Result};
