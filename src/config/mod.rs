#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command, EditArgs};
pub use toml_config::TomlConfig;

pub const DEFAULT_DATA_DIR: &str = "./data";
