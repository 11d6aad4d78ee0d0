use crate::config::toml_config::{TomlConfig, DEFAULT_OPERATOR};
use crate::config::DEFAULT_DATA_DIR;
use crate::app::CustomerEdits;
use crate::core::{ConfigProvider, CountryId, DivisionId};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "crm-desk")]
#[command(about = "Edit customer records kept in a CSV-backed CRM store")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding countries.csv, divisions.csv and customers.csv
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Name recorded as the last updater of saved customers
    #[arg(long)]
    pub operator: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print a customer with its resolved country and State/Province
    Show {
        #[arg(long)]
        customer_id: i32,
    },
    /// List the States/Provinces of one country
    Divisions {
        #[arg(long)]
        country_id: i32,
    },
    /// Change fields of a customer and save through the edit form
    Edit(EditArgs),
}

#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    #[arg(long)]
    pub customer_id: i32,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub postal_code: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub country_id: Option<i32>,
    #[arg(long)]
    pub division_id: Option<i32>,
}

impl From<&EditArgs> for CustomerEdits {
    fn from(args: &EditArgs) -> Self {
        CustomerEdits {
            name: args.name.clone(),
            address: args.address.clone(),
            postal_code: args.postal_code.clone(),
            phone: args.phone.clone(),
            country_id: args.country_id.map(CountryId),
            division_id: args.division_id.map(DivisionId),
        }
    }
}

impl CliConfig {
    /// Fills every setting not given on the command line from the file.
    pub fn merge_file(&mut self, file: &TomlConfig) {
        if self.data_dir.is_none() {
            self.data_dir = Some(file.store.data_dir.clone());
        }
        if self.operator.is_none() {
            self.operator = file.operator_name().map(str::to_string);
        }
        self.verbose |= file.verbose_logging();
        self.json_logs |= file.json_logging();
    }
}

impl ConfigProvider for CliConfig {
    fn data_dir(&self) -> &str {
        self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR)
    }

    fn operator(&self) -> &str {
        self.operator.as_deref().unwrap_or(DEFAULT_OPERATOR)
    }

    fn verbose(&self) -> bool {
        self.verbose
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("data_dir", self.data_dir())?;
        validate_non_empty_string("operator", self.operator())?;
        Ok(())
    }
}
