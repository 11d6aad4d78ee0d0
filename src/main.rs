use anyhow::Context;
use clap::Parser;
use crm_desk::config::{Command, EditArgs};
use crm_desk::core::division_filter::divisions_for_country;
use crm_desk::core::{ConfigProvider, CountryId, CustomerId, ReferenceDataProvider};
use crm_desk::utils::error::ErrorSeverity;
use crm_desk::utils::{logger, validation::Validate};
use crm_desk::{CliConfig, CrmError, CsvStore, CustomerEdits, EditEngine, SaveOutcome, TomlConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    if let Some(path) = config.config.clone() {
        let file = TomlConfig::from_file(&path)
            .with_context(|| format!("Failed to load config file '{}'", path))?;
        file.validate()
            .with_context(|| format!("Invalid config file '{}'", path))?;
        config.merge_file(&file);
    }

    if config.json_logs {
        logger::init_json_logger(config.verbose());
    } else {
        logger::init_cli_logger(config.verbose());
    }
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }

    let store = CsvStore::new(config.data_dir(), config.operator());

    let result = match &config.command {
        Command::Show { customer_id } => show_customer(&store, CustomerId(*customer_id)).await,
        Command::Divisions { country_id } => list_divisions(&store, CountryId(*country_id)).await,
        Command::Edit(args) => edit_customer(store, args).await,
    };

    match result {
        Ok(0) => Ok(()),
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!(
                "❌ {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    }
}

fn exit_code(e: &CrmError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    }
}

async fn show_customer(store: &CsvStore, id: CustomerId) -> crm_desk::Result<i32> {
    let customer = store.fetch_customer(id).await?;
    let divisions = store.list_divisions().await?;
    let countries = store.list_countries().await?;

    let division = divisions.iter().find(|d| d.id == customer.division_id);
    let country = division.and_then(|d| countries.iter().find(|c| c.id == d.country_id));

    let view = serde_json::json!({
        "customer": customer,
        "division": division,
        "country": country,
    });
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(0)
}

async fn list_divisions(store: &CsvStore, country_id: CountryId) -> crm_desk::Result<i32> {
    let countries = store.list_countries().await?;
    let country = countries
        .iter()
        .find(|c| c.id == country_id)
        .ok_or_else(|| CrmError::not_found("Country", country_id))?;

    let divisions = store.list_divisions().await?;
    println!("{} ({})", country.name, country.id);
    for division in divisions_for_country(&divisions, country_id) {
        println!("{}\t{}", division.id, division.name);
    }
    Ok(0)
}

async fn edit_customer(store: CsvStore, args: &EditArgs) -> crm_desk::Result<i32> {
    let edits = CustomerEdits::from(args);
    if edits.is_empty() {
        tracing::warn!("No field changes given; the customer will be saved as loaded");
    }

    let engine = EditEngine::new(store);
    let report = engine.run(CustomerId(args.customer_id), &edits).await?;

    if let Some(warning) = &report.open_warning {
        eprintln!("⚠️  {}", warning);
    }

    match report.outcome {
        SaveOutcome::Saved(customer) => {
            println!("✅ Customer {} saved", customer.id);
            if let Some(screen) = report.screen {
                println!("➡️  Returned to the {} screen", screen);
            }
            Ok(0)
        }
        SaveOutcome::Invalid(errors) => {
            eprintln!("❌ Customer {} was not saved:", args.customer_id);
            for (field, message) in errors.iter() {
                eprintln!("   {}: {}", field.label(), message);
            }
            Ok(1)
        }
        SaveOutcome::Failed(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            Ok(exit_code(&e))
        }
    }
}
