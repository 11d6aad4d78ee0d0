// Adapters layer: concrete implementations of the domain ports.

pub mod csv_store;
pub mod navigator;

pub use csv_store::CsvStore;
pub use navigator::ScreenLog;
