pub mod loader;

pub use loader::{TableFormat, TaxRateLoader, TaxRateLoaderError, TaxRateRecord, default_table};
