mod accrual_session;
mod earnings_profile;
mod raw_form_input;
mod tax_rate_table;

pub use accrual_session::AccrualSession;
pub use earnings_profile::EarningsProfile;
pub use raw_form_input::{FormField, RawFormInput, normalize_field};
pub use tax_rate_table::TaxRateTable;
