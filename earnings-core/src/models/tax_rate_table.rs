use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Read-only lookup from state name to tax rate (e.g. `0.05` for 5%).
///
/// Keys match exactly, so `"ohio"` and `"Ohio"` are different states.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRateTable {
    rates: BTreeMap<String, Decimal>,
}

impl TaxRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a rate, returning the previous one.
    pub fn insert(
        &mut self,
        state: impl Into<String>,
        rate: Decimal,
    ) -> Option<Decimal> {
        self.rates.insert(state.into(), rate)
    }

    pub fn get(
        &self,
        state: &str,
    ) -> Option<Decimal> {
        self.rates.get(state).copied()
    }

    pub fn contains(
        &self,
        state: &str,
    ) -> bool {
        self.rates.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// State names in alphabetical order.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.rates.iter().map(|(state, rate)| (state.as_str(), *rate))
    }
}

impl<S: Into<String>> FromIterator<(S, Decimal)> for TaxRateTable {
    fn from_iter<I: IntoIterator<Item = (S, Decimal)>>(iter: I) -> Self {
        Self {
            rates: iter
                .into_iter()
                .map(|(state, rate)| (state.into(), rate))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn lookup_is_case_sensitive() {
        let table: TaxRateTable = [("Ohio", dec!(0.035))].into_iter().collect();

        assert_eq!(table.get("Ohio"), Some(dec!(0.035)));
        assert_eq!(table.get("ohio"), None);
        assert!(!table.contains("OHIO"));
    }

    #[test]
    fn states_are_sorted() {
        let table: TaxRateTable = [("Texas", dec!(0)), ("Alaska", dec!(0)), ("Ohio", dec!(0.035))]
            .into_iter()
            .collect();

        assert_eq!(table.states().collect::<Vec<_>>(), vec!["Alaska", "Ohio", "Texas"]);
    }

    #[test]
    fn insert_replaces_existing_rate() {
        let mut table = TaxRateTable::new();

        assert_eq!(table.insert("Utah", dec!(0.0465)), None);
        assert_eq!(table.insert("Utah", dec!(0.0455)), Some(dec!(0.0465)));
        assert_eq!(table.len(), 1);
    }
}
