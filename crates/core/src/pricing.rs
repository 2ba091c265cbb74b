//! Carbon price state and reference data.
//!
//! The EU ETS allowance price is the subtracted-from term of the CBAM cost
//! formula. It starts at the default market price and can be overridden by
//! a manual entry or by selecting one of the recorded historic dates.
//! Exactly one override is active at a time — the `PriceSource` enum makes
//! the mutual exclusion unrepresentable rather than merely checked.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::PriceError;

/// Default EU ETS allowance price (€/tCO₂e), Oct 31 2025 market price.
pub const DEFAULT_CARBON_PRICE: f64 = 78.54;

/// Upper bound accepted for manual price entry (€/tCO₂e).
pub const MANUAL_PRICE_CEILING: f64 = 500.0;

/// Recent EU ETS prices (Oct 2025), newest first.
/// Source: tradingeconomics.com/commodity/carbon
pub const RECENT_PRICES: &[(&str, f64)] = &[
    ("2025-10-31", 78.54),
    ("2025-10-01", 76.30),
    ("2025-09-15", 74.80),
    ("2025-09-01", 73.20),
];

/// Default emission factors (tCO₂e per tonne of product).
/// Used when a question does not declare actual embedded emissions.
pub const DEFAULT_EMISSION_FACTORS: &[(&str, f64)] = &[
    ("steel", 2.3),
    ("aluminum", 8.6),
    ("cement", 0.9),
    ("fertilizer", 1.5),
    ("electricity", 0.4),
    ("glass", 0.8),
    ("ceramics", 0.7),
    ("hydrogen", 10.0),
];

/// Look up the default emission factor for a product (lowercase name).
pub fn emission_factor(product: &str) -> Option<f64> {
    DEFAULT_EMISSION_FACTORS
        .iter()
        .find(|(name, _)| *name == product)
        .map(|(_, factor)| *factor)
}

/// Look up the recorded historic price for a date.
pub fn historic_price(date: NaiveDate) -> Option<f64> {
    let key = date.format("%Y-%m-%d").to_string();
    RECENT_PRICES
        .iter()
        .find(|(d, _)| *d == key)
        .map(|(_, p)| *p)
}

/// Where the current price came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PriceSource {
    /// Default market price
    Default,
    /// Manual user override
    Manual,
    /// A recorded historic date
    Historic { date: NaiveDate },
}

/// Per-session carbon price state.
///
/// Mutated only by explicit user actions; read by the calculator and the
/// prompt assembler on every turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonPriceState {
    current: f64,
    source: PriceSource,
}

impl CarbonPriceState {
    /// Start at the default market price.
    pub fn new() -> Self {
        Self {
            current: DEFAULT_CARBON_PRICE,
            source: PriceSource::Default,
        }
    }

    /// The price in effect (€/tCO₂e).
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Which source the current price came from.
    pub fn source(&self) -> PriceSource {
        self.source
    }

    /// Whether any override (manual or historic) is active.
    pub fn is_overridden(&self) -> bool {
        self.source != PriceSource::Default
    }

    /// Apply a manual price override.
    ///
    /// Rejected while a historic date is selected, and for values outside
    /// (0, 500]. On rejection the state is unchanged.
    pub fn set_manual(&mut self, price: f64) -> Result<(), PriceError> {
        if let PriceSource::Historic { .. } = self.source {
            return Err(PriceError::HistoricActive);
        }
        if price <= 0.0 {
            return Err(PriceError::NonPositive(price));
        }
        if price > MANUAL_PRICE_CEILING {
            return Err(PriceError::AboveCeiling {
                price,
                ceiling: MANUAL_PRICE_CEILING,
            });
        }
        self.current = price;
        self.source = PriceSource::Manual;
        Ok(())
    }

    /// Select a recorded historic date. Clears any manual override.
    pub fn select_historic(&mut self, date: NaiveDate) -> Result<(), PriceError> {
        let price = historic_price(date).ok_or(PriceError::UnknownDate(date))?;
        self.current = price;
        self.source = PriceSource::Historic { date };
        Ok(())
    }

    /// Restore the default market price, clearing any override.
    pub fn reset(&mut self) {
        self.current = DEFAULT_CARBON_PRICE;
        self.source = PriceSource::Default;
    }
}

impl Default for CarbonPriceState {
    fn default() -> Self {
        Self::new()
    }
}
