//! Structured CBAM request extracted from a free-text question.

use serde::{Deserialize, Serialize};

/// What the classifier could extract from one question.
///
/// Produced once per turn and consumed once by the fast-path decision.
/// The three fields are extracted independently against the full input,
/// so they are not guaranteed to refer to the same clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedRequest {
    /// Product name, lower-cased (e.g. "steel").
    pub product: Option<String>,

    /// Quantity in tonnes.
    pub quantity: Option<u64>,

    /// Declared embedded emissions in tCO₂e per tonne.
    pub declared_emissions: Option<f64>,

    /// Carbon price already paid at origin (€/tCO₂e). Defaults to 0.
    pub origin_price: f64,
}

impl ParsedRequest {
    /// An empty parse: nothing matched, origin price defaulted.
    pub fn empty() -> Self {
        Self {
            product: None,
            quantity: None,
            declared_emissions: None,
            origin_price: 0.0,
        }
    }

    /// Fast-path candidacy: product and quantity both extracted.
    ///
    /// Candidacy is not eligibility — an unknown product with no declared
    /// emissions still falls through to the slow path.
    pub fn is_fast_path_candidate(&self) -> bool {
        self.product.is_some() && self.quantity.is_some()
    }
}
