//! Fast-path eligibility and the structured calculation response.

use cbam_core::{pricing, ParsedRequest};

use crate::cost::compute_cost;

/// A completed fast-path calculation, ready to be formatted as the
/// assistant's reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    pub product: String,
    pub quantity: u64,
    /// tCO₂e per tonne — declared by the user or the table default.
    pub emission_factor: f64,
    /// `emission_factor × quantity`
    pub total_emissions: f64,
    pub origin_price: f64,
    pub eu_price: f64,
    pub cost: f64,
}

/// Decide fast-path eligibility and, when eligible, run the calculation.
///
/// Eligible iff product and quantity were both extracted AND an emission
/// factor is available (declared in the question, or the product is in the
/// default table). An unknown product revokes eligibility — the caller
/// falls through to the slow path.
pub fn fast_path(request: &ParsedRequest, eu_price: f64) -> Option<Calculation> {
    if !request.is_fast_path_candidate() {
        return None;
    }
    let product = request.product.clone()?;
    let quantity = request.quantity?;

    let emission_factor = match request.declared_emissions {
        Some(declared) => declared,
        None => pricing::emission_factor(&product)?,
    };

    let total_emissions = emission_factor * quantity as f64;
    let cost = compute_cost(total_emissions, request.origin_price, eu_price);

    tracing::info!(
        product = %product,
        quantity,
        total_emissions,
        cost,
        "fast path calculation"
    );

    Some(Calculation {
        product,
        quantity,
        emission_factor,
        total_emissions,
        origin_price: request.origin_price,
        eu_price,
        cost,
    })
}

impl Calculation {
    /// The structured Markdown reply appended as the assistant message.
    pub fn report(&self) -> String {
        format!(
            "**CBAM Cost Calculation**\n\
             **Product:** {product} | **Quantity:** {quantity} tonnes\n\
             **Emission factor:** {factor} tCO₂e/tonne\n\
             **Total emissions:** {total} tCO₂e\n\
             **EU ETS price:** €{eu:.2} | **Origin price:** €{origin:.2}\n\
             \n\
             **Estimated CBAM cost: €{cost}**\n\
             \n\
             *Calculation:* {total} × (€{eu:.2} – €{origin:.2}) = €{cost}\n\
             > *Estimate only – use verified emissions for official filing.*",
            product = title_case(&self.product),
            quantity = group_thousands(&self.quantity.to_string()),
            factor = self.emission_factor,
            total = format_amount(self.total_emissions),
            eu = self.eu_price,
            origin = self.origin_price,
            cost = format_amount(self.cost),
        )
    }
}

/// Capitalize the first character ("steel" → "Steel").
fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Format a non-negative amount with two decimals and thousands separators
/// ("2300" → "2,300.00").
fn format_amount(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{}.{}", group_thousands(int_part), frac_part)
}

/// Insert commas every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let bytes = digits.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}
