//! Regex-based request classification.
//!
//! Three extractions run independently against the full input:
//! quantity + product, declared emissions, origin carbon price. First match
//! wins for each. There is no requirement that the matches refer to the same
//! clause of a compound sentence — a known heuristic limitation that is
//! preserved on purpose (see the cross-clause test below).

use std::sync::LazyLock;

use regex::Regex;

use cbam_core::ParsedRequest;

/// "<integer, optional thousands separators> ton(s) [of] <word>"
static QUANTITY_PRODUCT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:,\d{3})*)\s+tons?\s+(?:of\s+)?(\w+)").expect("quantity regex")
});

/// "<number> tCO2e[/ton]" anywhere in the text
static DECLARED_EMISSIONS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*tCO2e?(?:/ton)?").expect("emissions regex"));

/// "origin"/"paid"/"cost" followed (non-greedily) by an optional currency
/// symbol and a number
static ORIGIN_PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:origin|paid|cost).*?€?(\d+(?:\.\d+)?)").expect("origin regex")
});

/// Parse a free-text question into a structured CBAM request.
///
/// Pure function; never fails. Anything it cannot extract is simply absent
/// (origin price defaults to 0), and the caller falls through to the slow
/// path.
pub fn classify(text: &str) -> ParsedRequest {
    let mut request = ParsedRequest::empty();

    if let Some(caps) = QUANTITY_PRODUCT.captures(text) {
        // Strip thousands separators before parsing. A quantity too large
        // for u64 is treated as not extracted at all.
        let digits = caps[1].replace(',', "");
        if let Ok(quantity) = digits.parse::<u64>() {
            request.quantity = Some(quantity);
            request.product = Some(caps[2].to_lowercase());
        }
    }

    if let Some(caps) = DECLARED_EMISSIONS.captures(text) {
        request.declared_emissions = caps[1].parse::<f64>().ok();
    }

    if let Some(caps) = ORIGIN_PRICE.captures(text) {
        if let Ok(price) = caps[1].parse::<f64>() {
            request.origin_price = price;
        }
    }

    tracing::debug!(
        product = request.product.as_deref(),
        quantity = request.quantity,
        emissions = request.declared_emissions,
        origin = request.origin_price,
        "classified request"
    );

    request
}
