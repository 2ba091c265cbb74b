//! The CBAM cost formula.

/// Compute the CBAM liability in euros:
///
/// `cost = max(0, total_emissions × (eu_price − origin_price))`
///
/// A negative price differential clamps to zero — no rebate is modeled when
/// the origin market price exceeds the EU ETS price.
pub fn compute_cost(total_emissions: f64, origin_price: f64, eu_price: f64) -> f64 {
    (total_emissions * (eu_price - origin_price)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_cost() {
        // 100 t of steel at the 2.3 default factor → 230 tCO₂e
        assert_eq!(compute_cost(230.0, 0.0, 80.0), 18_400.0);
    }

    #[test]
    fn origin_price_reduces_cost() {
        // 50 t of aluminum at 8.6 → 430 tCO₂e, €20 paid at origin
        assert_eq!(compute_cost(430.0, 20.0, 80.0), 25_800.0);
    }

    #[test]
    fn negative_differential_clamps_to_zero() {
        assert_eq!(compute_cost(100.0, 90.0, 80.0), 0.0);
        assert_eq!(compute_cost(100.0, 80.0, 80.0), 0.0);
    }

    #[test]
    fn zero_emissions_costs_nothing() {
        assert_eq!(compute_cost(0.0, 0.0, 80.0), 0.0);
    }

    #[test]
    fn never_negative_across_grid() {
        for &em in &[0.0, 1.0, 230.0, 1e6] {
            for &origin in &[0.0, 10.0, 80.0, 200.0] {
                for &eu in &[0.0, 10.0, 78.54, 500.0] {
                    let cost = compute_cost(em, origin, eu);
                    assert!(cost >= 0.0);
                    if eu <= origin {
                        assert_eq!(cost, 0.0);
                    }
                }
            }
        }
    }
}
