//! Progressive personal income tax (Vietnamese PIT schedule).

/// Marginal brackets as (upper bound, rate); the last bracket is open-ended.
const BRACKETS: &[(f64, f64)] = &[
    (5_000_000.0, 0.05),
    (10_000_000.0, 0.10),
    (18_000_000.0, 0.15),
    (32_000_000.0, 0.20),
    (52_000_000.0, 0.25),
    (80_000_000.0, 0.30),
    (f64::INFINITY, 0.35),
];

/// Tax owed on `taxable_income`, each bracket taxing only the portion of
/// income that falls inside it. Zero or negative income owes nothing.
/// The result is unrounded; callers round to whole currency units.
pub fn compute_tax(taxable_income: f64) -> f64 {
    let mut tax = 0.0;
    let mut remaining = taxable_income;
    let mut previous_limit = 0.0;

    for &(limit, rate) in BRACKETS {
        let slice = remaining.min(limit - previous_limit);
        if slice <= 0.0 {
            break;
        }
        tax += slice * rate;
        remaining -= slice;
        previous_limit = limit;
    }

    tax
}
