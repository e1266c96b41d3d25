//! Salary deduction for approved unpaid leave.

/// Standard working days per month; pairs with
/// [`super::overtime::MONTHLY_WORK_HOURS`].
pub const MONTHLY_WORK_DAYS: f64 = 22.0;

/// Deduction for `unpaid_days` of unpaid leave. Kept fractional; rounding
/// happens only on figures that are reported standalone, the deduction flows
/// into net salary as-is.
pub fn compute_unpaid_deduction(base_salary: f64, unpaid_days: f64) -> f64 {
    unpaid_days * (base_salary / MONTHLY_WORK_DAYS)
}

#[cfg(test)]
mod tests {
    use super::compute_unpaid_deduction;

    #[test]
    fn two_days_on_a_round_salary() {
        assert_eq!(compute_unpaid_deduction(22_000_000.0, 2.0), 2_000_000.0);
    }

    #[test]
    fn no_unpaid_leave_deducts_nothing() {
        assert_eq!(compute_unpaid_deduction(22_000_000.0, 0.0), 0.0);
    }

    #[test]
    fn fraction_is_preserved() {
        let deduction = compute_unpaid_deduction(25_000_000.0, 2.0);
        assert!((deduction - 2_272_727.2727).abs() < 0.001);
    }
}
