//! Overtime pay from approved overtime hours.

/// Standard paid hours per month: 22 working days of 8 hours. A policy
/// constant, not derived per employee.
pub const MONTHLY_WORK_HOURS: f64 = 176.0;

/// Overtime pay, rounded to whole currency units.
pub fn compute_overtime_pay(base_salary: f64, approved_ot_hours: f64, ot_multiplier: f64) -> f64 {
    let hourly_rate = base_salary / MONTHLY_WORK_HOURS;
    (hourly_rate * approved_ot_hours * ot_multiplier).round()
}

#[cfg(test)]
mod tests {
    use super::compute_overtime_pay;

    #[test]
    fn ten_hours_at_one_and_a_half() {
        assert_eq!(compute_overtime_pay(22_000_000.0, 10.0, 1.5), 1_875_000.0);
    }

    #[test]
    fn zero_hours_pay_nothing() {
        assert_eq!(compute_overtime_pay(22_000_000.0, 0.0, 1.5), 0.0);
    }

    #[test]
    fn fractional_result_is_rounded() {
        // 10M / 176 * 10 * 1.5 = 852_272.727...
        assert_eq!(compute_overtime_pay(10_000_000.0, 10.0, 1.5), 852_273.0);
    }
}
