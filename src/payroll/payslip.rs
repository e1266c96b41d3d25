//! Per-employee payslip computation.

use crate::model::PayrollConfig;
use crate::payroll::leave::compute_unpaid_deduction;
use crate::payroll::overtime::compute_overtime_pay;
use crate::payroll::tax::compute_tax;

/// The monetary fields of one computed payslip.
#[derive(Debug, Clone, PartialEq)]
pub struct PayslipAmounts {
    pub base_salary: f64,
    pub overtime: f64,
    pub bonus: f64,
    pub allowances: f64,
    pub gross_salary: f64,
    pub social_insurance: f64,
    pub health_insurance: f64,
    pub tax: f64,
    /// Unpaid-leave deduction, kept fractional.
    pub deductions: f64,
    pub net_salary: f64,
}

/// Computes a full payslip for one employee and period.
///
/// Gross is base plus overtime pay; social and health insurance are taken on
/// gross; taxable income subtracts both insurances and the personal
/// deduction before the progressive tax applies. Bonus and allowances are
/// carried as zero here, they come from outside the payroll run.
///
/// `config.unemployment_insurance_rate` is intentionally absent from the net
/// formula: no payslip on record ever withheld it, so applying it now would
/// silently change salaries. Revisit together with finance before wiring it
/// in.
pub fn compute_payslip(
    base_salary: f64,
    approved_ot_hours: f64,
    unpaid_days: f64,
    config: &PayrollConfig,
) -> PayslipAmounts {
    let overtime = compute_overtime_pay(base_salary, approved_ot_hours, config.ot_multiplier);
    let gross_salary = base_salary + overtime;

    let social_insurance = (gross_salary * config.social_insurance_rate).round();
    let health_insurance = (gross_salary * config.health_insurance_rate).round();

    let taxable_income =
        gross_salary - social_insurance - health_insurance - config.personal_deduction;
    let tax = if taxable_income > 0.0 {
        compute_tax(taxable_income).round()
    } else {
        0.0
    };

    let deductions = compute_unpaid_deduction(base_salary, unpaid_days);
    let net_salary = gross_salary - social_insurance - health_insurance - tax - deductions;

    PayslipAmounts {
        base_salary,
        overtime,
        bonus: 0.0,
        allowances: 0.0,
        gross_salary,
        social_insurance,
        health_insurance,
        tax,
        deductions,
        net_salary,
    }
}

#[cfg(test)]
mod tests {
    use super::compute_payslip;
    use crate::model::PayrollConfig;

    #[test]
    fn plain_salary_with_default_config() {
        let config = PayrollConfig::statutory_defaults();
        let slip = compute_payslip(25_000_000.0, 0.0, 0.0, &config);

        assert_eq!(slip.gross_salary, 25_000_000.0);
        assert_eq!(slip.social_insurance, 2_000_000.0);
        assert_eq!(slip.health_insurance, 375_000.0);
        // taxable = 25M - 2M - 375k - 11M = 11,625,000
        // tax = 250k + 500k + 15% of 1,625,000 = 993,750
        assert_eq!(slip.tax, 993_750.0);
        assert_eq!(slip.deductions, 0.0);
        assert_eq!(slip.net_salary, 25_000_000.0 - 2_000_000.0 - 375_000.0 - 993_750.0);
    }

    #[test]
    fn overtime_raises_gross_and_insurances() {
        let config = PayrollConfig::statutory_defaults();
        let slip = compute_payslip(22_000_000.0, 10.0, 0.0, &config);

        assert_eq!(slip.overtime, 1_875_000.0);
        assert_eq!(slip.gross_salary, 23_875_000.0);
        assert_eq!(slip.social_insurance, 1_910_000.0);
        assert_eq!(slip.health_insurance, 358_125.0);
    }

    #[test]
    fn below_personal_deduction_owes_no_tax() {
        let config = PayrollConfig::statutory_defaults();
        let slip = compute_payslip(10_000_000.0, 0.0, 0.0, &config);

        assert_eq!(slip.tax, 0.0);
        assert_eq!(slip.net_salary, 10_000_000.0 - 800_000.0 - 150_000.0);
    }

    #[test]
    fn unpaid_leave_reduces_net_but_not_taxable_income() {
        let config = PayrollConfig::statutory_defaults();
        let with_leave = compute_payslip(22_000_000.0, 0.0, 2.0, &config);
        let without = compute_payslip(22_000_000.0, 0.0, 0.0, &config);

        assert_eq!(with_leave.tax, without.tax);
        assert_eq!(with_leave.deductions, 2_000_000.0);
        assert_eq!(with_leave.net_salary, without.net_salary - 2_000_000.0);
    }

    #[test]
    fn unemployment_rate_does_not_touch_net() {
        let mut config = PayrollConfig::statutory_defaults();
        let baseline = compute_payslip(25_000_000.0, 0.0, 0.0, &config);
        config.unemployment_insurance_rate = 0.5;
        let adjusted = compute_payslip(25_000_000.0, 0.0, 0.0, &config);

        assert_eq!(baseline, adjusted);
    }

    #[test]
    fn missing_base_salary_yields_zero_figures() {
        let config = PayrollConfig::statutory_defaults();
        let slip = compute_payslip(0.0, 0.0, 0.0, &config);

        assert_eq!(slip.gross_salary, 0.0);
        assert_eq!(slip.tax, 0.0);
        assert_eq!(slip.net_salary, 0.0);
    }
}
