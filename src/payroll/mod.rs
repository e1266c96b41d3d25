pub mod bank;
pub mod leave;
pub mod overtime;
pub mod payslip;
pub mod runner;
pub mod store;
pub mod tax;

#[cfg(test)]
pub(crate) mod testing;

use chrono::NaiveDate;

/// Checks that a period string is a real calendar month in "YYYY-MM" form.
pub fn is_valid_period(period: &str) -> bool {
    period.len() == 7 && NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d").is_ok()
}
