use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One payslip per employee per period; natural key (employee_id, period).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Payslip {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1001)]
    pub employee_id: u64,

    /// Calendar month, "YYYY-MM".
    #[schema(example = "2026-01")]
    pub period: String,

    #[schema(example = 25000000.0)]
    pub base_salary: f64,

    /// Overtime pay for the period.
    #[schema(example = 0.0)]
    pub overtime: f64,

    #[schema(example = 0.0)]
    pub bonus: f64,

    #[schema(example = 0.0)]
    pub allowances: f64,

    #[schema(example = 2000000.0)]
    pub social_insurance: f64,

    #[schema(example = 375000.0)]
    pub health_insurance: f64,

    #[schema(example = 993750.0)]
    pub tax: f64,

    /// Unpaid-leave deduction.
    #[schema(example = 0.0)]
    pub deductions: f64,

    #[schema(example = 21631250.0)]
    pub net_salary: f64,

    #[schema(example = "pending")]
    pub status: String,

    #[schema(example = "2026-02-05", format = "date", value_type = String, nullable = true)]
    pub paid_date: Option<NaiveDate>,

    #[schema(example = "2026-01-31T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[derive(strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PayslipStatus {
    Pending,
    Paid,
}
