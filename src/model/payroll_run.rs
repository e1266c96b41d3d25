use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One payroll batch execution per period; natural key = period.
/// Re-running a period updates this row, it never creates a second one.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct PayrollRun {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "2026-01")]
    pub period: String,

    #[schema(example = "completed")]
    pub status: String,

    #[schema(example = 42)]
    pub total_employees: u32,

    #[schema(example = 1050000000.0)]
    pub total_gross_salary: f64,

    #[schema(example = 880000000.0)]
    pub total_net_salary: f64,

    #[schema(example = "2026-01-31T09:00:00Z", format = "date-time", value_type = String)]
    pub run_at: Option<DateTime<Utc>>,

    #[schema(example = "admin")]
    pub run_by: Option<String>,

    #[schema(example = "2026-01-31T09:00:05Z", format = "date-time", value_type = String)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Status is monotonic within one invocation: processing before completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[derive(strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    NotRun,
    Processing,
    Completed,
}
