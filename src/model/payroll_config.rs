use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Singleton payroll configuration, versioned by `updated_at`/`updated_by`.
///
/// Rates are fractions, not percentages: a `social_insurance_rate` of `0.08`
/// means 8% of gross.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "ot_multiplier": 1.5,
        "social_insurance_rate": 0.08,
        "health_insurance_rate": 0.015,
        "unemployment_insurance_rate": 0.01,
        "personal_deduction": 11000000.0,
        "dependent_deduction": 4400000.0,
        "updated_at": "2026-01-01T00:00:00Z",
        "updated_by": "system"
    })
)]
pub struct PayrollConfig {
    #[schema(example = 1.5)]
    pub ot_multiplier: f64,

    #[schema(example = 0.08)]
    pub social_insurance_rate: f64,

    #[schema(example = 0.015)]
    pub health_insurance_rate: f64,

    /// Configured for completeness but not part of the net-salary formula;
    /// see `payroll::payslip`.
    #[schema(example = 0.01)]
    pub unemployment_insurance_rate: f64,

    #[schema(example = 11000000.0)]
    pub personal_deduction: f64,

    #[schema(example = 4400000.0)]
    pub dependent_deduction: f64,

    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: Option<DateTime<Utc>>,

    #[schema(example = "system")]
    pub updated_by: Option<String>,
}

impl PayrollConfig {
    /// Defaults per current Vietnamese statutory rates, used when no config
    /// row has been saved yet.
    pub fn statutory_defaults() -> Self {
        Self {
            ot_multiplier: 1.5,
            social_insurance_rate: 0.08,
            health_insurance_rate: 0.015,
            unemployment_insurance_rate: 0.01,
            personal_deduction: 11_000_000.0,
            dependent_deduction: 4_400_000.0,
            updated_at: None,
            updated_by: None,
        }
    }
}
