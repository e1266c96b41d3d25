use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

use crate::config::Config;
use crate::model::{PayrollConfig, PayrollRun};
use crate::payroll::bank::{self, BankFormat};
use crate::payroll::runner::{self, PayrollError, PayrollRunSummary};
use crate::payroll::{is_valid_period, tax};
use crate::store::mysql::MySqlStore;
use crate::payroll::store::PayrollStore;

#[derive(Deserialize, ToSchema)]
pub struct RunPayrollRequest {
    /// Target month, "YYYY-MM".
    #[schema(example = "2026-01")]
    pub period: String,

    /// Who triggered the run, recorded on the run row.
    #[schema(example = "admin")]
    pub run_by: String,
}

/* =========================
Run payroll (Admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/payroll/run",
    request_body = RunPayrollRequest,
    responses(
        (status = 200, description = "Payroll run completed", body = PayrollRunSummary),
        (status = 400, description = "Invalid period"),
        (status = 409, description = "Run already in progress for this period"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn run_payroll(
    store: web::Data<MySqlStore>,
    config: web::Data<Config>,
    payload: web::Json<RunPayrollRequest>,
) -> actix_web::Result<impl Responder> {
    let result = runner::run_payroll(
        store.get_ref(),
        &payload.period,
        &payload.run_by,
        config.payroll_concurrency,
    )
    .await;

    match result {
        Ok(summary) => Ok(HttpResponse::Ok().json(summary)),
        Err(PayrollError::InvalidPeriod(period)) => {
            Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": format!("Invalid period {:?}, expected YYYY-MM", period)
            })))
        }
        Err(PayrollError::RunInProgress(_)) => Ok(HttpResponse::Conflict().json(
            serde_json::json!({
                "message": "A payroll run for this period is already in progress"
            }),
        )),
        Err(PayrollError::Store(e)) => {
            tracing::error!(error = %e, period = %payload.period, "Payroll run failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/* =========================
Run history
========================= */
#[utoipa::path(
    get,
    path = "/api/v1/payroll/runs",
    responses(
        (status = 200, description = "Payroll runs, most recent period first", body = [PayrollRun]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn list_runs(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let runs = sqlx::query_as::<_, PayrollRun>(
        r#"
        SELECT id, period, status, total_employees, total_gross_salary,
               total_net_salary, run_at, run_by, completed_at
        FROM payroll_runs
        ORDER BY period DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch payroll runs");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(runs))
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll/runs/{period}",
    params(
        ("period" = String, Path, description = "Payroll period, YYYY-MM")
    ),
    responses(
        (status = 200, description = "Payroll run found", body = PayrollRun),
        (status = 404, description = "No run for this period")
    ),
    tag = "Payroll"
)]
pub async fn get_run(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let period = path.into_inner();

    let run = sqlx::query_as::<_, PayrollRun>(
        r#"
        SELECT id, period, status, total_employees, total_gross_salary,
               total_net_salary, run_at, run_by, completed_at
        FROM payroll_runs
        WHERE period = ?
        "#,
    )
    .bind(&period)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, %period, "Failed to fetch payroll run");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match run {
        Some(run) => Ok(HttpResponse::Ok().json(run)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Payroll run not found"
        }))),
    }
}

/* =========================
Tax preview (what-if)
========================= */
#[derive(Deserialize, IntoParams, ToSchema)]
pub struct TaxPreviewQuery {
    /// Monthly taxable income after insurances and the personal deduction.
    #[schema(example = 11625000.0)]
    pub taxable_income: f64,
}

#[derive(Serialize, ToSchema)]
pub struct TaxPreviewResponse {
    #[schema(example = 11625000.0)]
    pub taxable_income: f64,

    #[schema(example = 993750.0)]
    pub tax: f64,
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll/tax",
    params(TaxPreviewQuery),
    responses(
        (status = 200, description = "Progressive tax on the given income", body = TaxPreviewResponse)
    ),
    tag = "Payroll"
)]
pub async fn tax_preview(query: web::Query<TaxPreviewQuery>) -> actix_web::Result<impl Responder> {
    Ok(HttpResponse::Ok().json(TaxPreviewResponse {
        taxable_income: query.taxable_income,
        tax: tax::compute_tax(query.taxable_income).round(),
    }))
}

/* =========================
Bank export
========================= */
#[derive(Deserialize, IntoParams, ToSchema)]
pub struct BankExportQuery {
    #[schema(example = "2026-01")]
    pub period: String,

    /// Bank file layout: "vcb" or "acb".
    #[schema(example = "vcb")]
    pub format: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll/export",
    params(BankExportQuery),
    responses(
        (status = 200, description = "Bank transfer file", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid period or bank format"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn export_bank(
    store: web::Data<MySqlStore>,
    query: web::Query<BankExportQuery>,
) -> actix_web::Result<impl Responder> {
    if !is_valid_period(&query.period) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Invalid period, expected YYYY-MM"
        })));
    }

    let format = match BankFormat::from_str(&query.format) {
        Ok(format) => format,
        Err(_) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Unknown bank format. Allowed: vcb, acb"
            })));
        }
    };

    let file = bank::export_bank_file(store.get_ref(), &query.period, format)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, period = %query.period, "Bank export failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(file))
}

/* =========================
Payroll configuration (Admin)
========================= */
#[derive(Deserialize, ToSchema)]
pub struct UpdatePayrollConfig {
    #[schema(example = 1.5)]
    pub ot_multiplier: Option<f64>,

    #[schema(example = 0.08)]
    pub social_insurance_rate: Option<f64>,

    #[schema(example = 0.015)]
    pub health_insurance_rate: Option<f64>,

    #[schema(example = 0.01)]
    pub unemployment_insurance_rate: Option<f64>,

    #[schema(example = 11000000.0)]
    pub personal_deduction: Option<f64>,

    #[schema(example = 4400000.0)]
    pub dependent_deduction: Option<f64>,

    #[schema(example = "admin")]
    pub updated_by: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/payroll/config",
    responses(
        (status = 200, description = "Current payroll configuration", body = PayrollConfig),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn get_config(store: web::Data<MySqlStore>) -> actix_web::Result<impl Responder> {
    let config = store.payroll_config().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch payroll config");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(config))
}

fn is_fraction(rate: f64) -> bool {
    (0.0..=1.0).contains(&rate)
}

#[utoipa::path(
    put,
    path = "/api/v1/payroll/config",
    request_body = UpdatePayrollConfig,
    responses(
        (status = 200, description = "Payroll configuration updated", body = PayrollConfig),
        (status = 400, description = "Rate outside [0,1] or negative amount"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payroll"
)]
pub async fn update_config(
    store: web::Data<MySqlStore>,
    pool: web::Data<MySqlPool>,
    body: web::Json<UpdatePayrollConfig>,
) -> actix_web::Result<impl Responder> {
    // Rates are stored as fractions; reject anything that looks like a
    // percentage so 8 cannot slip in where 0.08 is meant.
    for rate in [
        body.social_insurance_rate,
        body.health_insurance_rate,
        body.unemployment_insurance_rate,
    ]
    .into_iter()
    .flatten()
    {
        if !is_fraction(rate) {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Insurance rates must be fractions within [0, 1]"
            })));
        }
    }
    for amount in [
        body.ot_multiplier,
        body.personal_deduction,
        body.dependent_deduction,
    ]
    .into_iter()
    .flatten()
    {
        if amount < 0.0 {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "Multiplier and deductions must be non-negative"
            })));
        }
    }

    let current = store.payroll_config().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch payroll config");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let updated = PayrollConfig {
        ot_multiplier: body.ot_multiplier.unwrap_or(current.ot_multiplier),
        social_insurance_rate: body
            .social_insurance_rate
            .unwrap_or(current.social_insurance_rate),
        health_insurance_rate: body
            .health_insurance_rate
            .unwrap_or(current.health_insurance_rate),
        unemployment_insurance_rate: body
            .unemployment_insurance_rate
            .unwrap_or(current.unemployment_insurance_rate),
        personal_deduction: body.personal_deduction.unwrap_or(current.personal_deduction),
        dependent_deduction: body
            .dependent_deduction
            .unwrap_or(current.dependent_deduction),
        updated_at: Some(chrono::Utc::now()),
        updated_by: Some(body.updated_by.clone()),
    };

    sqlx::query(
        r#"
        INSERT INTO payroll_config
            (id, ot_multiplier, social_insurance_rate, health_insurance_rate,
             unemployment_insurance_rate, personal_deduction, dependent_deduction,
             updated_at, updated_by)
        VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            ot_multiplier = VALUES(ot_multiplier),
            social_insurance_rate = VALUES(social_insurance_rate),
            health_insurance_rate = VALUES(health_insurance_rate),
            unemployment_insurance_rate = VALUES(unemployment_insurance_rate),
            personal_deduction = VALUES(personal_deduction),
            dependent_deduction = VALUES(dependent_deduction),
            updated_at = VALUES(updated_at),
            updated_by = VALUES(updated_by)
        "#,
    )
    .bind(updated.ot_multiplier)
    .bind(updated.social_insurance_rate)
    .bind(updated.health_insurance_rate)
    .bind(updated.unemployment_insurance_rate)
    .bind(updated.personal_deduction)
    .bind(updated.dependent_deduction)
    .bind(updated.updated_at)
    .bind(&updated.updated_by)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to update payroll config");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(updated))
}
