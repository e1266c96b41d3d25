use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::model::Payslip;
use crate::payroll::store::PayrollStore;
use crate::store::mysql::MySqlStore;

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct PayslipFilter {
    /// Filter by employee ID
    #[schema(example = 1001)]
    pub employee_id: Option<u64>,
    /// Filter by period, YYYY-MM
    #[schema(example = "2026-01")]
    pub period: Option<String>,
    /// Filter by payslip status
    #[schema(example = "pending")]
    pub status: Option<String>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

#[derive(Serialize, ToSchema)]
pub struct PayslipListResponse {
    pub data: Vec<Payslip>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

/// for getting one payslip by employee and period
#[utoipa::path(
    get,
    path = "/api/v1/payslips/{employee_id}/{period}",
    params(
        ("employee_id" = u64, Path, description = "Employee ID"),
        ("period" = String, Path, description = "Payroll period, YYYY-MM")
    ),
    responses(
        (status = 200, description = "Payslip found", body = Payslip),
        (status = 404, description = "No payslip for this employee and period")
    ),
    tag = "Payslip"
)]
pub async fn get_payslip(
    store: web::Data<MySqlStore>,
    path: web::Path<(u64, String)>,
) -> actix_web::Result<impl Responder> {
    let (employee_id, period) = path.into_inner();

    let payslip = store.payslip(employee_id, &period).await.map_err(|e| {
        tracing::error!(error = %e, employee_id, %period, "Failed to fetch payslip");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match payslip {
        Some(payslip) => Ok(HttpResponse::Ok().json(payslip)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Payslip not found"
        }))),
    }
}

/// for listing payslips with filters
#[utoipa::path(
    get,
    path = "/api/v1/payslips",
    params(PayslipFilter),
    responses(
        (status = 200, description = "Paginated payslip list", body = PayslipListResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payslip"
)]
pub async fn list_payslips(
    pool: web::Data<MySqlPool>,
    query: web::Query<PayslipFilter>,
) -> actix_web::Result<impl Responder> {
    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(employee_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(employee_id));
    }

    if let Some(period) = query.period.as_deref() {
        where_sql.push_str(" AND period = ?");
        args.push(FilterValue::Str(period));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM payslips{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count payslips");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, employee_id, period, base_salary, overtime, bonus, allowances,
               social_insurance, health_insurance, tax, deductions, net_salary,
               status, paid_date, created_at
        FROM payslips
        {}
        ORDER BY period DESC, employee_id
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, Payslip>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let payslips = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch payslip list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(PayslipListResponse {
        data: payslips,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}
