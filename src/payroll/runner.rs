//! The payroll batch: one run per period over all active employees.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use derive_more::Display;
use futures::stream::{self, StreamExt};
use once_cell::sync::Lazy;
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::{Employee, PayrollConfig, PayslipStatus, RunStatus};
use crate::payroll::is_valid_period;
use crate::payroll::payslip::compute_payslip;
use crate::payroll::store::{NewPayslip, PayrollStore};

/// Upper bound on one employee's fetch + compute + write.
const EMPLOYEE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Display)]
pub enum PayrollError {
    #[display(fmt = "invalid period {:?}, expected YYYY-MM", _0)]
    InvalidPeriod(String),
    #[display(fmt = "a payroll run for {} is already in progress", _0)]
    RunInProgress(String),
    #[display(fmt = "payroll storage failed: {}", _0)]
    Store(anyhow::Error),
}

impl std::error::Error for PayrollError {}

/// One employee the run could not pay, with the reason for the admin.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeFailure {
    #[schema(example = 1001)]
    pub employee_id: u64,
    #[schema(example = "EMP-2024-101")]
    pub employee_code: String,
    #[schema(example = "payslip write failed")]
    pub reason: String,
}

/// What the admin gets back from a run.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PayrollRunSummary {
    #[schema(example = "2026-01")]
    pub period: String,
    #[schema(example = "completed")]
    pub status: String,
    /// Employees successfully paid; failed ones are listed separately.
    #[schema(example = 42)]
    pub total_employees: u32,
    #[schema(example = 1050000000.0)]
    pub total_gross_salary: f64,
    #[schema(example = 880000000.0)]
    pub total_net_salary: f64,
    pub failures: Vec<EmployeeFailure>,
}

// Periods with a run currently executing in this process. The run row alone
// cannot serialize concurrent invocations, two writers would interleave
// upserts and double-count totals.
static RUNS_IN_FLIGHT: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));

struct RunGuard(String);

impl RunGuard {
    fn acquire(period: &str) -> Option<Self> {
        let mut live = RUNS_IN_FLIGHT.lock().unwrap();
        if live.insert(period.to_string()) {
            Some(RunGuard(period.to_string()))
        } else {
            None
        }
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        RUNS_IN_FLIGHT.lock().unwrap().remove(&self.0);
    }
}

/// Runs payroll for `period`.
///
/// The run row moves `processing` then `completed` within this invocation;
/// re-running a completed period goes through the same states again and
/// overwrites the same payslips rather than adding rows. Per-employee
/// failures land in the summary's `failures` list, the rest of the run
/// continues. `concurrency` bounds how many employees are in flight at once;
/// totals are reduced from the collected results afterwards.
pub async fn run_payroll<S: PayrollStore>(
    store: &S,
    period: &str,
    run_by: &str,
    concurrency: usize,
) -> Result<PayrollRunSummary, PayrollError> {
    if !is_valid_period(period) {
        return Err(PayrollError::InvalidPeriod(period.to_string()));
    }
    let _guard = RunGuard::acquire(period)
        .ok_or_else(|| PayrollError::RunInProgress(period.to_string()))?;

    let mut run = store
        .get_or_create_run(period, run_by)
        .await
        .map_err(PayrollError::Store)?;
    tracing::info!(period, run_by, "Payroll run started");

    let config = store.payroll_config().await.map_err(PayrollError::Store)?;
    let employees = store
        .active_employees()
        .await
        .map_err(PayrollError::Store)?;

    let outcomes: Vec<Result<(f64, f64), EmployeeFailure>> = stream::iter(employees)
        .map(|employee| {
            let config = &config;
            async move {
                let fut = process_employee(store, &employee, period, config);
                match actix_web::rt::time::timeout(EMPLOYEE_TIMEOUT, fut).await {
                    Ok(Ok(totals)) => Ok(totals),
                    Ok(Err(e)) => {
                        tracing::error!(error = %e, employee_id = employee.id, period, "Payslip computation failed");
                        Err(EmployeeFailure {
                            employee_id: employee.id,
                            employee_code: employee.employee_code.clone(),
                            reason: e.to_string(),
                        })
                    }
                    Err(_) => {
                        tracing::error!(employee_id = employee.id, period, "Payslip computation timed out");
                        Err(EmployeeFailure {
                            employee_id: employee.id,
                            employee_code: employee.employee_code.clone(),
                            reason: "timed out".to_string(),
                        })
                    }
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut total_gross = 0.0;
    let mut total_net = 0.0;
    let mut processed: u32 = 0;
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok((gross, net)) => {
                total_gross += gross;
                total_net += net;
                processed += 1;
            }
            Err(failure) => failures.push(failure),
        }
    }

    run.status = RunStatus::Completed.to_string();
    run.total_employees = processed;
    run.total_gross_salary = total_gross;
    run.total_net_salary = total_net;
    run.completed_at = Some(Utc::now());
    store.update_run(&run).await.map_err(PayrollError::Store)?;

    tracing::info!(
        period,
        processed,
        failed = failures.len(),
        total_gross,
        total_net,
        "Payroll run completed"
    );

    Ok(PayrollRunSummary {
        period: period.to_string(),
        status: run.status,
        total_employees: processed,
        total_gross_salary: total_gross,
        total_net_salary: total_net,
        failures,
    })
}

/// One employee's unit of work: gather inputs, compute, upsert the payslip.
/// Returns (gross, net) for the run totals.
async fn process_employee<S: PayrollStore>(
    store: &S,
    employee: &Employee,
    period: &str,
    config: &PayrollConfig,
) -> anyhow::Result<(f64, f64)> {
    let ot_hours = store.approved_overtime_hours(employee.id, period).await?;
    // All-time, not per-period; see PayrollStore::approved_unpaid_leave_days.
    let unpaid_days = store.approved_unpaid_leave_days(employee.id).await?;

    let amounts = compute_payslip(employee.base_salary, ot_hours, unpaid_days, config);

    store
        .upsert_payslip(&NewPayslip {
            employee_id: employee.id,
            period: period.to_string(),
            base_salary: amounts.base_salary,
            overtime: amounts.overtime,
            bonus: amounts.bonus,
            allowances: amounts.allowances,
            social_insurance: amounts.social_insurance,
            health_insurance: amounts.health_insurance,
            tax: amounts.tax,
            deductions: amounts.deductions,
            net_salary: amounts.net_salary,
            status: PayslipStatus::Pending.to_string(),
        })
        .await?;

    Ok((amounts.gross_salary, amounts.net_salary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PayrollConfig;
    use crate::payroll::testing::{employee, MemoryStore};

    fn seeded_store() -> MemoryStore {
        let mut store = MemoryStore::default();
        store.config = Some(PayrollConfig::statutory_defaults());
        store.employees.push(employee(1, "EMP-001", 25_000_000.0));
        store.employees.push(employee(2, "EMP-002", 10_000_000.0));
        store.ot_hours.insert((2, "2026-01".to_string()), 10.0);
        store
    }

    #[actix_web::test]
    async fn run_writes_payslips_and_totals() {
        let store = seeded_store();

        let summary = run_payroll(&store, "2026-01", "admin", 4).await.unwrap();

        assert_eq!(summary.status, "completed");
        assert_eq!(summary.total_employees, 2);
        assert!(summary.failures.is_empty());

        let state = store.state.lock().unwrap();
        let slip = state.payslips.get(&(1, "2026-01".to_string())).unwrap();
        assert_eq!(slip.social_insurance, 2_000_000.0);
        assert_eq!(slip.health_insurance, 375_000.0);
        assert_eq!(slip.tax, 993_750.0);
        assert_eq!(slip.net_salary, 21_631_250.0);
        assert_eq!(slip.status, "pending");

        // 10M base + 10h OT: pay 852,273, gross 10,852,273, below the
        // personal deduction so no tax
        let slip = state.payslips.get(&(2, "2026-01".to_string())).unwrap();
        assert_eq!(slip.overtime, 852_273.0);
        assert_eq!(slip.tax, 0.0);
        assert_eq!(slip.net_salary, 10_852_273.0 - 868_182.0 - 162_784.0);

        assert_eq!(summary.total_gross_salary, 25_000_000.0 + 10_852_273.0);
        assert_eq!(
            summary.total_net_salary,
            21_631_250.0 + (10_852_273.0 - 868_182.0 - 162_784.0)
        );

        let run = &state.runs[0];
        assert_eq!(run.status, "completed");
        assert_eq!(run.total_employees, 2);
        assert!(run.run_at.is_some());
        assert!(run.completed_at.is_some());
    }

    #[actix_web::test]
    async fn rerun_overwrites_instead_of_duplicating() {
        let store = seeded_store();

        let first = run_payroll(&store, "2026-02", "admin", 4).await.unwrap();
        {
            // settle one payslip so the re-run's reset is observable
            let mut state = store.state.lock().unwrap();
            state
                .payslips
                .get_mut(&(1, "2026-02".to_string()))
                .unwrap()
                .status = "paid".to_string();
        }
        let second = run_payroll(&store, "2026-02", "admin", 4).await.unwrap();

        assert_eq!(first.total_net_salary, second.total_net_salary);

        let state = store.state.lock().unwrap();
        assert_eq!(state.payslips.len(), 2);
        assert_eq!(state.runs.len(), 1);
        // re-running resets a settled payslip back to pending
        let slip = state.payslips.get(&(1, "2026-02".to_string())).unwrap();
        assert_eq!(slip.status, "pending");
    }

    #[actix_web::test]
    async fn employee_failure_is_collected_not_fatal() {
        let mut store = seeded_store();
        store.failing_upserts.push(2);

        let summary = run_payroll(&store, "2026-03", "admin", 4).await.unwrap();

        assert_eq!(summary.status, "completed");
        assert_eq!(summary.total_employees, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].employee_id, 2);
        assert_eq!(summary.total_gross_salary, 25_000_000.0);
    }

    #[actix_web::test]
    async fn concurrent_run_for_same_period_is_rejected() {
        let store = seeded_store();
        let _held = RunGuard::acquire("2026-04").unwrap();

        let err = run_payroll(&store, "2026-04", "admin", 4).await.unwrap_err();
        assert!(matches!(err, PayrollError::RunInProgress(_)));
    }

    #[actix_web::test]
    async fn invalid_period_is_rejected() {
        let store = seeded_store();

        let err = run_payroll(&store, "2026-13", "admin", 4).await.unwrap_err();
        assert!(matches!(err, PayrollError::InvalidPeriod(_)));
    }

    #[actix_web::test]
    async fn config_defaults_apply_when_unset() {
        let mut store = seeded_store();
        store.config = None;

        let summary = run_payroll(&store, "2026-05", "admin", 4).await.unwrap();

        // statutory defaults produce the same figures as the seeded config
        let state = store.state.lock().unwrap();
        let slip = state.payslips.get(&(1, "2026-05".to_string())).unwrap();
        assert_eq!(slip.social_insurance, 2_000_000.0);
        assert_eq!(summary.total_employees, 2);
    }
}
