//! Data-access surface the payroll engine runs against.

use anyhow::Result;

use crate::model::{Employee, PayrollConfig, PayrollRun, Payslip};

/// Collaborators the payroll run reads from and writes to.
///
/// The production implementation is [`crate::store::mysql::MySqlStore`];
/// tests use an in-memory store. Implementations must tolerate being called
/// concurrently for different employees of the same run.
#[allow(async_fn_in_trait)]
pub trait PayrollStore {
    /// Employees participating in a run: everyone whose status is not
    /// `inactive` (probation included).
    async fn active_employees(&self) -> Result<Vec<Employee>>;

    /// Sum of approved overtime hours with a date inside `period`.
    async fn approved_overtime_hours(&self, employee_id: u64, period: &str) -> Result<f64>;

    /// Sum of approved unpaid-leave days on record for the employee.
    ///
    /// Deliberately not filtered by period: every payroll run to date has
    /// deducted the employee's full unpaid-leave history and payslips were
    /// settled on those figures. A period filter changes historical net
    /// salaries, so it needs a data migration decision, not a code change.
    async fn approved_unpaid_leave_days(&self, employee_id: u64) -> Result<f64>;

    /// Current payroll configuration, falling back to
    /// [`PayrollConfig::statutory_defaults`] when none has been saved yet.
    async fn payroll_config(&self) -> Result<PayrollConfig>;

    async fn payslip(&self, employee_id: u64, period: &str) -> Result<Option<Payslip>>;

    /// Inserts or overwrites the payslip keyed by (employee_id, period).
    /// Always writes `status = pending`, including over a `paid` payslip.
    async fn upsert_payslip(&self, payslip: &NewPayslip) -> Result<()>;

    /// Fetches the run row for `period`, creating it when absent, and stamps
    /// it `processing` with fresh `run_at`/`run_by`.
    async fn get_or_create_run(&self, period: &str, run_by: &str) -> Result<PayrollRun>;

    async fn update_run(&self, run: &PayrollRun) -> Result<()>;
}

/// Computed payslip fields written by a run.
#[derive(Debug, Clone)]
pub struct NewPayslip {
    pub employee_id: u64,
    pub period: String,
    pub base_salary: f64,
    pub overtime: f64,
    pub bonus: f64,
    pub allowances: f64,
    pub social_insurance: f64,
    pub health_insurance: f64,
    pub tax: f64,
    pub deductions: f64,
    pub net_salary: f64,
    pub status: String,
}
