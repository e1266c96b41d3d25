//! MySQL-backed `PayrollStore`.

use anyhow::Result;
use chrono::Utc;
use sqlx::MySqlPool;

use crate::model::{Employee, PayrollConfig, PayrollRun, Payslip, RunStatus};
use crate::payroll::store::{NewPayslip, PayrollStore};

const PAYSLIP_COLUMNS: &str = "id, employee_id, period, base_salary, overtime, bonus, allowances, \
     social_insurance, health_insurance, tax, deductions, net_salary, status, paid_date, created_at";

const RUN_COLUMNS: &str = "id, period, status, total_employees, total_gross_salary, \
     total_net_salary, run_at, run_by, completed_at";

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct EmployeeRow {
    id: u64,
    employee_code: String,
    full_name: String,
    bank_account_no: String,
    base_salary: Option<f64>,
    status: String,
}

impl From<EmployeeRow> for Employee {
    fn from(row: EmployeeRow) -> Self {
        let base_salary = match row.base_salary {
            Some(salary) => salary,
            None => {
                // Incomplete record: pay 0 so the figure shows up for review
                // instead of the employee silently vanishing from the run.
                tracing::warn!(
                    employee_id = row.id,
                    employee_code = %row.employee_code,
                    "Employee has no base salary, treating as 0"
                );
                0.0
            }
        };
        Employee {
            id: row.id,
            employee_code: row.employee_code,
            full_name: row.full_name,
            bank_account_no: row.bank_account_no,
            base_salary,
            status: row.status,
        }
    }
}

impl PayrollStore for MySqlStore {
    async fn active_employees(&self) -> Result<Vec<Employee>> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT id, employee_code, full_name, bank_account_no, base_salary, status
            FROM employees
            WHERE status <> 'inactive'
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Employee::from).collect())
    }

    async fn approved_overtime_hours(&self, employee_id: u64, period: &str) -> Result<f64> {
        let hours = sqlx::query_scalar::<_, f64>(
            r#"
            SELECT COALESCE(SUM(hours_count), 0)
            FROM overtime_requests
            WHERE employee_id = ?
            AND status = 'approved'
            AND DATE_FORMAT(date, '%Y-%m') = ?
            "#,
        )
        .bind(employee_id)
        .bind(period)
        .fetch_one(&self.pool)
        .await?;

        Ok(hours)
    }

    async fn approved_unpaid_leave_days(&self, employee_id: u64) -> Result<f64> {
        // No period filter, by design of the data this payroll history was
        // settled on; see PayrollStore::approved_unpaid_leave_days.
        let days = sqlx::query_scalar::<_, f64>(
            r#"
            SELECT COALESCE(SUM(days_count), 0)
            FROM leave_requests
            WHERE employee_id = ?
            AND status = 'approved'
            AND leave_type = 'unpaid'
            "#,
        )
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(days)
    }

    async fn payroll_config(&self) -> Result<PayrollConfig> {
        let config = sqlx::query_as::<_, PayrollConfig>(
            r#"
            SELECT ot_multiplier, social_insurance_rate, health_insurance_rate,
                   unemployment_insurance_rate, personal_deduction, dependent_deduction,
                   updated_at, updated_by
            FROM payroll_config
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(config.unwrap_or_else(|| {
            tracing::warn!("No payroll config saved, using statutory defaults");
            PayrollConfig::statutory_defaults()
        }))
    }

    async fn payslip(&self, employee_id: u64, period: &str) -> Result<Option<Payslip>> {
        let payslip = sqlx::query_as::<_, Payslip>(&format!(
            "SELECT {PAYSLIP_COLUMNS} FROM payslips WHERE employee_id = ? AND period = ?"
        ))
        .bind(employee_id)
        .bind(period)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payslip)
    }

    async fn upsert_payslip(&self, payslip: &NewPayslip) -> Result<()> {
        // The unique key on (employee_id, period) makes a re-run overwrite
        // the existing row. That also forces status back to 'pending', even
        // over a payslip already marked 'paid'; settlement tooling has to
        // cope with a re-opened payslip.
        sqlx::query(
            r#"
            INSERT INTO payslips
                (employee_id, period, base_salary, overtime, bonus, allowances,
                 social_insurance, health_insurance, tax, deductions, net_salary, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                base_salary = VALUES(base_salary),
                overtime = VALUES(overtime),
                bonus = VALUES(bonus),
                allowances = VALUES(allowances),
                social_insurance = VALUES(social_insurance),
                health_insurance = VALUES(health_insurance),
                tax = VALUES(tax),
                deductions = VALUES(deductions),
                net_salary = VALUES(net_salary),
                status = VALUES(status)
            "#,
        )
        .bind(payslip.employee_id)
        .bind(&payslip.period)
        .bind(payslip.base_salary)
        .bind(payslip.overtime)
        .bind(payslip.bonus)
        .bind(payslip.allowances)
        .bind(payslip.social_insurance)
        .bind(payslip.health_insurance)
        .bind(payslip.tax)
        .bind(payslip.deductions)
        .bind(payslip.net_salary)
        .bind(&payslip.status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_or_create_run(&self, period: &str, run_by: &str) -> Result<PayrollRun> {
        let existing = sqlx::query_as::<_, PayrollRun>(&format!(
            "SELECT {RUN_COLUMNS} FROM payroll_runs WHERE period = ?"
        ))
        .bind(period)
        .fetch_optional(&self.pool)
        .await?;

        let now = Utc::now();
        match existing {
            Some(mut run) => {
                sqlx::query(
                    "UPDATE payroll_runs SET status = ?, run_at = ?, run_by = ? WHERE id = ?",
                )
                .bind(RunStatus::Processing.to_string())
                .bind(now)
                .bind(run_by)
                .bind(run.id)
                .execute(&self.pool)
                .await?;

                run.status = RunStatus::Processing.to_string();
                run.run_at = Some(now);
                run.run_by = Some(run_by.to_string());
                Ok(run)
            }
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO payroll_runs
                        (period, status, total_employees, total_gross_salary,
                         total_net_salary, run_at, run_by)
                    VALUES (?, ?, 0, 0, 0, ?, ?)
                    "#,
                )
                .bind(period)
                .bind(RunStatus::Processing.to_string())
                .bind(now)
                .bind(run_by)
                .execute(&self.pool)
                .await?;

                Ok(PayrollRun {
                    id: result.last_insert_id(),
                    period: period.to_string(),
                    status: RunStatus::Processing.to_string(),
                    total_employees: 0,
                    total_gross_salary: 0.0,
                    total_net_salary: 0.0,
                    run_at: Some(now),
                    run_by: Some(run_by.to_string()),
                    completed_at: None,
                })
            }
        }
    }

    async fn update_run(&self, run: &PayrollRun) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE payroll_runs
            SET status = ?, total_employees = ?, total_gross_salary = ?,
                total_net_salary = ?, completed_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&run.status)
        .bind(run.total_employees)
        .bind(run.total_gross_salary)
        .bind(run.total_net_salary)
        .bind(run.completed_at)
        .bind(run.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
