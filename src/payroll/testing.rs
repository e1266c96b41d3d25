//! In-memory `PayrollStore` for engine tests.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use chrono::Utc;

use crate::model::{Employee, PayrollConfig, PayrollRun, Payslip, RunStatus};
use crate::payroll::store::{NewPayslip, PayrollStore};

#[derive(Default)]
pub struct MemoryStore {
    pub employees: Vec<Employee>,
    /// (employee_id, period) -> approved OT hours.
    pub ot_hours: HashMap<(u64, String), f64>,
    /// employee_id -> all-time approved unpaid-leave days.
    pub unpaid_days: HashMap<u64, f64>,
    /// None falls back to statutory defaults, like the production store.
    pub config: Option<PayrollConfig>,
    /// Employee ids whose payslip writes should fail.
    pub failing_upserts: Vec<u64>,
    pub state: Mutex<MemoryState>,
}

#[derive(Default)]
pub struct MemoryState {
    pub payslips: HashMap<(u64, String), Payslip>,
    pub runs: Vec<PayrollRun>,
    next_payslip_id: u64,
}

pub fn employee(id: u64, code: &str, base_salary: f64) -> Employee {
    Employee {
        id,
        employee_code: code.to_string(),
        full_name: format!("Employee {id}"),
        bank_account_no: format!("00000{id}"),
        base_salary,
        status: "active".to_string(),
    }
}

impl PayrollStore for MemoryStore {
    async fn active_employees(&self) -> Result<Vec<Employee>> {
        Ok(self
            .employees
            .iter()
            .filter(|e| e.status != "inactive")
            .cloned()
            .collect())
    }

    async fn approved_overtime_hours(&self, employee_id: u64, period: &str) -> Result<f64> {
        Ok(*self
            .ot_hours
            .get(&(employee_id, period.to_string()))
            .unwrap_or(&0.0))
    }

    async fn approved_unpaid_leave_days(&self, employee_id: u64) -> Result<f64> {
        Ok(*self.unpaid_days.get(&employee_id).unwrap_or(&0.0))
    }

    async fn payroll_config(&self) -> Result<PayrollConfig> {
        Ok(self
            .config
            .clone()
            .unwrap_or_else(PayrollConfig::statutory_defaults))
    }

    async fn payslip(&self, employee_id: u64, period: &str) -> Result<Option<Payslip>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .payslips
            .get(&(employee_id, period.to_string()))
            .cloned())
    }

    async fn upsert_payslip(&self, payslip: &NewPayslip) -> Result<()> {
        if self.failing_upserts.contains(&payslip.employee_id) {
            bail!("injected payslip write failure");
        }
        let mut state = self.state.lock().unwrap();
        let key = (payslip.employee_id, payslip.period.clone());
        if let Some(existing) = state.payslips.get_mut(&key) {
            existing.base_salary = payslip.base_salary;
            existing.overtime = payslip.overtime;
            existing.bonus = payslip.bonus;
            existing.allowances = payslip.allowances;
            existing.social_insurance = payslip.social_insurance;
            existing.health_insurance = payslip.health_insurance;
            existing.tax = payslip.tax;
            existing.deductions = payslip.deductions;
            existing.net_salary = payslip.net_salary;
            existing.status = payslip.status.clone();
        } else {
            state.next_payslip_id += 1;
            let id = state.next_payslip_id;
            state.payslips.insert(
                key,
                Payslip {
                    id,
                    employee_id: payslip.employee_id,
                    period: payslip.period.clone(),
                    base_salary: payslip.base_salary,
                    overtime: payslip.overtime,
                    bonus: payslip.bonus,
                    allowances: payslip.allowances,
                    social_insurance: payslip.social_insurance,
                    health_insurance: payslip.health_insurance,
                    tax: payslip.tax,
                    deductions: payslip.deductions,
                    net_salary: payslip.net_salary,
                    status: payslip.status.clone(),
                    paid_date: None,
                    created_at: Some(Utc::now()),
                },
            );
        }
        Ok(())
    }

    async fn get_or_create_run(&self, period: &str, run_by: &str) -> Result<PayrollRun> {
        let mut state = self.state.lock().unwrap();
        if let Some(run) = state.runs.iter_mut().find(|r| r.period == period) {
            run.status = RunStatus::Processing.to_string();
            run.run_at = Some(Utc::now());
            run.run_by = Some(run_by.to_string());
            return Ok(run.clone());
        }
        let run = PayrollRun {
            id: state.runs.len() as u64 + 1,
            period: period.to_string(),
            status: RunStatus::Processing.to_string(),
            total_employees: 0,
            total_gross_salary: 0.0,
            total_net_salary: 0.0,
            run_at: Some(Utc::now()),
            run_by: Some(run_by.to_string()),
            completed_at: None,
        };
        state.runs.push(run.clone());
        Ok(run)
    }

    async fn update_run(&self, run: &PayrollRun) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        match state.runs.iter_mut().find(|r| r.id == run.id) {
            Some(existing) => {
                *existing = run.clone();
                Ok(())
            }
            None => bail!("payroll run {} not found", run.id),
        }
    }
}
