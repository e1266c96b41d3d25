pub mod employee;
pub mod payroll_config;
pub mod payroll_run;
pub mod payslip;

pub use employee::Employee;
pub use payroll_config::PayrollConfig;
pub use payroll_run::{PayrollRun, RunStatus};
pub use payslip::{Payslip, PayslipStatus};
