pub mod payroll;
pub mod payslip;
