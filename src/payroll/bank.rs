//! Salary transfer files in the formats the partner banks ingest.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::payroll::store::PayrollStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[derive(strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum BankFormat {
    Vcb,
    Acb,
}

/// Renders the bank transfer file for `period`.
///
/// One line per active employee holding a payslip for the period, in the
/// order the employees are listed; employees without a payslip are skipped.
/// The payment note is `Luong thang <period>` in both formats.
pub async fn export_bank_file<S: PayrollStore>(
    store: &S,
    period: &str,
    format: BankFormat,
) -> Result<String> {
    let employees = store.active_employees().await?;
    let mut lines: Vec<String> = Vec::with_capacity(employees.len() + 1);

    match format {
        BankFormat::Vcb => {
            lines.push("STT,Số tài khoản,Tên người nhận,Số tiền,Nội dung".to_string());
            for (index, employee) in employees.iter().enumerate() {
                if let Some(payslip) = store.payslip(employee.id, period).await? {
                    lines.push(format!(
                        "{},{},{},{},Luong thang {}",
                        index + 1,
                        employee.bank_account_no,
                        employee.full_name,
                        payslip.net_salary,
                        period
                    ));
                }
            }
        }
        BankFormat::Acb => {
            lines.push("STT|Ho ten|So tai khoan|So tien|Dien giai".to_string());
            for (index, employee) in employees.iter().enumerate() {
                if let Some(payslip) = store.payslip(employee.id, period).await? {
                    lines.push(format!(
                        "{}|{}|{}|{}|Luong thang {}",
                        index + 1,
                        employee.full_name,
                        employee.bank_account_no,
                        payslip.net_salary,
                        period
                    ));
                }
            }
        }
    }

    Ok(lines.join("\n"))
}
