use crate::api::payroll::{
    BankExportQuery, RunPayrollRequest, TaxPreviewQuery, TaxPreviewResponse, UpdatePayrollConfig,
};
use crate::api::payslip::{PayslipFilter, PayslipListResponse};
use crate::model::{PayrollConfig, PayrollRun, Payslip};
use crate::payroll::runner::{EmployeeFailure, PayrollRunSummary};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Portal API",
        version = "1.0.0",
        description = r#"
## HR Self-Service Portal — Payroll

This API powers the payroll side of an HR self-service portal.

### 🔹 Key Features
- **Payroll Runs**
  - Trigger a payroll run for a month, view run history and totals
- **Payslips**
  - Per-employee payslips with overtime pay, insurances, progressive tax
    and unpaid-leave deductions
- **Configuration**
  - Admin-editable overtime multiplier, insurance rates and tax deductions
- **Bank Export**
  - Salary transfer files in VCB and ACB layouts
- **Tax Preview**
  - What-if calculation against the progressive tax brackets

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::payroll::run_payroll,
        crate::api::payroll::list_runs,
        crate::api::payroll::get_run,
        crate::api::payroll::tax_preview,
        crate::api::payroll::export_bank,
        crate::api::payroll::get_config,
        crate::api::payroll::update_config,

        crate::api::payslip::get_payslip,
        crate::api::payslip::list_payslips
    ),
    components(
        schemas(
            RunPayrollRequest,
            PayrollRunSummary,
            EmployeeFailure,
            PayrollRun,
            TaxPreviewQuery,
            TaxPreviewResponse,
            BankExportQuery,
            PayrollConfig,
            UpdatePayrollConfig,
            Payslip,
            PayslipFilter,
            PayslipListResponse
        )
    ),
    tags(
        (name = "Payroll", description = "Payroll run, configuration and export APIs"),
        (name = "Payslip", description = "Payslip lookup APIs"),
    )
)]
pub struct ApiDoc;
