use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_code": "EMP-2024-101",
        "full_name": "Nguyen Van A",
        "bank_account_no": "0123456789",
        "base_salary": 25000000.0,
        "status": "active"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-2024-101")]
    pub employee_code: String,

    #[schema(example = "Nguyen Van A")]
    pub full_name: String,

    /// Account number used in bank payment files.
    #[schema(example = "0123456789")]
    pub bank_account_no: String,

    #[schema(example = 25000000.0)]
    pub base_salary: f64,

    #[schema(example = "active")]
    pub status: String,
}
