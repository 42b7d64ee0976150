//! Core data models for the transparency dashboard

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

//
// ================= Enums =================
//

/// Role of a logged-in identity. Role decides which dashboard renders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    InternalAdmin,
    CsrPartner,
    GovtOfficer,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum FundSource {
    Csr,
    Govt,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FundStatus {
    Active,
    Depleted,
    Planned,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PurposeTag {
    Training,
    Stipend,
    Devices,
    Mentors,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExpenseCategory {
    Training,
    Stipend,
    Devices,
    Rent,
    Mentors,
    Ops,
}

/// Student lifecycle: enrolled → training phases → placed or dropped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StudentStatus {
    Enrolled,
    Phase1,
    Phase2,
    Phase3,
    Placed,
    Dropped,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IncomeBracket {
    Bpl,
    LowIncome,
    MiddleIncome,
}

//
// ================= Identity =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub org_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Government officers may be scoped to a single district.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_scope: Option<String>,
}

//
// ================= Funds & Expenses =================
//

/// A sanctioned fund. Utilization is never stored here; it is always
/// derived from the expenses referencing this fund's id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fund {
    pub id: String,
    pub source: FundSource,
    pub donor_name: String,
    pub amount_sanctioned: i64,
    pub purpose_tags: Vec<PurposeTag>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: FundStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub fund_id: String,
    pub category: ExpenseCategory,
    pub amount: i64,
    pub date: NaiveDate,
    pub description: String,
}

//
// ================= Students =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub district: String,
    pub age: u32,
    pub gender: Gender,
    pub family_income: IncomeBracket,
    pub status: StudentStatus,
    /// Monthly starting salary once placed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement_salary: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funded_by_fund_id: Option<String>,
}

impl Student {
    pub fn is_placed(&self) -> bool {
        self.status == StudentStatus::Placed
    }
}

//
// ================= Staff Roster =================
//

/// Internal staff member considered by the team-matching features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub person_id: String,
    pub name: String,
    pub role: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

//
// ================= Read-mostly Snapshots =================
//
// No write path through the dashboards; seeded once and displayed as-is.

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SyncStatus {
    Live,
    Pending,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialSync {
    pub platform: String,
    pub status: SyncStatus,
    pub last_synced: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlaTarget {
    pub partner_name: String,
    pub placement_guarantee_percent: f64,
    pub current_placement_rate: f64,
    pub penalty_clause_active: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertKind {
    Financial,
    #[serde(rename = "SLA_BREACH")]
    SlaBreach,
    Attrition,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertSeverity {
    Critical,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAlert {
    pub id: String,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
    pub action_required: String,
}

//
// ================= Display =================
//

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::InternalAdmin => "Internal Admin",
            Role::CsrPartner => "CSR Partner",
            Role::GovtOfficer => "Government Officer",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for FundSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FundSource::Csr => "CSR",
            FundSource::Govt => "GOVT",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StudentStatus::Enrolled => "Enrolled",
            StudentStatus::Phase1 => "Phase 1 (Foundation)",
            StudentStatus::Phase2 => "Phase 2 (Specialization)",
            StudentStatus::Phase3 => "Phase 3 (Placement)",
            StudentStatus::Placed => "Placed",
            StudentStatus::Dropped => "Dropped",
        };
        write!(f, "{}", s)
    }
}
