//! Demo directory and seeded collections
//!
//! Every session starts from this data set so each role has something to
//! look at before any records are added interactively.

use crate::models::{
    AlertKind, AlertSeverity, CredentialSync, EmployeeProfile, Expense, ExpenseCategory, Fund,
    FundSource, FundStatus, Gender, IncomeBracket, PurposeTag, RiskAlert, Role, SlaTarget,
    Student, StudentStatus, SyncStatus, UserProfile,
};
use crate::workspace::Workspace;
use chrono::{NaiveDate, TimeZone, Utc};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid seed date")
}

/// The static login directory: one identity per role.
pub fn demo_profiles() -> Vec<UserProfile> {
    vec![
        UserProfile {
            user_id: "u1".to_string(),
            name: "Priya Mehta".to_string(),
            email: "priya@corp-csr.com".to_string(),
            role: Role::CsrPartner,
            org_id: "TechCorp_Foundation".to_string(),
            avatar_url: None,
            district_scope: None,
        },
        UserProfile {
            user_id: "u2".to_string(),
            name: "Rajesh Singh".to_string(),
            email: "rajesh.gov@uk.gov.in".to_string(),
            role: Role::GovtOfficer,
            org_id: "State_Rural_Mission".to_string(),
            avatar_url: None,
            district_scope: Some("Pauri Garhwal".to_string()),
        },
        UserProfile {
            user_id: "u3".to_string(),
            name: "Amit Negi".to_string(),
            email: "amit@pahad.org".to_string(),
            role: Role::InternalAdmin,
            org_id: "WorkFromPahad".to_string(),
            avatar_url: None,
            district_scope: None,
        },
    ]
}

/// CSR sanctions total 14,000,000 — the investment base the S-ROI
/// multiple on the funder dashboard is computed against.
pub fn demo_funds() -> Vec<Fund> {
    vec![
        Fund {
            id: "f1".to_string(),
            source: FundSource::Csr,
            donor_name: "TechCorp Foundation".to_string(),
            amount_sanctioned: 5_000_000,
            purpose_tags: vec![PurposeTag::Training, PurposeTag::Devices],
            start_date: date(2025, 1, 1),
            end_date: date(2025, 12, 31),
            status: FundStatus::Active,
        },
        Fund {
            id: "f2".to_string(),
            source: FundSource::Govt,
            donor_name: "State Rural Mission".to_string(),
            amount_sanctioned: 3_500_000,
            purpose_tags: vec![PurposeTag::Stipend],
            start_date: date(2025, 2, 1),
            end_date: date(2026, 1, 31),
            status: FundStatus::Active,
        },
        Fund {
            id: "f3".to_string(),
            source: FundSource::Csr,
            donor_name: "Summit Financial CSR Trust".to_string(),
            amount_sanctioned: 9_000_000,
            purpose_tags: vec![PurposeTag::Training, PurposeTag::Mentors],
            start_date: date(2025, 1, 15),
            end_date: date(2026, 1, 14),
            status: FundStatus::Active,
        },
    ]
}

pub fn demo_expenses() -> Vec<Expense> {
    // Newest first; the f1 pair sums to 1,450,000 (29% of sanctioned).
    vec![
        Expense {
            id: "e3".to_string(),
            fund_id: "f2".to_string(),
            category: ExpenseCategory::Stipend,
            amount: 600_000,
            date: date(2025, 3, 5),
            description: "DBT stipend batch, February cohort".to_string(),
        },
        Expense {
            id: "e2".to_string(),
            fund_id: "f1".to_string(),
            category: ExpenseCategory::Devices,
            amount: 200_000,
            date: date(2025, 2, 20),
            description: "Lab devices, Almora centre".to_string(),
        },
        Expense {
            id: "e1".to_string(),
            fund_id: "f1".to_string(),
            category: ExpenseCategory::Training,
            amount: 1_250_000,
            date: date(2025, 2, 10),
            description: "EdTech partner training fees, Q1".to_string(),
        },
    ]
}

const STUDENT_FIRST_NAMES: [&str; 10] = [
    "Rohan", "Kavita", "Suraj", "Meena", "Deepak", "Anita", "Harish", "Pooja", "Naveen", "Rekha",
];
const STUDENT_LAST_NAMES: [&str; 8] = [
    "Rawat", "Devi", "Panwar", "Bisht", "Negi", "Bhandari", "Kandari", "Joshi",
];
const DISTRICTS: [&str; 4] = ["Pauri Garhwal", "Almora", "Chamoli", "Tehri Garhwal"];

/// Forty-student cohort, 38 placed. Salaries alternate 26,000/30,000 so
/// the cohort average lands on exactly 28,000/month.
pub fn demo_students() -> Vec<Student> {
    let mut students = Vec::with_capacity(40);
    for i in 0..40usize {
        let placed = i < 38;
        students.push(Student {
            id: format!("s{}", i + 1),
            name: format!(
                "{} {}",
                STUDENT_FIRST_NAMES[i % STUDENT_FIRST_NAMES.len()],
                STUDENT_LAST_NAMES[i % STUDENT_LAST_NAMES.len()],
            ),
            district: DISTRICTS[i % DISTRICTS.len()].to_string(),
            age: 19 + (i % 7) as u32,
            gender: if i % 2 == 0 {
                Gender::Male
            } else {
                Gender::Female
            },
            family_income: match i % 3 {
                0 => IncomeBracket::Bpl,
                1 => IncomeBracket::LowIncome,
                _ => IncomeBracket::MiddleIncome,
            },
            status: if placed {
                StudentStatus::Placed
            } else if i == 38 {
                StudentStatus::Phase2
            } else {
                StudentStatus::Phase1
            },
            placement_salary: placed.then(|| if i % 2 == 0 { 26_000 } else { 30_000 }),
            funded_by_fund_id: Some(
                match i % 3 {
                    0 => "f1",
                    1 => "f3",
                    _ => "f2",
                }
                .to_string(),
            ),
        });
    }
    students
}

pub fn demo_employees() -> Vec<EmployeeProfile> {
    vec![
        EmployeeProfile {
            person_id: "e1".to_string(),
            name: "Vikram Seth".to_string(),
            role: "Full Stack Dev".to_string(),
            skills: vec!["React".to_string(), "Node.js".to_string()],
            avatar_url: None,
        },
        EmployeeProfile {
            person_id: "e2".to_string(),
            name: "Anjali Sharma".to_string(),
            role: "UI/UX Designer".to_string(),
            skills: vec!["Figma".to_string(), "Tailwind".to_string()],
            avatar_url: None,
        },
        EmployeeProfile {
            person_id: "e3".to_string(),
            name: "Kabir Das".to_string(),
            role: "Backend Engineer".to_string(),
            skills: vec!["Python".to_string(), "PostgreSQL".to_string()],
            avatar_url: None,
        },
    ]
}

pub fn demo_credential_syncs() -> Vec<CredentialSync> {
    vec![
        CredentialSync {
            platform: "Skill India".to_string(),
            status: SyncStatus::Live,
            last_synced: Utc.with_ymd_and_hms(2025, 2, 28, 10, 0, 0).unwrap(),
        },
        CredentialSync {
            platform: "DigiLocker".to_string(),
            status: SyncStatus::Pending,
            last_synced: Utc.with_ymd_and_hms(2025, 2, 27, 14, 30, 0).unwrap(),
        },
    ]
}

pub fn demo_sla_targets() -> Vec<SlaTarget> {
    vec![SlaTarget {
        partner_name: "CodeMountain Academy".to_string(),
        placement_guarantee_percent: 80.0,
        current_placement_rate: 76.0,
        penalty_clause_active: false,
    }]
}

pub fn demo_risk_alerts() -> Vec<RiskAlert> {
    vec![
        RiskAlert {
            id: "a1".to_string(),
            kind: AlertKind::Financial,
            severity: AlertSeverity::Critical,
            message: "Cash buffer below 3 months".to_string(),
            action_required: "Release tranche 2 to prevent a stipend freeze".to_string(),
        },
        RiskAlert {
            id: "a2".to_string(),
            kind: AlertKind::SlaBreach,
            severity: AlertSeverity::Warning,
            message: "EdTech partner placement rate dipped below guarantee".to_string(),
            action_required: "Trigger warning letter per clause 4.2".to_string(),
        },
    ]
}

/// A fully seeded workspace, as minted for every new session.
pub fn demo_workspace() -> Workspace {
    Workspace::new(
        demo_funds(),
        demo_expenses(),
        demo_students(),
        demo_credential_syncs(),
        demo_sla_targets(),
        demo_risk_alerts(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics;

    #[test]
    fn directory_covers_every_role() {
        let profiles = demo_profiles();
        assert!(profiles.iter().any(|p| p.role == Role::InternalAdmin));
        assert!(profiles.iter().any(|p| p.role == Role::CsrPartner));
        assert!(profiles.iter().any(|p| p.role == Role::GovtOfficer));
    }

    #[test]
    fn seeded_expenses_reference_seeded_funds() {
        let funds = demo_funds();
        for expense in demo_expenses() {
            assert!(funds.iter().any(|f| f.id == expense.fund_id));
        }
    }

    #[test]
    fn seeded_cohort_reproduces_the_roi_figures() {
        let students = demo_students();
        assert_eq!(students.len(), 40);
        assert_eq!(metrics::placed_count(&students), 38);

        let avg_salary = metrics::average_placement_salary(&students);
        assert!((avg_salary - 28_000.0).abs() < 1e-9);

        let csr_investment: i64 = demo_funds()
            .iter()
            .filter(|f| f.source == FundSource::Csr)
            .map(|f| f.amount_sanctioned)
            .sum();
        assert_eq!(csr_investment, 14_000_000);

        let multiple = metrics::social_roi_multiple(38, avg_salary, csr_investment);
        assert!((multiple - 2.74).abs() < 0.005);
    }

    #[test]
    fn seeded_f1_utilization_is_29_percent() {
        let expenses = demo_expenses();
        let utilized = metrics::fund_utilization("f1", &expenses);
        assert_eq!(utilized, 1_450_000);
        assert!((metrics::utilization_percent(utilized, 5_000_000) - 29.0).abs() < 1e-9);
    }
}
