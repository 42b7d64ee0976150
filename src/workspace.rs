//! Per-session in-memory state
//!
//! Each login owns an independent `Workspace`. Nothing here persists; a
//! process restart (or logout) discards every addition, by contract.

use crate::models::{CredentialSync, Expense, Fund, RiskAlert, SlaTarget, Student};
use tokio::sync::RwLock;

/// Mutable collections plus the read-mostly snapshots a session displays.
pub struct Workspace {
    funds: RwLock<Vec<Fund>>,
    expenses: RwLock<Vec<Expense>>,
    students: RwLock<Vec<Student>>,

    // Display-only; no write path through the dashboards.
    credential_syncs: Vec<CredentialSync>,
    sla_targets: Vec<SlaTarget>,
    risk_alerts: Vec<RiskAlert>,
}

/// A point-in-time clone of the collections, handed to the pure metrics
/// layer so computation never holds a lock.
#[derive(Debug, Clone)]
pub struct WorkspaceSnapshot {
    pub funds: Vec<Fund>,
    pub expenses: Vec<Expense>,
    pub students: Vec<Student>,
    pub credential_syncs: Vec<CredentialSync>,
    pub sla_targets: Vec<SlaTarget>,
    pub risk_alerts: Vec<RiskAlert>,
}

impl Workspace {
    pub fn empty() -> Self {
        Self {
            funds: RwLock::new(Vec::new()),
            expenses: RwLock::new(Vec::new()),
            students: RwLock::new(Vec::new()),
            credential_syncs: Vec::new(),
            sla_targets: Vec::new(),
            risk_alerts: Vec::new(),
        }
    }

    pub fn new(
        funds: Vec<Fund>,
        expenses: Vec<Expense>,
        students: Vec<Student>,
        credential_syncs: Vec<CredentialSync>,
        sla_targets: Vec<SlaTarget>,
        risk_alerts: Vec<RiskAlert>,
    ) -> Self {
        Self {
            funds: RwLock::new(funds),
            expenses: RwLock::new(expenses),
            students: RwLock::new(students),
            credential_syncs,
            sla_targets,
            risk_alerts,
        }
    }

    pub async fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            funds: self.funds.read().await.clone(),
            expenses: self.expenses.read().await.clone(),
            students: self.students.read().await.clone(),
            credential_syncs: self.credential_syncs.clone(),
            sla_targets: self.sla_targets.clone(),
            risk_alerts: self.risk_alerts.clone(),
        }
    }

    /// New funds append to the back of the collection.
    pub async fn add_fund(&self, fund: Fund) {
        self.funds.write().await.push(fund);
    }

    /// New students append to the back of the collection.
    pub async fn add_student(&self, student: Student) {
        self.students.write().await.push(student);
    }

    /// New expenses prepend, so "recent expenses" reads from the front.
    pub async fn add_expense(&self, expense: Expense) {
        self.expenses.write().await.insert(0, expense);
    }

    pub async fn fund_exists(&self, fund_id: &str) -> bool {
        self.funds.read().await.iter().any(|f| f.id == fund_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ExpenseCategory, FundSource, FundStatus, Gender, IncomeBracket, StudentStatus,
    };
    use chrono::NaiveDate;

    fn sample_fund(id: &str) -> Fund {
        Fund {
            id: id.to_string(),
            source: FundSource::Govt,
            donor_name: "State Rural Mission".to_string(),
            amount_sanctioned: 1_000_000,
            purpose_tags: vec![],
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            status: FundStatus::Active,
        }
    }

    fn sample_expense(id: &str) -> Expense {
        Expense {
            id: id.to_string(),
            fund_id: "f1".to_string(),
            category: ExpenseCategory::Ops,
            amount: 10_000,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            description: "lab rent".to_string(),
        }
    }

    #[tokio::test]
    async fn expenses_prepend_funds_append() {
        let workspace = Workspace::empty();

        workspace.add_fund(sample_fund("f1")).await;
        workspace.add_fund(sample_fund("f2")).await;
        workspace.add_expense(sample_expense("e1")).await;
        workspace.add_expense(sample_expense("e2")).await;

        let snap = workspace.snapshot().await;
        assert_eq!(snap.funds[0].id, "f1");
        assert_eq!(snap.funds[1].id, "f2");
        assert_eq!(snap.expenses[0].id, "e2");
        assert_eq!(snap.expenses[1].id, "e1");
    }

    #[tokio::test]
    async fn adding_a_student_touches_no_other_collection() {
        let workspace = Workspace::empty();
        workspace.add_fund(sample_fund("f1")).await;

        let before = workspace.snapshot().await;

        workspace
            .add_student(Student {
                id: "s1".to_string(),
                name: "Kavita Devi".to_string(),
                district: "Almora".to_string(),
                age: 21,
                gender: Gender::Female,
                family_income: IncomeBracket::Bpl,
                status: StudentStatus::Placed,
                placement_salary: Some(26_000),
                funded_by_fund_id: None,
            })
            .await;

        let after = workspace.snapshot().await;
        assert_eq!(after.students.len(), before.students.len() + 1);
        assert_eq!(after.funds.len(), before.funds.len());
        assert_eq!(after.expenses.len(), before.expenses.len());
    }
}
