//! Record intake forms
//!
//! Validation is required-field presence only: no numeric bounds and no
//! cross-field checks (an expense may exceed the remaining fund balance;
//! the metrics layer flags the overspend instead). Accepted records get a
//! timestamp-derived synthetic id and land in the session workspace.

use crate::error::{DashboardError, Result};
use crate::models::{
    Expense, ExpenseCategory, Fund, FundSource, FundStatus, Gender, IncomeBracket, PurposeTag,
    Student, StudentStatus,
};
use chrono::{Days, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct NewFundForm {
    pub donor_name: Option<String>,
    pub source: Option<FundSource>,
    pub amount: Option<i64>,
    pub purpose: Option<PurposeTag>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStudentForm {
    pub name: Option<String>,
    pub district: Option<String>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub family_income: Option<IncomeBracket>,
    /// Optional link to the fund covering this student.
    pub fund_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewExpenseForm {
    pub fund_id: Option<String>,
    pub category: Option<ExpenseCategory>,
    pub amount: Option<i64>,
    pub description: Option<String>,
}

fn missing(fields: Vec<&str>) -> DashboardError {
    DashboardError::MissingFields(fields.join(", "))
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().map(|s| !s.trim().is_empty()).unwrap_or(false)
}

/// Synthetic id: a one-letter prefix plus the current epoch millis,
/// matching the id shape of the seeded records.
fn synthetic_id(prefix: char) -> String {
    format!("{}{}", prefix, Utc::now().timestamp_millis())
}

impl NewFundForm {
    pub fn into_fund(self) -> Result<Fund> {
        let mut absent = Vec::new();
        if !present(&self.donor_name) {
            absent.push("donor_name");
        }
        if self.source.is_none() {
            absent.push("source");
        }
        if self.amount.is_none() {
            absent.push("amount");
        }
        if self.purpose.is_none() {
            absent.push("purpose");
        }
        if !absent.is_empty() {
            return Err(missing(absent));
        }

        let today = Utc::now().date_naive();
        Ok(Fund {
            id: synthetic_id('f'),
            source: self.source.unwrap(),
            donor_name: self.donor_name.unwrap(),
            amount_sanctioned: self.amount.unwrap(),
            purpose_tags: vec![self.purpose.unwrap()],
            start_date: today,
            end_date: today.checked_add_days(Days::new(365)).unwrap_or(today),
            status: FundStatus::Active,
        })
    }
}

impl NewStudentForm {
    pub fn into_student(self) -> Result<Student> {
        let mut absent = Vec::new();
        if !present(&self.name) {
            absent.push("name");
        }
        if !present(&self.district) {
            absent.push("district");
        }
        if self.age.is_none() {
            absent.push("age");
        }
        if self.gender.is_none() {
            absent.push("gender");
        }
        if self.family_income.is_none() {
            absent.push("family_income");
        }
        if !absent.is_empty() {
            return Err(missing(absent));
        }

        Ok(Student {
            id: synthetic_id('s'),
            name: self.name.unwrap(),
            district: self.district.unwrap(),
            age: self.age.unwrap(),
            gender: self.gender.unwrap(),
            family_income: self.family_income.unwrap(),
            status: StudentStatus::Enrolled,
            placement_salary: None,
            funded_by_fund_id: self.fund_id.filter(|id| !id.trim().is_empty()),
        })
    }
}

impl NewExpenseForm {
    pub fn into_expense(self) -> Result<Expense> {
        let mut absent = Vec::new();
        if !present(&self.fund_id) {
            absent.push("fund_id");
        }
        if self.category.is_none() {
            absent.push("category");
        }
        if self.amount.is_none() {
            absent.push("amount");
        }
        if !present(&self.description) {
            absent.push("description");
        }
        if !absent.is_empty() {
            return Err(missing(absent));
        }

        Ok(Expense {
            id: synthetic_id('e'),
            fund_id: self.fund_id.unwrap(),
            category: self.category.unwrap(),
            amount: self.amount.unwrap(),
            date: Utc::now().date_naive(),
            description: self.description.unwrap(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fund_form_rejects_missing_fields_by_name() {
        let form = NewFundForm {
            donor_name: Some("HDFC Parivartan".to_string()),
            source: None,
            amount: None,
            purpose: Some(PurposeTag::Training),
        };

        let err = form.into_fund().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("source"));
        assert!(message.contains("amount"));
        assert!(!message.contains("donor_name"));
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let form = NewExpenseForm {
            fund_id: Some("  ".to_string()),
            category: Some(ExpenseCategory::Stipend),
            amount: Some(10_000),
            description: Some("stipend batch 3".to_string()),
        };

        let err = form.into_expense().unwrap_err();
        assert!(err.to_string().contains("fund_id"));
    }

    #[test]
    fn accepted_fund_starts_active_with_prefixed_id() {
        let form = NewFundForm {
            donor_name: Some("HDFC Parivartan".to_string()),
            source: Some(FundSource::Csr),
            amount: Some(5_000_000),
            purpose: Some(PurposeTag::Stipend),
        };

        let fund = form.into_fund().unwrap();
        assert!(fund.id.starts_with('f'));
        assert_eq!(fund.status, FundStatus::Active);
        assert_eq!(fund.amount_sanctioned, 5_000_000);
        assert_eq!(fund.purpose_tags, vec![PurposeTag::Stipend]);
    }

    #[test]
    fn accepted_student_starts_enrolled() {
        let form = NewStudentForm {
            name: Some("Rahul Singh".to_string()),
            district: Some("Almora".to_string()),
            age: Some(22),
            gender: Some(Gender::Male),
            family_income: Some(IncomeBracket::Bpl),
            fund_id: Some(String::new()),
        };

        let student = form.into_student().unwrap();
        assert!(student.id.starts_with('s'));
        assert_eq!(student.status, StudentStatus::Enrolled);
        // Blank fund link is treated as unassigned.
        assert!(student.funded_by_fund_id.is_none());
        assert!(student.placement_salary.is_none());
    }

    #[test]
    fn no_cross_field_balance_check_on_expenses() {
        // An expense larger than any fund is still accepted; overspend is
        // a metrics-layer flag, not an intake error.
        let form = NewExpenseForm {
            fund_id: Some("f1".to_string()),
            category: Some(ExpenseCategory::Devices),
            amount: Some(999_999_999),
            description: Some("bulk device order".to_string()),
        };

        assert!(form.into_expense().is_ok());
    }
}
