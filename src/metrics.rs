//! Derived-metrics aggregation
//!
//! Pure computation over the in-memory collections. Every figure shown on
//! a dashboard is recomputed here from raw funds/expenses/students; nothing
//! in this module does I/O or holds a lock, so it can run on every render.
//!
//! Guard rules (normative): zero divisors yield 0 rather than NaN or a
//! panic, and over-spent funds are flagged rather than rejected.

use crate::models::{Expense, Fund, FundSource, Student};
use serde::{Deserialize, Serialize};

/// Projection horizon for the social-return multiple.
pub const ROI_HORIZON_YEARS: i64 = 3;

const MONTHS_PER_YEAR: i64 = 12;

//
// ================= Fund Utilization =================
//

/// A fund paired with its derived utilization figure. The fund record
/// itself never stores this; the sum of its expenses is the truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundUtilization {
    pub fund: Fund,
    pub utilized: i64,
    /// Raw utilization percentage, uncapped.
    pub percent: f64,
    /// Percentage clamped at 100 for bar rendering.
    pub display_percent: f64,
    /// Set when utilized exceeds sanctioned. Shown as a flag, never an error.
    pub overspent: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FundingTotals {
    pub total_sanctioned: i64,
    pub total_utilized: i64,
    pub utilization_percent: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SourceDistribution {
    pub csr_sanctioned: i64,
    pub govt_sanctioned: i64,
}

/// Sum of expense amounts referencing this fund id.
pub fn fund_utilization(fund_id: &str, expenses: &[Expense]) -> i64 {
    expenses
        .iter()
        .filter(|e| e.fund_id == fund_id)
        .map(|e| e.amount)
        .sum()
}

/// Utilization percentage with a divide-by-zero guard: a fund sanctioned
/// at 0 shows 0%, whatever was spent against it.
pub fn utilization_percent(utilized: i64, sanctioned: i64) -> f64 {
    if sanctioned == 0 {
        return 0.0;
    }
    (utilized as f64 / sanctioned as f64) * 100.0
}

/// Derive utilization views for every fund, in the funds' own order.
pub fn fund_utilizations(funds: &[Fund], expenses: &[Expense]) -> Vec<FundUtilization> {
    funds
        .iter()
        .map(|fund| {
            let utilized = fund_utilization(&fund.id, expenses);
            let percent = utilization_percent(utilized, fund.amount_sanctioned);
            FundUtilization {
                utilized,
                percent,
                display_percent: percent.min(100.0),
                overspent: utilized > fund.amount_sanctioned,
                fund: fund.clone(),
            }
        })
        .collect()
}

pub fn funding_totals(funds: &[Fund], expenses: &[Expense]) -> FundingTotals {
    let total_sanctioned: i64 = funds.iter().map(|f| f.amount_sanctioned).sum();
    let total_utilized: i64 = funds
        .iter()
        .map(|f| fund_utilization(&f.id, expenses))
        .sum();

    FundingTotals {
        total_sanctioned,
        total_utilized,
        utilization_percent: utilization_percent(total_utilized, total_sanctioned),
    }
}

/// Sanctioned totals split by fund source, for the distribution chart.
pub fn source_distribution(funds: &[Fund]) -> SourceDistribution {
    let mut dist = SourceDistribution {
        csr_sanctioned: 0,
        govt_sanctioned: 0,
    };
    for fund in funds {
        match fund.source {
            FundSource::Csr => dist.csr_sanctioned += fund.amount_sanctioned,
            FundSource::Govt => dist.govt_sanctioned += fund.amount_sanctioned,
        }
    }
    dist
}

//
// ================= Placement & Social ROI =================
//

pub fn placed_count(students: &[Student]) -> usize {
    students.iter().filter(|s| s.is_placed()).count()
}

/// Placed students as a percentage of all students; 0 when there are none.
pub fn placement_rate(students: &[Student]) -> f64 {
    if students.is_empty() {
        return 0.0;
    }
    (placed_count(students) as f64 / students.len() as f64) * 100.0
}

/// Mean monthly starting salary over placed students that have one.
pub fn average_placement_salary(students: &[Student]) -> f64 {
    let salaries: Vec<i64> = students
        .iter()
        .filter(|s| s.is_placed())
        .filter_map(|s| s.placement_salary)
        .collect();

    if salaries.is_empty() {
        return 0.0;
    }
    salaries.iter().sum::<i64>() as f64 / salaries.len() as f64
}

/// Social-return multiple over a fixed 3-year horizon:
/// (placed × avg monthly salary × 12 × 3) / total investment.
///
/// Zero placed students or zero investment yields 0.0, never NaN.
pub fn social_roi_multiple(placed: usize, avg_monthly_salary: f64, total_investment: i64) -> f64 {
    if placed == 0 || total_investment <= 0 {
        return 0.0;
    }
    let projected_value =
        placed as f64 * avg_monthly_salary * (MONTHS_PER_YEAR * ROI_HORIZON_YEARS) as f64;
    projected_value / total_investment as f64
}

//
// ================= District Rollups =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistrictRollup {
    pub district: String,
    pub headcount: usize,
    pub placed: usize,
    /// Annualized new income: monthly placement salaries × 12.
    pub annual_income: i64,
}

/// Per-district headcount and income, in first-appearance order of the
/// underlying collection. No sorting or tie-break is applied.
pub fn district_rollups(students: &[Student]) -> Vec<DistrictRollup> {
    let mut rollups: Vec<DistrictRollup> = Vec::new();

    for student in students {
        let entry = match rollups.iter_mut().find(|r| r.district == student.district) {
            Some(existing) => existing,
            None => {
                rollups.push(DistrictRollup {
                    district: student.district.clone(),
                    headcount: 0,
                    placed: 0,
                    annual_income: 0,
                });
                rollups.last_mut().unwrap()
            }
        };

        entry.headcount += 1;
        if student.is_placed() {
            entry.placed += 1;
            entry.annual_income += student.placement_salary.unwrap_or(0) * MONTHS_PER_YEAR;
        }
    }

    rollups
}

/// Total annualized income across all placed students.
pub fn total_annual_income(students: &[Student]) -> i64 {
    students
        .iter()
        .filter(|s| s.is_placed())
        .filter_map(|s| s.placement_salary)
        .sum::<i64>()
        * MONTHS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        ExpenseCategory, FundStatus, Gender, IncomeBracket, PurposeTag, StudentStatus,
    };
    use chrono::NaiveDate;

    fn fund(id: &str, sanctioned: i64) -> Fund {
        Fund {
            id: id.to_string(),
            source: FundSource::Csr,
            donor_name: "TechCorp Foundation".to_string(),
            amount_sanctioned: sanctioned,
            purpose_tags: vec![PurposeTag::Training],
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            status: FundStatus::Active,
        }
    }

    fn expense(id: &str, fund_id: &str, amount: i64) -> Expense {
        Expense {
            id: id.to_string(),
            fund_id: fund_id.to_string(),
            category: ExpenseCategory::Training,
            amount,
            date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            description: "test expense".to_string(),
        }
    }

    fn student(id: &str, district: &str, status: StudentStatus, salary: Option<i64>) -> Student {
        Student {
            id: id.to_string(),
            name: "Test Student".to_string(),
            district: district.to_string(),
            age: 22,
            gender: Gender::Female,
            family_income: IncomeBracket::LowIncome,
            status,
            placement_salary: salary,
            funded_by_fund_id: None,
        }
    }

    #[test]
    fn utilization_is_sum_of_referencing_expenses() {
        let expenses = vec![
            expense("e1", "f1", 1_250_000),
            expense("e2", "f1", 200_000),
            expense("e3", "f2", 999_999),
        ];

        assert_eq!(fund_utilization("f1", &expenses), 1_450_000);
        assert_eq!(fund_utilization("f2", &expenses), 999_999);
        assert_eq!(fund_utilization("missing", &expenses), 0);
    }

    #[test]
    fn zero_sanctioned_shows_zero_percent() {
        assert_eq!(utilization_percent(500_000, 0), 0.0);
        assert_eq!(utilization_percent(0, 0), 0.0);
    }

    #[test]
    fn seeded_fund_scenario_shows_29_percent() {
        let funds = vec![fund("f1", 5_000_000)];
        let expenses = vec![
            expense("e1", "f1", 1_250_000),
            expense("e2", "f1", 200_000),
        ];

        let totals = funding_totals(&funds, &expenses);
        assert_eq!(totals.total_utilized, 1_450_000);
        assert!((totals.utilization_percent - 29.0).abs() < 1e-9);
    }

    #[test]
    fn zero_funds_totals_are_zero() {
        let totals = funding_totals(&[], &[]);
        assert_eq!(totals.total_sanctioned, 0);
        assert_eq!(totals.total_utilized, 0);
        assert_eq!(totals.utilization_percent, 0.0);
    }

    #[test]
    fn overspend_is_flagged_and_display_clamped() {
        let funds = vec![fund("f1", 100_000)];
        let expenses = vec![expense("e1", "f1", 150_000)];

        let views = fund_utilizations(&funds, &expenses);
        assert!(views[0].overspent);
        assert!((views[0].percent - 150.0).abs() < 1e-9);
        assert_eq!(views[0].display_percent, 100.0);
    }

    #[test]
    fn within_budget_fund_is_not_flagged() {
        let funds = vec![fund("f1", 200_000)];
        let expenses = vec![expense("e1", "f1", 150_000)];

        let views = fund_utilizations(&funds, &expenses);
        assert!(!views[0].overspent);
        assert!((views[0].display_percent - 75.0).abs() < 1e-9);
    }

    #[test]
    fn roi_with_zero_placed_is_zero_not_nan() {
        let multiple = social_roi_multiple(0, 28_000.0, 14_000_000);
        assert_eq!(multiple, 0.0);
        assert!(!multiple.is_nan());
    }

    #[test]
    fn roi_with_zero_investment_is_zero() {
        assert_eq!(social_roi_multiple(38, 28_000.0, 0), 0.0);
    }

    #[test]
    fn roi_matches_cohort_scenario_to_two_decimals() {
        // 38 of 40 placed at an average of 28,000/month.
        let total_investment = 14_000_000;
        let multiple = social_roi_multiple(38, 28_000.0, total_investment);

        let expected = (38.0 * 28_000.0 * 12.0 * 3.0) / total_investment as f64;
        assert!((multiple - expected).abs() < 0.005);
        assert!((multiple - 2.74).abs() < 0.005);
    }

    #[test]
    fn placed_count_tracks_status() {
        let mut students = vec![
            student("s1", "Almora", StudentStatus::Phase2, None),
            student("s2", "Almora", StudentStatus::Placed, Some(25_000)),
        ];
        assert_eq!(placed_count(&students), 1);

        students.push(student("s3", "Pauri Garhwal", StudentStatus::Placed, Some(30_000)));
        assert_eq!(placed_count(&students), 2);
    }

    #[test]
    fn placement_rate_guards_empty_collection() {
        assert_eq!(placement_rate(&[]), 0.0);
    }

    #[test]
    fn average_salary_ignores_unplaced_and_unsalaried() {
        let students = vec![
            student("s1", "Almora", StudentStatus::Placed, Some(20_000)),
            student("s2", "Almora", StudentStatus::Placed, Some(30_000)),
            student("s3", "Almora", StudentStatus::Placed, None),
            student("s4", "Almora", StudentStatus::Enrolled, Some(99_000)),
        ];
        assert!((average_placement_salary(&students) - 25_000.0).abs() < 1e-9);
        assert_eq!(average_placement_salary(&[]), 0.0);
    }

    #[test]
    fn district_rollups_preserve_first_appearance_order() {
        let students = vec![
            student("s1", "Pauri Garhwal", StudentStatus::Placed, Some(25_000)),
            student("s2", "Almora", StudentStatus::Enrolled, None),
            student("s3", "Pauri Garhwal", StudentStatus::Dropped, None),
            student("s4", "Chamoli", StudentStatus::Placed, Some(22_000)),
        ];

        let rollups = district_rollups(&students);
        let order: Vec<&str> = rollups.iter().map(|r| r.district.as_str()).collect();
        assert_eq!(order, vec!["Pauri Garhwal", "Almora", "Chamoli"]);

        assert_eq!(rollups[0].headcount, 2);
        assert_eq!(rollups[0].placed, 1);
        assert_eq!(rollups[0].annual_income, 25_000 * 12);
        assert_eq!(rollups[2].annual_income, 22_000 * 12);
    }

    #[test]
    fn source_distribution_splits_by_origin() {
        let mut f1 = fund("f1", 5_000_000);
        f1.source = FundSource::Csr;
        let mut f2 = fund("f2", 3_000_000);
        f2.source = FundSource::Govt;
        let mut f3 = fund("f3", 1_000_000);
        f3.source = FundSource::Csr;

        let dist = source_distribution(&[f1, f2, f3]);
        assert_eq!(dist.csr_sanctioned, 6_000_000);
        assert_eq!(dist.govt_sanctioned, 3_000_000);
    }
}
