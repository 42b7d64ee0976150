//! Dashboard walkthrough
//!
//! Logs in each demo identity, renders its role's dashboard figures, and
//! exercises intake plus a narrative report end to end without a server.

use std::sync::Arc;
use tracing::info;

use transparency_dashboard::auth::{SessionRegistry, StaticDirectory};
use transparency_dashboard::intake::NewExpenseForm;
use transparency_dashboard::models::ExpenseCategory;
use transparency_dashboard::narrative::NarrativeService;
use transparency_dashboard::views::{self, DashboardView};
use transparency_dashboard::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("=== Transparency Dashboard Walkthrough ===\n");

    let registry = SessionRegistry::new(Arc::new(StaticDirectory::demo()));

    for email in [
        "amit@pahad.org",
        "priya@corp-csr.com",
        "rajesh.gov@uk.gov.in",
    ] {
        let (token, profile) = registry.login(email, None).await?;
        info!("Logged in {} as {}", profile.email, profile.role);

        let session = registry.resolve(&token).await?;
        let snapshot = session.workspace.snapshot().await;

        println!("--- {} ({}) ---", profile.name, profile.role);
        match views::dashboard_for(&profile, &snapshot) {
            DashboardView::Admin(view) => {
                println!("  Sanctioned: Rs {}", view.totals.total_sanctioned);
                println!(
                    "  Utilized:   Rs {} ({:.1}%)",
                    view.totals.total_utilized, view.totals.utilization_percent
                );
                println!(
                    "  Students:   {} enrolled, {} placed",
                    view.students_total, view.placed_count
                );
            }
            DashboardView::Csr(view) => {
                println!("  Investment: Rs {}", view.total_investment);
                println!("  Placed:     {}/{}", view.students_placed, view.cohort_size);
                println!(
                    "  S-ROI:      {:.2}x over {} years",
                    view.roi_multiple, view.roi_horizon_years
                );
            }
            DashboardView::Govt(view) => {
                println!("  Youth skilled: {}", view.total_youth_skilled);
                println!("  Annual income: Rs {}", view.annual_income_generated);
                for rollup in &view.district_rollups {
                    println!(
                        "    {}: {} students, {} placed",
                        rollup.district, rollup.headcount, rollup.placed
                    );
                }
            }
        }
        println!();
    }

    // Intake: a new expense recomputes utilization on the next render.
    let (token, profile) = registry.login("amit@pahad.org", None).await?;
    let session = registry.resolve(&token).await?;

    let expense = NewExpenseForm {
        fund_id: Some("f1".to_string()),
        category: Some(ExpenseCategory::Mentors),
        amount: Some(150_000),
        description: Some("Mentor honorarium, Q3".to_string()),
    }
    .into_expense()?;
    session.workspace.add_expense(expense).await;

    let snapshot = session.workspace.snapshot().await;
    if let DashboardView::Admin(view) = views::dashboard_for(&profile, &snapshot) {
        println!("--- After new expense ---");
        println!(
            "  Utilized: Rs {} ({:.1}%)",
            view.totals.total_utilized, view.totals.utilization_percent
        );
        println!("  Newest expense: {}", view.recent_expenses[0].description);
    }

    // Narrative: without a key this prints the literal fallback.
    let narrative = NarrativeService::new(std::env::var("GEMINI_API_KEY").unwrap_or_default());
    let csr = views::csr_dashboard(&snapshot);
    let impact = serde_json::json!({
        "students_placed": csr.students_placed,
        "roi_multiple": csr.roi_multiple,
    });
    let financials = serde_json::to_value(&csr.category_breakdown)?;
    let report = narrative.brsr_summary(&impact, &financials).await;

    println!("\n--- BRSR summary ---\n{}\n", report);
    println!("=== Walkthrough complete ===");

    Ok(())
}
