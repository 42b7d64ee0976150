//! Narrative and structured-report generation
//!
//! Serializes current metrics into prompts for the external generative
//! service. Contract for every feature here: a literal fallback value is
//! returned when the service is unreachable, unconfigured, or returns
//! something unparsable. Callers never see an error and never block on a
//! retry; the dashboard is always renderable.

use crate::models::EmployeeProfile;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

pub mod gemini;
pub use gemini::GeminiClient;

//
// ================= Structured Payloads =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetEstimate {
    pub value: i64,
    pub currency: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timeline {
    pub duration_days: u32,
    pub start_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectBrief {
    pub title: String,
    pub summary: String,
    pub priority: Priority,
    pub estimated_budget: BudgetEstimate,
    pub timeline: Timeline,
    pub deliverables: Vec<String>,
    pub skills_required: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestedMember {
    pub person_id: String,
    pub role: String,
    pub match_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRecommendation {
    pub overall_match_score: f64,
    pub suggested_team: Vec<SuggestedMember>,
    pub explainability: String,
    pub risks: Vec<String>,
    pub suggested_mitigations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Microcourse {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonGap {
    pub person_id: String,
    pub missing: Vec<String>,
    pub recommended_microcourses: Vec<Microcourse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGapReport {
    pub team_gap_report: Vec<PersonGap>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    Completed,
    InProgress,
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedTask {
    pub id: String,
    pub assignee_id: String,
    pub title: String,
    pub est_hours: f64,
    pub due_date: String,
    pub status: TaskState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: String,
    pub title: String,
    pub due: String,
    pub tasks: Vec<PlannedTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectPlan {
    pub project_plan_id: String,
    pub milestones: Vec<Milestone>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectHealth {
    Green,
    Amber,
    Red,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringAlert {
    pub message: String,
    pub ticket_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoredTask {
    pub task_id: String,
    pub status: String,
    pub quality_score: f64,
    pub authenticity_score: f64,
    pub checks: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringReport {
    pub project_health: ProjectHealth,
    pub alerts: Vec<MonitoringAlert>,
    pub task_status: Vec<MonitoredTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoSnippet {
    pub time: String,
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextRecommendation {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub score: f64,
    pub feedback: String,
    pub demo_snippets: Vec<DemoSnippet>,
    pub next_recommendation: NextRecommendation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailySummary {
    pub daily_summary: String,
    pub hours_logged: f64,
    pub suggested_next_steps: Vec<String>,
}

//
// ================= Literal Fallbacks =================
//
// One per call site, per the external-interface contract. These are what
// the dashboards render when the service is unreachable or unconfigured.

pub const BRSR_FALLBACK: &str = "Automated BRSR narrative is unavailable. The utilization and \
impact figures shown above remain authoritative; please draft the executive summary manually.";

pub const AUDIT_FALLBACK: &str = "Automated operational audit is unavailable. Review fund \
utilization bars and recent expenses directly; all figures on this dashboard are live.";

pub fn fallback_project_brief() -> ProjectBrief {
    ProjectBrief {
        title: "Untitled Project".to_string(),
        summary: "Automated brief unavailable; review the intake request manually.".to_string(),
        priority: Priority::Medium,
        estimated_budget: BudgetEstimate {
            value: 0,
            currency: "INR".to_string(),
            confidence: 0.0,
        },
        timeline: Timeline {
            duration_days: 30,
            start_by: "TBD".to_string(),
        },
        deliverables: Vec::new(),
        skills_required: Vec::new(),
    }
}

pub fn fallback_team_recommendation() -> TeamRecommendation {
    TeamRecommendation {
        overall_match_score: 0.0,
        suggested_team: Vec::new(),
        explainability: "Automated matching unavailable; assign the team manually.".to_string(),
        risks: Vec::new(),
        suggested_mitigations: Vec::new(),
    }
}

pub fn fallback_skill_gap_report() -> SkillGapReport {
    SkillGapReport {
        team_gap_report: Vec::new(),
    }
}

pub fn fallback_project_plan() -> ProjectPlan {
    ProjectPlan {
        project_plan_id: "plan-fallback".to_string(),
        milestones: Vec::new(),
    }
}

pub fn fallback_monitoring_report() -> MonitoringReport {
    MonitoringReport {
        project_health: ProjectHealth::Amber,
        alerts: vec![MonitoringAlert {
            message: "Automated monitoring unavailable; check task boards directly.".to_string(),
            ticket_id: "TKT-0000".to_string(),
        }],
        task_status: Vec::new(),
    }
}

pub fn fallback_assessment() -> Assessment {
    Assessment {
        score: 0.0,
        feedback: "Automated assessment unavailable; a mentor will review this submission."
            .to_string(),
        demo_snippets: Vec::new(),
        next_recommendation: NextRecommendation {
            title: "Instructor review".to_string(),
        },
    }
}

pub fn fallback_daily_summary() -> DailySummary {
    DailySummary {
        daily_summary: "Automated summary unavailable. Your log entries were recorded."
            .to_string(),
        hours_logged: 0.0,
        suggested_next_steps: Vec::new(),
    }
}

//
// ================= Service =================
//

/// All generation features behind one service. Construction never fails;
/// an unconfigured key simply means every call degrades to its fallback.
pub struct NarrativeService {
    client: GeminiClient,
}

impl NarrativeService {
    pub fn new(api_key: String) -> Self {
        Self {
            client: GeminiClient::new(api_key),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    async fn generate_text(&self, prompt: &str, fallback: &str) -> String {
        match self.client.generate(prompt).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("Generation returned empty text, using fallback");
                fallback.to_string()
            }
            Err(e) => {
                warn!("Generation failed, using fallback: {}", e);
                fallback.to_string()
            }
        }
    }

    async fn generate_structured<T, F>(&self, prompt: &str, fallback: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.client.generate(prompt).await {
            Ok(text) => match parse_structured::<T>(&text) {
                Some(value) => value,
                None => {
                    warn!("Generation returned unparsable structured output, using fallback");
                    fallback()
                }
            },
            Err(e) => {
                warn!("Generation failed, using fallback: {}", e);
                fallback()
            }
        }
    }

    /// Executive summary for the CSR partner's BRSR/ESG section.
    pub async fn brsr_summary(&self, impact: &Value, financials: &Value) -> String {
        let prompt = format!(
            r#"You are an ESG compliance officer. Generate a brief Executive Summary (max 150 words) for a CSR report based on the following data.
Focus on Social ROI, Transparency, and Beneficiary Impact.

Impact Metrics:
{}

Financial Utilization:
{}"#,
            pretty(impact),
            pretty(financials),
        );

        self.generate_text(&prompt, BRSR_FALLBACK).await
    }

    /// Operational efficiency report for the admin dashboard.
    pub async fn operational_audit(
        &self,
        funds: &Value,
        students: &Value,
        recent_expenses: &Value,
    ) -> String {
        let prompt = format!(
            r#"Act as a senior financial auditor for an NGO. Analyze the raw data below and produce an Operational Efficiency Report.

Funds:
{}

Students:
{}

Recent expenses:
{}

Output sections (markdown): Executive Summary (2 sentences), Burn Rate Analysis, Cost Per Impact, Recommendations (3 bullets)."#,
            pretty(funds),
            pretty(students),
            pretty(recent_expenses),
        );

        self.generate_text(&prompt, AUDIT_FALLBACK).await
    }

    /// Structured brief from a raw intake request.
    pub async fn project_brief(&self, raw_request: &str) -> ProjectBrief {
        let prompt = format!(
            r#"Convert this project request into a structured brief.

Request:
{}

Return ONLY JSON with keys: title, summary, priority ("high"|"medium"|"low"), estimated_budget {{value, currency, confidence}}, timeline {{duration_days, start_by}}, deliverables (string array), skills_required (string array)."#,
            raw_request
        );

        self.generate_structured(&prompt, fallback_project_brief).await
    }

    /// Team suggestion for a brief against the staff roster.
    pub async fn team_recommendation(
        &self,
        brief: &ProjectBrief,
        roster: &[EmployeeProfile],
    ) -> TeamRecommendation {
        let prompt = format!(
            r#"Suggest a team for this project from the roster.

Project brief:
{}

Roster:
{}

Return ONLY JSON with keys: overall_match_score (0-1), suggested_team (array of {{person_id, role, match_score}}), explainability, risks (string array), suggested_mitigations (string array). Use only person_ids from the roster."#,
            pretty_of(brief),
            pretty_of(&roster),
        );

        self.generate_structured(&prompt, fallback_team_recommendation)
            .await
    }

    /// Skill-gap analysis for a suggested team.
    pub async fn skill_gap_report(
        &self,
        brief: &ProjectBrief,
        team: &[SuggestedMember],
        roster: &[EmployeeProfile],
    ) -> SkillGapReport {
        let prompt = format!(
            r#"Compare required skills against each suggested member's skills and report the gaps.

Required skills:
{}

Suggested team:
{}

Roster:
{}

Return ONLY JSON with key team_gap_report: array of {{person_id, missing (string array), recommended_microcourses (array of {{id, title}})}}."#,
            pretty_of(&brief.skills_required),
            pretty_of(&team),
            pretty_of(&roster),
        );

        self.generate_structured(&prompt, fallback_skill_gap_report)
            .await
    }

    /// Milestone/task plan for an approved brief and team.
    pub async fn task_plan(&self, brief: &ProjectBrief, team: &[SuggestedMember]) -> ProjectPlan {
        let prompt = format!(
            r#"Break this project into milestones and tasks assigned to the team.

Project brief:
{}

Team:
{}

Return ONLY JSON with keys: project_plan_id, milestones (array of {{id, title, due, tasks}}) where each task is {{id, assignee_id, title, est_hours, due_date, status ("completed"|"in-progress"|"pending")}}."#,
            pretty_of(brief),
            pretty_of(&team),
        );

        self.generate_structured(&prompt, fallback_project_plan).await
    }

    /// Health check over an active plan.
    pub async fn monitoring_report(&self, plan: &ProjectPlan) -> MonitoringReport {
        let prompt = format!(
            r#"Evaluate the health of this project plan.

Plan:
{}

Return ONLY JSON with keys: project_health ("green"|"amber"|"red"), alerts (array of {{message, ticket_id}}), task_status (array of {{task_id, status, quality_score, authenticity_score, checks}})."#,
            pretty_of(plan),
        );

        self.generate_structured(&prompt, fallback_monitoring_report)
            .await
    }

    /// Assessment of a trainee submission.
    pub async fn assessment(&self, submission: &str) -> Assessment {
        let prompt = format!(
            r#"Assess this trainee submission.

Submission:
{}

Return ONLY JSON with keys: score (0-100), feedback, demo_snippets (array of {{time, note}}), next_recommendation {{title}}."#,
            submission
        );

        self.generate_structured(&prompt, fallback_assessment).await
    }

    /// End-of-day summary from a trainee's log lines.
    pub async fn daily_summary(&self, person_id: &str, log_lines: &[String]) -> DailySummary {
        let prompt = format!(
            r#"Summarize this trainee's day from the log lines.

Person: {}
Log:
{}

Return ONLY JSON with keys: daily_summary, hours_logged (number), suggested_next_steps (string array)."#,
            person_id,
            log_lines.join("\n"),
        );

        self.generate_structured(&prompt, fallback_daily_summary).await
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

fn pretty_of<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Strip an optional markdown fence and parse the remainder. The model
/// sometimes wraps its JSON in ```json ... ``` despite instructions.
fn parse_structured<T: DeserializeOwned>(text: &str) -> Option<T> {
    let cleaned = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    serde_json::from_str(cleaned).ok()
}
