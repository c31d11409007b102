//! Terminal rendering for merged results.
//!
//! Renders reviews, plans, and workflow outcomes as colored text blocks.
//! Dynamic content stays uncolored so output remains grep-friendly.

use colored::*;
use serde_json::Value;

use crate::team::{CodeReview, FeaturePlan};
use crate::workflow::WorkflowResult;

/// Render a merged code review.
pub fn render_review(review: &CodeReview) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", "Code Review".cyan().bold()));

    if review.all_failed() {
        out.push_str(&format!("{}\n", "All analyses failed".red()));
        for error in &review.errors {
            out.push_str(&format!("  - {}\n", error));
        }
        return out;
    }

    out.push_str(&format!(
        "  {} {:.1}\n",
        "Average score:".green(),
        review.consensus.average_score
    ));
    out.push_str(&format!(
        "  {} {} responded\n",
        "Practitioners:".green(),
        review.practitioners.len()
    ));

    if !review.consensus.top_recommendations.is_empty() {
        out.push_str(&format!("  {}\n", "Top recommendations:".green()));
        for rec in &review.consensus.top_recommendations {
            out.push_str(&format!("    - {}\n", rec));
        }
    }

    if !review.action_items.is_empty() {
        out.push_str(&format!("  {}\n", "Action items:".green()));
        for item in &review.action_items {
            out.push_str(&format!("    - {}\n", item));
        }
    }

    if !review.errors.is_empty() {
        out.push_str(&format!("  {}\n", "Errors:".red()));
        for error in &review.errors {
            out.push_str(&format!("    - {}\n", error));
        }
    }

    out
}

/// Render a feature plan.
pub fn render_plan(plan: &FeaturePlan) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", "Feature Plan".cyan().bold()));

    if let Some(error) = &plan.error {
        out.push_str(&format!("{} {}\n", "Failed:".red(), error));
        return out;
    }

    if let Some(lead) = plan
        .recommended_style
        .as_ref()
        .and_then(recommended_lead)
    {
        out.push_str(&format!("  {} {}\n", "Recommended lead:".green(), lead));
    }

    if !plan.assigned_practitioners.is_empty() {
        out.push_str(&format!(
            "  {} {}\n",
            "Assigned:".green(),
            plan.assigned_practitioners.join(", ")
        ));
    }

    if let Some(phases) = plan
        .workflow_plan
        .as_ref()
        .and_then(|w| w.get("coordination"))
        .and_then(|c| c.get("phases"))
        .and_then(Value::as_array)
    {
        out.push_str(&format!("  {}\n", "Phases:".green()));
        for phase in phases {
            if let Some(name) = phase.as_str() {
                out.push_str(&format!("    - {}\n", name));
            }
        }
    }

    out
}

/// Render a workflow outcome.
pub fn render_workflow(result: &WorkflowResult) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{} {}\n",
        "Workflow:".cyan().bold(),
        result.kind.as_str()
    ));

    if !result.participants.is_empty() {
        out.push_str(&format!(
            "  {} {}\n",
            "Participants:".green(),
            result.participants.join(", ")
        ));
    }

    let consensus =
        serde_json::to_string_pretty(&result.consensus).unwrap_or_else(|_| "{}".to_string());
    out.push_str(&format!("  {}\n", "Consensus:".green()));
    for line in consensus.lines() {
        out.push_str(&format!("    {}\n", line));
    }

    out.push_str(&format!("  {}\n", "Next steps:".green()));
    for step in &result.next_steps {
        out.push_str(&format!("    - {}\n", step));
    }

    out
}

/// Render the remote tool catalog.
pub fn render_tools(tools: &Value) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Remote tools".cyan().bold()));

    if let Some(entries) = tools.as_array() {
        for entry in entries {
            let name = entry.get("name").and_then(Value::as_str).unwrap_or("<unnamed>");
            let description = entry
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("");
            out.push_str(&format!("  {} {}\n", name.green(), description));
        }
    } else {
        out.push_str(&format!("{}\n", tools));
    }

    out
}

/// Dig the recommended lead out of a style recommendation mapping.
fn recommended_lead(style: &Value) -> Option<String> {
    let recommendation = style.get("recommendation")?;
    recommendation
        .get("style")
        .or_else(|| recommendation.get("practitioner"))
        .and_then(Value::as_str)
        .map(String::from)
}
