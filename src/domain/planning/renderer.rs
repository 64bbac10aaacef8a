//! Markdown rendering of compiled plans.
//!
//! Pure function of the plan document; deterministic for identical input.
//! General plans render milestones at `##`; program plans render pillars at
//! `##` with milestones nested at `###`. Governance subsections appear only
//! when their source lists are non-empty.

use crate::domain::planning::plan::{Milestone, ProjectPlan, ProjectType};

/// Renders a [`ProjectPlan`] as human-readable Markdown.
#[derive(Debug, Default)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, plan: &ProjectPlan) -> String {
        let mut lines: Vec<String> = Vec::new();

        lines.push(format!("# {}", plan.project_name));
        lines.push(format!("**Type:** {}", capitalize(&plan.project_type.to_string())));
        lines.push(format!("**Success Definition:** {}", plan.success_definition));
        if let Some(deadline) = &plan.deadline {
            lines.push(format!("**Deadline:** {}", deadline));
        }
        if let Some(budget) = &plan.budget {
            lines.push(format!("**Budget:** {}", budget));
        }
        if let Some(team_size) = plan.team_size.filter(|n| *n > 0) {
            lines.push(format!("**Team Size:** {}", team_size));
        }
        if let Some(methodology) = &plan.methodology {
            lines.push(format!("**Methodology:** {}", methodology));
        }
        lines.push(String::new());
        lines.push("---".to_string());

        if plan.project_type == ProjectType::Program && !plan.pillars.is_empty() {
            lines.push("## Program Structure".to_string());
            for pillar in &plan.pillars {
                lines.push(format!("\n## Pillar: {}", pillar.name));
                for milestone in &pillar.milestones {
                    render_milestone(&mut lines, milestone, 3);
                }
            }
        } else {
            lines.push("## Project Plan".to_string());
            for milestone in &plan.milestones {
                render_milestone(&mut lines, milestone, 2);
            }
        }

        let gov = &plan.governance;
        lines.push("\n---".to_string());
        lines.push("## Governance & Risk".to_string());

        if !gov.stakeholders.is_empty() {
            lines.push("\n### Stakeholders".to_string());
            for stakeholder in &gov.stakeholders {
                lines.push(format!("- {}", stakeholder));
            }
        }

        if !gov.kpis.is_empty() {
            lines.push("\n### KPIs".to_string());
            for kpi in &gov.kpis {
                let target = kpi
                    .target
                    .as_deref()
                    .map(|t| format!(" (Target: {})", t))
                    .unwrap_or_default();
                lines.push(format!("- **{}**{}", kpi.metric, target));
            }
        }

        if !gov.risks.is_empty() {
            lines.push("\n### Risks".to_string());
            for risk in &gov.risks {
                lines.push(format!("- [{}] {}", risk.severity.to_uppercase(), risk.description));
                if let Some(mitigation) = &risk.mitigation {
                    lines.push(format!("  - _Mitigation: {}_", mitigation));
                }
            }
        }

        if !gov.external_vendors.is_empty() {
            lines.push("\n### External Vendors / Dependencies".to_string());
            for vendor in &gov.external_vendors {
                lines.push(format!("- {}", vendor));
            }
        }

        if let Some(cadence) = &gov.review_cadence {
            lines.push(format!("\n### Review Cadence\n{}", cadence));
        }

        lines.join("\n")
    }
}

fn render_milestone(lines: &mut Vec<String>, milestone: &Milestone, level: usize) {
    let hashes = "#".repeat(level);
    lines.push(format!("\n{} {}", hashes, milestone.name));
    if let Some(deliverable) = &milestone.deliverable {
        lines.push(format!("_Deliverable: {}_", deliverable));
    }
    if let Some(timeline) = &milestone.timeline {
        lines.push(format!("_Timeline: {}_", timeline));
    }
    if let Some(owner) = &milestone.owner {
        lines.push(format!("_Owner: {}_", owner));
    }

    for task in &milestone.tasks {
        let mut parts = vec![format!("**{}**", task.name)];
        if let Some(owner) = &task.owner {
            parts.push(format!("Owner: {}", owner));
        }
        if let Some(duration) = task.duration_days.filter(|d| *d > 0) {
            parts.push(format!("Duration: {}d", duration));
        }
        lines.push(format!("\n- {}", parts.join(" | ")));

        if !task.dependencies.is_empty() {
            lines.push(format!("  - _Dependencies: {}_", task.dependencies.join(", ")));
        }

        for subtask in &task.subtasks {
            let mut st_parts = vec![subtask.name.clone()];
            if let Some(owner) = &subtask.owner {
                st_parts.push(format!("Owner: {}", owner));
            }
            if let Some(timeline) = &subtask.timeline {
                st_parts.push(format!("Timeline: {}", timeline));
            }
            lines.push(format!("  - {}", st_parts.join(" | ")));
            if let Some(deliverable) = &subtask.deliverable {
                lines.push(format!("    - _Deliverable: {}_", deliverable));
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
