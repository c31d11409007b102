//! Practitioner agents and team coordination.
//!
//! A `PractitionerAgent` binds a persona to a transport; the
//! `TeamCoordinator` fans identical calls out to every agent concurrently
//! and merges the responses. Code review tolerates individual call
//! failures and records them beside the successes; feature planning
//! reports the first failure as a planning error.

use std::future::Future;
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use crate::consensus::{self, Consensus, build_consensus};
use crate::error::{Result, RoundtableError};
use crate::persona::Practitioner;
use crate::rpc::ToolTransport;
use crate::tools::{self, AnalyzeCodeArgs, CoordinateTeamArgs, GenerateCodeArgs, SelectStyleArgs};

/// A persona bound to a transport.
#[derive(Clone)]
pub struct PractitionerAgent {
    /// The persona parameterizing this agent's calls.
    pub style: Practitioner,
    transport: Arc<dyn ToolTransport>,
}

impl std::fmt::Debug for PractitionerAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PractitionerAgent")
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

impl PractitionerAgent {
    /// Create an agent for a persona.
    pub fn new(style: Practitioner, transport: Arc<dyn ToolTransport>) -> Self {
        Self { style, transport }
    }

    /// Analyze code from this practitioner's perspective.
    pub async fn analyze_code(&self, code: &str, language: &str) -> Result<Value> {
        debug!("{} analyzing {} code", self.style.name, language);
        tools::analyze_code_quality(
            self.transport.as_ref(),
            &AnalyzeCodeArgs {
                code: code.to_string(),
                language: language.to_string(),
                focus_areas: self.style.focus_areas.clone(),
            },
        )
        .await
    }

    /// Generate code following this practitioner's style.
    pub async fn generate_code(
        &self,
        code_type: &str,
        requirements: &str,
        language: &str,
    ) -> Result<Value> {
        debug!("{} generating {}", self.style.name, code_type);
        tools::generate_code_with_style(
            self.transport.as_ref(),
            &GenerateCodeArgs {
                practitioner: self.style.style_id.clone(),
                code_type: code_type.to_string(),
                requirements: requirements.to_string(),
                language: language.to_string(),
            },
        )
        .await
    }
}

/// Issue the same call once per agent and await all of them concurrently.
///
/// Returns one `(name, outcome)` pair per agent, in roster order.
pub async fn fan_out<F, Fut>(agents: &[PractitionerAgent], call: F) -> Vec<(String, Result<Value>)>
where
    F: Fn(PractitionerAgent) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let names: Vec<String> = agents.iter().map(|a| a.style.name.clone()).collect();
    let futures: Vec<Fut> = agents.iter().cloned().map(call).collect();
    let results = join_all(futures).await;
    names.into_iter().zip(results).collect()
}

/// Merged outcome of a multi-practitioner code review.
#[derive(Debug, Serialize)]
pub struct CodeReview {
    /// Successful per-practitioner result mappings, in roster order.
    pub practitioners: Vec<(String, Value)>,
    /// Merged consensus over the successful results.
    pub consensus: Consensus,
    /// Deduplicated action items across the successful results.
    pub action_items: Vec<String>,
    /// One "name: message" entry per failed call.
    pub errors: Vec<String>,
}

impl CodeReview {
    /// True when every practitioner call failed.
    pub fn all_failed(&self) -> bool {
        self.practitioners.is_empty() && !self.errors.is_empty()
    }
}

/// Outcome of feature planning.
#[derive(Debug, Serialize)]
pub struct FeaturePlan {
    /// Style recommendation from the server, when planning succeeded.
    pub recommended_style: Option<Value>,
    /// Workflow plan from the server, when planning succeeded.
    pub workflow_plan: Option<Value>,
    /// Practitioners assigned to the plan.
    pub assigned_practitioners: Vec<String>,
    /// Planning failure message, when any call failed.
    pub error: Option<String>,
}

/// Coordinates the full practitioner roster against one transport.
pub struct TeamCoordinator {
    agents: Vec<PractitionerAgent>,
    transport: Arc<dyn ToolTransport>,
}

impl TeamCoordinator {
    /// Create a coordinator over the builtin roster.
    pub fn new(transport: Arc<dyn ToolTransport>) -> Self {
        let agents = Practitioner::builtins()
            .into_iter()
            .map(|style| PractitionerAgent::new(style, Arc::clone(&transport)))
            .collect();
        Self { agents, transport }
    }

    /// Create a coordinator over an explicit agent list.
    pub fn with_agents(agents: Vec<PractitionerAgent>, transport: Arc<dyn ToolTransport>) -> Self {
        Self { agents, transport }
    }

    /// The agents in roster order.
    pub fn agents(&self) -> &[PractitionerAgent] {
        &self.agents
    }

    /// Look up an agent by display name.
    pub fn agent_named(&self, name: &str) -> Result<&PractitionerAgent> {
        self.agents
            .iter()
            .find(|a| a.style.name == name)
            .ok_or_else(|| RoundtableError::PractitionerNotFound(name.to_string()))
    }

    /// Run one analysis call per practitioner concurrently and merge the
    /// results, tolerating individual failures.
    pub async fn coordinate_code_review(&self, code: &str, language: &str) -> CodeReview {
        let code = code.to_string();
        let language = language.to_string();

        let outcomes = fan_out(&self.agents, |agent| {
            let code = code.clone();
            let language = language.clone();
            async move { agent.analyze_code(&code, &language).await }
        })
        .await;

        let mut practitioners: Vec<(String, Value)> = Vec::new();
        let mut errors: Vec<String> = Vec::new();
        for (name, outcome) in outcomes {
            match outcome {
                Ok(result) => practitioners.push((name, result)),
                Err(e) => {
                    warn!("Analysis by {} failed: {}", name, e);
                    errors.push(format!("{}: {}", name, e));
                }
            }
        }

        let values: Vec<Value> = practitioners.iter().map(|(_, v)| v.clone()).collect();
        CodeReview {
            consensus: build_consensus(&values),
            action_items: consensus::action_items(&values),
            practitioners,
            errors,
        }
    }

    /// Select a lead style for the feature, then plan the team workflow.
    /// The first failed call turns the whole plan into an error report.
    pub async fn plan_feature_development(&self, description: &str, team_size: usize) -> FeaturePlan {
        match self.try_plan(description, team_size).await {
            Ok(plan) => plan,
            Err(e) => {
                warn!("Feature planning failed: {}", e);
                FeaturePlan {
                    recommended_style: None,
                    workflow_plan: None,
                    assigned_practitioners: Vec::new(),
                    error: Some(format!("Planning failed: {}", e)),
                }
            }
        }
    }

    /// Plan a named team workflow for the given members.
    pub async fn coordinate_workflow(
        &self,
        workflow: &str,
        team_members: Vec<String>,
        priority: &str,
    ) -> Result<Value> {
        tools::coordinate_team_workflow(
            self.transport.as_ref(),
            &CoordinateTeamArgs {
                workflow: workflow.to_string(),
                team_members,
                priority: priority.to_string(),
            },
        )
        .await
    }

    async fn try_plan(&self, description: &str, team_size: usize) -> Result<FeaturePlan> {
        let style = tools::select_practitioner_style(
            self.transport.as_ref(),
            &SelectStyleArgs {
                task_type: "feature".to_string(),
                context: description.to_string(),
                team_size: team_size as u32,
            },
        )
        .await?;

        let members: Vec<String> = self
            .agents
            .iter()
            .take(team_size)
            .map(|a| a.style.name.clone())
            .collect();

        let workflow = self
            .coordinate_workflow("feature-development", members.clone(), "medium")
            .await?;

        Ok(FeaturePlan {
            recommended_style: Some(style),
            workflow_plan: Some(workflow),
            assigned_practitioners: members,
            error: None,
        })
    }
}
