//! Typed call surface for the server's tool set.
//!
//! The server exposes four named tools, each taking a camelCase argument
//! mapping and returning an untyped result mapping. The argument structs
//! here pin the wire field names; results stay as `serde_json::Value`.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::rpc::ToolTransport;

/// Tool: choose the best practitioner approach for a task.
pub const SELECT_PRACTITIONER_STYLE: &str = "select_practitioner_style";
/// Tool: generate code following a practitioner's principles.
pub const GENERATE_CODE_WITH_STYLE: &str = "generate_code_with_style";
/// Tool: plan a team workflow.
pub const COORDINATE_TEAM_WORKFLOW: &str = "coordinate_team_workflow";
/// Tool: analyze code from chosen focus areas.
pub const ANALYZE_CODE_QUALITY: &str = "analyze_code_quality";

/// Arguments for select_practitioner_style.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectStyleArgs {
    pub task_type: String,
    pub context: String,
    pub team_size: u32,
}

/// Arguments for generate_code_with_style.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCodeArgs {
    pub practitioner: String,
    pub code_type: String,
    pub requirements: String,
    pub language: String,
}

/// Arguments for coordinate_team_workflow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoordinateTeamArgs {
    pub workflow: String,
    pub team_members: Vec<String>,
    pub priority: String,
}

/// Arguments for analyze_code_quality.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeCodeArgs {
    pub code: String,
    pub language: String,
    pub focus_areas: Vec<String>,
}

/// Call select_practitioner_style.
pub async fn select_practitioner_style(
    transport: &dyn ToolTransport,
    args: &SelectStyleArgs,
) -> Result<Value> {
    transport
        .call_tool(SELECT_PRACTITIONER_STYLE, serde_json::to_value(args)?)
        .await
}

/// Call generate_code_with_style.
pub async fn generate_code_with_style(
    transport: &dyn ToolTransport,
    args: &GenerateCodeArgs,
) -> Result<Value> {
    transport
        .call_tool(GENERATE_CODE_WITH_STYLE, serde_json::to_value(args)?)
        .await
}

/// Call coordinate_team_workflow.
pub async fn coordinate_team_workflow(
    transport: &dyn ToolTransport,
    args: &CoordinateTeamArgs,
) -> Result<Value> {
    transport
        .call_tool(COORDINATE_TEAM_WORKFLOW, serde_json::to_value(args)?)
        .await
}

/// Call analyze_code_quality.
pub async fn analyze_code_quality(
    transport: &dyn ToolTransport,
    args: &AnalyzeCodeArgs,
) -> Result<Value> {
    transport
        .call_tool(ANALYZE_CODE_QUALITY, serde_json::to_value(args)?)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_style_args_wire_names() {
        let args = SelectStyleArgs {
            task_type: "feature".to_string(),
            context: "Add OAuth2".to_string(),
            team_size: 3,
        };
        let value = serde_json::to_value(&args).unwrap();
        assert_eq!(value["taskType"], "feature");
        assert_eq!(value["teamSize"], 3);
        assert!(value.get("task_type").is_none());
    }

    #[test]
    fn test_generate_code_args_wire_names() {
        let args = GenerateCodeArgs {
            practitioner: "kent-beck".to_string(),
            code_type: "UserService".to_string(),
            requirements: "Handle registration".to_string(),
            language: "typescript".to_string(),
        };
        let value = serde_json::to_value(&args).unwrap();
        assert_eq!(value["practitioner"], "kent-beck");
        assert_eq!(value["codeType"], "UserService");
        assert_eq!(value["requirements"], "Handle registration");
    }

    #[test]
    fn test_coordinate_team_args_wire_names() {
        let args = CoordinateTeamArgs {
            workflow: "feature-development".to_string(),
            team_members: vec!["Uncle Bob".to_string(), "Kent Beck".to_string()],
            priority: "medium".to_string(),
        };
        let value = serde_json::to_value(&args).unwrap();
        assert_eq!(value["teamMembers"][1], "Kent Beck");
        assert_eq!(value["priority"], "medium");
    }

    #[test]
    fn test_analyze_code_args_wire_names() {
        let args = AnalyzeCodeArgs {
            code: "fn main() {}".to_string(),
            language: "rust".to_string(),
            focus_areas: vec!["testing".to_string()],
        };
        let value = serde_json::to_value(&args).unwrap();
        assert_eq!(value["focusAreas"][0], "testing");
        assert_eq!(value["language"], "rust");
    }

    #[test]
    fn test_tool_name_constants() {
        assert_eq!(SELECT_PRACTITIONER_STYLE, "select_practitioner_style");
        assert_eq!(GENERATE_CODE_WITH_STYLE, "generate_code_with_style");
        assert_eq!(COORDINATE_TEAM_WORKFLOW, "coordinate_team_workflow");
        assert_eq!(ANALYZE_CODE_QUALITY, "analyze_code_quality");
    }
}
