//! Structured-output tool for the reasoning service
//!
//! The model is forced to answer through a single function call whose
//! arguments follow a fixed schema. Parsing is lenient about the envelope
//! (a missing tool call is not an error) and strict about the arguments.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::audit::Issue;

pub const REPORT_TOOL_NAME: &str = "report_audit_findings";

/// OpenAI-format function declaration for the audit findings
pub fn report_findings_tool() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": REPORT_TOOL_NAME,
            "description": "Report the structured audit findings from analyzing the project documents against JCM PH_AM004 methodology.",
            "parameters": {
                "type": "object",
                "properties": {
                    "summary": {
                        "type": "string",
                        "description": "A 1-2 sentence summary of the overall audit findings."
                    },
                    "issues": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "type": {
                                    "type": "string",
                                    "enum": ["major", "minor"],
                                    "description": "Severity: major affects calculations/eligibility, minor is documentation gaps."
                                },
                                "title": {
                                    "type": "string",
                                    "description": "Short title of the issue (under 80 chars)."
                                },
                                "section": {
                                    "type": "string",
                                    "description": "The section or area where the issue was found (e.g., 'Section F.2 - CH4 Emissions', 'Excel - Sheet 3')."
                                },
                                "description": {
                                    "type": "string",
                                    "description": "Detailed description of what is wrong."
                                },
                                "suggested_fix": {
                                    "type": "string",
                                    "description": "How to resolve the issue."
                                }
                            },
                            "required": ["type", "title", "section", "description", "suggested_fix"],
                            "additionalProperties": false
                        }
                    }
                },
                "required": ["summary", "issues"],
                "additionalProperties": false
            }
        }
    })
}

/// `tool_choice` value forcing the findings tool
pub fn report_findings_choice() -> Value {
    json!({
        "type": "function",
        "function": { "name": REPORT_TOOL_NAME }
    })
}

/// Arguments of a `report_audit_findings` call
#[derive(Debug, Clone, Deserialize)]
pub struct ReportedFindings {
    pub summary: String,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: FunctionCall,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    #[serde(default)]
    name: Option<String>,
    arguments: String,
}

/// Extract the findings from a chat-completion body
///
/// Returns `Err` with a reason when the body has no usable tool call; the
/// caller decides how to degrade.
pub fn parse_reported_findings(body: &str) -> Result<ReportedFindings, String> {
    let completion: ChatCompletion = serde_json::from_str(body)
        .map_err(|e| format!("Failed to parse completion: {}", e))?;

    let call = completion
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.tool_calls)
        .and_then(|calls| calls.into_iter().next())
        .ok_or_else(|| "No tool call in response".to_string())?;

    if let Some(name) = call.function.name.as_deref() {
        if name != REPORT_TOOL_NAME {
            return Err(format!("Unexpected tool call: {}", name));
        }
    }

    serde_json::from_str(&call.function.arguments)
        .map_err(|e| format!("Failed to parse tool arguments: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Severity;

    fn completion_with_arguments(arguments: &str) -> String {
        json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": REPORT_TOOL_NAME, "arguments": arguments }
                    }]
                }
            }]
        })
        .to_string()
    }

    #[test]
    fn test_tool_schema_is_closed() {
        let tool = report_findings_tool();
        let params = &tool["function"]["parameters"];

        assert_eq!(tool["type"], "function");
        assert_eq!(params["additionalProperties"], false);
        assert_eq!(params["required"], json!(["summary", "issues"]));

        let item = &params["properties"]["issues"]["items"];
        assert_eq!(item["additionalProperties"], false);
        assert_eq!(
            item["required"],
            json!(["type", "title", "section", "description", "suggested_fix"])
        );
        assert_eq!(item["properties"]["type"]["enum"], json!(["major", "minor"]));
    }

    #[test]
    fn test_choice_names_tool() {
        assert_eq!(report_findings_choice()["function"]["name"], REPORT_TOOL_NAME);
    }

    #[test]
    fn test_parse_findings() {
        let args = json!({
            "summary": "Two gaps found.",
            "issues": [{
                "type": "major",
                "title": "Incorrect GWP for Methane",
                "section": "Excel - Sheet 2",
                "description": "GWP 21 used",
                "suggested_fix": "Use 28"
            }]
        })
        .to_string();

        let findings = parse_reported_findings(&completion_with_arguments(&args)).unwrap();
        assert_eq!(findings.summary, "Two gaps found.");
        assert_eq!(findings.issues[0].severity, Severity::Major);
        assert_eq!(findings.issues[0].section.as_deref(), Some("Excel - Sheet 2"));
        assert_eq!(findings.issues[0].suggested_fix.as_deref(), Some("Use 28"));
    }

    #[test]
    fn test_missing_tool_call() {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": "I think..." } }]
        })
        .to_string();
        assert!(parse_reported_findings(&body).is_err());

        let body = json!({ "choices": [{ "message": { "tool_calls": null } }] }).to_string();
        assert!(parse_reported_findings(&body).is_err());

        assert!(parse_reported_findings(r#"{"choices": []}"#).is_err());
    }

    #[test]
    fn test_malformed_arguments() {
        assert!(parse_reported_findings(&completion_with_arguments("{not json")).is_err());
        assert!(parse_reported_findings(&completion_with_arguments(r#"{"issues": []}"#)).is_err());
        assert!(parse_reported_findings("<html>").is_err());
    }
}
