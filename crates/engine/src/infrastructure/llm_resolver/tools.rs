//! Tool schemas for command kinds, and tool calls back to invocations.

use imagind_domain::{CapabilitySet, CommandInvocation, CommandSpec, ParamKind};
use serde_json::{json, Map, Value};

use crate::infrastructure::ports::{LlmResponse, ResolverError, ToolDefinition, WorldContext};

/// One tool per permitted command kind. Id parameters list the ids that
/// exist in the context, so the model cannot invent targets it cannot see.
pub fn tool_definitions(capabilities: &CapabilitySet, context: &WorldContext) -> Vec<ToolDefinition> {
    capabilities
        .iter()
        .map(|kind| {
            let spec = kind.spec();
            ToolDefinition {
                name: kind.as_str().to_string(),
                description: spec.description.to_string(),
                parameters: parameter_schema(&spec, context),
            }
        })
        .collect()
}

fn parameter_schema(spec: &CommandSpec, context: &WorldContext) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in spec.params {
        let mut property = json!({
            "type": "string",
            "description": param.description,
        });
        let choices = choices(param.kind, context);
        if !choices.is_empty() {
            let ids: Vec<&str> = choices.iter().map(|(id, _)| id.as_str()).collect();
            let labels: Vec<String> = choices
                .iter()
                .map(|(id, label)| format!("{} = {}", id, label))
                .collect();
            property["enum"] = json!(ids);
            property["description"] =
                json!(format!("{}. One of: {}", param.description, labels.join("; ")));
        }
        properties.insert(param.name.to_string(), property);
        if param.required {
            required.push(param.name);
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// `(id, label)` pairs a parameter of this kind may refer to.
fn choices(kind: ParamKind, context: &WorldContext) -> Vec<(String, String)> {
    match kind {
        ParamKind::Actor => context
            .actors
            .iter()
            .map(|a| (a.id.to_string(), a.label.clone()))
            .collect(),
        ParamKind::Item => context
            .items
            .iter()
            .chain(&context.inventory)
            .map(|i| (i.id.to_string(), i.label.clone()))
            .collect(),
        ParamKind::Exit => context
            .exits
            .iter()
            .map(|e| (e.id.to_string(), format!("{} ({})", e.label, e.direction)))
            .collect(),
        ParamKind::Location => vec![(
            context.location.id.to_string(),
            context.location.label.clone(),
        )],
        ParamKind::CreatureTemplate => context
            .templates
            .iter()
            .map(|t| (t.id.to_string(), t.name.clone()))
            .collect(),
        ParamKind::Text => Vec::new(),
    }
}

/// Tool calls as invocations, in the order the model made them.
pub fn to_invocations(response: &LlmResponse) -> Result<Vec<CommandInvocation>, ResolverError> {
    response
        .tool_calls
        .iter()
        .map(|call| {
            let arguments = match &call.arguments {
                Value::Null => Value::Object(Map::new()),
                Value::Object(_) => call.arguments.clone(),
                other => {
                    return Err(ResolverError::Malformed(format!(
                        "arguments for '{}' are not an object: {}",
                        call.name, other
                    )))
                }
            };
            Ok(CommandInvocation::new(call.name.clone(), arguments))
        })
        .collect()
}
