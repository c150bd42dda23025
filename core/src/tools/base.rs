//! Base tool traits and structures

use crate::error::{Result, ToolError};
use crate::llm::{FunctionDefinition, ToolDefinition};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Trait for all tools
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the name of the tool
    fn name(&self) -> &str;

    /// Get the description of the tool
    fn description(&self) -> &str;

    /// Get the ordered parameter list of the tool
    fn parameters(&self) -> Vec<ToolParameter>;

    /// Execute the tool with the given arguments and return human-readable text
    async fn execute(&self, arguments: &ToolArguments) -> Result<String>;

    /// Render the tool as a function-calling declaration
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: self.name().to_string(),
                description: self.description().to_string(),
                parameters: parameters_schema(&self.parameters()),
            },
        }
    }
}

/// Primitive type tag of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Integer,
    Boolean,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Integer => "integer",
            ParameterType::Boolean => "boolean",
        }
    }
}

/// Declarative description of one tool parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub param_type: ParameterType,
    pub description: String,
    pub required: bool,
    /// Allowed values, if the parameter is an enumeration
    pub enum_values: Option<Vec<String>>,
}

impl ToolParameter {
    /// A required parameter
    pub fn required<S: Into<String>>(name: S, param_type: ParameterType, description: S) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: true,
            enum_values: None,
        }
    }

    /// An optional parameter
    pub fn optional<S: Into<String>>(name: S, param_type: ParameterType, description: S) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type, description)
        }
    }

    /// Restrict the parameter to a fixed set of values
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

/// Render a parameter list as a JSON schema object
pub fn parameters_schema(parameters: &[ToolParameter]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in parameters {
        let mut property = json!({
            "type": param.param_type.as_str(),
            "description": param.description,
        });
        if let Some(values) = &param.enum_values {
            property["enum"] = json!(values);
        }
        properties.insert(param.name.clone(), property);

        if param.required {
            required.push(param.name.clone());
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Named arguments passed to a tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolArguments(Map<String, Value>);

impl ToolArguments {
    /// Get a required argument
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .0
            .get(key)
            .filter(|v| !v.is_null())
            .ok_or_else(|| ToolError::InvalidParameters {
                message: format!("Missing parameter: {}", key),
            })?;

        serde_json::from_value(value.clone()).map_err(|_| {
            ToolError::InvalidParameters {
                message: format!("Invalid parameter type for: {}", key),
            }
            .into()
        })
    }

    /// Get an optional argument; absent and null both read as `None`
    pub fn get_optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.get(key).map(Some),
        }
    }

    pub fn insert<S: Into<String>>(&mut self, key: S, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serialize back to the compact JSON string models expect
    pub fn to_json_string(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

impl From<Map<String, Value>> for ToolArguments {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A call to a tool requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier linking the call to its result
    pub id: String,

    /// Name of the tool to call
    pub name: String,

    /// Arguments to pass to the tool
    pub arguments: ToolArguments,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: ToolArguments) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Result of a tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool call this is a result for
    pub tool_call_id: String,

    /// Name of the tool that was called
    pub name: String,

    /// Whether the execution was successful
    pub success: bool,

    /// Result content fed back to the model
    pub content: String,

    /// Execution duration in milliseconds
    pub duration_ms: Option<u64>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success<S: Into<String>>(tool_call_id: S, name: S, content: S) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            name: name.into(),
            success: true,
            content: content.into(),
            duration_ms: None,
        }
    }

    /// Create an error result
    pub fn error<S: Into<String>>(tool_call_id: S, name: S, error: S) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            name: name.into(),
            success: false,
            content: error.into(),
            duration_ms: None,
        }
    }

    /// Set execution duration
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arguments(value: Value) -> ToolArguments {
        match value {
            Value::Object(map) => ToolArguments::from(map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_schema_shape() {
        let schema = parameters_schema(&[
            ToolParameter::required("date", ParameterType::String, "Date (YYYY-MM-DD)"),
            ToolParameter::optional("kind", ParameterType::String, "Kind")
                .with_enum(["fixed", "daily"]),
        ]);

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["date"]["type"], "string");
        assert!(schema["properties"]["date"].get("enum").is_none());
        assert_eq!(schema["properties"]["kind"]["enum"], json!(["fixed", "daily"]));
        assert_eq!(schema["required"], json!(["date"]));
    }

    #[test]
    fn test_empty_parameter_list_schema() {
        let schema = parameters_schema(&[]);
        assert_eq!(schema["properties"], json!({}));
        assert_eq!(schema["required"], json!([]));
    }

    #[test]
    fn test_argument_accessors() {
        let args = arguments(json!({"amount": 12000, "note": null, "name": "rent"}));

        assert_eq!(args.get::<f64>("amount").unwrap(), 12000.0);
        assert_eq!(args.get::<String>("name").unwrap(), "rent");
        assert_eq!(args.get_optional::<String>("note").unwrap(), None);
        assert_eq!(args.get_optional::<String>("absent").unwrap(), None);

        let missing = args.get::<String>("date").unwrap_err();
        assert!(missing.to_string().contains("Missing parameter: date"));

        let mistyped = args.get::<f64>("name").unwrap_err();
        assert!(mistyped.to_string().contains("Invalid parameter type for: name"));
    }
}
