//! Wire types and conversions for the Generative Language API
//!
//! Converts domain conversation turns into `generateContent` requests and
//! candidates back into a domain `LlmResponse`.

use neighborly_application::{GatewayError, GenerationRequest};
use neighborly_domain::{ContentBlock, LlmResponse, Message, StopReason, TokenUsage, TurnRole};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Schema keywords the API accepts; everything else is dropped.
const SCHEMA_KEYS: [&str; 9] = [
    "type",
    "format",
    "description",
    "nullable",
    "enum",
    "properties",
    "required",
    "items",
    "propertyOrdering",
];

// ─── Wire types ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDeclarations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
    /// Set on reasoning summaries, which are not part of the answer.
    #[serde(default, skip_serializing)]
    pub thought: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Only newer API versions assign ids; they are never sent back.
    #[serde(default, skip_serializing)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub args: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDeclarations {
    pub function_declarations: Vec<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u64,
    #[serde(default)]
    pub candidates_token_count: u64,
    #[serde(default)]
    pub thoughts_token_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EmbedContentRequest {
    pub model: String,
    pub content: Content,
}

#[derive(Debug, Deserialize)]
pub struct EmbedContentResponse {
    pub embedding: ContentEmbedding,
}

#[derive(Debug, Deserialize)]
pub struct ContentEmbedding {
    #[serde(default)]
    pub values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl Content {
    pub fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.into()),
                ..Default::default()
            }],
        }
    }
}

// ─── Domain → API ────────────────────────────────────────────────

fn wire_role(role: TurnRole) -> &'static str {
    match role {
        TurnRole::Model => "model",
        // function responses travel in user turns
        TurnRole::User | TurnRole::Tool => "user",
    }
}

/// Convert one content block to a part.
pub fn convert_block(block: &ContentBlock) -> Part {
    match block {
        ContentBlock::Text(text) => Part {
            text: Some(text.clone()),
            ..Default::default()
        },
        ContentBlock::ToolUse { name, input, .. } => Part {
            function_call: Some(FunctionCall {
                id: None,
                name: name.clone(),
                args: input.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            }),
            ..Default::default()
        },
        ContentBlock::ToolResult { name, output, .. } => {
            let response = match output {
                Value::Object(_) => output.clone(),
                other => json!({ "result": other }),
            };
            Part {
                function_response: Some(FunctionResponse {
                    name: name.clone(),
                    response,
                }),
                ..Default::default()
            }
        }
    }
}

/// Convert conversation turns; turns without content are skipped.
pub fn convert_messages(messages: &[Message]) -> Vec<Content> {
    messages
        .iter()
        .filter(|m| !m.content.is_empty())
        .map(|m| Content {
            role: Some(wire_role(m.role).to_string()),
            parts: m.content.iter().map(convert_block).collect(),
        })
        .collect()
}

/// Rewrite a JSON schema into the API's schema dialect: upper-case type
/// names and only the keywords it understands.
pub fn convert_schema(schema: &Value) -> Value {
    let Value::Object(map) = schema else {
        return schema.clone();
    };

    let converted = map
        .iter()
        .filter(|(key, _)| SCHEMA_KEYS.contains(&key.as_str()))
        .map(|(key, value)| {
            let value = match (key.as_str(), value) {
                ("type", Value::String(t)) => Value::String(t.to_uppercase()),
                ("items", items) => convert_schema(items),
                ("properties", Value::Object(props)) => Value::Object(
                    props
                        .iter()
                        .map(|(name, prop)| (name.clone(), convert_schema(prop)))
                        .collect(),
                ),
                (_, other) => other.clone(),
            };
            (key.clone(), value)
        })
        .collect();
    Value::Object(converted)
}

/// Function declaration with its `parameters` schema converted.
pub fn convert_declaration(declaration: &Value) -> Value {
    let mut declaration = declaration.clone();
    if let Some(parameters) = declaration.get_mut("parameters") {
        *parameters = convert_schema(parameters);
    }
    declaration
}

pub fn build_request(request: &GenerationRequest) -> GenerateContentRequest {
    let tools = if request.tools.is_empty() {
        Vec::new()
    } else {
        vec![ToolDeclarations {
            function_declarations: request.tools.iter().map(convert_declaration).collect(),
        }]
    };

    GenerateContentRequest {
        contents: convert_messages(&request.messages),
        system_instruction: request.system.as_deref().map(|s| Content::text(None, s)),
        tools,
        generation_config: request.response_schema.as_ref().map(|schema| GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: convert_schema(schema),
        }),
    }
}

// ─── API → Domain ────────────────────────────────────────────────

pub fn convert_finish_reason(reason: Option<&str>) -> StopReason {
    match reason {
        None | Some("STOP") => StopReason::EndTurn,
        Some("MAX_TOKENS") => StopReason::MaxTokens,
        Some("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII") => StopReason::Safety,
        Some(other) => StopReason::Other(other.to_string()),
    }
}

/// Thinking tokens are billed as output. `totalTokenCount` is not used: it
/// may include counts (e.g. tool-use prompts) outside input and output.
pub fn convert_usage(usage: &UsageMetadata) -> TokenUsage {
    TokenUsage::new(
        usage.prompt_token_count,
        usage.candidates_token_count + usage.thoughts_token_count,
    )
}

/// Convert the first candidate. Function calls without an id get a
/// positional one (`call-0`, `call-1`, ...).
pub fn convert_response(
    response: GenerateContentResponse,
    requested_model: &str,
) -> Result<LlmResponse, GatewayError> {
    let usage = response.usage_metadata.as_ref().map(convert_usage);
    let model = Some(response.model_version.unwrap_or_else(|| requested_model.to_string()));

    let Some(candidate) = response.candidates.into_iter().next() else {
        return match response.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => {
                tracing::warn!(reason = %reason, "Prompt blocked by the backend");
                Ok(LlmResponse {
                    content: Vec::new(),
                    stop_reason: Some(StopReason::Safety),
                    model,
                    usage,
                })
            }
            None => Err(GatewayError::InvalidResponse("Response has no candidates".to_string())),
        };
    };

    let mut content = Vec::new();
    let mut call_index = 0;
    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if let Some(call) = part.function_call {
            let id = call.id.unwrap_or_else(|| format!("call-{}", call_index));
            call_index += 1;
            content.push(ContentBlock::ToolUse {
                id,
                name: call.name,
                input: call.args.into_iter().collect(),
            });
        } else if let Some(text) = part.text.filter(|t| !part.thought && !t.is_empty()) {
            content.push(ContentBlock::Text(text));
        }
    }

    let stop_reason = if call_index > 0 {
        StopReason::ToolUse
    } else {
        convert_finish_reason(candidate.finish_reason.as_deref())
    };

    Ok(LlmResponse {
        content,
        stop_reason: Some(stop_reason),
        model,
        usage,
    })
}

/// Map an unsuccessful HTTP status to a gateway error.
pub fn convert_status(status: u16, body: &str) -> GatewayError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    match status {
        401 | 403 => GatewayError::AuthenticationFailed(message),
        404 => GatewayError::ModelNotAvailable(message),
        408 | 504 => GatewayError::Timeout,
        429 => GatewayError::RequestFailed(format!("rate limited: {}", message)),
        _ => GatewayError::RequestFailed(format!("HTTP {}: {}", status, message)),
    }
}

pub fn convert_transport_error(err: &reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_connect() {
        GatewayError::ConnectionError(err.to_string())
    } else if err.is_decode() {
        GatewayError::InvalidResponse(err.to_string())
    } else {
        GatewayError::RequestFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neighborly_domain::Model;

    fn parse(body: Value) -> GenerateContentResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_tool_turns_round_trip_roles() {
        let call = ContentBlock::ToolUse {
            id: "call-0".to_string(),
            name: "lookup_business".to_string(),
            input: [("businessId".to_string(), json!("abc123"))].into_iter().collect(),
        };
        let messages = vec![
            Message::user("Tell me about abc123"),
            Message {
                role: TurnRole::Model,
                content: vec![call],
            },
            Message::tool_results(vec![ContentBlock::ToolResult {
                id: "call-0".to_string(),
                name: "lookup_business".to_string(),
                output: json!({"isFound": false}),
            }]),
        ];

        let contents = serde_json::to_value(convert_messages(&messages)).unwrap();
        assert_eq!(contents[0], json!({"role": "user", "parts": [{"text": "Tell me about abc123"}]}));
        assert_eq!(
            contents[1],
            json!({"role": "model", "parts": [{"functionCall": {"name": "lookup_business", "args": {"businessId": "abc123"}}}]})
        );
        assert_eq!(
            contents[2],
            json!({"role": "user", "parts": [{"functionResponse": {"name": "lookup_business", "response": {"isFound": false}}}]})
        );
    }

    #[test]
    fn test_non_object_tool_output_is_wrapped() {
        let part = convert_block(&ContentBlock::ToolResult {
            id: "call-0".to_string(),
            name: "web_search".to_string(),
            output: json!([1, 2]),
        });
        assert_eq!(part.function_response.unwrap().response, json!({"result": [1, 2]}));
    }

    #[test]
    fn test_convert_schema() {
        let schema = json!({
            "type": "object",
            "additionalProperties": false,
            "properties": {
                "tags": {"type": "array", "items": {"type": "string", "$comment": "x"}},
                "reply": {"type": "string", "description": "Answer"}
            },
            "required": ["reply"]
        });
        assert_eq!(
            convert_schema(&schema),
            json!({
                "type": "OBJECT",
                "properties": {
                    "tags": {"type": "ARRAY", "items": {"type": "STRING"}},
                    "reply": {"type": "STRING", "description": "Answer"}
                },
                "required": ["reply"]
            })
        );
    }

    #[test]
    fn test_build_request() {
        let request = GenerationRequest::new(Model::Gemini20Flash, vec![Message::user("hi")])
            .with_system("Be brief.")
            .with_response_schema(json!({"type": "object", "properties": {}}));
        let body = serde_json::to_value(build_request(&request)).unwrap();

        assert_eq!(body["systemInstruction"], json!({"parts": [{"text": "Be brief."}]}));
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!(body.get("tools").is_none());

        let with_tools = GenerationRequest::new(Model::Gemini20Flash, vec![Message::user("hi")])
            .with_tools(vec![json!({
                "name": "web_search",
                "description": "Search",
                "parameters": {"type": "object", "properties": {"query": {"type": "string"}}, "required": ["query"]}
            })]);
        let body = serde_json::to_value(build_request(&with_tools)).unwrap();
        let declaration = &body["tools"][0]["functionDeclarations"][0];
        assert_eq!(declaration["name"], "web_search");
        assert_eq!(declaration["parameters"]["properties"]["query"]["type"], "STRING");
        assert!(body.get("generationConfig").is_none());
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn test_text_response_with_usage() {
        let response = parse(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "thinking...", "thought": true}, {"text": "{\"reply\":\"Hi\"}"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 120, "candidatesTokenCount": 30, "thoughtsTokenCount": 10, "totalTokenCount": 160},
            "modelVersion": "gemini-2.0-flash-001"
        }));
        let converted = convert_response(response, "gemini-2.0-flash").unwrap();

        assert_eq!(converted.text_content(), "{\"reply\":\"Hi\"}");
        assert_eq!(converted.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(converted.model.as_deref(), Some("gemini-2.0-flash-001"));
        let usage = converted.usage.unwrap();
        assert_eq!((usage.input_tokens, usage.output_tokens, usage.total_tokens), (120, 40, 160));
    }

    #[test]
    fn test_total_is_input_plus_output() {
        let usage: UsageMetadata = serde_json::from_value(json!({
            "promptTokenCount": 100,
            "candidatesTokenCount": 20,
            "toolUsePromptTokenCount": 50,
            "totalTokenCount": 170
        }))
        .unwrap();
        let single = convert_usage(&usage);
        assert_eq!(single, TokenUsage::new(100, 20));
        assert_eq!(single.total_tokens, 120);
        assert_eq!((single + single).total_tokens, 2 * single.total_tokens);
    }

    #[test]
    fn test_function_calls_get_positional_ids() {
        let response = parse(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [
                    {"functionCall": {"name": "web_search", "args": {"query": "market"}}},
                    {"functionCall": {"name": "search_image", "args": {"query": "market"}}}
                ]},
                "finishReason": "STOP"
            }]
        }));
        let converted = convert_response(response, "gemini-2.0-flash").unwrap();

        assert_eq!(converted.stop_reason, Some(StopReason::ToolUse));
        let calls = converted.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].native_id.as_deref(), Some("call-0"));
        assert_eq!(calls[1].native_id.as_deref(), Some("call-1"));
        assert_eq!(calls[1].get_string("query"), Some("market"));
        assert!(converted.usage.is_none());
    }

    #[test]
    fn test_blocked_prompt_and_empty_response() {
        let blocked = parse(json!({"promptFeedback": {"blockReason": "SAFETY"}}));
        let converted = convert_response(blocked, "m").unwrap();
        assert!(converted.content.is_empty());
        assert_eq!(converted.stop_reason, Some(StopReason::Safety));

        let empty = parse(json!({}));
        assert!(matches!(convert_response(empty, "m"), Err(GatewayError::InvalidResponse(_))));
    }

    #[test]
    fn test_finish_reasons() {
        assert_eq!(convert_finish_reason(Some("MAX_TOKENS")), StopReason::MaxTokens);
        assert_eq!(convert_finish_reason(Some("SAFETY")), StopReason::Safety);
        assert_eq!(convert_finish_reason(Some("MALFORMED_FUNCTION_CALL")), StopReason::Other("MALFORMED_FUNCTION_CALL".to_string()));
    }

    #[test]
    fn test_convert_status() {
        let body = r#"{"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}}"#;
        assert!(matches!(convert_status(403, body), GatewayError::AuthenticationFailed(m) if m == "API key not valid"));
        assert!(matches!(convert_status(404, "not found"), GatewayError::ModelNotAvailable(_)));
        assert!(matches!(convert_status(504, ""), GatewayError::Timeout));
        assert!(matches!(convert_status(500, "oops"), GatewayError::RequestFailed(m) if m == "HTTP 500: oops"));
    }
}
