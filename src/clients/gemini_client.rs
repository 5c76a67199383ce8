//! generateContent REST 客户端
//!
//! 使用 reqwest 直接调用，以便拿到 HTTP 状态码做失败分类，
//! 并通过 `responseSchema` 约束结构化输出。

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, warn};

use crate::clients::{GradingModel, ModelRequest, RequestPart};
use crate::config::Config;
use crate::error::RemoteError;

/// 错误响应体 `{"error": {"code", "message", "status"}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// generateContent 客户端
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
}

impl GeminiClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| RemoteError::new(None, format!("无法创建 HTTP 客户端: {}", e)))?;

        Ok(Self {
            http,
            api_key: config.llm_api_key.clone(),
            api_base_url: config.llm_api_base_url.trim_end_matches('/').to_string(),
            model_name: config.llm_model_name.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base_url, self.model_name
        )
    }

    /// 调用 generateContent 并返回第一个候选的文本
    async fn generate(&self, request: &ModelRequest) -> Result<String, RemoteError> {
        let body = build_request_body(request);

        debug!(
            "调用模型 {}，文本段 {} 个，内联文件 {} 个",
            self.model_name,
            request.parts.len() - request.inline_count(),
            request.inline_count()
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RemoteError::new(e.status().map(|s| s.as_u16()), e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RemoteError::new(Some(status.as_u16()), e.to_string()))?;

        if !status.is_success() {
            let error = error_from_body(status.as_u16(), &text);
            warn!("模型调用失败: {}", error);
            return Err(error);
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| RemoteError::new(Some(status.as_u16()), format!("无法解析响应: {}", e)))?;

        debug!("模型调用成功");
        Ok(extract_text(parsed))
    }
}

#[async_trait]
impl GradingModel for GeminiClient {
    async fn synthesize_key(&self, request: &ModelRequest) -> Result<String, RemoteError> {
        self.generate(request).await
    }

    async fn grade_submission(&self, request: &ModelRequest) -> Result<String, RemoteError> {
        self.generate(request).await
    }
}

/// 构建请求体
fn build_request_body(request: &ModelRequest) -> JsonValue {
    let parts: Vec<JsonValue> = request
        .parts
        .iter()
        .map(|part| match part {
            RequestPart::Text(text) => json!({ "text": text }),
            RequestPart::Inline(file) => json!({
                "inlineData": {
                    "mimeType": file.mime_type,
                    "data": file.content,
                }
            }),
        })
        .collect();

    json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": request.response_schema,
        }
    })
}

/// 把失败响应转换为 `RemoteError`，消息中保留服务端的 status 字段
fn error_from_body(status: u16, body: &str) -> RemoteError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let message = match envelope.error.status {
                Some(kind) if !envelope.error.message.contains(&kind) => {
                    format!("{} ({})", envelope.error.message, kind)
                }
                _ => envelope.error.message,
            };
            RemoteError::new(Some(status), message)
        }
        Err(_) => {
            let snippet: String = body.chars().take(200).collect();
            RemoteError::new(Some(status), snippet)
        }
    }
}

/// 拼接第一个候选的所有文本段
fn extract_text(response: GenerateResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RemoteFailureKind;
    use crate::models::EncodedFile;

    #[test]
    fn test_request_body_shape() {
        let request = ModelRequest::new(json!({"type": "OBJECT"}))
            .text("grade this")
            .inline(EncodedFile::new("a.pdf", "QUJD", "application/pdf"));

        let body = build_request_body(&request);
        let parts = &body["contents"][0]["parts"];

        assert_eq!(parts[0]["text"], "grade this");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "application/pdf");
        assert_eq!(parts[1]["inlineData"]["data"], "QUJD");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn test_error_body_keeps_status_name() {
        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        let error = error_from_body(429, body);
        assert_eq!(error.status, Some(429));
        assert_eq!(error.message, "Quota exceeded (RESOURCE_EXHAUSTED)");
        assert_eq!(error.kind(), RemoteFailureKind::RateLimited);
    }

    #[test]
    fn test_error_body_not_json() {
        let error = error_from_body(502, "<html>Bad Gateway</html>");
        assert_eq!(error.status, Some(502));
        assert_eq!(error.message, "<html>Bad Gateway</html>");
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "[{\"a\""}, {"text": ":1}]"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response), r#"[{"a":1}]"#);
    }

    #[test]
    fn test_extract_text_without_candidates() {
        let response: GenerateResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert_eq!(extract_text(response), "");
    }

    /// 真实 API 调用，需要 LLM_API_KEY
    #[tokio::test]
    #[ignore]
    async fn test_live_generate() {
        let _ = tracing_subscriber::fmt::try_init();
        let config = Config::from_env();
        let client = GeminiClient::new(&config).unwrap();

        let request = ModelRequest::new(json!({
            "type": "OBJECT",
            "properties": { "answer": { "type": "STRING" } },
            "required": ["answer"]
        }))
        .text("What is 2 + 2? Reply in the answer field.");

        let text = client.synthesize_key(&request).await.unwrap();
        println!("模型响应: {}", text);
        assert!(!text.is_empty());
    }
}
