//! Typed client for the extraction/structuring backend.
//!
//! Every call maps transport failures and backend-reported `error` fields
//! into a displayable message; the backend's own wording wins whenever it
//! is present, on any HTTP status.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::components::graph_view::GraphPayload;
use crate::components::logs::LogEntry;

const API_BASE: &str = "/api";
const ANALYZE_URL: &str = "/analyze";

/// One entry of the model catalog.
#[derive(Clone, Debug, Deserialize)]
pub struct ModelInfo {
	pub name: String,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
	#[serde(default)]
	models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
	content: String,
}

#[derive(Debug, Deserialize)]
struct StructureResponse {
	raw_output: String,
}

#[derive(Debug, Deserialize)]
struct ExportResponse {
	data: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
	error: Option<String>,
}

/// Page classification attached to an analyze report.
#[derive(Clone, Debug, Deserialize)]
pub struct PageType {
	#[serde(rename = "type")]
	pub kind: String,
	pub confidence: f64,
	#[serde(default)]
	pub features: Vec<String>,
}

/// Result of the one-shot `/analyze` flow: graph, page classification,
/// timing and the backend's pipeline logs.
#[derive(Clone, Debug, Deserialize)]
pub struct AnalyzeReport {
	pub graph_data: GraphPayload,
	pub page_type: PageType,
	pub processing_time: f64,
	#[serde(default)]
	pub logs: Vec<LogEntry>,
}

#[derive(Serialize)]
struct UrlRequest<'a> {
	url: &'a str,
}

#[derive(Serialize)]
struct StructureRequest<'a> {
	content: &'a str,
	prompt: &'a str,
	model: &'a str,
}

#[derive(Serialize)]
struct ExportRequest<'a> {
	data: &'a GraphPayload,
	format: &'a str,
}

/// Decode a response, preferring a backend-reported `error` field over the
/// HTTP status. The backend emits `{error}` bodies with 2xx statuses too.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, String> {
	let ok = response.ok();
	let status = response.status();
	let text = response
		.text()
		.await
		.map_err(|e| format!("Failed to read response: {e}"))?;

	if let Ok(body) = serde_json::from_str::<ErrorBody>(&text) {
		if let Some(error) = body.error {
			return Err(error);
		}
	}
	if !ok {
		return Err(format!("HTTP error: {status}"));
	}
	serde_json::from_str(&text).map_err(|e| format!("Failed to parse response: {e}"))
}

async fn post_json<B: Serialize, T: DeserializeOwned>(url: &str, body: &B) -> Result<T, String> {
	let response = Request::post(url)
		.json(body)
		.map_err(|e| format!("Failed to encode request: {e}"))?
		.send()
		.await
		.map_err(|e| format!("Request failed: {e}"))?;
	decode(response).await
}

/// Fetch the available model names.
pub async fn fetch_models() -> Result<Vec<ModelInfo>, String> {
	let response = Request::get(&format!("{API_BASE}/models"))
		.send()
		.await
		.map_err(|e| format!("Request failed: {e}"))?;
	let data: ModelsResponse = decode(response).await?;
	Ok(data.models)
}

/// Extract readable text content from a web page.
pub async fn extract(url: &str) -> Result<String, String> {
	let data: ExtractResponse =
		post_json(&format!("{API_BASE}/extract"), &UrlRequest { url }).await?;
	Ok(data.content)
}

/// Ask the selected model to structure content into graph JSON. Returns
/// the raw textual output, unparsed.
pub async fn structure(content: &str, prompt: &str, model: &str) -> Result<String, String> {
	let data: StructureResponse = post_json(
		&format!("{API_BASE}/structure"),
		&StructureRequest {
			content,
			prompt,
			model,
		},
	)
	.await?;
	Ok(data.raw_output)
}

/// Round-trip the payload through the backend's exporter; returns the
/// serialized document to hand to the browser as a download.
pub async fn export(payload: &GraphPayload) -> Result<String, String> {
	let data: ExportResponse = post_json(
		&format!("{API_BASE}/export"),
		&ExportRequest {
			data: payload,
			format: "json",
		},
	)
	.await?;
	Ok(data.data)
}

/// One-shot analysis of a URL: extraction, structuring and classification
/// in a single backend call.
pub async fn analyze(url: &str) -> Result<AnalyzeReport, String> {
	post_json(ANALYZE_URL, &UrlRequest { url }).await
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn model_catalog_decodes_one_entry_per_model() {
		let data: ModelsResponse =
			serde_json::from_str(r#"{"models":[{"name":"llama3"},{"name":"qwen"}]}"#).unwrap();
		assert_eq!(data.models.len(), 2);
		assert_eq!(data.models[0].name, "llama3");
		assert_eq!(data.models[1].name, "qwen");
	}

	#[test]
	fn empty_model_catalog_decodes_empty() {
		let data: ModelsResponse = serde_json::from_str(r#"{"models":[]}"#).unwrap();
		assert!(data.models.is_empty());
		let data: ModelsResponse = serde_json::from_str(r#"{}"#).unwrap();
		assert!(data.models.is_empty());
	}

	#[test]
	fn error_bodies_are_detected() {
		let body: ErrorBody = serde_json::from_str(r#"{"error":"fetch blocked"}"#).unwrap();
		assert_eq!(body.error.as_deref(), Some("fetch blocked"));
		let body: ErrorBody = serde_json::from_str(r#"{"content":"hello"}"#).unwrap();
		assert!(body.error.is_none());
		assert!(serde_json::from_str::<ErrorBody>("not json").is_err());
	}

	#[test]
	fn analyze_report_decodes_the_entity_relation_schema() {
		let report: AnalyzeReport = serde_json::from_str(
			r#"{
				"graph_data": {
					"entities": [
						{"id": "1", "name": "Ada Lovelace", "type": "person", "description": "mathematician"},
						{"id": "2", "name": "Analytical Engine", "type": "concept", "description": ""}
					],
					"relations": [
						{"source": "1", "target": "2", "type": "worked on"}
					]
				},
				"page_type": {"type": "article", "confidence": 0.92, "features": ["prose", "headings"]},
				"processing_time": 3.25,
				"logs": [
					{"timestamp": 1700000000, "level": "STEP", "message": "Extracting"}
				]
			}"#,
		)
		.unwrap();

		assert_eq!(report.graph_data.nodes.len(), 2);
		assert_eq!(report.graph_data.nodes[0].label, "Ada Lovelace");
		assert_eq!(report.graph_data.edges[0].label.as_deref(), Some("worked on"));
		assert_eq!(report.page_type.kind, "article");
		assert_eq!(report.logs.len(), 1);
	}

	#[test]
	fn export_request_serializes_the_expected_body() {
		let payload = GraphPayload::default();
		let body = serde_json::to_value(ExportRequest {
			data: &payload,
			format: "json",
		})
		.unwrap();
		assert_eq!(body["format"], "json");
		assert!(body["data"]["nodes"].is_array());
	}
}
