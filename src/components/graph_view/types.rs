use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fill color for node types without an entry in the palette.
pub const DEFAULT_COLOR: &str = "#607D8B";

/// Map a node type to its fill color. Unknown types fall through to gray.
pub fn color_for(node_type: &str) -> &'static str {
	match node_type {
		"concept" => "#4CAF50",
		"category" => "#2196F3",
		"person" => "#9C27B0",
		"org" => "#F44336",
		_ => DEFAULT_COLOR,
	}
}

/// A labeled, typed point in the knowledge graph.
///
/// The backend's `/analyze` flow speaks in entities with a `name`; the
/// structuring flow speaks in nodes with a `label`. Both decode into this
/// one shape; serialization always emits the canonical field names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	pub id: String,
	#[serde(default, alias = "name")]
	pub label: String,
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub node_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Map::is_empty")]
	pub properties: Map<String, Value>,
}

/// A directed, labeled connection between two node ids.
///
/// Accepts the `from`/`to` variant and the relation vocabulary (`type` as
/// the label) on input. Endpoint ids are not validated here; edges whose
/// endpoints never resolve are dropped when the layout is built.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	#[serde(alias = "from")]
	pub source: String,
	#[serde(alias = "to")]
	pub target: String,
	#[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// One renderable graph document. Replaced wholesale on every render,
/// never mutated in place.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
	#[serde(alias = "entities")]
	pub nodes: Vec<GraphNode>,
	#[serde(alias = "relations")]
	pub edges: Vec<GraphEdge>,
}

impl GraphPayload {
	/// Parse a user-supplied JSON document. Both `nodes` and `edges` keys
	/// must be present; the detailed serde error only goes to the console.
	pub fn from_json(text: &str) -> Result<Self, String> {
		serde_json::from_str(text).map_err(|e| e.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_canonical_schema() {
		let payload = GraphPayload::from_json(
			r#"{"nodes":[{"id":"1","label":"A","type":"person"}],"edges":[{"source":"1","target":"1","label":"self"}]}"#,
		)
		.unwrap();
		assert_eq!(payload.nodes.len(), 1);
		assert_eq!(payload.nodes[0].label, "A");
		assert_eq!(payload.nodes[0].node_type.as_deref(), Some("person"));
		assert_eq!(payload.edges[0].source, "1");
		assert_eq!(payload.edges[0].label.as_deref(), Some("self"));
	}

	#[test]
	fn parses_from_to_edge_variant() {
		let payload = GraphPayload::from_json(
			r#"{"nodes":[{"id":"a","label":"A"},{"id":"b","label":"B"}],"edges":[{"from":"a","to":"b","label":"knows"}]}"#,
		)
		.unwrap();
		assert_eq!(payload.edges[0].source, "a");
		assert_eq!(payload.edges[0].target, "b");
	}

	#[test]
	fn parses_entity_relation_vocabulary() {
		let payload = GraphPayload::from_json(
			r#"{
				"entities":[{"id":"1","name":"Ada","type":"person","description":"mathematician"}],
				"relations":[{"source":"1","target":"1","type":"self","description":"loop"}]
			}"#,
		)
		.unwrap();
		assert_eq!(payload.nodes[0].label, "Ada");
		assert_eq!(payload.edges[0].label.as_deref(), Some("self"));
		assert_eq!(payload.edges[0].description.as_deref(), Some("loop"));
	}

	#[test]
	fn rejects_documents_missing_nodes_or_edges() {
		assert!(GraphPayload::from_json(r#"{"nodes":[]}"#).is_err());
		assert!(GraphPayload::from_json(r#"{"edges":[]}"#).is_err());
		assert!(GraphPayload::from_json("not json").is_err());
	}

	#[test]
	fn serializes_canonical_field_names() {
		let payload = GraphPayload::from_json(
			r#"{"entities":[{"id":"1","name":"Ada"}],"relations":[{"from":"1","to":"1"}]}"#,
		)
		.unwrap();
		let out = serde_json::to_string(&payload).unwrap();
		assert!(out.contains("\"nodes\""));
		assert!(out.contains("\"edges\""));
		assert!(out.contains("\"label\":\"Ada\""));
		assert!(out.contains("\"source\":\"1\""));
		assert!(!out.contains("entities"));
		assert!(!out.contains("\"from\""));
	}

	#[test]
	fn color_palette_lookup() {
		assert_eq!(color_for("person"), "#9C27B0");
		assert_eq!(color_for("concept"), "#4CAF50");
		assert_eq!(color_for("category"), "#2196F3");
		assert_eq!(color_for("org"), "#F44336");
		assert_eq!(color_for("unknown-type"), DEFAULT_COLOR);
		assert_eq!(color_for(""), DEFAULT_COLOR);
	}

	#[test]
	fn pretty_printed_model_output_renders_with_one_node() {
		// The structuring flow reformats parseable output before seeding
		// the graph-input field: 2-space indentation, same document.
		let raw = r#"{"nodes":[{"id":"1","label":"A"}],"edges":[]}"#;
		let value: Value = serde_json::from_str(raw).unwrap();
		let pretty = serde_json::to_string_pretty(&value).unwrap();
		assert!(pretty.contains("\n  \"nodes\""));
		assert!(pretty.contains("\n      \"id\": \"1\""));

		let payload = GraphPayload::from_json(&pretty).unwrap();
		assert_eq!(payload.nodes.len(), 1);
		assert_eq!(payload.nodes[0].id, "1");
	}

	#[test]
	fn properties_survive_the_round_trip() {
		let payload = GraphPayload::from_json(
			r#"{"nodes":[{"id":"1","label":"A","properties":{"born":"1815"}}],"edges":[]}"#,
		)
		.unwrap();
		assert_eq!(
			payload.nodes[0].properties.get("born"),
			Some(&Value::String("1815".into()))
		);
	}
}
