//! Prompt template handling for the structuring request.
//!
//! A template is an ordinary string carrying a single `{text}` placeholder.
//! Composition is a plain first-occurrence replacement; a template without
//! the placeholder is passed through untouched, which silently drops the
//! content. That quirk is load-bearing: users paste fully hand-written
//! prompts and expect them to go out exactly as typed.

/// Placeholder token substituted with the extracted page content.
pub const PLACEHOLDER: &str = "{text}";

/// Built-in instruction used whenever the template field is left empty.
///
/// The wording pins down the wire schema the rest of the app expects from
/// the model: strict JSON, `nodes` with `id`/`label`/`type`, `edges` with
/// `source`/`target`/`label`, nothing outside the document.
pub const DEFAULT_TEMPLATE: &str = r#"You are a knowledge graph extraction assistant. Analyze the following text, extract the key entities and the relations between them, and produce a knowledge graph as JSON.

Requirements:
1. Identify the important concepts, people, organizations and events in the text
2. Identify the relations between those entities
3. Organize the entities and relations into a graph structure
4. Return strict JSON containing two arrays, "nodes" and "edges"
5. Every node must have "id", "label" and "type" fields
6. Every edge must have "source", "target" and "label" fields
7. Every "source" and "target" value must match a node "id"
8. Do not emit any text outside the JSON document

Text:
{text}

Return the JSON directly, for example:
{
    "nodes": [
        {"id": "1", "label": "Entity 1", "type": "person"},
        {"id": "2", "label": "Entity 2", "type": "concept"}
    ],
    "edges": [
        {"source": "1", "target": "2", "label": "relation"}
    ]
}"#;

/// Replace the first `{text}` occurrence in `template` with `content`.
pub fn compose(template: &str, content: &str) -> String {
	template.replacen(PLACEHOLDER, content, 1)
}

/// The template to actually use: the user's text, or the built-in default
/// when the field is blank.
pub fn effective_template(template: &str) -> &str {
	if template.trim().is_empty() {
		DEFAULT_TEMPLATE
	} else {
		template
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn compose_replaces_first_occurrence_only() {
		let out = compose("before {text} middle {text} after", "X");
		assert_eq!(out, "before X middle {text} after");
	}

	#[test]
	fn compose_without_placeholder_returns_template_unchanged() {
		let template = "no placeholder here";
		assert_eq!(compose(template, "dropped"), template);
	}

	#[test]
	fn compose_with_empty_content_removes_placeholder() {
		assert_eq!(compose("a {text} b", ""), "a  b");
	}

	#[test]
	fn effective_template_falls_back_on_blank_input() {
		assert_eq!(effective_template(""), DEFAULT_TEMPLATE);
		assert_eq!(effective_template("  \n "), DEFAULT_TEMPLATE);
		assert_eq!(effective_template("custom {text}"), "custom {text}");
	}

	#[test]
	fn default_template_carries_exactly_one_placeholder() {
		assert_eq!(DEFAULT_TEMPLATE.matches(PLACEHOLDER).count(), 1);
	}
}
