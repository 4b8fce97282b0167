use leptos::prelude::*;
use serde_json::Value;

use super::graph_view::GraphNode;

fn value_text(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		other => other.to_string(),
	}
}

/// Detail panel for the currently selected node.
#[component]
pub fn NodeDetails(#[prop(into)] node: Signal<Option<GraphNode>>) -> impl IntoView {
	view! {
		<div class="node-details">
			{move || {
				node.get()
					.map(|n| {
						let node_type = n.node_type.clone().unwrap_or_else(|| "N/A".to_string());
						let description = n
							.description
							.clone()
							.unwrap_or_else(|| "N/A".to_string());
						let properties = (!n.properties.is_empty())
							.then(|| {
								view! {
									<h4>"Properties"</h4>
									<ul>
										{n.properties
											.iter()
											.map(|(key, value)| {
												view! {
													<li>
														<strong>{format!("{key}: ")}</strong>
														{value_text(value)}
													</li>
												}
											})
											.collect_view()}
									</ul>
								}
							});
						view! {
							<h3>"Node Details"</h3>
							<p>
								<strong>"ID: "</strong>
								{n.id.clone()}
							</p>
							<p>
								<strong>"Label: "</strong>
								{n.label.clone()}
							</p>
							<p>
								<strong>"Type: "</strong>
								{node_type}
							</p>
							<p>
								<strong>"Description: "</strong>
								{description}
							</p>
							{properties}
						}
					})
			}}
		</div>
	}
}
