use std::collections::BTreeMap;

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::{self, AnalyzeReport, ModelInfo};
use crate::components::details::NodeDetails;
use crate::components::graph_view::{
	EXPORT_FILE_NAME, GraphCanvas, GraphHandle, GraphNode, GraphPayload, color_for, download_json,
};
use crate::components::logs::{LogEntry, LogView, PromptView};
use crate::components::status::{StatusBar, StatusReporter};
use crate::prompt;

fn is_valid_url(url: &str) -> bool {
	web_sys::Url::new(url).is_ok()
}

/// Headline numbers for a one-shot analyze run.
#[derive(Clone, PartialEq)]
struct AnalyzeSummary {
	page_kind: String,
	confidence: f64,
	features: Vec<String>,
	entity_count: usize,
	relation_count: usize,
	processing_time: f64,
	type_counts: Vec<(String, usize)>,
}

impl AnalyzeSummary {
	fn from_report(report: &AnalyzeReport) -> Self {
		let mut counts: BTreeMap<String, usize> = BTreeMap::new();
		for node in &report.graph_data.nodes {
			let node_type = node
				.node_type
				.clone()
				.unwrap_or_else(|| "default".to_string());
			*counts.entry(node_type).or_insert(0) += 1;
		}
		Self {
			page_kind: report.page_type.kind.clone(),
			confidence: report.page_type.confidence,
			features: report.page_type.features.clone(),
			entity_count: report.graph_data.nodes.len(),
			relation_count: report.graph_data.edges.len(),
			processing_time: report.processing_time,
			type_counts: counts.into_iter().collect(),
		}
	}
}

/// The knowledge-graph workbench: extract, structure, render, inspect.
#[component]
pub fn Home() -> impl IntoView {
	let status = StatusReporter::new();

	let (url, set_url) = signal(String::new());
	let (extracted, set_extracted) = signal(String::new());
	let (prompt_text, set_prompt_text) = signal(prompt::DEFAULT_TEMPLATE.to_string());
	let (composed, set_composed) = signal(String::new());
	let (models, set_models) = signal(Vec::<ModelInfo>::new());
	let (model, set_model) = signal(String::new());
	let (raw_output, set_raw_output) = signal(String::new());
	let (graph_input, set_graph_input) = signal(String::new());
	let (payload, set_payload) = signal(None::<GraphPayload>);
	let (selected, set_selected) = signal(None::<GraphNode>);
	let (logs, set_logs) = signal(Vec::<LogEntry>::new());
	let (summary, set_summary) = signal(None::<AnalyzeSummary>);

	let (extracting, set_extracting) = signal(false);
	let (structuring, set_structuring) = signal(false);
	let (analyzing, set_analyzing) = signal(false);
	let (exporting, set_exporting) = signal(false);

	let handle = GraphHandle::new();

	// Load the model catalog once at startup.
	status.processing("Loading model catalog...");
	spawn_local(async move {
		match api::fetch_models().await {
			Ok(list) if !list.is_empty() => {
				set_model.set(list[0].name.clone());
				set_models.set(list);
				status.success("Model catalog loaded");
			}
			Ok(_) => {
				set_models.set(Vec::new());
				status.error("No models available");
			}
			Err(e) => {
				log::error!("failed to load model catalog: {e}");
				status.error("Failed to load model catalog");
			}
		}
	});

	let on_extract = move |_| {
		let url_value = url.get().trim().to_string();
		if url_value.is_empty() {
			status.error("Please enter a URL");
			return;
		}
		if !is_valid_url(&url_value) {
			status.error("Invalid URL format");
			return;
		}

		status.processing("Extracting page content...");
		set_extracting.set(true);
		spawn_local(async move {
			match api::extract(&url_value).await {
				Ok(content) => {
					set_extracted.set(content.clone());
					// Blank template field falls back to the built-in one,
					// made visible so the user sees what goes out.
					let template = prompt::effective_template(&prompt_text.get()).to_string();
					if prompt_text.get().trim().is_empty() {
						set_prompt_text.set(template.clone());
					}
					set_composed.set(prompt::compose(&template, &content));
					status.success("Content extracted");
				}
				Err(e) => status.error(format!("Extraction failed: {e}")),
			}
			set_extracting.set(false);
		});
	};

	let on_structure = move |_| {
		let content_value = composed.get().trim().to_string();
		let model_value = model.get();
		if content_value.is_empty() {
			status.error("Nothing to structure; extract or paste content first");
			return;
		}
		if model_value.is_empty() {
			status.error("Select a model first");
			return;
		}
		let prompt_value = prompt_text.get();

		status.processing("Generating structured output...");
		set_structuring.set(true);
		spawn_local(async move {
			match api::structure(&content_value, &prompt_value, &model_value).await {
				Ok(raw) => {
					set_raw_output.set(raw.clone());
					// Best effort: pretty-print when the model returned
					// JSON, otherwise seed the field with the raw text.
					match serde_json::from_str::<serde_json::Value>(&raw) {
						Ok(value) => set_graph_input.set(
							serde_json::to_string_pretty(&value).unwrap_or_else(|_| raw.clone()),
						),
						Err(e) => {
							log::warn!("structured output is not valid JSON: {e}");
							set_graph_input.set(raw.clone());
						}
					}
					status.success("Structured output ready");
				}
				Err(e) => status.error(format!("Structuring failed: {e}")),
			}
			set_structuring.set(false);
		});
	};

	let on_render = move |_| {
		let text = graph_input.get();
		let trimmed = text.trim();
		if trimmed.is_empty() {
			status.error("Please provide graph JSON");
			return;
		}
		match GraphPayload::from_json(trimmed) {
			Ok(parsed) => {
				set_selected.set(None);
				set_payload.set(Some(parsed));
				status.success("Graph rendered");
			}
			Err(e) => {
				log::debug!("graph payload rejected: {e}");
				status.error("Invalid graph data format");
			}
		}
	};

	let on_analyze = move |_| {
		let url_value = url.get().trim().to_string();
		if url_value.is_empty() {
			status.error("Please enter a URL");
			return;
		}
		if !is_valid_url(&url_value) {
			status.error("Invalid URL format");
			return;
		}

		status.processing("Generating knowledge graph...");
		set_analyzing.set(true);
		spawn_local(async move {
			match api::analyze(&url_value).await {
				Ok(report) => {
					if report.graph_data.nodes.is_empty() {
						status.error("No entities found on the page");
					} else {
						set_summary.set(Some(AnalyzeSummary::from_report(&report)));
						set_logs.set(report.logs.clone());
						set_selected.set(None);
						set_payload.set(Some(report.graph_data));
						status.success("Knowledge graph generated");
					}
				}
				Err(e) => status.error(format!("Failed to generate knowledge graph: {e}")),
			}
			set_analyzing.set(false);
		});
	};

	let on_export = move |_| {
		let Some(current) = payload.get() else {
			return;
		};
		set_exporting.set(true);
		spawn_local(async move {
			let result = api::export(&current)
				.await
				.and_then(|data| download_json(&data, EXPORT_FILE_NAME));
			if let Err(e) = result {
				log::error!("export failed: {e}");
				if let Some(window) = web_sys::window() {
					let _ = window.alert_with_message(&format!("Failed to export graph: {e}"));
				}
			}
			set_exporting.set(false);
		});
	};

	let on_clear = move |_| {
		set_url.set(String::new());
		set_graph_input.set(String::new());
		set_payload.set(None);
		set_selected.set(None);
		set_logs.set(Vec::new());
		set_summary.set(None);
		status.clear();
	};

	let select_handle = handle.clone();
	let on_select = Callback::new(move |id: String| {
		// Unknown ids resolve to nothing and leave the panel untouched.
		if let Some(record) = select_handle.node_record(&id) {
			set_selected.set(Some(record));
		}
	});

	let (zoom_in_handle, zoom_out_handle, fit_handle) =
		(handle.clone(), handle.clone(), handle.clone());

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<div class="workbench">
				<header class="workbench-header">
					<h1>"Knowledge Graph Studio"</h1>
					<StatusBar reporter=status />
				</header>

				<div class="workbench-columns">
					<section class="control-panel">
						<div class="field-group">
							<label for="url-input">"Page URL"</label>
							<input
								id="url-input"
								type="url"
								placeholder="https://example.com/article"
								prop:value=move || url.get()
								on:input=move |ev| set_url.set(event_target_value(&ev))
							/>
							<div class="button-row">
								<button
									on:click=on_extract
									disabled=move || extracting.get()
								>
									"Extract Content"
								</button>
								<button
									on:click=on_analyze
									disabled=move || analyzing.get()
								>
									"Analyze URL"
								</button>
								<button class="secondary" on:click=on_clear>
									"Clear"
								</button>
							</div>
						</div>

						<div class="field-group">
							<label for="extracted-content">"Extracted content"</label>
							<textarea
								id="extracted-content"
								rows=6
								prop:value=move || extracted.get()
								on:input=move |ev| set_extracted.set(event_target_value(&ev))
							/>
						</div>

						<div class="field-group">
							<label for="prompt-input">"Prompt template (use {text} for the content)"</label>
							<textarea
								id="prompt-input"
								rows=6
								prop:value=move || prompt_text.get()
								on:input=move |ev| set_prompt_text.set(event_target_value(&ev))
							/>
						</div>

						<div class="field-group">
							<label for="content-input">"Content sent for structuring"</label>
							<textarea
								id="content-input"
								rows=6
								prop:value=move || composed.get()
								on:input=move |ev| set_composed.set(event_target_value(&ev))
							/>
						</div>

						<div class="field-group">
							<label for="model-selector">"Model"</label>
							<select
								id="model-selector"
								on:change=move |ev| set_model.set(event_target_value(&ev))
							>
								{move || {
									let list = models.get();
									if list.is_empty() {
										view! { <option value="">"No models available"</option> }
											.into_any()
									} else {
										list.into_iter()
											.map(|entry| {
												let value = entry.name.clone();
												let text = entry.name.clone();
												let is_selected = {
													let name = entry.name.clone();
													move || model.get() == name
												};
												view! {
													<option value=value selected=is_selected>
														{text}
													</option>
												}
											})
											.collect_view()
											.into_any()
									}
								}}
							</select>
							<button
								on:click=on_structure
								disabled=move || structuring.get()
							>
								"Generate Structure"
							</button>
						</div>

						<div class="field-group">
							<label for="structured-content">"Raw model output"</label>
							<textarea
								id="structured-content"
								rows=6
								readonly=true
								prop:value=move || raw_output.get()
							/>
						</div>

						<div class="field-group">
							<label for="graph-input">"Graph JSON"</label>
							<textarea
								id="graph-input"
								rows=8
								prop:value=move || graph_input.get()
								on:input=move |ev| set_graph_input.set(event_target_value(&ev))
							/>
							<button on:click=on_render>"Render Graph"</button>
						</div>
					</section>

					<section class="graph-panel">
						<div class="graph-toolbar">
							<button on:click=move |_| zoom_in_handle.zoom_in()>"+"</button>
							<button on:click=move |_| zoom_out_handle.zoom_out()>"-"</button>
							<button on:click=move |_| fit_handle.fit()>"Fit"</button>
							<button
								on:click=on_export
								disabled=move || exporting.get() || payload.with(|p| p.is_none())
							>
								"Export"
							</button>
						</div>
						<div class="graph-container">
							<GraphCanvas payload=payload handle=handle.clone() on_select=on_select />
						</div>
						<NodeDetails node=selected />
					</section>
				</div>

				{move || {
					summary
						.get()
						.map(|s| {
							view! {
								<section class="summary-panel">
									<h3>"Graph Details"</h3>
									<ul>
										<li>{format!("Page Type: {}", s.page_kind)}</li>
										<li>{format!("Confidence: {:.1}%", s.confidence * 100.0)}</li>
										<li>{format!("Features: {}", s.features.join(", "))}</li>
										<li>{format!("Total Entities: {}", s.entity_count)}</li>
										<li>{format!("Total Relations: {}", s.relation_count)}</li>
										<li>
											{format!("Processing Time: {:.2} seconds", s.processing_time)}
										</li>
									</ul>
									<h3>"Entity Types"</h3>
									<ul>
										{s.type_counts
											.iter()
											.map(|(node_type, count)| {
												let swatch = format!("color: {}", color_for(node_type));
												view! {
													<li>
														<span style=swatch>{"\u{25CF} "}</span>
														{format!("{node_type}: {count} entities")}
													</li>
												}
											})
											.collect_view()}
									</ul>
								</section>
							}
						})
				}}

				<section class="log-panel">
					<LogView logs=logs />
					<PromptView logs=logs />
				</section>
			</div>
		</ErrorBoundary>
	}
}
