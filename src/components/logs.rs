//! Pipeline log rendering and prompt-section extraction.

use chrono::{DateTime, Local};
use leptos::prelude::*;
use serde::{Deserialize, Serialize};

/// Marker substrings identifying log messages that embed an LLM prompt.
pub const PROMPT_MARKERS: [&str; 2] = ["Prompt sent to LLM:", "System prompt:"];

/// Log severity as reported by the backend. Unknown levels are carried
/// through verbatim rather than dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
	Info,
	Warning,
	Error,
	Step,
	#[serde(untagged)]
	Other(String),
}

impl LogLevel {
	pub fn label(&self) -> &str {
		match self {
			LogLevel::Info => "INFO",
			LogLevel::Warning => "WARNING",
			LogLevel::Error => "ERROR",
			LogLevel::Step => "STEP",
			LogLevel::Other(name) => name,
		}
	}

	pub fn css_class(&self) -> &'static str {
		match self {
			LogLevel::Info => "log-level-info",
			LogLevel::Warning => "log-level-warning",
			LogLevel::Error => "log-level-error",
			LogLevel::Step => "log-level-step",
			LogLevel::Other(_) => "log-level-other",
		}
	}
}

/// One backend log record. Entries display in the order received.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
	pub timestamp: f64,
	pub level: LogLevel,
	pub message: String,
}

/// Epoch seconds to a local time-of-day string.
pub fn format_timestamp(epoch_seconds: f64) -> String {
	DateTime::from_timestamp(epoch_seconds as i64, 0)
		.map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
		.unwrap_or_default()
}

/// A prompt embedded in a log message, split out for display.
#[derive(Clone, Debug, PartialEq)]
pub struct PromptSection {
	pub title: String,
	pub body: String,
}

/// Pull the prompt sections out of a log batch.
///
/// Matching messages follow the backend's framed format: first line is the
/// title, the body sits on lines 2..len-2. The frame is assumed, not
/// validated.
pub fn extract_prompts(logs: &[LogEntry]) -> Vec<PromptSection> {
	logs.iter()
		.filter(|entry| PROMPT_MARKERS.iter().any(|m| entry.message.contains(m)))
		.map(|entry| {
			let lines: Vec<&str> = entry.message.lines().collect();
			let title = lines.first().copied().unwrap_or_default().to_string();
			let body = if lines.len() > 4 {
				lines[2..lines.len() - 2].join("\n")
			} else {
				String::new()
			};
			PromptSection { title, body }
		})
		.collect()
}

/// Renders log entries in received order; `STEP` entries get emphasized
/// block styling, everything else renders as a single line.
#[component]
pub fn LogView(#[prop(into)] logs: Signal<Vec<LogEntry>>) -> impl IntoView {
	view! {
		<div class="log-list">
			<h3>"Processing log"</h3>
			{move || {
				let entries = logs.get();
				if entries.is_empty() {
					view! { <p class="log-empty">"No log entries yet."</p> }.into_any()
				} else {
					view! {
						<ul>
							{entries
								.into_iter()
								.map(|entry| {
									let time = format_timestamp(entry.timestamp);
									if entry.level == LogLevel::Step {
										view! {
											<li class="log-step">
												<div class="log-step-time">{time}</div>
												<pre class="log-step-message">{entry.message}</pre>
											</li>
										}
											.into_any()
									} else {
										let level_class = entry.level.css_class();
										let level_tag = format!("[{}]", entry.level.label());
										view! {
											<li class="log-line">
												<span class=level_class>{level_tag}</span>
												<span class="log-time">{format!(" {time}: ")}</span>
												<span>{entry.message}</span>
											</li>
										}
											.into_any()
									}
								})
								.collect_view()}
						</ul>
					}
						.into_any()
				}
			}}
		</div>
	}
}

/// Renders the prompt sections extracted from a log batch.
#[component]
pub fn PromptView(#[prop(into)] logs: Signal<Vec<LogEntry>>) -> impl IntoView {
	view! {
		<div class="prompt-list">
			<h3>"LLM prompts"</h3>
			{move || {
				let sections = extract_prompts(&logs.get());
				if sections.is_empty() {
					view! { <p class="log-empty">"No prompts available."</p> }.into_any()
				} else {
					sections
						.into_iter()
						.map(|section| {
							view! {
								<div class="prompt-section">
									<div class="prompt-title">{section.title}</div>
									<pre class="prompt-body">{section.body}</pre>
								</div>
							}
						})
						.collect_view()
						.into_any()
				}
			}}
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn entry(level: LogLevel, message: &str) -> LogEntry {
		LogEntry {
			timestamp: 1700000000.0,
			level,
			message: message.to_string(),
		}
	}

	#[test]
	fn levels_decode_from_backend_names() {
		let parsed: LogEntry =
			serde_json::from_str(r#"{"timestamp":1.0,"level":"STEP","message":"m"}"#).unwrap();
		assert_eq!(parsed.level, LogLevel::Step);

		let parsed: LogEntry =
			serde_json::from_str(r#"{"timestamp":1.0,"level":"DEBUG","message":"m"}"#).unwrap();
		assert_eq!(parsed.level, LogLevel::Other("DEBUG".into()));
		assert_eq!(parsed.level.label(), "DEBUG");
	}

	#[test]
	fn level_styling_classes() {
		assert_eq!(LogLevel::Step.css_class(), "log-level-step");
		assert_eq!(LogLevel::Error.css_class(), "log-level-error");
		assert_eq!(LogLevel::Other("X".into()).css_class(), "log-level-other");
	}

	#[test]
	fn timestamp_formats_as_time_of_day() {
		let formatted = format_timestamp(1700000000.0);
		assert_eq!(formatted.len(), 8);
		assert_eq!(formatted.matches(':').count(), 2);
	}

	#[test]
	fn extracts_framed_prompt_sections() {
		let message = "Prompt sent to LLM:\n---\nline one\nline two\n---\nend";
		let sections = extract_prompts(&[
			entry(LogLevel::Info, message),
			entry(LogLevel::Info, "unrelated"),
		]);
		assert_eq!(sections.len(), 1);
		assert_eq!(sections[0].title, "Prompt sent to LLM:");
		assert_eq!(sections[0].body, "line one\nline two");
	}

	#[test]
	fn short_prompt_messages_yield_an_empty_body() {
		let sections = extract_prompts(&[entry(LogLevel::Info, "System prompt:\nonly")]);
		assert_eq!(sections.len(), 1);
		assert_eq!(sections[0].title, "System prompt:");
		assert_eq!(sections[0].body, "");
	}

	#[test]
	fn unrelated_messages_are_ignored() {
		assert!(extract_prompts(&[entry(LogLevel::Step, "Fetching page")]).is_empty());
	}
}
