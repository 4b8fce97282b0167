use leptos::prelude::*;

/// Severity of the message shown in the shared status region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
	Processing,
	Success,
	Error,
}

impl StatusKind {
	pub fn css_class(self) -> &'static str {
		match self {
			StatusKind::Processing => "status status-processing",
			StatusKind::Success => "status status-success",
			StatusKind::Error => "status status-error",
		}
	}
}

/// Handle for writing progress/error/success text into the status region.
///
/// Copyable, infallible, stateless beyond the current message. Handlers
/// report through this instead of touching the DOM.
#[derive(Clone, Copy)]
pub struct StatusReporter {
	current: RwSignal<Option<(String, StatusKind)>>,
}

impl Default for StatusReporter {
	fn default() -> Self {
		Self::new()
	}
}

impl StatusReporter {
	pub fn new() -> Self {
		Self {
			current: RwSignal::new(None),
		}
	}

	pub fn report(&self, message: impl Into<String>, kind: StatusKind) {
		self.current.set(Some((message.into(), kind)));
	}

	pub fn processing(&self, message: impl Into<String>) {
		self.report(message, StatusKind::Processing);
	}

	pub fn success(&self, message: impl Into<String>) {
		self.report(message, StatusKind::Success);
	}

	pub fn error(&self, message: impl Into<String>) {
		self.report(message, StatusKind::Error);
	}

	pub fn clear(&self) {
		self.current.set(None);
	}

	fn current(&self) -> Option<(String, StatusKind)> {
		self.current.get()
	}
}

/// The status region itself.
#[component]
pub fn StatusBar(reporter: StatusReporter) -> impl IntoView {
	view! {
		<div class="status-bar">
			{move || {
				reporter
					.current()
					.map(|(message, kind)| view! { <span class=kind.css_class()>{message}</span> })
			}}
		</div>
	}
}
