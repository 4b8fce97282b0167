//! Client-side download of the exported graph document.

use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// File name the exported graph is saved under.
pub const EXPORT_FILE_NAME: &str = "knowledge-graph.json";

/// Wrap a serialized JSON document in a Blob and trigger a browser
/// download via a synthetic anchor click.
pub fn download_json(content: &str, filename: &str) -> Result<(), String> {
	let blob = create_json_blob(content)?;

	let window = web_sys::window().ok_or("No window object")?;
	let document = window.document().ok_or("No document object")?;

	let url = Url::create_object_url_with_blob(&blob)
		.map_err(|e| format!("Failed to create object URL: {e:?}"))?;

	let anchor = document
		.create_element("a")
		.map_err(|e| format!("Failed to create anchor: {e:?}"))?
		.dyn_into::<HtmlAnchorElement>()
		.map_err(|e| format!("Failed to cast to anchor: {e:?}"))?;

	anchor.set_href(&url);
	anchor.set_download(filename);
	anchor
		.style()
		.set_property("display", "none")
		.map_err(|e| format!("Failed to set style: {e:?}"))?;

	document
		.body()
		.ok_or("No body element")?
		.append_child(&anchor)
		.map_err(|e| format!("Failed to append anchor: {e:?}"))?;

	anchor.click();

	document
		.body()
		.ok_or("No body element")?
		.remove_child(&anchor)
		.map_err(|e| format!("Failed to remove anchor: {e:?}"))?;

	Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {e:?}"))?;

	Ok(())
}

fn create_json_blob(content: &str) -> Result<Blob, String> {
	let parts = js_sys::Array::new();
	parts.push(&wasm_bindgen::JsValue::from_str(content));

	let properties = BlobPropertyBag::new();
	properties.set_type("application/json");

	Blob::new_with_str_sequence_and_options(&parts, &properties)
		.map_err(|e| format!("Failed to create blob: {e:?}"))
}
