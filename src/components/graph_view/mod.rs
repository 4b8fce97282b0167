mod component;
mod export;
mod render;
mod state;
mod types;

pub use component::GraphCanvas;
pub use export::{EXPORT_FILE_NAME, download_json};
pub use state::GraphHandle;
pub use types::{GraphEdge, GraphNode, GraphPayload, color_for};
