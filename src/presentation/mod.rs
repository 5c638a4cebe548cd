pub mod overlay;
pub mod report;

pub use overlay::{build_overlays, PatternOverlay};
pub use report::{render_text, write_json, ScanExport};
