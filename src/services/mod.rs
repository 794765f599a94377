//! Services that read datasets and write exports
//!
//! - Dataset folder collection and manifest parsing
//! - Export record rendering and zip assembly
//! - Background export execution
//! - Caption markup helpers for display

pub mod export;
pub mod export_runner;
pub mod loader;
pub mod markup;

pub use export_runner::{ExportRunner, ExportSnapshot};
pub use loader::{collect_dir, load_dataset};
pub use markup::{caption_sections, CaptionSection};
