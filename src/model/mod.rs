//! Model layer - session state and the types it is built from
//!
//! - `Entry`, `PairKey`, `Label` - dataset entities
//! - `Dataset`, `AssetMap` - a loaded folder
//! - `LabelStore` - durable label mapping
//! - `Navigator` - clamped cursor over entries
//! - `Session` - composition of the above for one dataset
//! - `ModalStack` - modal overlay management

pub mod dataset;
pub mod entry;
pub mod labels;
pub mod modal;
pub mod navigation;
pub mod session;
pub mod ui;

pub use entry::{Choice, Entry};
pub use labels::{LabelFile, LabelStore};
pub use session::{Session, SessionEvent};
