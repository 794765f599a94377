//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod confirm_dialog;
pub mod help_dialog;
pub mod home;
pub mod layout;
pub mod open_dialog;
pub mod welcome;

pub use confirm_dialog::ConfirmDialog;
pub use help_dialog::HelpDialog;
pub use home::{draw_home_screen, HomeComponent, HomeRenderContext};
pub use layout::centered_popup;
pub use open_dialog::OpenDatasetDialog;
pub use welcome::WelcomeComponent;
