//! Action enum - All possible application actions
//!
//! Key presses and mouse clicks are both translated into Actions, so a
//! click on a caption and its keyboard shortcut run the same code path.

use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for polling background work
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Move to the next entry
    NextEntry,
    /// Move to the previous entry
    PrevEntry,
    /// Jump to the first entry
    FirstEntry,
    /// Jump to the last entry
    LastEntry,
    /// Jump to an entry by index (list click)
    SelectEntry(usize),

    // ─────────────────────────────────────────────────────────────────────────
    // Labeling
    // ─────────────────────────────────────────────────────────────────────────
    /// Prefer the left caption
    ChooseLeft,
    /// Prefer the right caption
    ChooseRight,
    /// Record an explicit "no preference"
    ChooseNoPreference,

    // ─────────────────────────────────────────────────────────────────────────
    // Dataset & Export
    // ─────────────────────────────────────────────────────────────────────────
    /// Load the dataset folder at the given path
    LoadDataset(String),
    /// Export labeled pairs to a zip archive
    Export,
    /// Clear every label (already confirmed)
    ResetLabels,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open the reset confirmation dialog
    OpenResetDialog,
    /// Open the dataset path prompt
    OpenDatasetDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Close the current modal
    CloseModal,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextEntry => write!(f, "NextEntry"),
            Action::PrevEntry => write!(f, "PrevEntry"),
            Action::FirstEntry => write!(f, "FirstEntry"),
            Action::LastEntry => write!(f, "LastEntry"),
            Action::SelectEntry(i) => write!(f, "SelectEntry({})", i),
            Action::ChooseLeft => write!(f, "ChooseLeft"),
            Action::ChooseRight => write!(f, "ChooseRight"),
            Action::ChooseNoPreference => write!(f, "ChooseNoPreference"),
            Action::LoadDataset(path) => write!(f, "LoadDataset({})", path),
            Action::Export => write!(f, "Export"),
            Action::ResetLabels => write!(f, "ResetLabels"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenResetDialog => write!(f, "OpenResetDialog"),
            Action::OpenDatasetDialog => write!(f, "OpenDatasetDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
        }
    }
}
