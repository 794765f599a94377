//! UI state - presentation concerns separate from the session

/// Main application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// No dataset loaded yet
    Welcome,
    /// A session is open
    Labeling,
}

/// Clickable areas of the labeling screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Row in the entry list, by entry index
    ListRow(usize),
    LeftCaption,
    RightCaption,
    NoPreference,
}
