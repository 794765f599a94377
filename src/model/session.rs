//! Session state - one loaded dataset with its labels and cursor
//!
//! All label and navigation changes go through `Session`, which publishes a
//! `SessionEvent` after each mutation so observers never need to be wired
//! into the call sites.

use super::dataset::{AssetMap, Dataset};
use super::entry::{Choice, Entry, Label, PairKey};
use super::labels::LabelStore;
use super::navigation::Navigator;
use crate::error::StorageError;
use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};

/// Notification published after a session mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A pair received (or changed) its label
    Labeled { key: PairKey, label: Label },
    /// The current entry changed
    Navigated { index: usize },
    /// Every label was removed
    LabelsCleared,
}

/// State for one loaded dataset
pub struct Session {
    entries: Vec<Entry>,
    assets: AssetMap,
    labels: LabelStore,
    nav: Navigator,
    subscribers: Vec<Sender<SessionEvent>>,
}

impl Session {
    pub fn new(dataset: Dataset, labels: LabelStore) -> Self {
        let nav = Navigator::new(dataset.entries.len());
        Self {
            entries: dataset.entries,
            assets: dataset.assets,
            labels,
            nav,
            subscribers: Vec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Observers
    // ─────────────────────────────────────────────────────────────────────────

    /// Register an observer; dropped receivers are pruned on the next publish
    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn publish(&mut self, event: SessionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read access
    // ─────────────────────────────────────────────────────────────────────────

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn assets(&self) -> &AssetMap {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.nav.current()
    }

    pub fn current_entry(&self) -> Option<&Entry> {
        self.entries.get(self.nav.current()?)
    }

    pub fn current_key(&self) -> Option<PairKey> {
        self.current_entry().map(Entry::pair_key)
    }

    pub fn label_of(&self, entry: &Entry) -> Option<Label> {
        self.labels.get(&entry.pair_key())
    }

    /// Entries of this dataset that carry a label
    ///
    /// The store may also hold labels for pairs of other datasets opened
    /// with the same state dir; those are not counted here.
    pub fn labeled_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| self.labels.get(&e.pair_key()).is_some())
            .count()
    }

    /// Fraction of this dataset's entries that are labeled
    pub fn progress(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.labeled_count() as f64 / self.len() as f64
        }
    }

    /// Owned copy of the label mapping for a background export
    pub fn label_snapshot(&self) -> BTreeMap<PairKey, Label> {
        self.labels.snapshot()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Labeling
    // ─────────────────────────────────────────────────────────────────────────

    /// Record `choice` for the current entry. Never moves the cursor.
    ///
    /// Returns the label that was stored, or `None` when nothing is loaded.
    /// A failed write still leaves the label set in memory.
    pub fn choose(&mut self, choice: Choice) -> Result<Option<Label>, StorageError> {
        let Some(entry) = self.current_entry() else {
            return Ok(None);
        };
        let key = entry.pair_key();
        let label = entry.label_for(choice);

        let result = self.labels.set(key.clone(), label);
        tracing::debug!(key = %key, label = label.0, "label set");
        self.publish(SessionEvent::Labeled { key, label });
        result.map(|()| Some(label))
    }

    /// Drop every label, in memory and on disk
    pub fn reset_labels(&mut self) -> Result<(), StorageError> {
        let result = self.labels.clear_all();
        self.publish(SessionEvent::LabelsCleared);
        result
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn next(&mut self) {
        self.navigate(Navigator::next);
    }

    pub fn previous(&mut self) {
        self.navigate(Navigator::previous);
    }

    pub fn first(&mut self) {
        self.navigate(Navigator::first);
    }

    pub fn last(&mut self) {
        self.navigate(Navigator::last);
    }

    pub fn go_to(&mut self, index: i64) {
        self.navigate(|nav| nav.go_to(index));
    }

    pub fn select(&mut self, index: usize) {
        self.navigate(|nav| nav.select(index));
    }

    fn navigate(&mut self, step: impl FnOnce(&mut Navigator)) {
        let before = self.nav.current();
        step(&mut self.nav);
        if let Some(index) = self.nav.current() {
            if before != Some(index) {
                self.publish(SessionEvent::Navigated { index });
            }
        }
    }
}
