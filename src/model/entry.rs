//! Data models for dataset entries, pair keys and labels

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One comparison unit from `data.json`
///
/// The typed fields are the ones the session needs; every other key in the
/// manifest record lands in `extra` and is written back out on export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub goal_image: String,
    pub current_image: String,
    pub caption1_text: String,
    pub caption2_text: String,
    pub caption1_index: i64,
    pub caption2_index: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entry {
    /// Key under which this entry's label is stored and exported
    pub fn pair_key(&self) -> PairKey {
        PairKey::from_image_ref(&self.goal_image)
    }

    /// Label value recorded for a choice on this entry
    pub fn label_for(&self, choice: Choice) -> Label {
        match choice {
            Choice::Left => Label(self.caption1_index),
            Choice::Right => Label(self.caption2_index),
            Choice::NoPreference => Label::NO_PREFERENCE,
        }
    }

    /// Which side a stored label refers to, if it matches either caption
    pub fn choice_for(&self, label: Label) -> Option<Choice> {
        if label.is_no_preference() {
            Some(Choice::NoPreference)
        } else if label.0 == self.caption1_index {
            Some(Choice::Left)
        } else if label.0 == self.caption2_index {
            Some(Choice::Right)
        } else {
            None
        }
    }
}

/// Identifier grouping an entry, derived from its goal image name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairKey(String);

impl PairKey {
    /// `0000_goal.jpg` becomes `0000`. Directories are stripped first; a name
    /// without `_` is used whole.
    pub fn from_image_ref(image_ref: &str) -> Self {
        let name = basename(image_ref);
        let key = name.split('_').next().unwrap_or(name);
        PairKey(key.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PairKey {
    fn from(key: &str) -> Self {
        PairKey(key.to_string())
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A reviewer's recorded preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Label(pub i64);

impl Label {
    /// Sentinel for an explicit "no preference"; never a caption index
    pub const NO_PREFERENCE: Label = Label(-1);

    pub fn is_no_preference(&self) -> bool {
        *self == Self::NO_PREFERENCE
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_no_preference() {
            write!(f, "no preference")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// The three ways a reviewer can label a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Left,
    Right,
    NoPreference,
}

impl Choice {
    pub fn name(&self) -> &str {
        match self {
            Choice::Left => "left",
            Choice::Right => "right",
            Choice::NoPreference => "no preference",
        }
    }
}

/// Last path segment, accepting both `/` and `\` separators
pub fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> Entry {
        serde_json::from_value(serde_json::json!({
            "goal_image": "0007_goal.jpg",
            "current_image": "0007_current.jpg",
            "caption1_text": "open the door",
            "caption2_text": "close the door",
            "caption1_index": 3,
            "caption2_index": 5,
            "episode": "ep-12"
        }))
        .unwrap()
    }

    #[test]
    fn test_pair_key_takes_prefix_before_first_underscore() {
        assert_eq!(PairKey::from_image_ref("0000_goal.jpg").as_str(), "0000");
        assert_eq!(PairKey::from_image_ref("12_a_b.png").as_str(), "12");
    }

    #[test]
    fn test_pair_key_without_separator_uses_whole_name() {
        assert_eq!(PairKey::from_image_ref("goal.jpg").as_str(), "goal.jpg");
    }

    #[test]
    fn test_pair_key_strips_directories() {
        assert_eq!(PairKey::from_image_ref("imgs/run_1/0042_goal.jpg").as_str(), "0042");
        assert_eq!(PairKey::from_image_ref(r"imgs\0042_goal.jpg").as_str(), "0042");
    }

    #[test]
    fn test_pair_key_is_stable() {
        let entry = sample_entry();
        assert_eq!(entry.pair_key(), entry.pair_key());
        assert_eq!(entry.pair_key().as_str(), "0007");
    }

    #[test]
    fn test_unknown_fields_are_kept_in_extra() {
        let entry = sample_entry();
        assert_eq!(entry.extra.get("episode"), Some(&Value::from("ep-12")));
        assert_eq!(entry.extra.len(), 1);
    }

    #[test]
    fn test_label_for_each_choice() {
        let entry = sample_entry();
        assert_eq!(entry.label_for(Choice::Left), Label(3));
        assert_eq!(entry.label_for(Choice::Right), Label(5));
        assert_eq!(entry.label_for(Choice::NoPreference), Label::NO_PREFERENCE);
    }

    #[test]
    fn test_choice_for_label() {
        let entry = sample_entry();
        assert_eq!(entry.choice_for(Label(3)), Some(Choice::Left));
        assert_eq!(entry.choice_for(Label(5)), Some(Choice::Right));
        assert_eq!(entry.choice_for(Label(-1)), Some(Choice::NoPreference));
        assert_eq!(entry.choice_for(Label(9)), None);
    }
}
