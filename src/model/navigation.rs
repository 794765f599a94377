//! Navigation over the loaded entries
//!
//! Movement saturates at both ends; out-of-range requests are corrected
//! silently rather than rejected.

/// Tracks the current entry index for a dataset of fixed length
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    len: usize,
    current: Option<usize>,
}

impl Navigator {
    /// Start at the first entry, or nowhere if the dataset is empty
    pub fn new(len: usize) -> Self {
        Self {
            len,
            current: if len == 0 { None } else { Some(0) },
        }
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Jump to `index`, clamped into `[0, len - 1]`
    pub fn go_to(&mut self, index: i64) {
        if self.len == 0 {
            return;
        }
        let last = (self.len - 1) as i64;
        self.current = Some(index.clamp(0, last) as usize);
    }

    pub fn next(&mut self) {
        if let Some(i) = self.current {
            self.go_to(i as i64 + 1);
        }
    }

    pub fn previous(&mut self) {
        if let Some(i) = self.current {
            self.go_to(i as i64 - 1);
        }
    }

    /// Direct jump from a list click
    pub fn select(&mut self, index: usize) {
        self.go_to(i64::try_from(index).unwrap_or(i64::MAX));
    }

    pub fn first(&mut self) {
        self.go_to(0);
    }

    pub fn last(&mut self) {
        self.go_to(i64::MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_to_clamps_both_ends() {
        let mut nav = Navigator::new(5);
        nav.go_to(-5);
        assert_eq!(nav.current(), Some(0));
        nav.go_to(99);
        assert_eq!(nav.current(), Some(4));
        nav.go_to(2);
        assert_eq!(nav.current(), Some(2));
    }

    #[test]
    fn test_next_and_previous_saturate() {
        let mut nav = Navigator::new(2);
        nav.previous();
        assert_eq!(nav.current(), Some(0));
        nav.next();
        nav.next();
        nav.next();
        assert_eq!(nav.current(), Some(1));
    }

    #[test]
    fn test_select_out_of_range_is_corrected() {
        let mut nav = Navigator::new(3);
        nav.select(10);
        assert_eq!(nav.current(), Some(2));
        nav.select(usize::MAX);
        assert_eq!(nav.current(), Some(2));
    }

    #[test]
    fn test_first_and_last() {
        let mut nav = Navigator::new(4);
        nav.last();
        assert_eq!(nav.current(), Some(3));
        nav.first();
        assert_eq!(nav.current(), Some(0));
    }

    #[test]
    fn test_empty_dataset_has_no_current() {
        let mut nav = Navigator::new(0);
        nav.next();
        nav.go_to(3);
        assert_eq!(nav.current(), None);
    }
}
