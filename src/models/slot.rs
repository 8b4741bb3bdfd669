use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(day, item_index, is_parallel)` triple identifying one agenda slot.
///
/// Ordering follows the agenda layout: by day label, then `item_index`,
/// then the non-parallel item before its parallel sibling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    pub day: String,
    pub item_index: i64,
    pub is_parallel: bool,
}

impl SlotKey {
    pub fn new(day: impl Into<String>, item_index: i64, is_parallel: bool) -> Self {
        Self {
            day: day.into(),
            item_index,
            is_parallel,
        }
    }

    /// Short label used in audit rows and CLI output, e.g. `Day 1#3/p`.
    pub fn label(&self) -> String {
        if self.is_parallel {
            format!("{}#{}/p", self.day, self.item_index)
        } else {
            format!("{}#{}", self.day, self.item_index)
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' item {}{}",
            self.day,
            self.item_index,
            if self.is_parallel { " (parallel)" } else { "" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_sorts_after_its_shared_index() {
        let mut slots = vec![
            SlotKey::new("Day 1", 2, false),
            SlotKey::new("Day 1", 1, true),
            SlotKey::new("Day 1", 1, false),
        ];
        slots.sort();
        assert_eq!(
            slots,
            vec![
                SlotKey::new("Day 1", 1, false),
                SlotKey::new("Day 1", 1, true),
                SlotKey::new("Day 1", 2, false),
            ]
        );
    }

    #[test]
    fn label_marks_parallel_track() {
        assert_eq!(SlotKey::new("Day 2", 4, true).label(), "Day 2#4/p");
        assert_eq!(SlotKey::new("Day 2", 4, false).label(), "Day 2#4");
    }
}
