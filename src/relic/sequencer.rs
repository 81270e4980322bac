//! In-memory relic numbering.
//!
//! The counter lives only for the lifetime of the process. A restart begins
//! again at 001, so ids can repeat across runs.

use crate::relic::types::RelicId;

/// Issues strictly increasing relic ids, starting at 1.
#[derive(Debug)]
pub struct RelicSequencer {
    next: u64,
}

impl RelicSequencer {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Take the next id. Every call consumes one, whatever happens to the relic.
    pub fn next_id(&mut self) -> RelicId {
        let id = RelicId::new(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

impl Default for RelicSequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let mut sequencer = RelicSequencer::new();
        let ids: Vec<String> = (0..3).map(|_| sequencer.next_id().to_string()).collect();
        assert_eq!(ids, vec!["001", "002", "003"]);
        assert_eq!(sequencer.issued(), 3);
    }

    #[test]
    fn test_ids_grow_past_three_digits() {
        let mut sequencer = RelicSequencer::new();
        let mut last = sequencer.next_id();
        for _ in 0..1000 {
            let id = sequencer.next_id();
            assert!(id > last);
            last = id;
        }
        assert_eq!(last.to_string(), "1001");
    }
}
