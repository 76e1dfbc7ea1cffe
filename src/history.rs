//! Bounded snapshot history.
//!
//! Fixed-capacity circular buffer: the newest snapshot overwrites the
//! oldest once [`HISTORY_CAPACITY`] is reached. Storage is inline, so
//! pushing never allocates.

use heapless::Vec as HVec;

use crate::sensors::SensorSnapshot;

pub const HISTORY_CAPACITY: usize = 100;

pub struct HistoryStore {
    ring: [SensorSnapshot; HISTORY_CAPACITY],
    head: usize,
    len: usize,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            ring: [SensorSnapshot::default(); HISTORY_CAPACITY],
            head: 0,
            len: 0,
        }
    }

    pub fn push(&mut self, snapshot: SensorSnapshot) {
        self.ring[self.head] = snapshot;
        self.head = (self.head + 1) % HISTORY_CAPACITY;
        if self.len < HISTORY_CAPACITY {
            self.len += 1;
        }
    }

    /// Up to `count` entries, newest first. `None` or `Some(0)` means all.
    pub fn read(&self, count: Option<usize>) -> HVec<SensorSnapshot, HISTORY_CAPACITY> {
        // limit <= len <= capacity, so collect never overflows
        self.iter().take(self.limit(count)).copied().collect()
    }

    /// How many entries a read of `count` yields.
    pub fn limit(&self, count: Option<usize>) -> usize {
        match count {
            Some(n) if n > 0 => n.min(self.len),
            _ => self.len,
        }
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &SensorSnapshot> + '_ {
        (1..=self.len).map(move |back| {
            &self.ring[(self.head + HISTORY_CAPACITY - back) % HISTORY_CAPACITY]
        })
    }

    pub fn latest(&self) -> Option<&SensorSnapshot> {
        self.iter().next()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}
