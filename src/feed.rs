use crate::event::Event;

/// Fixed-capacity history of the most recent events.
///
/// Backed by a preallocated slot arena and a wrapping write index; once
/// full, each push overwrites the oldest slot. Iteration always yields
/// arrival order.
#[derive(Debug, Clone)]
pub struct EventFeed {
    slots: Vec<Option<Event>>,
    head: usize,
    len: usize,
}

impl EventFeed {
    /// Capacity must be non-zero; a zero-sized feed could never satisfy
    /// the "holds the most recent event" contract.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
        }
    }

    /// Appends an event, evicting the oldest when full. Returns the
    /// evicted event, if any.
    pub fn push(&mut self, event: Event) -> Option<Event> {
        let evicted = self.slots[self.head].replace(event);
        self.head = (self.head + 1) % self.slots.len();
        if evicted.is_none() {
            self.len += 1;
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.head = 0;
        self.len = 0;
    }

    /// Events in arrival order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        let capacity = self.slots.len();
        let oldest = (self.head + capacity - self.len) % capacity;
        (0..self.len).filter_map(move |index| self.slots[(oldest + index) % capacity].as_ref())
    }
}
