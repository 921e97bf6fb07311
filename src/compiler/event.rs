//! Event generation and management

use super::pitch::Pitch;
use std::collections::BTreeMap;

/// Event data types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventData {
    /// Key press with velocity
    NoteOn { pitch: Pitch, velocity: u8 },
    /// Key release
    NoteOff { pitch: Pitch, velocity: u8 },
    /// Continuous controller change
    Controller { controller: u8, value: u8 },
    /// 14-bit pitch bend, center 8192
    PitchBend { value: u16 },
}

/// Event with timing and track info
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Time in ticks
    pub time: u64,
    /// Track index (1-based)
    pub track: u32,
    /// Event data
    pub data: EventData,
}

impl Event {
    pub fn new(time: u64, track: u32, data: EventData) -> Self {
        Self { time, track, data }
    }

    pub fn note_on(time: u64, track: u32, pitch: Pitch, velocity: u8) -> Self {
        Self::new(time, track, EventData::NoteOn { pitch, velocity })
    }

    pub fn note_off(time: u64, track: u32, pitch: Pitch, velocity: u8) -> Self {
        Self::new(time, track, EventData::NoteOff { pitch, velocity })
    }

    pub fn controller(time: u64, track: u32, controller: u8, value: u8) -> Self {
        Self::new(time, track, EventData::Controller { controller, value })
    }

    pub fn pitch_bend(time: u64, track: u32, value: u16) -> Self {
        Self::new(time, track, EventData::PitchBend { value })
    }
}

/// Time-sorted event queue
///
/// Events sharing a tick keep their insertion order; the encoder
/// relies on this to emit bend resets ahead of their NoteOn.
#[derive(Debug, Default)]
pub struct EventQueue {
    /// Events grouped by time
    events: BTreeMap<u64, Vec<Event>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event into the queue
    pub fn insert(&mut self, event: Event) {
        self.events.entry(event.time).or_default().push(event);
    }

    /// Get all events in time order
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.values().flatten()
    }

    /// Get events at a specific time
    pub fn at_time(&self, time: u64) -> Option<&Vec<Event>> {
        self.events.get(&time)
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get the last event time
    pub fn last_time(&self) -> Option<u64> {
        self.events.keys().next_back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_within_tick() {
        let mut queue = EventQueue::new();
        queue.insert(Event::pitch_bend(100, 1, 8192));
        queue.insert(Event::note_on(100, 1, Pitch::new(4, 0), 100));
        queue.insert(Event::pitch_bend(100, 1, 9000));

        let at_100 = queue.at_time(100).unwrap();
        assert_eq!(at_100[0].data, EventData::PitchBend { value: 8192 });
        assert_eq!(
            at_100[1].data,
            EventData::NoteOn {
                pitch: Pitch::new(4, 0),
                velocity: 100
            }
        );
        assert_eq!(at_100[2].data, EventData::PitchBend { value: 9000 });
    }

    #[test]
    fn test_iteration_ascends_across_ticks() {
        let mut queue = EventQueue::new();
        queue.insert(Event::controller(480, 2, 7, 100));
        queue.insert(Event::controller(0, 1, 7, 100));
        queue.insert(Event::controller(240, 1, 10, 64));

        let times: Vec<u64> = queue.iter().map(|e| e.time).collect();
        assert_eq!(times, vec![0, 240, 480]);
        assert_eq!(queue.last_time(), Some(480));
    }

    #[test]
    fn test_empty_queue() {
        let queue = EventQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.last_time(), None);
        assert_eq!(queue.iter().count(), 0);
    }
}
