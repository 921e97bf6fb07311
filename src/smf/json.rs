//! JSON serialization types for SMF data

use super::reader::{SmfEvent, SmfHeader, TrackEvent};
use serde::Serialize;

/// Top-level JSON structure for an SMF file
#[derive(Debug, Clone, Serialize)]
pub struct SmfJson {
    /// SMF format (0, 1, or 2)
    pub format: u16,
    /// Number of track chunks
    pub track_count: u16,
    /// Timing division (ticks per quarter note when bit 15 is clear)
    pub division: u16,
    /// Per-track event lists
    pub tracks: Vec<TrackJson>,
}

/// JSON representation of one track chunk
#[derive(Debug, Clone, Serialize)]
pub struct TrackJson {
    pub events: Vec<TrackEventJson>,
}

/// JSON representation of one event with its timing
#[derive(Debug, Clone, Serialize)]
pub struct TrackEventJson {
    /// Ticks since the previous event on this track
    pub delta: u64,
    /// Absolute tick time
    pub time: u64,
    /// Scientific pitch name when the event carries a note number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_name: Option<String>,
    #[serde(flatten)]
    pub event: SmfEvent,
}

impl SmfJson {
    /// Create an SmfJson from parsed SMF data
    pub fn new(header: &SmfHeader, tracks: Vec<Vec<TrackEvent>>) -> Self {
        Self {
            format: header.format,
            track_count: header.track_count,
            division: header.division,
            tracks: tracks.into_iter().map(TrackJson::from).collect(),
        }
    }
}

impl From<Vec<TrackEvent>> for TrackJson {
    fn from(events: Vec<TrackEvent>) -> Self {
        let mut time = 0;
        let events = events
            .into_iter()
            .map(|te| {
                time += te.delta;
                let note_name = match &te.event {
                    SmfEvent::NoteOn { note, .. } | SmfEvent::NoteOff { note, .. } => {
                        Some(format_note(*note))
                    }
                    _ => None,
                };
                TrackEventJson {
                    delta: te.delta,
                    time,
                    note_name,
                    event: te.event,
                }
            })
            .collect();
        Self { events }
    }
}

/// Format a note number in scientific pitch notation (60 = C4)
fn format_note(note: u8) -> String {
    const NAMES: [&str; 12] = [
        "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
    ];
    format!("{}{}", NAMES[(note % 12) as usize], (note / 12) as i32 - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_note() {
        assert_eq!(format_note(60), "C4");
        assert_eq!(format_note(69), "A4");
        assert_eq!(format_note(107), "B7");
        assert_eq!(format_note(0), "C-1");
    }
}
