//! Track chunk assembly

use super::header::TRACK_TAG;
use super::vlq;
use crate::error::Result;

/// MIDI status bytes (all on channel 0)
pub mod status {
    /// Key release
    pub const NOTE_OFF: u8 = 0x80;
    /// Key press
    pub const NOTE_ON: u8 = 0x90;
    /// Continuous controller change
    pub const CONTROLLER: u8 = 0xB0;
    /// 14-bit pitch bend
    pub const PITCH_BEND: u8 = 0xE0;
    /// Meta event introducer
    pub const META: u8 = 0xFF;
    /// End-of-track meta type
    pub const META_END_OF_TRACK: u8 = 0x2F;
}

/// Growable event buffer for one track chunk
#[derive(Debug, Default)]
pub struct TrackChunk {
    data: Vec<u8>,
}

impl TrackChunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a delta time
    pub fn write_delta(&mut self, delta: u64) -> Result<()> {
        self.data.extend_from_slice(&vlq::encode(delta)?);
        Ok(())
    }

    /// Append a NoteOn event
    pub fn write_note_on(&mut self, note: u8, velocity: u8) {
        self.data
            .extend_from_slice(&[status::NOTE_ON, note, velocity]);
    }

    /// Append a NoteOff event
    pub fn write_note_off(&mut self, note: u8, velocity: u8) {
        self.data
            .extend_from_slice(&[status::NOTE_OFF, note, velocity]);
    }

    /// Append a controller change
    pub fn write_controller(&mut self, controller: u8, value: u8) {
        self.data
            .extend_from_slice(&[status::CONTROLLER, controller, value]);
    }

    /// Append a pitch bend; the low 7 bits precede the high 7 bits
    pub fn write_pitch_bend(&mut self, value: u16) {
        self.data.extend_from_slice(&[
            status::PITCH_BEND,
            (value & 0x7F) as u8,
            (value >> 7) as u8,
        ]);
    }

    /// Terminate with the end-of-track marker and frame the payload
    /// as a tagged, length-prefixed chunk
    pub fn finish(mut self) -> Vec<u8> {
        self.data
            .extend_from_slice(&[0x00, status::META, status::META_END_OF_TRACK, 0x00]);

        let mut chunk = Vec::with_capacity(self.data.len() + 8);
        chunk.extend_from_slice(TRACK_TAG);
        chunk.extend_from_slice(&(self.data.len() as u32).to_be_bytes());
        chunk.extend_from_slice(&self.data);
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_bend_byte_order() {
        let mut chunk = TrackChunk::new();
        chunk.write_pitch_bend(8192);
        chunk.write_pitch_bend(16383);
        chunk.write_pitch_bend(0);

        let bytes = chunk.finish();
        assert_eq!(&bytes[8..11], &[0xE0, 0x00, 0x40]);
        assert_eq!(&bytes[11..14], &[0xE0, 0x7F, 0x7F]);
        assert_eq!(&bytes[14..17], &[0xE0, 0x00, 0x00]);
    }

    #[test]
    fn test_empty_chunk_is_end_marker_only() {
        let bytes = TrackChunk::new().finish();
        assert_eq!(
            bytes,
            vec![0x4D, 0x54, 0x72, 0x6B, 0x00, 0x00, 0x00, 0x04, 0x00, 0xFF, 0x2F, 0x00]
        );
    }

    #[test]
    fn test_note_sequence_bytes() {
        let mut chunk = TrackChunk::new();
        chunk.write_delta(0).unwrap();
        chunk.write_pitch_bend(8192);
        chunk.write_delta(0).unwrap();
        chunk.write_note_on(60, 100);
        chunk.write_delta(240).unwrap();
        chunk.write_note_off(60, 100);

        assert_eq!(
            chunk.finish(),
            vec![
                0x4D, 0x54, 0x72, 0x6B, // MTrk
                0x00, 0x00, 0x00, 0x11, // 17 payload bytes
                0x00, 0xE0, 0x00, 0x40, // bend reset
                0x00, 0x90, 0x3C, 0x64, // NoteOn C4
                0x81, 0x70, 0x80, 0x3C, 0x64, // NoteOff after 240 ticks
                0x00, 0xFF, 0x2F, 0x00, // end of track
            ]
        );
    }

    #[test]
    fn test_controller_bytes() {
        let mut chunk = TrackChunk::new();
        chunk.write_controller(7, 100);
        assert_eq!(&chunk.finish()[8..11], &[0xB0, 0x07, 0x64]);
    }
}
