//! SMF file reader and parser

use super::header::{HEADER_SIZE, HEADER_TAG, TRACK_TAG};
use super::track::status;
use super::vlq;
use crate::error::{Error, Result};
use serde::Serialize;

/// Parsed SMF header information
#[derive(Debug, Clone, Default)]
pub struct SmfHeader {
    pub format: u16,
    pub track_count: u16,
    /// Raw division field; bit 15 clear means ticks per quarter note
    pub division: u16,
}

/// A parsed event with its delta time
#[derive(Debug, Clone)]
pub struct TrackEvent {
    pub delta: u64,
    pub event: SmfEvent,
}

/// A parsed channel, meta, or sysex event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SmfEvent {
    /// Key press
    NoteOn { channel: u8, note: u8, velocity: u8 },
    /// Key release
    NoteOff { channel: u8, note: u8, velocity: u8 },
    /// Continuous controller change
    Controller { channel: u8, controller: u8, value: u8 },
    /// 14-bit pitch bend, center 8192
    PitchBend { channel: u8, value: u16 },
    /// End-of-track marker
    EndOfTrack,
    /// Any other meta event
    Meta { meta_type: u8, data: Vec<u8> },
    /// System exclusive block
    SysEx { data: Vec<u8> },
    /// Channel or system message this tool does not model
    Unknown { status: u8, data: Vec<u8> },
}

/// SMF file reader
pub struct SmfReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SmfReader<'a> {
    /// Create a new reader from raw SMF data
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Check if we've reached the end of data
    pub fn is_eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Read a single byte
    fn read_u8(&mut self) -> Result<u8> {
        if self.pos >= self.data.len() {
            return Err(Error::SmfParse("Unexpected end of data".into()));
        }
        let b = self.data[self.pos];
        self.pos += 1;
        Ok(b)
    }

    /// Read a 16-bit big-endian value
    fn read_u16_be(&mut self) -> Result<u16> {
        let hi = self.read_u8()? as u16;
        let lo = self.read_u8()? as u16;
        Ok((hi << 8) | lo)
    }

    /// Read a 32-bit big-endian value
    fn read_u32_be(&mut self) -> Result<u32> {
        let hi = self.read_u16_be()? as u32;
        let lo = self.read_u16_be()? as u32;
        Ok((hi << 16) | lo)
    }

    /// Read bytes into a buffer
    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        if self.pos + len > self.data.len() {
            return Err(Error::SmfParse("Unexpected end of data".into()));
        }
        let bytes = self.data[self.pos..self.pos + len].to_vec();
        self.pos += len;
        Ok(bytes)
    }

    /// Read a variable-length quantity
    fn read_vlq(&mut self) -> Result<u64> {
        let (value, consumed) = vlq::decode(&self.data[self.pos..])
            .ok_or_else(|| Error::SmfParse("Invalid variable-length quantity".into()))?;
        self.pos += consumed;
        Ok(value)
    }

    /// Validate the file tag and parse the header chunk
    pub fn parse_header(&mut self) -> Result<SmfHeader> {
        if self.data.len() < HEADER_SIZE {
            return Err(Error::SmfParse("File too small for SMF header".into()));
        }
        if &self.data[0..4] != HEADER_TAG {
            return Err(Error::SmfParse("Invalid SMF header tag".into()));
        }

        self.pos = 4;
        let length = self.read_u32_be()?;
        if length < 6 {
            return Err(Error::SmfParse("SMF header chunk too short".into()));
        }
        let format = self.read_u16_be()?;
        let track_count = self.read_u16_be()?;
        let division = self.read_u16_be()?;

        // Skip any extra header payload
        self.pos = 8 + length as usize;

        Ok(SmfHeader {
            format,
            track_count,
            division,
        })
    }

    /// Parse all track chunks the header declares
    pub fn parse_tracks(&mut self, header: &SmfHeader) -> Result<Vec<Vec<TrackEvent>>> {
        let mut tracks = Vec::with_capacity(header.track_count as usize);
        for _ in 0..header.track_count {
            tracks.push(self.parse_track()?);
        }
        Ok(tracks)
    }

    /// Parse one track chunk from the current position
    pub fn parse_track(&mut self) -> Result<Vec<TrackEvent>> {
        let tag = self.read_bytes(4)?;
        if &tag[..] != TRACK_TAG {
            return Err(Error::SmfParse("Invalid track chunk tag".into()));
        }
        let length = self.read_u32_be()? as usize;
        if self.pos + length > self.data.len() {
            return Err(Error::SmfParse("Track chunk extends past end of file".into()));
        }
        let end = self.pos + length;

        let mut events = Vec::new();
        let mut running_status = 0u8;

        while self.pos < end {
            let delta = self.read_vlq()?;
            let event = self.parse_event(&mut running_status)?;
            let end_of_track = matches!(event, SmfEvent::EndOfTrack);
            events.push(TrackEvent { delta, event });
            if end_of_track {
                break;
            }
        }

        // Land on the declared boundary whether or not the marker came early
        self.pos = end;
        Ok(events)
    }

    /// Parse one event, honoring running status
    fn parse_event(&mut self, running_status: &mut u8) -> Result<SmfEvent> {
        let mut event_status = self.read_u8()?;

        if event_status & 0x80 == 0 {
            // Data byte: the previous channel status repeats
            if *running_status == 0 {
                return Err(Error::SmfParse("Data byte without a running status".into()));
            }
            self.pos -= 1;
            event_status = *running_status;
        }

        match event_status {
            status::META => {
                *running_status = 0;
                self.parse_meta()
            }
            0xF0 | 0xF7 => {
                *running_status = 0;
                let length = self.read_vlq()? as usize;
                Ok(SmfEvent::SysEx {
                    data: self.read_bytes(length)?,
                })
            }
            0xF1..=0xF6 | 0xF8..=0xFE => {
                *running_status = 0;
                Ok(SmfEvent::Unknown {
                    status: event_status,
                    data: Vec::new(),
                })
            }
            _ => {
                *running_status = event_status;
                self.parse_channel_event(event_status)
            }
        }
    }

    /// Parse a channel voice event
    fn parse_channel_event(&mut self, event_status: u8) -> Result<SmfEvent> {
        let channel = event_status & 0x0F;
        match event_status & 0xF0 {
            status::NOTE_OFF => Ok(SmfEvent::NoteOff {
                channel,
                note: self.read_u8()?,
                velocity: self.read_u8()?,
            }),
            status::NOTE_ON => Ok(SmfEvent::NoteOn {
                channel,
                note: self.read_u8()?,
                velocity: self.read_u8()?,
            }),
            status::CONTROLLER => Ok(SmfEvent::Controller {
                channel,
                controller: self.read_u8()?,
                value: self.read_u8()?,
            }),
            status::PITCH_BEND => {
                let low = self.read_u8()? as u16;
                let high = self.read_u8()? as u16;
                Ok(SmfEvent::PitchBend {
                    channel,
                    value: low | (high << 7),
                })
            }
            opcode => {
                let data = self.read_bytes(channel_data_size(opcode))?;
                Ok(SmfEvent::Unknown {
                    status: event_status,
                    data,
                })
            }
        }
    }

    /// Parse a meta event (type, VLQ length, payload)
    fn parse_meta(&mut self) -> Result<SmfEvent> {
        let meta_type = self.read_u8()?;
        let length = self.read_vlq()? as usize;
        let data = self.read_bytes(length)?;

        if meta_type == status::META_END_OF_TRACK {
            Ok(SmfEvent::EndOfTrack)
        } else {
            Ok(SmfEvent::Meta { meta_type, data })
        }
    }
}

/// Data bytes following a channel status byte
fn channel_data_size(opcode: u8) -> usize {
    match opcode {
        // Program change and channel pressure carry one byte
        0xC0 | 0xD0 => 1,
        _ => 2,
    }
}
