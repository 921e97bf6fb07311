//! Score compiler - parses text scores and generates MIDI events

pub mod event;
pub mod pitch;
pub mod spectral;

use crate::error::{Error, Result};
use crate::smf::{SmfWriter, TrackChunk};
use event::{Event, EventData, EventQueue};
use pitch::{map_frequency, Pitch, BEND_CENTER, BEND_MAX, FREQ_MAX, FREQ_MIN};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;
use std::str::FromStr;

/// Directive enabling spectral expansion
pub const SPECTRAL_DIRECTIVE: &str = "spectral-mode";

/// Whitespace-delimited token reader tracking line numbers
struct TokenReader<R: Read> {
    lines: Lines<BufReader<R>>,
    pending: VecDeque<String>,
    line: usize,
}

impl<R: Read> TokenReader<R> {
    fn new(input: R) -> Self {
        Self {
            lines: BufReader::new(input).lines(),
            pending: VecDeque::new(),
            line: 0,
        }
    }

    /// Next token, or None once input is exhausted
    fn next_token(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            match self.lines.next() {
                Some(line) => {
                    let line = line?;
                    self.line += 1;

                    // Strip UTF-8 BOM
                    let line = line.trim_start_matches('\u{FEFF}');
                    self.pending
                        .extend(line.split_whitespace().map(str::to_string));
                }
                None => return Ok(None),
            }
        }
    }

    /// Next token, failing if input ends first
    fn expect_token(&mut self, what: &str) -> Result<String> {
        self.next_token()?.ok_or_else(|| Error::Parse {
            line: self.line,
            message: format!("missing {}", what),
        })
    }

    /// Parse the next token as a number
    fn field<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self.expect_token(what)?;
        token.parse().map_err(|_| Error::Parse {
            line: self.line,
            message: format!("invalid {}: '{}'", what, token),
        })
    }
}

/// Main compiler state
pub struct Compiler {
    /// Parsed events in time order
    pub events: EventQueue,
    /// Highest output track index seen
    pub track_count: u32,
    /// Spectral expansion active for subsequent lines
    pub spectral: bool,
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            events: EventQueue::new(),
            track_count: 0,
            spectral: false,
        }
    }

    /// Compile a text score to an SMF file
    pub fn compile<R: Read>(&mut self, input: R, output: &Path) -> Result<()> {
        self.read_input(input)?;
        println!("txt input : ok");

        let mut writer = SmfWriter::new(output)?;
        self.write_output(&mut writer)?;
        println!("mid output : ok");

        Ok(())
    }

    /// Compile a score file to an SMF file
    pub fn compile_file(&mut self, input: &Path, output: &Path) -> Result<()> {
        let file = File::open(input).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to open '{}': {}", input.display(), e),
            ))
        })?;
        self.compile(file, output)
    }

    /// Read and parse a text score, accumulating events
    pub fn read_input<R: Read>(&mut self, input: R) -> Result<()> {
        let mut tokens = TokenReader::new(input);

        while let Some(token) = tokens.next_token()? {
            match token.chars().next().map(|c| c.to_ascii_uppercase()) {
                Some('N') => self.parse_note(&mut tokens)?,
                Some('C') => self.parse_controller(&mut tokens)?,
                Some('P') => self.parse_bend(&mut tokens)?,
                Some('H') => self.parse_frequency(&mut tokens)?,
                Some('_') => Self::skip_comment(&mut tokens)?,
                Some('#') => self.parse_directive(&mut tokens)?,
                _ => {
                    return Err(Error::Parse {
                        line: tokens.line,
                        message: format!("unhandled event type '{}'", token),
                    })
                }
            }
        }

        Ok(())
    }

    /// N <start> <octave> <semitone> <velocity> <duration> <track>
    fn parse_note<R: Read>(&mut self, tokens: &mut TokenReader<R>) -> Result<()> {
        let start: u64 = tokens.field("start tick")?;
        let octave: u8 = tokens.field("octave")?;
        let semitone: u8 = tokens.field("semitone")?;
        let velocity: u8 = tokens.field("velocity")?;
        let duration: u64 = tokens.field("duration")?;
        let track = self.event_track(tokens)?;

        if self.spectral {
            self.insert_indicator(start, duration, velocity, track + 1, spectral::PLAIN_INDICATOR);
        }
        self.insert_note(start, duration, track, Pitch::new(octave, semitone), velocity);

        self.update_track_count(track);
        Ok(())
    }

    /// C <start> <controller> <value> <track>
    fn parse_controller<R: Read>(&mut self, tokens: &mut TokenReader<R>) -> Result<()> {
        let start: u64 = tokens.field("start tick")?;
        let controller: u8 = tokens.field("controller number")?;
        let value: u8 = tokens.field("controller value")?;
        let track = self.event_track(tokens)?;

        self.events
            .insert(Event::controller(start, track, controller, value));

        self.update_track_count(track);
        Ok(())
    }

    /// P <start> <value> <track>
    fn parse_bend<R: Read>(&mut self, tokens: &mut TokenReader<R>) -> Result<()> {
        let start: u64 = tokens.field("start tick")?;
        let value: i64 = tokens.field("bend value")?;
        let track = self.event_track(tokens)?;

        let value = value.clamp(0, BEND_MAX as i64) as u16;
        self.events.insert(Event::pitch_bend(start, track, value));

        self.update_track_count(track);
        Ok(())
    }

    /// H <start> <frequency> <velocity> <duration> <track>
    fn parse_frequency<R: Read>(&mut self, tokens: &mut TokenReader<R>) -> Result<()> {
        let start: u64 = tokens.field("start tick")?;
        let frequency: f32 = tokens.field("frequency")?;
        let velocity: u8 = tokens.field("velocity")?;
        let duration: u64 = tokens.field("duration")?;
        let track = self.event_track(tokens)?;

        let mapping = map_frequency(frequency.clamp(FREQ_MIN, FREQ_MAX));

        if self.spectral {
            self.insert_indicator(
                start,
                duration,
                velocity,
                track + 1,
                spectral::bend_indicator(mapping.bend),
            );
        }
        self.insert_note(start, duration, track, mapping.pitch, velocity);

        // The micro-tonal bend follows the reset/NoteOn at the same tick
        self.events
            .insert(Event::pitch_bend(start, track, mapping.bend));

        self.update_track_count(track);
        Ok(())
    }

    /// Discard comment tokens until the closing underscore
    fn skip_comment<R: Read>(tokens: &mut TokenReader<R>) -> Result<()> {
        while let Some(token) = tokens.next_token()? {
            if token == "_" {
                break;
            }
        }
        Ok(())
    }

    /// # <directive>
    fn parse_directive<R: Read>(&mut self, tokens: &mut TokenReader<R>) -> Result<()> {
        if let Some(directive) = tokens.next_token()? {
            if directive == SPECTRAL_DIRECTIVE {
                self.spectral = true;
            }
        }
        Ok(())
    }

    /// Read a track field and apply the spectral rewrite
    fn event_track<R: Read>(&self, tokens: &mut TokenReader<R>) -> Result<u32> {
        let track: u32 = tokens.field("track")?;
        if track == 0 {
            return Err(Error::Parse {
                line: tokens.line,
                message: "track must be at least 1".into(),
            });
        }
        Ok(if self.spectral {
            spectral::primary_track(track)
        } else {
            track
        })
    }

    /// Insert the three events of one note: bend reset, NoteOn, and
    /// NoteOff. The reset shares the NoteOn tick and stays ahead of it.
    fn insert_note(&mut self, start: u64, duration: u64, track: u32, pitch: Pitch, velocity: u8) {
        self.events.insert(Event::pitch_bend(start, track, BEND_CENTER));
        self.events.insert(Event::note_on(start, track, pitch, velocity));
        self.events
            .insert(Event::note_off(start + duration, track, pitch, velocity));
    }

    /// Insert the indicator note pair on the paired track
    fn insert_indicator(
        &mut self,
        start: u64,
        duration: u64,
        velocity: u8,
        track: u32,
        pitch: Pitch,
    ) {
        self.events.insert(Event::note_on(start, track, pitch, velocity));
        self.events
            .insert(Event::note_off(start + duration, track, pitch, velocity));
    }

    /// Raise the running track maximum; spectral pairs round it up
    /// to even so the indicator track is counted.
    fn update_track_count(&mut self, track: u32) {
        if track > self.track_count {
            self.track_count = track;
            if self.spectral {
                self.track_count += self.track_count % 2;
            }
        }
    }

    /// Encode the event queue as one chunk per track
    fn write_output(&self, writer: &mut SmfWriter) -> Result<()> {
        writer.write_header(self.track_count as u16)?;

        for track in 1..=self.track_count {
            let mut chunk = TrackChunk::new();
            let mut last_time = 0;

            for event in self.events.iter().filter(|e| e.track == track) {
                chunk.write_delta(event.time - last_time)?;
                last_time = event.time;

                match event.data {
                    EventData::NoteOn { pitch, velocity } => {
                        chunk.write_note_on(pitch.note_number(), velocity);
                    }
                    EventData::NoteOff { pitch, velocity } => {
                        chunk.write_note_off(pitch.note_number(), velocity);
                    }
                    EventData::Controller { controller, value } => {
                        chunk.write_controller(controller, value);
                    }
                    EventData::PitchBend { value } => {
                        chunk.write_pitch_bend(value);
                    }
                }
            }

            writer.write_track(&chunk.finish())?;
        }

        writer.finalize()?;
        Ok(())
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
