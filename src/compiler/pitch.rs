//! Equal-tempered pitch table and frequency mapping

/// Lowest frequency accepted for mapping
pub const FREQ_MIN: f32 = 30.0;

/// Highest frequency accepted for mapping
pub const FREQ_MAX: f32 = 8346.0;

/// Pitch bend center (no deviation)
pub const BEND_CENTER: u16 = 8192;

/// Largest 14-bit pitch bend value
pub const BEND_MAX: u16 = 16383;

/// Note frequencies in Hz for 8 octaves of 12 semitones, plus one
/// ceiling entry used as the upper interpolation bound of the
/// highest semitone. Only the first 96 entries are match candidates.
pub const NOTE_FREQS: [f32; 97] = [
    // octave 0
    32.70, 34.65, 36.71, 38.89, 41.20, 43.65, 46.25, 49.00, 51.91, 55.00, 58.27, 61.74,
    // octave 1
    65.41, 69.30, 73.42, 77.78, 82.41, 87.31, 92.50, 98.00, 103.83, 110.00, 116.54, 123.47,
    // octave 2
    130.81, 138.59, 146.83, 155.56, 164.81, 174.61, 185.00, 196.00, 207.65, 220.00, 233.08,
    246.94,
    // octave 3
    261.63, 277.18, 293.66, 311.13, 329.63, 349.23, 369.99, 392.00, 415.30, 440.00, 466.16,
    493.88,
    // octave 4
    523.25, 554.37, 587.33, 622.25, 659.26, 698.46, 739.99, 783.99, 830.61, 880.00, 932.33,
    987.77,
    // octave 5
    1046.50, 1108.73, 1174.66, 1244.51, 1318.51, 1396.91, 1479.98, 1567.98, 1661.22, 1760.00,
    1864.66, 1975.53,
    // octave 6
    2093.00, 2217.46, 2349.32, 2489.02, 2637.02, 2793.83, 2959.96, 3135.96, 3322.44, 3520.00,
    3729.31, 3951.07,
    // octave 7
    4186.01, 4434.92, 4698.64, 4978.03, 5274.04, 5587.65, 5919.91, 6271.93, 6644.88, 7040.00,
    7458.62, 7902.13,
    // ceiling
    8346.00,
];

/// A note pitch as octave and semitone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pitch {
    /// Octave, 0-7
    pub octave: u8,
    /// Semitone within the octave, 0-11 (0 = C)
    pub semitone: u8,
}

impl Pitch {
    pub fn new(octave: u8, semitone: u8) -> Self {
        Self { octave, semitone }
    }

    /// MIDI note number: `semitone + (octave + 1) * 12`
    pub fn note_number(&self) -> u8 {
        (self.semitone as u32 + (self.octave as u32 + 1) * 12) as u8
    }
}

/// Result of mapping a frequency onto the tempered scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyMapping {
    /// Nearest tempered pitch
    pub pitch: Pitch,
    /// 14-bit bend expressing the residual deviation
    pub bend: u16,
}

/// Map a frequency in [FREQ_MIN, FREQ_MAX] to the nearest tempered
/// pitch and a bend value for the remainder.
///
/// The bend range is asymmetric: inputs below the matched pitch span
/// [4096, 8192], inputs above span [8192, 12287]. A bend range of 200
/// cents on the playback side is assumed; nothing in the output
/// configures it.
pub fn map_frequency(freq: f32) -> FrequencyMapping {
    // Strict less-than keeps the lowest entry on ties.
    let mut best = 0;
    let mut minimum = f32::MAX;
    for (i, &f) in NOTE_FREQS[..NOTE_FREQS.len() - 1].iter().enumerate() {
        let diff = (freq - f).abs();
        if diff < minimum {
            minimum = diff;
            best = i;
        }
    }

    let bend = if freq > NOTE_FREQS[best] {
        map_range(freq, NOTE_FREQS[best], NOTE_FREQS[best + 1], 8192.0, 12287.0)
    } else if best == 0 {
        map_range(freq, FREQ_MIN, NOTE_FREQS[0], 4096.0, 8192.0)
    } else {
        map_range(freq, NOTE_FREQS[best - 1], NOTE_FREQS[best], 4096.0, 8192.0)
    };

    FrequencyMapping {
        pitch: Pitch::new((best / 12) as u8, (best % 12) as u8),
        bend: bend as u16,
    }
}

/// Linearly map `value` from [istart, istop] onto [ostart, ostop]
fn map_range(value: f32, istart: f32, istop: f32, ostart: f32, ostop: f32) -> f32 {
    ostart + (ostop - ostart) * ((value - istart) / (istop - istart))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_entries_map_to_center() {
        for (i, &f) in NOTE_FREQS[..96].iter().enumerate() {
            let mapping = map_frequency(f);
            assert_eq!(mapping.bend, BEND_CENTER, "entry {} ({} Hz)", i, f);
            assert_eq!(mapping.pitch, Pitch::new((i / 12) as u8, (i % 12) as u8));
        }
    }

    #[test]
    fn test_frequency_above_matched_pitch() {
        // 450 Hz sits above A (440), partway toward 466.16
        let mapping = map_frequency(450.0);
        assert_eq!(mapping.pitch, Pitch::new(3, 9));
        assert_eq!(mapping.bend, 9757);
    }

    #[test]
    fn test_frequency_below_matched_pitch() {
        let mapping = map_frequency(435.0);
        assert_eq!(mapping.pitch, Pitch::new(3, 9));
        assert_eq!(mapping.bend, 7362);
    }

    #[test]
    fn test_lowest_entry_uses_floor_bound() {
        // Below the lowest table entry the interpolation runs from
        // FREQ_MIN, so the floor itself lands on the bottom bend.
        let mapping = map_frequency(FREQ_MIN);
        assert_eq!(mapping.pitch, Pitch::new(0, 0));
        assert_eq!(mapping.bend, 4096);
    }

    #[test]
    fn test_ceiling_maps_to_top_bend() {
        let mapping = map_frequency(FREQ_MAX);
        assert_eq!(mapping.pitch, Pitch::new(7, 11));
        assert_eq!(mapping.bend, 12287);
    }

    #[test]
    fn test_nearest_selection() {
        // 97 Hz: 1 Hz from G (98.00), 4.5 Hz from F# (92.50)
        assert_eq!(map_frequency(97.0).pitch, Pitch::new(1, 7));
        assert_eq!(map_frequency(97.0).bend, 7447);
        assert_eq!(map_frequency(100.0).pitch, Pitch::new(1, 7));
        assert_eq!(map_frequency(100.0).bend, 9596);
    }

    #[test]
    fn test_note_number() {
        assert_eq!(Pitch::new(4, 0).note_number(), 60);
        assert_eq!(Pitch::new(0, 0).note_number(), 12);
        assert_eq!(Pitch::new(7, 11).note_number(), 107);
        assert_eq!(Pitch::new(3, 9).note_number(), 57);
    }
}
