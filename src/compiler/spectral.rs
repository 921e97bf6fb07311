//! Spectral notation expansion
//!
//! In spectral mode every source track becomes a pair: the odd track
//! carries the real events, the even track above it carries an
//! "indicator" note describing what the real note is. Discrete notes
//! get a fixed B4 indicator; frequency notes get an indicator keyed
//! on their computed bend value.

use super::pitch::Pitch;

/// Indicator pitch for discrete notes (B4)
pub const PLAIN_INDICATOR: Pitch = Pitch {
    octave: 4,
    semitone: 11,
};

/// Rewrite a source track index onto its primary output track; the
/// paired indicator track is the next index up.
pub fn primary_track(track: u32) -> u32 {
    track * 2 - 1
}

/// Indicator pitch for frequency notes.
///
/// Fixed 19-bucket table over the bend value, G3 through D6 with B4
/// at the exact center. The bucket boundaries are given constants,
/// not derived from the bend arithmetic.
pub fn bend_indicator(bend: u16) -> Pitch {
    match bend {
        0..=6144 => Pitch::new(3, 7),      // G3
        6145..=6400 => Pitch::new(3, 9),   // A3
        6401..=6656 => Pitch::new(3, 11),  // B3
        6657..=6912 => Pitch::new(4, 0),   // C4
        6913..=7168 => Pitch::new(4, 2),   // D4
        7169..=7424 => Pitch::new(4, 4),   // E4
        7425..=7680 => Pitch::new(4, 5),   // F4
        7681..=7936 => Pitch::new(4, 7),   // G4
        7937..=8191 => Pitch::new(4, 9),   // A4
        8192 => Pitch::new(4, 11),         // B4
        8193..=8447 => Pitch::new(5, 0),   // C5
        8448..=8703 => Pitch::new(5, 2),   // D5
        8704..=8959 => Pitch::new(5, 4),   // E5
        8960..=9215 => Pitch::new(5, 5),   // F5
        9216..=9471 => Pitch::new(5, 7),   // G5
        9472..=9727 => Pitch::new(5, 9),   // A5
        9728..=9983 => Pitch::new(5, 11),  // B5
        9984..=10238 => Pitch::new(6, 0),  // C6
        10239.. => Pitch::new(6, 2),       // D6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_track() {
        assert_eq!(primary_track(1), 1);
        assert_eq!(primary_track(2), 3);
        assert_eq!(primary_track(5), 9);
    }

    #[test]
    fn test_center_bucket_is_exact() {
        assert_eq!(bend_indicator(8191), Pitch::new(4, 9));
        assert_eq!(bend_indicator(8192), PLAIN_INDICATOR);
        assert_eq!(bend_indicator(8193), Pitch::new(5, 0));
    }

    #[test]
    fn test_bucket_boundaries() {
        let edges: [(u16, Pitch); 19] = [
            (0, Pitch::new(3, 7)),
            (6145, Pitch::new(3, 9)),
            (6401, Pitch::new(3, 11)),
            (6657, Pitch::new(4, 0)),
            (6913, Pitch::new(4, 2)),
            (7169, Pitch::new(4, 4)),
            (7425, Pitch::new(4, 5)),
            (7681, Pitch::new(4, 7)),
            (7937, Pitch::new(4, 9)),
            (8192, Pitch::new(4, 11)),
            (8193, Pitch::new(5, 0)),
            (8448, Pitch::new(5, 2)),
            (8704, Pitch::new(5, 4)),
            (8960, Pitch::new(5, 5)),
            (9216, Pitch::new(5, 7)),
            (9472, Pitch::new(5, 9)),
            (9728, Pitch::new(5, 11)),
            (9984, Pitch::new(6, 0)),
            (10239, Pitch::new(6, 2)),
        ];

        for (bend, pitch) in edges {
            assert_eq!(bend_indicator(bend), pitch, "lower edge at {}", bend);
        }

        // Upper edges sit one below the next bucket's lower edge
        for window in edges.windows(2) {
            let (next_edge, _) = window[1];
            let (_, pitch) = window[0];
            assert_eq!(bend_indicator(next_edge - 1), pitch, "upper edge at {}", next_edge - 1);
        }

        assert_eq!(bend_indicator(16383), Pitch::new(6, 2));
    }
}
