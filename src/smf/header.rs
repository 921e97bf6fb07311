//! SMF header chunk definitions

/// Header chunk tag
pub const HEADER_TAG: &[u8; 4] = b"MThd";

/// Track chunk tag
pub const TRACK_TAG: &[u8; 4] = b"MTrk";

/// Header chunk payload length
pub const HEADER_LENGTH: u32 = 6;

/// SMF format 1: one or more synchronous tracks
pub const FORMAT: u16 = 1;

/// Timing resolution in ticks per quarter note
pub const TICKS_PER_QUARTER: u16 = 240;

/// Total header chunk size in bytes
pub const HEADER_SIZE: usize = 14;

/// Build the 14-byte header chunk, all fields big-endian
pub fn build_header(track_count: u16) -> [u8; HEADER_SIZE] {
    let mut data = [0u8; HEADER_SIZE];
    data[0..4].copy_from_slice(HEADER_TAG);
    data[4..8].copy_from_slice(&HEADER_LENGTH.to_be_bytes());
    data[8..10].copy_from_slice(&FORMAT.to_be_bytes());
    data[10..12].copy_from_slice(&track_count.to_be_bytes());
    data[12..14].copy_from_slice(&TICKS_PER_QUARTER.to_be_bytes());
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_bytes() {
        let header = build_header(1);
        assert_eq!(
            header,
            [0x4D, 0x54, 0x68, 0x64, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01, 0x00, 0x01, 0x00, 0xF0]
        );
    }

    #[test]
    fn test_track_count_is_big_endian() {
        let header = build_header(0x0102);
        assert_eq!(&header[10..12], &[0x01, 0x02]);
    }
}
