use crate::config::DecoderConfig;
use crate::parser::byte_cursor::ByteCursor;
use crate::parser::song_parser::StyleBlock;
use crate::BiabError;

/// Size of the footer holding the event table pointers
pub const FOOTER_SIZE: usize = 4;

/// Find the style block by scanning the whole buffer.
///
/// A candidate is a marker byte followed by a byte below `max_style_length_byte`,
/// accepted when the signature starts somewhere in the probe window after it.
/// Returns the offset of the name length byte.
pub fn find_style_block(data: &[u8], config: &DecoderConfig) -> Option<usize> {
    let signature = config.style_signature.as_bytes();
    data.iter()
        .enumerate()
        .filter(|(_, byte)| **byte == config.style_marker)
        .find_map(|(i, _)| {
            let length_byte = *data.get(i + 1)?;
            if length_byte >= config.max_style_length_byte {
                return None;
            }
            let probe_start = i + 2;
            let probe_end = probe_start + config.style_probe_window;
            (probe_start..probe_end)
                .any(|k| data.get(k..k + signature.len()) == Some(signature))
                .then_some(i + 1)
        })
}

/// Event table `(start, count)` from the last four bytes of the buffer
pub fn read_footer(data: &[u8]) -> Result<(u16, u16), BiabError> {
    let footer_offset = data
        .len()
        .checked_sub(FOOTER_SIZE)
        .ok_or(BiabError::OutOfBounds {
            offset: 0,
            requested: FOOTER_SIZE,
            len: data.len(),
        })?;
    let mut cursor = ByteCursor::at(data, footer_offset);
    let start = cursor.read_u16_le()?;
    let count = cursor.read_u16_le()?;
    Ok((start, count))
}

/// Locate the style block, read the style name and the footer pointers
pub fn parse_style_block(data: &[u8], config: &DecoderConfig) -> Result<StyleBlock, BiabError> {
    log::debug!("Scanning for style block");
    let offset = find_style_block(data, config).ok_or_else(|| BiabError::StyleBlockNotFound {
        marker: config.style_marker,
        signature: config.style_signature.clone(),
        len: data.len(),
    })?;
    log::debug!("Found a style file at {offset}");

    let mut cursor = ByteCursor::at(data, offset);
    let name_length = usize::from(cursor.read_u8()?) + 1;
    let name = cursor.read_string(name_length)?;

    let (event_table_start, event_table_count) = read_footer(data)?;
    log::debug!("Events found at {event_table_start} count {event_table_count}");

    Ok(StyleBlock {
        offset,
        name_length,
        name,
        event_table_start,
        event_table_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_footer(mut data: Vec<u8>, start: u16, count: u16) -> Vec<u8> {
        data.extend_from_slice(&start.to_le_bytes());
        data.extend_from_slice(&count.to_le_bytes());
        data
    }

    #[test]
    fn test_find_style_block() {
        let mut data = vec![0x00, 0x11, 0x22];
        data.extend_from_slice(b"\x42\x04Swing.STY");
        let config = DecoderConfig::default();
        assert_eq!(find_style_block(&data, &config), Some(4));
    }

    #[test]
    fn test_find_style_block_missing() {
        let config = DecoderConfig::default();
        assert_eq!(find_style_block(b"", &config), None);
        assert_eq!(find_style_block(b"\x42", &config), None);
        assert_eq!(find_style_block(b"\x42\x04Swing.ST", &config), None);
        assert_eq!(find_style_block(b"\x43\x04Swing.STY", &config), None);
    }

    #[test]
    fn test_find_style_block_length_byte_bound() {
        let config = DecoderConfig::default();
        assert_eq!(find_style_block(b"\x42\x10Swing.STY", &config), None);
        assert_eq!(find_style_block(b"\x42\x0FSwing.STY", &config), Some(1));
    }

    #[test]
    fn test_find_style_block_probe_window() {
        let config = DecoderConfig::default();
        // signature starting at the last probed offset
        let mut data = vec![0x42, 0x00];
        data.extend_from_slice(&[b'x'; 15]);
        data.extend_from_slice(b".STY");
        assert_eq!(find_style_block(&data, &config), Some(1));
        // one byte further is out of reach
        let mut data = vec![0x42, 0x00];
        data.extend_from_slice(&[b'x'; 16]);
        data.extend_from_slice(b".STY");
        assert_eq!(find_style_block(&data, &config), None);
    }

    #[test]
    fn test_find_style_block_skips_false_marker() {
        // 'B' in a title is a marker without a signature in reach
        let mut data = b"\x42\x01Bob".to_vec();
        data.extend_from_slice(&[0u8; 20]);
        data.extend_from_slice(b"\x42\x07ZZJAZZ.STY");
        let config = DecoderConfig::default();
        assert_eq!(find_style_block(&data, &config), Some(26));
    }

    #[test]
    fn test_parse_style_block() {
        let data = with_footer(b"\x00\x42\x09ZZJAZZ.STY\x00".to_vec(), 0x0102, 3);
        let block = parse_style_block(&data, &DecoderConfig::default()).unwrap();
        assert_eq!(block.offset, 2);
        assert_eq!(block.name_length, 10);
        assert_eq!(block.name, "ZZJAZZ.STY");
        assert_eq!(block.event_table_start, 0x0102);
        assert_eq!(block.event_table_count, 3);
    }

    #[test]
    fn test_parse_style_block_not_found() {
        let data = with_footer(vec![0u8; 32], 0, 0);
        let err = parse_style_block(&data, &DecoderConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            BiabError::StyleBlockNotFound {
                marker: 0x42,
                len: 36,
                ..
            }
        ));
    }

    #[test]
    fn test_read_footer() {
        assert_eq!(read_footer(&[9, 9, 0x34, 0x12, 0x02, 0x00]).unwrap(), (0x1234, 2));
        assert!(matches!(
            read_footer(&[1, 2, 3]),
            Err(BiabError::OutOfBounds { len: 3, .. })
        ));
    }
}
