use crate::parser::byte_cursor::ByteCursor;
use crate::parser::key_table::lookup_key;
use crate::parser::song_parser::{SongHeader, Tempo, TimeSignature, STYLE_TIME_SIGNATURES};
use crate::BiabError;

/// Everything resolved from the fixed-layout header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub header: SongHeader,
    pub time_signature: TimeSignature,
    pub key_offset: i8,
}

/// Read one header field, a short buffer is reported against the field name
fn field<'a, T>(
    cursor: &mut ByteCursor<'a>,
    name: &'static str,
    read: impl FnOnce(&mut ByteCursor<'a>) -> Result<T, BiabError>,
) -> Result<T, BiabError> {
    let offset = cursor.position();
    read(cursor).map_err(|_| BiabError::HeaderTruncated {
        field: name,
        offset,
    })
}

/// Resolve the 1-based style byte read at `offset`
pub fn lookup_style(style_byte: u8, offset: usize) -> Result<(usize, TimeSignature), BiabError> {
    let index = i16::from(style_byte) - 1;
    usize::try_from(index)
        .ok()
        .and_then(|i| STYLE_TIME_SIGNATURES.get(i).map(|ts| (i, *ts)))
        .ok_or(BiabError::StyleOutOfRange {
            index,
            offset,
            table_len: STYLE_TIME_SIGNATURES.len(),
        })
}

/// Header layout:
/// `[version][title len][title][2 reserved][style][key][tempo][tempo high][1 reserved]`
pub fn parse_header(cursor: &mut ByteCursor) -> Result<HeaderInfo, BiabError> {
    log::debug!("Parsing header");
    let version = field(cursor, "version", ByteCursor::read_u8)?;
    let title_length = field(cursor, "title length", ByteCursor::read_u8)?;
    let title = field(cursor, "title", |c| c.read_string(usize::from(title_length)))?;
    log::debug!("Version: {version} title: {title:?}");
    field(cursor, "reserved", |c| c.advance(2))?;

    let style_offset = cursor.position();
    let style_byte = field(cursor, "style", ByteCursor::read_u8)?;
    let (style_index, time_signature) = lookup_style(style_byte, style_offset)?;
    log::debug!("Style: {style_index} time signature: {time_signature}");

    let key_offset_in_file = cursor.position();
    let key_index = field(cursor, "key", ByteCursor::read_u8)?;
    let key_offset = lookup_key(key_index, key_offset_in_file)?;
    log::debug!("Key: {key_index} circle of fifths offset: {key_offset}");

    let tempo_integer = field(cursor, "tempo", ByteCursor::read_u8)?;
    let tempo_fraction = field(cursor, "tempo fraction", ByteCursor::read_u8)?;
    let tempo = Tempo::from_bytes(tempo_integer, tempo_fraction);
    log::debug!("Tempo: {}", tempo.value);
    field(cursor, "reserved", |c| c.advance(1))?;

    Ok(HeaderInfo {
        header: SongHeader {
            version,
            title,
            style_index,
            key_index,
            tempo,
        },
        time_signature,
        key_offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(title: &str, style: u8, key: u8, tempo: (u8, u8)) -> Vec<u8> {
        let mut data = vec![0x44, title.len() as u8];
        data.extend_from_slice(title.as_bytes());
        data.extend_from_slice(&[0, 0, style, key, tempo.0, tempo.1, 0]);
        data
    }

    #[test]
    fn test_parse_header() {
        let data = header_bytes("Road Song", 8, 27, (200, 0));
        let mut cursor = ByteCursor::new(&data);
        let info = parse_header(&mut cursor).unwrap();
        assert_eq!(info.header.version, 0x44);
        assert_eq!(info.header.title, "Road Song");
        assert_eq!(info.header.style_index, 7);
        assert_eq!(info.time_signature, TimeSignature::new(3, 4));
        assert_eq!(info.header.key_index, 27);
        assert_eq!(info.key_offset, 0);
        assert_eq!(info.header.tempo.value, 200);
        assert_eq!(cursor.position(), data.len());
    }

    #[test]
    fn test_parse_header_empty_title() {
        let data = header_bytes("", 1, 0, (90, 0));
        let info = parse_header(&mut ByteCursor::new(&data)).unwrap();
        assert_eq!(info.header.title, "");
        assert_eq!(info.time_signature, TimeSignature::new(4, 4));
    }

    #[test]
    fn test_style_out_of_range() {
        for style in [0u8, 25, 200] {
            let data = header_bytes("A", style, 0, (120, 0));
            let err = parse_header(&mut ByteCursor::new(&data)).unwrap_err();
            assert!(
                matches!(err, BiabError::StyleOutOfRange { offset: 5, .. }),
                "style:{style} err:{err}"
            );
        }
        assert!(lookup_style(24, 0).is_ok());
    }

    #[test]
    fn test_key_out_of_range() {
        let data = header_bytes("A", 1, 35, (120, 0));
        let err = parse_header(&mut ByteCursor::new(&data)).unwrap_err();
        assert!(matches!(
            err,
            BiabError::KeyOutOfRange {
                index: 35,
                offset: 6,
                ..
            }
        ));
    }

    #[test]
    fn test_truncated_header() {
        let data = header_bytes("Title", 1, 0, (120, 0));
        for len in 0..data.len() {
            let err = parse_header(&mut ByteCursor::new(&data[..len])).unwrap_err();
            assert!(
                matches!(err, BiabError::HeaderTruncated { .. }),
                "len:{len} err:{err}"
            );
        }
    }

    #[test]
    fn test_title_length_beyond_buffer() {
        let data = [0x44, 10, b'A', b'B'];
        let err = parse_header(&mut ByteCursor::new(&data)).unwrap_err();
        assert!(matches!(
            err,
            BiabError::HeaderTruncated {
                field: "title",
                offset: 2
            }
        ));
    }
}
