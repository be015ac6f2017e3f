use crate::config::DecoderConfig;
use crate::diagnostics::{DecodeWarning, Diagnostics, StreamKind};
use crate::parser::byte_cursor::ByteCursor;
use crate::parser::run_length::{decode_run_length, StreamEnd};
use crate::parser::song_parser::BarTypes;

/// Decode the bar type stream.
///
/// The first byte is the bar counter start. A gap moves the counter by the gap,
/// an event moves it by one and then stores the value into the new bar.
pub fn parse_bar_types(
    cursor: &mut ByteCursor,
    config: &DecoderConfig,
    diagnostics: &mut dyn Diagnostics,
) -> BarTypes {
    log::debug!("Parsing bar types");
    let max_bars = config.max_bars;
    let mut bar_types = BarTypes::new(max_bars);
    let start_offset = cursor.position();
    let Ok(start_bar) = cursor.read_u8() else {
        diagnostics.report(DecodeWarning::StreamTruncated {
            stream: StreamKind::BarTypes,
            offset: start_offset,
            position: 0,
            limit: max_bars,
        });
        return bar_types;
    };
    log::debug!("Starting bar {start_bar}");

    let mut overflow = Vec::new();
    let end = decode_run_length(cursor, usize::from(start_bar), max_bars, |position, value| {
        let bar = position + 1;
        if bar_types.set(bar, value) {
            log::debug!("bar type bar: {bar} val: {value}");
        } else {
            overflow.push((bar, value));
        }
    });

    for (bar, value) in overflow {
        diagnostics.report(DecodeWarning::BarOutOfRange {
            bar,
            value,
            max_bars,
        });
    }
    if let StreamEnd::Truncated { offset, position } = end {
        diagnostics.report(DecodeWarning::StreamTruncated {
            stream: StreamKind::BarTypes,
            offset,
            position,
            limit: max_bars,
        });
    }
    bar_types
}
