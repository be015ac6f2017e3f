//! The "skip-or-event" stream encoding shared by the bar type and chord streams.
//!
//! Each record starts with a value byte. A zero value is followed by a gap byte
//! and moves the position forward by that gap, any other value is an event at
//! the current position which then moves forward by one.

use crate::parser::byte_cursor::ByteCursor;

/// How a stream stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The position reached the limit
    Complete { position: usize },
    /// The buffer ran out at `offset` while the position was still below the limit
    Truncated { offset: usize, position: usize },
}

impl StreamEnd {
    pub const fn position(&self) -> usize {
        match self {
            StreamEnd::Complete { position } | StreamEnd::Truncated { position, .. } => *position,
        }
    }

    pub const fn is_truncated(&self) -> bool {
        matches!(self, StreamEnd::Truncated { .. })
    }
}

/// Decode one stream from `start` until the position reaches `limit`.
///
/// `on_event` receives the position of the event and its value.
pub fn decode_run_length<F>(
    cursor: &mut ByteCursor,
    start: usize,
    limit: usize,
    mut on_event: F,
) -> StreamEnd
where
    F: FnMut(usize, u8),
{
    let mut position = start;
    while position < limit {
        let record_offset = cursor.position();
        let Ok(value) = cursor.read_u8() else {
            return StreamEnd::Truncated {
                offset: record_offset,
                position,
            };
        };
        if value == 0 {
            let Ok(gap) = cursor.read_u8() else {
                return StreamEnd::Truncated {
                    offset: cursor.position(),
                    position,
                };
            };
            position += usize::from(gap);
        } else {
            on_event(position, value);
            position += 1;
        }
    }
    StreamEnd::Complete { position }
}

/// Encode `(position, value)` events as a stream running from `start` to `limit`.
#[cfg(test)]
pub fn encode_run_length(start: usize, limit: usize, events: &[(usize, u8)]) -> Vec<u8> {
    fn push_gap(out: &mut Vec<u8>, mut gap: usize) {
        while gap > 0 {
            let step = gap.min(usize::from(u8::MAX));
            out.push(0);
            out.push(step as u8);
            gap -= step;
        }
    }

    let mut out = Vec::new();
    let mut position = start;
    for &(event_position, value) in events {
        assert!(value != 0 && event_position >= position && event_position < limit);
        push_gap(&mut out, event_position - position);
        out.push(value);
        position = event_position + 1;
    }
    push_gap(&mut out, limit.saturating_sub(position));
    out
}
