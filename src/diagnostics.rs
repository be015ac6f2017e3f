//! Recoverable decoding conditions.
//!
//! Decoding keeps going when one of these is hit, the condition is forwarded
//! to a [`Diagnostics`] sink and attached to the resulting song.

use serde::Serialize;

use crate::parser::song_parser::BeatPosition;

/// Which run-length stream a warning refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StreamKind {
    BarTypes,
    ChordExtensions,
    ChordRoots,
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            StreamKind::BarTypes => "bar type",
            StreamKind::ChordExtensions => "chord extension",
            StreamKind::ChordRoots => "chord root",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum DecodeWarning {
    #[error("{stream} stream ends early at offset {offset} (position {position} of {limit})")]
    StreamTruncated {
        stream: StreamKind,
        offset: usize,
        position: usize,
        limit: usize,
    },

    #[error("bar type {value} for bar {bar} is beyond the bar table (size {max_bars})")]
    BarOutOfRange {
        bar: usize,
        value: u8,
        max_bars: usize,
    },

    #[error("inconsistent chord type and chord beat for chord {index}: extension at {expected}, root at {actual}")]
    ChordBeatMismatch {
        index: usize,
        expected: BeatPosition,
        actual: BeatPosition,
    },

    #[error("chord root {value} at beat {raw_beat} has no matching chord extension (extension count {extensions})")]
    OrphanRoot {
        value: u8,
        raw_beat: usize,
        extensions: usize,
    },

    #[error("chord parsing error: root count ({roots}) != extension count ({extensions})")]
    ChordCountMismatch { roots: usize, extensions: usize },

    #[error("skipping reserved flag byte 1 at offset {offset}")]
    ReservedFlagSkipped { offset: usize },

    #[error("chorus information truncated at offset {offset}")]
    ChorusTruncated { offset: usize },

    #[error("note event of length 0 at offset {offset}")]
    ZeroLengthNote { offset: usize },

    #[error("unknown event type 0x{status:02X} at offset {offset}")]
    UnknownEventType { status: u8, offset: usize },
}

/// Collaborator receiving recoverable conditions as they are found
pub trait Diagnostics {
    fn report(&mut self, warning: DecodeWarning);
}

impl Diagnostics for Vec<DecodeWarning> {
    fn report(&mut self, warning: DecodeWarning) {
        self.push(warning);
    }
}

/// Forwards every warning to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn report(&mut self, warning: DecodeWarning) {
        log::warn!("{warning}");
    }
}

/// Forwards to the injected sink and keeps a copy for the song
pub(crate) struct Reporter<'a> {
    sink: &'a mut dyn Diagnostics,
    seen: Vec<DecodeWarning>,
}

impl<'a> Reporter<'a> {
    pub fn new(sink: &'a mut dyn Diagnostics) -> Self {
        Self {
            sink,
            seen: Vec::new(),
        }
    }

    pub fn into_warnings(self) -> Vec<DecodeWarning> {
        self.seen
    }
}

impl Diagnostics for Reporter<'_> {
    fn report(&mut self, warning: DecodeWarning) {
        self.seen.push(warning.clone());
        self.sink.report(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reporter_forwards_and_keeps() {
        let mut sink: Vec<DecodeWarning> = Vec::new();
        let mut reporter = Reporter::new(&mut sink);
        reporter.report(DecodeWarning::ZeroLengthNote { offset: 12 });
        reporter.report(DecodeWarning::ChordCountMismatch {
            roots: 1,
            extensions: 2,
        });
        let kept = reporter.into_warnings();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept, sink);
    }

    #[test]
    fn test_warning_display() {
        let warning = DecodeWarning::ChordCountMismatch {
            roots: 3,
            extensions: 4,
        };
        assert_eq!(
            warning.to_string(),
            "chord parsing error: root count (3) != extension count (4)"
        );
        let warning = DecodeWarning::StreamTruncated {
            stream: StreamKind::ChordRoots,
            offset: 40,
            position: 8,
            limit: 1020,
        };
        assert_eq!(
            warning.to_string(),
            "chord root stream ends early at offset 40 (position 8 of 1020)"
        );
    }
}
