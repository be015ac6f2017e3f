use crate::config::DecoderConfig;
use crate::diagnostics::{DecodeWarning, Diagnostics, StreamKind};
use crate::parser::byte_cursor::ByteCursor;
use crate::parser::run_length::{decode_run_length, StreamEnd};
use crate::parser::song_parser::{BeatPosition, Chord, Chorus, TimeSignature, PITCH_CLASS_COUNT};
use crate::BiabError;

/// Chords plus what is derived from the chord streams
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordTrack {
    pub chords: Vec<Chord>,
    pub measure_count: u32,
    pub chorus: Option<Chorus>,
}

/// Split a root stream value into `(root, bass)`, bass is 0 when it is the root
pub fn decode_root_bass(value: u8) -> (u8, u8) {
    let classes = i32::from(PITCH_CLASS_COUNT);
    let root = value % PITCH_CLASS_COUNT;
    let shift = i32::from(value / PITCH_CLASS_COUNT);
    let bass = (i32::from(root) - 1 + shift).rem_euclid(classes) + 1;
    // bass lies in 1..=18
    let bass = bass as u8;
    if bass == root {
        (root, 0)
    } else {
        (root, bass)
    }
}

/// `ceil(max_beat / numerator) + 1`
pub fn measure_count(max_raw_beat: usize, time_signature: &TimeSignature) -> u32 {
    let beats_per_measure = usize::from(time_signature.numerator.max(1));
    let measures = max_raw_beat.div_ceil(beats_per_measure) + 1;
    u32::try_from(measures).unwrap_or(u32::MAX)
}

fn report_truncated(
    end: StreamEnd,
    stream: StreamKind,
    limit: usize,
    diagnostics: &mut dyn Diagnostics,
) {
    if let StreamEnd::Truncated { offset, position } = end {
        diagnostics.report(DecodeWarning::StreamTruncated {
            stream,
            offset,
            position,
            limit,
        });
    }
}

/// Encoded beat indexes never exceed `max_bars * 4 + 255`
fn raw_beat(position: usize) -> u32 {
    u32::try_from(position).unwrap_or(u32::MAX)
}

/// First pass, one chord per extension event
fn parse_extensions(
    cursor: &mut ByteCursor,
    time_signature: &TimeSignature,
    limit: usize,
    diagnostics: &mut dyn Diagnostics,
) -> Vec<Chord> {
    log::debug!("Parsing chord extensions");
    let mut chords = Vec::new();
    let end = decode_run_length(cursor, 0, limit, |position, value| {
        let raw_beat = raw_beat(position);
        let beat = BeatPosition::new(raw_beat, time_signature);
        chords.push(Chord::new(raw_beat, beat, value));
    });
    report_truncated(end, StreamKind::ChordExtensions, limit, diagnostics);
    chords
}

/// Second pass, roots are matched to the chords by index.
///
/// Returns the number of roots and the highest encoded root beat.
fn parse_roots(
    cursor: &mut ByteCursor,
    chords: &mut [Chord],
    time_signature: &TimeSignature,
    limit: usize,
    diagnostics: &mut dyn Diagnostics,
) -> (usize, usize) {
    log::debug!("Parsing chord roots");
    let mut roots = 0;
    let mut max_beat = 0;
    let mut warnings = Vec::new();
    let end = decode_run_length(cursor, 0, limit, |position, value| {
        let (root, bass) = decode_root_bass(value);
        let beat = BeatPosition::new(raw_beat(position), time_signature);
        match chords.get_mut(roots) {
            Some(chord) => {
                if chord.beat != beat {
                    warnings.push(DecodeWarning::ChordBeatMismatch {
                        index: roots,
                        expected: chord.beat,
                        actual: beat,
                    });
                }
                chord.root = Some(root);
                chord.bass = bass;
            }
            None => warnings.push(DecodeWarning::OrphanRoot {
                value,
                raw_beat: position,
                extensions: chords.len(),
            }),
        }
        max_beat = max_beat.max(position);
        roots += 1;
    });
    for warning in warnings {
        diagnostics.report(warning);
    }
    report_truncated(end, StreamKind::ChordRoots, limit, diagnostics);
    (roots, max_beat)
}

fn read_chorus_bytes(cursor: &mut ByteCursor) -> Result<(u8, u8, u8), BiabError> {
    let start = cursor.read_u8()?;
    let end = cursor.read_u8()?;
    let repeats = cursor.read_u8()?;
    Ok((start, end, repeats))
}

/// Chorus range following the root stream, absent when start >= end
fn parse_chorus(cursor: &mut ByteCursor, diagnostics: &mut dyn Diagnostics) -> Option<Chorus> {
    // unknown flag byte, skipped when it is 1
    if cursor.peek(0).ok() == Some(1) {
        diagnostics.report(DecodeWarning::ReservedFlagSkipped {
            offset: cursor.position(),
        });
        cursor.advance(1).ok()?;
    }
    let offset = cursor.position();
    let Ok((start, end, repeats)) = read_chorus_bytes(cursor) else {
        diagnostics.report(DecodeWarning::ChorusTruncated { offset });
        return None;
    };
    log::debug!("Chorus start:{start} end:{end} repeats:{repeats}");
    (start < end).then_some(Chorus {
        start,
        end,
        repeats,
    })
}

/// Decode the chord extension stream, the chord root stream and the chorus trailer.
pub fn parse_chords(
    cursor: &mut ByteCursor,
    time_signature: &TimeSignature,
    config: &DecoderConfig,
    diagnostics: &mut dyn Diagnostics,
) -> ChordTrack {
    let limit = config.chord_beat_limit();
    let mut chords = parse_extensions(cursor, time_signature, limit, diagnostics);
    let (roots, max_beat) = parse_roots(cursor, &mut chords, time_signature, limit, diagnostics);

    if roots != chords.len() {
        diagnostics.report(DecodeWarning::ChordCountMismatch {
            roots,
            extensions: chords.len(),
        });
    }
    let measure_count = measure_count(max_beat, time_signature);
    let chorus = parse_chorus(cursor, diagnostics);

    ChordTrack {
        chords,
        measure_count,
        chorus,
    }
}
