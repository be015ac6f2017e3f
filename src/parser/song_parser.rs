use crate::config::DecoderConfig;
use crate::diagnostics::{DecodeWarning, Diagnostics, LogDiagnostics, Reporter};
use crate::midi::event_table::parse_event_table;
use crate::midi::midi_event::MidiEvent;
use crate::midi::midi_event::NoteEvent;
use crate::parser::bar_parser::parse_bar_types;
use crate::parser::byte_cursor::ByteCursor;
use crate::parser::chord_parser::parse_chords;
use crate::parser::header_parser::parse_header;
use crate::parser::style_locator::parse_style_block;
use crate::BiabError;
use serde::Serialize;
use std::path::Path;

/// Roots and basses are encoded over 18 pitch classes (enharmonic duplicates included)
pub const PITCH_CLASS_COUNT: u8 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSignature {
    pub numerator: u8,
    pub denominator: u8,
}

impl TimeSignature {
    pub const fn new(numerator: u8, denominator: u8) -> Self {
        TimeSignature {
            numerator,
            denominator,
        }
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        TimeSignature::new(4, 4)
    }
}

impl std::fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Time signature of each built-in style, indexed by style number
pub const STYLE_TIME_SIGNATURES: [TimeSignature; 24] = [
    TimeSignature::new(4, 4),  // jazz swing
    TimeSignature::new(12, 8), // country 12/8
    TimeSignature::new(4, 4),  // country 4/4
    TimeSignature::new(4, 4),  // bossa nova
    TimeSignature::new(4, 4),  // ethnic
    TimeSignature::new(4, 4),  // blues shuffle
    TimeSignature::new(4, 4),  // blues straight
    TimeSignature::new(3, 4),  // waltz
    TimeSignature::new(4, 4),  // pop ballad
    TimeSignature::new(4, 4),  // rock shuffle
    TimeSignature::new(4, 4),  // lite rock
    TimeSignature::new(4, 4),  // medium rock
    TimeSignature::new(4, 4),  // heavy rock
    TimeSignature::new(4, 4),  // miami rock
    TimeSignature::new(4, 4),  // milly pop
    TimeSignature::new(4, 4),  // funk
    TimeSignature::new(3, 4),  // jazz waltz
    TimeSignature::new(4, 4),  // rhumba
    TimeSignature::new(4, 4),  // cha cha
    TimeSignature::new(4, 4),  // bouncy
    TimeSignature::new(4, 4),  // irish
    TimeSignature::new(12, 8), // pop ballad 12/8
    TimeSignature::new(12, 8), // country 12/8 old
    TimeSignature::new(4, 4),  // reggae
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tempo {
    pub value: u16,
}

impl Tempo {
    /// Integer byte plus the second byte shifted left by 8
    pub fn from_bytes(integer: u8, fraction: u8) -> Self {
        Tempo {
            value: u16::from(integer) + (u16::from(fraction) << 8),
        }
    }

    pub fn bpm(&self) -> f64 {
        f64::from(self.value)
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Tempo { value: 120 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongHeader {
    pub version: u8,
    pub title: String,
    /// Zero based, the file stores it plus one
    pub style_index: usize,
    pub key_index: u8,
    pub tempo: Tempo,
}

/// Style code of every bar, 0 when unset. Bar 0 is never used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarTypes(Vec<u8>);

impl BarTypes {
    pub fn new(max_bars: usize) -> Self {
        BarTypes(vec![0; max_bars])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, bar: usize) -> Option<u8> {
        self.0.get(bar).copied()
    }

    /// Returns false when `bar` is beyond the table
    pub(crate) fn set(&mut self, bar: usize, value: u8) -> bool {
        match self.0.get_mut(bar) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Bars carrying a style code
    pub fn iter_set(&self) -> impl Iterator<Item = (usize, u8)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, value)| **value != 0)
            .map(|(bar, value)| (bar, *value))
    }
}

const fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Exact chord onset in quarter-note-equivalent beats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BeatPosition {
    numerator: u32,
    denominator: u32,
}

impl BeatPosition {
    /// Scale an encoded beat index by the time signature ratio
    pub fn new(raw_beat: u32, time_signature: &TimeSignature) -> Self {
        let numerator = raw_beat * u32::from(time_signature.numerator);
        let denominator = u32::from(time_signature.denominator).max(1);
        let divisor = gcd(numerator, denominator);
        BeatPosition {
            numerator: numerator / divisor,
            denominator: denominator / divisor,
        }
    }

    pub const fn from_beats(beats: u32) -> Self {
        BeatPosition {
            numerator: beats,
            denominator: 1,
        }
    }

    pub const fn numerator(&self) -> u32 {
        self.numerator
    }

    pub const fn denominator(&self) -> u32 {
        self.denominator
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }
}

impl std::fmt::Display for BeatPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chord {
    pub beat: BeatPosition,
    /// Beat index as encoded in the stream
    pub raw_beat: u32,
    /// Opaque harmonic quality code
    pub extension: u8,
    /// Pitch class in 0..18, set by the root stream
    pub root: Option<u8>,
    /// 0 when the bass is the root
    pub bass: u8,
}

impl Chord {
    pub const fn new(raw_beat: u32, beat: BeatPosition, extension: u8) -> Self {
        Chord {
            beat,
            raw_beat,
            extension,
            root: None,
            bass: 0,
        }
    }

    /// Both the extension and the root streams reached this chord
    pub const fn is_complete(&self) -> bool {
        self.root.is_some()
    }
}

/// Chorus range and repeat count stored after the chord streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chorus {
    pub start: u8,
    pub end: u8,
    pub repeats: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleBlock {
    /// Offset of the name length byte
    pub offset: usize,
    pub name_length: usize,
    pub name: String,
    pub event_table_start: u16,
    pub event_table_count: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Song {
    pub header: SongHeader,
    pub time_signature: TimeSignature,
    pub key_offset: i8,
    pub bar_types: BarTypes,
    pub chords: Vec<Chord>,
    pub measure_count: u32,
    pub chorus: Option<Chorus>,
    pub style_block: StyleBlock,
    pub note_events: Vec<NoteEvent>,
    /// Song length in event table ticks
    pub end_tick: u32,
    pub warnings: Vec<DecodeWarning>,
}

impl Song {
    pub fn title(&self) -> &str {
        &self.header.title
    }

    pub fn style_name(&self) -> &str {
        &self.style_block.name
    }

    pub const fn tempo(&self) -> Tempo {
        self.header.tempo
    }

    /// Note on/off pairs of every note, ordered by tick
    pub fn midi_events(&self) -> Vec<MidiEvent> {
        let mut events: Vec<MidiEvent> = self
            .note_events
            .iter()
            .flat_map(NoteEvent::to_midi_events)
            .collect();
        // stable, note on before its note off at equal ticks
        events.sort_by_key(|event| event.tick);
        events
    }
}

/// `measures * ticks_per_quarter * 4 * numerator / denominator`
fn compute_end_tick(measure_count: u32, time_signature: &TimeSignature, ticks_per_quarter: u32) -> u32 {
    let ticks = u64::from(measure_count)
        * u64::from(ticks_per_quarter)
        * 4
        * u64::from(time_signature.numerator)
        / u64::from(time_signature.denominator.max(1));
    u32::try_from(ticks).unwrap_or(u32::MAX)
}

/// Decode a song with the default configuration.
///
/// Recoverable conditions are logged and attached to [`Song::warnings`].
pub fn parse_biab_data(file_data: &[u8]) -> Result<Song, BiabError> {
    let mut diagnostics = LogDiagnostics;
    parse_biab_data_with(file_data, &DecoderConfig::default(), &mut diagnostics)
}

/// Read and decode a song file
pub fn parse_biab_file(path: &Path) -> Result<Song, BiabError> {
    let file_data = std::fs::read(path)?;
    parse_biab_data(&file_data)
}

/// Decode a song, forwarding recoverable conditions to `diagnostics` as they occur.
pub fn parse_biab_data_with(
    file_data: &[u8],
    config: &DecoderConfig,
    diagnostics: &mut dyn Diagnostics,
) -> Result<Song, BiabError> {
    let mut reporter = Reporter::new(diagnostics);

    // header, bar types and chords share one forward cursor
    let mut cursor = ByteCursor::new(file_data);
    let header_info = parse_header(&mut cursor).inspect_err(|e| {
        log::error!("Failed to parse header: {e}");
    })?;
    let time_signature = header_info.time_signature;
    let bar_types = parse_bar_types(&mut cursor, config, &mut reporter);
    let chord_track = parse_chords(&mut cursor, &time_signature, config, &mut reporter);
    log::debug!("Measure count {}", chord_track.measure_count);

    // the style block offset is recovered by scanning the whole buffer
    let style_block = parse_style_block(file_data, config).inspect_err(|e| {
        log::error!("Failed to locate style block: {e}");
    })?;
    log::debug!("Style block {style_block:?}");

    let note_events = parse_event_table(
        file_data,
        usize::from(style_block.event_table_start),
        usize::from(style_block.event_table_count),
        &mut reporter,
    )
    .inspect_err(|e| {
        log::error!("Failed to parse event table: {e}");
    })?;

    let end_tick = compute_end_tick(
        chord_track.measure_count,
        &time_signature,
        config.ticks_per_quarter,
    );

    Ok(Song {
        header: header_info.header,
        time_signature,
        key_offset: header_info.key_offset,
        bar_types,
        chords: chord_track.chords,
        measure_count: chord_track.measure_count,
        chorus: chord_track.chorus,
        style_block,
        note_events,
        end_tick,
        warnings: reporter.into_warnings(),
    })
}
