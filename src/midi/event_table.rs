//! Embedded MIDI event table.
//!
//! Fixed 12-byte records:
//! `[tick u32 LE][status][pitch][velocity][channel][delta u32 LE]`

use crate::diagnostics::{DecodeWarning, Diagnostics};
use crate::midi::midi_event::NoteEvent;
use crate::parser::byte_cursor::ByteCursor;
use crate::BiabError;

pub const EVENT_RECORD_SIZE: usize = 12;

const END_OF_TABLE: u8 = 0x00;
const NOTE_ON: u8 = 0x90;
const CONTROL_CHANGE: u8 = 0xB0;
const PROGRAM_CHANGE: u8 = 0xC0;

/// Fields of a note on record past the status byte
struct NoteRecord {
    pitch: u8,
    velocity: u8,
    channel: u8,
    delta: u32,
}

fn read_note_record(cursor: &mut ByteCursor) -> Result<NoteRecord, BiabError> {
    Ok(NoteRecord {
        pitch: cursor.read_u8()?,
        velocity: cursor.read_u8()?,
        channel: cursor.read_u8()?,
        delta: cursor.read_u32_le()?,
    })
}

/// Rebuild notes from `count` records starting at `start`.
///
/// A note on without delta lasts as long as the previous note. Reading stops at
/// the end-of-table status or at an unknown status, whatever `count` says.
pub fn parse_event_table(
    data: &[u8],
    start: usize,
    count: usize,
    diagnostics: &mut dyn Diagnostics,
) -> Result<Vec<NoteEvent>, BiabError> {
    let mut notes = Vec::new();
    if count == 0 {
        log::debug!("No events found");
        return Ok(notes);
    }
    log::debug!("Parsing {count} events at {start}");

    let mut last_delta = 0;
    for record in 0..count {
        let offset = start + record * EVENT_RECORD_SIZE;
        let truncated = |_| BiabError::EventTableTruncated {
            record,
            offset,
            len: data.len(),
        };
        let mut cursor = ByteCursor::at(data, offset);
        let tick = cursor.read_u32_le().map_err(truncated)?;
        let status = cursor.read_u8().map_err(truncated)?;

        match status & 0xF0 {
            NOTE_ON => {
                let note = read_note_record(&mut cursor).map_err(truncated)?;
                let duration = match (note.delta, last_delta) {
                    (0, 0) => {
                        diagnostics.report(DecodeWarning::ZeroLengthNote { offset });
                        continue;
                    }
                    (0, previous) => previous,
                    (delta, _) => delta,
                };
                last_delta = duration;
                notes.push(NoteEvent {
                    channel: note.channel,
                    pitch: note.pitch,
                    velocity: note.velocity,
                    start_tick: tick,
                    duration_ticks: duration,
                });
            }
            CONTROL_CHANGE | PROGRAM_CHANGE => {
                log::debug!("Ignoring control event 0x{status:02X} at {offset}");
            }
            END_OF_TABLE => {
                log::debug!("End of event table at record {record}");
                break;
            }
            _ => {
                diagnostics.report(DecodeWarning::UnknownEventType { status, offset });
                break;
            }
        }
    }
    Ok(notes)
}
