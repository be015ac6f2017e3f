//! biab-decoder - Band-in-a-Box song file decoder
//!
//! This library provides:
//! - Decoding of Band-in-a-Box song files (.MGU, .SGU) into a [`Song`]
//! - Bar types, chord progression, chorus and style name
//! - Note events rebuilt from the embedded MIDI event table
//!
//! # Example
//!
//! ```no_run
//! use biab_decoder::parse_biab_data;
//!
//! let file_data = std::fs::read("song.MGU").unwrap();
//! let song = parse_biab_data(&file_data).unwrap();
//! println!("{} in {}", song.title(), song.time_signature);
//! let midi_events = song.midi_events();
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod midi;
pub mod parser;

// Re-export main types for convenience
pub use config::{DecoderConfig, MAX_BARS, TICKS_PER_QUARTER};
pub use diagnostics::{DecodeWarning, Diagnostics, LogDiagnostics, StreamKind};
pub use error::BiabError;
pub use midi::midi_event::{ticks_to_seconds, MidiEvent, MidiEventType, NoteEvent};
pub use parser::song_parser::{
    parse_biab_data, parse_biab_data_with, parse_biab_file, BarTypes, BeatPosition, Chord,
    Chorus, Song, SongHeader, StyleBlock, Tempo, TimeSignature,
};
