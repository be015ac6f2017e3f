use serde::Serialize;

/// A note reconstructed from the embedded event table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NoteEvent {
    pub channel: u8,
    pub pitch: u8,
    pub velocity: u8,
    /// Absolute tick of the note on
    pub start_tick: u32,
    pub duration_ticks: u32,
}

impl NoteEvent {
    pub const fn end_tick(&self) -> u32 {
        self.start_tick.saturating_add(self.duration_ticks)
    }

    pub fn start_seconds(&self, bpm: f64, ticks_per_quarter: u32) -> f64 {
        ticks_to_seconds(u64::from(self.start_tick), bpm, ticks_per_quarter)
    }

    /// Time of the matching note off
    pub fn end_seconds(&self, bpm: f64, ticks_per_quarter: u32) -> f64 {
        ticks_to_seconds(
            u64::from(self.start_tick) + u64::from(self.duration_ticks),
            bpm,
            ticks_per_quarter,
        )
    }

    /// The note on and its matching note off
    pub const fn to_midi_events(&self) -> [MidiEvent; 2] {
        [
            MidiEvent::new_note_on(self.start_tick, self.channel, self.pitch, self.velocity),
            MidiEvent::new_note_off(self.end_tick(), self.channel, self.pitch, self.velocity),
        ]
    }
}

/// Elapsed seconds for `ticks` at `bpm` with `ticks_per_quarter` ticks per beat
pub fn ticks_to_seconds(ticks: u64, bpm: f64, ticks_per_quarter: u32) -> f64 {
    if bpm <= 0.0 || ticks_per_quarter == 0 {
        return 0.0;
    }
    ticks as f64 * 60.0 / (bpm * f64::from(ticks_per_quarter))
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct MidiEvent {
    /// The tick at which the event occurs.
    pub tick: u32,
    /// The type of the event.
    pub event: MidiEventType,
}

impl MidiEvent {
    pub const fn is_note_on(&self) -> bool {
        matches!(self.event, MidiEventType::NoteOn(_, _, _))
    }

    pub const fn is_note_off(&self) -> bool {
        matches!(self.event, MidiEventType::NoteOff(_, _, _))
    }

    pub const fn new_note_on(tick: u32, channel: u8, key: u8, velocity: u8) -> Self {
        let event = MidiEventType::note_on(channel, key, velocity);
        Self { tick, event }
    }

    pub const fn new_note_off(tick: u32, channel: u8, key: u8, velocity: u8) -> Self {
        let event = MidiEventType::note_off(channel, key, velocity);
        Self { tick, event }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum MidiEventType {
    NoteOn(u8, u8, u8),  // channel, note, velocity
    NoteOff(u8, u8, u8), // channel, note, velocity
}

impl MidiEventType {
    const fn note_on(channel: u8, key: u8, velocity: u8) -> Self {
        Self::NoteOn(channel, key, velocity)
    }

    const fn note_off(channel: u8, key: u8, velocity: u8) -> Self {
        Self::NoteOff(channel, key, velocity)
    }
}
