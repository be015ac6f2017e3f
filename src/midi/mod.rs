pub mod event_table;
pub mod midi_event;
