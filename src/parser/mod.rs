pub mod bar_parser;
pub mod byte_cursor;
pub mod chord_parser;
pub mod header_parser;
pub mod key_table;
pub mod run_length;
pub mod song_parser;
pub mod style_locator;
