use crate::BiabError;

/// Circle of fifths offset for each key byte.
///
/// Entry 0 is the default key, followed by 17 major then 17 minor keys over
/// `C, Db, D, Eb, E, F, Gb, G, Ab, A, Bb, B, C#, D#, F#, G#, A#`.
/// The D#, G# and A# entries are spelled as Eb, Ab and Db.
pub const KEY_OFFSETS: [i8; 35] = [
    0, // default
    0, -5, 2, -3, 4, -1, -6, 1, -4, 3, -2, 5, 7, -3, 6, -4, -2, // major
    -3, 4, -1, -6, 1, -4, 3, -2, 5, 0, -5, 2, 4, 6, 3, 5, 7, // minor
];

pub fn key_offset(index: u8) -> Option<i8> {
    KEY_OFFSETS.get(usize::from(index)).copied()
}

/// Resolve the key byte read at `offset`
pub fn lookup_key(index: u8, offset: usize) -> Result<i8, BiabError> {
    key_offset(index).ok_or(BiabError::KeyOutOfRange {
        index,
        offset,
        table_len: KEY_OFFSETS.len(),
    })
}
