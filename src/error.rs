/// Errors that can occur while decoding an atop raw log.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with the raw-log magic number; it is not an
    /// atop raw log at all (or is a format this decoder does not speak).
    #[error("not an atop raw log (magic 0x{magic:08x})")]
    InvalidFormat { magic: u32 },

    /// The header is well formed but the producing atop version has no
    /// registered struct layout. Distinct from corruption so callers can
    /// report "unsupported version" rather than "broken file".
    #[error("unsupported atop version {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    /// The stream ended in the middle of a structure.
    #[error("truncated log: needed {needed} bytes at offset {offset}")]
    Truncated { offset: u64, needed: usize },

    /// An internal consistency field contradicts the rest of the record,
    /// e.g. a task count that would read past the declared payload length.
    #[error("corrupt log: {0}")]
    CorruptLog(String),
}
