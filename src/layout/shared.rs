//! Struct pieces shared by every version.

use super::{text, StructLayout};

/// `utsname` from `sys/utsname.h`: six 65-byte name fields (64 characters
/// plus NUL, the standard GNU width). Embedded unchanged in every header
/// version.
pub(crate) fn utsname() -> StructLayout {
    StructLayout::new(
        "utsname",
        vec![
            text("sysname", 65),
            text("nodename", 65),
            text("release", 65),
            text("version", 65),
            text("machine", 65),
            text("domain", 65),
        ],
    )
}
