//! Log header decoding and version resolution.
//!
//! Every raw log starts with a fixed-width header whose first eight bytes
//! (magic, version stamp, one spare) are identical in every version the
//! registry knows. Those eight bytes are enough to validate the file and
//! resolve the producing version; the rest of the header is then decoded
//! with the version's own table and cross-checked against the struct
//! widths the writer recorded.

use std::io::BufRead;

use crate::error::DecodeError;
use crate::layout::{self, Layout};
use crate::source::Source;
use crate::value::{decode_struct, StructValue};

/// First four bytes of every atop raw log.
pub const MAGIC: u32 = 0xFEED_BEEF;

// supportflags bits, from atop.h.
pub const ACCTACTIVE: i32 = 0x0000_0001;
pub const IOSTAT: i32 = 0x0000_0004;
pub const NETATOP: i32 = 0x0000_0010;
pub const NETATOPD: i32 = 0x0000_0020;
pub const DOCKSTAT: i32 = 0x0000_0040;
pub const GPUSTAT: i32 = 0x0000_0080;
pub const CGROUPV2: i32 = 0x0000_0100;

const PREFIX_LEN: usize = 8;

/// The decoded file header: producer identity plus the resolved layout
/// used for every following record.
#[derive(Debug)]
pub struct LogHeader {
    pub major: u16,
    pub minor: u16,
    /// Top bit of the version stamp; set when the writer was built from a
    /// patched source tree.
    pub patched: bool,
    pub hertz: u64,
    pub pagesize: u64,
    /// Width of the kernel pid space in digits. Only written since 2.8.
    pub pidwidth: Option<u64>,
    pub supportflags: i64,
    pub osrel: i64,
    pub osvers: i64,
    pub ossub: i64,
    raw: StructValue,
    layout: &'static Layout,
}

impl LogHeader {
    pub fn semantic_version(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }

    pub fn supports(&self, flag: i32) -> bool {
        self.supportflags & flag as i64 != 0
    }

    /// The layout resolved for this file's version.
    pub fn layout(&self) -> &'static Layout {
        self.layout
    }

    /// The full header as a decoded struct, spare fields included.
    pub fn raw(&self) -> &StructValue {
        &self.raw
    }

    fn uts(&self, field: &str) -> &str {
        match self.raw.lookup(&format!("utsname.{field}")) {
            Some(crate::value::Value::Text(s)) => s.as_str(),
            _ => "",
        }
    }

    pub fn sysname(&self) -> &str {
        self.uts("sysname")
    }

    pub fn nodename(&self) -> &str {
        self.uts("nodename")
    }

    pub fn release(&self) -> &str {
        self.uts("release")
    }

    pub fn machine(&self) -> &str {
        self.uts("machine")
    }
}

/// Split a version stamp into (major, minor, patched).
fn split_version(aversion: u16) -> (u16, u16, bool) {
    ((aversion >> 8) & 0x7f, aversion & 0xff, aversion & 0x8000 != 0)
}

/// Read and validate the file header, resolving the version to a
/// registered layout.
pub fn read_header<R: BufRead>(src: &mut Source<R>) -> Result<LogHeader, DecodeError> {
    let mut prefix = [0u8; PREFIX_LEN];
    src.read_exact(&mut prefix)?;

    let magic = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
    if magic != MAGIC {
        return Err(DecodeError::InvalidFormat { magic });
    }
    let aversion = u16::from_le_bytes([prefix[4], prefix[5]]);
    let (major, minor, patched) = split_version(aversion);
    let layout = layout::lookup(major, minor)
        .ok_or(DecodeError::UnsupportedVersion { major, minor })?;
    log::debug!("resolved atop {major}.{minor} (patched: {patched})");

    let mut buf = vec![0u8; layout.header.size];
    buf[..PREFIX_LEN].copy_from_slice(&prefix);
    src.read_exact(&mut buf[PREFIX_LEN..])?;
    let raw = decode_struct(&buf, &layout.header)?;

    check_lengths(&raw, layout)?;

    let missing = |field: &str| {
        DecodeError::CorruptLog(format!("header field {field} missing or mistyped"))
    };
    Ok(LogHeader {
        major,
        minor,
        patched,
        hertz: raw.uint("hertz").ok_or_else(|| missing("hertz"))?,
        pagesize: raw.uint("pagesize").ok_or_else(|| missing("pagesize"))?,
        pidwidth: raw.uint("pidwidth"),
        supportflags: raw
            .int("supportflags")
            .ok_or_else(|| missing("supportflags"))?,
        osrel: raw.int("osrel").unwrap_or(0),
        osvers: raw.int("osvers").unwrap_or(0),
        ossub: raw.int("ossub").unwrap_or(0),
        raw,
        layout,
    })
}

/// The writer records the widths it compiled with; a mismatch against the
/// registered table means the file cannot be decoded bit-exactly.
fn check_lengths(raw: &StructValue, layout: &Layout) -> Result<(), DecodeError> {
    // 1.26 calls the per-task length field pstatlen.
    let tstatlen = raw.uint("tstatlen").or_else(|| raw.uint("pstatlen"));
    let declared = [
        ("rawheadlen", raw.uint("rawheadlen"), layout.header.size),
        ("rawreclen", raw.uint("rawreclen"), layout.record.size),
        ("sstatlen", raw.uint("sstatlen"), layout.sstat.size),
        ("tstatlen", tstatlen, layout.tstat.size),
    ];
    for (name, found, expected) in declared {
        match found {
            Some(v) if v == expected as u64 => {}
            Some(v) => {
                return Err(DecodeError::CorruptLog(format!(
                    "header {name} is {v}, expected {expected} for version {}.{}",
                    layout.major, layout.minor
                )))
            }
            None => {
                return Err(DecodeError::CorruptLog(format!(
                    "header field {name} missing"
                )))
            }
        }
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A minimal valid header for the given version stamp.
    pub(crate) fn build_header(major: u16, minor: u16) -> Vec<u8> {
        let layout = layout::lookup(major, minor).unwrap();
        let h = &layout.header;
        let mut buf = vec![0u8; h.size];
        let put32 = |buf: &mut [u8], off: usize, v: u32| {
            buf[off..off + 4].copy_from_slice(&v.to_le_bytes())
        };
        let put16 = |buf: &mut [u8], off: usize, v: u16| {
            buf[off..off + 2].copy_from_slice(&v.to_le_bytes())
        };
        put32(&mut buf, h.offset_of("magic").unwrap(), MAGIC);
        put16(&mut buf, h.offset_of("aversion").unwrap(), (major << 8) | minor);
        put16(&mut buf, h.offset_of("rawheadlen").unwrap(), h.size as u16);
        put16(&mut buf, h.offset_of("rawreclen").unwrap(), layout.record.size as u16);
        put16(&mut buf, h.offset_of("hertz").unwrap(), 100);
        put32(&mut buf, h.offset_of("sstatlen").unwrap(), layout.sstat.size as u32);
        let tlen = h.offset_of("tstatlen").or_else(|| h.offset_of("pstatlen")).unwrap();
        put32(&mut buf, tlen, layout.tstat.size as u32);
        put32(&mut buf, h.offset_of("pagesize").unwrap(), 4096);
        let uts = h.offset_of("utsname").unwrap();
        buf[uts..uts + 5].copy_from_slice(b"Linux");
        buf
    }

    fn source_of(bytes: Vec<u8>) -> Source<std::io::Cursor<Vec<u8>>> {
        Source::new(std::io::Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_read_header_resolves_version() {
        let mut src = source_of(build_header(2, 8));
        let hdr = read_header(&mut src).unwrap();
        assert_eq!(hdr.semantic_version(), "2.8");
        assert!(!hdr.patched);
        assert_eq!(hdr.hertz, 100);
        assert_eq!(hdr.pagesize, 4096);
        assert_eq!(hdr.sysname(), "Linux");
        assert_eq!(hdr.layout().record.size, 96);
    }

    #[test]
    fn test_pidwidth_absent_before_2_8() {
        let mut src = source_of(build_header(2, 6));
        let hdr = read_header(&mut src).unwrap();
        assert_eq!(hdr.pidwidth, None);

        let mut src = source_of(build_header(2, 8));
        let hdr = read_header(&mut src).unwrap();
        assert_eq!(hdr.pidwidth, Some(0));
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = build_header(2, 8);
        bytes[0] ^= 0xff;
        let mut src = source_of(bytes);
        match read_header(&mut src) {
            Err(DecodeError::InvalidFormat { magic }) => assert_ne!(magic, MAGIC),
            other => panic!("expected InvalidFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_unregistered_version() {
        let mut bytes = build_header(2, 8);
        let stamp = ((2u16 << 8) | 11).to_le_bytes();
        bytes[4..6].copy_from_slice(&stamp);
        let mut src = source_of(bytes);
        match read_header(&mut src) {
            Err(DecodeError::UnsupportedVersion { major: 2, minor: 11 }) => {}
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn test_patched_bit() {
        let mut bytes = build_header(2, 8);
        let stamp = (0x8000u16 | (2 << 8) | 8).to_le_bytes();
        bytes[4..6].copy_from_slice(&stamp);
        let mut src = source_of(bytes);
        let hdr = read_header(&mut src).unwrap();
        assert!(hdr.patched);
        assert_eq!((hdr.major, hdr.minor), (2, 8));
    }

    #[test]
    fn test_length_mismatch_is_corrupt() {
        let layout = layout::lookup(2, 8).unwrap();
        let mut bytes = build_header(2, 8);
        let off = layout.header.offset_of("sstatlen").unwrap();
        bytes[off..off + 4].copy_from_slice(&1u32.to_le_bytes());
        let mut src = source_of(bytes);
        match read_header(&mut src) {
            Err(DecodeError::CorruptLog(msg)) => assert!(msg.contains("sstatlen")),
            other => panic!("expected CorruptLog, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_header() {
        let mut bytes = build_header(2, 8);
        bytes.truncate(100);
        let mut src = source_of(bytes);
        match read_header(&mut src) {
            Err(DecodeError::Truncated { .. }) => {}
            other => panic!("expected Truncated, got {other:?}"),
        }
    }
}
