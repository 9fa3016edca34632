//! Record stream decoding.
//!
//! After the header a raw log is a flat repetition of: one fixed-width
//! record struct, one zlib-deflated system-stats blob, one zlib-deflated
//! array of per-task structs. The record carries the compressed lengths
//! and the task count, so each group is fully self-framing and the stream
//! is decoded strictly forward.

use std::io::{BufRead, Read};

use flate2::bufread::ZlibDecoder;

use crate::error::DecodeError;
use crate::header::LogHeader;
use crate::layout::Layout;
use crate::source::Source;
use crate::value::{decode_struct, StructValue};

/// Decoded system-level statistics for one interval.
pub type SystemStats = StructValue;

/// Decoded statistics for one task (process or thread).
pub type TaskStats = StructValue;

/// Hard cap on samples read from a single file. One sample per second for
/// a full day; anything beyond that in one file means a runaway writer.
pub const MAX_SAMPLES_PER_FILE: usize = 86_400;

/// Typed view of the fixed-width record struct heading each sample.
pub struct SampleRecord {
    /// Wall-clock time of this sample, seconds since the epoch.
    pub curtime: i64,
    /// Seconds since the previous sample (or since boot for the first).
    pub interval: u64,
    pub flags: u16,
    /// Number of task structs in the compressed task blob.
    pub task_count: usize,
    pub scomplen: usize,
    pub pcomplen: usize,
    raw: StructValue,
}

impl SampleRecord {
    /// The record as a decoded struct, version-specific fields included.
    pub fn raw(&self) -> &StructValue {
        &self.raw
    }

    fn from_value(raw: StructValue) -> Result<Self, DecodeError> {
        let missing = |field: &str| {
            DecodeError::CorruptLog(format!("record field {field} missing or mistyped"))
        };
        // 1.26 calls the task count nlist; 2.x ndeviat.
        let task_count = raw
            .uint("ndeviat")
            .or_else(|| raw.uint("nlist"))
            .ok_or_else(|| missing("ndeviat"))?;
        Ok(SampleRecord {
            curtime: raw.int("curtime").ok_or_else(|| missing("curtime"))?,
            interval: raw.uint("interval").ok_or_else(|| missing("interval"))?,
            flags: raw.uint("flags").ok_or_else(|| missing("flags"))? as u16,
            task_count: task_count as usize,
            scomplen: raw.uint("scomplen").ok_or_else(|| missing("scomplen"))? as usize,
            pcomplen: raw.uint("pcomplen").ok_or_else(|| missing("pcomplen"))? as usize,
            raw,
        })
    }
}

/// One fully decoded interval.
pub struct Sample {
    pub record: SampleRecord,
    pub system: SystemStats,
    pub tasks: Vec<TaskStats>,
}

/// Decoding options for [`generate_samples_with`].
#[derive(Debug, Clone)]
pub struct Options {
    pub max_samples: usize,
    /// Treat a truncated or corrupt tail as end of stream instead of an
    /// error. Logs that are still being written, or were cut off by a
    /// crash, commonly end mid-record.
    pub allow_truncation: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            max_samples: MAX_SAMPLES_PER_FILE,
            allow_truncation: false,
        }
    }
}

/// Iterate the samples following an already-decoded header.
pub fn generate_samples<'a, R: BufRead>(
    src: &'a mut Source<R>,
    header: &LogHeader,
) -> Samples<'a, R> {
    generate_samples_with(src, header, Options::default())
}

/// Like [`generate_samples`], with explicit limits.
pub fn generate_samples_with<'a, R: BufRead>(
    src: &'a mut Source<R>,
    header: &LogHeader,
    options: Options,
) -> Samples<'a, R> {
    Samples {
        src,
        layout: header.layout(),
        options,
        produced: 0,
        done: false,
    }
}

/// Iterator over decoded samples. Fused: after the first error or the end
/// of the stream it yields `None` forever.
pub struct Samples<'a, R: BufRead> {
    src: &'a mut Source<R>,
    layout: &'static Layout,
    options: Options,
    produced: usize,
    done: bool,
}

impl<R: BufRead> Samples<'_, R> {
    fn read_compressed(&mut self, len: usize, what: &'static str) -> Result<Vec<u8>, DecodeError> {
        let mut compressed = vec![0u8; len];
        self.src.read_exact(&mut compressed)?;
        let mut out = Vec::new();
        let mut dec = ZlibDecoder::new(compressed.as_slice());
        dec.read_to_end(&mut out)
            .map_err(|e| DecodeError::CorruptLog(format!("{what} blob does not inflate: {e}")))?;
        Ok(out)
    }

    fn next_sample(&mut self) -> Result<Option<Sample>, DecodeError> {
        let mut buf = vec![0u8; self.layout.record.size];
        if !self.src.read_exact_or_eof(&mut buf)? {
            return Ok(None);
        }
        let record = SampleRecord::from_value(decode_struct(&buf, &self.layout.record)?)?;

        let sstat_buf = self.read_compressed(record.scomplen, "system stats")?;
        if sstat_buf.len() < self.layout.sstat.size {
            return Err(DecodeError::CorruptLog(format!(
                "system stats inflate to {} bytes, need {}",
                sstat_buf.len(),
                self.layout.sstat.size
            )));
        }
        let system = decode_struct(&sstat_buf, &self.layout.sstat)?;

        let tstat_buf = self.read_compressed(record.pcomplen, "task stats")?;
        let stride = self.layout.tstat.size;
        if record.task_count * stride > tstat_buf.len() {
            return Err(DecodeError::CorruptLog(format!(
                "task blob holds {} bytes for {} tasks of {} bytes",
                tstat_buf.len(),
                record.task_count,
                stride
            )));
        }
        let mut tasks = Vec::with_capacity(record.task_count);
        for i in 0..record.task_count {
            tasks.push(decode_struct(&tstat_buf[i * stride..], &self.layout.tstat)?);
        }

        Ok(Some(Sample {
            record,
            system,
            tasks,
        }))
    }
}

impl<R: BufRead> Iterator for Samples<'_, R> {
    type Item = Result<Sample, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.produced >= self.options.max_samples {
            log::warn!(
                "stopping after {} samples, file keeps going",
                self.produced
            );
            self.done = true;
            return None;
        }
        match self.next_sample() {
            Ok(Some(sample)) => {
                self.produced += 1;
                Some(Ok(sample))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                if self.options.allow_truncation
                    && matches!(
                        err,
                        DecodeError::Truncated { .. } | DecodeError::CorruptLog(_)
                    )
                {
                    log::warn!("ignoring damaged tail after {} samples: {err}", self.produced);
                    return None;
                }
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    use super::*;
    use crate::header::tests::build_header;
    use crate::header::read_header;
    use crate::layout;

    fn deflate(data: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    /// Append one record group with `ntask` zero-filled tasks.
    fn push_record(out: &mut Vec<u8>, major: u16, minor: u16, curtime: i64, ntask: u32) {
        let l = layout::lookup(major, minor).unwrap();
        let sstat = deflate(&vec![0u8; l.sstat.size]);
        let tstat = deflate(&vec![0u8; l.tstat.size * ntask as usize]);

        let mut rec = vec![0u8; l.record.size];
        let put = |rec: &mut [u8], name: &str, v: u32| {
            let off = l.record.offset_of(name).unwrap();
            rec[off..off + 4].copy_from_slice(&v.to_le_bytes());
        };
        rec[0..8].copy_from_slice(&curtime.to_le_bytes());
        put(&mut rec, "scomplen", sstat.len() as u32);
        put(&mut rec, "pcomplen", tstat.len() as u32);
        put(&mut rec, "interval", 10);
        let count_field = if major == 1 { "nlist" } else { "ndeviat" };
        put(&mut rec, count_field, ntask);

        out.extend_from_slice(&rec);
        out.extend_from_slice(&sstat);
        out.extend_from_slice(&tstat);
    }

    fn file_with_records(major: u16, minor: u16, n: usize) -> Vec<u8> {
        let mut bytes = build_header(major, minor);
        for i in 0..n {
            push_record(&mut bytes, major, minor, 1_700_000_000 + i as i64, 2);
        }
        bytes
    }

    fn open(bytes: Vec<u8>) -> Source<std::io::Cursor<Vec<u8>>> {
        Source::new(std::io::Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_decode_single_record() {
        let mut src = open(file_with_records(2, 8, 1));
        let hdr = read_header(&mut src).unwrap();
        let samples: Vec<_> = generate_samples(&mut src, &hdr)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(samples.len(), 1);
        let s = &samples[0];
        assert_eq!(s.record.curtime, 1_700_000_000);
        assert_eq!(s.record.interval, 10);
        assert_eq!(s.record.task_count, 2);
        assert_eq!(s.tasks.len(), 2);
        // Zero-filled sstat decodes with all limiter arrays empty.
        assert_eq!(s.system.lookup("cpu.nrcpu"), Some(&crate::value::Value::Int(0)));
        assert_eq!(s.tasks[0].lookup("gen.pid"), Some(&crate::value::Value::Int(0)));
    }

    #[test]
    fn test_multiple_records_in_order() {
        let mut src = open(file_with_records(2, 6, 3));
        let hdr = read_header(&mut src).unwrap();
        let times: Vec<i64> = generate_samples(&mut src, &hdr)
            .map(|s| s.unwrap().record.curtime)
            .collect();
        assert_eq!(times, vec![1_700_000_000, 1_700_000_001, 1_700_000_002]);
    }

    #[test]
    fn test_v1_26_uses_nlist() {
        let mut src = open(file_with_records(1, 26, 1));
        let hdr = read_header(&mut src).unwrap();
        let samples: Vec<_> = generate_samples(&mut src, &hdr)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(samples[0].record.task_count, 2);
    }

    #[test]
    fn test_empty_body_yields_nothing() {
        let mut src = open(file_with_records(2, 8, 0));
        let hdr = read_header(&mut src).unwrap();
        assert!(generate_samples(&mut src, &hdr).next().is_none());
    }

    #[test]
    fn test_truncated_tail_is_error() {
        let mut bytes = file_with_records(2, 8, 2);
        bytes.truncate(bytes.len() - 20);
        let mut src = open(bytes);
        let hdr = read_header(&mut src).unwrap();
        let mut iter = generate_samples(&mut src, &hdr);
        assert!(iter.next().unwrap().is_ok());
        match iter.next() {
            Some(Err(DecodeError::Truncated { .. })) => {}
            other => panic!("expected Truncated, got {:?}", other.map(|r| r.map(|_| ()))),
        }
        // Fused after the error.
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_allow_truncation_downgrades_tail() {
        let mut bytes = file_with_records(2, 8, 2);
        bytes.truncate(bytes.len() - 20);
        let mut src = open(bytes);
        let hdr = read_header(&mut src).unwrap();
        let opts = Options {
            allow_truncation: true,
            ..Options::default()
        };
        let samples: Vec<_> = generate_samples_with(&mut src, &hdr, opts)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_garbage_blob_is_corrupt() {
        let l = layout::lookup(2, 8).unwrap();
        let mut bytes = build_header(2, 8);
        let mut rec = vec![0u8; l.record.size];
        let off = l.record.offset_of("scomplen").unwrap();
        rec[off..off + 4].copy_from_slice(&8u32.to_le_bytes());
        bytes.extend_from_slice(&rec);
        bytes.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef, 1, 2, 3, 4]);

        let mut src = open(bytes);
        let hdr = read_header(&mut src).unwrap();
        match generate_samples(&mut src, &hdr).next() {
            Some(Err(DecodeError::CorruptLog(_))) => {}
            other => panic!("expected CorruptLog, got {:?}", other.map(|r| r.map(|_| ()))),
        }
    }

    #[test]
    fn test_task_count_overflowing_blob_is_corrupt() {
        let l = layout::lookup(2, 8).unwrap();
        let mut bytes = build_header(2, 8);
        let sstat = deflate(&vec![0u8; l.sstat.size]);
        // One task's worth of bytes but a count of five.
        let tstat = deflate(&vec![0u8; l.tstat.size]);
        let mut rec = vec![0u8; l.record.size];
        let put = |rec: &mut [u8], name: &str, v: u32| {
            let off = l.record.offset_of(name).unwrap();
            rec[off..off + 4].copy_from_slice(&v.to_le_bytes());
        };
        put(&mut rec, "scomplen", sstat.len() as u32);
        put(&mut rec, "pcomplen", tstat.len() as u32);
        put(&mut rec, "ndeviat", 5);
        bytes.extend_from_slice(&rec);
        bytes.extend_from_slice(&sstat);
        bytes.extend_from_slice(&tstat);

        let mut src = open(bytes);
        let hdr = read_header(&mut src).unwrap();
        match generate_samples(&mut src, &hdr).next() {
            Some(Err(DecodeError::CorruptLog(msg))) => assert!(msg.contains("5 tasks")),
            other => panic!("expected CorruptLog, got {:?}", other.map(|r| r.map(|_| ()))),
        }
    }

    #[test]
    fn test_max_samples_cap() {
        let mut src = open(file_with_records(2, 8, 3));
        let hdr = read_header(&mut src).unwrap();
        let opts = Options {
            max_samples: 2,
            ..Options::default()
        };
        let samples: Vec<_> = generate_samples_with(&mut src, &hdr, opts)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(samples.len(), 2);
    }
}
