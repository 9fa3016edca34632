//! End-to-end decoding against synthesized log files.

use std::io::Write;

use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;

use atop_rawlog::{
    generate_samples, generate_samples_with, layout, project, read_header, DecodeError, Options,
    Source, Value, MAGIC,
};

fn put16(buf: &mut [u8], off: usize, v: u16) {
    buf[off..off + 2].copy_from_slice(&v.to_le_bytes());
}

fn put32(buf: &mut [u8], off: usize, v: u32) {
    buf[off..off + 4].copy_from_slice(&v.to_le_bytes());
}

fn put64(buf: &mut [u8], off: usize, v: i64) {
    buf[off..off + 8].copy_from_slice(&v.to_le_bytes());
}

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

fn header_bytes(major: u16, minor: u16) -> Vec<u8> {
    let l = layout::lookup(major, minor).unwrap();
    let h = &l.header;
    let mut buf = vec![0u8; h.size];
    put32(&mut buf, h.offset_of("magic").unwrap(), MAGIC);
    put16(&mut buf, h.offset_of("aversion").unwrap(), (major << 8) | minor);
    put16(&mut buf, h.offset_of("rawheadlen").unwrap(), h.size as u16);
    put16(&mut buf, h.offset_of("rawreclen").unwrap(), l.record.size as u16);
    put16(&mut buf, h.offset_of("hertz").unwrap(), 100);
    put32(&mut buf, h.offset_of("sstatlen").unwrap(), l.sstat.size as u32);
    let tlen = h
        .offset_of("tstatlen")
        .or_else(|| h.offset_of("pstatlen"))
        .unwrap();
    put32(&mut buf, tlen, l.tstat.size as u32);
    put32(&mut buf, h.offset_of("pagesize").unwrap(), 4096);
    let uts = h.offset_of("utsname").unwrap();
    buf[uts..uts + 5].copy_from_slice(b"Linux");
    let node = h.offset_of("utsname.nodename").unwrap();
    buf[node..node + 4].copy_from_slice(b"host");
    buf
}

struct Interval {
    curtime: i64,
    interval: u32,
    tasks: Vec<(i32, &'static str)>,
}

/// Build a complete 2.8 log with populated cpu and task fields.
fn build_log(intervals: &[Interval]) -> Vec<u8> {
    let l = layout::lookup(2, 8).unwrap();
    let mut out = header_bytes(2, 8);

    for iv in intervals {
        let mut sstat = vec![0u8; l.sstat.size];
        // One online cpu with some system time.
        put64(&mut sstat, l.sstat.offset_of("cpu.nrcpu").unwrap(), 1);
        put64(&mut sstat, l.sstat.offset_of("cpu.cpu").unwrap() + 8, 250);
        put64(&mut sstat, l.sstat.offset_of("mem.physmem").unwrap(), 1 << 21);

        let mut tstats = Vec::new();
        for (pid, name) in &iv.tasks {
            let mut t = vec![0u8; l.tstat.size];
            put32(&mut t, l.tstat.offset_of("gen.pid").unwrap(), *pid as u32);
            let name_off = l.tstat.offset_of("gen.name").unwrap();
            t[name_off..name_off + name.len()].copy_from_slice(name.as_bytes());
            tstats.extend_from_slice(&t);
        }

        let scomp = deflate(&sstat);
        let pcomp = deflate(&tstats);
        let mut rec = vec![0u8; l.record.size];
        put64(&mut rec, 0, iv.curtime);
        put32(&mut rec, l.record.offset_of("scomplen").unwrap(), scomp.len() as u32);
        put32(&mut rec, l.record.offset_of("pcomplen").unwrap(), pcomp.len() as u32);
        put32(&mut rec, l.record.offset_of("interval").unwrap(), iv.interval);
        put32(&mut rec, l.record.offset_of("ndeviat").unwrap(), iv.tasks.len() as u32);

        out.extend_from_slice(&rec);
        out.extend_from_slice(&scomp);
        out.extend_from_slice(&pcomp);
    }
    out
}

fn two_interval_log() -> Vec<u8> {
    build_log(&[
        Interval {
            curtime: 1_756_250_000,
            interval: 5,
            tasks: vec![(1, "systemd"), (42, "sshd")],
        },
        Interval {
            curtime: 1_756_250_005,
            interval: 5,
            tasks: vec![(1, "systemd")],
        },
    ])
}

fn open(bytes: Vec<u8>) -> Source<std::io::Cursor<Vec<u8>>> {
    Source::new(std::io::Cursor::new(bytes)).unwrap()
}

#[test]
fn test_two_interval_stream() {
    let mut src = open(two_interval_log());
    let hdr = read_header(&mut src).unwrap();
    assert_eq!(hdr.semantic_version(), "2.8");
    assert_eq!(hdr.nodename(), "host");

    let samples: Vec<_> = generate_samples(&mut src, &hdr)
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(samples.len(), 2);

    let first = &samples[0];
    assert_eq!(first.record.curtime, 1_756_250_000);
    assert_eq!(first.record.interval, 5);
    assert_eq!(first.record.task_count, first.tasks.len());
    assert_eq!(first.tasks[1].lookup("gen.pid"), Some(&Value::Int(42)));
    assert_eq!(
        first.tasks[1].lookup("gen.name"),
        Some(&Value::Text("sshd".into()))
    );

    // The cpu array is limited by nrcpu.
    match first.system.lookup("cpu.cpu") {
        Some(Value::Array(cpus)) => {
            assert_eq!(cpus.len(), 1);
            match &cpus[0] {
                Value::Struct(c) => assert_eq!(c.int("stime"), Some(250)),
                other => panic!("expected struct, got {other:?}"),
            }
        }
        other => panic!("expected array, got {other:?}"),
    }

    assert_eq!(samples[1].tasks.len(), 1);
}

#[test]
fn test_gzip_envelope_is_transparent() {
    let plain = two_interval_log();
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(&plain).unwrap();
    let gzipped = enc.finish().unwrap();
    assert_ne!(&gzipped[..2], &plain[..2]);

    let mut src = open(gzipped);
    let hdr = read_header(&mut src).unwrap();
    let n = generate_samples(&mut src, &hdr)
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
        .len();
    assert_eq!(n, 2);
}

#[test]
fn test_projection_of_sample() {
    let mut src = open(two_interval_log());
    let hdr = read_header(&mut src).unwrap();
    let sample = generate_samples(&mut src, &hdr).next().unwrap().unwrap();

    let sys = project(&sample.system);
    assert_eq!(sys["cpu"]["nrcpu"], 1);
    assert_eq!(sys["mem"]["physmem"], 1 << 21);
    // Spare fields never surface.
    assert!(sys["cpu"].get("cfuture").is_none());

    let task = project(&sample.tasks[0]);
    assert_eq!(task["gen"]["pid"], 1);
    assert_eq!(task["gen"]["name"], "systemd");

    let rec = project(sample.record.raw());
    assert_eq!(rec["interval"], 5);
    assert!(rec.get("ifuture").is_none());
}

#[test]
fn test_every_registered_version_decodes_its_header() {
    for (major, minor) in layout::registered_versions() {
        let mut src = open(header_bytes(major, minor));
        let hdr = read_header(&mut src).unwrap();
        assert_eq!(hdr.semantic_version(), format!("{major}.{minor}"));
        assert_eq!(hdr.hertz, 100);
        assert_eq!(hdr.pagesize, 4096);
        assert_eq!(hdr.sysname(), "Linux");

        let projected = project(hdr.raw());
        assert_eq!(projected["hertz"], 100, "hertz for {major}.{minor}");
        assert_eq!(projected["utsname"]["nodename"], "host");
        assert!(projected.get("sfuture").is_none());
    }
}

#[test]
fn test_not_a_raw_log() {
    let mut src = open(b"PK\x03\x04 some zip archive".to_vec());
    match read_header(&mut src) {
        Err(DecodeError::InvalidFormat { .. }) => {}
        other => panic!("expected InvalidFormat, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_future_version_refused() {
    let mut bytes = header_bytes(2, 8);
    put16(&mut bytes, 4, (3 << 8) | 1);
    let mut src = open(bytes);
    match read_header(&mut src) {
        Err(DecodeError::UnsupportedVersion { major: 3, minor: 1 }) => {}
        other => panic!("expected UnsupportedVersion, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_truncated_gzip_envelope() {
    let plain = two_interval_log();
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(&plain).unwrap();
    let mut gzipped = enc.finish().unwrap();
    gzipped.truncate(gzipped.len() / 2);

    let mut src = open(gzipped);
    let result = read_header(&mut src).and_then(|hdr| {
        generate_samples(&mut src, &hdr).collect::<Result<Vec<_>, _>>()
    });
    match result {
        Err(DecodeError::Truncated { .. }) => {}
        other => panic!("expected Truncated, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_lenient_mode_swallows_torn_tail() {
    let mut bytes = two_interval_log();
    bytes.truncate(bytes.len() - 10);
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
