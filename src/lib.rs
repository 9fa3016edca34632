//! Decoder for atop raw log files.
//!
//! Atop writes its binary logs by dumping compiler-laid-out C structs,
//! with the system and per-task payloads zlib-deflated and the whole file
//! optionally gzip-wrapped. This crate reads those files back into
//! structured values for every registered atop version (1.26 and 2.3
//! through 2.10), resolving the exact struct layout from the version
//! stamp in the header.
//!
//! # File framing
//!
//! | Offset | Size      | Content                              |
//! |--------|-----------|--------------------------------------|
//! | 0      | 4         | Magic `0xFEEDBEEF`                   |
//! | 4      | 2         | Version stamp (major, minor, patch bit) |
//! | 6      | 474       | Rest of the fixed 480-byte header    |
//! | 480    | 80 or 96  | Record struct (repeats per sample)   |
//! | ...    | scomplen  | zlib-deflated system stats           |
//! | ...    | pcomplen  | zlib-deflated task stat array        |
//!
//! # Usage
//!
//! ```no_run
//! use atop_rawlog::{generate_samples, open_log, read_header};
//!
//! # fn main() -> Result<(), atop_rawlog::DecodeError> {
//! let mut source = open_log("/var/log/atop/atop_20260827")?;
//! let header = read_header(&mut source)?;
//! println!("atop {} on {}", header.semantic_version(), header.nodename());
//!
//! for sample in generate_samples(&mut source, &header) {
//!     let sample = sample?;
//!     println!("{}: {} tasks", sample.record.curtime, sample.tasks.len());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod header;
pub mod layout;
mod project;
mod record;
mod source;
pub mod value;

pub use error::DecodeError;
pub use header::{read_header, LogHeader, MAGIC};
pub use header::{ACCTACTIVE, CGROUPV2, DOCKSTAT, GPUSTAT, IOSTAT, NETATOP, NETATOPD};
pub use layout::{lookup, Layout};
pub use project::project;
pub use record::{
    generate_samples, generate_samples_with, Options, Sample, SampleRecord, Samples, SystemStats,
    TaskStats, MAX_SAMPLES_PER_FILE,
};
pub use source::{open_log, Source};
pub use value::{StructValue, Value};
