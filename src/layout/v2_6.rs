//! Struct tables for atop 2.6 logs.
//!
//! 2.6 widens memstat (`zfsarcsize`, `swapcached`), adds wait-channel and
//! run-delay fields to the per-task cpu group, and `vlock` to the per-task
//! mem group. The percpu shape is the same as 2.4's.

use super::{arr, f, group, text, Layout, Prim, StructLayout};
use super::{v1_26, v2_3, v2_4};

pub(crate) fn mem_stat() -> StructLayout {
    StructLayout::new(
        "memstat",
        vec![
            f("physmem", Prim::I64),
            f("freemem", Prim::I64),
            f("buffermem", Prim::I64),
            f("slabmem", Prim::I64),
            f("cachemem", Prim::I64),
            f("cachedrt", Prim::I64),
            f("totswap", Prim::I64),
            f("freeswap", Prim::I64),
            f("pgscans", Prim::I64),
            f("pgsteal", Prim::I64),
            f("allocstall", Prim::I64),
            f("swouts", Prim::I64),
            f("swins", Prim::I64),
            f("commitlim", Prim::I64),
            f("committed", Prim::I64),
            f("shmem", Prim::I64),
            f("shmrss", Prim::I64),
            f("shmswp", Prim::I64),
            f("slabreclaim", Prim::I64),
            f("tothugepage", Prim::I64),
            f("freehugepage", Prim::I64),
            f("hugepagesz", Prim::I64),
            f("vmwballoon", Prim::I64),
            f("zfsarcsize", Prim::I64),
            f("swapcached", Prim::I64),
            arr("cfuture", Prim::I64, 6),
        ],
    )
}

fn sstat() -> StructLayout {
    StructLayout::new(
        "sstat",
        vec![
            group("cpu", v2_4::cpu_stat()),
            group("mem", mem_stat()),
            group("net", v1_26::net_stat()),
            group("intf", v2_3::intf_stat()),
            group("dsk", v2_3::dsk_stat()),
            group("nfs", v2_3::nfs_stat()),
            group("cfs", v2_3::cont_stat()),
            group("psi", v2_4::pressure()),
            group("gpu", v2_4::gpu_stat()),
            group("ifb", v2_4::ifb_stat()),
            group("www", v1_26::www_stat()),
        ],
    )
}

pub(crate) fn cpu() -> StructLayout {
    StructLayout::new(
        "cpu",
        vec![
            f("utime", Prim::I64),
            f("stime", Prim::I64),
            f("nice", Prim::I32),
            f("prio", Prim::I32),
            f("rtprio", Prim::I32),
            f("policy", Prim::I32),
            f("curcpu", Prim::I32),
            f("sleepavg", Prim::I32),
            arr("ifuture", Prim::I32, 4),
            text("wchan", 16),
            f("rundelay", Prim::I64),
            f("cfuture", Prim::I64),
        ],
    )
}

pub(crate) fn mem() -> StructLayout {
    StructLayout::new(
        "mem",
        vec![
            f("minflt", Prim::I64),
            f("majflt", Prim::I64),
            f("vexec", Prim::I64),
            f("vmem", Prim::I64),
            f("rmem", Prim::I64),
            f("pmem", Prim::I64),
            f("vgrow", Prim::I64),
            f("rgrow", Prim::I64),
            f("vdata", Prim::I64),
            f("vstack", Prim::I64),
            f("vlibs", Prim::I64),
            f("vswap", Prim::I64),
            f("vlock", Prim::I64),
            arr("cfuture", Prim::I64, 3),
        ],
    )
}

pub(crate) fn tstat() -> StructLayout {
    StructLayout::new(
        "tstat",
        vec![
            group("gen", v2_3::gen()),
            group("cpu", cpu()),
            group("dsk", v1_26::dsk()),
            group("mem", mem()),
            group("net", v2_3::net()),
            group("gpu", v2_4::gpu()),
        ],
    )
}

pub(crate) fn layout() -> Layout {
    Layout {
        major: 2,
        minor: 6,
        header: v2_3::header(),
        record: v2_3::record(),
        sstat: sstat(),
        tstat: tstat(),
    }
}
