//! Struct tables for atop 2.9 logs.
//!
//! Only the per-task cpu group changed: context-switch counters (`nvcsw`,
//! `nivcsw`) replace two of the 2.8 spares. Everything else aliases 2.8.

use super::{arr, f, group, text, Layout, Prim, StructLayout};
use super::{v1_26, v2_3, v2_4, v2_8};

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
            f("cgcpuweight", Prim::I32),
            f("cgcpumax", Prim::I32),
            f("cgcpumaxr", Prim::I32),
            arr("ifuture", Prim::I32, 3),
            text("wchan", 16),
            f("rundelay", Prim::I64),
            f("blkdelay", Prim::I64),
            f("nvcsw", Prim::I64),
            f("nivcsw", Prim::I64),
            arr("cfuture", Prim::I64, 1),
        ],
    )
}

fn tstat() -> StructLayout {
    StructLayout::new(
        "tstat",
        vec![
            group("gen", v2_8::gen()),
            group("cpu", cpu()),
            group("dsk", v1_26::dsk()),
            group("mem", v2_8::mem()),
            group("net", v2_3::net()),
            group("gpu", v2_4::gpu()),
        ],
    )
}

pub(crate) fn layout() -> Layout {
    let v2_8 = v2_8::layout();
    Layout {
        major: 2,
        minor: 9,
        header: v2_8.header,
        record: v2_8.record,
        sstat: v2_8.sstat,
        tstat: tstat(),
    }
}
