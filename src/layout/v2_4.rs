//! Struct tables for atop 2.4 logs.
//!
//! 2.4 adds perf counters to percpu (`instr`, `cycle`), the PSI pressure
//! block, and the GPU and InfiniBand subsystems. Everything else carries
//! over from 2.3.

use super::{arr, f, garr, group, text, Layout, Prim, StructLayout};
use super::{v1_26, v2_3};

const MAXCPU: usize = 2048;
const MAXIBPORT: usize = 32;
const MAXGPU: usize = 32;
const MAXGPUBUS: usize = 12;
const MAXGPUTYPE: usize = 12;
const MAXIBNAME: usize = 12;

fn per_cpu() -> StructLayout {
    StructLayout::new(
        "percpu",
        vec![
            f("cpunr", Prim::I32),
            f("stime", Prim::I64),
            f("utime", Prim::I64),
            f("ntime", Prim::I64),
            f("itime", Prim::I64),
            f("wtime", Prim::I64),
            f("Itime", Prim::I64),
            f("Stime", Prim::I64),
            f("steal", Prim::I64),
            f("guest", Prim::I64),
            group("freqcnt", v1_26::freq_cnt()),
            f("instr", Prim::I64),
            f("cycle", Prim::I64),
            arr("cfuture", Prim::I64, 2),
        ],
    )
}

pub(crate) fn cpu_stat() -> StructLayout {
    StructLayout::new(
        "cpustat",
        vec![
            f("nrcpu", Prim::I64),
            f("devint", Prim::I64),
            f("csw", Prim::I64),
            f("nprocs", Prim::I64),
            f("lavg1", Prim::F32),
            f("lavg5", Prim::F32),
            f("lavg15", Prim::F32),
            arr("cfuture", Prim::I64, 4),
            group("all", per_cpu()),
            garr("cpu", per_cpu(), MAXCPU, "nrcpu"),
        ],
    )
}

fn psi() -> StructLayout {
    StructLayout::new(
        "psi",
        vec![
            f("avg10", Prim::F32),
            f("avg60", Prim::F32),
            f("avg300", Prim::F32),
            f("total", Prim::I64),
        ],
    )
}

pub(crate) fn pressure() -> StructLayout {
    StructLayout::new(
        "pressure",
        vec![
            text("present", 1),
            text("future", 3),
            group("cpusome", psi()),
            group("memsome", psi()),
            group("memfull", psi()),
            group("iosome", psi()),
            group("iofull", psi()),
        ],
    )
}

fn per_gpu() -> StructLayout {
    StructLayout::new(
        "pergpu",
        vec![
            text("taskstats", 1),
            f("nrprocs", Prim::U8),
            text("type", MAXGPUTYPE + 1),
            text("busid", MAXGPUBUS + 1),
            f("gpunr", Prim::I32),
            f("gpupercnow", Prim::I32),
            f("mempercnow", Prim::I32),
            f("memtotnow", Prim::I64),
            f("memusenow", Prim::I64),
            f("samples", Prim::I64),
            f("gpuperccum", Prim::I64),
            f("memperccum", Prim::I64),
            f("memusecum", Prim::I64),
        ],
    )
}

pub(crate) fn gpu_stat() -> StructLayout {
    StructLayout::new(
        "gpustat",
        vec![
            f("nrgpus", Prim::I32),
            garr("gpu", per_gpu(), MAXGPU, "nrgpus"),
        ],
    )
}

fn per_ifb() -> StructLayout {
    StructLayout::new(
        "perifb",
        vec![
            text("ibname", MAXIBNAME),
            f("portnr", Prim::I16),
            f("lanes", Prim::I16),
            f("rate", Prim::I64),
            f("rcvb", Prim::I64),
            f("sndb", Prim::I64),
            f("rcvp", Prim::I64),
            f("sndp", Prim::I64),
        ],
    )
}

pub(crate) fn ifb_stat() -> StructLayout {
    StructLayout::new(
        "ifbstat",
        vec![
            f("nrports", Prim::I32),
            garr("ifb", per_ifb(), MAXIBPORT, "nrports"),
        ],
    )
}

fn sstat() -> StructLayout {
    StructLayout::new(
        "sstat",
        vec![
            group("cpu", cpu_stat()),
            group("mem", v2_3::mem_stat()),
            group("net", v1_26::net_stat()),
            group("intf", v2_3::intf_stat()),
            group("dsk", v2_3::dsk_stat()),
            group("nfs", v2_3::nfs_stat()),
            group("cfs", v2_3::cont_stat()),
            group("psi", pressure()),
            group("gpu", gpu_stat()),
            group("ifb", ifb_stat()),
            group("www", v1_26::www_stat()),
        ],
    )
}

pub(crate) fn gpu() -> StructLayout {
    StructLayout::new(
        "gpu",
        vec![
            text("state", 1),
            text("cfuture", 3),
            f("nrgpus", Prim::I16),
            f("gpulist", Prim::I32),
            f("gpubusy", Prim::I32),
            f("membusy", Prim::I32),
            f("timems", Prim::I64),
            f("memnow", Prim::I64),
            f("memcum", Prim::I64),
            f("sample", Prim::I64),
        ],
    )
}

fn tstat() -> StructLayout {
    StructLayout::new(
        "tstat",
        vec![
            group("gen", v2_3::gen()),
            group("cpu", v1_26::cpu()),
            group("dsk", v1_26::dsk()),
            group("mem", v2_3::mem()),
            group("net", v2_3::net()),
            group("gpu", gpu()),
        ],
    )
}

pub(crate) fn layout() -> Layout {
    Layout {
        major: 2,
        minor: 4,
        header: v2_3::header(),
        record: v2_3::record(),
        sstat: sstat(),
        tstat: tstat(),
    }
}
