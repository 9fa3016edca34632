//! Struct tables for atop 2.7 logs.
//!
//! 2.7 introduces the per-NUMA-node memory and cpu subsystems, widens
//! percpu again, extends memstat with KSM and zswap counters, and adds
//! discard counters to perdsk. The per-task struct is unchanged from 2.6.

use super::{arr, f, garr, group, text, Layout, Prim, StructLayout};
use super::{v1_26, v2_3, v2_4, v2_6};

const MAXCPU: usize = 2048;
const MAXDSK: usize = 1024;
const MAXNUMA: usize = 1024;
const MAXLVM: usize = 2048;
const MAXMDD: usize = 256;
const MAXDKNAM: usize = 32;

fn mem_stat() -> StructLayout {
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
            f("ksmsharing", Prim::I64),
            f("ksmshared", Prim::I64),
            f("zswstored", Prim::I64),
            f("zswtotpool", Prim::I64),
            f("oomkills", Prim::I64),
            f("compactstall", Prim::I64),
            f("pgmigrate", Prim::I64),
            f("numamigrate", Prim::I64),
            arr("cfuture", Prim::I64, 9),
        ],
    )
}

fn mem_per_numa() -> StructLayout {
    StructLayout::new(
        "mempernuma",
        vec![
            f("frag", Prim::F32),
            f("totmem", Prim::I64),
            f("freemem", Prim::I64),
            f("filepage", Prim::I64),
            f("dirtymem", Prim::I64),
            f("slabmem", Prim::I64),
            f("slabreclaim", Prim::I64),
            f("active", Prim::I64),
            f("inactive", Prim::I64),
            f("shmem", Prim::I64),
            f("tothp", Prim::I64),
        ],
    )
}

fn mem_numa() -> StructLayout {
    StructLayout::new(
        "memnuma",
        vec![
            f("nrnuma", Prim::I64),
            garr("numa", mem_per_numa(), MAXNUMA, "nrnuma"),
        ],
    )
}

fn cpu_per_numa() -> StructLayout {
    StructLayout::new(
        "cpupernuma",
        vec![
            f("nrcpu", Prim::I64),
            f("stime", Prim::I64),
            f("utime", Prim::I64),
            f("ntime", Prim::I64),
            f("itime", Prim::I64),
            f("wtime", Prim::I64),
            f("Itime", Prim::I64),
            f("Stime", Prim::I64),
            f("steal", Prim::I64),
            f("guest", Prim::I64),
        ],
    )
}

fn cpu_numa() -> StructLayout {
    StructLayout::new(
        "cpunuma",
        vec![
            f("nrnuma", Prim::I64),
            garr("numa", cpu_per_numa(), MAXNUMA, "nrnuma"),
        ],
    )
}

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
            arr("cfuture", Prim::I64, 6),
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

fn per_dsk() -> StructLayout {
    StructLayout::new(
        "perdsk",
        vec![
            text("name", MAXDKNAM),
            f("nread", Prim::I64),
            f("nrsect", Prim::I64),
            f("nwrite", Prim::I64),
            f("nwsect", Prim::I64),
            f("io_ms", Prim::I64),
            f("avque", Prim::I64),
            f("ndisc", Prim::I64),
            f("ndsect", Prim::I64),
            arr("cfuture", Prim::I64, 2),
        ],
    )
}

fn dsk_stat() -> StructLayout {
    StructLayout::new(
        "dskstat",
        vec![
            f("ndsk", Prim::I32),
            f("nmdd", Prim::I32),
            f("nlvm", Prim::I32),
            garr("dsk", per_dsk(), MAXDSK, "ndsk"),
            garr("mdd", per_dsk(), MAXMDD, "nmdd"),
            garr("lvm", per_dsk(), MAXLVM, "nlvm"),
        ],
    )
}

fn sstat() -> StructLayout {
    StructLayout::new(
        "sstat",
        vec![
            group("cpu", cpu_stat()),
            group("mem", mem_stat()),
            group("net", v1_26::net_stat()),
            group("intf", v2_3::intf_stat()),
            group("memnuma", mem_numa()),
            group("cpunuma", cpu_numa()),
            group("dsk", dsk_stat()),
            group("nfs", v2_3::nfs_stat()),
            group("cfs", v2_3::cont_stat()),
            group("psi", v2_4::pressure()),
            group("gpu", v2_4::gpu_stat()),
            group("ifb", v2_4::ifb_stat()),
            group("www", v1_26::www_stat()),
        ],
    )
}

pub(crate) fn layout() -> Layout {
    Layout {
        major: 2,
        minor: 7,
        header: v2_3::header(),
        record: v2_3::record(),
        sstat: sstat(),
        tstat: v2_6::tstat(),
    }
}
