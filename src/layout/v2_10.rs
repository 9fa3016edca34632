//! Struct tables for atop 2.10 logs.
//!
//! 2.10 reworks memstat (hugepage counters split into static and large
//! variants, zswap accounting, `availablemem`), adds `freehp` per NUMA
//! node, `InCsumErrors` to the TCP table, and replaces the per-task
//! `container` field with a per-task `utsname` plus `nthridle`.

use super::{arr, f, garr, group, text, Layout, Prim, StructLayout};
use super::{v1_26, v2_3, v2_4, v2_7, v2_8};

const PNAMLEN: usize = 15;
const CMDLEN: usize = 255;
const CGRLEN: usize = 64;
const UTSLEN: usize = 15;
const MAXNUMA: usize = 1024;

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
            f("tcpsock", Prim::I64),
            f("udpsock", Prim::I64),
            f("commitlim", Prim::I64),
            f("committed", Prim::I64),
            f("shmem", Prim::I64),
            f("shmrss", Prim::I64),
            f("shmswp", Prim::I64),
            f("slabreclaim", Prim::I64),
            f("stothugepage", Prim::I64),
            f("sfreehugepage", Prim::I64),
            f("shugepagesz", Prim::I64),
            f("vmwballoon", Prim::I64),
            f("zfsarcsize", Prim::I64),
            f("swapcached", Prim::I64),
            f("ksmsharing", Prim::I64),
            f("ksmshared", Prim::I64),
            f("zswapped", Prim::I64),
            f("zswap", Prim::I64),
            f("oomkills", Prim::I64),
            f("compactstall", Prim::I64),
            f("pgmigrate", Prim::I64),
            f("numamigrate", Prim::I64),
            f("pgouts", Prim::I64),
            f("pgins", Prim::I64),
            f("pagetables", Prim::I64),
            f("zswouts", Prim::I64),
            f("zswins", Prim::I64),
            f("ltothugepage", Prim::I64),
            f("lfreehugepage", Prim::I64),
            f("lhugepagesz", Prim::I64),
            f("availablemem", Prim::I64),
            f("anonhugepage", Prim::I64),
            arr("cfuture", Prim::I64, 4),
        ],
    )
}

fn mem_per_numa() -> StructLayout {
    StructLayout::new(
        "mempernuma",
        vec![
            f("numanr", Prim::I32),
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
            f("freehp", Prim::I64),
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

fn tcp_stats() -> StructLayout {
    StructLayout::new(
        "tcp_stats",
        vec![
            f("RtoAlgorithm", Prim::I64),
            f("RtoMin", Prim::I64),
            f("RtoMax", Prim::I64),
            f("MaxConn", Prim::I64),
            f("ActiveOpens", Prim::I64),
            f("PassiveOpens", Prim::I64),
            f("AttemptFails", Prim::I64),
            f("EstabResets", Prim::I64),
            f("CurrEstab", Prim::I64),
            f("InSegs", Prim::I64),
            f("OutSegs", Prim::I64),
            f("RetransSegs", Prim::I64),
            f("InErrs", Prim::I64),
            f("OutRsts", Prim::I64),
            f("InCsumErrors", Prim::I64),
        ],
    )
}

fn net_stat() -> StructLayout {
    StructLayout::new(
        "netstat",
        vec![
            group("ipv4", v1_26::ipv4_stats()),
            group("icmpv4", v2_8::icmpv4_stats()),
            group("udpv4", v1_26::udpv4_stats()),
            group("ipv6", v1_26::ipv6_stats()),
            group("icmpv6", v1_26::icmpv6_stats()),
            group("udpv6", v1_26::udpv6_stats()),
            group("tcp", tcp_stats()),
        ],
    )
}

fn sstat() -> StructLayout {
    StructLayout::new(
        "sstat",
        vec![
            group("cpu", v2_7::cpu_stat()),
            group("mem", mem_stat()),
            group("net", net_stat()),
            group("intf", v2_3::intf_stat()),
            group("memnuma", mem_numa()),
            group("cpunuma", v2_8::cpu_numa()),
            group("dsk", v2_8::dsk_stat()),
            group("nfs", v2_3::nfs_stat()),
            group("cfs", v2_3::cont_stat()),
            group("psi", v2_4::pressure()),
            group("gpu", v2_4::gpu_stat()),
            group("ifb", v2_4::ifb_stat()),
            group("llc", v2_8::llc_stat()),
            group("www", v1_26::www_stat()),
        ],
    )
}

fn gen() -> StructLayout {
    StructLayout::new(
        "gen",
        vec![
            f("tgid", Prim::I32),
            f("pid", Prim::I32),
            f("ppid", Prim::I32),
            f("ruid", Prim::I32),
            f("euid", Prim::I32),
            f("suid", Prim::I32),
            f("fsuid", Prim::I32),
            f("rgid", Prim::I32),
            f("egid", Prim::I32),
            f("sgid", Prim::I32),
            f("fsgid", Prim::I32),
            f("nthr", Prim::I32),
            text("name", PNAMLEN + 1),
            text("isproc", 1),
            text("state", 1),
            f("excode", Prim::I32),
            f("btime", Prim::I64),
            f("elaps", Prim::I64),
            text("cmdline", CMDLEN + 1),
            f("nthrslpi", Prim::I32),
            f("nthrslpu", Prim::I32),
            f("nthrrun", Prim::I32),
            f("nthridle", Prim::I32),
            f("ctid", Prim::I32),
            f("vpid", Prim::I32),
            f("wasinactive", Prim::I32),
            text("utsname", UTSLEN + 1),
            text("cgpath", CGRLEN),
        ],
    )
}

fn cpu() -> StructLayout {
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
            arr("cfuture", Prim::I64, 3),
        ],
    )
}

fn tstat() -> StructLayout {
    StructLayout::new(
        "tstat",
        vec![
            group("gen", gen()),
            group("cpu", cpu()),
            group("dsk", v1_26::dsk()),
            group("mem", v2_8::mem()),
            group("net", v2_3::net()),
            group("gpu", v2_4::gpu()),
        ],
    )
}

pub(crate) fn layout() -> Layout {
    Layout {
        major: 2,
        minor: 10,
        header: v2_8::header(),
        record: v2_3::record(),
        sstat: sstat(),
        tstat: tstat(),
    }
}
