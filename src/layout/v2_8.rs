//! Struct tables for atop 2.8 logs.
//!
//! 2.8 is the cgroup-v2 release: the header gains `pidwidth`, the per-task
//! gen group gains `cgpath`, and the cpu and mem groups grow cgroup limit
//! fields. It also adds the last-level-cache subsystem, socket and paging
//! counters in memstat, explicit `numanr` tags in the NUMA structs, and an
//! `InCsumErrors` counter in the ICMPv4 table.

use super::shared::utsname;
use super::{arr, f, garr, group, text, Layout, Prim, StructLayout};
use super::{v1_26, v2_3, v2_4, v2_7};

const PNAMLEN: usize = 15;
const CMDLEN: usize = 255;
const CGRLEN: usize = 64;
const MAXDSK: usize = 1024;
const MAXNUMA: usize = 1024;
const MAXLVM: usize = 2048;
const MAXMDD: usize = 256;
const MAXLLC: usize = 256;
const MAXDKNAM: usize = 32;

pub(crate) fn header() -> StructLayout {
    StructLayout::new(
        "rawheader",
        vec![
            f("magic", Prim::U32),
            f("aversion", Prim::U16),
            f("future1", Prim::U16),
            f("future2", Prim::U16),
            f("rawheadlen", Prim::U16),
            f("rawreclen", Prim::U16),
            f("hertz", Prim::U16),
            f("pidwidth", Prim::U16),
            arr("sfuture", Prim::U16, 5),
            f("sstatlen", Prim::U32),
            f("tstatlen", Prim::U32),
            group("utsname", utsname()),
            text("cfuture", 8),
            f("pagesize", Prim::U32),
            f("supportflags", Prim::I32),
            f("osrel", Prim::I32),
            f("osvers", Prim::I32),
            f("ossub", Prim::I32),
            arr("ifuture", Prim::I32, 6),
        ],
    )
}

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
            f("tcpsock", Prim::I64),
            f("udpsock", Prim::I64),
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
            f("pgouts", Prim::I64),
            f("pgins", Prim::I64),
            f("pagetables", Prim::I64),
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
        ],
    )
}

pub(crate) fn mem_numa() -> StructLayout {
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
            f("numanr", Prim::I32),
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

pub(crate) fn cpu_numa() -> StructLayout {
    StructLayout::new(
        "cpunuma",
        vec![
            f("nrnuma", Prim::I64),
            garr("numa", cpu_per_numa(), MAXNUMA, "nrnuma"),
        ],
    )
}

pub(crate) fn per_dsk() -> StructLayout {
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
            f("inflight", Prim::I64),
            arr("cfuture", Prim::I64, 3),
        ],
    )
}

pub(crate) fn dsk_stat() -> StructLayout {
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

fn per_llc() -> StructLayout {
    StructLayout::new(
        "perllc",
        vec![
            f("id", Prim::U8),
            f("occupancy", Prim::F32),
            f("mbm_local", Prim::I64),
            f("mbm_total", Prim::I64),
        ],
    )
}

pub(crate) fn llc_stat() -> StructLayout {
    StructLayout::new(
        "llcstat",
        vec![
            f("nrllcs", Prim::I32),
            garr("perllc", per_llc(), MAXLLC, "nrllcs"),
        ],
    )
}

pub(crate) fn icmpv4_stats() -> StructLayout {
    StructLayout::new(
        "icmpv4_stats",
        vec![
            f("InMsgs", Prim::I64),
            f("InErrors", Prim::I64),
            f("InCsumErrors", Prim::I64),
            f("InDestUnreachs", Prim::I64),
            f("InTimeExcds", Prim::I64),
            f("InParmProbs", Prim::I64),
            f("InSrcQuenchs", Prim::I64),
            f("InRedirects", Prim::I64),
            f("InEchos", Prim::I64),
            f("InEchoReps", Prim::I64),
            f("InTimestamps", Prim::I64),
            f("InTimestampReps", Prim::I64),
            f("InAddrMasks", Prim::I64),
            f("InAddrMaskReps", Prim::I64),
            f("OutMsgs", Prim::I64),
            f("OutErrors", Prim::I64),
            f("OutDestUnreachs", Prim::I64),
            f("OutTimeExcds", Prim::I64),
            f("OutParmProbs", Prim::I64),
            f("OutSrcQuenchs", Prim::I64),
            f("OutRedirects", Prim::I64),
            f("OutEchos", Prim::I64),
            f("OutEchoReps", Prim::I64),
            f("OutTimestamps", Prim::I64),
            f("OutTimestampReps", Prim::I64),
            f("OutAddrMasks", Prim::I64),
            f("OutAddrMaskReps", Prim::I64),
        ],
    )
}

pub(crate) fn net_stat() -> StructLayout {
    StructLayout::new(
        "netstat",
        vec![
            group("ipv4", v1_26::ipv4_stats()),
            group("icmpv4", icmpv4_stats()),
            group("udpv4", v1_26::udpv4_stats()),
            group("ipv6", v1_26::ipv6_stats()),
            group("icmpv6", v1_26::icmpv6_stats()),
            group("udpv6", v1_26::udpv6_stats()),
            group("tcp", v1_26::tcp_stats()),
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
            group("cpunuma", cpu_numa()),
            group("dsk", dsk_stat()),
            group("nfs", v2_3::nfs_stat()),
            group("cfs", v2_3::cont_stat()),
            group("psi", v2_4::pressure()),
            group("gpu", v2_4::gpu_stat()),
            group("ifb", v2_4::ifb_stat()),
            group("llc", llc_stat()),
            group("www", v1_26::www_stat()),
        ],
    )
}

pub(crate) fn gen() -> StructLayout {
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
            f("ctid", Prim::I32),
            f("vpid", Prim::I32),
            f("wasinactive", Prim::I32),
            text("container", 16),
            text("cgpath", CGRLEN),
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
            f("cgcpuweight", Prim::I32),
            f("cgcpumax", Prim::I32),
            f("cgcpumaxr", Prim::I32),
            arr("ifuture", Prim::I32, 3),
            text("wchan", 16),
            f("rundelay", Prim::I64),
            f("blkdelay", Prim::I64),
            arr("cfuture", Prim::I64, 3),
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
            f("cgmemmax", Prim::I64),
            f("cgmemmaxr", Prim::I64),
            f("cgswpmax", Prim::I64),
            f("cgswpmaxr", Prim::I64),
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
            group("mem", mem()),
            group("net", v2_3::net()),
            group("gpu", v2_4::gpu()),
        ],
    )
}

pub(crate) fn layout() -> Layout {
    Layout {
        major: 2,
        minor: 8,
        header: header(),
        record: v2_3::record(),
        sstat: sstat(),
        tstat: tstat(),
    }
}
