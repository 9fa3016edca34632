//! Struct tables for atop 1.26 logs.
//!
//! Field names and ordering match the atop 1.26 sources (`rawlog.c`,
//! `photosyst.h`, `photoproc.h`) so projected output lines up with the
//! tool's own documentation. 1.26 predates the tstat rename: the per-task
//! struct is `pstat` and the header carries `pstatlen`.

use super::shared::utsname;
use super::{arr, f, garr, group, text, Layout, Prim, StructLayout};

// Bounds from photosyst.h / photoproc.h.
const PNAMLEN: usize = 15;
const CMDLEN: usize = 150;
const MAXCPU: usize = 64;
const MAXDSK: usize = 256;
const MAXLVM: usize = 256;
const MAXMDD: usize = 128;
const MAXDKNAM: usize = 32;
const MAXINTF: usize = 32;

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
            arr("sfuture", Prim::U16, 6),
            f("sstatlen", Prim::U32),
            f("pstatlen", Prim::U32),
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

pub(crate) fn record() -> StructLayout {
    StructLayout::new(
        "rawrecord",
        vec![
            f("curtime", Prim::I64),
            f("flags", Prim::U16),
            arr("sfuture", Prim::U16, 3),
            f("scomplen", Prim::U32),
            f("pcomplen", Prim::U32),
            f("interval", Prim::U32),
            f("nlist", Prim::U32),
            f("npresent", Prim::U32),
            f("nexit", Prim::U32),
            f("ntrun", Prim::U32),
            f("ntslpi", Prim::U32),
            f("ntslpu", Prim::U32),
            f("nzombie", Prim::U32),
            arr("ifuture", Prim::U32, 6),
        ],
    )
}

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
            f("allocstall", Prim::I64),
            f("swouts", Prim::I64),
            f("swins", Prim::I64),
            f("commitlim", Prim::I64),
            f("committed", Prim::I64),
            arr("cfuture", Prim::I64, 4),
        ],
    )
}

pub(crate) fn freq_cnt() -> StructLayout {
    StructLayout::new(
        "freqcnt",
        vec![
            f("maxfreq", Prim::I64),
            f("cnt", Prim::I64),
            f("ticks", Prim::I64),
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
            group("freqcnt", freq_cnt()),
            arr("cfuture", Prim::I64, 1),
        ],
    )
}

fn cpu_stat() -> StructLayout {
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

pub(crate) fn ipv4_stats() -> StructLayout {
    StructLayout::new(
        "ipv4_stats",
        vec![
            f("Forwarding", Prim::I64),
            f("DefaultTTL", Prim::I64),
            f("InReceives", Prim::I64),
            f("InHdrErrors", Prim::I64),
            f("InAddrErrors", Prim::I64),
            f("ForwDatagrams", Prim::I64),
            f("InUnknownProtos", Prim::I64),
            f("InDiscards", Prim::I64),
            f("InDelivers", Prim::I64),
            f("OutRequests", Prim::I64),
            f("OutDiscards", Prim::I64),
            f("OutNoRoutes", Prim::I64),
            f("ReasmTimeout", Prim::I64),
            f("ReasmReqds", Prim::I64),
            f("ReasmOKs", Prim::I64),
            f("ReasmFails", Prim::I64),
            f("FragOKs", Prim::I64),
            f("FragFails", Prim::I64),
            f("FragCreates", Prim::I64),
        ],
    )
}

pub(crate) fn icmpv4_stats() -> StructLayout {
    StructLayout::new(
        "icmpv4_stats",
        vec![
            f("InMsgs", Prim::I64),
            f("InErrors", Prim::I64),
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

pub(crate) fn udpv4_stats() -> StructLayout {
    StructLayout::new(
        "udpv4_stats",
        vec![
            f("InDatagrams", Prim::I64),
            f("NoPorts", Prim::I64),
            f("InErrors", Prim::I64),
            f("OutDatagrams", Prim::I64),
        ],
    )
}

pub(crate) fn tcp_stats() -> StructLayout {
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
        ],
    )
}

pub(crate) fn ipv6_stats() -> StructLayout {
    StructLayout::new(
        "ipv6_stats",
        vec![
            f("Ip6InReceives", Prim::I64),
            f("Ip6InHdrErrors", Prim::I64),
            f("Ip6InTooBigErrors", Prim::I64),
            f("Ip6InNoRoutes", Prim::I64),
            f("Ip6InAddrErrors", Prim::I64),
            f("Ip6InUnknownProtos", Prim::I64),
            f("Ip6InTruncatedPkts", Prim::I64),
            f("Ip6InDiscards", Prim::I64),
            f("Ip6InDelivers", Prim::I64),
            f("Ip6OutForwDatagrams", Prim::I64),
            f("Ip6OutRequests", Prim::I64),
            f("Ip6OutDiscards", Prim::I64),
            f("Ip6OutNoRoutes", Prim::I64),
            f("Ip6ReasmTimeout", Prim::I64),
            f("Ip6ReasmReqds", Prim::I64),
            f("Ip6ReasmOKs", Prim::I64),
            f("Ip6ReasmFails", Prim::I64),
            f("Ip6FragOKs", Prim::I64),
            f("Ip6FragFails", Prim::I64),
            f("Ip6FragCreates", Prim::I64),
            f("Ip6InMcastPkts", Prim::I64),
            f("Ip6OutMcastPkts", Prim::I64),
        ],
    )
}

pub(crate) fn icmpv6_stats() -> StructLayout {
    StructLayout::new(
        "icmpv6_stats",
        vec![
            f("Icmp6InMsgs", Prim::I64),
            f("Icmp6InErrors", Prim::I64),
            f("Icmp6InDestUnreachs", Prim::I64),
            f("Icmp6InPktTooBigs", Prim::I64),
            f("Icmp6InTimeExcds", Prim::I64),
            f("Icmp6InParmProblems", Prim::I64),
            f("Icmp6InEchos", Prim::I64),
            f("Icmp6InEchoReplies", Prim::I64),
            f("Icmp6InGroupMembQueries", Prim::I64),
            f("Icmp6InGroupMembResponses", Prim::I64),
            f("Icmp6InGroupMembReductions", Prim::I64),
            f("Icmp6InRouterSolicits", Prim::I64),
            f("Icmp6InRouterAdvertisements", Prim::I64),
            f("Icmp6InNeighborSolicits", Prim::I64),
            f("Icmp6InNeighborAdvertisements", Prim::I64),
            f("Icmp6InRedirects", Prim::I64),
            f("Icmp6OutMsgs", Prim::I64),
            f("Icmp6OutDestUnreachs", Prim::I64),
            f("Icmp6OutPktTooBigs", Prim::I64),
            f("Icmp6OutTimeExcds", Prim::I64),
            f("Icmp6OutParmProblems", Prim::I64),
            f("Icmp6OutEchoReplies", Prim::I64),
            f("Icmp6OutRouterSolicits", Prim::I64),
            f("Icmp6OutNeighborSolicits", Prim::I64),
            f("Icmp6OutNeighborAdvertisements", Prim::I64),
            f("Icmp6OutRedirects", Prim::I64),
            f("Icmp6OutGroupMembResponses", Prim::I64),
            f("Icmp6OutGroupMembReductions", Prim::I64),
        ],
    )
}

pub(crate) fn udpv6_stats() -> StructLayout {
    StructLayout::new(
        "udpv6_stats",
        vec![
            f("Udp6InDatagrams", Prim::I64),
            f("Udp6NoPorts", Prim::I64),
            f("Udp6InErrors", Prim::I64),
            f("Udp6OutDatagrams", Prim::I64),
        ],
    )
}

pub(crate) fn net_stat() -> StructLayout {
    StructLayout::new(
        "netstat",
        vec![
            group("ipv4", ipv4_stats()),
            group("icmpv4", icmpv4_stats()),
            group("udpv4", udpv4_stats()),
            group("ipv6", ipv6_stats()),
            group("icmpv6", icmpv6_stats()),
            group("udpv6", udpv6_stats()),
            group("tcp", tcp_stats()),
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
            arr("cfuture", Prim::I64, 4),
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

fn per_intf() -> StructLayout {
    StructLayout::new(
        "perintf",
        vec![
            text("name", 16),
            f("rbyte", Prim::I64),
            f("rpack", Prim::I64),
            f("rerrs", Prim::I64),
            f("rdrop", Prim::I64),
            f("rfifo", Prim::I64),
            f("rframe", Prim::I64),
            f("rcompr", Prim::I64),
            f("rmultic", Prim::I64),
            arr("rfuture", Prim::I64, 4),
            f("sbyte", Prim::I64),
            f("spack", Prim::I64),
            f("serrs", Prim::I64),
            f("sdrop", Prim::I64),
            f("sfifo", Prim::I64),
            f("scollis", Prim::I64),
            f("scarrier", Prim::I64),
            f("scompr", Prim::I64),
            arr("sfuture", Prim::I64, 4),
            f("speed", Prim::I64),
            text("duplex", 1),
            arr("cfuture", Prim::I64, 4),
        ],
    )
}

fn intf_stat() -> StructLayout {
    StructLayout::new(
        "intfstat",
        vec![
            f("nrintf", Prim::I32),
            garr("intf", per_intf(), MAXINTF, "nrintf"),
        ],
    )
}

pub(crate) fn www_stat() -> StructLayout {
    StructLayout::new(
        "wwwstat",
        vec![
            f("accesses", Prim::I64),
            f("totkbytes", Prim::I64),
            f("uptime", Prim::I64),
            f("bworkers", Prim::I32),
            f("iworkers", Prim::I32),
        ],
    )
}

fn sstat() -> StructLayout {
    StructLayout::new(
        "sstat",
        vec![
            group("cpu", cpu_stat()),
            group("mem", mem_stat()),
            group("net", net_stat()),
            group("intf", intf_stat()),
            group("dsk", dsk_stat()),
            group("www", www_stat()),
        ],
    )
}

fn gen() -> StructLayout {
    StructLayout::new(
        "gen",
        vec![
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
            text("state", 1),
            f("excode", Prim::I32),
            f("btime", Prim::I64),
            f("elaps", Prim::I64),
            text("cmdline", CMDLEN + 1),
            f("nthrslpi", Prim::I32),
            f("nthrslpu", Prim::I32),
            f("nthrrun", Prim::I32),
            arr("ifuture", Prim::I32, 1),
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
            arr("cfuture", Prim::I64, 4),
        ],
    )
}

pub(crate) fn dsk() -> StructLayout {
    StructLayout::new(
        "dsk",
        vec![
            f("rio", Prim::I64),
            f("rsz", Prim::I64),
            f("wio", Prim::I64),
            f("wsz", Prim::I64),
            f("cwsz", Prim::I64),
            arr("cfuture", Prim::I64, 4),
        ],
    )
}

fn mem() -> StructLayout {
    StructLayout::new(
        "mem",
        vec![
            f("minflt", Prim::I64),
            f("majflt", Prim::I64),
            f("shtext", Prim::I64),
            f("vmem", Prim::I64),
            f("rmem", Prim::I64),
            f("vgrow", Prim::I64),
            f("rgrow", Prim::I64),
            arr("cfuture", Prim::I64, 4),
        ],
    )
}

fn net() -> StructLayout {
    StructLayout::new(
        "net",
        vec![
            f("tcpsnd", Prim::I64),
            f("tcpssz", Prim::I64),
            f("tcprcv", Prim::I64),
            f("tcprsz", Prim::I64),
            f("udpsnd", Prim::I64),
            f("udpssz", Prim::I64),
            f("udprcv", Prim::I64),
            f("udprsz", Prim::I64),
            f("rawsnd", Prim::I64),
            f("rawrcv", Prim::I64),
            arr("cfuture", Prim::I64, 4),
        ],
    )
}

/// The per-process struct, called `pstat` in this era.
fn pstat() -> StructLayout {
    StructLayout::new(
        "pstat",
        vec![
            group("gen", gen()),
            group("cpu", cpu()),
            group("dsk", dsk()),
            group("mem", mem()),
            group("net", net()),
        ],
    )
}

pub(crate) fn layout() -> Layout {
    Layout {
        major: 1,
        minor: 26,
        header: header(),
        record: record(),
        sstat: sstat(),
        tstat: pstat(),
    }
}
