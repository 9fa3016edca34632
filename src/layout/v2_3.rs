//! Struct tables for atop 2.3 logs.
//!
//! 2.3 renames the per-task struct from `pstat` to `tstat` (header field
//! `tstatlen`), widens the command line to 255 bytes, raises the system
//! bounds, and adds the NFS and container subsystems. Network sub-stats and
//! several tstat groups are unchanged from 1.26 and reused from there.

use super::shared::utsname;
use super::{arr, f, garr, group, text, Layout, Prim, StructLayout};
use super::v1_26;

const PNAMLEN: usize = 15;
const CMDLEN: usize = 255;
const MAXCPU: usize = 2048;
const MAXDSK: usize = 1024;
const MAXLVM: usize = 2048;
const MAXMDD: usize = 256;
const MAXINTF: usize = 128;
const MAXCONTAINER: usize = 128;
const MAXNFSMOUNT: usize = 64;
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
            arr("sfuture", Prim::U16, 6),
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
            f("ndeviat", Prim::U32),
            f("nactproc", Prim::U32),
            f("ntask", Prim::U32),
            f("totproc", Prim::U32),
            f("totrun", Prim::U32),
            f("totslpi", Prim::U32),
            f("totslpu", Prim::U32),
            f("totzomb", Prim::U32),
            f("nexit", Prim::U32),
            f("noverflow", Prim::U32),
            arr("ifuture", Prim::U32, 6),
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
            arr("cfuture", Prim::I64, 8),
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
            arr("cfuture", Prim::I64, 4),
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
            arr("cfuture", Prim::I64, 4),
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

pub(crate) fn per_intf() -> StructLayout {
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
            text("type", 1),
            f("speed", Prim::I64),
            f("speedp", Prim::I64),
            text("duplex", 1),
            arr("cfuture", Prim::I64, 4),
        ],
    )
}

pub(crate) fn intf_stat() -> StructLayout {
    StructLayout::new(
        "intfstat",
        vec![
            f("nrintf", Prim::I32),
            garr("intf", per_intf(), MAXINTF, "nrintf"),
        ],
    )
}

fn per_nfs_mount() -> StructLayout {
    StructLayout::new(
        "pernfsmount",
        vec![
            text("mountdev", 128),
            f("age", Prim::I64),
            f("bytesread", Prim::I64),
            f("byteswrite", Prim::I64),
            f("bytesdread", Prim::I64),
            f("bytesdwrite", Prim::I64),
            f("bytestotread", Prim::I64),
            f("bytestotwrite", Prim::I64),
            f("pagesmread", Prim::I64),
            f("pagesmwrite", Prim::I64),
            arr("future", Prim::I64, 8),
        ],
    )
}

fn nfs_server() -> StructLayout {
    StructLayout::new(
        "server",
        vec![
            f("netcnt", Prim::I64),
            f("netudpcnt", Prim::I64),
            f("nettcpcnt", Prim::I64),
            f("nettcpcon", Prim::I64),
            f("rpccnt", Prim::I64),
            f("rpcbadfmt", Prim::I64),
            f("rpcbadaut", Prim::I64),
            f("rpcbadcln", Prim::I64),
            f("rpcread", Prim::I64),
            f("rpcwrite", Prim::I64),
            f("rchits", Prim::I64),
            f("rcmiss", Prim::I64),
            f("rcnoca", Prim::I64),
            f("nrbytes", Prim::I64),
            f("nwbytes", Prim::I64),
            arr("future", Prim::I64, 8),
        ],
    )
}

fn nfs_client() -> StructLayout {
    StructLayout::new(
        "client",
        vec![
            f("rpccnt", Prim::I64),
            f("rpcretrans", Prim::I64),
            f("rpcautrefresh", Prim::I64),
            f("rpcread", Prim::I64),
            f("rpcwrite", Prim::I64),
            arr("future", Prim::I64, 8),
        ],
    )
}

fn nfs_mounts() -> StructLayout {
    StructLayout::new(
        "nfsmounts",
        vec![
            f("nrmounts", Prim::I32),
            garr("nfsmnt", per_nfs_mount(), MAXNFSMOUNT, "nrmounts"),
        ],
    )
}

pub(crate) fn nfs_stat() -> StructLayout {
    StructLayout::new(
        "nfsstat",
        vec![
            group("server", nfs_server()),
            group("client", nfs_client()),
            group("nfsmounts", nfs_mounts()),
        ],
    )
}

fn per_container() -> StructLayout {
    StructLayout::new(
        "percontainer",
        vec![
            f("ctid", Prim::U64),
            f("numproc", Prim::U64),
            f("system", Prim::I64),
            f("user", Prim::I64),
            f("nice", Prim::I64),
            f("uptime", Prim::I64),
            f("physpages", Prim::I64),
        ],
    )
}

pub(crate) fn cont_stat() -> StructLayout {
    StructLayout::new(
        "contstat",
        vec![
            f("nrcontainer", Prim::I32),
            garr("cont", per_container(), MAXCONTAINER, "nrcontainer"),
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
            group("intf", intf_stat()),
            group("dsk", dsk_stat()),
            group("nfs", nfs_stat()),
            group("cfs", cont_stat()),
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
            arr("cfuture", Prim::I64, 4),
        ],
    )
}

pub(crate) fn net() -> StructLayout {
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
            f("avail1", Prim::I64),
            f("avail2", Prim::I64),
            arr("cfuture", Prim::I64, 4),
        ],
    )
}

fn tstat() -> StructLayout {
    StructLayout::new(
        "tstat",
        vec![
            group("gen", gen()),
            group("cpu", v1_26::cpu()),
            group("dsk", v1_26::dsk()),
            group("mem", mem()),
            group("net", net()),
        ],
    )
}

pub(crate) fn layout() -> Layout {
    Layout {
        major: 2,
        minor: 3,
        header: header(),
        record: record(),
        sstat: sstat(),
        tstat: tstat(),
    }
}
