//! Version-keyed struct layout registry.
//!
//! Atop writes its log records by dumping C structs to disk, so the on-disk
//! layout is whatever the compiler produced for the writing version:
//! natural alignment, internal padding, fixed-bound trailing arrays. Each
//! registered version gets an explicit field table here, and the byte
//! offsets are computed with the same packing rules (System V x86-64, which
//! is what every released atop binary uses), so decoding is bit-exact
//! without ever reinterpreting raw bytes as structs.
//!
//! Lookup is by exact (major, minor) pair. Field layouts changed between
//! adjacent minor releases, so there is no range matching and no fallback:
//! an unregistered version is refused outright.

mod shared;
mod v1_26;
mod v2_10;
mod v2_3;
mod v2_4;
mod v2_5;
mod v2_6;
mod v2_7;
mod v2_8;
mod v2_9;

use std::sync::LazyLock;

/// Primitive field types that appear in the raw structs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prim {
    U8,
    I16,
    U16,
    I32,
    U32,
    /// `count_t`, `time_t` and `long` are all 8-byte signed on the
    /// producing platforms.
    I64,
    U64,
    F32,
    /// One byte of a fixed-width character array; decoded as text up to the
    /// first NUL.
    Char,
}

impl Prim {
    pub fn size(self) -> usize {
        match self {
            Prim::U8 | Prim::Char => 1,
            Prim::I16 | Prim::U16 => 2,
            Prim::I32 | Prim::U32 | Prim::F32 => 4,
            Prim::I64 | Prim::U64 => 8,
        }
    }

    pub fn align(self) -> usize {
        self.size()
    }
}

#[derive(Debug, Clone)]
pub enum FieldKind {
    Prim(Prim),
    Group(StructLayout),
}

/// One field of a struct: a scalar, a fixed array of scalars, a nested
/// group, or a fixed array of groups (optionally limited by a sibling
/// count field at decode time).
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub count: usize,
    /// Name of a previously-decoded sibling field bounding how many array
    /// elements actually carry data (e.g. `cpu[MAXCPU]` limited by `nrcpu`).
    pub limiter: Option<&'static str>,
}

impl FieldSpec {
    fn elem_size(&self) -> usize {
        match &self.kind {
            FieldKind::Prim(p) => p.size(),
            FieldKind::Group(g) => g.size,
        }
    }

    fn elem_align(&self) -> usize {
        match &self.kind {
            FieldKind::Prim(p) => p.align(),
            FieldKind::Group(g) => g.align,
        }
    }
}

/// A field with its computed byte offset.
#[derive(Debug, Clone)]
pub struct FieldLayout {
    pub spec: FieldSpec,
    pub offset: usize,
}

impl FieldLayout {
    /// Byte stride between consecutive array elements (equals element size:
    /// a C struct's size is already padded to a multiple of its alignment).
    pub fn stride(&self) -> usize {
        self.spec.elem_size()
    }
}

/// The computed layout of one struct kind: ordered fields, total encoded
/// width (including trailing padding), and alignment.
#[derive(Debug, Clone)]
pub struct StructLayout {
    pub name: &'static str,
    pub fields: Vec<FieldLayout>,
    pub size: usize,
    pub align: usize,
}

fn round_up(n: usize, align: usize) -> usize {
    (n + align - 1) / align * align
}

impl StructLayout {
    pub(crate) fn new(name: &'static str, fields: Vec<FieldSpec>) -> Self {
        let mut laid = Vec::with_capacity(fields.len());
        let mut offset = 0usize;
        let mut align = 1usize;
        for spec in fields {
            let a = spec.elem_align();
            align = align.max(a);
            offset = round_up(offset, a);
            let width = spec.elem_size() * spec.count;
            laid.push(FieldLayout { spec, offset });
            offset += width;
        }
        StructLayout {
            name,
            fields: laid,
            size: round_up(offset, align),
            align,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.spec.name == name)
    }

    /// Resolve a dotted path (`"cpu.all.stime"`) to an absolute byte offset.
    /// For array fields the offset of element zero is returned.
    pub fn offset_of(&self, path: &str) -> Option<usize> {
        let mut layout = self;
        let mut base = 0usize;
        let mut parts = path.split('.').peekable();
        while let Some(part) = parts.next() {
            let field = layout.field(part)?;
            base += field.offset;
            if parts.peek().is_none() {
                return Some(base);
            }
            match &field.spec.kind {
                FieldKind::Group(g) => layout = g,
                FieldKind::Prim(_) => return None,
            }
        }
        None
    }
}

// Field-spec constructors used by the per-version tables.

pub(crate) fn f(name: &'static str, p: Prim) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Prim(p),
        count: 1,
        limiter: None,
    }
}

pub(crate) fn arr(name: &'static str, p: Prim, count: usize) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Prim(p),
        count,
        limiter: None,
    }
}

/// A fixed-width character array, decoded as NUL-terminated text.
pub(crate) fn text(name: &'static str, len: usize) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Prim(Prim::Char),
        count: len,
        limiter: None,
    }
}

pub(crate) fn group(name: &'static str, layout: StructLayout) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Group(layout),
        count: 1,
        limiter: None,
    }
}

pub(crate) fn garr(
    name: &'static str,
    layout: StructLayout,
    count: usize,
    limiter: &'static str,
) -> FieldSpec {
    FieldSpec {
        name,
        kind: FieldKind::Group(layout),
        count,
        limiter: Some(limiter),
    }
}

/// The complete layout set for one producing version: the four struct kinds
/// the decoder needs, immutable and shared by every decode session.
#[derive(Debug, Clone)]
pub struct Layout {
    pub major: u16,
    pub minor: u16,
    pub header: StructLayout,
    pub record: StructLayout,
    pub sstat: StructLayout,
    pub tstat: StructLayout,
}

static REGISTRY: LazyLock<Vec<Layout>> = LazyLock::new(|| {
    vec![
        v1_26::layout(),
        v2_3::layout(),
        v2_4::layout(),
        v2_5::layout(),
        v2_6::layout(),
        v2_7::layout(),
        v2_8::layout(),
        v2_9::layout(),
        v2_10::layout(),
    ]
});

/// Look up the layout for an exact (major, minor) producer version.
pub fn lookup(major: u16, minor: u16) -> Option<&'static Layout> {
    REGISTRY.iter().find(|l| l.major == major && l.minor == minor)
}

/// All registered (major, minor) versions, in registration order.
pub fn registered_versions() -> Vec<(u16, u16)> {
    REGISTRY.iter().map(|l| (l.major, l.minor)).collect()
}
