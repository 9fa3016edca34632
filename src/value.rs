//! Decoded struct values.
//!
//! A [`StructValue`] is the dynamic counterpart of a
//! [`StructLayout`](crate::layout::StructLayout): field names in layout
//! order with their decoded contents. Arrays bounded by a limiter field are
//! truncated while decoding, so a `cpu[2048]` slot with `nrcpu == 4` comes
//! out as a four-element array.

use crate::error::DecodeError;
use crate::layout::{FieldKind, FieldLayout, Prim, StructLayout};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Struct(StructValue),
    Array(Vec<Value>),
}

/// An ordered set of decoded fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    pub name: &'static str,
    fields: Vec<(&'static str, Value)>,
}

impl StructValue {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.fields.iter().map(|(n, v)| (*n, v))
    }

    /// Field as an unsigned integer, if it is any integer kind in range.
    pub fn uint(&self, name: &str) -> Option<u64> {
        match self.get(name)? {
            Value::Uint(v) => Some(*v),
            Value::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            Value::Int(v) => Some(*v),
            Value::Uint(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Follow a dotted path through nested struct values.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut cur = self;
        let mut parts = path.split('.').peekable();
        while let Some(part) = parts.next() {
            let val = cur.get(part)?;
            if parts.peek().is_none() {
                return Some(val);
            }
            match val {
                Value::Struct(s) => cur = s,
                _ => return None,
            }
        }
        None
    }
}

fn slice<'a>(buf: &'a [u8], offset: usize, len: usize, what: &'static str) -> Result<&'a [u8], DecodeError> {
    buf.get(offset..offset + len)
        .ok_or_else(|| DecodeError::CorruptLog(format!("{what} extends past end of buffer")))
}

fn decode_prim(buf: &[u8], offset: usize, p: Prim) -> Result<Value, DecodeError> {
    let bytes = slice(buf, offset, p.size(), "scalar field")?;
    let v = match p {
        Prim::U8 | Prim::Char => Value::Uint(bytes[0] as u64),
        Prim::I16 => Value::Int(i16::from_le_bytes([bytes[0], bytes[1]]) as i64),
        Prim::U16 => Value::Uint(u16::from_le_bytes([bytes[0], bytes[1]]) as u64),
        Prim::I32 => Value::Int(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64),
        Prim::U32 => Value::Uint(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as u64),
        Prim::F32 => Value::Float(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64),
        Prim::I64 => {
            let mut b = [0u8; 8];
            b.copy_from_slice(bytes);
            Value::Int(i64::from_le_bytes(b))
        }
        Prim::U64 => {
            let mut b = [0u8; 8];
            b.copy_from_slice(bytes);
            Value::Uint(u64::from_le_bytes(b))
        }
    };
    Ok(v)
}

fn decode_text(buf: &[u8], offset: usize, len: usize) -> Result<Value, DecodeError> {
    let bytes = slice(buf, offset, len, "text field")?;
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    Ok(Value::Text(
        String::from_utf8_lossy(&bytes[..end]).into_owned(),
    ))
}

/// Effective element count for an array field: the declared bound, clamped
/// by the limiter sibling when one is named. Negative or missing limiter
/// values decode as empty; overlarge ones are capped at the bound.
fn effective_count(field: &FieldLayout, decoded: &StructValue) -> usize {
    let declared = field.spec.count;
    match field.spec.limiter {
        None => declared,
        Some(limiter) => match decoded.int(limiter) {
            Some(n) if n > 0 => (n as usize).min(declared),
            _ => 0,
        },
    }
}

/// Decode one struct from the front of `buf`. The buffer must cover the
/// full encoded width of the layout.
pub fn decode_struct(buf: &[u8], layout: &StructLayout) -> Result<StructValue, DecodeError> {
    if buf.len() < layout.size {
        return Err(DecodeError::CorruptLog(format!(
            "struct {} needs {} bytes, buffer has {}",
            layout.name,
            layout.size,
            buf.len()
        )));
    }
    let mut out = StructValue {
        name: layout.name,
        fields: Vec::with_capacity(layout.fields.len()),
    };
    for field in &layout.fields {
        let value = match &field.spec.kind {
            FieldKind::Prim(Prim::Char) => decode_text(buf, field.offset, field.spec.count)?,
            FieldKind::Prim(p) => {
                if field.spec.count == 1 {
                    decode_prim(buf, field.offset, *p)?
                } else {
                    let mut elems = Vec::with_capacity(field.spec.count);
                    for i in 0..field.spec.count {
                        elems.push(decode_prim(buf, field.offset + i * p.size(), *p)?);
                    }
                    Value::Array(elems)
                }
            }
            FieldKind::Group(g) => {
                if field.spec.count == 1 {
                    Value::Struct(decode_struct(&buf[field.offset..field.offset + g.size], g)?)
                } else {
                    let n = effective_count(field, &out);
                    let stride = field.stride();
                    let mut elems = Vec::with_capacity(n);
                    for i in 0..n {
                        let start = field.offset + i * stride;
                        elems.push(Value::Struct(decode_struct(
                            slice(buf, start, g.size, "array element")?,
                            g,
                        )?));
                    }
                    Value::Array(elems)
                }
            }
        };
        out.fields.push((field.spec.name, value));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{arr, f, garr, group, text, Prim, StructLayout};

    fn sample_layout() -> StructLayout {
        StructLayout::new(
            "t",
            vec![
                f("count", Prim::I32),
                f("big", Prim::I64),
                text("tag", 4),
                arr("pair", Prim::U16, 2),
            ],
        )
    }

    #[test]
    fn test_scalars_and_text() {
        let layout = sample_layout();
        let mut buf = vec![0u8; layout.size];
        buf[0..4].copy_from_slice(&3i32.to_le_bytes());
        buf[8..16].copy_from_slice(&(-7i64).to_le_bytes());
        buf[16..18].copy_from_slice(b"ok");
        buf[20..22].copy_from_slice(&10u16.to_le_bytes());
        buf[22..24].copy_from_slice(&20u16.to_le_bytes());

        let v = decode_struct(&buf, &layout).unwrap();
        assert_eq!(v.int("count"), Some(3));
        assert_eq!(v.int("big"), Some(-7));
        assert_eq!(v.text("tag"), Some("ok"));
        assert_eq!(
            v.get("pair"),
            Some(&Value::Array(vec![Value::Uint(10), Value::Uint(20)]))
        );
    }

    #[test]
    fn test_limiter_truncates_group_array() {
        let elem = StructLayout::new("e", vec![f("x", Prim::I64)]);
        let layout = StructLayout::new(
            "t",
            vec![f("n", Prim::I32), garr("items", elem, 8, "n")],
        );
        let mut buf = vec![0u8; layout.size];
        buf[0..4].copy_from_slice(&2i32.to_le_bytes());
        buf[8..16].copy_from_slice(&11i64.to_le_bytes());
        buf[16..24].copy_from_slice(&22i64.to_le_bytes());

        let v = decode_struct(&buf, &layout).unwrap();
        match v.get("items") {
            Some(Value::Array(items)) => {
                assert_eq!(items.len(), 2);
                match &items[1] {
                    Value::Struct(s) => assert_eq!(s.int("x"), Some(22)),
                    other => panic!("expected struct, got {other:?}"),
                }
            }
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_limiter_decodes_empty() {
        let elem = StructLayout::new("e", vec![f("x", Prim::I64)]);
        let layout = StructLayout::new(
            "t",
            vec![f("n", Prim::I32), garr("items", elem, 8, "n")],
        );
        let mut buf = vec![0u8; layout.size];
        buf[0..4].copy_from_slice(&(-1i32).to_le_bytes());

        let v = decode_struct(&buf, &layout).unwrap();
        assert_eq!(v.get("items"), Some(&Value::Array(Vec::new())));
    }

    #[test]
    fn test_limiter_capped_at_declared_bound() {
        let elem = StructLayout::new("e", vec![f("x", Prim::I64)]);
        let layout = StructLayout::new(
            "t",
            vec![f("n", Prim::I32), garr("items", elem, 2, "n")],
        );
        let mut buf = vec![0u8; layout.size];
        buf[0..4].copy_from_slice(&100i32.to_le_bytes());

        let v = decode_struct(&buf, &layout).unwrap();
        match v.get("items") {
            Some(Value::Array(items)) => assert_eq!(items.len(), 2),
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn test_short_buffer_is_corrupt() {
        let layout = sample_layout();
        let buf = vec![0u8; layout.size - 1];
        match decode_struct(&buf, &layout) {
            Err(DecodeError::CorruptLog(_)) => {}
            other => panic!("expected CorruptLog, got {other:?}"),
        }
    }

    #[test]
    fn test_nested_lookup() {
        let inner = StructLayout::new("inner", vec![f("x", Prim::U32)]);
        let layout = StructLayout::new("t", vec![group("in", inner)]);
        let mut buf = vec![0u8; layout.size];
        buf[0..4].copy_from_slice(&9u32.to_le_bytes());

        let v = decode_struct(&buf, &layout).unwrap();
        assert_eq!(v.lookup("in.x"), Some(&Value::Uint(9)));
    }

    #[test]
    fn test_text_trims_at_nul_and_lossy() {
        let layout = StructLayout::new("t", vec![text("s", 6)]);
        let buf = [b'a', 0xff, b'b', 0, b'z', b'z'];
        let v = decode_struct(&buf, &layout).unwrap();
        // Invalid UTF-8 becomes the replacement character; the trailing
        // bytes after the NUL are dropped.
        assert_eq!(v.text("s"), Some("a\u{fffd}b"));
    }
}
