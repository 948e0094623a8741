//! Field codec
//!
//! A record's body is described by an ordered table of [`FieldDescriptor`]s.
//! Each descriptor packs and unpacks one named value against a byte buffer.
//! Variable-length fields take their element count either as a literal or
//! from another field of the same record, looked up by name at pack/unpack
//! time, so the count field must precede the variable field in the table.

use crate::error::{WmfError, WmfResult};
use crate::types::Point;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::collections::BTreeMap;
use std::io::Cursor;

/// Decoded field values of one record, keyed by field name
pub type FieldMap = BTreeMap<&'static str, Value>;

/// Little-endian integer primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntKind {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
}

impl IntKind {
    pub const fn width(self) -> usize {
        match self {
            IntKind::U8 | IntKind::I8 => 1,
            IntKind::U16 | IntKind::I16 => 2,
            IntKind::U32 | IntKind::I32 => 4,
        }
    }

    fn range(self) -> (i64, i64) {
        match self {
            IntKind::U8 => (0, u8::MAX as i64),
            IntKind::I8 => (i8::MIN as i64, i8::MAX as i64),
            IntKind::U16 => (0, u16::MAX as i64),
            IntKind::I16 => (i16::MIN as i64, i16::MAX as i64),
            IntKind::U32 => (0, u32::MAX as i64),
            IntKind::I32 => (i32::MIN as i64, i32::MAX as i64),
        }
    }

    fn write(self, field: &'static str, value: i64, out: &mut Vec<u8>) -> WmfResult<()> {
        let (min, max) = self.range();
        if value < min || value > max {
            return Err(WmfError::ValueOutOfRange { field, value });
        }
        match self {
            IntKind::U8 => out.write_u8(value as u8)?,
            IntKind::I8 => out.write_i8(value as i8)?,
            IntKind::U16 => out.write_u16::<LittleEndian>(value as u16)?,
            IntKind::I16 => out.write_i16::<LittleEndian>(value as i16)?,
            IntKind::U32 => out.write_u32::<LittleEndian>(value as u32)?,
            IntKind::I32 => out.write_i32::<LittleEndian>(value as i32)?,
        }
        Ok(())
    }

    fn read(self, cursor: &mut Cursor<&[u8]>) -> std::io::Result<i64> {
        Ok(match self {
            IntKind::U8 => cursor.read_u8()? as i64,
            IntKind::I8 => cursor.read_i8()? as i64,
            IntKind::U16 => cursor.read_u16::<LittleEndian>()? as i64,
            IntKind::I16 => cursor.read_i16::<LittleEndian>()? as i64,
            IntKind::U32 => cursor.read_u32::<LittleEndian>()? as i64,
            IntKind::I32 => cursor.read_i32::<LittleEndian>()? as i64,
        })
    }
}

/// Element count of a variable-length field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Count {
    Fixed(usize),
    /// Runtime value of the named integer field
    Field(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int(IntKind),
    /// `count` (x, y) pairs
    Points { count: Count, elem: IntKind },
    /// `count` integers
    List { count: Count, elem: IntKind },
    /// Exactly `len` bytes, null padded
    FixedString { len: usize },
    /// `count * char_size` bytes, then zero padding up to a multiple of `pad`
    CountedString {
        count: Count,
        char_size: usize,
        pad: usize,
    },
}

/// Runtime value of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Points(Vec<Point>),
    List(Vec<i64>),
    Bytes(Vec<u8>),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_points(&self) -> Option<&[Point]> {
        match self {
            Value::Points(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[i64]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

/// Lookup context for count references: the owning record and its values
#[derive(Clone, Copy)]
pub struct FieldScope<'a> {
    pub record: &'static str,
    pub values: &'a FieldMap,
}

impl<'a> FieldScope<'a> {
    pub fn new(record: &'static str, values: &'a FieldMap) -> Self {
        Self { record, values }
    }

    fn int(&self, field: &'static str) -> WmfResult<i64> {
        match self.values.get(field) {
            Some(Value::Int(v)) => Ok(*v),
            Some(_) => Err(WmfError::FieldType {
                record: self.record,
                field,
            }),
            None => Err(WmfError::MissingField {
                record: self.record,
                field,
            }),
        }
    }
}

/// One named field of a record layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Initial value for integer fields of freshly built records
    pub default: i64,
    /// Decoded only when payload bytes remain; encoded only when set
    pub optional: bool,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            default: 0,
            optional: false,
        }
    }

    pub const fn u8(name: &'static str) -> Self {
        Self::new(name, FieldKind::Int(IntKind::U8))
    }

    pub const fn u16(name: &'static str) -> Self {
        Self::new(name, FieldKind::Int(IntKind::U16))
    }

    pub const fn i16(name: &'static str) -> Self {
        Self::new(name, FieldKind::Int(IntKind::I16))
    }

    pub const fn u32(name: &'static str) -> Self {
        Self::new(name, FieldKind::Int(IntKind::U32))
    }

    pub const fn points(name: &'static str, count: Count, elem: IntKind) -> Self {
        Self::new(name, FieldKind::Points { count, elem })
    }

    pub const fn list(name: &'static str, count: Count, elem: IntKind) -> Self {
        Self::new(name, FieldKind::List { count, elem })
    }

    pub const fn fixed_string(name: &'static str, len: usize) -> Self {
        Self::new(name, FieldKind::FixedString { len })
    }

    pub const fn counted_string(
        name: &'static str,
        count: Count,
        char_size: usize,
        pad: usize,
    ) -> Self {
        Self::new(
            name,
            FieldKind::CountedString {
                count,
                char_size,
                pad,
            },
        )
    }

    pub const fn with_default(self, default: i64) -> Self {
        Self {
            name: self.name,
            kind: self.kind,
            default,
            optional: self.optional,
        }
    }

    pub const fn optional(self) -> Self {
        Self {
            name: self.name,
            kind: self.kind,
            default: self.default,
            optional: true,
        }
    }

    /// Value a freshly built record starts with
    pub fn default_value(&self) -> Value {
        match self.kind {
            FieldKind::Int(_) => Value::Int(self.default),
            FieldKind::Points { count, .. } => {
                let n = match count {
                    Count::Fixed(n) => n,
                    Count::Field(_) => 0,
                };
                Value::Points(vec![Point::default(); n])
            }
            FieldKind::List { .. } => Value::List(Vec::new()),
            FieldKind::FixedString { len } => Value::Bytes(vec![0; len]),
            FieldKind::CountedString { .. } => Value::Bytes(Vec::new()),
        }
    }

    fn count_spec(&self) -> Option<Count> {
        match self.kind {
            FieldKind::Points { count, .. }
            | FieldKind::List { count, .. }
            | FieldKind::CountedString { count, .. } => Some(count),
            _ => None,
        }
    }

    /// Element count, following a count reference if the field has one
    pub fn resolve_count(&self, scope: FieldScope<'_>) -> WmfResult<usize> {
        match self.count_spec() {
            None => Ok(1),
            Some(Count::Fixed(n)) => Ok(n),
            Some(Count::Field(name)) => {
                let raw = scope.int(name)?;
                usize::try_from(raw).map_err(|_| WmfError::ValueOutOfRange {
                    field: name,
                    value: raw,
                })
            }
        }
    }

    /// Serialized width for `count` elements
    pub fn width_for(&self, count: usize) -> usize {
        match self.kind {
            FieldKind::Int(kind) => kind.width(),
            FieldKind::Points { elem, .. } => count * 2 * elem.width(),
            FieldKind::List { elem, .. } => count * elem.width(),
            FieldKind::FixedString { len } => len,
            FieldKind::CountedString { char_size, pad, .. } => {
                padded(count * char_size, pad)
            }
        }
    }

    /// Serialized width of this field given the record's current values
    pub fn encoded_len(&self, scope: FieldScope<'_>) -> WmfResult<usize> {
        Ok(self.width_for(self.resolve_count(scope)?))
    }

    pub fn pack(&self, scope: FieldScope<'_>, value: &Value, out: &mut Vec<u8>) -> WmfResult<()> {
        let count = self.resolve_count(scope)?;
        self.pack_counted(scope.record, count, value, out)
    }

    /// Pack with an explicit element count instead of the declared one
    pub fn pack_counted(
        &self,
        record: &'static str,
        count: usize,
        value: &Value,
        out: &mut Vec<u8>,
    ) -> WmfResult<()> {
        let wrong_type = || WmfError::FieldType {
            record,
            field: self.name,
        };
        match (self.kind, value) {
            (FieldKind::Int(kind), Value::Int(v)) => kind.write(self.name, *v, out),
            (FieldKind::Points { elem, .. }, Value::Points(points)) => {
                self.check_count(count, points.len())?;
                for p in points {
                    elem.write(self.name, p.x as i64, out)?;
                    elem.write(self.name, p.y as i64, out)?;
                }
                Ok(())
            }
            (FieldKind::List { elem, .. }, Value::List(items)) => {
                self.check_count(count, items.len())?;
                for v in items {
                    elem.write(self.name, *v, out)?;
                }
                Ok(())
            }
            (FieldKind::FixedString { len }, Value::Bytes(bytes)) => {
                if bytes.len() > len {
                    return Err(WmfError::CountMismatch {
                        field: self.name,
                        expected: len,
                        actual: bytes.len(),
                    });
                }
                out.extend_from_slice(bytes);
                out.resize(out.len() + len - bytes.len(), 0);
                Ok(())
            }
            (FieldKind::CountedString { char_size, .. }, Value::Bytes(bytes)) => {
                self.check_count(count * char_size, bytes.len())?;
                out.extend_from_slice(bytes);
                let width = self.width_for(count);
                out.resize(out.len() + width - bytes.len(), 0);
                Ok(())
            }
            _ => Err(wrong_type()),
        }
    }

    /// Returns the value and the number of bytes consumed from `offset`
    pub fn unpack(
        &self,
        scope: FieldScope<'_>,
        data: &[u8],
        offset: usize,
    ) -> WmfResult<(Value, usize)> {
        let count = self.resolve_count(scope)?;
        self.unpack_counted(count, data, offset)
    }

    /// Unpack with an explicit element count instead of the declared one
    pub fn unpack_counted(
        &self,
        count: usize,
        data: &[u8],
        offset: usize,
    ) -> WmfResult<(Value, usize)> {
        let width = self.width_for(count);
        let available = data.len().saturating_sub(offset);
        if width > available {
            return Err(WmfError::Truncated {
                what: self.name,
                needed: width,
                available,
            });
        }
        let slice = &data[offset..offset + width];
        let mut cursor = Cursor::new(slice);
        let value = match self.kind {
            FieldKind::Int(kind) => Value::Int(kind.read(&mut cursor)?),
            FieldKind::Points { elem, .. } => {
                let mut points = Vec::with_capacity(count);
                for _ in 0..count {
                    let x = elem.read(&mut cursor)? as i32;
                    let y = elem.read(&mut cursor)? as i32;
                    points.push(Point::new(x, y));
                }
                Value::Points(points)
            }
            FieldKind::List { elem, .. } => {
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(elem.read(&mut cursor)?);
                }
                Value::List(items)
            }
            FieldKind::FixedString { .. } => Value::Bytes(slice.to_vec()),
            FieldKind::CountedString { char_size, .. } => {
                Value::Bytes(slice[..count * char_size].to_vec())
            }
        };
        Ok((value, width))
    }

    fn check_count(&self, expected: usize, actual: usize) -> WmfResult<()> {
        if expected != actual {
            return Err(WmfError::CountMismatch {
                field: self.name,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

/// Round `len` up to a multiple of `pad`
pub fn padded(len: usize, pad: usize) -> usize {
    if pad <= 1 {
        len
    } else {
        len.div_ceil(pad) * pad
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(values: &FieldMap) -> FieldScope<'_> {
        FieldScope::new("TEST", values)
    }

    #[test]
    fn test_int_little_endian() {
        let values = FieldMap::new();
        let field = FieldDescriptor::u32("crColor");
        let mut out = Vec::new();
        field
            .pack(scope(&values), &Value::Int(0x0003_0201), &mut out)
            .unwrap();
        assert_eq!(out, vec![0x01, 0x02, 0x03, 0x00]);

        let (value, used) = field.unpack(scope(&values), &out, 0).unwrap();
        assert_eq!(value, Value::Int(0x0003_0201));
        assert_eq!(used, 4);
    }

    #[test]
    fn test_signed_decode() {
        let values = FieldMap::new();
        let field = FieldDescriptor::i16("y");
        let (value, _) = field.unpack(scope(&values), &[0xFF, 0xFF], 0).unwrap();
        assert_eq!(value, Value::Int(-1));
    }

    #[test]
    fn test_int_out_of_range() {
        let values = FieldMap::new();
        let field = FieldDescriptor::i16("x");
        let err = field
            .pack(scope(&values), &Value::Int(40_000), &mut Vec::new())
            .unwrap_err();
        assert!(matches!(err, WmfError::ValueOutOfRange { field: "x", value: 40_000 }));
    }

    #[test]
    fn test_points_count_from_field() {
        let mut values = FieldMap::new();
        values.insert("n", Value::Int(2));
        let field = FieldDescriptor::points("pts", Count::Field("n"), IntKind::I16);
        let data = [1, 0, 2, 0, 0xFD, 0xFF, 4, 0, 9, 9];
        let (value, used) = field.unpack(scope(&values), &data, 0).unwrap();
        assert_eq!(used, 8);
        assert_eq!(
            value,
            Value::Points(vec![Point::new(1, 2), Point::new(-3, 4)])
        );
    }

    #[test]
    fn test_points_missing_count_field() {
        let values = FieldMap::new();
        let field = FieldDescriptor::points("pts", Count::Field("n"), IntKind::I16);
        let err = field.unpack(scope(&values), &[0; 4], 0).unwrap_err();
        assert!(matches!(err, WmfError::MissingField { field: "n", .. }));
    }

    #[test]
    fn test_points_count_mismatch_on_pack() {
        let mut values = FieldMap::new();
        values.insert("n", Value::Int(3));
        let field = FieldDescriptor::points("pts", Count::Field("n"), IntKind::I16);
        let err = field
            .pack(
                scope(&values),
                &Value::Points(vec![Point::new(0, 0)]),
                &mut Vec::new(),
            )
            .unwrap_err();
        assert!(matches!(err, WmfError::CountMismatch { expected: 3, actual: 1, .. }));
    }

    #[test]
    fn test_fixed_string_null_padded() {
        let values = FieldMap::new();
        let field = FieldDescriptor::fixed_string("face", 32);
        let mut out = Vec::new();
        field
            .pack(scope(&values), &Value::Bytes(b"Arial".to_vec()), &mut out)
            .unwrap();
        assert_eq!(out.len(), 32);
        assert_eq!(&out[..5], b"Arial");
        assert!(out[5..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_counted_string_padding() {
        let mut values = FieldMap::new();
        values.insert("len", Value::Int(3));
        let field = FieldDescriptor::counted_string("text", Count::Field("len"), 1, 2);
        let mut out = Vec::new();
        field
            .pack(scope(&values), &Value::Bytes(b"abc".to_vec()), &mut out)
            .unwrap();
        assert_eq!(out, b"abc\0".to_vec());

        let (value, used) = field.unpack(scope(&values), &out, 0).unwrap();
        assert_eq!(value, Value::Bytes(b"abc".to_vec()));
        assert_eq!(used, 4);
    }

    #[test]
    fn test_unpack_truncated() {
        let values = FieldMap::new();
        let field = FieldDescriptor::u32("dwRop");
        let err = field.unpack(scope(&values), &[1, 2], 0).unwrap_err();
        assert!(matches!(err, WmfError::Truncated { needed: 4, available: 2, .. }));
    }

    #[test]
    fn test_list_with_explicit_count() {
        let field = FieldDescriptor::list("dx", Count::Field("nChars"), IntKind::I16);
        let (value, used) = field.unpack_counted(3, &[1, 0, 2, 0, 3, 0], 0).unwrap();
        assert_eq!(value, Value::List(vec![1, 2, 3]));
        assert_eq!(used, 6);
    }
}
