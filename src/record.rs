//! Record: one decoded or built metafile command
//!
//! A record pairs a static schema with the runtime field values, trailing
//! bytes the schema does not describe, and bookkeeping the stream engine
//! needs (size, stamped handle, validation flag).

use crate::constants::*;
use crate::error::{WmfError, WmfResult};
use crate::field::{padded, FieldMap, FieldScope, Value};
use crate::records::{self, EXTTEXTOUT_DX, EXTTEXTOUT_RECT, EXTTEXTOUT_STRING};
use crate::schema::{self, BoundsRule, RecordKind, RecordSchema, Trailer};
use crate::types::{Bounds, Point};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::{Cursor, Write};

/// Sizes are kept in whole 16-bit words
const WORD: usize = 2;

/// What a record does to the object handle table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleRole {
    None,
    /// Occupies the first free slot
    Creates,
    /// Frees the given slot
    Deletes(u16),
    /// Uses the object in the given slot
    References(u16),
}

#[derive(Debug, Clone)]
pub struct Record {
    schema: &'static RecordSchema,
    opcode: u16,
    /// Total serialized size in bytes, header included
    size: usize,
    values: FieldMap,
    /// Payload bytes past the declared fields
    extra: Vec<u8>,
    /// Slot assigned to an object-creating record
    handle: Option<u16>,
    error: bool,
}

impl Record {
    /// Fresh record with every non-optional field at its default
    pub fn new(schema: &'static RecordSchema) -> Self {
        let values = schema
            .fields
            .iter()
            .filter(|f| !f.optional)
            .map(|f| (f.name, f.default_value()))
            .collect();
        let mut record = Self {
            schema,
            opcode: schema.opcode.unwrap_or(0),
            size: 0,
            values,
            extra: Vec::new(),
            handle: None,
            error: false,
        };
        record.size = record.compute_size().unwrap_or(0);
        record
    }

    /// Empty record for a wire opcode, falling back to [`records::UNKNOWN`]
    pub fn for_opcode(opcode: u16) -> Self {
        let schema = schema::lookup(opcode);
        Self {
            schema,
            opcode,
            size: 0,
            values: FieldMap::new(),
            extra: Vec::new(),
            handle: None,
            error: false,
        }
    }

    /// Unregistered record carrying `payload` verbatim
    pub fn unknown(opcode: u16, payload: Vec<u8>) -> Self {
        let mut record = Self {
            schema: &records::UNKNOWN,
            opcode,
            size: 0,
            values: FieldMap::new(),
            extra: payload,
            handle: None,
            error: false,
        };
        record.size = record.compute_size().unwrap_or(0);
        record
    }

    pub fn name(&self) -> &'static str {
        self.schema.name
    }

    pub fn schema(&self) -> &'static RecordSchema {
        self.schema
    }

    pub fn opcode(&self) -> u16 {
        self.opcode
    }

    /// Size in bytes as of the last decode or [`Record::resize`]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn size_words(&self) -> usize {
        self.size.div_ceil(WORD)
    }

    pub fn header_len(&self) -> usize {
        self.schema.header_len()
    }

    pub fn values(&self) -> &FieldMap {
        &self.values
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn points(&self, name: &str) -> Option<&[Point]> {
        self.get(name).and_then(Value::as_points)
    }

    pub fn list(&self, name: &str) -> Option<&[i64]> {
        self.get(name).and_then(Value::as_list)
    }

    pub fn bytes(&self, name: &str) -> Option<&[u8]> {
        self.get(name).and_then(Value::as_bytes)
    }

    pub fn set(&mut self, name: &'static str, value: Value) {
        self.values.insert(name, value);
    }

    pub fn set_int(&mut self, name: &'static str, value: i64) {
        self.set(name, Value::Int(value));
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn extra(&self) -> &[u8] {
        &self.extra
    }

    pub fn set_extra(&mut self, extra: Vec<u8>) {
        self.extra = extra;
    }

    pub fn handle(&self) -> Option<u16> {
        self.handle
    }

    pub fn set_handle(&mut self, handle: u16) {
        self.handle = Some(handle);
    }

    /// Set when a constructor argument was outside its valid range
    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn flag_error(&mut self) {
        self.error = true;
    }

    pub fn kind(&self) -> RecordKind {
        self.schema.kind
    }

    pub fn is_eof(&self) -> bool {
        self.schema.kind == RecordKind::Eof
    }

    pub fn is_placeable(&self) -> bool {
        self.schema.kind == RecordKind::Placeable
    }

    pub fn is_header(&self) -> bool {
        self.schema.kind == RecordKind::Header
    }

    pub fn handle_role(&self) -> HandleRole {
        let target = || self.int("handle").and_then(|h| u16::try_from(h).ok());
        match self.schema.kind {
            RecordKind::CreatesObject => HandleRole::Creates,
            RecordKind::DeletesObject => target().map_or(HandleRole::None, HandleRole::Deletes),
            RecordKind::ReferencesObject => {
                target().map_or(HandleRole::None, HandleRole::References)
            }
            _ => HandleRole::None,
        }
    }

    fn scope(&self) -> FieldScope<'_> {
        FieldScope::new(self.schema.name, &self.values)
    }

    /// Parse the generic 6-byte prefix: returns (opcode, size in bytes)
    pub fn read_header(data: &[u8]) -> WmfResult<(u16, usize)> {
        if data.len() < RECORD_HEADER_SIZE {
            return Err(WmfError::Truncated {
                what: "record header",
                needed: RECORD_HEADER_SIZE,
                available: data.len(),
            });
        }
        let mut cursor = Cursor::new(data);
        let words = cursor.read_u32::<LittleEndian>()?;
        let opcode = cursor.read_u16::<LittleEndian>()?;
        Ok((opcode, words as usize * WORD))
    }

    /// Header pseudo-records have no generic prefix and write nothing
    pub fn write_header<W: Write>(&self, out: &mut W) -> WmfResult<()> {
        if self.header_len() == 0 {
            return Ok(());
        }
        let words = u32::try_from(self.size_words()).map_err(|_| WmfError::InvalidRecordSize {
            opcode: self.opcode,
            size: self.size as u64,
        })?;
        out.write_u32::<LittleEndian>(words)?;
        out.write_u16::<LittleEndian>(self.opcode)?;
        Ok(())
    }

    /// Decode a whole record (header + body) from its exact bytes
    pub fn decode(&mut self, data: &[u8]) -> WmfResult<()> {
        let header_len = self.header_len();
        if header_len > 0 {
            let (opcode, _) = Record::read_header(data)?;
            self.opcode = opcode;
        }
        self.size = data.len();
        self.decode_body(&data[header_len..])
    }

    /// Unpack the declared fields in order, then the trailer
    pub fn decode_body(&mut self, body: &[u8]) -> WmfResult<()> {
        let mut offset = 0;
        for field in self.schema.fields {
            if field.optional && offset >= body.len() {
                self.values.remove(field.name);
                continue;
            }
            let (value, used) = field.unpack(self.scope(), body, offset)?;
            self.values.insert(field.name, value);
            offset += used;
        }
        let rest = &body[offset..];
        match self.schema.trailer {
            Trailer::Raw => self.extra = rest.to_vec(),
            Trailer::ExtTextOut => self.decode_text_trailer(rest)?,
        }
        Ok(())
    }

    fn text_options(&self) -> u16 {
        self.int("options").unwrap_or(0) as u16
    }

    fn has_text_rect(&self) -> bool {
        self.text_options() & (ETO_OPAQUE | ETO_CLIPPED) != 0
    }

    fn has_text_dx(&self) -> bool {
        self.text_options() & (ETO_GLYPH_INDEX | ETO_PDY) != 0
    }

    fn char_count(&self) -> i64 {
        self.int("char_count").unwrap_or(0)
    }

    fn decode_text_trailer(&mut self, data: &[u8]) -> WmfResult<()> {
        let mut offset = 0;
        if self.has_text_rect() {
            let (value, used) = EXTTEXTOUT_RECT.unpack(self.scope(), data, offset)?;
            self.values.insert(EXTTEXTOUT_RECT.name, value);
            offset += used;
        }
        if self.char_count() > 0 {
            let (value, used) = EXTTEXTOUT_STRING.unpack(self.scope(), data, offset)?;
            self.values.insert(EXTTEXTOUT_STRING.name, value);
            offset += used;
        }
        if self.has_text_dx() {
            // The stored char count is not reliable here; the offsets fill
            // whatever remains of the record.
            let count = (data.len() - offset) / EXTTEXTOUT_DX.width_for(1);
            let (value, used) = EXTTEXTOUT_DX.unpack_counted(count, data, offset)?;
            self.values.insert(EXTTEXTOUT_DX.name, value);
            offset += used;
        }
        self.extra = data[offset..].to_vec();
        Ok(())
    }

    /// Inverse of [`Record::decode_body`]
    pub fn encode_body(&self) -> WmfResult<Vec<u8>> {
        let mut out = Vec::new();
        for field in self.schema.fields {
            let value = match self.values.get(field.name) {
                Some(value) => value,
                None if field.optional => continue,
                None => {
                    return Err(WmfError::MissingField {
                        record: self.schema.name,
                        field: field.name,
                    })
                }
            };
            field.pack(self.scope(), value, &mut out)?;
        }
        if self.schema.trailer == Trailer::ExtTextOut {
            self.encode_text_trailer(&mut out)?;
        }
        out.extend_from_slice(&self.extra);
        Ok(out)
    }

    fn encode_text_trailer(&self, out: &mut Vec<u8>) -> WmfResult<()> {
        if self.has_text_rect() {
            let unset = Value::Points(vec![Point::new(0, 0), Point::new(-1, -1)]);
            let rect = self.values.get(EXTTEXTOUT_RECT.name).unwrap_or(&unset);
            EXTTEXTOUT_RECT.pack(self.scope(), rect, out)?;
        }
        if self.char_count() > 0 {
            let string = self.values.get(EXTTEXTOUT_STRING.name).ok_or(WmfError::MissingField {
                record: self.schema.name,
                field: EXTTEXTOUT_STRING.name,
            })?;
            EXTTEXTOUT_STRING.pack(self.scope(), string, out)?;
        }
        if self.has_text_dx() {
            let empty = Value::List(Vec::new());
            let dx = self.values.get(EXTTEXTOUT_DX.name).unwrap_or(&empty);
            let count = dx.as_list().map_or(0, |l| l.len());
            EXTTEXTOUT_DX.pack_counted(self.schema.name, count, dx, out)?;
        }
        Ok(())
    }

    fn text_trailer_len(&self) -> WmfResult<usize> {
        let mut len = 0;
        if self.has_text_rect() {
            len += EXTTEXTOUT_RECT.width_for(2);
        }
        if self.char_count() > 0 {
            len += EXTTEXTOUT_STRING.encoded_len(self.scope())?;
        }
        if self.has_text_dx() {
            let count = self.list(EXTTEXTOUT_DX.name).map_or(0, |l| l.len());
            len += EXTTEXTOUT_DX.width_for(count);
        }
        Ok(len)
    }

    /// Header length + field widths + trailer, rounded up to whole words
    pub fn compute_size(&self) -> WmfResult<usize> {
        let mut size = self.header_len();
        for field in self.schema.fields {
            if field.optional && !self.values.contains_key(field.name) {
                continue;
            }
            size += field.encoded_len(self.scope())?;
        }
        if self.schema.trailer == Trailer::ExtTextOut {
            size += self.text_trailer_len()?;
        }
        size += self.extra.len();
        Ok(padded(size, WORD))
    }

    /// Recompute and store the size; returns it in bytes
    pub fn resize(&mut self) -> WmfResult<usize> {
        let before = self.size;
        self.size = self.compute_size()?;
        if before != self.size {
            log::trace!("{}: size {} -> {}", self.schema.name, before, self.size);
        }
        Ok(self.size)
    }

    /// Write header and body; the stored size must be current
    pub fn serialize<W: Write>(&self, out: &mut W) -> WmfResult<()> {
        let body = self.encode_body()?;
        let written = self.header_len() + body.len();
        if padded(written, WORD) != self.size {
            return Err(WmfError::InvalidRecordSize {
                opcode: self.opcode,
                size: self.size as u64,
            });
        }
        self.write_header(out)?;
        out.write_all(&body)?;
        if written < self.size {
            out.write_all(&[0])?;
        }
        Ok(())
    }

    /// Geometry drawn by this record, `None` for state records
    pub fn bounding_box(&self) -> Option<Bounds> {
        match self.schema.bounds {
            BoundsRule::None => None,
            BoundsRule::Points(name) => Bounds::from_points(self.points(name)?),
            BoundsRule::Point { x, y } => {
                let (x, y) = (self.int(x)? as i32, self.int(y)? as i32);
                Some(Bounds::new(x, y, x, y))
            }
            BoundsRule::Rect {
                left,
                top,
                right,
                bottom,
            } => Some(Bounds::new(
                self.int(left)? as i32,
                self.int(top)? as i32,
                self.int(right)? as i32,
                self.int(bottom)? as i32,
            )),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#06x}) size={}", self.schema.name, self.opcode, self.size)?;
        if let Some(handle) = self.handle {
            write!(f, " handle={}", handle)?;
        }
        Ok(())
    }
}
