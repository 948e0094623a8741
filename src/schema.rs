//! Record schemas and the opcode registry
//!
//! A [`RecordSchema`] is built once per record type as a `static` and shared
//! by every instance. The registry maps wire opcodes to schemas; it is built
//! on first use from the explicit catalogue in [`crate::records`].

use crate::constants::RECORD_HEADER_SIZE;
use crate::field::FieldDescriptor;
use crate::records;
use log::warn;
use std::collections::HashMap;
use std::sync::OnceLock;

/// What a record means to the stream engine's bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Plain,
    /// End of the record stream
    Eof,
    /// 22-byte placeable header pseudo-record
    Placeable,
    /// 18-byte standard header pseudo-record
    Header,
    /// Creates a graphics object and occupies a handle slot
    CreatesObject,
    /// Frees the handle stored in its `handle` field
    DeletesObject,
    /// Refers to the live object stored in its `handle` field
    ReferencesObject,
}

/// How a record derives its bounding box from its fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsRule {
    None,
    Points(&'static str),
    Point {
        x: &'static str,
        y: &'static str,
    },
    Rect {
        left: &'static str,
        top: &'static str,
        right: &'static str,
        bottom: &'static str,
    },
}

/// Handling of payload bytes past the declared fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trailer {
    /// Kept verbatim
    Raw,
    /// Bounds / string / glyph offsets gated by the `fwOpts` bit flags
    ExtTextOut,
}

#[derive(Debug)]
pub struct RecordSchema {
    pub name: &'static str,
    /// `None` for the header pseudo-records, which are never looked up
    pub opcode: Option<u16>,
    pub fields: &'static [FieldDescriptor],
    pub kind: RecordKind,
    pub bounds: BoundsRule,
    pub trailer: Trailer,
}

impl RecordSchema {
    pub const fn new(name: &'static str, opcode: u16, fields: &'static [FieldDescriptor]) -> Self {
        Self {
            name,
            opcode: Some(opcode),
            fields,
            kind: RecordKind::Plain,
            bounds: BoundsRule::None,
            trailer: Trailer::Raw,
        }
    }

    pub const fn pseudo(
        name: &'static str,
        kind: RecordKind,
        fields: &'static [FieldDescriptor],
    ) -> Self {
        Self {
            name,
            opcode: None,
            fields,
            kind,
            bounds: BoundsRule::None,
            trailer: Trailer::Raw,
        }
    }

    pub const fn with_kind(self, kind: RecordKind) -> Self {
        Self { kind, ..self }
    }

    pub const fn with_bounds(self, bounds: BoundsRule) -> Self {
        Self { bounds, ..self }
    }

    pub const fn with_trailer(self, trailer: Trailer) -> Self {
        Self { trailer, ..self }
    }

    /// Bytes of generic header preceding the body
    pub fn header_len(&self) -> usize {
        match self.kind {
            RecordKind::Placeable | RecordKind::Header => 0,
            _ => RECORD_HEADER_SIZE,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Header length plus the widths of all fixed-width fields
    pub fn fixed_size(&self) -> Option<usize> {
        let mut size = self.header_len();
        for field in self.fields {
            match field.kind {
                crate::field::FieldKind::Int(kind) => size += kind.width(),
                crate::field::FieldKind::FixedString { len } => size += len,
                _ => return None,
            }
        }
        Some(size)
    }
}

/// Opcode to schema table
pub struct Registry {
    by_opcode: HashMap<u16, &'static RecordSchema>,
}

impl Registry {
    fn build(catalogue: &[&'static RecordSchema]) -> Self {
        let mut registry = Registry {
            by_opcode: HashMap::with_capacity(catalogue.len()),
        };
        for schema in catalogue {
            registry.register(schema);
        }
        registry
    }

    /// Add a schema. Registering an opcode twice is a catalogue bug; which
    /// entry survives is unspecified.
    fn register(&mut self, schema: &'static RecordSchema) {
        let Some(opcode) = schema.opcode else {
            warn!("Schema {} has no opcode; not registered", schema.name);
            return;
        };
        if let Some(previous) = self.by_opcode.insert(opcode, schema) {
            warn!(
                "Opcode {:#06x} registered twice ({} and {})",
                opcode, previous.name, schema.name
            );
        }
    }

    pub fn get(&self, opcode: u16) -> Option<&'static RecordSchema> {
        self.by_opcode.get(&opcode).copied()
    }

    /// Schema for `opcode`, or the verbatim fallback for unknown opcodes
    pub fn lookup(&self, opcode: u16) -> &'static RecordSchema {
        self.get(opcode).unwrap_or(&records::UNKNOWN)
    }

    pub fn len(&self) -> usize {
        self.by_opcode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_opcode.is_empty()
    }
}

/// Process-wide registry, built on first call
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| Registry::build(records::CATALOGUE))
}

pub fn lookup(opcode: u16) -> &'static RecordSchema {
    registry().lookup(opcode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalogue_opcodes_unique() {
        let mut seen = HashSet::new();
        for schema in records::CATALOGUE {
            let opcode = schema.opcode.expect("catalogue entries carry opcodes");
            assert!(seen.insert(opcode), "duplicate opcode {:#06x}", opcode);
        }
        assert!(!registry().is_empty());
        assert_eq!(registry().len(), records::CATALOGUE.len());
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        assert_eq!(lookup(META_POLYLINE).name, "POLYLINE");
        assert_eq!(lookup(META_EOF).kind, RecordKind::Eof);
        assert_eq!(lookup(0x7ABC).name, records::UNKNOWN.name);
        assert!(registry().get(0x7ABC).is_none());
    }

    #[test]
    fn test_header_len() {
        assert_eq!(records::PLACEABLE.header_len(), 0);
        assert_eq!(records::HEADER.header_len(), 0);
        assert_eq!(lookup(META_SETBKCOLOR).header_len(), RECORD_HEADER_SIZE);
    }

    #[test]
    fn test_fixed_size() {
        assert_eq!(lookup(META_SETBKCOLOR).fixed_size(), Some(10));
        assert_eq!(records::PLACEABLE.fixed_size(), None);
        assert_eq!(records::HEADER.fixed_size(), Some(STANDARD_HEADER_SIZE));
        assert_eq!(lookup(META_POLYLINE).fixed_size(), None);
    }
}
