//! Stream engine: byte stream <-> record list
//!
//! Decoding reads the two fixed headers, then loops over generic records
//! until the data runs out or an EOF record is seen. Encoding finalizes the
//! headers (bounds, handle count, file size, largest record) before anything
//! is written.

use crate::constants::*;
use crate::dc::DeviceContext;
use crate::error::{WmfError, WmfResult};
use crate::handles::HandleTable;
use crate::record::{HandleRole, Record};
use crate::records::{eof, HEADER, PLACEABLE};
use log::{debug, trace, warn};
use std::io::{Read, Write};

/// Records and handle table recovered from a byte stream
#[derive(Debug)]
pub struct Decoded {
    pub records: Vec<Record>,
    pub handles: HandleTable,
}

/// True if `data` starts with the placeable header key
pub fn is_wmf_format(data: &[u8]) -> bool {
    data.len() >= 4 && u32::from_le_bytes([data[0], data[1], data[2], data[3]]) == PLACEABLE_KEY
}

fn fixed_block<'a>(
    data: &'a [u8],
    start: usize,
    len: usize,
    what: &'static str,
) -> WmfResult<&'a [u8]> {
    data.get(start..start + len).ok_or(WmfError::Truncated {
        what,
        needed: len,
        available: data.len().saturating_sub(start),
    })
}

pub fn decode<R: Read>(mut reader: R) -> WmfResult<Decoded> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    decode_bytes(&data)
}

pub fn decode_bytes(data: &[u8]) -> WmfResult<Decoded> {
    let mut records = Vec::new();

    let block = fixed_block(data, 0, PLACEABLE_HEADER_SIZE, "placeable header")?;
    if !is_wmf_format(block) {
        let key = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        return Err(WmfError::InvalidMagic(key));
    }
    let mut placeable = Record::new(&PLACEABLE);
    placeable.decode(block)?;
    records.push(placeable);

    let block = fixed_block(data, PLACEABLE_HEADER_SIZE, STANDARD_HEADER_SIZE, "standard header")?;
    let mut header = Record::new(&HEADER);
    header.decode(block)?;
    let object_count = header.int("object_count").unwrap_or(0) as usize;
    records.push(header);

    let mut handles = HandleTable::with_capacity(object_count);
    debug!("Handle table sized to {} objects", object_count);

    let mut pos = PLACEABLE_HEADER_SIZE + STANDARD_HEADER_SIZE;
    while pos < data.len() {
        let remaining = &data[pos..];
        if remaining.len() < RECORD_HEADER_SIZE {
            warn!("Discarded {} trailing bytes", remaining.len());
            break;
        }
        let (opcode, size) = Record::read_header(remaining)?;
        if size < RECORD_HEADER_SIZE {
            return Err(WmfError::InvalidRecordSize {
                opcode,
                size: size as u64,
            });
        }
        let bytes = remaining.get(..size).ok_or(WmfError::Truncated {
            what: "record body",
            needed: size,
            available: remaining.len(),
        })?;

        let mut record = Record::for_opcode(opcode);
        record.decode(bytes)?;
        let index = records.len();
        match record.handle_role() {
            HandleRole::Creates => {
                let handle = handles.allocate(index)?;
                record.set_handle(handle);
            }
            HandleRole::Deletes(handle) => {
                handles.free(handle)?;
            }
            HandleRole::References(handle) => handles.register(handle, index),
            HandleRole::None => {}
        }
        trace!("Decoded {}", record);

        pos += size;
        let at_end = record.is_eof();
        records.push(record);
        if at_end {
            if pos < data.len() {
                warn!("Ignored {} bytes after EOF record", data.len() - pos);
            }
            break;
        }
    }

    debug!("Loaded {} records", records.len());
    Ok(Decoded { records, handles })
}

/// Finalize headers and sizes ahead of [`write`]; returns the file size in words
pub fn prepare(
    records: &mut Vec<Record>,
    dc: &DeviceContext,
    handles: &HandleTable,
) -> WmfResult<usize> {
    if !records.last().is_some_and(Record::is_eof) {
        debug!("Adding EOF record");
        records.push(eof());
    }

    if let Some(placeable) = records.iter_mut().find(|r| r.is_placeable()) {
        dc.stamp_placeable(placeable)?;
    }
    let header_index = records.iter().position(Record::is_header);
    if let Some(header) = header_index.map(|i| &mut records[i]) {
        header.set_int("object_count", handles.capacity() as i64);
    }
    debug!(
        "{} records, {} object slots",
        records.len(),
        handles.capacity()
    );

    let mut total = 0;
    let mut largest = 0;
    for record in records.iter_mut() {
        let size = record.resize()?;
        total += size;
        largest = largest.max(size);
    }

    let words = total.div_ceil(2);
    if let Some(header) = header_index.map(|i| &mut records[i]) {
        header.set_int("size_low", (words & 0xFFFF) as i64);
        header.set_int("size_high", (words >> 16) as i64);
        header.set_int("max_record", largest.div_ceil(2) as i64);
    }
    debug!("Metafile size {} words, largest record {} bytes", words, largest);
    Ok(words)
}

/// Serialize every record in list order; sizes must be current
pub fn write<W: Write>(records: &[Record], out: &mut W) -> WmfResult<()> {
    for record in records {
        trace!("Encoding {}", record);
        record.serialize(out)?;
    }
    Ok(())
}

/// [`prepare`] then [`write`]; returns the file size in words
pub fn encode<W: Write>(
    records: &mut Vec<Record>,
    dc: &DeviceContext,
    handles: &HandleTable,
    out: &mut W,
) -> WmfResult<usize> {
    let words = prepare(records, dc, handles)?;
    write(records, out)?;
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::MetafileOptions;
    use crate::records::*;
    use crate::types::Point;

    fn document(body: Vec<Record>, object_count: usize) -> Vec<u8> {
        let mut records = vec![Record::new(&PLACEABLE), Record::new(&HEADER)];
        records.extend(body);
        let dc = DeviceContext::new(&MetafileOptions::default());
        let handles = HandleTable::with_capacity(object_count);
        let mut out = Vec::new();
        encode(&mut records, &dc, &handles, &mut out).unwrap();
        out
    }

    #[test]
    fn test_is_wmf_format() {
        assert!(is_wmf_format(&[0xD7, 0xCD, 0xC6, 0x9A, 0, 0]));
        assert!(!is_wmf_format(&[0x01, 0x00, 0x09, 0x00]));
        assert!(!is_wmf_format(&[0xD7]));
    }

    #[test]
    fn test_header_sizes() {
        let bytes = document(vec![polyline(&[Point::new(0, 0), Point::new(5, 5)])], 0);
        // 22 + 18 + polyline (6 + 2 + 8) + EOF (6)
        assert_eq!(bytes.len(), 62);

        let decoded = decode_bytes(&bytes).unwrap();
        let header = &decoded.records[1];
        assert_eq!(header.int("size_low"), Some(31));
        assert_eq!(header.int("size_high"), Some(0));
        assert_eq!(header.int("max_record"), Some(11));
        assert_eq!(header.int("header_size"), Some(9));
        assert!(decoded.records.last().unwrap().is_eof());
    }

    #[test]
    fn test_handles_on_decode() {
        let bytes = document(
            vec![
                create_pen(PS_SOLID, 1, 0),
                create_brush(BS_SOLID, 0, 0),
                select_object(1),
                delete_object(0),
                create_pen(PS_DASH, 2, 0),
            ],
            2,
        );
        let decoded = decode_bytes(&bytes).unwrap();
        let handles: Vec<_> = decoded.records.iter().map(Record::handle).collect();
        assert_eq!(
            handles,
            vec![None, None, Some(0), Some(1), None, None, Some(0), None]
        );
        assert_eq!(decoded.handles.capacity(), 2);
        assert_eq!(decoded.handles.get(0), Some(6));
        assert_eq!(decoded.handles.get(1), Some(3));
    }

    #[test]
    fn test_handle_exhaustion_on_decode() {
        let bytes = document(
            vec![create_pen(PS_SOLID, 1, 0), create_pen(PS_SOLID, 1, 0)],
            1,
        );
        let err = decode_bytes(&bytes).unwrap_err();
        assert!(matches!(err, WmfError::HandleExhausted { capacity: 1 }));
    }

    #[test]
    fn test_short_trailing_header_is_clean_stop() {
        let mut bytes = document(vec![set_bk_color(0x00FF_0000)], 0);
        // Drop the EOF record and leave a partial header behind
        bytes.truncate(bytes.len() - RECORD_HEADER_SIZE);
        bytes.extend_from_slice(&[3, 0, 0]);
        let decoded = decode_bytes(&bytes).unwrap();
        assert_eq!(decoded.records.len(), 3);
        assert_eq!(decoded.records[2].int("color"), Some(0x00FF_0000));
    }

    #[test]
    fn test_no_eof_record() {
        let mut bytes = document(vec![set_map_mode(MM_TEXT)], 0);
        bytes.truncate(bytes.len() - RECORD_HEADER_SIZE);
        let decoded = decode_bytes(&bytes).unwrap();
        assert_eq!(decoded.records.len(), 3);
        assert!(!decoded.records[2].is_eof());
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = document(Vec::new(), 0);
        bytes[0] = 0;
        assert!(matches!(
            decode_bytes(&bytes),
            Err(WmfError::InvalidMagic(_))
        ));
    }

    #[test]
    fn test_truncated_headers_and_bodies() {
        let bytes = document(vec![set_bk_color(0)], 0);
        assert!(matches!(
            decode_bytes(&bytes[..30]),
            Err(WmfError::Truncated { what: "standard header", .. })
        ));

        // SETBKCOLOR cut after its header
        let cut = PLACEABLE_HEADER_SIZE + STANDARD_HEADER_SIZE + 8;
        assert!(matches!(
            decode_bytes(&bytes[..cut]),
            Err(WmfError::Truncated { what: "record body", .. })
        ));
    }

    #[test]
    fn test_record_size_below_header() {
        let mut bytes = document(Vec::new(), 0);
        let eof = bytes.len() - RECORD_HEADER_SIZE;
        bytes[eof] = 1;
        assert!(matches!(
            decode_bytes(&bytes),
            Err(WmfError::InvalidRecordSize { opcode: META_EOF, size: 2 })
        ));
    }

    #[test]
    fn test_unknown_record_round_trip() {
        let mut bytes = document(Vec::new(), 0);
        let eof = bytes.split_off(bytes.len() - RECORD_HEADER_SIZE);
        bytes.extend_from_slice(&[5, 0, 0, 0, 0x34, 0x12, 1, 2, 3, 4]);
        bytes.extend_from_slice(&eof);

        let mut decoded = decode_bytes(&bytes).unwrap();
        assert_eq!(decoded.records[2].name(), "UNKNOWN");
        assert_eq!(decoded.records[2].opcode(), 0x1234);

        let dc = DeviceContext::new(&MetafileOptions::default());
        let mut out = Vec::new();
        encode(&mut decoded.records, &dc, &decoded.handles, &mut out).unwrap();
        assert_eq!(out.len(), bytes.len());
        assert_eq!(&out[40..], &bytes[40..]);
    }

    #[test]
    fn test_decode_from_reader() {
        let bytes = document(vec![line_to(3, 4)], 0);
        let decoded = decode(std::io::Cursor::new(bytes)).unwrap();
        assert_eq!(decoded.records[2].name(), "LINETO");
        assert_eq!(decoded.records[2].int("x"), Some(3));
    }
}
