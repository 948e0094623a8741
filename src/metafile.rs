//! Metafile document and drawing API
//!
//! A [`Metafile`] owns the record list (placeable header and standard header
//! first), the object handle table and the device context. Drawing calls
//! build records through [`crate::records`] and append them; records flagged
//! invalid at construction are dropped and the call reports `false`.

use crate::dc::DeviceContext;
use crate::error::{WmfError, WmfResult};
use crate::handles::HandleTable;
use crate::options::MetafileOptions;
use crate::record::Record;
use crate::records::{self, FontSpec, HEADER, PLACEABLE};
use crate::stream;
use crate::types::{Bounds, Point};
use log::{debug, trace, warn};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

#[derive(Debug)]
pub struct Metafile {
    records: Vec<Record>,
    handles: HandleTable,
    dc: DeviceContext,
    /// First record of the current path
    path_start: usize,
}

impl Default for Metafile {
    fn default() -> Self {
        Self::with_dc(DeviceContext::new(&MetafileOptions::default()))
    }
}

impl Metafile {
    /// Empty document sized by `options`
    pub fn new(options: MetafileOptions) -> WmfResult<Self> {
        options.validate()?;
        Ok(Self::with_dc(DeviceContext::new(&options)))
    }

    fn with_dc(dc: DeviceContext) -> Self {
        // The placeable header is stamped from the DC on save
        Self {
            records: vec![Record::new(&PLACEABLE), Record::new(&HEADER)],
            handles: HandleTable::growable(),
            dc,
            path_start: 0,
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> WmfResult<Self> {
        let path = path.as_ref();
        debug!("Loading {}", path.display());
        Self::read_from(BufReader::new(File::open(path)?))
    }

    pub fn from_bytes(data: &[u8]) -> WmfResult<Self> {
        Self::from_decoded(stream::decode_bytes(data)?)
    }

    pub fn read_from<R: Read>(reader: R) -> WmfResult<Self> {
        Self::from_decoded(stream::decode(reader)?)
    }

    fn from_decoded(decoded: stream::Decoded) -> WmfResult<Self> {
        let mut dc = DeviceContext::new(&MetafileOptions::default());
        if let Some(placeable) = decoded.records.first() {
            dc.hydrate(placeable)?;
        }
        Ok(Self {
            records: decoded.records,
            handles: decoded.handles,
            dc,
            path_start: 0,
        })
    }

    /// Write to `path`; returns the file size in words
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> WmfResult<usize> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        let words = self.write_to(&mut out)?;
        out.flush()?;
        debug!("Saved {} ({} words)", path.display(), words);
        Ok(words)
    }

    pub fn write_to<W: Write>(&mut self, out: &mut W) -> WmfResult<usize> {
        stream::encode(&mut self.records, &self.dc, &self.handles, out)
    }

    pub fn to_bytes(&mut self) -> WmfResult<Vec<u8>> {
        let mut out = Vec::new();
        self.write_to(&mut out)?;
        Ok(out)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn handles(&self) -> &HandleTable {
        &self.handles
    }

    pub fn dc(&self) -> &DeviceContext {
        &self.dc
    }

    /// Remove and return the record at `index`
    pub fn remove_record(&mut self, index: usize) -> Option<Record> {
        if index >= self.records.len() {
            return None;
        }
        let record = self.records.remove(index);
        self.handles.forget_record(index);
        if self.path_start > index {
            self.path_start -= 1;
        }
        Some(record)
    }

    /// Append unless the record was flagged invalid
    pub fn append(&mut self, record: Record) -> bool {
        if record.is_error() {
            warn!("Rejected invalid {} record", record.name());
            return false;
        }
        trace!("Appending {}", record);
        self.records.push(record);
        true
    }

    /// Append an object-creating record and give it a handle. `None` when
    /// the record was flagged invalid.
    pub fn append_with_handle(&mut self, mut record: Record) -> WmfResult<Option<u16>> {
        if record.is_error() {
            warn!("Rejected invalid {} record", record.name());
            return Ok(None);
        }
        let handle = self.handles.allocate(self.records.len())?;
        record.set_handle(handle);
        trace!("Appending {}", record);
        self.records.push(record);
        Ok(Some(handle))
    }

    /// Mark the next record as the start of a path
    pub fn begin_path(&mut self) {
        self.path_start = self.records.len();
    }

    pub fn path_start(&self) -> usize {
        self.path_start
    }

    /// Union of the bounds of every record since [`Metafile::begin_path`]
    pub fn path_bounds(&self) -> Bounds {
        self.records
            .iter()
            .skip(self.path_start)
            .filter_map(Record::bounding_box)
            .fold(Bounds::UNSET, |acc, b| acc.union(&b))
    }

    fn live_handle(&self, handle: u16) -> WmfResult<()> {
        match self.handles.get(handle) {
            Some(_) => Ok(()),
            None => Err(WmfError::InvalidHandle(handle)),
        }
    }

    // Graphics objects

    pub fn create_pen(&mut self, style: u16, width: u16, color: u32) -> WmfResult<Option<u16>> {
        self.append_with_handle(records::create_pen(style, width, color))
    }

    pub fn create_brush(&mut self, style: u16, color: u32, hatch: u16) -> WmfResult<Option<u16>> {
        self.append_with_handle(records::create_brush(style, color, hatch))
    }

    pub fn create_solid_brush(&mut self, color: u32) -> WmfResult<Option<u16>> {
        self.create_brush(crate::constants::BS_SOLID, color, 0)
    }

    pub fn create_hatch_brush(&mut self, hatch: u16, color: u32) -> WmfResult<Option<u16>> {
        self.create_brush(crate::constants::BS_HATCHED, color, hatch)
    }

    pub fn create_font(&mut self, font: &FontSpec) -> WmfResult<Option<u16>> {
        self.append_with_handle(records::create_font(font))
    }

    /// Select a live object into the device context
    pub fn select_object(&mut self, handle: u16) -> WmfResult<bool> {
        self.live_handle(handle)?;
        Ok(self.append(records::select_object(handle)))
    }

    /// Delete a live object and free its handle
    pub fn delete_object(&mut self, handle: u16) -> WmfResult<bool> {
        self.live_handle(handle)?;
        self.handles.free(handle)?;
        Ok(self.append(records::delete_object(handle)))
    }

    // Device context state

    pub fn set_bk_mode(&mut self, mode: u16) -> bool {
        self.append(records::set_bk_mode(mode))
    }

    pub fn set_map_mode(&mut self, mode: u16) -> bool {
        self.append(records::set_map_mode(mode))
    }

    pub fn set_poly_fill_mode(&mut self, mode: u16) -> bool {
        self.append(records::set_poly_fill_mode(mode))
    }

    pub fn set_bk_color(&mut self, color: u32) -> bool {
        self.append(records::set_bk_color(color))
    }

    pub fn set_text_color(&mut self, color: u32) -> bool {
        self.append(records::set_text_color(color))
    }

    pub fn set_window_org(&mut self, x: i32, y: i32) -> bool {
        self.append(records::set_window_org(x, y))
    }

    pub fn set_window_ext(&mut self, cx: i32, cy: i32) -> bool {
        self.append(records::set_window_ext(cx, cy))
    }

    pub fn set_viewport_org(&mut self, x: i32, y: i32) -> bool {
        self.append(records::set_viewport_org(x, y))
    }

    pub fn set_viewport_ext(&mut self, cx: i32, cy: i32) -> bool {
        self.append(records::set_viewport_ext(cx, cy))
    }

    // Drawing

    pub fn move_to(&mut self, x: i32, y: i32) -> bool {
        self.append(records::move_to(x, y))
    }

    pub fn line_to(&mut self, x: i32, y: i32) -> bool {
        self.append(records::line_to(x, y))
    }

    pub fn polyline(&mut self, points: &[Point]) -> bool {
        self.append(records::polyline(points))
    }

    pub fn polygon(&mut self, points: &[Point]) -> bool {
        self.append(records::polygon(points))
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) -> bool {
        self.append(records::set_pixel(x, y, color))
    }

    pub fn rectangle(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> bool {
        self.append(records::rectangle(left, top, right, bottom))
    }

    pub fn ellipse(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> bool {
        self.append(records::ellipse(left, top, right, bottom))
    }

    pub fn text_out(&mut self, x: i32, y: i32, text: &str) -> bool {
        self.append(records::ext_text_out(x, y, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;
    use crate::options::Units;
    use crate::types::rgb;

    fn canvas_8x6() -> Metafile {
        Metafile::new(MetafileOptions::new(8.0, 6.0, 300, Units::Inches)).unwrap()
    }

    fn diagonals() -> [Vec<Point>; 2] {
        [
            vec![Point::new(0, 0), Point::new(2400, 1800)],
            vec![Point::new(0, 1800), Point::new(2400, 0)],
        ]
    }

    #[test]
    fn test_two_diagonal_polylines_round_trip() {
        let mut wmf = canvas_8x6();
        for line in diagonals() {
            assert!(wmf.polyline(&line));
        }
        let bytes = wmf.to_bytes().unwrap();
        let header = &wmf.records()[1];
        let words = header.int("size_low").unwrap() + (header.int("size_high").unwrap() << 16);
        assert_eq!(words as usize * 2, bytes.len());

        let mut loaded = Metafile::from_bytes(&bytes).unwrap();
        let lines: Vec<_> = loaded
            .records()
            .iter()
            .filter(|r| r.name() == "POLYLINE")
            .map(|r| r.points("points").unwrap().to_vec())
            .collect();
        assert_eq!(lines, diagonals().to_vec());
        let header = &loaded.records()[1];
        assert_eq!(header.int("size_low"), Some(words));
        assert_eq!(loaded.dc().bounds(), Bounds::new(0, 0, 2400, 1800));

        assert_eq!(loaded.to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_load_save_is_idempotent() {
        let mut wmf = Metafile::default();
        let pen = wmf.create_pen(PS_SOLID, 3, rgb(255, 0, 0)).unwrap().unwrap();
        let font = wmf.create_font(&FontSpec::with_height(-48)).unwrap().unwrap();
        wmf.select_object(pen).unwrap();
        wmf.select_object(font).unwrap();
        wmf.set_bk_mode(TRANSPARENT);
        wmf.set_map_mode(MM_ANISOTROPIC);
        wmf.set_window_ext(1800, 1200);
        wmf.move_to(10, 10);
        wmf.line_to(200, 300);
        wmf.rectangle(5, 5, 50, 60);
        wmf.text_out(100, 100, "Hello, metafile");
        wmf.delete_object(font).unwrap();

        let first = wmf.to_bytes().unwrap();
        let mut loaded = Metafile::from_bytes(&first).unwrap();
        let second = loaded.to_bytes().unwrap();
        assert_eq!(first, second);
        assert_eq!(loaded.records()[1].int("object_count"), Some(2));
        assert_eq!(loaded.handles().get(pen), Some(2));
    }

    #[test]
    fn test_invalid_mode_is_excluded() {
        let mut wmf = Metafile::default();
        let before = wmf.len();
        assert!(!wmf.set_bk_mode(7));
        assert!(!wmf.set_map_mode(0));
        assert!(!wmf.set_poly_fill_mode(WINDING + 1));
        assert!(!wmf.polyline(&[Point::new(0, 0), Point::new(0, 70_000)]));
        assert_eq!(wmf.len(), before);
        assert!(wmf.set_poly_fill_mode(WINDING));
        assert_eq!(wmf.len(), before + 1);
    }

    #[test]
    fn test_handle_allocation_and_reuse() {
        let mut wmf = Metafile::default();
        let handles: Vec<_> = (0..3)
            .map(|i| wmf.create_pen(PS_SOLID, 1, i).unwrap().unwrap())
            .collect();
        assert_eq!(handles, vec![0, 1, 2]);

        assert!(wmf.delete_object(1).unwrap());
        assert_eq!(wmf.create_solid_brush(rgb(0, 0, 255)).unwrap(), Some(1));
        assert_eq!(wmf.create_hatch_brush(HS_CROSS, 0).unwrap(), Some(3));
    }

    #[test]
    fn test_dead_handles_rejected() {
        let mut wmf = Metafile::default();
        assert!(matches!(wmf.select_object(0), Err(WmfError::InvalidHandle(0))));
        let pen = wmf.create_pen(PS_SOLID, 1, 0).unwrap().unwrap();
        wmf.delete_object(pen).unwrap();
        assert!(matches!(wmf.delete_object(pen), Err(WmfError::InvalidHandle(_))));
    }

    #[test]
    fn test_loaded_table_is_fixed() {
        let mut wmf = Metafile::default();
        wmf.create_pen(PS_SOLID, 1, 0).unwrap();
        let bytes = wmf.to_bytes().unwrap();

        let mut loaded = Metafile::from_bytes(&bytes).unwrap();
        assert!(loaded.handles().is_fixed());
        assert!(matches!(
            loaded.create_pen(PS_DOT, 1, 0),
            Err(WmfError::HandleExhausted { capacity: 1 })
        ));
    }

    #[test]
    fn test_path_bounds() {
        let mut wmf = Metafile::default();
        wmf.polyline(&[Point::new(-10, 0), Point::new(10, 10)]);
        assert_eq!(wmf.path_bounds(), Bounds::new(-10, 0, 10, 10));

        wmf.begin_path();
        assert!(wmf.path_bounds().is_unset());
        wmf.set_bk_color(0);
        wmf.line_to(40, 5);
        wmf.rectangle(0, 20, 30, 25);
        assert_eq!(wmf.path_bounds(), Bounds::new(0, 5, 40, 25));
    }

    #[test]
    fn test_remove_record() {
        let mut wmf = Metafile::default();
        wmf.set_bk_color(0);
        let pen = wmf.create_pen(PS_SOLID, 1, 0).unwrap().unwrap();
        let removed = wmf.remove_record(2).unwrap();
        assert_eq!(removed.name(), "SETBKCOLOR");
        assert_eq!(wmf.handles().get(pen), Some(2));
        assert!(wmf.remove_record(99).is_none());
    }

    #[test]
    fn test_eof_appended_once() {
        let mut wmf = Metafile::default();
        wmf.set_pixel(1, 1, 0);
        let first = wmf.to_bytes().unwrap();
        let second = wmf.to_bytes().unwrap();
        assert_eq!(first, second);
        assert_eq!(wmf.records().iter().filter(|r| r.is_eof()).count(), 1);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drawing.wmf");

        let mut wmf = canvas_8x6();
        wmf.ellipse(100, 100, 700, 500);
        let words = wmf.save(&path).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), words as u64 * 2);

        let loaded = Metafile::load(&path).unwrap();
        assert_eq!(loaded.records()[2].name(), "ELLIPSE");
        assert_eq!(
            loaded.records()[2].bounding_box(),
            Some(Bounds::new(100, 100, 700, 500))
        );
        assert_eq!(loaded.dc().units_per_inch(), 300);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Metafile::load(dir.path().join("missing.wmf")).unwrap_err();
        assert!(matches!(err, WmfError::Io(_)));
    }

    #[test]
    fn test_invalid_options() {
        let options = MetafileOptions::new(-1.0, 4.0, 300, Units::Inches);
        assert!(matches!(
            Metafile::new(options),
            Err(WmfError::InvalidOptions(_))
        ));

        let options = MetafileOptions::new(240.0, 4.0, 300, Units::Inches);
        assert!(matches!(
            Metafile::new(options),
            Err(WmfError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_large_canvas_round_trip() {
        let canvases = [
            (
                MetafileOptions::new(420.0, 297.0, 100, Units::Millimeters),
                Bounds::new(0, 0, 42000, 29700),
                2540,
            ),
            (
                MetafileOptions::new(120.0, 4.0, 300, Units::Inches),
                Bounds::new(0, 0, 36000, 1200),
                300,
            ),
        ];
        for (options, bounds, inch) in canvases {
            let mut wmf = Metafile::new(options).unwrap();
            assert!(wmf.polyline(&[Point::new(0, 0), Point::new(32000, 1000)]));
            let bytes = wmf.to_bytes().unwrap();

            let mut loaded = Metafile::from_bytes(&bytes).unwrap();
            assert_eq!(loaded.dc().bounds(), bounds);
            assert_eq!(loaded.dc().units_per_inch(), inch);
            assert_eq!(loaded.to_bytes().unwrap(), bytes);
        }
    }
}
