//! Record catalogue
//!
//! One static [`RecordSchema`] per record type, the list the registry is
//! built from, and typed constructors for the records the builder API emits.

use crate::constants::*;
use crate::field::{Count, FieldDescriptor, IntKind, Value};
use crate::record::Record;
use crate::schema::{BoundsRule, RecordKind, RecordSchema, Trailer};
use crate::types::Point;

// Shared field layouts

const NO_FIELDS: &[FieldDescriptor] = &[];

const MODE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::u16("mode"),
    FieldDescriptor::u16("reserved").optional(),
];

const MAP_MODE_FIELDS: &[FieldDescriptor] = &[FieldDescriptor::u16("mode")];

const ALIGN_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::u16("align"),
    FieldDescriptor::u16("reserved").optional(),
];

const HANDLE_FIELDS: &[FieldDescriptor] = &[FieldDescriptor::u16("handle")];

const COLOR_FIELDS: &[FieldDescriptor] = &[FieldDescriptor::u32("color")];

/// WMF stores coordinate pairs y first
const YX_FIELDS: &[FieldDescriptor] = &[FieldDescriptor::i16("y"), FieldDescriptor::i16("x")];

const RECT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::i16("bottom"),
    FieldDescriptor::i16("right"),
    FieldDescriptor::i16("top"),
    FieldDescriptor::i16("left"),
];

const POLY_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::i16("count"),
    FieldDescriptor::points("points", Count::Field("count"), IntKind::I16),
];

const RECT_BOUNDS: BoundsRule = BoundsRule::Rect {
    left: "left",
    top: "top",
    right: "right",
    bottom: "bottom",
};

const POINT_BOUNDS: BoundsRule = BoundsRule::Point { x: "x", y: "y" };

// Per-record field layouts

const PLACEABLE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::u32("key").with_default(PLACEABLE_KEY as i64),
    FieldDescriptor::u16("hmf"),
    FieldDescriptor::points("bounds", Count::Fixed(2), IntKind::U16),
    FieldDescriptor::u16("inch"),
    FieldDescriptor::u32("reserved"),
    FieldDescriptor::u16("checksum"),
];

const HEADER_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::u16("file_type").with_default(MEMORYMETAFILE as i64),
    FieldDescriptor::u16("header_size").with_default(STANDARD_HEADER_WORDS as i64),
    FieldDescriptor::u16("version").with_default(METAVERSION300 as i64),
    FieldDescriptor::u16("size_low"),
    FieldDescriptor::u16("size_high"),
    FieldDescriptor::u16("object_count"),
    FieldDescriptor::u32("max_record"),
    FieldDescriptor::u16("member_count"),
];

const SETTEXTCHAREXTRA_FIELDS: &[FieldDescriptor] = &[FieldDescriptor::i16("extra")];

const RESTOREDC_FIELDS: &[FieldDescriptor] = &[FieldDescriptor::i16("saved_dc")];

const SETMAPPERFLAGS_FIELDS: &[FieldDescriptor] = &[FieldDescriptor::u32("flags")];

const SETPIXEL_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::u32("color"),
    FieldDescriptor::i16("y"),
    FieldDescriptor::i16("x"),
];

const EXTTEXTOUT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::i16("y"),
    FieldDescriptor::i16("x"),
    FieldDescriptor::i16("char_count"),
    FieldDescriptor::u16("options"),
];

const STRETCHDIB_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::u32("rop"),
    FieldDescriptor::u16("usage"),
    FieldDescriptor::u16("src_height"),
    FieldDescriptor::u16("src_width"),
    FieldDescriptor::u16("src_y"),
    FieldDescriptor::u16("src_x"),
    FieldDescriptor::u16("dest_height"),
    FieldDescriptor::u16("dest_width"),
    FieldDescriptor::u16("dest_y"),
    FieldDescriptor::u16("dest_x"),
];

const CREATEPENINDIRECT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::u16("style"),
    FieldDescriptor::points("width", Count::Fixed(1), IntKind::U16),
    FieldDescriptor::u32("color"),
];

const CREATEFONTINDIRECT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::i16("height"),
    FieldDescriptor::i16("width"),
    FieldDescriptor::i16("escapement"),
    FieldDescriptor::i16("orientation"),
    FieldDescriptor::i16("weight"),
    FieldDescriptor::u8("italic"),
    FieldDescriptor::u8("underline"),
    FieldDescriptor::u8("strike_out"),
    FieldDescriptor::u8("charset"),
    FieldDescriptor::u8("out_precision"),
    FieldDescriptor::u8("clip_precision"),
    FieldDescriptor::u8("quality"),
    FieldDescriptor::u8("pitch_and_family"),
    FieldDescriptor::fixed_string("face_name", LF_FACESIZE),
];

const CREATEBRUSHINDIRECT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::u16("style"),
    FieldDescriptor::u32("color"),
    FieldDescriptor::u16("hatch"),
];

// Header pseudo-records

pub static PLACEABLE: RecordSchema = RecordSchema::pseudo(
    "PLACEABLE",
    RecordKind::Placeable,
    PLACEABLE_FIELDS,
);

pub static HEADER: RecordSchema = RecordSchema::pseudo(
    "HEADER",
    RecordKind::Header,
    HEADER_FIELDS,
);

/// Fallback for opcodes missing from the catalogue; body kept verbatim
pub static UNKNOWN: RecordSchema = RecordSchema::pseudo("UNKNOWN", RecordKind::Plain, NO_FIELDS);

// Registered records

pub static EOF: RecordSchema =
    RecordSchema::new("EOF", META_EOF, NO_FIELDS).with_kind(RecordKind::Eof);
pub static SAVEDC: RecordSchema = RecordSchema::new("SAVEDC", META_SAVEDC, NO_FIELDS);
pub static REALIZEPALETTE: RecordSchema =
    RecordSchema::new("REALIZEPALETTE", META_REALIZEPALETTE, NO_FIELDS);
pub static SETPALENTRIES: RecordSchema =
    RecordSchema::new("SETPALENTRIES", META_SETPALENTRIES, NO_FIELDS);
pub static CREATEPALETTE: RecordSchema =
    RecordSchema::new("CREATEPALETTE", META_CREATEPALETTE, NO_FIELDS)
        .with_kind(RecordKind::CreatesObject);
pub static SETBKMODE: RecordSchema = RecordSchema::new("SETBKMODE", META_SETBKMODE, MODE_FIELDS);
pub static SETMAPMODE: RecordSchema =
    RecordSchema::new("SETMAPMODE", META_SETMAPMODE, MAP_MODE_FIELDS);
pub static SETROP2: RecordSchema = RecordSchema::new("SETROP2", META_SETROP2, MODE_FIELDS);
pub static SETRELABS: RecordSchema = RecordSchema::new("SETRELABS", META_SETRELABS, NO_FIELDS);
pub static SETPOLYFILLMODE: RecordSchema =
    RecordSchema::new("SETPOLYFILLMODE", META_SETPOLYFILLMODE, MODE_FIELDS);
pub static SETSTRETCHBLTMODE: RecordSchema =
    RecordSchema::new("SETSTRETCHBLTMODE", META_SETSTRETCHBLTMODE, MODE_FIELDS);
pub static SETTEXTCHAREXTRA: RecordSchema = RecordSchema::new(
    "SETTEXTCHAREXTRA",
    META_SETTEXTCHAREXTRA,
    SETTEXTCHAREXTRA_FIELDS,
);
pub static RESTOREDC: RecordSchema =
    RecordSchema::new("RESTOREDC", META_RESTOREDC, RESTOREDC_FIELDS);
pub static INVERTREGION: RecordSchema =
    RecordSchema::new("INVERTREGION", META_INVERTREGION, HANDLE_FIELDS)
        .with_kind(RecordKind::ReferencesObject);
pub static PAINTREGION: RecordSchema =
    RecordSchema::new("PAINTREGION", META_PAINTREGION, HANDLE_FIELDS)
        .with_kind(RecordKind::ReferencesObject);
pub static SELECTCLIPREGION: RecordSchema =
    RecordSchema::new("SELECTCLIPREGION", META_SELECTCLIPREGION, HANDLE_FIELDS)
        .with_kind(RecordKind::ReferencesObject);
pub static SELECTOBJECT: RecordSchema =
    RecordSchema::new("SELECTOBJECT", META_SELECTOBJECT, HANDLE_FIELDS)
        .with_kind(RecordKind::ReferencesObject);
pub static SETTEXTALIGN: RecordSchema =
    RecordSchema::new("SETTEXTALIGN", META_SETTEXTALIGN, ALIGN_FIELDS);
pub static RESIZEPALETTE: RecordSchema =
    RecordSchema::new("RESIZEPALETTE", META_RESIZEPALETTE, NO_FIELDS);
pub static DIBCREATEPATTERNBRUSH: RecordSchema =
    RecordSchema::new("DIBCREATEPATTERNBRUSH", META_DIBCREATEPATTERNBRUSH, NO_FIELDS)
        .with_kind(RecordKind::CreatesObject);
pub static SETLAYOUT: RecordSchema = RecordSchema::new("SETLAYOUT", META_SETLAYOUT, NO_FIELDS);
pub static DELETEOBJECT: RecordSchema =
    RecordSchema::new("DELETEOBJECT", META_DELETEOBJECT, HANDLE_FIELDS)
        .with_kind(RecordKind::DeletesObject);
pub static CREATEPATTERNBRUSH: RecordSchema =
    RecordSchema::new("CREATEPATTERNBRUSH", META_CREATEPATTERNBRUSH, NO_FIELDS)
        .with_kind(RecordKind::CreatesObject);
pub static SETBKCOLOR: RecordSchema =
    RecordSchema::new("SETBKCOLOR", META_SETBKCOLOR, COLOR_FIELDS);
pub static SETTEXTCOLOR: RecordSchema =
    RecordSchema::new("SETTEXTCOLOR", META_SETTEXTCOLOR, COLOR_FIELDS);
pub static SETTEXTJUSTIFICATION: RecordSchema =
    RecordSchema::new("SETTEXTJUSTIFICATION", META_SETTEXTJUSTIFICATION, NO_FIELDS);
pub static SETWINDOWORG: RecordSchema =
    RecordSchema::new("SETWINDOWORG", META_SETWINDOWORG, YX_FIELDS);
pub static SETWINDOWEXT: RecordSchema =
    RecordSchema::new("SETWINDOWEXT", META_SETWINDOWEXT, YX_FIELDS);
pub static SETVIEWPORTORG: RecordSchema =
    RecordSchema::new("SETVIEWPORTORG", META_SETVIEWPORTORG, YX_FIELDS);
pub static SETVIEWPORTEXT: RecordSchema =
    RecordSchema::new("SETVIEWPORTEXT", META_SETVIEWPORTEXT, YX_FIELDS);
pub static OFFSETWINDOWORG: RecordSchema =
    RecordSchema::new("OFFSETWINDOWORG", META_OFFSETWINDOWORG, YX_FIELDS);
pub static OFFSETVIEWPORTORG: RecordSchema =
    RecordSchema::new("OFFSETVIEWPORTORG", META_OFFSETVIEWPORTORG, YX_FIELDS);
pub static LINETO: RecordSchema =
    RecordSchema::new("LINETO", META_LINETO, YX_FIELDS).with_bounds(POINT_BOUNDS);
pub static MOVETO: RecordSchema = RecordSchema::new("MOVETO", META_MOVETO, YX_FIELDS);
pub static OFFSETCLIPRGN: RecordSchema =
    RecordSchema::new("OFFSETCLIPRGN", META_OFFSETCLIPRGN, YX_FIELDS);
pub static FILLREGION: RecordSchema =
    RecordSchema::new("FILLREGION", META_FILLREGION, NO_FIELDS);
pub static SETMAPPERFLAGS: RecordSchema = RecordSchema::new(
    "SETMAPPERFLAGS",
    META_SETMAPPERFLAGS,
    SETMAPPERFLAGS_FIELDS,
);
pub static SELECTPALETTE: RecordSchema =
    RecordSchema::new("SELECTPALETTE", META_SELECTPALETTE, HANDLE_FIELDS)
        .with_kind(RecordKind::ReferencesObject);
pub static POLYGON: RecordSchema = RecordSchema::new("POLYGON", META_POLYGON, POLY_FIELDS)
    .with_bounds(BoundsRule::Points("points"));
pub static POLYLINE: RecordSchema = RecordSchema::new("POLYLINE", META_POLYLINE, POLY_FIELDS)
    .with_bounds(BoundsRule::Points("points"));
pub static SCALEWINDOWEXT: RecordSchema =
    RecordSchema::new("SCALEWINDOWEXT", META_SCALEWINDOWEXT, NO_FIELDS);
pub static SCALEVIEWPORTEXT: RecordSchema =
    RecordSchema::new("SCALEVIEWPORTEXT", META_SCALEVIEWPORTEXT, NO_FIELDS);
pub static EXCLUDECLIPRECT: RecordSchema =
    RecordSchema::new("EXCLUDECLIPRECT", META_EXCLUDECLIPRECT, RECT_FIELDS);
pub static INTERSECTCLIPRECT: RecordSchema =
    RecordSchema::new("INTERSECTCLIPRECT", META_INTERSECTCLIPRECT, RECT_FIELDS);
pub static ELLIPSE: RecordSchema =
    RecordSchema::new("ELLIPSE", META_ELLIPSE, RECT_FIELDS).with_bounds(RECT_BOUNDS);
pub static FLOODFILL: RecordSchema = RecordSchema::new("FLOODFILL", META_FLOODFILL, NO_FIELDS);
pub static RECTANGLE: RecordSchema =
    RecordSchema::new("RECTANGLE", META_RECTANGLE, RECT_FIELDS).with_bounds(RECT_BOUNDS);
pub static SETPIXEL: RecordSchema = RecordSchema::new(
    "SETPIXEL",
    META_SETPIXEL,
    SETPIXEL_FIELDS,
)
.with_bounds(POINT_BOUNDS);
pub static FRAMEREGION: RecordSchema =
    RecordSchema::new("FRAMEREGION", META_FRAMEREGION, NO_FIELDS);
pub static ANIMATEPALETTE: RecordSchema =
    RecordSchema::new("ANIMATEPALETTE", META_ANIMATEPALETTE, NO_FIELDS);
pub static TEXTOUT: RecordSchema = RecordSchema::new("TEXTOUT", META_TEXTOUT, NO_FIELDS);
pub static POLYPOLYGON: RecordSchema =
    RecordSchema::new("POLYPOLYGON", META_POLYPOLYGON, NO_FIELDS);
pub static EXTFLOODFILL: RecordSchema =
    RecordSchema::new("EXTFLOODFILL", META_EXTFLOODFILL, NO_FIELDS);
pub static ROUNDRECT: RecordSchema = RecordSchema::new("ROUNDRECT", META_ROUNDRECT, NO_FIELDS);
pub static PATBLT: RecordSchema = RecordSchema::new("PATBLT", META_PATBLT, NO_FIELDS);
pub static ESCAPE: RecordSchema = RecordSchema::new("ESCAPE", META_ESCAPE, NO_FIELDS);
pub static CREATEREGION: RecordSchema =
    RecordSchema::new("CREATEREGION", META_CREATEREGION, NO_FIELDS)
        .with_kind(RecordKind::CreatesObject);
pub static ARC: RecordSchema = RecordSchema::new("ARC", META_ARC, NO_FIELDS);
pub static PIE: RecordSchema = RecordSchema::new("PIE", META_PIE, NO_FIELDS);
pub static CHORD: RecordSchema = RecordSchema::new("CHORD", META_CHORD, NO_FIELDS);
pub static BITBLT: RecordSchema = RecordSchema::new("BITBLT", META_BITBLT, NO_FIELDS);
pub static DIBBITBLT: RecordSchema = RecordSchema::new("DIBBITBLT", META_DIBBITBLT, NO_FIELDS);
pub static EXTTEXTOUT: RecordSchema = RecordSchema::new(
    "EXTTEXTOUT",
    META_EXTTEXTOUT,
    EXTTEXTOUT_FIELDS,
)
.with_trailer(Trailer::ExtTextOut);
pub static STRETCHBLT: RecordSchema =
    RecordSchema::new("STRETCHBLT", META_STRETCHBLT, NO_FIELDS);
pub static DIBSTRETCHBLT: RecordSchema =
    RecordSchema::new("DIBSTRETCHBLT", META_DIBSTRETCHBLT, NO_FIELDS);
pub static SETDIBTODEV: RecordSchema =
    RecordSchema::new("SETDIBTODEV", META_SETDIBTODEV, NO_FIELDS);
pub static STRETCHDIB: RecordSchema = RecordSchema::new(
    "STRETCHDIB",
    META_STRETCHDIB,
    STRETCHDIB_FIELDS,
);
pub static CREATEPENINDIRECT: RecordSchema = RecordSchema::new(
    "CREATEPENINDIRECT",
    META_CREATEPENINDIRECT,
    CREATEPENINDIRECT_FIELDS,
)
.with_kind(RecordKind::CreatesObject);
pub static CREATEFONTINDIRECT: RecordSchema = RecordSchema::new(
    "CREATEFONTINDIRECT",
    META_CREATEFONTINDIRECT,
    CREATEFONTINDIRECT_FIELDS,
)
.with_kind(RecordKind::CreatesObject);
pub static CREATEBRUSHINDIRECT: RecordSchema = RecordSchema::new(
    "CREATEBRUSHINDIRECT",
    META_CREATEBRUSHINDIRECT,
    CREATEBRUSHINDIRECT_FIELDS,
)
.with_kind(RecordKind::CreatesObject);

/// Every registered record type, one entry per opcode
pub static CATALOGUE: &[&RecordSchema] = &[
    &EOF,
    &SAVEDC,
    &REALIZEPALETTE,
    &SETPALENTRIES,
    &CREATEPALETTE,
    &SETBKMODE,
    &SETMAPMODE,
    &SETROP2,
    &SETRELABS,
    &SETPOLYFILLMODE,
    &SETSTRETCHBLTMODE,
    &SETTEXTCHAREXTRA,
    &RESTOREDC,
    &INVERTREGION,
    &PAINTREGION,
    &SELECTCLIPREGION,
    &SELECTOBJECT,
    &SETTEXTALIGN,
    &RESIZEPALETTE,
    &DIBCREATEPATTERNBRUSH,
    &SETLAYOUT,
    &DELETEOBJECT,
    &CREATEPATTERNBRUSH,
    &SETBKCOLOR,
    &SETTEXTCOLOR,
    &SETTEXTJUSTIFICATION,
    &SETWINDOWORG,
    &SETWINDOWEXT,
    &SETVIEWPORTORG,
    &SETVIEWPORTEXT,
    &OFFSETWINDOWORG,
    &OFFSETVIEWPORTORG,
    &LINETO,
    &MOVETO,
    &OFFSETCLIPRGN,
    &FILLREGION,
    &SETMAPPERFLAGS,
    &SELECTPALETTE,
    &POLYGON,
    &POLYLINE,
    &SCALEWINDOWEXT,
    &SCALEVIEWPORTEXT,
    &EXCLUDECLIPRECT,
    &INTERSECTCLIPRECT,
    &ELLIPSE,
    &FLOODFILL,
    &RECTANGLE,
    &SETPIXEL,
    &FRAMEREGION,
    &ANIMATEPALETTE,
    &TEXTOUT,
    &POLYPOLYGON,
    &EXTFLOODFILL,
    &ROUNDRECT,
    &PATBLT,
    &ESCAPE,
    &CREATEREGION,
    &ARC,
    &PIE,
    &CHORD,
    &BITBLT,
    &DIBBITBLT,
    &EXTTEXTOUT,
    &STRETCHBLT,
    &DIBSTRETCHBLT,
    &SETDIBTODEV,
    &STRETCHDIB,
    &CREATEPENINDIRECT,
    &CREATEFONTINDIRECT,
    &CREATEBRUSHINDIRECT,
];

// Conditional EXTTEXTOUT trailer, in wire order

pub const EXTTEXTOUT_RECT: FieldDescriptor =
    FieldDescriptor::points("rect", Count::Fixed(2), IntKind::I16);
pub const EXTTEXTOUT_STRING: FieldDescriptor =
    FieldDescriptor::counted_string("string", Count::Field("char_count"), 1, 2);
pub const EXTTEXTOUT_DX: FieldDescriptor =
    FieldDescriptor::list("dx", Count::Field("char_count"), IntKind::I16);

// Typed constructors

/// Record flagged invalid when `mode` falls outside `first..=last`
fn mode_record(schema: &'static RecordSchema, mode: u16, first: u16, last: u16) -> Record {
    let mut record = Record::new(schema);
    if mode < first || mode > last {
        record.flag_error();
    } else {
        record.set_int("mode", mode as i64);
    }
    record
}

fn fits_i16(value: i32) -> bool {
    i16::try_from(value).is_ok()
}

pub fn eof() -> Record {
    Record::new(&EOF)
}

pub fn set_bk_mode(mode: u16) -> Record {
    let mut record = mode_record(&SETBKMODE, mode, TRANSPARENT, BKMODE_LAST);
    record.set_int("reserved", 0);
    record
}

pub fn set_map_mode(mode: u16) -> Record {
    mode_record(&SETMAPMODE, mode, MM_TEXT, MM_MAX)
}

pub fn set_poly_fill_mode(mode: u16) -> Record {
    let mut record = mode_record(&SETPOLYFILLMODE, mode, ALTERNATE, POLYFILL_LAST);
    record.set_int("reserved", 0);
    record
}

fn color_record(schema: &'static RecordSchema, color: u32) -> Record {
    let mut record = Record::new(schema);
    record.set_int("color", color as i64);
    record
}

pub fn set_bk_color(color: u32) -> Record {
    color_record(&SETBKCOLOR, color)
}

pub fn set_text_color(color: u32) -> Record {
    color_record(&SETTEXTCOLOR, color)
}

fn yx_record(schema: &'static RecordSchema, x: i32, y: i32) -> Record {
    let mut record = Record::new(schema);
    if fits_i16(x) && fits_i16(y) {
        record.set_int("x", x as i64);
        record.set_int("y", y as i64);
    } else {
        record.flag_error();
    }
    record
}

pub fn set_window_org(x: i32, y: i32) -> Record {
    yx_record(&SETWINDOWORG, x, y)
}

pub fn set_window_ext(cx: i32, cy: i32) -> Record {
    yx_record(&SETWINDOWEXT, cx, cy)
}

pub fn set_viewport_org(x: i32, y: i32) -> Record {
    yx_record(&SETVIEWPORTORG, x, y)
}

pub fn set_viewport_ext(cx: i32, cy: i32) -> Record {
    yx_record(&SETVIEWPORTEXT, cx, cy)
}

pub fn move_to(x: i32, y: i32) -> Record {
    yx_record(&MOVETO, x, y)
}

pub fn line_to(x: i32, y: i32) -> Record {
    yx_record(&LINETO, x, y)
}

fn handle_record(schema: &'static RecordSchema, handle: u16) -> Record {
    let mut record = Record::new(schema);
    record.set_int("handle", handle as i64);
    record
}

pub fn select_object(handle: u16) -> Record {
    handle_record(&SELECTOBJECT, handle)
}

pub fn delete_object(handle: u16) -> Record {
    handle_record(&DELETEOBJECT, handle)
}

pub fn create_pen(style: u16, width: u16, color: u32) -> Record {
    let mut record = Record::new(&CREATEPENINDIRECT);
    record.set_int("style", style as i64);
    record.set("width", Value::Points(vec![Point::new(width as i32, 0)]));
    record.set_int("color", color as i64);
    record
}

pub fn create_brush(style: u16, color: u32, hatch: u16) -> Record {
    let mut record = Record::new(&CREATEBRUSHINDIRECT);
    record.set_int("style", style as i64);
    record.set_int("color", color as i64);
    record.set_int("hatch", hatch as i64);
    record
}

/// Logical font description for [`create_font`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSpec {
    pub height: i16,
    pub width: i16,
    pub escapement: i16,
    pub orientation: i16,
    pub weight: i16,
    pub italic: bool,
    pub underline: bool,
    pub strike_out: bool,
    pub charset: u8,
    pub out_precision: u8,
    pub clip_precision: u8,
    pub quality: u8,
    pub pitch_and_family: u8,
    pub face_name: String,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            height: 0,
            width: 0,
            escapement: 0,
            orientation: 0,
            weight: FW_NORMAL,
            italic: false,
            underline: false,
            strike_out: false,
            charset: ANSI_CHARSET,
            out_precision: OUT_DEFAULT_PRECIS,
            clip_precision: CLIP_DEFAULT_PRECIS,
            quality: DEFAULT_QUALITY,
            pitch_and_family: DEFAULT_PITCH | FF_DONTCARE,
            face_name: "Times New Roman".to_string(),
        }
    }
}

impl FontSpec {
    pub fn with_height(height: i16) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }
}

pub fn create_font(font: &FontSpec) -> Record {
    let mut record = Record::new(&CREATEFONTINDIRECT);
    for (name, value) in [
        ("height", font.height as i64),
        ("width", font.width as i64),
        ("escapement", font.escapement as i64),
        ("orientation", font.orientation as i64),
        ("weight", font.weight as i64),
        ("italic", font.italic as i64),
        ("underline", font.underline as i64),
        ("strike_out", font.strike_out as i64),
        ("charset", font.charset as i64),
        ("out_precision", font.out_precision as i64),
        ("clip_precision", font.clip_precision as i64),
        ("quality", font.quality as i64),
        ("pitch_and_family", font.pitch_and_family as i64),
    ] {
        record.set_int(name, value);
    }

    // At most 31 bytes so the stored name stays null terminated
    let mut face = encode_text(font.face_name.split('\0').next().unwrap_or(""));
    face.truncate(LF_FACESIZE - 1);
    record.set("face_name", Value::Bytes(face));
    record
}

fn poly_record(schema: &'static RecordSchema, points: &[Point]) -> Record {
    let mut record = Record::new(schema);
    let fits = points.iter().all(|p| fits_i16(p.x) && fits_i16(p.y));
    match i16::try_from(points.len()) {
        Ok(count) if fits => {
            record.set_int("count", count as i64);
            record.set("points", Value::Points(points.to_vec()));
        }
        _ => record.flag_error(),
    }
    record
}

pub fn polyline(points: &[Point]) -> Record {
    poly_record(&POLYLINE, points)
}

pub fn polygon(points: &[Point]) -> Record {
    poly_record(&POLYGON, points)
}

fn rect_record(schema: &'static RecordSchema, left: i32, top: i32, right: i32, bottom: i32) -> Record {
    let mut record = Record::new(schema);
    if [left, top, right, bottom].into_iter().all(fits_i16) {
        record.set_int("left", left as i64);
        record.set_int("top", top as i64);
        record.set_int("right", right as i64);
        record.set_int("bottom", bottom as i64);
    } else {
        record.flag_error();
    }
    record
}

pub fn rectangle(left: i32, top: i32, right: i32, bottom: i32) -> Record {
    rect_record(&RECTANGLE, left, top, right, bottom)
}

pub fn ellipse(left: i32, top: i32, right: i32, bottom: i32) -> Record {
    rect_record(&ELLIPSE, left, top, right, bottom)
}

pub fn set_pixel(x: i32, y: i32, color: u32) -> Record {
    let mut record = yx_record(&SETPIXEL, x, y);
    record.set_int("color", color as i64);
    record
}

/// Single-byte text at (x, y) with no options, bounds or glyph offsets
pub fn ext_text_out(x: i32, y: i32, text: &str) -> Record {
    let mut record = yx_record(&EXTTEXTOUT, x, y);
    let bytes = encode_text(text);
    match i16::try_from(bytes.len()) {
        Ok(count) => record.set_int("char_count", count as i64),
        Err(_) => record.flag_error(),
    }
    record.set_int("options", 0);
    record.set("string", Value::Bytes(bytes));
    record.set(
        "rect",
        Value::Points(vec![Point::new(0, 0), Point::new(-1, -1)]),
    );
    record.set("dx", Value::List(Vec::new()));
    record
}

/// Latin-1 encoding, '?' for characters outside it
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(c as u32).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_validation() {
        assert!(!set_bk_mode(OPAQUE).is_error());
        assert!(set_bk_mode(0).is_error());
        assert!(set_bk_mode(BKMODE_LAST + 1).is_error());
        assert!(!set_map_mode(MM_ANISOTROPIC).is_error());
        assert!(set_map_mode(MM_MAX + 1).is_error());
        assert!(set_poly_fill_mode(3).is_error());
        assert_eq!(set_map_mode(MM_TWIPS).int("mode"), Some(MM_TWIPS as i64));
    }

    #[test]
    fn test_font_face_truncated() {
        let font = FontSpec {
            face_name: "X".repeat(40),
            ..FontSpec::default()
        };
        let record = create_font(&font);
        assert_eq!(record.bytes("face_name").unwrap().len(), LF_FACESIZE - 1);
        // 6 header + 10 + 8 + 32
        assert_eq!(record.compute_size().unwrap(), 56);
    }

    #[test]
    fn test_polyline_overflow_flags_error() {
        let record = polyline(&[Point::new(0, 0), Point::new(40_000, 0)]);
        assert!(record.is_error());
    }

    #[test]
    fn test_encode_text() {
        assert_eq!(encode_text("abc"), b"abc".to_vec());
        assert_eq!(encode_text("é€"), vec![0xE9, b'?']);
    }
}
