//! WMF opcodes and GDI enumeration values

// Placeable header
pub const PLACEABLE_KEY: u32 = 0x9AC6CDD7;
pub const PLACEABLE_HEADER_SIZE: usize = 22;
pub const STANDARD_HEADER_SIZE: usize = 18;
pub const STANDARD_HEADER_WORDS: u16 = 9;
/// Generic record header: size in words (4 bytes) + opcode (2 bytes)
pub const RECORD_HEADER_SIZE: usize = 6;

// MetafileType
pub const MEMORYMETAFILE: u16 = 0x0001;
pub const DISKMETAFILE: u16 = 0x0002;
pub const METAVERSION300: u16 = 0x0300;

// Record opcodes
pub const META_EOF: u16 = 0x0000;
pub const META_SAVEDC: u16 = 0x001E;
pub const META_REALIZEPALETTE: u16 = 0x0035;
pub const META_SETPALENTRIES: u16 = 0x0037;
pub const META_CREATEPALETTE: u16 = 0x00F7;
pub const META_SETBKMODE: u16 = 0x0102;
pub const META_SETMAPMODE: u16 = 0x0103;
pub const META_SETROP2: u16 = 0x0104;
pub const META_SETRELABS: u16 = 0x0105;
pub const META_SETPOLYFILLMODE: u16 = 0x0106;
pub const META_SETSTRETCHBLTMODE: u16 = 0x0107;
pub const META_SETTEXTCHAREXTRA: u16 = 0x0108;
pub const META_RESTOREDC: u16 = 0x0127;
pub const META_INVERTREGION: u16 = 0x012A;
pub const META_PAINTREGION: u16 = 0x012B;
pub const META_SELECTCLIPREGION: u16 = 0x012C;
pub const META_SELECTOBJECT: u16 = 0x012D;
pub const META_SETTEXTALIGN: u16 = 0x012E;
pub const META_RESIZEPALETTE: u16 = 0x0139;
pub const META_DIBCREATEPATTERNBRUSH: u16 = 0x0142;
pub const META_SETLAYOUT: u16 = 0x0149;
pub const META_DELETEOBJECT: u16 = 0x01F0;
pub const META_CREATEPATTERNBRUSH: u16 = 0x01F9;
pub const META_SETBKCOLOR: u16 = 0x0201;
pub const META_SETTEXTCOLOR: u16 = 0x0209;
pub const META_SETTEXTJUSTIFICATION: u16 = 0x020A;
pub const META_SETWINDOWORG: u16 = 0x020B;
pub const META_SETWINDOWEXT: u16 = 0x020C;
pub const META_SETVIEWPORTORG: u16 = 0x020D;
pub const META_SETVIEWPORTEXT: u16 = 0x020E;
pub const META_OFFSETWINDOWORG: u16 = 0x020F;
pub const META_OFFSETVIEWPORTORG: u16 = 0x0211;
pub const META_LINETO: u16 = 0x0213;
pub const META_MOVETO: u16 = 0x0214;
pub const META_OFFSETCLIPRGN: u16 = 0x0220;
pub const META_FILLREGION: u16 = 0x0228;
pub const META_SETMAPPERFLAGS: u16 = 0x0231;
pub const META_SELECTPALETTE: u16 = 0x0234;
pub const META_POLYGON: u16 = 0x0324;
pub const META_POLYLINE: u16 = 0x0325;
pub const META_SCALEWINDOWEXT: u16 = 0x0410;
pub const META_SCALEVIEWPORTEXT: u16 = 0x0412;
pub const META_EXCLUDECLIPRECT: u16 = 0x0415;
pub const META_INTERSECTCLIPRECT: u16 = 0x0416;
pub const META_ELLIPSE: u16 = 0x0418;
pub const META_FLOODFILL: u16 = 0x0419;
pub const META_RECTANGLE: u16 = 0x041B;
pub const META_SETPIXEL: u16 = 0x041F;
pub const META_FRAMEREGION: u16 = 0x0429;
pub const META_ANIMATEPALETTE: u16 = 0x0436;
pub const META_TEXTOUT: u16 = 0x0521;
pub const META_POLYPOLYGON: u16 = 0x0538;
pub const META_EXTFLOODFILL: u16 = 0x0548;
pub const META_ROUNDRECT: u16 = 0x061C;
pub const META_PATBLT: u16 = 0x061D;
pub const META_ESCAPE: u16 = 0x0626;
pub const META_CREATEREGION: u16 = 0x06FF;
pub const META_ARC: u16 = 0x0817;
pub const META_PIE: u16 = 0x081A;
pub const META_CHORD: u16 = 0x0830;
pub const META_BITBLT: u16 = 0x0922;
pub const META_DIBBITBLT: u16 = 0x0940;
pub const META_EXTTEXTOUT: u16 = 0x0A32;
pub const META_STRETCHBLT: u16 = 0x0B23;
pub const META_DIBSTRETCHBLT: u16 = 0x0B41;
pub const META_SETDIBTODEV: u16 = 0x0D33;
pub const META_STRETCHDIB: u16 = 0x0F43;
pub const META_CREATEPENINDIRECT: u16 = 0x02FA;
pub const META_CREATEFONTINDIRECT: u16 = 0x02FB;
pub const META_CREATEBRUSHINDIRECT: u16 = 0x02FC;

// Background modes
pub const TRANSPARENT: u16 = 1;
pub const OPAQUE: u16 = 2;
pub const BKMODE_LAST: u16 = 2;

// Map modes
pub const MM_TEXT: u16 = 1;
pub const MM_LOMETRIC: u16 = 2;
pub const MM_HIMETRIC: u16 = 3;
pub const MM_LOENGLISH: u16 = 4;
pub const MM_HIENGLISH: u16 = 5;
pub const MM_TWIPS: u16 = 6;
pub const MM_ISOTROPIC: u16 = 7;
pub const MM_ANISOTROPIC: u16 = 8;
pub const MM_MAX: u16 = MM_ANISOTROPIC;

// Polygon fill modes
pub const ALTERNATE: u16 = 1;
pub const WINDING: u16 = 2;
pub const POLYFILL_LAST: u16 = 2;

// Pen styles
pub const PS_SOLID: u16 = 0;
pub const PS_DASH: u16 = 1;
pub const PS_DOT: u16 = 2;
pub const PS_DASHDOT: u16 = 3;
pub const PS_DASHDOTDOT: u16 = 4;
pub const PS_NULL: u16 = 5;
pub const PS_INSIDEFRAME: u16 = 6;

// Brush styles
pub const BS_SOLID: u16 = 0;
pub const BS_NULL: u16 = 1;
pub const BS_HATCHED: u16 = 2;

// Hatch styles
pub const HS_HORIZONTAL: u16 = 0;
pub const HS_VERTICAL: u16 = 1;
pub const HS_FDIAGONAL: u16 = 2;
pub const HS_BDIAGONAL: u16 = 3;
pub const HS_CROSS: u16 = 4;
pub const HS_DIAGCROSS: u16 = 5;

// ExtTextOut options
pub const ETO_OPAQUE: u16 = 0x0002;
pub const ETO_CLIPPED: u16 = 0x0004;
pub const ETO_GLYPH_INDEX: u16 = 0x0010;
pub const ETO_RTLREADING: u16 = 0x0080;
pub const ETO_PDY: u16 = 0x2000;

// Font weights
pub const FW_DONTCARE: i16 = 0;
pub const FW_THIN: i16 = 100;
pub const FW_LIGHT: i16 = 300;
pub const FW_NORMAL: i16 = 400;
pub const FW_MEDIUM: i16 = 500;
pub const FW_SEMIBOLD: i16 = 600;
pub const FW_BOLD: i16 = 700;
pub const FW_HEAVY: i16 = 900;

// Font creation defaults
pub const ANSI_CHARSET: u8 = 0;
pub const DEFAULT_CHARSET: u8 = 1;
pub const SYMBOL_CHARSET: u8 = 2;
pub const OUT_DEFAULT_PRECIS: u8 = 0;
pub const CLIP_DEFAULT_PRECIS: u8 = 0;
pub const DEFAULT_QUALITY: u8 = 0;
pub const DEFAULT_PITCH: u8 = 0;
pub const FF_DONTCARE: u8 = 0;

/// Face names are stored as exactly this many bytes, null padded
pub const LF_FACESIZE: usize = 32;
