//! Windows Metafile (WMF) codec
//!
//! Parses placeable WMF byte streams into typed records and writes record
//! lists back out, recomputing header sizes, bounds and the object count.
//! Python bindings are available behind the `python` feature.

pub mod constants;
pub mod dc;
pub mod error;
pub mod field;
pub mod handles;
pub mod metafile;
pub mod options;
pub mod record;
pub mod records;
pub mod schema;
pub mod stream;
pub mod types;

#[cfg(feature = "python")]
mod python;

pub use error::{WmfError, WmfResult};
pub use metafile::Metafile;
pub use options::{MetafileOptions, Units};
pub use record::{HandleRole, Record};
pub use records::FontSpec;
pub use stream::is_wmf_format;
pub use types::{rgb, Bounds, Point};

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module for WMF encoding/decoding
#[cfg(feature = "python")]
#[pymodule]
fn wmf_codec(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<python::PyMetafile>()?;
    Ok(())
}
