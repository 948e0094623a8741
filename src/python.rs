//! Python bindings
//!
//! Exposes [`Metafile`] as the `WMF` class with the GDI-style method names
//! Python callers expect.

use crate::constants::FW_NORMAL;
use crate::metafile::Metafile;
use crate::options::{MetafileOptions, Units};
use crate::records::FontSpec;
use crate::types::Point;
use pyo3::prelude::*;
use pyo3::types::PyBytes;

fn to_points(points: Vec<(i32, i32)>) -> Vec<Point> {
    points.into_iter().map(Point::from).collect()
}

/// In-memory Windows Metafile
#[pyclass(name = "WMF")]
pub struct PyMetafile {
    inner: Metafile,
}

#[pymethods]
impl PyMetafile {
    #[new]
    #[pyo3(signature = (width=6.0, height=4.0, density=300, units="in"))]
    fn new(width: f64, height: f64, density: u32, units: &str) -> PyResult<Self> {
        let units: Units = units.parse()?;
        let inner = Metafile::new(MetafileOptions::new(width, height, density, units))?;
        Ok(Self { inner })
    }

    /// Replace the contents with the metafile at `filename`
    fn load(&mut self, filename: String) -> PyResult<bool> {
        self.inner = Metafile::load(filename)?;
        Ok(true)
    }

    /// Replace the contents with a metafile held in memory
    fn loadmem(&mut self, data: &PyBytes) -> PyResult<bool> {
        self.inner = Metafile::from_bytes(data.as_bytes())?;
        Ok(true)
    }

    fn save(&mut self, filename: String) -> PyResult<bool> {
        self.inner.save(filename)?;
        Ok(true)
    }

    fn to_bytes(&mut self, py: Python<'_>) -> PyResult<PyObject> {
        let bytes = self.inner.to_bytes()?;
        Ok(PyBytes::new(py, &bytes).into())
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    #[pyo3(name = "CreatePen")]
    fn create_pen(&mut self, style: u16, width: u16, color: u32) -> PyResult<Option<u16>> {
        Ok(self.inner.create_pen(style, width, color)?)
    }

    #[pyo3(name = "CreateSolidBrush")]
    fn create_solid_brush(&mut self, color: u32) -> PyResult<Option<u16>> {
        Ok(self.inner.create_solid_brush(color)?)
    }

    #[pyo3(name = "CreateHatchBrush")]
    fn create_hatch_brush(&mut self, hatch: u16, color: u32) -> PyResult<Option<u16>> {
        Ok(self.inner.create_hatch_brush(hatch, color)?)
    }

    #[pyo3(
        name = "CreateFont",
        signature = (
            height,
            width=0,
            escapement=0,
            orientation=0,
            weight=FW_NORMAL,
            italic=false,
            underline=false,
            strike_out=false,
            charset=0,
            out_precision=0,
            clip_precision=0,
            quality=0,
            pitch_family=0,
            name="Times New Roman"
        )
    )]
    #[allow(clippy::too_many_arguments)]
    fn create_font(
        &mut self,
        height: i16,
        width: i16,
        escapement: i16,
        orientation: i16,
        weight: i16,
        italic: bool,
        underline: bool,
        strike_out: bool,
        charset: u8,
        out_precision: u8,
        clip_precision: u8,
        quality: u8,
        pitch_family: u8,
        name: &str,
    ) -> PyResult<Option<u16>> {
        let font = FontSpec {
            height,
            width,
            escapement,
            orientation,
            weight,
            italic,
            underline,
            strike_out,
            charset,
            out_precision,
            clip_precision,
            quality,
            pitch_and_family: pitch_family,
            face_name: name.to_string(),
        };
        Ok(self.inner.create_font(&font)?)
    }

    #[pyo3(name = "SelectObject")]
    fn select_object(&mut self, handle: u16) -> PyResult<bool> {
        Ok(self.inner.select_object(handle)?)
    }

    #[pyo3(name = "DeleteObject")]
    fn delete_object(&mut self, handle: u16) -> PyResult<bool> {
        Ok(self.inner.delete_object(handle)?)
    }

    #[pyo3(name = "SetBkMode")]
    fn set_bk_mode(&mut self, mode: u16) -> bool {
        self.inner.set_bk_mode(mode)
    }

    #[pyo3(name = "SetMapMode")]
    fn set_map_mode(&mut self, mode: u16) -> bool {
        self.inner.set_map_mode(mode)
    }

    #[pyo3(name = "SetPolyFillMode")]
    fn set_poly_fill_mode(&mut self, mode: u16) -> bool {
        self.inner.set_poly_fill_mode(mode)
    }

    #[pyo3(name = "SetBkColor")]
    fn set_bk_color(&mut self, color: u32) -> bool {
        self.inner.set_bk_color(color)
    }

    #[pyo3(name = "SetTextColor")]
    fn set_text_color(&mut self, color: u32) -> bool {
        self.inner.set_text_color(color)
    }

    #[pyo3(name = "SetWindowOrgEx")]
    fn set_window_org(&mut self, x: i32, y: i32) -> bool {
        self.inner.set_window_org(x, y)
    }

    #[pyo3(name = "SetWindowExtEx")]
    fn set_window_ext(&mut self, cx: i32, cy: i32) -> bool {
        self.inner.set_window_ext(cx, cy)
    }

    #[pyo3(name = "SetViewportOrgEx")]
    fn set_viewport_org(&mut self, x: i32, y: i32) -> bool {
        self.inner.set_viewport_org(x, y)
    }

    #[pyo3(name = "SetViewportExtEx")]
    fn set_viewport_ext(&mut self, cx: i32, cy: i32) -> bool {
        self.inner.set_viewport_ext(cx, cy)
    }

    #[pyo3(name = "Polyline")]
    fn polyline(&mut self, points: Vec<(i32, i32)>) -> bool {
        self.inner.polyline(&to_points(points))
    }

    #[pyo3(name = "Polygon")]
    fn polygon(&mut self, points: Vec<(i32, i32)>) -> bool {
        self.inner.polygon(&to_points(points))
    }

    #[pyo3(name = "SetPixel")]
    fn set_pixel(&mut self, x: i32, y: i32, color: u32) -> bool {
        self.inner.set_pixel(x, y, color)
    }

    #[pyo3(name = "MoveTo")]
    fn move_to(&mut self, x: i32, y: i32) -> bool {
        self.inner.move_to(x, y)
    }

    #[pyo3(name = "LineTo")]
    fn line_to(&mut self, x: i32, y: i32) -> bool {
        self.inner.line_to(x, y)
    }

    #[pyo3(name = "Rectangle")]
    fn rectangle(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> bool {
        self.inner.rectangle(left, top, right, bottom)
    }

    #[pyo3(name = "Ellipse")]
    fn ellipse(&mut self, left: i32, top: i32, right: i32, bottom: i32) -> bool {
        self.inner.ellipse(left, top, right, bottom)
    }

    #[pyo3(name = "TextOut")]
    fn text_out(&mut self, x: i32, y: i32, text: &str) -> bool {
        self.inner.text_out(x, y, text)
    }
}
