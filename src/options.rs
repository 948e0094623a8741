//! Canvas options for new metafiles

use crate::error::{WmfError, WmfResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unit of the canvas width and height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Units {
    #[serde(rename = "in")]
    Inches,
    #[serde(rename = "mm")]
    Millimeters,
}

impl Units {
    pub const MM_PER_INCH: f64 = 25.4;

    pub fn per_inch(self) -> f64 {
        match self {
            Units::Inches => 1.0,
            Units::Millimeters => Self::MM_PER_INCH,
        }
    }
}

impl FromStr for Units {
    type Err = WmfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Units::Inches),
            "mm" => Ok(Units::Millimeters),
            other => Err(WmfError::InvalidOptions(format!(
                "unknown units '{}', expected 'in' or 'mm'",
                other
            ))),
        }
    }
}

/// Physical canvas size and resolution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetafileOptions {
    pub width: f64,
    pub height: f64,
    /// Addressable pixels per unit
    pub density: u32,
    pub units: Units,
}

impl Default for MetafileOptions {
    fn default() -> Self {
        Self {
            width: 6.0,
            height: 4.0,
            density: 300,
            units: Units::Inches,
        }
    }
}

impl MetafileOptions {
    pub fn new(width: f64, height: f64, density: u32, units: Units) -> Self {
        Self {
            width,
            height,
            density,
            units,
        }
    }

    /// Parse and validate a JSON object; missing keys keep their defaults
    pub fn from_json(json: &str) -> WmfResult<Self> {
        let options: MetafileOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> WmfResult<()> {
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(WmfError::InvalidOptions(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if self.density == 0 {
            return Err(WmfError::InvalidOptions("density must be non-zero".into()));
        }
        // Placeable bounds are unsigned 16-bit
        let (width, height) = self.pixel_size();
        if width > u16::MAX as i32 || height > u16::MAX as i32 {
            return Err(WmfError::InvalidOptions(format!(
                "canvas of {}x{} units exceeds {}",
                width,
                height,
                u16::MAX
            )));
        }
        Ok(())
    }

    /// Canvas size in pixels
    pub fn pixel_size(&self) -> (i32, i32) {
        let density = self.density as f64;
        (
            (self.width * density).round() as i32,
            (self.height * density).round() as i32,
        )
    }

    /// Pixels per inch
    pub fn dpi(&self) -> f64 {
        self.density as f64 * self.units.per_inch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = MetafileOptions::default();
        assert_eq!(options.pixel_size(), (1800, 1200));
        assert_eq!(options.dpi(), 300.0);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let options = MetafileOptions::from_json(r#"{"width": 8, "height": 6}"#).unwrap();
        assert_eq!(options.width, 8.0);
        assert_eq!(options.density, 300);
        assert_eq!(options.units, Units::Inches);

        let options = MetafileOptions::from_json(r#"{"units": "mm", "density": 10}"#).unwrap();
        assert_eq!(options.units, Units::Millimeters);
        assert!((options.dpi() - 254.0).abs() < 1e-9);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(
            MetafileOptions::from_json(r#"{"width": 0}"#),
            Err(WmfError::InvalidOptions(_))
        ));
        assert!(matches!(
            MetafileOptions::from_json(r#"{"density": 0}"#),
            Err(WmfError::InvalidOptions(_))
        ));
        assert!(matches!(
            MetafileOptions::from_json(r#"{"units": "cm"}"#),
            Err(WmfError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_canvas_size_limit() {
        let a3 = MetafileOptions::new(420.0, 297.0, 100, Units::Millimeters);
        assert_eq!(a3.pixel_size(), (42000, 29700));
        assert!(a3.validate().is_ok());

        let wide = MetafileOptions::new(300.0, 4.0, 300, Units::Inches);
        assert!(matches!(wide.validate(), Err(WmfError::InvalidOptions(_))));
        assert!(MetafileOptions::new(218.45, 1.0, 300, Units::Inches)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_units_from_str() {
        assert_eq!("mm".parse::<Units>().unwrap(), Units::Millimeters);
        assert!("px".parse::<Units>().is_err());
    }
}
