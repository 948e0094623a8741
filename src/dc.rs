//! Device context: canvas bounds and resolution behind the placeable header

use crate::error::{WmfError, WmfResult};
use crate::field::Value;
use crate::options::MetafileOptions;
use crate::record::Record;
use crate::types::{Bounds, Point};
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceContext {
    /// Canvas rectangle in logical units
    bounds: Bounds,
    /// Logical units per inch
    inch: u16,
}

impl DeviceContext {
    pub fn new(options: &MetafileOptions) -> Self {
        let (width, height) = options.pixel_size();
        let inch = options.dpi().round().clamp(1.0, u16::MAX as f64) as u16;
        Self {
            bounds: Bounds::new(0, 0, width, height),
            inch,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn units_per_inch(&self) -> u16 {
        self.inch
    }

    /// Take bounds and resolution from a decoded placeable header
    pub fn hydrate(&mut self, placeable: &Record) -> WmfResult<()> {
        let missing = |field| WmfError::MissingField {
            record: placeable.name(),
            field,
        };
        let corners = placeable.points("bounds").ok_or_else(|| missing("bounds"))?;
        let inch = placeable.int("inch").ok_or_else(|| missing("inch"))?;
        if let [top_left, bottom_right] = corners {
            self.bounds = Bounds::new(top_left.x, top_left.y, bottom_right.x, bottom_right.y);
        }
        self.inch = inch as u16;
        debug!(
            "Device context from placeable header: {:?} at {} units/inch",
            self.bounds, self.inch
        );
        Ok(())
    }

    /// Write bounds, resolution and checksum into a placeable header
    pub fn stamp_placeable(&self, placeable: &mut Record) -> WmfResult<()> {
        placeable.set(
            "bounds",
            Value::Points(vec![
                Point::new(self.bounds.left, self.bounds.top),
                Point::new(self.bounds.right, self.bounds.bottom),
            ]),
        );
        placeable.set_int("inch", self.inch as i64);
        placeable.set_int("checksum", 0);
        let body = placeable.encode_body()?;
        placeable.set_int("checksum", placeable_checksum(&body) as i64);
        Ok(())
    }
}

/// XOR of the ten 16-bit words preceding the checksum field
pub fn placeable_checksum(header: &[u8]) -> u16 {
    header
        .chunks_exact(2)
        .take(10)
        .fold(0, |acc, w| acc ^ u16::from_le_bytes([w[0], w[1]]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PLACEABLE_KEY;
    use crate::options::Units;
    use crate::records::PLACEABLE;

    #[test]
    fn test_from_options() {
        let dc = DeviceContext::new(&MetafileOptions::new(8.0, 6.0, 300, Units::Inches));
        assert_eq!(dc.bounds(), Bounds::new(0, 0, 2400, 1800));
        assert_eq!(dc.units_per_inch(), 300);

        let dc = DeviceContext::new(&MetafileOptions::new(100.0, 50.0, 10, Units::Millimeters));
        assert_eq!(dc.bounds(), Bounds::new(0, 0, 1000, 500));
        assert_eq!(dc.units_per_inch(), 254);
    }

    #[test]
    fn test_stamp_and_hydrate() {
        let dc = DeviceContext::new(&MetafileOptions::new(8.0, 6.0, 300, Units::Inches));
        let mut placeable = Record::new(&PLACEABLE);
        dc.stamp_placeable(&mut placeable).unwrap();

        let key = PLACEABLE_KEY;
        let expected = (key as u16) ^ ((key >> 16) as u16) ^ 2400 ^ 1800 ^ 300;
        assert_eq!(placeable.int("checksum"), Some(expected as i64));

        let mut other = DeviceContext::new(&MetafileOptions::default());
        other.hydrate(&placeable).unwrap();
        assert_eq!(other, dc);
    }

    #[test]
    fn test_checksum_ignores_trailing_words() {
        let mut header = vec![0u8; 22];
        header[0] = 0x01;
        header[20] = 0xFF;
        assert_eq!(placeable_checksum(&header), 1);
    }
}
