//! Binary per-element property sidecar
//!
//! Beam workflows write an `orientations.prop` file next to the deck so
//! the result viewer can recover each element's local frame without
//! re-deriving it. Wire format: little-endian record count (i32), then
//! per record an i32 element tag and the six f64 components of the local
//! X and Y axes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Vector3;
use tracing::info;

use crate::error::CalxResult;
use crate::model::Frame;

#[derive(Debug, Clone)]
pub struct OrientationRecord {
    pub element: i32,
    pub x_axis: Vector3<f64>,
    pub y_axis: Vector3<f64>,
}

/// Collection of per-element orientation records.
#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    records: Vec<OrientationRecord>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, element: i32, x_axis: Vector3<f64>, y_axis: Vector3<f64>) -> &mut Self {
        self.records.push(OrientationRecord {
            element,
            x_axis,
            y_axis,
        });
        self
    }

    pub fn add_frame(&mut self, element: i32, frame: &Frame) -> &mut Self {
        self.add(element, frame.x_axis, frame.y_axis)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> CalxResult<()> {
        writer.write_all(&(self.records.len() as i32).to_le_bytes())?;
        for record in &self.records {
            writer.write_all(&record.element.to_le_bytes())?;
            for axis in [&record.x_axis, &record.y_axis] {
                writer.write_all(&axis.x.to_le_bytes())?;
                writer.write_all(&axis.y.to_le_bytes())?;
                writer.write_all(&axis.z.to_le_bytes())?;
            }
        }
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> CalxResult<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        info!(
            path = %path.as_ref().display(),
            records = self.records.len(),
            "wrote property map"
        );
        Ok(())
    }
}
