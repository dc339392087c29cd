use crate::{error::BrewError, timeline::{Timeline, TimelinePoint}};
use csv::Writer;
use serde::Serialize;
use std::{fs, io, path::Path};

#[derive(Debug, Serialize)]
struct TimelineRow<'a> {
    time_s: f64,
    water_g: f64,
    label: &'a str,
}

impl<'a> From<&'a TimelinePoint> for TimelineRow<'a> {
    fn from(point: &'a TimelinePoint) -> Self {
        Self {
            time_s: point.time,
            water_g: point.water,
            label: &point.label,
        }
    }
}

/// Writes timeline samples as `time_s,water_g,label` rows, flushing after each one.
pub struct TimelineWriter<W: io::Write> {
    writer: Writer<W>,
    target: String,
}

impl TimelineWriter<fs::File> {
    pub fn create(path: &Path) -> Result<Self, BrewError> {
        let target = path.display().to_string();
        let writer = Writer::from_path(path).map_err(|e| BrewError::CsvError(target.clone(), e))?;
        Ok(Self { writer, target })
    }
}

impl<W: io::Write> TimelineWriter<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: Writer::from_writer(inner),
            target: "<stream>".to_string(),
        }
    }

    pub fn write_point(&mut self, point: &TimelinePoint) -> Result<(), BrewError> {
        self.writer
            .serialize(TimelineRow::from(point))
            .map_err(|e| BrewError::CsvError(self.target.clone(), e))?;
        self.writer
            .flush()
            .map_err(|e| BrewError::FileIO(self.target.clone(), e))
    }

    /// Writes every point and returns how many rows were written.
    pub fn write_timeline(&mut self, timeline: &Timeline) -> Result<usize, BrewError> {
        for point in timeline {
            self.write_point(point)?;
        }
        Ok(timeline.len())
    }

    pub fn into_inner(self) -> Result<W, BrewError> {
        let target = self.target;
        self.writer
            .into_inner()
            .map_err(|e| BrewError::FileIO(target, e.into_error()))
    }
}
