//! API facade module
//!
//! Ties the ingestion adapter, the coordinate transform and the scanline
//! rasterizer together behind one configurable object.

use std::path::Path;

use log::debug;

use crate::edge::{EdgeTable, Point, RasterLimits, MAX_EDGES, MAX_LINES};
use crate::error::FillError;
use crate::formats::{load_vertices, FormatError};
use crate::rasterizer::{FrameStats, ScanlineRasterizer};
use crate::surface::{MaskSurface, Span, SpanRecorder, SpanSink};

/// Direction of the input y axis relative to raster lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YAxis {
    /// Input y is the raster line.
    #[default]
    Down,
    /// Input y grows upwards; line = `max_height - y`.
    Up,
}

/// Builder configuration for PolygonFiller
#[derive(Debug, Clone)]
pub struct PolygonFillerBuilder {
    max_height: usize,   // Default: 800, Range: 1-65536
    max_vertices: usize, // Default: 1000, Range: 3-1000000
    y_axis: YAxis,       // Default: Down
    fill_value: u8,      // Default: 255
}

impl Default for PolygonFillerBuilder {
    fn default() -> Self {
        let limits = RasterLimits::default();
        Self {
            max_height: limits.max_height,
            max_vertices: limits.max_edges,
            y_axis: YAxis::Down,
            fill_value: 255,
        }
    }
}

impl PolygonFillerBuilder {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn max_height(mut self, lines: usize) -> Self {
        self.max_height = lines.clamp(1, MAX_LINES);
        self
    }
    pub fn max_vertices(mut self, vertices: usize) -> Self {
        self.max_vertices = vertices.clamp(3, MAX_EDGES);
        self
    }
    pub fn y_axis(mut self, axis: YAxis) -> Self {
        self.y_axis = axis;
        self
    }
    pub fn fill_value(mut self, value: u8) -> Self {
        self.fill_value = value;
        self
    }
    /// Limits the built filler will enforce.
    pub fn limits(&self) -> RasterLimits {
        RasterLimits::new(self.max_height, self.max_vertices)
    }
    pub fn build(self) -> PolygonFiller {
        PolygonFiller {
            rasterizer: ScanlineRasterizer::new(self.limits()),
            y_axis: self.y_axis,
            fill_value: self.fill_value,
        }
    }
}

/// High-level polygon filler
///
/// Holds one polygon at a time. Loading a new polygon rebuilds the edge
/// table; every fill call afterwards sweeps the same table.
#[derive(Debug, Clone)]
pub struct PolygonFiller {
    rasterizer: ScanlineRasterizer,
    y_axis: YAxis,
    fill_value: u8,
}

impl Default for PolygonFiller {
    fn default() -> Self {
        PolygonFillerBuilder::default().build()
    }
}

impl PolygonFiller {
    pub fn builder() -> PolygonFillerBuilder {
        PolygonFillerBuilder::new()
    }

    pub fn limits(&self) -> RasterLimits {
        self.rasterizer.limits()
    }
    pub fn y_axis(&self) -> YAxis {
        self.y_axis
    }
    pub fn fill_value(&self) -> u8 {
        self.fill_value
    }
    pub fn edge_table(&self) -> &EdgeTable {
        self.rasterizer.edge_table()
    }
    pub fn edge_count(&self) -> usize {
        self.rasterizer.edge_table().len()
    }
    /// Active edges left over; zero whenever no sweep is running.
    pub fn active_edge_count(&self) -> usize {
        self.rasterizer.active_edge_count()
    }

    fn to_raster(&self, (x, y): Point) -> Result<Point, FillError> {
        match self.y_axis {
            YAxis::Down => Ok((x, y)),
            YAxis::Up => {
                let max_height = self.limits().max_height;
                i32::try_from(max_height)
                    .ok()
                    .and_then(|top| top.checked_sub(y))
                    .map(|line| (x, line))
                    .ok_or(FillError::VertexOutOfRange { x, y, max_height })
            }
        }
    }

    /// Replaces the current polygon. Coordinates are transformed by the
    /// configured [`YAxis`] before range checking. On error no polygon is
    /// left loaded.
    pub fn set_polygon(&mut self, points: &[Point]) -> Result<(), FillError> {
        let raster = match points.iter().map(|&p| self.to_raster(p)).collect::<Result<Vec<_>, _>>() {
            Ok(raster) => raster,
            Err(e) => {
                self.rasterizer.set_polygon(&[])?;
                return Err(e);
            }
        };
        self.rasterizer.set_polygon(&raster)?;
        debug!("polygon set: {} vertices, {} edges", points.len(), self.edge_count());
        Ok(())
    }

    /// Loads the polygon from a vertex file. Returns the vertex count.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, FormatError> {
        let points = load_vertices(path.as_ref())?;
        self.set_polygon(&points)?;
        Ok(points.len())
    }

    /// Sweeps the current polygon once, drawing through `sink`.
    pub fn fill_frame(&mut self, sink: &mut dyn SpanSink) -> Result<FrameStats, FillError> {
        self.rasterizer.fill_frame(sink, self.fill_value)
    }

    /// One frame's spans, in draw order.
    pub fn spans(&mut self) -> Result<Vec<Span>, FillError> {
        let mut recorder = SpanRecorder::new();
        self.fill_frame(&mut recorder)?;
        Ok(recorder.into_spans())
    }

    /// Clears `mask` and fills the polygon into it.
    pub fn render_into(&mut self, mask: &mut MaskSurface) -> Result<FrameStats, FillError> {
        mask.clear();
        self.fill_frame(mask)
    }

    /// Renders an R8 mask of `width * max_height` bytes.
    pub fn render_mask(&mut self, width: usize) -> Result<Vec<u8>, FillError> {
        let mut mask = MaskSurface::new(width, self.limits().max_height);
        self.fill_frame(&mut mask)?;
        Ok(mask.into_inner())
    }
}
