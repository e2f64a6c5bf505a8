//! Edge table (ET) construction
//!
//! The ET is an arena of [`Edge`] records grouped by the raster line of their
//! lower endpoint, plus a row-offset index into that arena. Within a row the
//! edges are ascending by x, ties kept in insertion order. The table is built
//! once per polygon and only read by the sweep afterwards.

use log::debug;

use crate::error::FillError;

/// An integer polygon vertex `(x, y)`, y counted in raster lines.
pub type Point = (i32, i32);

/// Most raster lines a table may cover.
pub const MAX_LINES: usize = 65_536;
/// Most edges (and loop vertices) a table may hold.
pub const MAX_EDGES: usize = 1_000_000;

/// One non-horizontal polygon boundary segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Upper endpoint line; the edge takes part in lines `[y_low, y_top)`.
    pub y_top: i32,
    /// x-intercept on the line currently being scanned.
    pub x_at_scan: f64,
    /// dx/dy of the segment.
    pub inverse_slope: f64,
    x_low: i64,
    dx: i64,
    dy: i64,
    steps: i64,
}

impl Edge {
    /// Builds the edge joining two vertices, or `None` for a horizontal pair.
    /// Returns the origin line together with the edge.
    pub fn between(from: Point, to: Point) -> Option<(usize, Edge)> {
        if from.1 == to.1 {
            return None;
        }
        let ((x_low, y_low), (x_top, y_top)) = if from.1 < to.1 { (from, to) } else { (to, from) };
        // widened: x is not range-checked, so the difference may not fit i32
        let dx = x_top as i64 - x_low as i64;
        let dy = y_top as i64 - y_low as i64;
        Some((
            y_low as usize,
            Edge {
                y_top,
                x_at_scan: x_low as f64,
                inverse_slope: dx as f64 / dy as f64,
                x_low: x_low as i64,
                dx,
                dy,
                steps: 0,
            },
        ))
    }

    /// Steps the intercept to the next line.
    ///
    /// The intercept is recomputed from the lower endpoint as one division
    /// of exact integers, so rounding never builds up along tall edges and
    /// [`scan_x`](Self::scan_x) matches exact integer interpolation.
    pub fn advance(&mut self) {
        self.steps += 1;
        let numerator = self.x_low as i128 * self.dy as i128 + self.dx as i128 * self.steps as i128;
        self.x_at_scan = numerator as f64 / self.dy as f64;
    }

    /// Integer x used for span pairing (truncated toward zero).
    pub fn scan_x(&self) -> i32 {
        self.x_at_scan as i32
    }
}

/// Fixed upper bounds enforced while building an edge table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterLimits {
    /// Number of raster lines; vertex y must lie in `0..max_height`.
    pub max_height: usize,
    /// Maximum number of polygon vertices, and therefore of stored edges.
    pub max_edges: usize,
}

impl Default for RasterLimits {
    fn default() -> Self {
        Self {
            max_height: 800,
            max_edges: 1000,
        }
    }
}

impl RasterLimits {
    /// Clamps `max_height` to `1..=MAX_LINES` and `max_edges` to `MAX_EDGES`.
    pub fn new(max_height: usize, max_edges: usize) -> Self {
        Self {
            max_height: max_height.clamp(1, MAX_LINES),
            max_edges: max_edges.min(MAX_EDGES),
        }
    }

    fn check_vertex(&self, (x, y): Point) -> Result<(), FillError> {
        if y < 0 || y as usize >= self.max_height {
            return Err(FillError::VertexOutOfRange {
                x,
                y,
                max_height: self.max_height,
            });
        }
        Ok(())
    }
}

/// Collects edges one vertex pair at a time, then freezes them into an [`EdgeTable`].
#[derive(Debug)]
pub struct EdgeTableBuilder {
    limits: RasterLimits,
    pending: Vec<(usize, Edge)>,
}

impl EdgeTableBuilder {
    pub fn new(limits: RasterLimits) -> Self {
        Self {
            // fields are public, so re-clamp values built by hand
            limits: RasterLimits::new(limits.max_height, limits.max_edges),
            pending: Vec::new(),
        }
    }

    /// Adds the edge `from -> to`.
    ///
    /// Returns `Ok(false)` when the pair is horizontal and therefore discarded.
    /// Both endpoints are range-checked even when the edge is discarded.
    pub fn add_edge(&mut self, from: Point, to: Point) -> Result<bool, FillError> {
        self.limits.check_vertex(from)?;
        self.limits.check_vertex(to)?;
        let Some((line, edge)) = Edge::between(from, to) else {
            return Ok(false);
        };
        if self.pending.len() >= self.limits.max_edges {
            return Err(FillError::CapacityExceeded {
                limit: self.limits.max_edges,
                requested: self.pending.len() + 1,
            });
        }
        self.pending.push((line, edge));
        Ok(true)
    }

    /// Number of edges accepted so far.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Groups the edges by origin line, ascending x within a line.
    pub fn build(mut self) -> EdgeTable {
        // sort_by is stable: equal x keeps insertion order
        self.pending.sort_by(|(la, a), (lb, b)| {
            la.cmp(lb).then(a.x_at_scan.total_cmp(&b.x_at_scan))
        });

        let mut row_offsets = vec![0usize; self.limits.max_height + 1];
        for (line, _) in &self.pending {
            row_offsets[line + 1] += 1;
        }
        for i in 1..row_offsets.len() {
            row_offsets[i] += row_offsets[i - 1];
        }
        let edges = self.pending.into_iter().map(|(_, e)| e).collect();

        EdgeTable {
            limits: self.limits,
            edges,
            row_offsets,
        }
    }
}

/// Per-line index of polygon edges, keyed by the line of their lower endpoint.
#[derive(Debug, Clone)]
pub struct EdgeTable {
    limits: RasterLimits,
    edges: Vec<Edge>,
    row_offsets: Vec<usize>,
}

impl EdgeTable {
    /// An empty table for the given limits.
    pub fn new(limits: RasterLimits) -> Self {
        EdgeTableBuilder::new(limits).build()
    }

    /// Builds the table for a closed vertex loop; the last vertex connects
    /// back to the first.
    pub fn from_polygon(points: &[Point], limits: RasterLimits) -> Result<Self, FillError> {
        if points.len() > limits.max_edges {
            return Err(FillError::CapacityExceeded {
                limit: limits.max_edges,
                requested: points.len(),
            });
        }
        for &p in points {
            limits.check_vertex(p)?;
        }

        let mut builder = EdgeTableBuilder::new(limits);
        if points.len() < 3 {
            debug!("polygon has {} vertices, nothing to fill", points.len());
            return Ok(builder.build());
        }
        let n = points.len();
        for i in 0..n {
            builder.add_edge(points[i], points[(i + 1) % n])?;
        }
        let table = builder.build();
        debug!(
            "edge table built: {} vertices, {} edges, {} horizontal discarded",
            n,
            table.len(),
            n - table.len()
        );
        Ok(table)
    }

    /// Replaces the contents with the edges of a new polygon.
    /// On error the table is left empty.
    pub fn rebuild(&mut self, points: &[Point]) -> Result<(), FillError> {
        match Self::from_polygon(points, self.limits) {
            Ok(table) => {
                *self = table;
                Ok(())
            }
            Err(e) => {
                *self = Self::new(self.limits);
                Err(e)
            }
        }
    }

    /// Edges originating on `line`, ascending by x. Empty outside the table.
    pub fn row(&self, line: usize) -> &[Edge] {
        if line >= self.limits.max_height {
            return &[];
        }
        &self.edges[self.row_offsets[line]..self.row_offsets[line + 1]]
    }

    /// Non-empty rows in line order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &[Edge])> + '_ {
        (0..self.limits.max_height)
            .map(move |line| (line, self.row(line)))
            .filter(|(_, row)| !row.is_empty())
    }

    /// Total number of stored edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn limits(&self) -> RasterLimits {
        self.limits
    }

    pub fn max_height(&self) -> usize {
        self.limits.max_height
    }
}
