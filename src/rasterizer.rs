// Rasterizer module: active-edge-table scanline fill

use log::{debug, trace, warn};

use crate::active::ActiveEdgeTable;
use crate::edge::{Edge, EdgeTable, Point, RasterLimits};
use crate::error::FillError;
use crate::surface::{Span, SpanSink};

/// Counters for one complete sweep.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    /// Raster lines visited (always the full table height on success).
    pub lines: usize,
    /// Spans handed to the sink.
    pub spans: usize,
    /// Largest active edge count seen on any line.
    pub peak_active: usize,
    /// Coincident boundaries folded into one by the pass-through rule.
    pub merged: usize,
    /// Boundaries left without a partner after merging, not drawn.
    pub dangling: usize,
}

/// Scanline polygon filler.
///
/// Owns the edge table of the current polygon and the active edge table used
/// while sweeping. The edge table is built once per polygon and reused by
/// every [`fill_frame`](Self::fill_frame) call; the active table starts and
/// ends every sweep empty.
#[derive(Debug, Clone)]
pub struct ScanlineRasterizer {
    table: EdgeTable,
    active: ActiveEdgeTable,
}

impl ScanlineRasterizer {
    /// A rasterizer with no polygon loaded.
    pub fn new(limits: RasterLimits) -> Self {
        Self::with_table(EdgeTable::new(limits))
    }

    /// Wraps an already built edge table.
    pub fn with_table(table: EdgeTable) -> Self {
        Self {
            table,
            active: ActiveEdgeTable::new(),
        }
    }

    /// Rebuilds the edge table for a new closed vertex loop.
    pub fn set_polygon(&mut self, points: &[Point]) -> Result<(), FillError> {
        self.active.clear();
        self.table.rebuild(points)
    }

    pub fn edge_table(&self) -> &EdgeTable {
        &self.table
    }

    pub fn limits(&self) -> RasterLimits {
        self.table.limits()
    }

    /// Edges still active; zero between sweeps.
    pub fn active_edge_count(&self) -> usize {
        self.active.len()
    }

    /// Runs one sweep over every raster line, drawing spans in `color`.
    ///
    /// Per line: activate edges starting here, evict edges ending here, sort,
    /// pair intercepts into spans, then step the survivors. A line holding an
    /// odd number of active edges aborts the sweep with
    /// [`FillError::InconsistentState`]; spans of earlier lines have already
    /// been drawn by then.
    pub fn fill_frame(&mut self, sink: &mut dyn SpanSink, color: u8) -> Result<FrameStats, FillError> {
        self.active.clear();
        let mut stats = FrameStats::default();

        for line in 0..self.table.max_height() {
            self.active.activate(self.table.row(line));
            self.active.evict(line as i32);
            self.active.sort();

            let active = self.active.len();
            if active % 2 != 0 {
                self.active.clear();
                return Err(FillError::InconsistentState { line, active });
            }
            stats.peak_active = stats.peak_active.max(active);

            let paired = pair_spans(self.active.edges(), line, color, sink);
            stats.spans += paired.spans;
            stats.merged += paired.merged;
            stats.dangling += paired.dangling;

            self.active.advance();
            stats.lines += 1;
        }

        if !self.active.is_empty() {
            let active = self.active.len();
            self.active.clear();
            return Err(FillError::InconsistentState {
                line: self.table.max_height(),
                active,
            });
        }

        debug!(
            "sweep done: {} lines, {} spans, peak {} active edges",
            stats.lines, stats.spans, stats.peak_active
        );
        Ok(stats)
    }
}

/// Integer crossing point of one active edge on the current line.
#[derive(Debug, Clone, Copy)]
struct Boundary {
    x: i32,
    y_top: i32,
}

impl Boundary {
    fn of(edge: &Edge) -> Self {
        Self {
            x: edge.scan_x(),
            y_top: edge.y_top,
        }
    }

    /// The "ending" test of the coincidence heuristic: intercept equal to the top line.
    fn at_top(&self) -> bool {
        self.x == self.y_top
    }

    /// Two coincident boundaries where exactly one is ending count as a single
    /// pass-through point.
    fn passes_through(&self, other: &Boundary) -> bool {
        self.x == other.x && self.at_top() != other.at_top()
    }
}

#[derive(Debug, Default)]
struct Paired {
    spans: usize,
    merged: usize,
    dangling: usize,
}

/// Walks a sorted active edge list left to right, pairing intercepts into spans.
fn pair_spans(edges: &[Edge], line: usize, color: u8, sink: &mut dyn SpanSink) -> Paired {
    let mut paired = Paired::default();
    let mut entry: Option<Boundary> = None;
    let mut last_exit: Option<Boundary> = None;

    for edge in edges {
        let b = Boundary::of(edge);
        match entry {
            None => {
                if let Some(exit) = last_exit {
                    if exit.passes_through(&b) {
                        trace!("line {}: boundary at x={} folded into previous exit", line, b.x);
                        last_exit = Some(b);
                        paired.merged += 1;
                        continue;
                    }
                }
                entry = Some(b);
            }
            Some(open) => {
                if open.passes_through(&b) {
                    trace!("line {}: boundary at x={} folded into open entry", line, b.x);
                    entry = Some(b);
                    paired.merged += 1;
                    continue;
                }
                sink.draw_span(Span {
                    y: line,
                    x_enter: open.x,
                    x_exit: b.x,
                    color,
                });
                paired.spans += 1;
                last_exit = Some(b);
                entry = None;
            }
        }
    }

    if let Some(open) = entry {
        warn!("line {}: boundary at x={} left unpaired, not drawn", line, open.x);
        paired.dangling += 1;
    }
    paired
}
