// Span output: the horizontal-span primitive the sweep draws through,
// plus two in-crate surfaces (a recorder and an R8 mask).

use std::ops::Range;

/// One horizontal fill run on a raster line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub y: usize,
    pub x_enter: i32,
    pub x_exit: i32,
    pub color: u8,
}

impl Span {
    /// Pixel count. A span whose ends coincide (a local extremum vertex)
    /// still covers one pixel.
    pub fn width(&self) -> i32 {
        self.x_exit.saturating_sub(self.x_enter).max(1)
    }

    /// Covered pixel columns, `x_exit` exclusive.
    pub fn pixels(&self) -> Range<i32> {
        self.x_enter..self.x_enter.saturating_add(self.width())
    }
}

/// Host-supplied "draw horizontal span" operation.
///
/// Called synchronously, in increasing line order and increasing `x_enter`
/// within a line.
pub trait SpanSink {
    fn draw_span(&mut self, span: Span);
}

impl<F: FnMut(Span)> SpanSink for F {
    fn draw_span(&mut self, span: Span) {
        self(span)
    }
}

/// Collects spans in call order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SpanRecorder {
    spans: Vec<Span>,
}

impl SpanRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn into_spans(self) -> Vec<Span> {
        self.spans
    }

    /// Spans recorded for one raster line.
    pub fn spans_on(&self, line: usize) -> Vec<Span> {
        self.spans.iter().copied().filter(|s| s.y == line).collect()
    }

    pub fn clear(&mut self) {
        self.spans.clear();
    }
}

impl SpanSink for SpanRecorder {
    fn draw_span(&mut self, span: Span) {
        self.spans.push(span);
    }
}

/// Row-major R8 mask; spans are clipped to its bounds.
#[derive(Debug, Clone)]
pub struct MaskSurface {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl MaskSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Value at `(x, y)`, or `None` outside the mask.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }
}

impl SpanSink for MaskSurface {
    fn draw_span(&mut self, span: Span) {
        if span.y >= self.height {
            return;
        }
        let pixels = span.pixels();
        let start = pixels.start.max(0) as usize;
        let end = (pixels.end.max(0) as usize).min(self.width);
        if start >= end {
            return;
        }
        let row = span.y * self.width;
        self.data[row + start..row + end].fill(span.color);
    }
}
