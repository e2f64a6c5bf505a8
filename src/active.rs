//! Active edge table (AET)
//!
//! Holds the edges crossing the raster line being processed. Edges are
//! copied in from the edge table on their origin line, dropped on their
//! top line, and stepped by their inverse slope after every line.

use crate::edge::Edge;

#[derive(Debug, Default, Clone)]
pub struct ActiveEdgeTable {
    edges: Vec<Edge>,
}

impl ActiveEdgeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an edge after every edge with an x less than or equal to its own.
    pub fn insert(&mut self, edge: Edge) {
        let pos = self.edges.partition_point(|e| e.x_at_scan <= edge.x_at_scan);
        self.edges.insert(pos, edge);
    }

    /// Moves a whole edge-table row in.
    pub fn activate(&mut self, row: &[Edge]) {
        for &edge in row {
            self.insert(edge);
        }
    }

    /// Drops every edge whose top line is `line`. Returns how many were removed.
    pub fn evict(&mut self, line: i32) -> usize {
        let before = self.edges.len();
        self.edges.retain(|e| e.y_top != line);
        before - self.edges.len()
    }

    /// Stable re-sort by current x-intercept.
    pub fn sort(&mut self) {
        self.edges.sort_by(|a, b| a.x_at_scan.total_cmp(&b.x_at_scan));
    }

    /// Steps every edge to the next line.
    pub fn advance(&mut self) {
        for edge in &mut self.edges {
            edge.advance();
        }
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // edge starting on line 0 at `x`, reaching `x_top` on `y_top`
    fn edge(x: i32, y_top: i32, x_top: i32) -> Edge {
        Edge::between((x, 0), (x_top, y_top)).unwrap().1
    }

    #[test]
    fn insert_keeps_ascending_order() {
        let mut aet = ActiveEdgeTable::new();
        aet.insert(edge(20, 9, 20));
        aet.insert(edge(5, 9, 5));
        aet.insert(edge(12, 9, 30));
        let xs: Vec<f64> = aet.edges().iter().map(|e| e.x_at_scan).collect();
        assert_eq!(xs, vec![5.0, 12.0, 20.0]);
    }

    #[test]
    fn insert_places_ties_after_existing() {
        let mut aet = ActiveEdgeTable::new();
        aet.insert(edge(7, 1, 7));
        aet.insert(edge(7, 2, 7));
        aet.insert(edge(7, 3, 7));
        let tops: Vec<i32> = aet.edges().iter().map(|e| e.y_top).collect();
        assert_eq!(tops, vec![1, 2, 3]);
    }

    #[test]
    fn evict_removes_only_matching_top() {
        let mut aet = ActiveEdgeTable::new();
        aet.activate(&[edge(1, 10, 1), edge(2, 12, 2), edge(3, 10, 3)]);
        assert_eq!(aet.evict(10), 2);
        assert_eq!(aet.len(), 1);
        assert_eq!(aet.edges()[0].y_top, 12);
        assert_eq!(aet.evict(10), 0);
    }

    #[test]
    fn advance_then_sort_swaps_crossing_edges() {
        let mut aet = ActiveEdgeTable::new();
        aet.activate(&[edge(0, 50, 150), edge(2, 50, -48)]);
        aet.advance();
        assert_eq!(aet.edges()[0].x_at_scan, 3.0);
        aet.sort();
        let xs: Vec<f64> = aet.edges().iter().map(|e| e.x_at_scan).collect();
        assert_eq!(xs, vec![1.0, 3.0]);
    }

    #[test]
    fn advance_holds_exact_thirds() {
        let mut aet = ActiveEdgeTable::new();
        aet.activate(&[edge(0, 60_000, 20_000)]);
        for _ in 0..47_919 {
            aet.advance();
        }
        assert_eq!(aet.edges()[0].scan_x(), 15_973);
    }

    #[test]
    fn clear_drains() {
        let mut aet = ActiveEdgeTable::new();
        aet.insert(edge(1, 4, 1));
        aet.clear();
        assert!(aet.is_empty());
    }
}
