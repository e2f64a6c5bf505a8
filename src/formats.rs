//! Vertex-loop ingestion
//!
//! Loads the vertex loop of a single polygon from disk. Two encodings are
//! understood:
//!
//! - text: one `x,y` integer pair per line, `#` starts a comment;
//! - polystream: `u16` little-endian `x0`, `y0`, followed by pairs of `i8`
//!   `dx`, `dy` deltas, each accumulated onto the previous vertex.
//!
//! Either may be gzip-compressed, signalled by a trailing `.gz` extension.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use log::debug;
use thiserror::Error;

use crate::edge::Point;
use crate::error::{codes, FillError};

/// Errors that can occur while loading or decoding a vertex list
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Fill error: {0}")]
    Fill(#[from] FillError),
}

impl FormatError {
    /// Numeric code used by the C ABI.
    pub fn code(&self) -> i32 {
        match self {
            FormatError::Fill(e) => e.code(),
            _ => codes::FORMAT,
        }
    }
}

/// On-disk vertex encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    Text,
    Polystream,
}

impl VertexFormat {
    /// Picks the encoding from the file name: `.bin` and `.ps` are polystream,
    /// anything else is text. A trailing `.gz` is looked through.
    pub fn from_path(path: &Path) -> Self {
        let inner = if is_gzip(path) { Path::new(path.file_stem().unwrap_or_default()) } else { path };
        match inner.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bin") || ext.eq_ignore_ascii_case("ps") => {
                VertexFormat::Polystream
            }
            _ => VertexFormat::Text,
        }
    }

    /// Decodes raw (already decompressed) file contents.
    pub fn decode(self, data: &[u8]) -> Result<Vec<Point>, FormatError> {
        match self {
            VertexFormat::Text => {
                let text = std::str::from_utf8(data)
                    .map_err(|_| FormatError::InvalidFormat("vertex text is not UTF-8".to_string()))?;
                parse_text(text)
            }
            VertexFormat::Polystream => decode_polystream(data),
        }
    }
}

/// True if the path ends in `.gz`.
pub fn is_gzip(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("gz"))
}

/// Parses a text vertex list.
pub fn parse_text(text: &str) -> Result<Vec<Point>, FormatError> {
    let mut points = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let parse_err = |message: String| FormatError::Parse { line: idx + 1, message };
        let (x, y) = line
            .split_once(',')
            .ok_or_else(|| parse_err(format!("expected 'x,y', got '{}'", line)))?;
        let x = x.trim().parse::<i32>().map_err(|e| parse_err(format!("bad x '{}': {}", x.trim(), e)))?;
        let y = y.trim().parse::<i32>().map_err(|e| parse_err(format!("bad y '{}': {}", y.trim(), e)))?;
        points.push((x, y));
    }
    Ok(points)
}

/// Decodes polystream bytes into a list of (x, y) points.
pub fn decode_polystream(data: &[u8]) -> Result<Vec<Point>, FormatError> {
    if data.len() < 4 {
        return Err(FormatError::InvalidFormat(format!(
            "polystream needs a 4 byte origin, got {} bytes",
            data.len()
        )));
    }
    if data.len() % 2 != 0 {
        return Err(FormatError::InvalidFormat("polystream has a trailing half delta".to_string()));
    }
    let mut x = u16::from_le_bytes([data[0], data[1]]) as i32;
    let mut y = u16::from_le_bytes([data[2], data[3]]) as i32;
    let mut points = Vec::with_capacity(1 + (data.len() - 4) / 2);
    points.push((x, y));
    for delta in data[4..].chunks_exact(2) {
        x = x
            .checked_add(delta[0] as i8 as i32)
            .ok_or_else(|| FormatError::InvalidFormat("polystream x leaves the i32 range".to_string()))?;
        y = y
            .checked_add(delta[1] as i8 as i32)
            .ok_or_else(|| FormatError::InvalidFormat("polystream y leaves the i32 range".to_string()))?;
        points.push((x, y));
    }
    Ok(points)
}

/// Encodes points as a polystream. The origin must fit `u16` and every step
/// between consecutive points must fit `i8`.
pub fn encode_polystream(points: &[Point]) -> Result<Vec<u8>, FormatError> {
    let Some(&(x0, y0)) = points.first() else {
        return Err(FormatError::InvalidFormat("cannot encode an empty vertex list".to_string()));
    };
    let x0 = u16::try_from(x0).map_err(|_| FormatError::InvalidFormat(format!("origin x {} does not fit u16", x0)))?;
    let y0 = u16::try_from(y0).map_err(|_| FormatError::InvalidFormat(format!("origin y {} does not fit u16", y0)))?;

    let mut out = Vec::with_capacity(4 + 2 * (points.len() - 1));
    out.extend_from_slice(&x0.to_le_bytes());
    out.extend_from_slice(&y0.to_le_bytes());
    for pair in points.windows(2) {
        let dx = pair[1].0 as i64 - pair[0].0 as i64;
        let dy = pair[1].1 as i64 - pair[0].1 as i64;
        let dx = i8::try_from(dx).map_err(|_| FormatError::InvalidFormat(format!("x step {} does not fit i8", dx)))?;
        let dy = i8::try_from(dy).map_err(|_| FormatError::InvalidFormat(format!("y step {} does not fit i8", dy)))?;
        out.push(dx as u8);
        out.push(dy as u8);
    }
    Ok(out)
}

/// Drops an explicit closing vertex (last equal to first); the edge table
/// closes the loop itself.
pub fn close_loop(mut points: Vec<Point>) -> Vec<Point> {
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Reads a file, decompressing it when the name ends in `.gz`.
pub fn read_file(path: &Path) -> Result<Vec<u8>, FormatError> {
    let mut file = File::open(path)?;
    let mut data = Vec::new();
    if is_gzip(path) {
        GzDecoder::new(file).read_to_end(&mut data)?;
    } else {
        file.read_to_end(&mut data)?;
    }
    Ok(data)
}

/// Loads a vertex loop, picking the encoding from the file name.
pub fn load_vertices(path: &Path) -> Result<Vec<Point>, FormatError> {
    let format = VertexFormat::from_path(path);
    let data = read_file(path)?;
    let points = close_loop(format.decode(&data)?);
    debug!("loaded {} vertices from {} ({:?})", points.len(), path.display(), format);
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testlib::{write_temp_gz, write_temp_vertices};
    use proptest::prelude::*;

    #[test]
    fn parses_text_with_comments_and_blanks() {
        let text = "# dino outline\n10,20\n\n 30 , 40 # tail\n-5,7\n";
        assert_eq!(parse_text(text).unwrap(), vec![(10, 20), (30, 40), (-5, 7)]);
    }

    #[test]
    fn text_errors_carry_line_numbers() {
        match parse_text("1,2\n3 4\n") {
            Err(FormatError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected {:?}", other),
        }
        match parse_text("1,2\n\n5,z\n") {
            Err(FormatError::Parse { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("bad y"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn decodes_polystream_triangle() {
        // Triangle: (0,0), (15,0), (7,15), closed
        let data = vec![
            0, 0, // x0=0
            0, 0, // y0=0
            15, 0, // dx=15, dy=0 -> (15,0)
            248, 15, // dx=-8, dy=15 -> (7,15)
            249, 241, // dx=-7, dy=-15 -> (0,0)
        ];
        let points = decode_polystream(&data).unwrap();
        assert_eq!(points, vec![(0, 0), (15, 0), (7, 15), (0, 0)]);
        assert_eq!(close_loop(points), vec![(0, 0), (15, 0), (7, 15)]);
    }

    #[test]
    fn rejects_short_or_ragged_polystream() {
        assert!(matches!(decode_polystream(&[1, 0, 2]), Err(FormatError::InvalidFormat(_))));
        assert!(matches!(decode_polystream(&[1, 0, 2, 0, 5]), Err(FormatError::InvalidFormat(_))));
    }

    #[test]
    fn encodes_square_as_deltas() {
        let bytes = encode_polystream(&[(0, 0), (10, 0), (10, 10), (0, 10)]).unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 0, 10, 0, 0, 10, 246, 0]);
        assert_eq!(decode_polystream(&bytes).unwrap(), vec![(0, 0), (10, 0), (10, 10), (0, 10)]);
    }

    #[test]
    fn encode_rejects_large_steps() {
        assert!(encode_polystream(&[(0, 0), (200, 0)]).is_err());
        assert!(encode_polystream(&[(-1, 0)]).is_err());
        assert!(encode_polystream(&[]).is_err());
        assert!(encode_polystream(&[(0, 0), (i32::MIN, 0)]).is_err());
        assert!(encode_polystream(&[(0, 0), (5, 5), (i32::MAX, i32::MIN)]).is_err());
    }

    #[test]
    fn close_loop_keeps_open_lists() {
        assert_eq!(close_loop(vec![(1, 1), (2, 5), (4, 1)]).len(), 3);
        assert_eq!(close_loop(vec![(1, 1)]).len(), 1);
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(VertexFormat::from_path(Path::new("dino.txt")), VertexFormat::Text);
        assert_eq!(VertexFormat::from_path(Path::new("dino")), VertexFormat::Text);
        assert_eq!(VertexFormat::from_path(Path::new("dino.bin")), VertexFormat::Polystream);
        assert_eq!(VertexFormat::from_path(Path::new("dino.PS.gz")), VertexFormat::Polystream);
        assert_eq!(VertexFormat::from_path(Path::new("dino.txt.gz")), VertexFormat::Text);
        assert!(is_gzip(Path::new("a/b.txt.gz")));
        assert!(!is_gzip(Path::new("a/b.txt")));
    }

    #[test]
    fn loads_text_file() {
        let file = write_temp_vertices(b"10,10\n10,50\n50,50\n50,10\n10,10\n", ".txt");
        let points = load_vertices(file.path()).unwrap();
        assert_eq!(points, vec![(10, 10), (10, 50), (50, 50), (50, 10)]);
    }

    #[test]
    fn loads_gzipped_polystream() {
        let bytes = encode_polystream(&[(5, 5), (25, 5), (15, 30)]).unwrap();
        let file = write_temp_gz(&bytes, ".bin.gz");
        assert_eq!(load_vertices(file.path()).unwrap(), vec![(5, 5), (25, 5), (15, 30)]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_vertices(Path::new("/nonexistent/dir/poly.txt")).unwrap_err();
        assert!(matches!(err, FormatError::Io(_)));
        assert_eq!(err.code(), codes::FORMAT);
    }

    proptest! {
        #[test]
        fn fuzz_decode_polystream_does_not_panic(data in proptest::collection::vec(any::<u8>(), 0..128)) {
            let _ = decode_polystream(&data);
        }
        #[test]
        fn fuzz_parse_text_does_not_panic(text in "[0-9,# \\n-]{0,64}") {
            let _ = parse_text(&text);
        }
    }
}
