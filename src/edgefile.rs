//! Reader for the triangulation edge file that accompanies each patch.
//!
//! The file is produced by the triangulation tool run over the candidate
//! positions. It starts with a header line whose first integer is the number
//! of edges, followed by one whitespace-delimited integer row per edge. The
//! tool appends a `#` comment line as a footer, which is skipped.
//!
//! The weeding pass only requires the file to be present and well formed; it
//! is read once, before any candidate is touched.

use std::path::Path;

use nalgebra::DMatrix;
use tracing::{debug, warn};

use crate::WeedError;

/// Default file name inside a patch directory.
pub const EDGE_FILE_NAME: &str = "psweed.2.edge";

/// Parsed contents of an edge file.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeFile {
    /// Edge count declared by the header line.
    pub declared_count: usize,
    /// One row per edge; columns as written by the triangulation tool.
    pub edges: DMatrix<i32>,
}

impl EdgeFile {
    /// Number of edge rows actually present.
    pub fn len(&self) -> usize {
        self.edges.nrows()
    }

    /// Return `true` when the file lists no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.nrows() == 0
    }

    /// Parse an edge file already held in memory.
    pub fn parse(data: &str) -> Result<Self, WeedError> {
        let mut lines = data
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (header_line, header) = lines.next().ok_or(WeedError::MalformedEdgeFile {
            line: 1,
            reason: "missing header line".to_string(),
        })?;
        let declared_count = header
            .split_whitespace()
            .next()
            .and_then(|tok| tok.parse::<usize>().ok())
            .ok_or_else(|| WeedError::MalformedEdgeFile {
                line: header_line,
                reason: format!("header does not start with an edge count: {:?}", header),
            })?;

        let mut width: Option<usize> = None;
        let mut values: Vec<i32> = Vec::new();
        let mut rows = 0usize;
        for (line_no, line) in lines {
            if line.starts_with('#') {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(|tok| tok.parse::<i32>())
                .collect::<Result<Vec<i32>, _>>()
                .map_err(|e| WeedError::MalformedEdgeFile {
                    line: line_no,
                    reason: e.to_string(),
                })?;
            match width {
                None => width = Some(row.len()),
                Some(w) if w != row.len() => {
                    return Err(WeedError::MalformedEdgeFile {
                        line: line_no,
                        reason: format!("expected {} columns, found {}", w, row.len()),
                    });
                }
                Some(_) => {}
            }
            values.extend(row);
            rows += 1;
        }

        let edges = DMatrix::from_row_slice(rows, width.unwrap_or(0), &values);
        if edges.nrows() != declared_count {
            warn!(
                "Edge file declares {} edges but lists {}",
                declared_count,
                edges.nrows()
            );
        }

        Ok(Self {
            declared_count,
            edges,
        })
    }

    /// Load an edge file from disk.
    ///
    /// A missing file is reported as [`WeedError::MissingInputFile`]; there is
    /// no sensible default to fall back on.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WeedError> {
        let path = path.as_ref();
        debug!("Path to edge file: {}", path.display());
        if !path.exists() {
            return Err(WeedError::MissingInputFile {
                path: path.to_path_buf(),
            });
        }
        let data = std::fs::read_to_string(path)?;
        Self::parse(&data)
    }
}
