//! Chunk planning arithmetic
//!
//! Pure functions partitioning a row extent into fixed-size chunks. Chunking
//! governs progress granularity and partial-failure isolation for imports,
//! and output cursor addressing for exports. The arithmetic must be exact at
//! the boundaries: zero rows, a partial final chunk and an exact multiple of
//! the chunk size.

use serde::{Deserialize, Serialize};

/// Default rows per chunk
pub const DEFAULT_CHUNK_SIZE: u64 = 1000;

/// The row span covered by one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSpan {
    /// Chunk index, ascending from 0
    pub index: u64,
    /// First covered row (0-based, inclusive)
    pub start: u64,
    /// One past the last covered row (exclusive)
    pub end: u64,
}

impl ChunkSpan {
    /// Number of rows in the chunk
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the chunk covers no rows
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Fixed-size chunk planner
///
/// Given `total_rows` and a chunk size, computes the chunk count, the row
/// range any chunk covers and the artifact row an export batch must write to.
/// The ranges partition `[0, total_rows)` exactly: no gaps, no overlaps, and
/// only the last chunk may be partial.
#[derive(Debug, Clone, Copy)]
pub struct ChunkPlanner {
    chunk_size: u64,
}

impl ChunkPlanner {
    /// Creates a planner with the given chunk size
    ///
    /// A zero chunk size is clamped to 1 so the arithmetic stays total.
    pub fn new(chunk_size: u64) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Rows per chunk
    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Number of chunks needed to cover `total_rows`
    pub fn total_chunks(&self, total_rows: u64) -> u64 {
        total_rows.div_ceil(self.chunk_size)
    }

    /// The row span chunk `index` covers within `total_rows`
    pub fn span(&self, index: u64, total_rows: u64) -> ChunkSpan {
        let start = (index * self.chunk_size).min(total_rows);
        let end = ((index + 1) * self.chunk_size).min(total_rows);
        ChunkSpan { index, start, end }
    }

    /// Iterator over every chunk span covering `total_rows`, in index order
    pub fn spans(&self, total_rows: u64) -> impl Iterator<Item = ChunkSpan> + '_ {
        (0..self.total_chunks(total_rows)).map(move |i| self.span(i, total_rows))
    }

    /// Artifact row a batch with the given index writes to
    ///
    /// Row 0 of the artifact is the header row, so batch `i` starts at
    /// `1 + i * chunk_size`.
    pub fn output_row(&self, batch_index: u64) -> u64 {
        1 + batch_index * self.chunk_size
    }
}

impl Default for ChunkPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

/// Progress percentage after `done` of `total` units
///
/// Rounds to the nearest whole percent; an empty extent reports 100 because
/// there is nothing left to do.
pub fn percent(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let done = done.min(total);
    (((done as f64 / total as f64) * 100.0).round()) as u8
}
