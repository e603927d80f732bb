//! Splitting a batch into per-lane chunks

/// Contiguous, order-preserving slice of a batch assigned to one lane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Lane index (0-based)
    pub lane: usize,
    /// Statements of this lane, in the order they were given
    pub commands: Vec<String>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Uniform chunk size for `len` statements spread over `lanes` lanes: `ceil(len / lanes)`
pub fn chunk_size(len: usize, lanes: usize) -> usize {
    if lanes == 0 {
        return 0;
    }
    len.div_ceil(lanes)
}

/// Split `commands` into exactly `lanes` chunks.
///
/// Chunks fill in lane order with `chunk_size(len, lanes)` statements each,
/// so only the last non-empty chunk may be shorter and any lanes past it get
/// an empty chunk. Concatenating the chunks in lane order yields `commands`.
///
/// `lanes == 0` is a caller error; callers validate it first.
pub fn partition(commands: Vec<String>, lanes: usize) -> Vec<Chunk> {
    debug_assert!(lanes > 0, "partition requires at least one lane");

    let total = commands.len();
    let size = chunk_size(total, lanes);
    let mut remaining = commands.into_iter();

    (0..lanes)
        .map(|lane| {
            let start = (lane * size).min(total);
            let end = (start + size).min(total);
            Chunk {
                lane,
                commands: remaining.by_ref().take(end - start).collect(),
            }
        })
        .collect()
}
