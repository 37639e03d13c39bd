use std::hash::{Hash, Hasher};

use crate::board::Board;
use crate::types::{Cell, Position};

/// Stable 64-bit FNV-1a hasher for `board_hash`.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions/platforms.
#[derive(Debug, Clone)]
pub struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl Default for Fnv1aHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

/// Hash of the board contents (dimensions, cells, token ids and flags)
pub fn board_hash(board: &Board) -> u64 {
    let mut hasher = Fnv1aHasher::new();
    board.cols().hash(&mut hasher);
    board.rows().hash(&mut hasher);
    for (_, cell) in board.iter() {
        cell.hash(&mut hasher);
    }
    hasher.finish()
}

/// Owned copy of the board for rendering
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BoardSnapshot {
    pub cols: u8,
    pub rows: u8,
    /// Row-major
    pub cells: Vec<Cell>,
    pub board_hash: u64,
}

impl BoardSnapshot {
    pub fn clear(&mut self) {
        self.cols = 0;
        self.rows = 0;
        self.cells.clear();
        self.board_hash = 0;
    }

    pub fn get(&self, pos: Position) -> Option<Cell> {
        if pos.col < 0 || pos.row < 0 || pos.col >= self.cols as i8 || pos.row >= self.rows as i8 {
            return None;
        }
        self.cells
            .get(pos.row as usize * self.cols as usize + pos.col as usize)
            .copied()
    }

    /// Row-major rows of cells
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.cols.max(1) as usize)
    }
}

impl From<&Board> for BoardSnapshot {
    fn from(board: &Board) -> Self {
        let mut s = BoardSnapshot::default();
        board.snapshot_into(&mut s);
        s
    }
}

impl Board {
    /// Fill an existing snapshot, reusing its allocation
    pub fn snapshot_into(&self, out: &mut BoardSnapshot) {
        out.cols = self.cols();
        out.rows = self.rows();
        out.cells.clear();
        out.cells.extend(self.iter().map(|(_, c)| *c));
        out.board_hash = board_hash(self);
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from(self)
    }
}
