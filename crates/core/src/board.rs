//! Board module - manages the token grid
//!
//! The board is a `cols x rows` grid (at most 12x12) where each cell is empty, a token,
//! a blocker or a collectible. Uses flat inline storage for cache locality and zero
//! allocation. Coordinates: `(col, row)`, row 0 is the top, row `rows - 1` the bottom.
//!
//! The board performs raw structural operations only. Legality of a player swap is
//! checked by [`crate::moves::validate_swap`]; there is no randomness here.

use std::fmt;

use arrayvec::ArrayVec;

use crate::error::BoardError;
use crate::types::{
    Cell, Color, Position, Token, TokenId, TokenKind, DEFAULT_COLS, DEFAULT_ROWS, MAX_CELLS,
    MAX_COLS, MAX_ROWS, MIN_SIDE,
};

/// The game board using flat row-major storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cols: u8,
    rows: u8,
    /// Flat array of cells, row-major order (row * cols + col)
    cells: ArrayVec<Cell, MAX_CELLS>,
}

impl Board {
    /// Create a new board with every cell empty
    pub fn new(cols: u8, rows: u8) -> Result<Self, BoardError> {
        if !(MIN_SIDE..=MAX_COLS).contains(&cols) || !(MIN_SIDE..=MAX_ROWS).contains(&rows) {
            return Err(BoardError::InvalidDimensions { cols, rows });
        }
        let mut cells = ArrayVec::new();
        for _ in 0..(cols as usize * rows as usize) {
            cells.push(Cell::Empty);
        }
        Ok(Self { cols, rows, cells })
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.col < 0 || pos.col >= self.cols as i8 || pos.row < 0 || pos.row >= self.rows as i8 {
            return None;
        }
        Some((pos.row as usize) * (self.cols as usize) + (pos.col as usize))
    }

    #[inline(always)]
    fn position_of(&self, idx: usize) -> Position {
        let cols = self.cols as usize;
        Position::new((idx % cols) as i8, (idx / cols) as i8)
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Index of the bottom row
    pub fn bottom_row(&self) -> i8 {
        self.rows as i8 - 1
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    /// Read a cell. Returns None if out of bounds
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Token at position, if the cell holds one
    pub fn token(&self, pos: Position) -> Option<&Token> {
        self.index(pos).and_then(|idx| self.cells[idx].token())
    }

    pub fn token_mut(&mut self, pos: Position) -> Option<&mut Token> {
        let idx = self.index(pos)?;
        self.cells[idx].token_mut()
    }

    /// Write a cell, rewriting the token position to match.
    /// Returns false if out of bounds
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                let mut cell = cell;
                if let Cell::Token(t) = &mut cell {
                    t.pos = pos;
                }
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Empty a cell and return what it held
    pub fn take(&mut self, pos: Position) -> Option<Cell> {
        let idx = self.index(pos)?;
        Some(std::mem::replace(&mut self.cells[idx], Cell::Empty))
    }

    /// Exchange two cells in place (bounds check only).
    /// Returns false if either position is out of bounds
    pub fn swap(&mut self, a: Position, b: Position) -> bool {
        let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) else {
            return false;
        };
        self.cells.swap(ia, ib);
        if let Some(t) = self.cells[ia].token_mut() {
            t.pos = a;
        }
        if let Some(t) = self.cells[ib].token_mut() {
            t.pos = b;
        }
        true
    }

    /// All positions, row-major
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |idx| self.position_of(idx))
    }

    /// All cells with their positions, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (self.position_of(idx), cell))
    }

    /// All tokens, row-major
    pub fn tokens(&self) -> impl Iterator<Item = &Token> + '_ {
        self.cells.iter().filter_map(|c| c.token())
    }

    /// Positions of one row, left to right
    pub fn row_positions(&self, row: i8) -> impl Iterator<Item = Position> {
        (0..self.cols as i8).map(move |col| Position::new(col, row))
    }

    /// Positions of one column, top to bottom
    pub fn col_positions(&self, col: i8) -> impl Iterator<Item = Position> {
        (0..self.rows as i8).map(move |row| Position::new(col, row))
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_empty()).count()
    }

    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Number of non-empty cells in a column
    pub fn column_occupancy(&self, col: i8) -> usize {
        self.col_positions(col)
            .filter(|&p| matches!(self.get(p), Some(c) if !c.is_empty()))
            .count()
    }

    pub fn count_blockers(&self) -> usize {
        self.cells.iter().filter(|c| matches!(c, Cell::Blocker)).count()
    }

    pub fn count_collectibles(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c, Cell::Collectible))
            .count()
    }

    pub fn count_frozen(&self) -> usize {
        self.tokens().filter(|t| t.frozen).count()
    }

    /// Largest token id on the board (0 when there are none)
    pub fn max_token_id(&self) -> u32 {
        self.tokens().map(|t| t.id.0).max().unwrap_or(0)
    }

    /// Position of a token by id
    pub fn find(&self, id: TokenId) -> Option<Position> {
        self.tokens().find(|t| t.id == id).map(|t| t.pos)
    }

    /// Verify no cell is empty (the post-refill invariant)
    pub fn check_settled(&self) -> Result<(), BoardError> {
        match self.iter().find(|(_, c)| c.is_empty()) {
            Some((pos, _)) => Err(BoardError::EmptyCell { pos }),
            None => Ok(()),
        }
    }

    /// Parse a text layout, one string per row.
    ///
    /// Cells are whitespace separated: `.` empty, `#` blocker, `$` collectible,
    /// `*` wildcard, digits `1`-`7` colors with optional suffixes `h` (line-blast-row),
    /// `v` (line-blast-col), `a` (area-blast) and `f` (frozen). Token ids are assigned
    /// row-major starting at 1.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, BoardError> {
        let parsed: Vec<Vec<&str>> = rows
            .iter()
            .map(|r| r.as_ref().split_whitespace().collect())
            .collect();
        let height = parsed.len();
        let width = parsed.first().map(|r| r.len()).unwrap_or(0);
        if height > MAX_ROWS as usize || width > MAX_COLS as usize {
            return Err(BoardError::InvalidDimensions {
                cols: width.min(u8::MAX as usize) as u8,
                rows: height.min(u8::MAX as usize) as u8,
            });
        }
        let mut board = Board::new(width as u8, height as u8)?;
        let mut next_id = 1u32;

        for (row, cells) in parsed.iter().enumerate() {
            if cells.len() != width {
                return Err(BoardError::Parse {
                    line: row + 1,
                    reason: format!("expected {} cells, found {}", width, cells.len()),
                });
            }
            for (col, text) in cells.iter().enumerate() {
                let pos = Position::new(col as i8, row as i8);
                let cell = parse_cell(text, pos, &mut next_id).map_err(|reason| {
                    BoardError::Parse {
                        line: row + 1,
                        reason,
                    }
                })?;
                board.set(pos, cell);
            }
        }

        Ok(board)
    }

    /// Render in the same notation [`Board::from_rows`] reads
    pub fn to_rows(&self) -> Vec<String> {
        (0..self.rows as i8)
            .map(|row| {
                self.row_positions(row)
                    .map(|p| format_cell(&self.get(p).unwrap_or(Cell::Empty)))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self {
            cols: DEFAULT_COLS,
            rows: DEFAULT_ROWS,
            cells: (0..(DEFAULT_COLS as usize * DEFAULT_ROWS as usize))
                .map(|_| Cell::Empty)
                .collect(),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.to_rows() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

fn parse_cell(text: &str, pos: Position, next_id: &mut u32) -> Result<Cell, String> {
    let mut chars = text.chars();
    let head = chars.next().ok_or_else(|| "empty cell token".to_string())?;

    let (color, mut kind) = match head {
        '.' if text.len() == 1 => return Ok(Cell::Empty),
        '#' if text.len() == 1 => return Ok(Cell::Blocker),
        '$' if text.len() == 1 => return Ok(Cell::Collectible),
        '*' => (Color::Red, TokenKind::Wildcard),
        d if d.is_ascii_digit() => {
            let color = d
                .to_digit(10)
                .and_then(|v| Color::from_index(v as u8))
                .ok_or_else(|| format!("unknown color '{}'", d))?;
            (color, TokenKind::Plain)
        }
        other => return Err(format!("unknown cell '{}'", other)),
    };

    let mut frozen = false;
    for suffix in chars {
        match suffix {
            'h' if kind == TokenKind::Plain => kind = TokenKind::LineRow,
            'v' if kind == TokenKind::Plain => kind = TokenKind::LineCol,
            'a' if kind == TokenKind::Plain => kind = TokenKind::AreaBlast,
            'f' => frozen = true,
            other => return Err(format!("unexpected suffix '{}' in '{}'", other, text)),
        }
    }

    let id = TokenId(*next_id);
    *next_id += 1;
    Ok(Cell::Token(Token {
        id,
        color,
        kind,
        pos,
        frozen,
    }))
}

/// One cell in layout notation (`.`, `#`, `$`, `*`, `3`, `2v`, `5f`, ...)
pub fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Empty => ".".to_string(),
        Cell::Blocker => "#".to_string(),
        Cell::Collectible => "$".to_string(),
        Cell::Token(t) => {
            let mut s = match t.kind {
                TokenKind::Wildcard => "*".to_string(),
                _ => t.color.index().to_string(),
            };
            match t.kind {
                TokenKind::LineRow => s.push('h'),
                TokenKind::LineCol => s.push('v'),
                TokenKind::AreaBlast => s.push('a'),
                TokenKind::Plain | TokenKind::Wildcard => {}
            }
            if t.frozen {
                s.push('f');
            }
            s
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_index_calculation() {
        let board = Board::default();
        assert_eq!(board.index(Position::new(0, 0)), Some(0));
        assert_eq!(board.index(Position::new(7, 0)), Some(7));
        assert_eq!(board.index(Position::new(0, 1)), Some(8));
        assert_eq!(board.index(Position::new(7, 7)), Some(63));
        assert_eq!(board.index(Position::new(-1, 0)), None);
        assert_eq!(board.index(Position::new(8, 0)), None);
        assert_eq!(board.index(Position::new(0, 8)), None);
    }

    #[test]
    fn test_board_rejects_bad_dimensions() {
        assert!(Board::new(2, 8).is_err());
        assert!(Board::new(8, 13).is_err());
        assert!(Board::new(12, 12).is_ok());
    }

    #[test]
    fn test_set_rewrites_token_position() {
        let mut board = Board::default();
        let t = Token::plain(TokenId(9), Color::Green, Position::new(0, 0));
        assert!(board.set(Position::new(4, 5), Cell::Token(t)));
        assert_eq!(board.token(Position::new(4, 5)).unwrap().pos, Position::new(4, 5));
    }

    #[test]
    fn test_swap_keeps_positions_in_sync() {
        let mut board = Board::from_rows(&["1 2 3", "4 5 6", "7 1 2"]).unwrap();
        let a = Position::new(0, 0);
        let b = Position::new(1, 0);
        assert!(board.swap(a, b));
        assert_eq!(board.token(a).unwrap().color, Color::Orange);
        assert_eq!(board.token(a).unwrap().pos, a);
        assert_eq!(board.token(b).unwrap().color, Color::Red);
        assert_eq!(board.token(b).unwrap().pos, b);
        assert!(!board.swap(a, Position::new(5, 5)));
    }

    #[test]
    fn test_layout_roundtrip() {
        let rows = ["1 2h 3v", "4a * 6f", "# $ ."];
        let board = Board::from_rows(&rows).unwrap();
        assert_eq!(board.to_rows(), rows.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        assert_eq!(board.count_blockers(), 1);
        assert_eq!(board.count_collectibles(), 1);
        assert_eq!(board.count_frozen(), 1);
        assert_eq!(board.max_token_id(), 6);
    }

    #[test]
    fn test_layout_parse_errors() {
        assert!(matches!(
            Board::from_rows(&["1 2 3", "4 5"]),
            Err(BoardError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            Board::from_rows(&["1 2 9", "1 2 3", "1 2 3"]),
            Err(BoardError::Parse { .. })
        ));
        assert!(matches!(
            Board::from_rows(&["1 2 3", "1 2x 3", "1 2 3"]),
            Err(BoardError::Parse { .. })
        ));
    }

    #[test]
    fn test_check_settled_reports_empty_cell() {
        let board = Board::from_rows(&["1 2 3", "4 . 6", "7 1 2"]).unwrap();
        assert_eq!(
            board.check_settled(),
            Err(BoardError::EmptyCell {
                pos: Position::new(1, 1)
            })
        );
    }
}
