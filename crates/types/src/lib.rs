//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (core rules, orchestration, outward reporting).
//!
//! # Board Dimensions
//!
//! - **Default**: 8 columns x 8 rows
//! - **Range**: 3..=12 on each axis (chosen per level)
//! - **Coordinates**: `(col, row)`, row 0 is the top, gravity pulls toward higher rows
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `BASE_TOKEN_SCORE` | 10 | Points per removed token |
//! | `COMBO_BASE` | 50 | Bonus per cascade depth step |
//! | `BOARD_CLEAR_BONUS` | 5000 | wildcard + wildcard |
//! | `COLOR_PROMOTE_BONUS` | 2000 | wildcard + blast |
//! | `CROSS_BLAST_BONUS` | 1500 | line-blast + area-blast |
//! | `COLOR_CLEAR_BONUS` | 1000 | wildcard + plain |
//!
//! # Examples
//!
//! ```
//! use match3_types::{Color, Position, TokenKind, DEFAULT_COLS, DEFAULT_ROWS};
//!
//! let color = Color::from_str("blue").unwrap();
//! assert_eq!(color, Color::Blue);
//! assert_eq!(Color::from_index(2), Some(Color::Orange));
//!
//! let kind = TokenKind::from_str("line-blast-col").unwrap();
//! assert!(kind.is_special());
//!
//! let a = Position::new(3, 3);
//! assert!(a.is_adjacent(Position::new(3, 4)));
//! assert!(!a.is_adjacent(Position::new(4, 4)));
//!
//! assert_eq!(DEFAULT_COLS, 8);
//! assert_eq!(DEFAULT_ROWS, 8);
//! ```

/// Default board width (8 columns)
pub const DEFAULT_COLS: u8 = 8;

/// Default board height (8 rows)
pub const DEFAULT_ROWS: u8 = 8;

/// Smallest allowed board side
pub const MIN_SIDE: u8 = 3;

/// Largest allowed board width
pub const MAX_COLS: u8 = 12;

/// Largest allowed board height
pub const MAX_ROWS: u8 = 12;

/// Storage capacity of a board (largest grid)
pub const MAX_CELLS: usize = (MAX_COLS as usize) * (MAX_ROWS as usize);

/// Minimum run length that counts as a match
pub const MIN_RUN: usize = 3;

/// Number of colors in the full palette
pub const PALETTE_MAX: u8 = 7;

/// Default number of colors in play
pub const DEFAULT_PALETTE: u8 = 6;

/// Points per removed token
pub const BASE_TOKEN_SCORE: u32 = 10;

/// Combo bonus per cascade depth step (first pass is depth 0, no bonus)
pub const COMBO_BASE: u32 = 50;

/// Bonus for swapping two wildcards together (the largest bonus)
pub const BOARD_CLEAR_BONUS: u32 = 5000;

/// Bonus for swapping a wildcard with a line or area blast
pub const COLOR_PROMOTE_BONUS: u32 = 2000;

/// Bonus for swapping a line blast with an area blast
pub const CROSS_BLAST_BONUS: u32 = 1500;

/// Bonus for swapping a wildcard with a plain token
pub const COLOR_CLEAR_BONUS: u32 = 1000;

/// Points for creating a line blast
pub const LINE_BLAST_CREATION_SCORE: u32 = 20;

/// Points for creating an area blast
pub const AREA_BLAST_CREATION_SCORE: u32 = 30;

/// Points for creating a wildcard
pub const WILDCARD_CREATION_SCORE: u32 = 50;

/// Token colors (the base palette)
///
/// Discriminants match the numeric color ids used in level data and text layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    Red = 1,
    Orange = 2,
    Yellow = 3,
    Green = 4,
    Blue = 5,
    Purple = 6,
    White = 7,
}

impl Color {
    /// All colors in palette order
    pub const ALL: [Color; PALETTE_MAX as usize] = [
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Purple,
        Color::White,
    ];

    /// Look up a color by its numeric id (1..=7)
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1..=PALETTE_MAX => Some(Self::ALL[(index - 1) as usize]),
            _ => None,
        }
    }

    /// Numeric id (1..=7)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// The first `size` colors of the palette
    pub fn palette(size: u8) -> &'static [Color] {
        let size = size.clamp(1, PALETTE_MAX) as usize;
        &Self::ALL[..size]
    }

    /// Parse color from string (case-insensitive name or numeric id)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "red" | "1" => Some(Color::Red),
            "orange" | "2" => Some(Color::Orange),
            "yellow" | "3" => Some(Color::Yellow),
            "green" | "4" => Some(Color::Green),
            "blue" | "5" => Some(Color::Blue),
            "purple" | "6" => Some(Color::Purple),
            "white" | "7" => Some(Color::White),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::White => "white",
        }
    }
}

/// Default objective (collectible) color
pub const OBJECTIVE_COLOR: Color = Color::Blue;

/// What a token does when it is detonated
///
/// - **Plain**: only itself
/// - **LineRow**: its whole row
/// - **LineCol**: its whole column
/// - **AreaBlast**: its 3x3 neighborhood
/// - **Wildcard**: every token of one target color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Plain,
    LineRow,
    LineCol,
    AreaBlast,
    Wildcard,
}

impl TokenKind {
    pub fn is_special(self) -> bool {
        !matches!(self, TokenKind::Plain)
    }

    pub fn is_line(self) -> bool {
        matches!(self, TokenKind::LineRow | TokenKind::LineCol)
    }

    /// Line or area blast (special, but not a wildcard)
    pub fn is_blast(self) -> bool {
        matches!(
            self,
            TokenKind::LineRow | TokenKind::LineCol | TokenKind::AreaBlast
        )
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "plain" => Some(TokenKind::Plain),
            "line-blast-row" => Some(TokenKind::LineRow),
            "line-blast-col" => Some(TokenKind::LineCol),
            "area-blast" => Some(TokenKind::AreaBlast),
            "wildcard" => Some(TokenKind::Wildcard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Plain => "plain",
            TokenKind::LineRow => "line-blast-row",
            TokenKind::LineCol => "line-blast-col",
            TokenKind::AreaBlast => "area-blast",
            TokenKind::Wildcard => "wildcard",
        }
    }
}

/// Stable token identity (animation keying only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub u32);

/// A cell position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub col: i8,
    pub row: i8,
}

impl Position {
    pub const fn new(col: i8, row: i8) -> Self {
        Self { col, row }
    }

    pub fn offset(self, dc: i8, dr: i8) -> Self {
        Self {
            col: self.col.saturating_add(dc),
            row: self.row.saturating_add(dr),
        }
    }

    /// Exactly one unit apart on exactly one axis
    pub fn is_adjacent(self, other: Position) -> bool {
        let dc = (self.col as i16 - other.col as i16).abs();
        let dr = (self.row as i16 - other.row as i16).abs();
        dc + dr == 1
    }

    /// Orthogonal neighbors (up, down, left, right); may be out of bounds
    pub fn neighbors(self) -> [Position; 4] {
        [
            self.offset(0, -1),
            self.offset(0, 1),
            self.offset(-1, 0),
            self.offset(1, 0),
        ]
    }
}

/// A matchable unit occupying a cell
///
/// `pos` always equals the cell the token sits in; the board rewrites it on every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub id: TokenId,
    pub color: Color,
    pub kind: TokenKind,
    pub pos: Position,
    pub frozen: bool,
}

impl Token {
    pub fn plain(id: TokenId, color: Color, pos: Position) -> Self {
        Self {
            id,
            color,
            kind: TokenKind::Plain,
            pos,
            frozen: false,
        }
    }

    /// Takes part in color runs (not a wildcard, not frozen)
    pub fn is_matchable(&self) -> bool {
        self.kind != TokenKind::Wildcard && !self.frozen
    }
}

/// Contents of one board cell
///
/// - `Empty`: transient, only between removal and refill
/// - `Token`: a matchable token
/// - `Blocker`: immovable barrier, destroyed by an adjacent removal
/// - `Collectible`: falls with gravity, harvested on the bottom row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Token(Token),
    Blocker,
    Collectible,
}

impl Cell {
    pub fn token(&self) -> Option<&Token> {
        match self {
            Cell::Token(t) => Some(t),
            _ => None,
        }
    }

    pub fn token_mut(&mut self) -> Option<&mut Token> {
        match self {
            Cell::Token(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Gravity never moves this cell (blockers and frozen tokens)
    pub fn is_fixed(&self) -> bool {
        match self {
            Cell::Blocker => true,
            Cell::Token(t) => t.frozen,
            Cell::Empty | Cell::Collectible => false,
        }
    }

    /// Falls with gravity and may be swapped by the player
    pub fn is_movable(&self) -> bool {
        match self {
            Cell::Token(t) => !t.frozen,
            Cell::Collectible => true,
            Cell::Empty | Cell::Blocker => false,
        }
    }
}

/// Objective requirement kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectiveKind {
    /// Remove tokens of the objective color
    CollectColor,
    /// Destroy blocking cells
    ClearBlockers,
    /// Harvest collectibles on the bottom row
    HarvestCollectibles,
    /// Thaw frozen tokens
    ThawFrozen,
}

impl ObjectiveKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "collect_color" => Some(ObjectiveKind::CollectColor),
            "clear_blockers" => Some(ObjectiveKind::ClearBlockers),
            "harvest_collectibles" => Some(ObjectiveKind::HarvestCollectibles),
            "thaw_frozen" => Some(ObjectiveKind::ThawFrozen),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectiveKind::CollectColor => "collect_color",
            ObjectiveKind::ClearBlockers => "clear_blockers",
            ObjectiveKind::HarvestCollectibles => "harvest_collectibles",
            ObjectiveKind::ThawFrozen => "thaw_frozen",
        }
    }
}

/// One objective requirement pulled in from the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Objective {
    pub kind: ObjectiveKind,
    pub count: u32,
}

/// Per-objective counters (used both for turn deltas and session totals)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ObjectiveCounts {
    pub color_collected: u32,
    pub blockers_cleared: u32,
    pub collectibles_harvested: u32,
    pub frozen_thawed: u32,
}

impl ObjectiveCounts {
    pub fn get(&self, kind: ObjectiveKind) -> u32 {
        match kind {
            ObjectiveKind::CollectColor => self.color_collected,
            ObjectiveKind::ClearBlockers => self.blockers_cleared,
            ObjectiveKind::HarvestCollectibles => self.collectibles_harvested,
            ObjectiveKind::ThawFrozen => self.frozen_thawed,
        }
    }

    pub fn add(&mut self, other: &ObjectiveCounts) {
        self.color_collected += other.color_collected;
        self.blockers_cleared += other.blockers_cleared;
        self.collectibles_harvested += other.collectibles_harvested;
        self.frozen_thawed += other.frozen_thawed;
    }

    pub fn is_zero(&self) -> bool {
        *self == ObjectiveCounts::default()
    }

    /// Every requirement reached
    pub fn satisfies(&self, objectives: &[Objective]) -> bool {
        objectives.iter().all(|o| self.get(o.kind) >= o.count)
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEnd {
    /// Score and objective targets met
    Won,
    /// Move budget exhausted first
    OutOfMoves,
}

impl SessionEnd {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionEnd::Won => "won",
            SessionEnd::OutOfMoves => "out_of_moves",
        }
    }
}

/// Turn orchestrator states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    /// Awaiting input
    Idle,
    /// Swap applied, awaiting interaction/match check
    Swapping,
    /// Inside the cascade loop
    Resolving,
    /// Swap reverted, nothing matched
    TurnRejected,
    /// Terminal
    SessionOver(SessionEnd),
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "idle",
            TurnPhase::Swapping => "swapping",
            TurnPhase::Resolving => "resolving",
            TurnPhase::TurnRejected => "turn_rejected",
            TurnPhase::SessionOver(_) => "session_over",
        }
    }
}

/// What a swap that triggers nothing costs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RejectPolicy {
    /// Reverted for free
    #[default]
    Free,
    /// Reverted, but one move is spent (no score)
    ConsumesMove,
}

impl RejectPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "free" => Some(RejectPolicy::Free),
            "consumes_move" => Some(RejectPolicy::ConsumesMove),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RejectPolicy::Free => "free",
            RejectPolicy::ConsumesMove => "consumes_move",
        }
    }
}
