//! Match detector - finds color runs and classifies them into match shapes
//!
//! A run is a maximal horizontal or vertical line of at least three matchable tokens of
//! one color (wildcards and frozen tokens break runs). Runs are then classified in
//! fixed priority order:
//!
//! 1. **Cross**: a horizontal and a vertical run sharing a cell (L, T or plus shape).
//!    The center of the longer run (horizontal on ties) becomes an area blast.
//! 2. **Line5**: a run of 5 or more. Its center becomes a wildcard.
//! 3. **Line4**: a run of exactly 4. Its center becomes the line blast orthogonal to
//!    the run (horizontal run -> column blast, vertical run -> row blast).
//! 4. **Line3**: plain removal.
//!
//! A run takes part in at most one shape per scan and an anchor, once claimed, is never
//! claimed again. Anchors are never part of the matched (removal) set.

use std::collections::HashSet;

use crate::board::Board;
use crate::types::{Color, Position, TokenId, TokenKind, MIN_RUN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A maximal line of same-colored matchable tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    pub axis: Axis,
    pub start: Position,
    pub len: u8,
    pub color: Color,
}

impl Run {
    /// Position of the i-th cell of the run
    pub fn cell(&self, i: u8) -> Position {
        match self.axis {
            Axis::Horizontal => self.start.offset(i as i8, 0),
            Axis::Vertical => self.start.offset(0, i as i8),
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let run = *self;
        (0..run.len).map(move |i| run.cell(i))
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.offset_of(pos).is_some()
    }

    fn offset_of(&self, pos: Position) -> Option<u8> {
        let (along, across, start_along, start_across) = match self.axis {
            Axis::Horizontal => (pos.col, pos.row, self.start.col, self.start.row),
            Axis::Vertical => (pos.row, pos.col, self.start.row, self.start.col),
        };
        if across != start_across || along < start_along {
            return None;
        }
        let i = (along - start_along) as u8;
        (i < self.len).then_some(i)
    }

    /// Geometric center (lower index for even lengths)
    pub fn center_index(&self) -> u8 {
        (self.len - 1) / 2
    }

    /// Cells ordered by distance from the center, ties toward the run start
    fn anchor_candidates(&self) -> Vec<Position> {
        let center = self.center_index() as i16;
        let mut idx: Vec<u8> = (0..self.len).collect();
        idx.sort_by_key(|&i| ((i as i16 - center).abs(), i));
        idx.into_iter().map(|i| self.cell(i)).collect()
    }
}

/// Classified match shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchShape {
    Cross,
    Line5,
    Line4,
    Line3,
}

impl MatchShape {
    fn for_run(run: &Run) -> Self {
        match run.len {
            5.. => MatchShape::Line5,
            4 => MatchShape::Line4,
            _ => MatchShape::Line3,
        }
    }

    /// Special kind the anchor turns into, if any
    pub fn transform_kind(self, axis: Axis) -> Option<TokenKind> {
        match (self, axis) {
            (MatchShape::Cross, _) => Some(TokenKind::AreaBlast),
            (MatchShape::Line5, _) => Some(TokenKind::Wildcard),
            (MatchShape::Line4, Axis::Horizontal) => Some(TokenKind::LineCol),
            (MatchShape::Line4, Axis::Vertical) => Some(TokenKind::LineRow),
            (MatchShape::Line3, _) => None,
        }
    }
}

/// Request to retype a token instead of removing it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transform {
    pub pos: Position,
    pub id: TokenId,
    pub into: TokenKind,
}

/// One classified shape and the cells it covers (anchor included)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    pub shape: MatchShape,
    pub color: Color,
    pub cells: Vec<Position>,
    pub anchor: Option<Transform>,
}

/// Result of one detection pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Tokens to remove, deduplicated, anchors excluded
    pub matched: Vec<Position>,
    pub transforms: Vec<Transform>,
    pub groups: Vec<MatchGroup>,
}

impl MatchResult {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn is_anchor(&self, pos: Position) -> bool {
        self.transforms.iter().any(|t| t.pos == pos)
    }
}

/// Find every maximal run of at least three
pub fn find_runs(board: &Board) -> Vec<Run> {
    let mut runs = Vec::new();
    for row in 0..board.rows() as i8 {
        scan_line(board, Position::new(0, row), Axis::Horizontal, &mut runs);
    }
    for col in 0..board.cols() as i8 {
        scan_line(board, Position::new(col, 0), Axis::Vertical, &mut runs);
    }
    runs
}

fn scan_line(board: &Board, origin: Position, axis: Axis, out: &mut Vec<Run>) {
    let length = match axis {
        Axis::Horizontal => board.cols(),
        Axis::Vertical => board.rows(),
    };
    let at = |i: u8| match axis {
        Axis::Horizontal => origin.offset(i as i8, 0),
        Axis::Vertical => origin.offset(0, i as i8),
    };
    let color_at = |i: u8| {
        board
            .token(at(i))
            .filter(|t| t.is_matchable())
            .map(|t| t.color)
    };

    let mut i = 0u8;
    while i < length {
        let Some(color) = color_at(i) else {
            i += 1;
            continue;
        };
        let mut len = 1u8;
        while i + len < length && color_at(i + len) == Some(color) {
            len += 1;
        }
        if len as usize >= MIN_RUN {
            out.push(Run {
                axis,
                start: at(i),
                len,
                color,
            });
        }
        i += len;
    }
}

/// Fast check: does any run of three exist
pub fn has_match(board: &Board) -> bool {
    !find_runs(board).is_empty()
}

/// Would a matchable token of `color` at `pos` complete a run of three with its
/// current neighbors (the cell itself is ignored)
pub fn forms_run_at(board: &Board, pos: Position, color: Color) -> bool {
    let same = |dc: i8, dr: i8| {
        let mut n = 0;
        let mut p = pos.offset(dc, dr);
        while board
            .token(p)
            .is_some_and(|t| t.is_matchable() && t.color == color)
        {
            n += 1;
            p = p.offset(dc, dr);
        }
        n
    };
    same(-1, 0) + same(1, 0) + 1 >= MIN_RUN || same(0, -1) + same(0, 1) + 1 >= MIN_RUN
}

/// Scan the board and classify every match
pub fn detect(board: &Board) -> MatchResult {
    let runs = find_runs(board);
    if runs.is_empty() {
        return MatchResult::default();
    }

    let mut consumed = vec![false; runs.len()];
    let mut claimed: HashSet<Position> = HashSet::new();
    let mut groups = Vec::new();

    // Crossings first, in row-major order of the shared cell.
    let mut crossings: Vec<(Position, usize, usize)> = Vec::new();
    for (hi, h) in runs.iter().enumerate() {
        if h.axis != Axis::Horizontal {
            continue;
        }
        for (vi, v) in runs.iter().enumerate() {
            if v.axis != Axis::Vertical || v.color != h.color {
                continue;
            }
            let shared = Position::new(v.start.col, h.start.row);
            if h.contains(shared) && v.contains(shared) {
                crossings.push((shared, hi, vi));
            }
        }
    }
    crossings.sort_by_key(|&(p, _, _)| (p.row, p.col));

    for (shared, hi, vi) in crossings {
        if consumed[hi] || consumed[vi] {
            continue;
        }
        consumed[hi] = true;
        consumed[vi] = true;

        let (h, v) = (runs[hi], runs[vi]);
        let mut cells: Vec<Position> = h.cells().collect();
        cells.extend(v.cells().filter(|&p| p != shared));

        let main = if v.len > h.len { v } else { h };
        let center = main.cell(main.center_index());
        let mut candidates = main.anchor_candidates();
        let mut others: Vec<Position> = cells
            .iter()
            .copied()
            .filter(|&p| !main.contains(p))
            .collect();
        others.sort_by_key(|p| (manhattan(*p, center), p.row, p.col));
        candidates.extend(others);
        let anchor = claim_anchor(board, &candidates, TokenKind::AreaBlast, &mut claimed);

        groups.push(MatchGroup {
            shape: MatchShape::Cross,
            color: h.color,
            cells,
            anchor,
        });
    }

    // Then lone runs, longest first; the sort is stable so scan order breaks ties.
    let mut rest: Vec<&Run> = runs
        .iter()
        .enumerate()
        .filter(|(i, _)| !consumed[*i])
        .map(|(_, r)| r)
        .collect();
    rest.sort_by(|a, b| b.len.cmp(&a.len));

    for run in rest {
        let shape = MatchShape::for_run(run);
        let anchor = shape
            .transform_kind(run.axis)
            .and_then(|kind| claim_anchor(board, &run.anchor_candidates(), kind, &mut claimed));
        groups.push(MatchGroup {
            shape,
            color: run.color,
            cells: run.cells().collect(),
            anchor,
        });
    }

    let mut seen = HashSet::new();
    let mut matched = Vec::new();
    for group in &groups {
        for &p in &group.cells {
            if !claimed.contains(&p) && seen.insert(p) {
                matched.push(p);
            }
        }
    }
    let transforms = groups.iter().filter_map(|g| g.anchor).collect();

    MatchResult {
        matched,
        transforms,
        groups,
    }
}

/// First candidate that is a plain token and not already an anchor
fn claim_anchor(
    board: &Board,
    candidates: &[Position],
    into: TokenKind,
    claimed: &mut HashSet<Position>,
) -> Option<Transform> {
    let token = candidates.iter().find_map(|&p| {
        board
            .token(p)
            .filter(|t| t.kind == TokenKind::Plain && !claimed.contains(&p))
    })?;
    claimed.insert(token.pos);
    Some(Transform {
        pos: token.pos,
        id: token.id,
        into,
    })
}

fn manhattan(a: Position, b: Position) -> i16 {
    (a.col as i16 - b.col as i16).abs() + (a.row as i16 - b.row as i16).abs()
}
