#![allow(dead_code)]

use match3::core::{Board, LevelConfig};
use match3::types::Position;

const BG: [&str; 4] = ["1", "3", "4", "5"];

/// 8x8 board without runs (colors 2, 6 and 7 unused) with some cells replaced
pub fn layout(plant: &[(usize, usize, &str)]) -> Board {
    let mut cells: Vec<Vec<String>> = (0..8)
        .map(|r| (0..8).map(|c| BG[(c + 2 * r) % 4].to_string()).collect())
        .collect();
    for &(c, r, s) in plant {
        cells[r][c] = s.to_string();
    }
    let lines: Vec<String> = cells.iter().map(|row| row.join(" ")).collect();
    Board::from_rows(&lines).unwrap()
}

/// Level that cannot be won by score in a short test
pub fn open_level() -> LevelConfig {
    LevelConfig {
        target_score: 1_000_000,
        move_budget: 10,
        ..Default::default()
    }
}

pub fn p(col: i8, row: i8) -> Position {
    Position::new(col, row)
}
