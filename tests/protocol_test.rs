mod common;

use std::fs;

use common::layout;

use match3::adapter::protocol::{parse_message, ParsedMessage};
use match3::adapter::{run_autoplay, start_session, EventMode, LevelFile, RunConfig, StateHash};
use match3::core::detect;

fn level_file(name: &str, level: &LevelFile) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("match3-{}-{}.json", name, std::process::id()));
    fs::write(&path, serde_json::to_string_pretty(level).unwrap()).unwrap();
    path
}

#[test]
fn stream_from_level_file_is_well_formed() {
    let board = layout(&[(0, 3, "2"), (1, 3, "2"), (2, 2, "2"), (5, 5, "#")]);
    let path = level_file(
        "stream",
        &LevelFile {
            move_budget: Some(4),
            target_score: Some(100_000),
            layout: Some(board.to_rows()),
            ..Default::default()
        },
    );
    let config = RunConfig {
        seed: 21,
        level_path: Some(path.clone()),
        events: EventMode::All,
        ..RunConfig::default()
    };

    let mut session = start_session(&config).unwrap();
    assert_eq!(session.board(), &board);
    let mut out = Vec::new();
    let summary = run_autoplay(&config, &mut session, &mut out).unwrap();
    fs::remove_file(&path).ok();

    let text = String::from_utf8(out).unwrap();
    let messages: Vec<ParsedMessage> = text.lines().map(|l| parse_message(l).unwrap()).collect();

    match &messages[0] {
        ParsedMessage::SessionStart(start) => {
            assert_eq!(start.seq, 1);
            assert_eq!(start.seed, 21);
            assert_eq!(start.move_budget, 4);
            assert_eq!(start.board.rows, board.to_rows());
            assert_eq!(start.board.board_hash, StateHash(board.snapshot().board_hash));
        }
        other => panic!("unexpected {:?}", other),
    }

    let seqs: Vec<u64> = messages
        .iter()
        .map(|m| match m {
            ParsedMessage::SessionStart(m) => m.seq,
            ParsedMessage::Phase(m) => m.seq,
            ParsedMessage::Turn(m) => m.seq,
            ParsedMessage::SessionEnd(m) => m.seq,
            ParsedMessage::Unknown(m) => m.seq,
        })
        .collect();
    assert!(seqs.windows(2).all(|w| w[1] == w[0] + 1));

    // Unless reshuffled, every turn ends on the board its last refill showed
    let mut last_board_hash = None;
    let mut turns = 0;
    for message in &messages {
        match message {
            ParsedMessage::Phase(phase) => {
                if let Some(board) = &phase.board {
                    last_board_hash = Some(board.board_hash);
                }
            }
            ParsedMessage::Turn(turn) => {
                turns += 1;
                assert_eq!(turn.turn_id, turns);
                assert!(!turn.rejected);
                if !turn.reshuffled {
                    assert_eq!(Some(turn.board_hash), last_board_hash);
                }
            }
            _ => {}
        }
    }
    assert_eq!(turns, summary.turns);

    match messages.last() {
        Some(ParsedMessage::SessionEnd(end)) => {
            assert_eq!(end.result, "out_of_moves");
            assert_eq!(end.turns, 4);
            assert_eq!(end.moves_left, 0);
            assert_eq!(end.score, session.score());
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(detect(session.board()).is_empty());
}

#[test]
fn final_mode_writes_only_turns() {
    let config = RunConfig {
        seed: 4,
        max_turns: 3,
        ..RunConfig::default()
    };
    let mut session = start_session(&config).unwrap();
    let mut out = Vec::new();
    let summary = run_autoplay(&config, &mut session, &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let kinds: Vec<&str> = text
        .lines()
        .map(|l| match parse_message(l).unwrap() {
            ParsedMessage::SessionStart(_) => "start",
            ParsedMessage::Turn(_) => "turn",
            ParsedMessage::SessionEnd(_) => "end",
            _ => "other",
        })
        .collect();

    assert_eq!(kinds.first(), Some(&"start"));
    assert_eq!(kinds.last(), Some(&"end"));
    assert!(!kinds.contains(&"other"));
    assert_eq!(kinds.len() as u32, summary.turns + 2);
}

#[test]
fn bad_level_file_is_reported() {
    let path = level_file(
        "bad",
        &LevelFile {
            palette: Some(12),
            ..Default::default()
        },
    );
    let config = RunConfig {
        level_path: Some(path.clone()),
        ..RunConfig::default()
    };
    let err = start_session(&config).unwrap_err();
    fs::remove_file(&path).ok();
    assert!(format!("{:#}", err).contains("palette"));
}
