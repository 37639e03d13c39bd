//! Outward JSON messages
//!
//! Every message is one JSON object per line with a `type` tag and a monotonically
//! increasing `seq`. Boards travel as rows in layout notation (`"1 2v # $ 5f"`) together
//! with a 16-digit hex `board_hash`.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::config::EventMode;
use crate::core::board::format_cell;
use crate::core::{BoardSnapshot, Swap};
use crate::engine::{PhaseEvent, Session, TurnObserver, TurnOutcome};
use crate::types::{Objective, ObjectiveCounts, Position, TurnPhase};

// ============== Message Markers ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStartType {
    #[serde(rename = "session_start")]
    SessionStart,
}

impl Default for SessionStartType {
    fn default() -> Self {
        Self::SessionStart
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseType {
    #[serde(rename = "phase")]
    Phase,
}

impl Default for PhaseType {
    fn default() -> Self {
        Self::Phase
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnType {
    #[serde(rename = "turn")]
    Turn,
}

impl Default for TurnType {
    fn default() -> Self {
        Self::Turn
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionEndType {
    #[serde(rename = "session_end")]
    SessionEnd,
}

impl Default for SessionEndType {
    fn default() -> Self {
        Self::SessionEnd
    }
}

// ============== Shared Pieces ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionMessage {
    pub col: i8,
    pub row: i8,
}

impl From<Position> for PositionMessage {
    fn from(pos: Position) -> Self {
        Self {
            col: pos.col,
            row: pos.row,
        }
    }
}

impl From<PositionMessage> for Position {
    fn from(pos: PositionMessage) -> Self {
        Position::new(pos.col, pos.row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardMessage {
    pub width: u8,
    pub height: u8,
    /// Top row first, cells in layout notation
    pub rows: Vec<String>,
    pub board_hash: StateHash,
}

impl From<&BoardSnapshot> for BoardMessage {
    fn from(snapshot: &BoardSnapshot) -> Self {
        let rows = snapshot
            .rows()
            .map(|row| row.iter().map(format_cell).collect::<Vec<_>>().join(" "))
            .collect();
        Self {
            width: snapshot.cols,
            height: snapshot.rows,
            rows,
            board_hash: StateHash(snapshot.board_hash),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObjectivesMessage {
    pub color_collected: u32,
    pub blockers_cleared: u32,
    pub collectibles_harvested: u32,
    pub frozen_thawed: u32,
}

impl From<&ObjectiveCounts> for ObjectivesMessage {
    fn from(counts: &ObjectiveCounts) -> Self {
        Self {
            color_collected: counts.color_collected,
            blockers_cleared: counts.blockers_cleared,
            collectibles_harvested: counts.collectibles_harvested,
            frozen_thawed: counts.frozen_thawed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveMessage {
    pub kind: String,
    pub count: u32,
}

impl From<&Objective> for ObjectiveMessage {
    fn from(objective: &Objective) -> Self {
        Self {
            kind: objective.kind.as_str().to_string(),
            count: objective.count,
        }
    }
}

/// Board hash rendered as 16 lowercase hex digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StateHash(pub u64);

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut buf = [0u8; 16];
        let mut v = self.0;
        for i in 0..16 {
            buf[15 - i] = HEX[(v & 0x0f) as usize];
            v >>= 4;
        }
        let s = std::str::from_utf8(&buf).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(s)
    }
}

impl<'de> Deserialize<'de> for StateHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let s = s.trim();
        if s.is_empty() || s.len() > 16 {
            return Err(serde::de::Error::custom("invalid hex length"));
        }
        let mut v: u64 = 0;
        for b in s.as_bytes() {
            let d = match b {
                b'0'..=b'9' => (b - b'0') as u64,
                b'a'..=b'f' => (b - b'a' + 10) as u64,
                b'A'..=b'F' => (b - b'A' + 10) as u64,
                _ => return Err(serde::de::Error::custom("invalid hex")),
            };
            v = (v << 4) | d;
        }
        Ok(StateHash(v))
    }
}

// ============== Messages ==============

/// Sent once before the first turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStartMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: SessionStartType,
    pub seq: u64,
    pub seed: u32,
    pub palette: u8,
    pub move_budget: u32,
    pub target_score: u32,
    pub reject_policy: String,
    pub objectives: Vec<ObjectiveMessage>,
    pub board: BoardMessage,
}

/// One phase boundary inside a turn (only in `all` events mode)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: PhaseType,
    pub seq: u64,
    pub turn_id: u32,
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<Vec<PositionMessage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harvested: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<BoardMessage>,
}

/// Result of one player turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: TurnType,
    pub seq: u64,
    pub turn_id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap: Option<[PositionMessage; 2]>,
    pub rejected: bool,
    pub score_delta: u32,
    pub combo_depth: u32,
    pub bonus: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction: Option<String>,
    pub tokens_removed: u32,
    pub specials_created: u32,
    pub objectives: ObjectivesMessage,
    pub moves_left: u32,
    pub score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    pub reshuffled: bool,
    pub board_hash: StateHash,
}

/// Sent once when the run stops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEndMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: SessionEndType,
    pub seq: u64,
    /// `won`, `out_of_moves`, `turn_limit` or `no_moves`
    pub result: String,
    pub score: u32,
    pub turns: u32,
    pub moves_left: u32,
    pub progress: ObjectivesMessage,
}

// ============== Message Parsing ==============

/// Parse one line of the outward stream
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum OutboundMessage {
        #[serde(rename = "session_start")]
        SessionStart(SessionStartMessage),
        #[serde(rename = "phase")]
        Phase(PhaseMessage),
        #[serde(rename = "turn")]
        Turn(TurnMessage),
        #[serde(rename = "session_end")]
        SessionEnd(SessionEndMessage),
    }

    match serde_json::from_str::<OutboundMessage>(json) {
        Ok(OutboundMessage::SessionStart(m)) => Ok(ParsedMessage::SessionStart(m)),
        Ok(OutboundMessage::Phase(m)) => Ok(ParsedMessage::Phase(m)),
        Ok(OutboundMessage::Turn(m)) => Ok(ParsedMessage::Turn(m)),
        Ok(OutboundMessage::SessionEnd(m)) => Ok(ParsedMessage::SessionEnd(m)),
        Err(e) => {
            // Unknown types are tolerated so older readers survive newer streams.
            #[derive(Debug, Deserialize)]
            struct TypeOnly {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let head = serde_json::from_str::<TypeOnly>(json)?;
            let known = matches!(
                head.msg_type.as_deref(),
                Some("session_start" | "phase" | "turn" | "session_end")
            );
            if known {
                return Err(e);
            }
            Ok(ParsedMessage::Unknown(UnknownMessage {
                seq: head.seq.unwrap_or(0),
            }))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMessage {
    SessionStart(SessionStartMessage),
    Phase(PhaseMessage),
    Turn(TurnMessage),
    SessionEnd(SessionEndMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

// ============== Utility Functions ==============

pub fn create_session_start(seq: u64, session: &Session) -> SessionStartMessage {
    let level = session.level();
    SessionStartMessage {
        msg_type: SessionStartType::SessionStart,
        seq,
        seed: session.seed(),
        palette: level.palette,
        move_budget: level.move_budget,
        target_score: level.target_score,
        reject_policy: level.reject_policy.as_str().to_string(),
        objectives: level.objectives.iter().map(ObjectiveMessage::from).collect(),
        board: BoardMessage::from(&session.snapshot()),
    }
}

/// Build the phase message for an event; `None` for `TurnCompleted`
pub fn create_phase(seq: u64, turn_id: u32, event: &PhaseEvent) -> Option<PhaseMessage> {
    let mut msg = PhaseMessage {
        msg_type: PhaseType::Phase,
        seq,
        turn_id,
        phase: event.name().to_string(),
        depth: None,
        interaction: None,
        matched: None,
        removed: None,
        pass_score: None,
        harvested: None,
        board: event.snapshot().map(BoardMessage::from),
    };
    match event {
        PhaseEvent::Swapped { .. } | PhaseEvent::Rejected { .. } => {}
        PhaseEvent::Matched {
            depth,
            interaction,
            matched,
            ..
        } => {
            msg.depth = Some(*depth);
            msg.interaction = interaction.map(|i| i.as_str().to_string());
            msg.matched = Some(matched.iter().copied().map(PositionMessage::from).collect());
        }
        PhaseEvent::Exploded {
            depth,
            removed,
            score,
            ..
        } => {
            msg.depth = Some(*depth);
            msg.removed = Some(*removed);
            msg.pass_score = Some(score.total);
        }
        PhaseEvent::Refilled {
            depth, harvested, ..
        } => {
            msg.depth = Some(*depth);
            msg.harvested = Some(*harvested);
        }
        PhaseEvent::TurnCompleted(_) => return None,
    }
    Some(msg)
}

pub fn create_turn(seq: u64, outcome: &TurnOutcome) -> TurnMessage {
    TurnMessage {
        msg_type: TurnType::Turn,
        seq,
        turn_id: outcome.turn_id,
        swap: outcome
            .swap
            .map(|Swap { a, b }| [PositionMessage::from(a), PositionMessage::from(b)]),
        rejected: outcome.rejected,
        score_delta: outcome.score_delta,
        combo_depth: outcome.combo_depth,
        bonus: outcome.bonus,
        interaction: outcome.interaction.map(|i| i.as_str().to_string()),
        tokens_removed: outcome.tokens_removed,
        specials_created: outcome.specials_created,
        objectives: ObjectivesMessage::from(&outcome.objectives),
        moves_left: outcome.moves_left,
        score: outcome.score,
        terminal: outcome.terminal.map(|end| end.as_str().to_string()),
        reshuffled: outcome.reshuffled,
        board_hash: StateHash(outcome.board_hash),
    }
}

/// `result` defaults to the session's terminal state; pass one for runs stopped early
pub fn create_session_end(seq: u64, session: &Session, stopped: &str) -> SessionEndMessage {
    let result = match session.phase() {
        TurnPhase::SessionOver(end) => end.as_str(),
        _ => stopped,
    };
    SessionEndMessage {
        msg_type: SessionEndType::SessionEnd,
        seq,
        result: result.to_string(),
        score: session.score(),
        turns: session.turn_id(),
        moves_left: session.moves_left(),
        progress: ObjectivesMessage::from(session.progress()),
    }
}

// ============== Event Writer ==============

/// Writes messages as line-delimited JSON and observes turns
///
/// Observer callbacks cannot fail, so the first write error is parked and reported by
/// [`EventWriter::take_error`]; later messages are dropped until it is taken.
pub struct EventWriter<W: Write> {
    out: W,
    mode: EventMode,
    seq: u64,
    turn_id: u32,
    error: Option<io::Error>,
}

impl<W: Write> EventWriter<W> {
    pub fn new(out: W, mode: EventMode) -> Self {
        Self {
            out,
            mode,
            seq: 0,
            turn_id: 1,
            error: None,
        }
    }

    pub fn mode(&self) -> EventMode {
        self.mode
    }

    pub fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn write_message<T: Serialize>(&mut self, msg: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, msg)?;
        self.out.write_all(b"\n")
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit<T: Serialize>(&mut self, msg: &T) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_message(msg) {
            self.error = Some(e);
        }
    }
}

impl<W: Write> TurnObserver for EventWriter<W> {
    fn on_event(&mut self, event: &PhaseEvent) {
        if let PhaseEvent::TurnCompleted(outcome) = event {
            let seq = self.next_seq();
            self.emit(&create_turn(seq, outcome));
            self.turn_id = outcome.turn_id + 1;
            return;
        }
        if self.mode == EventMode::All {
            let seq = self.next_seq();
            if let Some(msg) = create_phase(seq, self.turn_id, event) {
                self.emit(&msg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LevelConfig;

    fn session() -> Session {
        Session::new(LevelConfig::default(), 7).unwrap()
    }

    #[test]
    fn test_state_hash_hex() {
        let json = serde_json::to_string(&StateHash(0xdead_beef)).unwrap();
        assert_eq!(json, "\"00000000deadbeef\"");
        let back: StateHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StateHash(0xdead_beef));
        assert!(serde_json::from_str::<StateHash>("\"xyz\"").is_err());
    }

    #[test]
    fn test_session_start_message() {
        let session = session();
        let msg = create_session_start(1, &session);
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"session_start\""));
        assert!(json.contains("\"seed\":7"));
        assert_eq!(msg.board.rows.len(), 8);
        assert_eq!(msg.board.rows[0].split_whitespace().count(), 8);
        assert_eq!(msg.board.board_hash, StateHash(session.snapshot().board_hash));
    }

    #[test]
    fn test_turn_message_from_outcome() {
        let mut session = session();
        let swap = session.hint().unwrap();
        let outcome = session.play_swap(swap.a, swap.b).unwrap();
        let msg = create_turn(3, &outcome);

        assert_eq!(msg.turn_id, 1);
        assert_eq!(msg.score, session.score());
        assert_eq!(msg.board_hash, StateHash(session.snapshot().board_hash));
        assert!(msg.terminal.is_none());

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"turn\""));
        match parse_message(&json).unwrap() {
            ParsedMessage::Turn(parsed) => assert_eq!(parsed, msg),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_type() {
        let parsed = parse_message(r#"{"type":"heartbeat","seq":9}"#).unwrap();
        assert_eq!(parsed, ParsedMessage::Unknown(UnknownMessage { seq: 9 }));
        assert!(parse_message(r#"{"type":"turn","seq":1}"#).is_err());
    }

    #[test]
    fn test_event_writer_final_mode() {
        let mut session = session();
        let mut writer = EventWriter::new(Vec::new(), EventMode::Final);
        let swap = session.hint().unwrap();
        session
            .play_swap_observed(swap.a, swap.b, &mut writer)
            .unwrap();
        assert!(writer.take_error().is_none());

        let out = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(matches!(parse_message(lines[0]).unwrap(), ParsedMessage::Turn(_)));
    }

    #[test]
    fn test_event_writer_all_mode() {
        let mut session = session();
        let mut writer = EventWriter::new(Vec::new(), EventMode::All);
        let swap = session.hint().unwrap();
        session
            .play_swap_observed(swap.a, swap.b, &mut writer)
            .unwrap();

        let out = String::from_utf8(writer.into_inner()).unwrap();
        let parsed: Vec<_> = out.lines().map(|l| parse_message(l).unwrap()).collect();
        assert!(parsed.len() >= 5);

        match &parsed[0] {
            ParsedMessage::Phase(m) => {
                assert_eq!(m.phase, "swapped");
                assert_eq!(m.seq, 1);
                assert_eq!(m.turn_id, 1);
                assert!(m.board.is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(parsed.last(), Some(ParsedMessage::Turn(_))));
        assert!(parsed
            .iter()
            .any(|m| matches!(m, ParsedMessage::Phase(p) if p.phase == "exploded")));
    }
}
