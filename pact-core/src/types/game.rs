//! Commit-reveal game records.
//!
//! A game moves through `Open -> ChoosePlay -> RevealPlay -> GameOver`. Each
//! step completes only when every registered player has acted. A game that
//! stalls before `GameOver` can be moved to the terminal `Abandoned` phase.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// A rock-paper-scissors move.
///
/// Stored on the ledger as its integer value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Move {
    /// 0
    Rock,
    /// 1
    Paper,
    /// 2
    Scissors,
}

impl Move {
    /// Integer value of the move.
    pub const fn as_u8(self) -> u8 {
        match self {
            Move::Rock => 0,
            Move::Paper => 1,
            Move::Scissors => 2,
        }
    }

    /// Parse a move from its integer value.
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Move::Rock),
            1 => Some(Move::Paper),
            2 => Some(Move::Scissors),
            _ => None,
        }
    }

    /// `self` beats `other` when `(3 + self - other) mod 3 == 1`.
    pub fn beats(self, other: Move) -> bool {
        (3 + self.as_u8() - other.as_u8()) % 3 == 1
    }
}

impl From<Move> for u8 {
    fn from(m: Move) -> u8 {
        m.as_u8()
    }
}

impl TryFrom<u8> for Move {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Move::from_value(value as i64).ok_or_else(|| format!("move {} out of range 0..=2", value))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Rock => "rock",
            Move::Paper => "paper",
            Move::Scissors => "scissors",
        };
        f.write_str(name)
    }
}

/// Phase of a game.
///
/// Declaration order is the only allowed direction of travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Accepting players.
    Open,
    /// Players submit commitments.
    ChoosePlay,
    /// Players open their commitments.
    RevealPlay,
    /// All moves revealed; the outcome can be determined.
    GameOver,
    /// Stalled game closed without an outcome.
    Abandoned,
}

impl GamePhase {
    /// `GameOver` and `Abandoned` accept no further moves.
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Abandoned)
    }
}

/// What a player has submitted so far.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerMove {
    /// Joined, nothing submitted yet.
    Unset,
    /// Lower-case hex SHA-256 of `choice ++ nonce`, opaque until revealed.
    Committed(String),
    /// Commitment opened.
    Revealed(Move),
}

/// A registered player and their submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSlot {
    /// The player's identity.
    pub player: Identity,
    /// Current submission.
    pub play: PlayerMove,
}

/// Resolved result of a finished game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameOutcome {
    /// A single player won.
    Winner(Identity),
    /// Tie, or no unique winner.
    NoWinner,
}

impl GameOutcome {
    /// The winning identity, if any.
    pub fn winner(&self) -> Option<&Identity> {
        match self {
            GameOutcome::Winner(id) => Some(id),
            GameOutcome::NoWinner => None,
        }
    }
}

/// A commit-reveal game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Identifier derived from the creating transaction.
    pub game_id: String,

    /// Identity that created the game.
    pub creator: Identity,

    /// Transaction timestamp at creation.
    pub created_at: u64,

    /// Number of players needed before play starts.
    pub required_players: u8,

    /// Registered players, in join order.
    pub players: Vec<PlayerSlot>,

    /// Current phase.
    pub phase: GamePhase,

    /// Timestamp at which the current phase was entered.
    pub phase_started_at: u64,

    /// Recorded outcome. Set once, by the resolve transition.
    pub outcome: Option<GameOutcome>,

    /// Timestamp of the resolve transition.
    pub resolved_at: Option<u64>,
}

impl GameRecord {
    /// Create a game accepting `required_players` players.
    pub fn new(game_id: String, creator: Identity, required_players: u8, now: u64) -> Self {
        Self {
            game_id,
            creator,
            created_at: now,
            required_players,
            players: Vec::with_capacity(required_players as usize),
            phase: GamePhase::Open,
            phase_started_at: now,
            outcome: None,
            resolved_at: None,
        }
    }

    /// Whether `id` is registered in this game.
    pub fn is_player(&self, id: &Identity) -> bool {
        self.players.iter().any(|slot| &slot.player == id)
    }

    /// The slot belonging to `id`.
    pub fn slot_mut(&mut self, id: &Identity) -> Option<&mut PlayerSlot> {
        self.players.iter_mut().find(|slot| &slot.player == id)
    }

    /// Whether the game has its full complement of players.
    pub fn is_full(&self) -> bool {
        self.players.len() >= self.required_players as usize
    }

    /// Every player has submitted a commitment (or already revealed).
    pub fn all_committed(&self) -> bool {
        self.is_full()
            && self
                .players
                .iter()
                .all(|slot| !matches!(slot.play, PlayerMove::Unset))
    }

    /// Every player has revealed an in-range move.
    pub fn all_revealed(&self) -> bool {
        self.is_full()
            && self
                .players
                .iter()
                .all(|slot| matches!(slot.play, PlayerMove::Revealed(_)))
    }

    /// Move to a later phase. Returns false, leaving the record untouched,
    /// if `next` is not strictly after the current phase.
    pub fn advance(&mut self, next: GamePhase, now: u64) -> bool {
        if next <= self.phase {
            return false;
        }
        self.phase = next;
        self.phase_started_at = now;
        true
    }

    /// Earliest timestamp at which the current phase counts as stalled.
    pub fn stalled_at(&self, stall_window: u64) -> u64 {
        self.phase_started_at.saturating_add(stall_window)
    }

    /// Compute the outcome from revealed moves, or `None` while any player
    /// has not revealed.
    pub fn compute_outcome(&self) -> Option<GameOutcome> {
        let mut moves = Vec::with_capacity(self.players.len());
        for slot in &self.players {
            match slot.play {
                PlayerMove::Revealed(m) => moves.push((&slot.player, m)),
                _ => return None,
            }
        }
        Some(resolve_moves(&moves))
    }
}

/// Decide a game from revealed moves in join order.
///
/// With two players holding moves `a` and `b`, `r = (3 + a - b) mod 3`:
/// `r == 1` means the first player wins, `r == 2` the second, `r == 0` is a
/// tie. With more players, a winner exists only when exactly two distinct
/// moves were played and a single player holds the beating one.
pub fn resolve_moves(moves: &[(&Identity, Move)]) -> GameOutcome {
    let mut distinct: Vec<Move> = Vec::with_capacity(3);
    for (_, m) in moves {
        if !distinct.contains(m) {
            distinct.push(*m);
        }
    }
    if distinct.len() != 2 {
        return GameOutcome::NoWinner;
    }

    let winning = if distinct[0].beats(distinct[1]) {
        distinct[0]
    } else {
        distinct[1]
    };

    let mut winners = moves.iter().filter(|(_, m)| *m == winning);
    match (winners.next(), winners.next()) {
        (Some((id, _)), None) => GameOutcome::Winner((*id).clone()),
        _ => GameOutcome::NoWinner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> Identity {
        Identity::from_bytes(name.as_bytes().to_vec())
    }

    fn two_player(a: Move, b: Move) -> GameOutcome {
        let p0 = id("p0");
        let p1 = id("p1");
        resolve_moves(&[(&p0, a), (&p1, b)])
    }

    #[test]
    fn test_beats_is_cyclic() {
        assert!(Move::Paper.beats(Move::Rock));
        assert!(Move::Scissors.beats(Move::Paper));
        assert!(Move::Rock.beats(Move::Scissors));
        assert!(!Move::Rock.beats(Move::Paper));
        assert!(!Move::Rock.beats(Move::Rock));
    }

    #[test]
    fn test_two_player_formula() {
        for a in [Move::Rock, Move::Paper, Move::Scissors] {
            for b in [Move::Rock, Move::Paper, Move::Scissors] {
                let r = (3 + a.as_u8() - b.as_u8()) % 3;
                let expected = match r {
                    1 => GameOutcome::Winner(id("p0")),
                    2 => GameOutcome::Winner(id("p1")),
                    _ => GameOutcome::NoWinner,
                };
                assert_eq!(two_player(a, b), expected, "moves ({}, {})", a, b);
            }
        }
    }

    #[test]
    fn test_rock_beats_scissors() {
        assert_eq!(two_player(Move::Rock, Move::Scissors), GameOutcome::Winner(id("p0")));
        assert_eq!(two_player(Move::Scissors, Move::Rock), GameOutcome::Winner(id("p1")));
    }

    #[test]
    fn test_three_player_resolution() {
        let (a, b, c) = (id("a"), id("b"), id("c"));

        // All three moves present: no winner
        let all = [(&a, Move::Rock), (&b, Move::Paper), (&c, Move::Scissors)];
        assert_eq!(resolve_moves(&all), GameOutcome::NoWinner);

        // Single paper against two rocks: paper wins
        let single = [(&a, Move::Rock), (&b, Move::Paper), (&c, Move::Rock)];
        assert_eq!(resolve_moves(&single), GameOutcome::Winner(b.clone()));

        // Two papers against one rock: no unique winner
        let shared = [(&a, Move::Paper), (&b, Move::Paper), (&c, Move::Rock)];
        assert_eq!(resolve_moves(&shared), GameOutcome::NoWinner);
    }

    #[test]
    fn test_move_stored_as_integer() {
        assert_eq!(serde_json::to_string(&Move::Scissors).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Move>("1").unwrap(), Move::Paper);
        assert!(serde_json::from_str::<Move>("3").is_err());
    }

    #[test]
    fn test_phase_only_advances() {
        let mut game = GameRecord::new("g".into(), id("c"), 2, 100);
        assert!(game.advance(GamePhase::ChoosePlay, 110));
        assert_eq!(game.phase_started_at, 110);
        assert!(!game.advance(GamePhase::Open, 120));
        assert!(!game.advance(GamePhase::ChoosePlay, 120));
        assert_eq!(game.phase, GamePhase::ChoosePlay);
        assert_eq!(game.phase_started_at, 110);
    }

    #[test]
    fn test_completion_predicates() {
        let mut game = GameRecord::new("g".into(), id("c"), 2, 0);
        game.players.push(PlayerSlot {
            player: id("a"),
            play: PlayerMove::Committed("00".into()),
        });
        // Not full yet
        assert!(!game.all_committed());

        game.players.push(PlayerSlot {
            player: id("b"),
            play: PlayerMove::Unset,
        });
        assert!(!game.all_committed());

        game.slot_mut(&id("b")).unwrap().play = PlayerMove::Revealed(Move::Rock);
        assert!(game.all_committed());
        assert!(!game.all_revealed());
        assert_eq!(game.compute_outcome(), None);
    }
}
