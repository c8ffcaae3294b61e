// THEORY:
// The `pattern` module is the behavioral layer of the engine. It turns the smoothed
// stream of movement vectors into discrete gestures, one timed state machine per
// level of abstraction:
//
// 1.  `FourDirectionClassifier` recognises a single-axis swipe (Up/Down/Left/Right).
// 2.  `BackAndForthClassifier` pairs two opposite swipes into a combined pattern.
// 3.  `NodShakeClassifier` collapses the vertical pairs into `Nod` and the horizontal
//     pairs into `Shake`; it is the only level an application observes.
//
// Each level owns the level below it (composition, not inheritance) and they all
// speak the same `PatternClassifier` contract: advance by one move, report
// completed patterns through a borrowed delegate, reset on completion or timeout.
// The delegate is passed per call and never stored, so a classifier can never
// outlive or dangle on its observer.

pub mod back_and_forth;
pub mod four_direction;
pub mod nod_shake;

use crate::core_modules::displacement::MovementVector;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use back_and_forth::BackAndForthClassifier;
pub use four_direction::FourDirectionClassifier;
pub use nod_shake::NodShakeClassifier;

/// Every pattern any classifier level can emit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternType {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
    UpAndDown,
    DownAndUp,
    LeftAndRight,
    RightAndLeft,
    Nod,
    Shake,
}

impl PatternType {
    /// The four single-axis swipes.
    pub const DIRECTIONS: [PatternType; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn is_vertical(self) -> bool {
        matches!(
            self,
            Self::Up | Self::Down | Self::UpAndDown | Self::DownAndUp | Self::Nod
        )
    }

    pub fn is_horizontal(self) -> bool {
        matches!(
            self,
            Self::Left | Self::Right | Self::LeftAndRight | Self::RightAndLeft | Self::Shake
        )
    }

    /// The reverse swipe, for single directions only.
    pub fn opposite(self) -> Option<PatternType> {
        match self {
            Self::Up => Some(Self::Down),
            Self::Down => Some(Self::Up),
            Self::Left => Some(Self::Right),
            Self::Right => Some(Self::Left),
            _ => None,
        }
    }

    /// The combined pattern for `first` followed by `second`, if they are opposite.
    pub fn back_and_forth(first: PatternType, second: PatternType) -> Option<PatternType> {
        match (first, second) {
            (Self::Up, Self::Down) => Some(Self::UpAndDown),
            (Self::Down, Self::Up) => Some(Self::DownAndUp),
            (Self::Left, Self::Right) => Some(Self::LeftAndRight),
            (Self::Right, Self::Left) => Some(Self::RightAndLeft),
            _ => None,
        }
    }

    /// `Nod` for vertical back-and-forth patterns, `Shake` for horizontal ones.
    pub fn nod_or_shake(self) -> Option<PatternType> {
        match self {
            Self::UpAndDown | Self::DownAndUp => Some(Self::Nod),
            Self::LeftAndRight | Self::RightAndLeft => Some(Self::Shake),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
            Self::UpAndDown => "up-and-down",
            Self::DownAndUp => "down-and-up",
            Self::LeftAndRight => "left-and-right",
            Self::RightAndLeft => "right-and-left",
            Self::Nod => "nod",
            Self::Shake => "shake",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse state shared by all classifier levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassifierState {
    /// No pattern in progress; the time counter is zero.
    #[default]
    Idle,
    /// Moves are being accumulated toward a first pattern.
    Accumulating,
    /// A first leg was seen and the opposite leg is awaited.
    AwaitingSecondLeg,
}

/// Receives completed patterns.
pub trait PatternDelegate {
    fn pattern_detected(&mut self, pattern: PatternType);
}

impl<F: FnMut(PatternType)> PatternDelegate for F {
    fn pattern_detected(&mut self, pattern: PatternType) {
        self(pattern)
    }
}

/// The timed state machine contract every classifier level implements.
pub trait PatternClassifier {
    /// Advances the machine by one move. A completed pattern is reported to
    /// `delegate` exactly once and the machine returns to `Idle`.
    fn process_new_move(&mut self, movement: MovementVector, delegate: &mut dyn PatternDelegate);

    /// Returns to `Idle` with a zero time counter.
    fn reset(&mut self);

    fn state(&self) -> ClassifierState;

    /// Moves processed since leaving `Idle` (or since the current phase started).
    fn elapsed(&self) -> u32;
}

/// Feeds `moves` in order and collects every emission. Handy for tests and replays.
pub fn replay<C: PatternClassifier + ?Sized>(
    classifier: &mut C,
    moves: impl IntoIterator<Item = MovementVector>,
) -> Vec<PatternType> {
    let mut detected: Vec<PatternType> = Vec::new();
    for movement in moves {
        classifier.process_new_move(movement, &mut |p: PatternType| detected.push(p));
    }
    detected
}
