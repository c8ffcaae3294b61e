// THEORY:
// The `BackAndForthClassifier` pairs two swipes. It runs a `FourDirectionClassifier`
// continuously and works in two phases:
//
// 1.  **First Leg**: every swipe the inner classifier reports becomes the first leg.
//     The pairing window (W2) starts counting from the next move.
// 2.  **Second Leg**: the inner classifier keeps running from scratch. If it reports
//     the exact opposite swipe before W2 runs out, the combined pattern is emitted and
//     everything returns to `Idle`. Any other swipe (a repeat, or the other axis) is
//     not thrown away: it becomes the new first leg and W2 restarts. If W2 runs out
//     with no swipe at all, everything returns to `Idle`.

use super::four_direction::FourDirectionClassifier;
use super::{ClassifierState, PatternClassifier, PatternDelegate, PatternType};
use crate::config::ClassifierConfig;
use crate::core_modules::displacement::MovementVector;
use tracing::trace;

/// Detects UpAndDown, DownAndUp, LeftAndRight and RightAndLeft.
#[derive(Debug, Clone)]
pub struct BackAndForthClassifier {
    /// Swipe detector shared by both legs.
    swipe: FourDirectionClassifier,
    /// Moves allowed between the first leg and the opposite one (W2).
    pairing_window: u32,
    /// The swipe waiting for its opposite, if any.
    first_leg: Option<PatternType>,
    /// Moves processed since the current first leg was recorded.
    time: u32,
}

impl BackAndForthClassifier {
    pub fn new(swipe: FourDirectionClassifier, pairing_window: u32) -> Self {
        Self {
            swipe,
            pairing_window: pairing_window.max(1),
            first_leg: None,
            time: 0,
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(
            FourDirectionClassifier::from_config(config),
            config.pairing_window,
        )
    }

    /// The swipe currently waiting for its opposite.
    pub fn first_leg(&self) -> Option<PatternType> {
        self.first_leg
    }

    fn begin_second_leg(&mut self, first: PatternType) {
        trace!(%first, "first leg recorded");
        self.first_leg = Some(first);
        self.time = 0;
        self.swipe.reset();
    }
}

impl PatternClassifier for BackAndForthClassifier {
    fn process_new_move(&mut self, movement: MovementVector, delegate: &mut dyn PatternDelegate) {
        let mut swiped = None;
        self.swipe
            .process_new_move(movement, &mut |p: PatternType| swiped = Some(p));

        let Some(first) = self.first_leg else {
            if let Some(swipe) = swiped {
                self.begin_second_leg(swipe);
            }
            return;
        };

        self.time += 1;
        if let Some(second) = swiped {
            match PatternType::back_and_forth(first, second) {
                Some(combined) => {
                    trace!(%combined, time = self.time, "back and forth completed");
                    self.reset();
                    delegate.pattern_detected(combined);
                }
                None => self.begin_second_leg(second),
            }
            return;
        }

        if self.time >= self.pairing_window {
            trace!(%first, "pairing window expired");
            self.reset();
        }
    }

    fn reset(&mut self) {
        self.swipe.reset();
        self.first_leg = None;
        self.time = 0;
    }

    fn state(&self) -> ClassifierState {
        if self.first_leg.is_some() {
            ClassifierState::AwaitingSecondLeg
        } else {
            self.swipe.state()
        }
    }

    fn elapsed(&self) -> u32 {
        if self.first_leg.is_some() {
            self.time
        } else {
            self.swipe.elapsed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pattern::replay;

    const STILL: MovementVector = MovementVector::ZERO;

    fn classifier() -> BackAndForthClassifier {
        // Four moves of 5 px complete a swipe; the opposite leg has 8 moves.
        BackAndForthClassifier::new(FourDirectionClassifier::new(20.0, 10), 8)
    }

    fn swipe(direction: PatternType) -> Vec<MovementVector> {
        let step = match direction {
            PatternType::Up => MovementVector::new(0.0, -5.0),
            PatternType::Down => MovementVector::new(0.0, 5.0),
            PatternType::Left => MovementVector::new(-5.0, 0.0),
            PatternType::Right => MovementVector::new(5.0, 0.0),
            other => panic!("not a direction: {other}"),
        };
        vec![step; 4]
    }

    fn still(count: usize) -> Vec<MovementVector> {
        vec![STILL; count]
    }

    #[test]
    fn opposite_swipes_pair_up() {
        let mut classifier = classifier();
        let mut moves = swipe(PatternType::Up);
        moves.extend(swipe(PatternType::Down));
        assert_eq!(replay(&mut classifier, moves), vec![PatternType::UpAndDown]);
        assert_eq!(classifier.state(), ClassifierState::Idle);
        assert_eq!(classifier.elapsed(), 0);
    }

    #[test]
    fn every_axis_order_has_its_own_pattern() {
        let cases = [
            (PatternType::Down, PatternType::Up, PatternType::DownAndUp),
            (PatternType::Left, PatternType::Right, PatternType::LeftAndRight),
            (PatternType::Right, PatternType::Left, PatternType::RightAndLeft),
        ];
        for (first, second, expected) in cases {
            let mut classifier = classifier();
            let mut moves = swipe(first);
            moves.extend(swipe(second));
            assert_eq!(replay(&mut classifier, moves), vec![expected]);
        }
    }

    #[test]
    fn first_leg_moves_to_awaiting_state() {
        let mut classifier = classifier();
        assert!(replay(&mut classifier, swipe(PatternType::Left)).is_empty());
        assert_eq!(classifier.state(), ClassifierState::AwaitingSecondLeg);
        assert_eq!(classifier.first_leg(), Some(PatternType::Left));
        assert_eq!(classifier.elapsed(), 0);

        replay(&mut classifier, still(3));
        assert_eq!(classifier.elapsed(), 3);
    }

    #[test]
    fn repeated_swipe_becomes_new_first_leg() {
        let mut classifier = classifier();
        let mut moves = swipe(PatternType::Up);
        moves.extend(swipe(PatternType::Up));
        assert!(replay(&mut classifier, moves).is_empty());
        assert_eq!(classifier.first_leg(), Some(PatternType::Up));
        assert_eq!(classifier.elapsed(), 0);

        assert_eq!(
            replay(&mut classifier, swipe(PatternType::Down)),
            vec![PatternType::UpAndDown]
        );
    }

    #[test]
    fn perpendicular_swipe_restarts_pairing_on_its_axis() {
        let mut classifier = classifier();
        let mut moves = swipe(PatternType::Up);
        moves.extend(swipe(PatternType::Right));
        moves.extend(swipe(PatternType::Left));
        assert_eq!(replay(&mut classifier, moves), vec![PatternType::RightAndLeft]);
    }

    #[test]
    fn opposite_leg_after_window_is_not_paired() {
        let mut classifier = classifier();
        let mut moves = swipe(PatternType::Up);
        moves.extend(still(8));
        assert!(replay(&mut classifier, moves).is_empty());
        assert_eq!(classifier.state(), ClassifierState::Idle);
        assert_eq!(classifier.elapsed(), 0);

        assert!(replay(&mut classifier, swipe(PatternType::Down)).is_empty());
        assert_eq!(classifier.first_leg(), Some(PatternType::Down));
    }

    #[test]
    fn opposite_leg_on_last_move_of_window_counts() {
        let mut classifier = classifier();
        let mut moves = swipe(PatternType::Right);
        moves.extend(still(4));
        moves.extend(swipe(PatternType::Left));
        assert_eq!(replay(&mut classifier, moves), vec![PatternType::RightAndLeft]);
    }

    #[test]
    fn reset_clears_pending_first_leg() {
        let mut classifier = classifier();
        replay(&mut classifier, swipe(PatternType::Down));
        classifier.reset();
        assert_eq!(classifier.state(), ClassifierState::Idle);
        assert!(replay(&mut classifier, swipe(PatternType::Up)).is_empty());
    }
}
