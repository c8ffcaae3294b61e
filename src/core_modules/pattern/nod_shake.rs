// THEORY:
// The `NodShakeClassifier` is the top of the classifier stack and the only level the
// application ever hears from. It reuses the back-and-forth pairing unchanged and
// collapses its output by axis: a vertical pair is a `Nod`, a horizontal pair is a
// `Shake`. Single swipes and the directional pair names stay internal.

use super::back_and_forth::BackAndForthClassifier;
use super::{ClassifierState, PatternClassifier, PatternDelegate, PatternType};
use crate::config::ClassifierConfig;
use crate::core_modules::displacement::MovementVector;
use tracing::debug;

/// Emits only `Nod` and `Shake`.
#[derive(Debug, Clone)]
pub struct NodShakeClassifier {
    pairing: BackAndForthClassifier,
}

impl NodShakeClassifier {
    pub fn new(pairing: BackAndForthClassifier) -> Self {
        Self { pairing }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(BackAndForthClassifier::from_config(config))
    }

    /// The swipe waiting for its opposite, if any.
    pub fn pending_leg(&self) -> Option<PatternType> {
        self.pairing.first_leg()
    }
}

impl PatternClassifier for NodShakeClassifier {
    fn process_new_move(&mut self, movement: MovementVector, delegate: &mut dyn PatternDelegate) {
        let mut forward = |combined: PatternType| {
            if let Some(gesture) = combined.nod_or_shake() {
                debug!(%combined, %gesture, "gesture classified");
                delegate.pattern_detected(gesture);
            }
        };
        self.pairing.process_new_move(movement, &mut forward);
    }

    fn reset(&mut self) {
        self.pairing.reset();
    }

    fn state(&self) -> ClassifierState {
        self.pairing.state()
    }

    fn elapsed(&self) -> u32 {
        self.pairing.elapsed()
    }
}
