//! Posterior normalization and the decision rule

use feature_engine::SignalClass;
use serde::{Deserialize, Serialize};

/// Class posteriors for one observation
///
/// Raw values are prior × likelihood. [`Posterior::normalized`] divides by
/// the evidence and scales to percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Posterior {
    pub silence: f64,
    pub speech: f64,
}

impl Posterior {
    /// Create from raw posteriors
    pub fn new(silence: f64, speech: f64) -> Self {
        Self { silence, speech }
    }

    /// Sum of both posteriors
    pub fn evidence(&self) -> f64 {
        self.silence + self.speech
    }

    /// Posteriors as percentages of the evidence
    ///
    /// `None` when the evidence is zero or not finite.
    pub fn normalized(&self) -> Option<Posterior> {
        let evidence = self.evidence();
        if !(evidence.is_finite() && evidence > 0.0) {
            return None;
        }

        Some(Posterior {
            silence: self.silence / evidence * 100.0,
            speech: self.speech / evidence * 100.0,
        })
    }

    /// Class with the strictly larger normalized posterior
    ///
    /// Ties and undefined evidence yield `None`, so neither class is awarded.
    pub fn decide(&self) -> Option<SignalClass> {
        let normalized = self.normalized()?;
        if normalized.silence > normalized.speech {
            Some(SignalClass::Silence)
        } else if normalized.speech > normalized.silence {
            Some(SignalClass::Speech)
        } else {
            None
        }
    }

    /// Whether an observation of `truth` is classified correctly
    pub fn is_correct(&self, truth: SignalClass) -> bool {
        self.decide() == Some(truth)
    }
}
