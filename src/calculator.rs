use crate::{
    search::{NextRun, NoMatch, SearchHorizon},
    ReferenceInstant, Schedule,
};
use tracing::debug;

/// Calculation session: evaluates many schedules against one pinned reference instant.
///
/// The reference stays the same until one of the `reinitialize` methods is called,
/// so all results of the session are consistent with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Calculator {
    reference: ReferenceInstant,
    #[cfg_attr(feature = "serde", serde(default))]
    horizon: SearchHorizon,
}

impl Calculator {
    /// Starts session with the current wall clock time of the host as a reference.
    #[cfg(feature = "clock")]
    pub fn new() -> Self {
        Self::with_reference(ReferenceInstant::capture())
    }

    /// Starts session with explicitly provided `reference`.
    pub fn with_reference(reference: ReferenceInstant) -> Self {
        Self {
            reference,
            horizon: SearchHorizon::default(),
        }
    }

    /// Replaces default search horizon.
    pub fn with_horizon(mut self, horizon: SearchHorizon) -> Self {
        self.horizon = horizon;
        self
    }

    /// Re-captures the reference from the host wall clock.
    #[cfg(feature = "clock")]
    pub fn reinitialize(&mut self) {
        self.reinitialize_at(ReferenceInstant::capture());
    }

    /// Pins the session to another `reference`.
    pub fn reinitialize_at(&mut self, reference: ReferenceInstant) {
        debug!(from = %self.reference, to = %reference, "reference instant changed");
        self.reference = reference;
    }

    /// Current reference instant of the session.
    #[inline]
    pub fn reference(&self) -> ReferenceInstant {
        self.reference
    }

    /// Search horizon of the session.
    #[inline]
    pub fn horizon(&self) -> SearchHorizon {
        self.horizon
    }

    /// Calculates next run of the crontab `line` against the session reference.
    ///
    /// Never fails: unparsable line results in [`NoMatch::Malformed`].
    pub fn next_run(&self, line: &str) -> NextRun {
        match Schedule::new(line) {
            Ok(schedule) => schedule.next_run_within(&self.reference, self.horizon),
            Err(_) => NoMatch::Malformed.into(),
        }
    }
}

#[cfg(feature = "clock")]
impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}
