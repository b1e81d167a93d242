//! Situational context selecting which weight row applies.

use std::fmt;

/// The situational flags a caller supplies with every destination query.
///
/// The enumeration mirrors the five weight rows each location carries:
/// one for the very first move of the day, and one per combination of
/// peak-period flag and visit-quota status.  `quota_met` is derived by the
/// caller from the agent's history length against its role's threshold.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Context {
    /// First move after spawning at the role's start location.
    Start,
    /// Inside the peak window (the lunch hour).
    Peak { quota_met: bool },
    /// Outside the peak window.
    OffPeak { quota_met: bool },
}

impl Context {
    /// All five context values, in table order.
    pub const ALL: [Context; 5] = [
        Context::Start,
        Context::Peak { quota_met: false },
        Context::Peak { quota_met: true },
        Context::OffPeak { quota_met: false },
        Context::OffPeak { quota_met: true },
    ];

    /// The label used in weight-table CSV files.
    pub fn label(self) -> &'static str {
        match self {
            Context::Start => "start",
            Context::Peak { quota_met: false } => "peak",
            Context::Peak { quota_met: true } => "peak_done",
            Context::OffPeak { quota_met: false } => "offpeak",
            Context::OffPeak { quota_met: true } => "offpeak_done",
        }
    }

    /// Inverse of [`label`](Self::label).
    pub fn parse(s: &str) -> Option<Context> {
        Context::ALL.into_iter().find(|c| c.label() == s)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
