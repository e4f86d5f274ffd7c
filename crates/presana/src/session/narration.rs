use std::fmt;
use std::time::Duration;

/// Identifies one accepted run. Cues and responses carrying an older token are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunToken(pub(super) u64);

impl fmt::Display for RunToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

/// Cosmetic stagger applied to the transcript. Never affects ordering or outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Delay between the response arriving and the first line.
    pub settle: Duration,
    /// Delay between consecutive lines.
    pub stride: Duration,
    /// Delay between the last line and the report.
    pub trailing: Duration,
}

impl Pacing {
    pub const fn observed() -> Self {
        Self {
            settle: Duration::from_millis(800),
            stride: Duration::from_millis(150),
            trailing: Duration::from_millis(500),
        }
    }

    pub const fn immediate() -> Self {
        Self {
            settle: Duration::ZERO,
            stride: Duration::ZERO,
            trailing: Duration::ZERO,
        }
    }

    pub fn is_immediate(&self) -> bool {
        self.settle.is_zero() && self.stride.is_zero() && self.trailing.is_zero()
    }

    pub fn line_at(&self, index: usize) -> Duration {
        self.settle + self.stride * index as u32
    }

    pub fn conclude_at(&self, line_count: usize) -> Duration {
        self.settle + self.stride * line_count as u32 + self.trailing
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::observed()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueAction<'a> {
    Line(&'a str),
    Conclude,
}

/// A scheduled render step, offset from the moment the response arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cue<'a> {
    pub token: RunToken,
    pub at: Duration,
    pub action: CueAction<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueStatus {
    Applied,
    /// The run this cue belongs to is no longer active.
    Stale,
}

/// Transcript of one run, ready to be played back as cues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration {
    token: RunToken,
    lines: Vec<String>,
}

impl Narration {
    pub(super) fn new(token: RunToken, lines: Vec<String>) -> Self {
        Self { token, lines }
    }

    /// Every line in transcript order followed by one `Conclude`. Each call starts over.
    pub fn cues(&self, pacing: Pacing) -> impl Iterator<Item = Cue<'_>> + '_ {
        let token = self.token;
        self.lines
            .iter()
            .enumerate()
            .map(move |(i, line)| Cue {
                token,
                at: pacing.line_at(i),
                action: CueAction::Line(line),
            })
            .chain(std::iter::once(Cue {
                token,
                at: pacing.conclude_at(self.lines.len()),
                action: CueAction::Conclude,
            }))
    }

    #[cfg(test)]
    pub fn duration(&self, pacing: Pacing) -> Duration {
        pacing.conclude_at(self.lines.len())
    }
}
