/// Run state definitions for one scrape invocation
use std::fmt;

/// Represents the current stage of a scrape run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    // ===== Active States =====
    /// Run created, nothing fetched yet
    Init,

    /// Resolving the listing page (static fetch, then rendered fallback)
    Fetching,

    /// Discovering course links in the listing HTML
    Extracting,

    /// Enriching the course at `index` (zero-based)
    Enriching { index: usize, total: usize },

    // ===== Terminal States =====
    /// Records handed to the output sink
    Done,

    /// Run stopped without writing output
    Aborted,
}

impl RunState {
    /// Returns true if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: RunState) -> bool {
        match (*self, next) {
            (Self::Init, Self::Fetching) => true,
            (Self::Fetching, Self::Extracting | Self::Aborted) => true,
            (Self::Extracting, Self::Aborted) => true,
            (Self::Extracting, Self::Enriching { index: 0, total }) => total > 0,
            (
                Self::Enriching { index, total },
                Self::Enriching {
                    index: next_index,
                    total: next_total,
                },
            ) => next_total == total && next_index == index + 1 && next_index < total,
            (Self::Enriching { index, total }, Self::Done) => index + 1 == total,
            _ => false,
        }
    }

    /// Short label used in log lines
    pub fn label(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Fetching => "fetching",
            Self::Extracting => "extracting",
            Self::Enriching { .. } => "enriching",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enriching { index, total } => {
                write!(f, "enriching({}/{})", index + 1, total)
            }
            other => write!(f, "{}", other.label()),
        }
    }
}
