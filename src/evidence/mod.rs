//! Evidence recording for scenario reports.
//!
//! Step handlers and assertion helpers push labelled comparisons and
//! free-form notes into an [`EvidenceSink`]. Recording is side-effect only:
//! sinks never return errors and never influence whether a scenario passes.
//! A sink that cannot write logs the failure with `tracing` and carries on.

mod sinks;

pub use sinks::{JsonLinesSink, MemorySink, TeeSink, TracingSink};

use itertools::Itertools;
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;

/// Destination for scenario evidence.
///
/// Implementations must tolerate concurrent writers because scenarios may be
/// dispatched to worker threads while sharing one sink.
pub trait EvidenceSink: Send + Sync {
    /// Record a titled note.
    fn record(&self, title: &str, content: &str);

    /// Record a labelled expected/actual comparison.
    fn compare(&self, label: &str, expected: &str, actual: &str);
}

/// Shared handle to an evidence sink.
pub type Reporter = Arc<dyn EvidenceSink>;

/// One recorded evidence entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evidence {
    /// Free-form note.
    Note {
        /// Section title.
        title: String,
        /// Section body.
        content: String,
    },
    /// Expected/actual comparison.
    Comparison {
        /// Field or check label.
        label: String,
        /// Rendered expected value.
        expected: String,
        /// Rendered actual value.
        actual: String,
    },
}

impl Evidence {
    /// Title of a note or label of a comparison.
    #[must_use]
    pub fn heading(&self) -> &str {
        match self {
            Self::Note { title, .. } => title,
            Self::Comparison { label, .. } => label,
        }
    }
}

/// Record `key: value` lines under `title`.
///
/// ```rust
/// use petstore_bdd::evidence::{Evidence, MemorySink, record_entries};
///
/// let sink = MemorySink::default();
/// record_entries(&sink, "Order", [("Pet ID", 12), ("Quantity", 2)]);
/// assert_eq!(
///     sink.entries(),
///     vec![Evidence::Note {
///         title: "Order".into(),
///         content: "Pet ID: 12\nQuantity: 2".into(),
///     }],
/// );
/// ```
pub fn record_entries<K, V, I>(sink: &dyn EvidenceSink, title: &str, entries: I)
where
    K: Display,
    V: Display,
    I: IntoIterator<Item = (K, V)>,
{
    let content = entries
        .into_iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .join("\n");
    sink.record(title, &content);
}

#[cfg(test)]
mod tests;
