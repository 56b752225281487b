//! Replaying recorded event logs through the view store.
//!
//! A log is newline-delimited JSON, one `{"type", "payload"}` envelope per
//! line. Blank lines and lines starting with `#` are ignored.

use std::io::BufRead;

use thiserror::Error;

use crate::store::ViewStore;
use crate::view::{EventError, ViewEvent};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read event log at line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid event at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: EventError,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Log and skip unparseable lines instead of failing.
    pub skip_invalid: bool,
    /// Applied as a row-limit event before the log.
    pub sql_limit: Option<u32>,
}

/// Outcome counts of a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayStats {
    pub applied: usize,
    pub skipped: usize,
    pub unrecognized: usize,
}

/// Feed every event in `reader` to `store`, in file order.
pub fn replay<R: BufRead>(
    reader: R,
    store: &mut ViewStore,
    options: &ReplayOptions,
) -> Result<ReplayStats, ReplayError> {
    let mut stats = ReplayStats::default();

    if let Some(limit) = options.sql_limit {
        store.dispatch(ViewEvent::SetSqlLimit { limit });
    }

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| ReplayError::Io {
            line: line_no,
            source,
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let event = match ViewEvent::from_json(trimmed) {
            Ok(event) => event,
            Err(source) if options.skip_invalid => {
                tracing::warn!(line = line_no, error = %source, "Skipping invalid event");
                stats.skipped += 1;
                continue;
            }
            Err(source) => {
                return Err(ReplayError::Parse {
                    line: line_no,
                    source,
                })
            }
        };

        if let ViewEvent::Unrecognized { kind } = &event {
            tracing::debug!(line = line_no, kind = %kind, "Event not handled by view slice");
            stats.unrecognized += 1;
        }
        store.dispatch(event);
        stats.applied += 1;
    }

    tracing::info!(
        applied = stats.applied,
        skipped = stats.skipped,
        unrecognized = stats.unrecognized,
        "Replay finished"
    );
    Ok(stats)
}
