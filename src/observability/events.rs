//! Observable events
//!
//! Every log line the pipeline emits at info level or above carries one of
//! these names in its `event` field, so runs can be followed by grepping a
//! stable token rather than a message.

use std::fmt;

/// Observable events in a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded and validated
    ConfigLoaded,

    // Run lifecycle
    /// Run started
    RunStart,
    /// Run finished successfully
    RunComplete,
    /// Run failed; nothing was written
    RunFailed,

    // Source
    /// Object key resolved
    SourceResolved,
    /// Object bytes read
    SourceFetched,
    /// Object decoded into records
    RecordsDecoded,

    // Load
    /// Transaction committed
    LoadCommitted,
    /// Load failed and the transaction (if any) was rolled back
    LoadAborted,
    /// Dry run mapped every record
    DryRunComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::RunStart => "RUN_BEGIN",
            Event::RunComplete => "RUN_COMPLETE",
            Event::RunFailed => "RUN_FAILED",

            Event::SourceResolved => "SOURCE_RESOLVED",
            Event::SourceFetched => "SOURCE_FETCHED",
            Event::RecordsDecoded => "RECORDS_DECODED",

            Event::LoadCommitted => "LOAD_COMMITTED",
            Event::LoadAborted => "LOAD_ROLLED_BACK",
            Event::DryRunComplete => "DRY_RUN_COMPLETE",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_upper_snake() {
        let events = [
            Event::ConfigLoaded,
            Event::RunStart,
            Event::RunComplete,
            Event::RunFailed,
            Event::SourceResolved,
            Event::SourceFetched,
            Event::RecordsDecoded,
            Event::LoadCommitted,
            Event::LoadAborted,
            Event::DryRunComplete,
        ];
        for event in events {
            let name = event.as_str();
            assert!(name.chars().all(|c| c.is_ascii_uppercase() || c == '_'), "{}", name);
        }
    }
}
