//! Opt-in diagnostics threaded through every strategy.

use serde::Serialize;

/// One diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEvent {
    pub stage: &'static str,
    pub message: String,
}

/// Event list for one extraction call. Disabled traces record nothing and
/// never format their messages.
///
/// Notices are kept either way; they become warnings on the result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Trace {
    #[serde(skip)]
    enabled: bool,
    events: Vec<TraceEvent>,
    #[serde(skip)]
    notices: Vec<String>,
}

impl Trace {
    /// A trace that records nothing.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record an event; `message` runs only when tracing is on.
    pub fn record(&mut self, stage: &'static str, message: impl FnOnce() -> String) {
        if self.enabled {
            self.events.push(TraceEvent {
                stage,
                message: message(),
            });
        }
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Record something the caller should double-check in the record.
    pub fn notice(&mut self, stage: &'static str, message: impl Into<String>) {
        let message = message.into();
        if self.enabled {
            self.events.push(TraceEvent {
                stage,
                message: message.clone(),
            });
        }
        self.notices.push(message);
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    /// Drop notices recorded after the first `len`.
    pub fn truncate_notices(&mut self, len: usize) {
        self.notices.truncate(len);
    }

    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_trace_is_silent() {
        let mut trace = Trace::disabled();
        trace.record("scan", || panic!("message built while disabled"));
        assert!(trace.events().is_empty());
    }

    #[test]
    fn test_enabled_trace_keeps_order() {
        let mut trace = Trace::enabled();
        trace.record("annotated", || "skipped".into());
        trace.record("scan", || "accepted".into());
        let stages: Vec<_> = trace.events().iter().map(|e| e.stage).collect();
        assert_eq!(stages, vec!["annotated", "scan"]);
    }

    #[test]
    fn test_notices_survive_disabled_trace() {
        let mut trace = Trace::disabled();
        trace.notice("scan", "codes from whole text");
        assert!(trace.events().is_empty());
        assert_eq!(trace.notices().to_vec(), vec!["codes from whole text".to_string()]);

        trace.truncate_notices(0);
        assert!(trace.take_notices().is_empty());
    }
}
