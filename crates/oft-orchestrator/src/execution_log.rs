use chrono::Utc;
use oft_models::{ExecutionLogEntry, Phase};
use tracing::{info, warn};
use uuid::Uuid;

/// Chronological trace of one workflow invocation. Every entry is also emitted through `tracing`.
#[derive(Debug)]
pub struct ExecutionLog {
    request_id: Uuid,
    entries: Vec<ExecutionLogEntry>,
}

impl ExecutionLog {
    pub fn new(request_id: Uuid) -> Self {
        Self {
            request_id,
            entries: Vec::new(),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn record(&mut self, phase: Phase, chain: Option<&str>, message: impl Into<String>) {
        let message = message.into();
        info!(
            request_id = %self.request_id,
            %phase,
            chain = chain.unwrap_or("-"),
            "{message}"
        );
        self.push(phase, chain, message);
    }

    pub fn record_failure(&mut self, phase: Phase, chain: Option<&str>, message: impl Into<String>) {
        let message = message.into();
        warn!(
            request_id = %self.request_id,
            %phase,
            chain = chain.unwrap_or("-"),
            "{message}"
        );
        self.push(phase, chain, message);
    }

    fn push(&mut self, phase: Phase, chain: Option<&str>, message: String) {
        self.entries.push(ExecutionLogEntry {
            timestamp: Utc::now(),
            phase,
            chain: chain.map(str::to_string),
            message,
        });
    }

    pub fn into_entries(self) -> Vec<ExecutionLogEntry> {
        self.entries
    }
}
