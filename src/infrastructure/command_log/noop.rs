//! No-op command persistence for sessions without an endpoint

use async_trait::async_trait;

use crate::application::ports::{CommandLog, CommandRecord, PersistenceError};

/// Command log that silently discards every record
pub struct NoopCommandLog;

impl NoopCommandLog {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoopCommandLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandLog for NoopCommandLog {
    async fn record(&self, _record: &CommandRecord) -> Result<(), PersistenceError> {
        Ok(())
    }
}
