//! Fire-and-forget audit sink. The booking engine reports every committed
//! transition here. The contract is best-effort: implementations swallow
//! and log their own failures rather than propagate them. A lost audit
//! event never rolls back a booking.

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, church_id: Uuid, action: &str, description: &str, metadata: Value);
}

/// Default sink that emits audit events to the tracing pipeline.
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, church_id: Uuid, action: &str, description: &str, metadata: Value) {
        tracing::info!(
            church_id = %church_id,
            action,
            metadata = %metadata,
            "audit: {description}"
        );
    }
}

/// Sink that discards everything; used by tests.
pub struct NullAuditSink;

#[async_trait]
impl AuditSink for NullAuditSink {
    async fn record(&self, _church_id: Uuid, _action: &str, _description: &str, _metadata: Value) {}
}
