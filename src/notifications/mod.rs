use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::events::Event;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Seam for delivering notifications about domain events. The default
/// implementation logs the intent; a mail/push/queue integration plugs in
/// here without touching the event loop.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, event: &Event) -> Result<(), NotificationError>;
}

/// Tracing-backed notifier. Records what would be sent and to whom.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, event: &Event) -> Result<(), NotificationError> {
        match event {
            Event::PayableStatusChanged {
                payable_id,
                old_status,
                new_status,
            } => {
                info!(
                    %payable_id,
                    from = %old_status,
                    to = %new_status,
                    "notify finance: payable status changed"
                );
            }
            Event::ProjectWon {
                project_id,
                source_order_id,
            } => {
                info!(
                    %project_id,
                    order = %source_order_id,
                    "notify operations: project won, workspace created"
                );
            }
            Event::MilestoneTemplateApplied {
                project_id,
                milestone_count,
                ..
            } => {
                info!(
                    %project_id,
                    milestones = milestone_count,
                    "notify project team: schedule generated"
                );
            }
            Event::ProjectManagerAssigned {
                project_id,
                manager_id,
            } => {
                info!(
                    %project_id,
                    %manager_id,
                    "notify manager: project assignment"
                );
            }
            other => {
                info!(event = other.name(), "notify subscribers");
            }
        }
        Ok(())
    }
}
