use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::notifications::Notifier;
use crate::webhooks::EventWebhookService;

/// Domain events emitted by services after successful writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Finance events
    AccountCreated(Uuid),
    AccountUpdated(Uuid),
    AccountDeleted(Uuid),
    JournalEntryPosted {
        transaction_id: Uuid,
        line_count: usize,
        total_debit: Decimal,
    },
    PayableCreated(Uuid),
    PayableStatusChanged {
        payable_id: Uuid,
        old_status: String,
        new_status: String,
    },
    PaymentRecorded {
        payable_id: Uuid,
        amount: Decimal,
    },

    // Procurement events
    VendorCreated(Uuid),
    VendorUpdated(Uuid),
    PurchaseOrderCreated(Uuid),
    GoodsReceiptRecorded {
        receipt_id: Uuid,
        purchase_order_id: Uuid,
    },

    // Project events
    ProjectCreated(Uuid),
    ProjectWon {
        project_id: Uuid,
        source_order_id: String,
    },
    ProjectStatusChanged {
        project_id: Uuid,
        old_status: String,
        new_status: String,
    },
    ProjectManagerAssigned {
        project_id: Uuid,
        manager_id: Uuid,
    },
    MilestoneTemplateApplied {
        project_id: Uuid,
        template_id: Uuid,
        milestone_count: usize,
    },
    TaskCreated {
        milestone_id: Uuid,
        task_id: Uuid,
    },

    // Catalog events
    BomReplaced {
        project_id: Uuid,
        line_count: usize,
    },

    // Generic event for custom messages
    Generic {
        message: String,
        timestamp: DateTime<Utc>,
        metadata: serde_json::Value,
    },
}

impl Event {
    /// Short machine-readable name used for webhook payloads and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Event::AccountCreated(_) => "account.created",
            Event::AccountUpdated(_) => "account.updated",
            Event::AccountDeleted(_) => "account.deleted",
            Event::JournalEntryPosted { .. } => "journal.posted",
            Event::PayableCreated(_) => "payable.created",
            Event::PayableStatusChanged { .. } => "payable.status_changed",
            Event::PaymentRecorded { .. } => "payable.payment_recorded",
            Event::VendorCreated(_) => "vendor.created",
            Event::VendorUpdated(_) => "vendor.updated",
            Event::PurchaseOrderCreated(_) => "purchase_order.created",
            Event::GoodsReceiptRecorded { .. } => "goods_receipt.recorded",
            Event::ProjectCreated(_) => "project.created",
            Event::ProjectWon { .. } => "project.won",
            Event::ProjectStatusChanged { .. } => "project.status_changed",
            Event::ProjectManagerAssigned { .. } => "project.manager_assigned",
            Event::MilestoneTemplateApplied { .. } => "project.milestone_template_applied",
            Event::TaskCreated { .. } => "task.created",
            Event::BomReplaced { .. } => "bom.replaced",
            Event::Generic { .. } => "generic",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event, surfacing channel failures to the caller.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event; a full or closed channel is logged and dropped so
    /// the originating write is never rolled back for a telemetry miss.
    pub async fn send_or_log(&self, event: Event) {
        let name = event.name();
        if let Err(err) = self.sender.try_send(event) {
            warn!(event = name, "Dropping event: {}", err);
        }
    }
}

/// Processes incoming events: notifies interested parties and, when
/// configured, delivers the event to the outbound webhook.
pub async fn process_events(
    mut rx: mpsc::Receiver<Event>,
    notifier: Arc<dyn Notifier>,
    webhook: Option<Arc<EventWebhookService>>,
    webhook_url: Option<String>,
) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        info!(event = event.name(), "Processing event");
        crate::metrics::APP_METRICS.record_event(event.name());

        if let Err(e) = notifier.notify(&event).await {
            error!(event = event.name(), "Notification failed: {}", e);
        }

        if let (Some(webhook), Some(url)) = (webhook.as_ref(), webhook_url.as_deref()) {
            if let Err(e) = webhook.deliver(url, &event).await {
                error!(event = event.name(), "Webhook delivery failed: {}", e);
            }
        }
    }

    info!("Event channel closed; processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::LogNotifier;

    #[tokio::test]
    async fn send_or_log_does_not_block_when_channel_is_full() {
        let (tx, _rx) = mpsc::channel(1);
        let sender = EventSender::new(tx);

        sender.send_or_log(Event::AccountCreated(Uuid::new_v4())).await;
        // Second send hits a full channel and is dropped without blocking
        sender.send_or_log(Event::AccountCreated(Uuid::new_v4())).await;
    }

    #[tokio::test]
    async fn process_events_drains_the_channel() {
        let (tx, rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);

        let handle = tokio::spawn(process_events(rx, notifier, None, None));

        sender
            .send(Event::ProjectCreated(Uuid::new_v4()))
            .await
            .unwrap();
        drop(sender);

        handle.await.unwrap();
    }

    #[test]
    fn event_names_are_stable() {
        assert_eq!(
            Event::JournalEntryPosted {
                transaction_id: Uuid::new_v4(),
                line_count: 2,
                total_debit: Decimal::new(100, 0),
            }
            .name(),
            "journal.posted"
        );
        assert_eq!(
            Event::ProjectWon {
                project_id: Uuid::new_v4(),
                source_order_id: "SO-1".into(),
            }
            .name(),
            "project.won"
        );
    }
}
