//! Notification dispatcher.
//!
//! [`NotificationDispatcher`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and writes an in-app notification for the citizen who filed the complaint.
//! It only reads complaints; nothing here feeds back into the status workflow.

use janasamparka_core::complaint::AssignmentType;
use janasamparka_db::models::complaint::Complaint;
use janasamparka_db::models::notification::CreateNotification;
use janasamparka_db::repositories::{ComplaintRepo, NotificationRepo};
use janasamparka_db::DbPool;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio_util::sync::CancellationToken;

use crate::bus::{ComplaintEvent, COMPLAINT_CREATED, WORK_REJECTED};

/// Background service that turns complaint events into notification rows.
pub struct NotificationDispatcher;

impl NotificationDispatcher {
    /// Run the dispatch loop.
    ///
    /// Exits when `cancel` fires (after draining events already buffered) or
    /// when the bus is dropped.
    pub async fn run(
        pool: DbPool,
        mut receiver: broadcast::Receiver<ComplaintEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    Self::drain(&pool, &mut receiver).await;
                    tracing::info!("Notification dispatcher cancelled");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(event) => Self::handle(&pool, &event).await,
                    Err(RecvError::Lagged(n)) => {
                        tracing::warn!(
                            skipped = n,
                            "Notification dispatcher lagged, some events were not delivered"
                        );
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("Event bus closed, notification dispatcher shutting down");
                        break;
                    }
                },
            }
        }
    }

    async fn drain(pool: &DbPool, receiver: &mut broadcast::Receiver<ComplaintEvent>) {
        loop {
            match receiver.try_recv() {
                Ok(event) => Self::handle(pool, &event).await,
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    async fn handle(pool: &DbPool, event: &ComplaintEvent) {
        if let Err(e) = Self::dispatch(pool, event).await {
            tracing::error!(
                error = %e,
                event_type = %event.event_type,
                complaint_id = event.complaint_id,
                "Failed to dispatch notification"
            );
        }
    }

    /// Write the notification for one event. Returns whether a row was written.
    pub async fn dispatch(pool: &DbPool, event: &ComplaintEvent) -> Result<bool, sqlx::Error> {
        let Some(complaint) = ComplaintRepo::find_by_id(pool, event.complaint_id).await? else {
            tracing::debug!(complaint_id = event.complaint_id, "Complaint gone, skipping");
            return Ok(false);
        };

        // The citizen already knows about their own actions.
        if event.actor_user_id == Some(complaint.user_id) {
            return Ok(false);
        }

        NotificationRepo::create(
            pool,
            &CreateNotification {
                user_id: complaint.user_id,
                complaint_id: Some(complaint.id),
                event_type: event.event_type.clone(),
                message: render_message(event, &complaint),
            },
        )
        .await?;

        tracing::debug!(
            complaint_id = complaint.id,
            user_id = complaint.user_id,
            event_type = %event.event_type,
            "Notification written"
        );
        Ok(true)
    }
}

/// Human-readable notification text for `event`.
pub fn render_message(event: &ComplaintEvent, complaint: &Complaint) -> String {
    let title = &complaint.title;

    if event.event_type == COMPLAINT_CREATED {
        return format!("Your complaint '{title}' has been registered");
    }

    if event.event_type == WORK_REJECTED {
        return match event.payload.get("reason").and_then(|r| r.as_str()) {
            Some(reason) => format!("Work on your complaint '{title}' was reopened: {reason}"),
            None => format!("Work on your complaint '{title}' was reopened"),
        };
    }

    if let Some(status) = event.new_status() {
        return format!(
            "Your complaint '{title}' is now {}",
            status.as_str().replace('_', " ")
        );
    }

    let unit = event
        .payload
        .get("assignment_type")
        .and_then(|v| v.as_str())
        .and_then(|v| v.parse::<AssignmentType>().ok());
    match unit {
        Some(kind) => format!("Your complaint '{title}' was forwarded to a {}", kind.label()),
        None => format!("Your complaint '{title}' was updated"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
