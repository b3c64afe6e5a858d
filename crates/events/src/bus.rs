//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`ComplaintEvent`]s. It is
//! shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use janasamparka_core::complaint::ComplaintStatus;
use janasamparka_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// A complaint was filed.
pub const COMPLAINT_CREATED: &str = "complaint.created";
/// A status transition was applied through the generic status endpoint.
pub const STATUS_CHANGED: &str = "complaint.status_changed";
/// Resolved work was approved and the complaint closed.
pub const WORK_APPROVED: &str = "complaint.work_approved";
/// Resolved work was rejected and the complaint reopened.
pub const WORK_REJECTED: &str = "complaint.work_rejected";

// ---------------------------------------------------------------------------
// ComplaintEvent
// ---------------------------------------------------------------------------

/// Something that happened to a complaint, published after the change commits.
///
/// Constructed via [`ComplaintEvent::new`] and enriched with
/// [`with_actor`](ComplaintEvent::with_actor),
/// [`with_transition`](ComplaintEvent::with_transition) and
/// [`with_payload`](ComplaintEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintEvent {
    /// Dot-separated event name, e.g. `"complaint.escalated"`.
    pub event_type: String,

    pub complaint_id: DbId,

    /// The user whose request caused the event.
    pub actor_user_id: Option<DbId>,

    /// Event-specific data. Transitions carry `from` and `to`.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl ComplaintEvent {
    pub fn new(event_type: impl Into<String>, complaint_id: DbId) -> Self {
        Self {
            event_type: event_type.into(),
            complaint_id,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Record the status edge taken, merged into the payload.
    pub fn with_transition(mut self, from: ComplaintStatus, to: ComplaintStatus) -> Self {
        if let serde_json::Value::Object(map) = &mut self.payload {
            map.insert("from".into(), from.as_str().into());
            map.insert("to".into(), to.as_str().into());
        }
        self
    }

    /// Replace the payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// The target status, if this event records a transition.
    pub fn new_status(&self) -> Option<ComplaintStatus> {
        self.payload.get("to")?.as_str()?.parse().ok()
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use janasamparka_events::bus::{ComplaintEvent, EventBus, COMPLAINT_CREATED};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(ComplaintEvent::new(COMPLAINT_CREATED, 1));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<ComplaintEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed messages are dropped
    /// and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no active subscribers the event is dropped.
    pub fn publish(&self, event: ComplaintEvent) {
        // SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ComplaintEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
