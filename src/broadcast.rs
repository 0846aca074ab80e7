//! Realtime fault broadcaster
//!
//! Fire-and-forget fan-out to whoever is subscribed at send time. There is
//! no backlog: late subscribers only see later events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::models::SensorSample;
use crate::parts::Part;
use crate::rules::Assessment;

/// Name of the single realtime event
pub const MOTOR_UPDATE_EVENT: &str = "motor-update";

/// Payload pushed to clients for every recorded fault
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultNotification {
    pub id: i64,
    pub fault: String,
    pub confidence: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub input: SensorSample,
    pub parts: Vec<Part>,
    pub assessment: Assessment,
}

/// Named event envelope written to the realtime channel
#[derive(Debug, Serialize, Deserialize)]
pub struct EventFrame<T> {
    pub event: String,
    pub data: T,
}

impl FaultNotification {
    /// Serialize as a `motor-update` frame
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&EventFrame {
            event: MOTOR_UPDATE_EVENT.to_string(),
            data: self,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Broadcaster {
    sender: broadcast::Sender<FaultNotification>,
}

impl Broadcaster {
    /// `capacity` bounds how far a subscriber may lag before skipping events
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FaultNotification> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Push an event to all current subscribers; returns how many it reached
    pub fn broadcast(&self, event: FaultNotification) -> usize {
        match self.sender.send(event) {
            Ok(delivered) => delivered,
            // No subscribers right now
            Err(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::assess;
    use tokio::sync::broadcast::error::TryRecvError;

    fn notification(id: i64) -> FaultNotification {
        let input = SensorSample { current: 45.0, voltage: 90.0, temperature: 95.0 };
        FaultNotification {
            id,
            fault: "Commutator".to_string(),
            confidence: Some(0.9),
            timestamp: Utc::now(),
            input,
            parts: vec![Part::Commutator],
            assessment: assess(&input),
        }
    }

    #[test]
    fn test_broadcast_without_subscribers() {
        let broadcaster = Broadcaster::new(8);
        assert_eq!(broadcaster.broadcast(notification(1)), 0);
    }

    #[test]
    fn test_all_subscribers_receive() {
        let broadcaster = Broadcaster::new(8);
        let mut a = broadcaster.subscribe();
        let mut b = broadcaster.subscribe();

        assert_eq!(broadcaster.broadcast(notification(7)), 2);
        assert_eq!(a.try_recv().unwrap().id, 7);
        assert_eq!(b.try_recv().unwrap().id, 7);
    }

    #[test]
    fn test_late_subscriber_gets_no_backlog() {
        let broadcaster = Broadcaster::new(8);
        let _early = broadcaster.subscribe();
        broadcaster.broadcast(notification(1));

        let mut late = broadcaster.subscribe();
        assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn test_frame_format() {
        let frame = notification(3).to_frame().unwrap();
        let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(value["event"], "motor-update");
        assert_eq!(value["data"]["id"], 3);
        assert_eq!(value["data"]["input"]["temp"], 95.0);
        assert_eq!(value["data"]["parts"][0], "commutator");
    }
}
