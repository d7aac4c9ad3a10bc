use crate::status::ServerStatus;
use axum::extract::ws::Message as Frame;
use events::AnimalKind;
use serde::Serialize;
use std::fmt;

/// A named broadcast topic with its own subscriber set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Dogs,
    Cats,
    Status,
}

impl Channel {
    /// The channel carrying statistics for `kind`.
    pub fn for_kind(kind: AnimalKind) -> Self {
        match kind {
            AnimalKind::Dog => Channel::Dogs,
            AnimalKind::Cat => Channel::Cats,
        }
    }

    /// The animal kind whose statistics this channel carries, if any.
    pub fn kind(&self) -> Option<AnimalKind> {
        match self {
            Channel::Dogs => Some(AnimalKind::Dog),
            Channel::Cats => Some(AnimalKind::Cat),
            Channel::Status => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Dogs => "dogs",
            Channel::Cats => "cats",
            Channel::Status => "status",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status counters for one animal kind.
///
/// Each animal has exactly one status, so `current_in_shelter + adopted_total +
/// returned_total == total` whenever the four counts come from a consistent view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregateStats {
    pub current_in_shelter: u64,
    pub adopted_total: u64,
    pub returned_total: u64,
    pub total: u64,
}

impl AggregateStats {
    pub fn is_consistent(&self) -> bool {
        self.current_in_shelter + self.adopted_total + self.returned_total == self.total
    }
}

/// Every JSON object the server pushes over a WebSocket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    DogStats {
        current_in_shelter: u64,
        adopted_total: u64,
        returned_total: u64,
        all_dogs_total: u64,
    },
    CatStats {
        current_in_shelter: u64,
        adopted_total: u64,
        returned_total: u64,
        all_cats_total: u64,
    },
    ServerStatus(ServerStatus),
}

impl Message {
    pub fn stats(kind: AnimalKind, stats: AggregateStats) -> Self {
        match kind {
            AnimalKind::Dog => Message::DogStats {
                current_in_shelter: stats.current_in_shelter,
                adopted_total: stats.adopted_total,
                returned_total: stats.returned_total,
                all_dogs_total: stats.total,
            },
            AnimalKind::Cat => Message::CatStats {
                current_in_shelter: stats.current_in_shelter,
                adopted_total: stats.adopted_total,
                returned_total: stats.returned_total,
                all_cats_total: stats.total,
            },
        }
    }

    pub fn message_type(&self) -> &'static str {
        match self {
            Message::DogStats { .. } => "dog_stats",
            Message::CatStats { .. } => "cat_stats",
            Message::ServerStatus(_) => "server_status",
        }
    }

    /// Serializes the message into a single text frame.
    pub fn to_frame(&self) -> Result<Frame, serde_json::Error> {
        Ok(Frame::Text(serde_json::to_string(self)?.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusState;
    use serde_json::json;

    #[test]
    fn dog_stats_serialize_with_kind_specific_total() {
        let stats = AggregateStats {
            current_in_shelter: 3,
            adopted_total: 2,
            returned_total: 1,
            total: 6,
        };

        let json = serde_json::to_value(Message::stats(AnimalKind::Dog, stats)).unwrap();

        assert_eq!(
            json,
            json!({
                "type": "dog_stats",
                "current_in_shelter": 3,
                "adopted_total": 2,
                "returned_total": 1,
                "all_dogs_total": 6
            })
        );
    }

    #[test]
    fn cat_stats_serialize_with_kind_specific_total() {
        let json =
            serde_json::to_value(Message::stats(AnimalKind::Cat, AggregateStats::default()))
                .unwrap();

        assert_eq!(json["type"], "cat_stats");
        assert_eq!(json["all_cats_total"], 0);
        assert!(json.get("all_dogs_total").is_none());
    }

    #[test]
    fn server_status_is_flattened_next_to_its_type() {
        let message = Message::ServerStatus(StatusState::new().read());
        let json = serde_json::to_value(&message).unwrap();

        assert_eq!(json["type"], message.message_type());
        assert_eq!(json["status"], "running");
        assert!(json["last_activity"].is_null());
    }

    #[test]
    fn channels_map_to_their_animal_kind() {
        assert_eq!(Channel::for_kind(AnimalKind::Dog), Channel::Dogs);
        assert_eq!(Channel::Cats.kind(), Some(AnimalKind::Cat));
        assert_eq!(Channel::Status.kind(), None);
        assert_eq!(Channel::Status.to_string(), "status");
    }

    #[test]
    fn consistency_check_detects_mismatched_totals() {
        let mut stats = AggregateStats {
            current_in_shelter: 1,
            adopted_total: 1,
            returned_total: 0,
            total: 2,
        };
        assert!(stats.is_consistent());
        stats.total = 3;
        assert!(!stats.is_consistent());
    }
}
