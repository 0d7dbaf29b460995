use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use crate::events::oracle::OracleEvent;
use crate::types::address::Address;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        EventId(Uuid::new_v4())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BaseEvent {
    pub event_id: EventId,
    pub event_type: EventType,
    pub version: u32,
    pub timestamp: Timestamp,
    pub emitter: Address,
    pub payload: OracleEvent,
    pub checksum: String,
}

impl BaseEvent {
    pub fn new(emitter: Address, payload: OracleEvent) -> Self {
        let mut event = BaseEvent {
            event_id: EventId::new(),
            event_type: payload.event_type(),
            version: 1,
            timestamp: Timestamp::now(),
            emitter,
            payload,
            checksum: String::new(),
        };
        event.checksum = event.calculate_checksum();
        event
    }

    pub fn calculate_checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.event_id.0.as_bytes());
        hasher.update(self.timestamp.as_secs().to_le_bytes());
        hasher.update(self.emitter.as_bytes());
        hasher.update(format!("{:?}", self.payload).as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn verify_checksum(&self) -> bool {
        self.checksum == self.calculate_checksum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    ProxyDeployed,
    PriceOracleSet,
}
