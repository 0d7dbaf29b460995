use std::sync::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use crate::events::base::{BaseEvent, EventType};
use crate::interfaces::event_sink::EventSink;
use crate::types::address::Address;
use crate::types::bps::BasisPoints;
use crate::types::price::Price;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OracleEvent {
    ProxyDeployed {
        implementation: Address,
        factory: Address,
        max_deviation: BasisPoints,
    },
    PriceOracleSet {
        old_implementation: Address,
        new_implementation: Address,
        old_price: Price,
        new_price: Price,
    },
}

impl OracleEvent {
    pub fn event_type(&self) -> EventType {
        match self {
            OracleEvent::ProxyDeployed { .. } => EventType::ProxyDeployed,
            OracleEvent::PriceOracleSet { .. } => EventType::PriceOracleSet,
        }
    }
}

/// Keeps every emitted event in memory, in emission order.
#[derive(Default)]
pub struct InMemoryEventLog {
    events: Mutex<Vec<BaseEvent>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BaseEvent> {
        self.entries().clone()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A panic while appending cannot leave a partial entry behind, so the log stays
    /// usable after poisoning.
    fn entries(&self) -> MutexGuard<'_, Vec<BaseEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("Event log lock poisoned; recovering recorded events");
            poisoned.into_inner()
        })
    }
}

impl EventSink for InMemoryEventLog {
    fn emit(&self, event: BaseEvent) {
        tracing::debug!(event_type = ?event.event_type, emitter = %event.emitter, "event emitted");
        self.entries().push(event);
    }
}
