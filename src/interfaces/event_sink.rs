use crate::events::base::BaseEvent;

pub trait EventSink: Send + Sync {
    fn emit(&self, event: BaseEvent);
}
