//! Module event hooks
//!
//! Explicit observer lists with two subscription flavors: `on`
//! registrations fire on every matching emit until dropped, `once`
//! registrations fire on the first matching emit and are then removed.
//! Emission order is registration order, `on` subscribers first.

use uuid::Uuid;

use crate::slots::SlotId;

/// Events the module emits over its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleEvent {
    /// Module finished setup (settings read, localizer loaded).
    Ready,
    PartyCrunched,
    PartyExploded,
    PartyGrouped,
    PartyFound,
}

/// Context handed to hook callbacks.
#[derive(Debug, Clone)]
pub struct EventPayload {
    pub event: ModuleEvent,
    pub slot: Option<SlotId>,
    pub party_name: Option<String>,
    pub op_id: Option<Uuid>,
}

impl EventPayload {
    pub fn bare(event: ModuleEvent) -> Self {
        Self { event, slot: None, party_name: None, op_id: None }
    }
}

type EveryHook = Box<dyn FnMut(&EventPayload)>;
type OnceHook = Box<dyn FnOnce(&EventPayload)>;

/// Observer registry for module events.
#[derive(Default)]
pub struct HookRegistry {
    every: Vec<(ModuleEvent, EveryHook)>,
    once: Vec<(ModuleEvent, OnceHook)>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe for every occurrence of `event`.
    pub fn on(&mut self, event: ModuleEvent, hook: impl FnMut(&EventPayload) + 'static) {
        self.every.push((event, Box::new(hook)));
    }

    /// Subscribe for the next occurrence of `event` only.
    pub fn once(&mut self, event: ModuleEvent, hook: impl FnOnce(&EventPayload) + 'static) {
        self.once.push((event, Box::new(hook)));
    }

    /// Fire all subscribers matching the payload's event. Returns the
    /// number of callbacks invoked.
    pub fn emit(&mut self, payload: &EventPayload) -> usize {
        let mut fired = 0;

        for (event, hook) in self.every.iter_mut() {
            if *event == payload.event {
                hook(payload);
                fired += 1;
            }
        }

        let queued = std::mem::take(&mut self.once);
        let (fire, keep): (Vec<_>, Vec<_>) =
            queued.into_iter().partition(|(event, _)| *event == payload.event);
        self.once = keep;
        for (_, hook) in fire {
            hook(payload);
            fired += 1;
        }

        fired
    }

    pub fn subscriber_count(&self) -> usize {
        self.every.len() + self.once.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_on_fires_every_time() {
        let mut hooks = HookRegistry::new();
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        hooks.on(ModuleEvent::PartyCrunched, move |_| seen.set(seen.get() + 1));

        let payload = EventPayload::bare(ModuleEvent::PartyCrunched);
        hooks.emit(&payload);
        hooks.emit(&payload);
        assert_eq!(count.get(), 2);
        assert_eq!(hooks.subscriber_count(), 1);
    }

    #[test]
    fn test_once_fires_one_time_and_unsubscribes() {
        let mut hooks = HookRegistry::new();
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        hooks.once(ModuleEvent::Ready, move |_| seen.set(seen.get() + 1));

        let payload = EventPayload::bare(ModuleEvent::Ready);
        assert_eq!(hooks.emit(&payload), 1);
        assert_eq!(hooks.emit(&payload), 0);
        assert_eq!(count.get(), 1);
        assert_eq!(hooks.subscriber_count(), 0);
    }

    #[test]
    fn test_emit_only_matches_the_event() {
        let mut hooks = HookRegistry::new();
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        hooks.on(ModuleEvent::PartyExploded, move |_| seen.set(seen.get() + 1));
        hooks.once(ModuleEvent::PartyExploded, |_| {});

        assert_eq!(hooks.emit(&EventPayload::bare(ModuleEvent::PartyCrunched)), 0);
        assert_eq!(hooks.subscriber_count(), 2);
    }

    #[test]
    fn test_payload_reaches_subscribers() {
        let mut hooks = HookRegistry::new();
        let seen_party = Rc::new(Cell::new(false));
        let flag = seen_party.clone();
        hooks.on(ModuleEvent::PartyGrouped, move |payload| {
            flag.set(payload.party_name.as_deref() == Some("boss"));
        });

        let payload = EventPayload {
            event: ModuleEvent::PartyGrouped,
            slot: SlotId::new(1).ok(),
            party_name: Some("boss".to_string()),
            op_id: None,
        };
        hooks.emit(&payload);
        assert!(seen_party.get());
    }
}
