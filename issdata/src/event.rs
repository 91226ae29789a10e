//! Grouping of hits into time-ordered events
//!
//! Hits arrive in stream order, which is only roughly time order: each
//! digitiser flushes its own buffer. An event collects hits until it is
//! closed, either by the next info word from the trigger module or by a hit
//! falling outside a fixed window after the event's first hit, and is then
//! sorted by timestamp and handed out whole.

use serde::Serialize;
use tracing::warn;

use crate::cfg::{Config, Policy};
use crate::hit::Hit;
use crate::unpack::Item;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Event {
    /// Global timestamp of the most recent trigger when the event opened
    pub trigger: Option<u64>,
    /// Emitted early because too many hits were pending
    pub forced: bool,
    hits: Vec<Hit>,
}

impl Event {
    /// Hits in timestamp order; equal timestamps keep their arrival order
    pub fn hits(&self) -> &[Hit] {
        return &self.hits;
    }

    pub fn into_hits(self) -> Vec<Hit> {
        return self.hits;
    }

    pub fn len(&self) -> usize {
        return self.hits.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.hits.is_empty();
    }

    /// Timestamp of the earliest hit
    pub fn start(&self) -> Option<u64> {
        return self.hits.first().map(|h| h.timestamp);
    }

    /// Timestamp of the latest hit
    pub fn end(&self) -> Option<u64> {
        return self.hits.last().map(|h| h.timestamp);
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Stats {
    pub events: u64,
    pub hits_in: u64,
    pub hits_out: u64,
    /// Events emitted early on reaching the pending-hit bound
    pub forced: u64,
    /// Hits dropped because their window had already closed
    pub late: u64,
    /// Triggers that closed an event with no hits
    pub empty_triggers: u64,
}

#[derive(Clone, Debug)]
pub struct EventAssembler {
    policy: Policy,
    max_hits: usize,
    pending: Vec<Hit>,
    /// Timestamp of the hit that opened the pending event
    opened_at: Option<u64>,
    /// Trigger in force when the pending event opened
    opened_trigger: Option<u64>,
    trigger: Option<u64>,
    /// End of the last window closed by a hit outside it
    closed_until: Option<u64>,
    pub stats: Stats,
}

impl EventAssembler {
    pub fn new(policy: Policy, max_hits: usize) -> EventAssembler {
        EventAssembler {
            policy,
            max_hits: max_hits.max(1),
            pending: Vec::new(),
            opened_at: None,
            opened_trigger: None,
            trigger: None,
            closed_until: None,
            stats: Stats::default(),
        }
    }

    pub fn from_config(config: &Config) -> EventAssembler {
        EventAssembler::new(config.policy, config.max_hits)
    }

    /// Number of hits waiting in the open event
    pub fn pending(&self) -> usize {
        return self.pending.len();
    }

    /// Consume one item, returning the event it completes, if any.
    pub fn feed(&mut self, item: Item) -> Option<Event> {
        match item {
            Item::Hit(hit) => self.feed_hit(hit),
            Item::Trigger(ts) => {
                let done = match self.policy {
                    Policy::Trigger => {
                        if self.pending.is_empty() {
                            self.stats.empty_triggers += 1;
                        }
                        self.emit(false)
                    }
                    Policy::Window(_) => None,
                };
                self.trigger = Some(ts);
                done
            }
        }
    }

    /// Emit whatever is still pending at the end of the stream.
    pub fn finish(&mut self) -> Option<Event> {
        return self.emit(false);
    }

    fn feed_hit(&mut self, hit: Hit) -> Option<Event> {
        self.stats.hits_in += 1;

        if let Policy::Window(width) = self.policy {
            if let Some(end) = self.closed_until {
                if hit.timestamp <= end {
                    self.stats.late += 1;
                    warn!(
                        ts = %format!("0x{:012X}", hit.timestamp),
                        module = hit.module,
                        channel = hit.channel,
                        "dropping hit from a window that already closed"
                    );
                    return None;
                }
            }
            if let Some(first) = self.opened_at {
                if hit.timestamp > first && hit.timestamp - first > width {
                    self.closed_until = Some(first.saturating_add(width));
                    let done = self.emit(false);
                    self.open(hit);
                    return done;
                }
            }
        }

        if self.pending.len() >= self.max_hits {
            self.stats.forced += 1;
            warn!(max_hits = self.max_hits, "too many pending hits, emitting event early");
            let done = self.emit(true);
            self.open(hit);
            return done;
        }

        if self.pending.is_empty() {
            self.open(hit);
        } else {
            self.pending.push(hit);
        }
        None
    }

    fn open(&mut self, hit: Hit) {
        self.opened_at = Some(hit.timestamp);
        self.opened_trigger = self.trigger;
        self.pending.push(hit);
    }

    fn emit(&mut self, forced: bool) -> Option<Event> {
        self.opened_at = None;
        if self.pending.is_empty() {
            return None;
        }
        let mut hits = std::mem::take(&mut self.pending);
        // Stable, so hits with equal timestamps stay in arrival order
        hits.sort_by_key(|h| h.timestamp);
        self.stats.events += 1;
        self.stats.hits_out += hits.len() as u64;
        Some(Event {
            trigger: self.opened_trigger,
            forced,
            hits,
        })
    }
}
