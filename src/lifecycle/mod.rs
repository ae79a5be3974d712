//! Named lifecycle events and their ordered subscribers

use crate::compiler::CompileReport;
use crate::config::Config;
use crate::error::Result;
use crate::graph::BuildGraph;
use indexmap::IndexMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// A named point in the build
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Event {
    /// Fired once before the compiler starts
    Init,
    /// Fired after every completed compilation, rebuilds included
    Build,
    Custom(String),
}

impl Event {
    pub fn name(&self) -> &str {
        match self {
            Event::Init => "init",
            Event::Build => "build",
            Event::Custom(name) => name,
        }
    }
}

impl From<&str> for Event {
    fn from(name: &str) -> Self {
        match name {
            "init" => Event::Init,
            "build" => Event::Build,
            other => Event::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a subscriber sees when its event fires
pub struct EventContext<'a> {
    pub event: &'a Event,
    pub root: &'a Path,
    pub config: &'a Config,
    /// Present once the build graph has been assembled
    pub graph: Option<&'a BuildGraph>,
    /// Present for events fired after a compilation
    pub report: Option<&'a CompileReport>,
}

pub type Listener = Arc<dyn Fn(&EventContext<'_>) -> Result<()> + Send + Sync>;

struct Subscriber {
    label: String,
    callback: Listener,
}

/// Publish/subscribe hub keyed by event name
///
/// Subscribers run synchronously in subscription order and are kept after
/// each firing, so a watch-mode rebuild invokes them again.
#[derive(Default)]
pub struct Dispatcher {
    subscribers: IndexMap<String, Vec<Subscriber>>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.subscribers.iter().map(|(event, subs)| {
                (event, subs.iter().map(|s| &s.label).collect::<Vec<_>>())
            }))
            .finish()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a callback to an event
    pub fn listen<F>(&mut self, event: &Event, label: impl Into<String>, callback: F)
    where
        F: Fn(&EventContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.subscribe(event, label, Arc::new(callback));
    }

    /// Subscribe an already shared listener to an event
    pub fn subscribe(&mut self, event: &Event, label: impl Into<String>, callback: Listener) {
        let label = label.into();
        debug!("Subscribing '{}' to '{}'", label, event);
        self.subscribers
            .entry(event.name().to_string())
            .or_default()
            .push(Subscriber { label, callback });
    }

    /// Invoke every subscriber of the event, returning how many ran
    ///
    /// A failing subscriber is reported and the remaining ones still run.
    pub fn fire(&self, ctx: &EventContext<'_>) -> usize {
        let Some(subscribers) = self.subscribers.get(ctx.event.name()) else {
            debug!("No subscribers for '{}'", ctx.event);
            return 0;
        };

        for subscriber in subscribers {
            debug!("Dispatching '{}' to '{}'", ctx.event, subscriber.label);
            if let Err(e) = (subscriber.callback)(ctx) {
                warn!("Listener '{}' failed on '{}': {}", subscriber.label, ctx.event, e);
            }
        }
        subscribers.len()
    }

    /// Number of subscribers for an event
    pub fn count(&self, event: &Event) -> usize {
        self.subscribers.get(event.name()).map_or(0, Vec::len)
    }
}
