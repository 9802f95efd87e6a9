//! Process-wide diagnostic listener registry.
//!
//! Hosts (and the orchestrator, when `--listen-trace` is supplied) register
//! listeners that receive diagnostic output produced during a run. The
//! registry is the one piece of process-wide state in this crate, so the
//! orchestrator manages its registration through an RAII guard: the listener
//! is removed on every exit path, including error propagation.

use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use crate::interfaces::Log;

/// Receives diagnostic output while registered.
pub trait TraceListener: Send + Sync {
    fn on_message(&self, message: &str);
}

static LISTENERS: Lazy<Mutex<Vec<Arc<dyn TraceListener>>>> = Lazy::new(|| Mutex::new(Vec::new()));

fn with_listeners<T>(f: impl FnOnce(&mut Vec<Arc<dyn TraceListener>>) -> T) -> T {
    let mut listeners = LISTENERS
        .lock()
        .expect("INVARIANT: listener registry lock is never poisoned");
    f(&mut listeners)
}

/// Register a listener.
pub fn add_listener(listener: Arc<dyn TraceListener>) {
    with_listeners(|listeners| listeners.push(listener));
}

/// Remove a previously registered listener (matched by identity). Removing a
/// listener that is not registered is a no-op.
pub fn remove_listener(listener: &Arc<dyn TraceListener>) {
    with_listeners(|listeners| {
        if let Some(position) = listeners.iter().position(|l| Arc::ptr_eq(l, listener)) {
            listeners.remove(position);
        }
    });
}

/// Number of currently registered listeners.
pub fn listener_count() -> usize {
    with_listeners(|listeners| listeners.len())
}

/// Fan a diagnostic message out to every registered listener.
pub fn dispatch(message: &str) {
    let snapshot = with_listeners(|listeners| listeners.clone());
    for listener in snapshot {
        listener.on_message(message);
    }
}

/// Listener forwarding diagnostic output into a logging sink.
pub struct LogTraceListener {
    log: Arc<dyn Log>,
}

impl LogTraceListener {
    pub fn new(log: Arc<dyn Log>) -> Self {
        Self { log }
    }
}

impl TraceListener for LogTraceListener {
    fn on_message(&self, message: &str) {
        self.log.info(message);
    }
}

/// Scoped listener registration: adds on construction, removes on drop.
pub struct ListenerGuard {
    listener: Arc<dyn TraceListener>,
}

impl ListenerGuard {
    pub fn install(listener: Arc<dyn TraceListener>) -> Self {
        add_listener(Arc::clone(&listener));
        Self { listener }
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        remove_listener(&self.listener);
    }
}
