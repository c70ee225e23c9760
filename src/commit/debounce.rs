//! Trailing-edge debouncers for the save pipeline.
//!
//! Each burst of calls keeps only the latest value; the sink runs once
//! the window elapses with no further calls. `flush` short-circuits the
//! wait, `cancel` drops the pending value. A value is handed to the sink
//! exactly once.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::JoinHandle;

pub type Sink<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;
pub type KeyedSink<T> = Arc<dyn Fn(String, T) -> BoxFuture<'static, ()> + Send + Sync>;

struct Slot<T> {
    pending: Option<T>,
    // Bumped on every call; a timer only delivers if it is still the
    // latest one, so a raced abort can never lose or double a value
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Single-slot trailing debouncer
pub struct Debouncer<T> {
    window: Duration,
    sink: Sink<T>,
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(window: Duration, sink: Sink<T>) -> Self {
        Debouncer {
            window,
            sink,
            slot: Arc::new(Mutex::new(Slot {
                pending: None,
                generation: 0,
                timer: None,
            })),
        }
    }

    /// Replace any pending value and restart the window
    pub fn call(&self, value: T) {
        let mut slot = self.slot.lock().unwrap();
        slot.pending = Some(value);
        slot.generation += 1;
        let generation = slot.generation;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        let slot_handle = self.slot.clone();
        let sink = self.sink.clone();
        let window = self.window;
        slot.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let value = {
                let mut slot = slot_handle.lock().unwrap();
                if slot.generation != generation {
                    // A later call superseded this timer
                    return;
                }
                slot.timer = None;
                slot.pending.take()
            };
            if let Some(value) = value {
                sink(value).await;
            }
        }));
    }

    /// Run the sink now if a value is pending
    pub async fn flush(&self) {
        let value = self.slot.lock().unwrap().pending.take();
        if let Some(value) = value {
            (self.sink)(value).await;
        }
    }

    /// Drop the pending value without running the sink
    pub fn cancel(&self) {
        let mut slot = self.slot.lock().unwrap();
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.slot.lock().unwrap().pending.is_some()
    }
}

/// One independent debounce window per key, all sharing a sink
pub struct KeyedDebouncer<T> {
    window: Duration,
    sink: KeyedSink<T>,
    slots: Mutex<HashMap<String, Arc<Debouncer<T>>>>,
}

impl<T: Send + 'static> KeyedDebouncer<T> {
    pub fn new(window: Duration, sink: KeyedSink<T>) -> Self {
        KeyedDebouncer {
            window,
            sink,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn call(&self, key: &str, value: T) {
        let debouncer = {
            let mut slots = self.slots.lock().unwrap();
            slots
                .entry(key.to_string())
                .or_insert_with(|| {
                    let sink = self.sink.clone();
                    let key = key.to_string();
                    Arc::new(Debouncer::new(
                        self.window,
                        Arc::new(move |value| sink(key.clone(), value)),
                    ))
                })
                .clone()
        };
        debouncer.call(value);
    }

    pub async fn flush(&self) {
        let debouncers: Vec<Arc<Debouncer<T>>> =
            self.slots.lock().unwrap().values().cloned().collect();
        for debouncer in debouncers {
            debouncer.flush().await;
        }
    }

    pub fn has_pending(&self) -> bool {
        self.slots
            .lock()
            .unwrap()
            .values()
            .any(|d| d.has_pending())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recording_sink() -> (Sink<u32>, Arc<Mutex<Vec<u32>>>) {
        let seen: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));
        let writer = seen.clone();
        let sink: Sink<u32> = Arc::new(move |v| {
            let writer = writer.clone();
            Box::pin(async move {
                writer.lock().unwrap().push(v);
            })
        });
        (sink, seen)
    }

    #[tokio::test]
    async fn burst_fires_once_with_latest_value() {
        let (sink, seen) = recording_sink();
        let d = Debouncer::new(Duration::from_millis(20), sink);
        d.call(1);
        d.call(2);
        d.call(3);
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(*seen.lock().unwrap(), vec![3]);
        assert!(!d.has_pending());
    }

    #[tokio::test]
    async fn separate_bursts_fire_separately() {
        let (sink, seen) = recording_sink();
        let d = Debouncer::new(Duration::from_millis(10), sink);
        d.call(1);
        tokio::time::sleep(Duration::from_millis(50)).await;
        d.call(2);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn flush_fires_immediately() {
        let (sink, seen) = recording_sink();
        let d = Debouncer::new(Duration::from_secs(60), sink);
        d.call(7);
        d.flush().await;
        assert_eq!(*seen.lock().unwrap(), vec![7]);
        // The stale timer finds nothing pending; no second delivery
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(*seen.lock().unwrap(), vec![7]);
    }

    #[tokio::test]
    async fn cancel_drops_pending_value() {
        let (sink, seen) = recording_sink();
        let d = Debouncer::new(Duration::from_millis(10), sink);
        d.call(9);
        d.cancel();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn keys_debounce_independently() {
        let seen: Arc<Mutex<Vec<(String, u32)>>> = Arc::new(Mutex::new(Vec::new()));
        let writer = seen.clone();
        let sink: KeyedSink<u32> = Arc::new(move |k, v| {
            let writer = writer.clone();
            Box::pin(async move {
                writer.lock().unwrap().push((k, v));
            })
        });
        let d = KeyedDebouncer::new(Duration::from_millis(20), sink);
        d.call("a", 1);
        d.call("a", 2);
        d.call("b", 10);
        tokio::time::sleep(Duration::from_millis(80)).await;
        let mut fired = seen.lock().unwrap().clone();
        fired.sort();
        assert_eq!(fired, vec![("a".to_string(), 2), ("b".to_string(), 10)]);
    }

    #[tokio::test]
    async fn keyed_flush_drains_every_slot() {
        let seen: Arc<Mutex<Vec<(String, u32)>>> = Arc::new(Mutex::new(Vec::new()));
        let writer = seen.clone();
        let sink: KeyedSink<u32> = Arc::new(move |k, v| {
            let writer = writer.clone();
            Box::pin(async move {
                writer.lock().unwrap().push((k, v));
            })
        });
        let d = KeyedDebouncer::new(Duration::from_secs(60), sink);
        d.call("a", 1);
        d.call("b", 2);
        assert!(d.has_pending());
        d.flush().await;
        assert_eq!(seen.lock().unwrap().len(), 2);
        assert!(!d.has_pending());
    }
}
