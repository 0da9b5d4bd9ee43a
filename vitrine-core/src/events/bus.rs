use std::{
    borrow::Cow,
    collections::HashMap,
    fmt,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Instant,
};

use once_cell::sync::Lazy;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Capacity of the broadcast channel behind [`SignalBus::listen`].
pub const DEFAULT_SIGNAL_CAPACITY: usize = 64;

/// Name of a payload-free notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signal(Cow<'static, str>);

impl Signal {
    /// Wishlist contents changed; listeners re-query the wishlist.
    pub const WISHLIST_UPDATED: Signal = Signal(Cow::Borrowed("wishlist-updated"));
    /// Cart contents changed; header badges re-query the cart.
    pub const CART_UPDATED: Signal = Signal(Cow::Borrowed("cart-updated"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Signal {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

#[derive(Debug, Clone)]
pub struct SignalFrame {
    pub sequence: u64,
    pub emitted_at: Instant,
    pub signal: Signal,
}

type Handler = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    handlers: HashMap<Signal, Vec<(u64, Handler)>>,
}

struct BusInner {
    registry: Mutex<Registry>,
    tx: broadcast::Sender<SignalFrame>,
    sequence: AtomicU64,
}

impl BusInner {
    fn registry(&self) -> MutexGuard<'_, Registry> {
        // Handlers run outside the lock, so a poisoned registry is still
        // structurally intact.
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, signal: &Signal, id: u64) {
        let mut registry = self.registry();
        if let Some(handlers) = registry.handlers.get_mut(signal) {
            handlers.retain(|(handler_id, _)| *handler_id != id);
            if handlers.is_empty() {
                registry.handlers.remove(signal);
            }
        }
    }
}

/// In-process publish/subscribe channel for storefront signals.
///
/// Publishing is synchronous and fire-and-forget: callback subscribers run on
/// the publishing thread before `publish` returns, in no particular order.
/// Nothing is buffered for later subscribers, so a region that was not
/// subscribed at publish time never sees that signal.
#[derive(Clone)]
pub struct SignalBus {
    inner: Arc<BusInner>,
}

impl fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.inner.registry();
        let subscribers: usize = registry.handlers.values().map(Vec::len).sum();
        f.debug_struct("SignalBus")
            .field("subscribers", &subscribers)
            .field("listeners", &self.inner.tx.receiver_count())
            .field("sequence", &self.inner.sequence.load(Ordering::Relaxed))
            .finish()
    }
}

static GLOBAL_BUS: Lazy<SignalBus> =
    Lazy::new(|| SignalBus::new(DEFAULT_SIGNAL_CAPACITY));

impl Default for SignalBus {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNAL_CAPACITY)
    }
}

impl SignalBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(BusInner {
                registry: Mutex::new(Registry::default()),
                tx,
                sequence: AtomicU64::new(0),
            }),
        }
    }

    /// Process-wide bus shared by every UI region.
    pub fn global() -> &'static SignalBus {
        &GLOBAL_BUS
    }

    pub fn publish(&self, signal: impl Into<Signal>) -> SignalFrame {
        let signal = signal.into();
        let sequence = self.inner.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let frame = SignalFrame {
            sequence,
            emitted_at: Instant::now(),
            signal,
        };

        let handlers: Vec<Handler> = self
            .inner
            .registry()
            .handlers
            .get(&frame.signal)
            .map(|handlers| handlers.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();

        trace!(
            signal = %frame.signal,
            sequence,
            subscribers = handlers.len(),
            "publishing signal"
        );
        for handler in handlers {
            handler();
        }

        let _ = self.inner.tx.send(frame.clone());
        frame
    }

    /// Register `handler` for `signal` until the returned handle is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, signal: impl Into<Signal>, handler: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let signal = signal.into();
        let mut registry = self.inner.registry();
        registry.next_id += 1;
        let id = registry.next_id;
        registry
            .handlers
            .entry(signal.clone())
            .or_default()
            .push((id, Arc::new(handler)));
        debug!(signal = %signal, id, "signal subscriber registered");

        Subscription {
            bus: Arc::downgrade(&self.inner),
            signal,
            id,
        }
    }

    /// Stream of every frame published from now on.
    pub fn listen(&self) -> broadcast::Receiver<SignalFrame> {
        self.inner.tx.subscribe()
    }

    pub fn subscriber_count(&self, signal: &Signal) -> usize {
        self.inner
            .registry()
            .handlers
            .get(signal)
            .map_or(0, Vec::len)
    }
}

/// Live callback registration. Dropping it unsubscribes.
pub struct Subscription {
    bus: Weak<BusInner>,
    signal: Signal,
    id: u64,
}

impl Subscription {
    pub fn signal(&self) -> &Signal {
        &self.signal
    }

    /// Explicit form of dropping the handle.
    pub fn unsubscribe(self) {}
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("signal", &self.signal)
            .field("id", &self.id)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.remove(&self.signal, self.id);
            debug!(signal = %self.signal, id = self.id, "signal subscriber removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::broadcast::error::TryRecvError;

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let hits = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&hits);
        (hits, move || {
            handle.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn publish_without_subscribers_is_a_no_op() {
        let bus = SignalBus::new(4);
        let frame = bus.publish(Signal::CART_UPDATED);
        assert_eq!(frame.sequence, 1);
        assert_eq!(bus.subscriber_count(&Signal::CART_UPDATED), 0);
    }

    #[test]
    fn late_subscriber_misses_earlier_publish() {
        let bus = SignalBus::new(4);
        bus.publish(Signal::WISHLIST_UPDATED);

        let (hits, handler) = counter();
        let _sub = bus.subscribe(Signal::WISHLIST_UPDATED, handler);
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        bus.publish(Signal::WISHLIST_UPDATED);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handlers_only_see_their_signal() {
        let bus = SignalBus::new(4);
        let (cart_hits, on_cart) = counter();
        let (wish_hits, on_wish) = counter();
        let _cart = bus.subscribe(Signal::CART_UPDATED, on_cart);
        let _wish = bus.subscribe("wishlist-updated", on_wish);

        bus.publish(Signal::CART_UPDATED);
        bus.publish(Signal::new(String::from("orders-updated")));

        assert_eq!(cart_hits.load(Ordering::SeqCst), 1);
        assert_eq!(wish_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let bus = SignalBus::new(4);
        let (hits, handler) = counter();
        let sub = bus.subscribe(Signal::CART_UPDATED, handler);
        assert_eq!(bus.subscriber_count(&Signal::CART_UPDATED), 1);

        sub.unsubscribe();
        bus.publish(Signal::CART_UPDATED);

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(bus.subscriber_count(&Signal::CART_UPDATED), 0);
    }

    #[test]
    fn handler_may_publish_without_deadlock() {
        let bus = SignalBus::new(4);
        let (hits, on_wish) = counter();
        let _wish = bus.subscribe(Signal::WISHLIST_UPDATED, on_wish);
        let relay = bus.clone();
        let _cart = bus.subscribe(Signal::CART_UPDATED, move || {
            relay.publish(Signal::WISHLIST_UPDATED);
        });

        bus.publish(Signal::CART_UPDATED);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn listeners_receive_frames_published_after_listen() {
        let bus = SignalBus::new(4);
        bus.publish(Signal::CART_UPDATED);

        let mut rx = bus.listen();
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        bus.publish(Signal::WISHLIST_UPDATED);
        let frame = rx.recv().await.expect("frame delivered");
        assert_eq!(frame.signal, Signal::WISHLIST_UPDATED);
        assert_eq!(frame.sequence, 2);
    }
}
