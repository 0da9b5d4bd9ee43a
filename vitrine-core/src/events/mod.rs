//! Cross-region storefront notifications.

pub mod bus;

pub use bus::{
    DEFAULT_SIGNAL_CAPACITY, Signal, SignalBus, SignalFrame, Subscription,
};
