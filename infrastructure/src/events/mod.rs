//! Event delivery adapters

mod broadcast_bus;

pub use broadcast_bus::BroadcastEventBus;
