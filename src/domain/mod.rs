// Domain layer: entity model, in-memory store and ports (interfaces).

pub mod model;
pub mod ports;
pub mod store;
