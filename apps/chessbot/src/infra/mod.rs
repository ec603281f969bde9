//! Infrastructure layer: wiring of stores, services and shared state.

pub mod state;
