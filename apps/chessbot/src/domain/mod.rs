//! Domain layer: identifiers shared by the realm, session and matchmaking code.

pub mod ids;

pub use ids::{PairKey, RealmId, UserId};
