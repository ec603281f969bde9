pub mod realm_id;
pub mod validated_json;

pub use realm_id::RealmPath;
pub use validated_json::ValidatedJson;
