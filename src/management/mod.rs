mod lock;
mod properties;
mod trigger;

pub use lock::LockError;
pub use lock::RunLock;
pub use lock::STALE_AFTER_HOURS;
pub use lock::is_stale_owner;
pub use properties::Properties;
pub use properties::Property;
pub use properties::PropertyError;
pub use properties::PropertyStore;
pub use trigger::TriggerError;
pub use trigger::TriggerStore;
