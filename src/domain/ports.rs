use crate::config::ProfileConfig;
use crate::domain::model::RigSnapshot;
use crate::utils::error::Result;
use async_trait::async_trait;

/// A radio control daemon that can report the current rig state.
///
/// Implementations open their own transport for every call and release it
/// before returning, on every exit path.
#[async_trait]
pub trait RadioSource: Send + Sync {
    async fn get_data(&self) -> Result<RigSnapshot>;

    /// Short human-readable description, e.g. `flrig at 127.0.0.1:12345`.
    fn describe(&self) -> String;
}

#[async_trait]
impl<T: RadioSource + ?Sized> RadioSource for Box<T> {
    async fn get_data(&self) -> Result<RigSnapshot> {
        (**self).get_data().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Destination for changed rig state.
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn forward(&self, snapshot: &RigSnapshot) -> Result<()>;
}

/// Read side of the persisted profile collection.
pub trait ProfileStore {
    fn profile(&self, name: &str) -> Option<&ProfileConfig>;
    fn default_profile_name(&self) -> Option<&str>;
}
