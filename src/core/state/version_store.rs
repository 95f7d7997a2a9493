use std::sync::Arc;

use tokio::sync::RwLock;

use crate::core::version::VersionInfo;

/// Shared handle to the most recently accepted manifest.
///
/// The manifest pipeline is the only writer; UI collaborators clone the
/// handle and read. A failed pipeline run leaves the previous value in place.
#[derive(Clone, Default)]
pub struct VersionInfoStore {
    inner: Arc<RwLock<Option<Arc<VersionInfo>>>>,
}

impl VersionInfoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn current(&self) -> Option<Arc<VersionInfo>> {
        self.inner.read().await.clone()
    }

    pub(crate) async fn replace(&self, info: Arc<VersionInfo>) {
        *self.inner.write().await = Some(info);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_the_same_slot() {
        let store = VersionInfoStore::new();
        let reader = store.clone();
        assert!(reader.current().await.is_none());

        let info = VersionInfo::from_unsigned(r#"{"versions":[{"id":"1.0"}]}"#).unwrap();
        store.replace(Arc::new(info)).await;

        let seen = reader.current().await.unwrap();
        assert_eq!(seen.versions[0].id, "1.0");
    }
}
