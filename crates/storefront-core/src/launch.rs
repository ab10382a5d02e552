use std::sync::Arc;

use storefront_cache::KeyValueStore;

use crate::Result;

/// Storage key for the one-time launch flag
pub const HAS_LAUNCHED_KEY: &str = "has_launched";

/// Tracks whether the app has been started before on this device
pub struct LaunchState {
    store: Arc<KeyValueStore>,
}

impl LaunchState {
    pub fn new(store: Arc<KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn has_launched(&self) -> Result<bool> {
        Ok(self.store.get::<bool>(HAS_LAUNCHED_KEY)?.unwrap_or(false))
    }

    /// `true` the very first time it's called for a store, `false` after
    pub fn first_launch(&self) -> Result<bool> {
        if self.has_launched()? {
            return Ok(false);
        }
        self.store.set(HAS_LAUNCHED_KEY, &true)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_launch_only_once() {
        let store = Arc::new(KeyValueStore::in_memory().unwrap());
        let launch = LaunchState::new(store.clone());

        assert!(!launch.has_launched().unwrap());
        assert!(launch.first_launch().unwrap());
        assert!(!launch.first_launch().unwrap());

        // A fresh handle on the same store agrees
        assert!(LaunchState::new(store).has_launched().unwrap());
    }
}
