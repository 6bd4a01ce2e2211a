//! Process-wide registry
//!
//! Only the crate-root entry points and the CLI use this. Everything else
//! takes a `&dyn Register`.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use super::{Register, RegistryError, ViewModel, ViewModelRegistry};

static REGISTRY: OnceCell<ViewModelRegistry> = OnceCell::new();

/// The shared registry, created on first access.
///
/// Concurrent first calls construct exactly one instance.
pub fn registry() -> &'static ViewModelRegistry {
    REGISTRY.get_or_init(|| {
        debug!("initializing process-wide view-model registry");
        ViewModelRegistry::new()
    })
}

/// Handle that forwards to [`registry()`]
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalRegistry;

impl Register for GlobalRegistry {
    fn add(&self, models: &[Arc<dyn ViewModel>]) -> Result<(), RegistryError> {
        registry().add(models)
    }

    fn remove(&self, models: &[Arc<dyn ViewModel>]) -> Result<(), RegistryError> {
        registry().remove(models)
    }

    fn find(&self, name: &str) -> Result<Arc<dyn ViewModel>, RegistryError> {
        registry().find(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::StaticViewModel;

    #[test]
    fn test_registry_is_stable() {
        let first = registry() as *const ViewModelRegistry;
        let second = registry() as *const ViewModelRegistry;
        assert_eq!(first, second);
    }

    #[test]
    fn test_registry_racing_first_access() {
        let addresses: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|_| s.spawn(|| registry() as *const ViewModelRegistry as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(addresses.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_proxy_forwards_to_singleton() {
        let vm = StaticViewModel::new("global-proxy-test").shared();
        GlobalRegistry.add(&[vm.clone()]).expect("Should register");
        assert!(registry().contains("global-proxy-test"));

        let found = GlobalRegistry.find("global-proxy-test").unwrap();
        assert!(Arc::ptr_eq(&found, &vm));

        GlobalRegistry.remove(&[vm]).expect("Should remove");
        assert!(!registry().contains("global-proxy-test"));
    }
}
