//! Runtime registry of challenge processors.
//!
//! The registry maps challenge-type tags to trait objects implementing
//! [`CaptchaProcessor`], supports dynamic (re)registration, and resolves the
//! processor the dispatcher invokes for a request. Dispatch always goes
//! through the type tag; there is no structural inspection of processors.

use crate::core::errors::{CaptchaError, CaptchaResult};
use crate::core::traits::CaptchaProcessor;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Registry for managing challenge processors.
///
/// Reads vastly outnumber writes, so the map sits behind a read-write lock:
/// concurrent `recognize` calls resolve processors without contention while
/// registration stays possible at runtime.
#[derive(Default)]
pub struct ProcessorRegistry {
    processors: RwLock<HashMap<String, Arc<dyn CaptchaProcessor>>>,
}

impl ProcessorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a processor under a challenge-type tag.
    ///
    /// The last registration for a given tag wins; an existing processor is
    /// replaced silently.
    ///
    /// # Arguments
    ///
    /// * `captcha_type` - The tag requests select the processor with.
    /// * `processor` - The processor instance to register.
    pub fn register(&self, captcha_type: impl Into<String>, processor: Arc<dyn CaptchaProcessor>) {
        let captcha_type = captcha_type.into();
        let mut processors = self.write_processors();
        if processors
            .insert(captcha_type.clone(), processor)
            .is_some()
        {
            debug!(%captcha_type, "replaced registered processor");
        } else {
            debug!(%captcha_type, "registered processor");
        }
    }

    /// Resolves the processor registered for a challenge type.
    ///
    /// # Returns
    ///
    /// The registered processor, or
    /// [`CaptchaError::UnsupportedCaptchaType`] listing the currently known
    /// types when the tag is unregistered.
    pub fn resolve(&self, captcha_type: &str) -> CaptchaResult<Arc<dyn CaptchaProcessor>> {
        let processors = self.read_processors();
        match processors.get(captcha_type) {
            Some(processor) => Ok(Arc::clone(processor)),
            None => {
                let mut known_types: Vec<String> = processors.keys().cloned().collect();
                known_types.sort();
                Err(CaptchaError::unsupported_captcha_type(
                    captcha_type,
                    known_types,
                ))
            }
        }
    }

    /// Returns whether a processor is registered for the given tag.
    pub fn is_registered(&self, captcha_type: &str) -> bool {
        self.read_processors().contains_key(captcha_type)
    }

    /// Returns the registered challenge-type tags, sorted.
    pub fn known_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.read_processors().keys().cloned().collect();
        types.sort();
        types
    }

    fn read_processors(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<dyn CaptchaProcessor>>> {
        match self.processors.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_processors(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<dyn CaptchaProcessor>>> {
        match self.processors.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("known_types", &self.known_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::ProcessorOptions;

    struct NamedProcessor(&'static str);

    impl CaptchaProcessor for NamedProcessor {
        fn name(&self) -> &str {
            self.0
        }

        fn process(&self, _image: &[u8], _options: &ProcessorOptions) -> CaptchaResult<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_resolve_returns_registered_processor() {
        let registry = ProcessorRegistry::new();
        registry.register("text", Arc::new(NamedProcessor("text")));

        let processor = registry.resolve("text").unwrap();
        assert_eq!(processor.name(), "text");
    }

    #[test]
    fn test_reregistration_silently_replaces() {
        let registry = ProcessorRegistry::new();
        registry.register("text", Arc::new(NamedProcessor("first")));
        registry.register("text", Arc::new(NamedProcessor("second")));

        let processor = registry.resolve("text").unwrap();
        assert_eq!(processor.name(), "second");
        assert_eq!(registry.known_types(), vec!["text".to_string()]);
    }

    #[test]
    fn test_resolve_unknown_type_lists_known_types() {
        let registry = ProcessorRegistry::new();
        registry.register("text", Arc::new(NamedProcessor("text")));
        registry.register("calculation", Arc::new(NamedProcessor("calculation")));

        let error = match registry.resolve("slider") {
            Ok(_) => panic!("expected resolve to fail for unregistered type"),
            Err(error) => error,
        };
        match error {
            CaptchaError::UnsupportedCaptchaType {
                requested,
                known_types,
            } => {
                assert_eq!(requested, "slider");
                assert_eq!(known_types, vec!["calculation", "text"]);
            }
            other => panic!("expected UnsupportedCaptchaType, got {other:?}"),
        }
    }

    #[test]
    fn test_is_registered() {
        let registry = ProcessorRegistry::new();
        assert!(!registry.is_registered("text"));
        registry.register("text", Arc::new(NamedProcessor("text")));
        assert!(registry.is_registered("text"));
    }
}
