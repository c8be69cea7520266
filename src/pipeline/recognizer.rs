//! The recognition dispatcher.
//!
//! [`CaptchaRecognizer`] is the caller-facing entry point: it validates the
//! challenge type, acquires and validates image bytes, consults the
//! content-addressed cache, dispatches to the registered processor on a miss,
//! stores successful results, and reclassifies every failure into the error
//! taxonomy. A timing and outcome record is emitted on every exit path.
//!
//! The recognizer holds no global state: construct as many independent
//! instances as needed; each owns its cache, registry, and statistics.

use crate::core::cache::{CacheKey, CacheStats, ContentHash, ParamsDigest, ResultCache};
use crate::core::config::{ConfigValidator, RecognizerConfig};
use crate::core::constants::DEFAULT_PARALLEL_THRESHOLD;
use crate::core::errors::{CaptchaError, CaptchaResult};
use crate::core::registry::ProcessorRegistry;
use crate::core::traits::{CaptchaProcessor, OcrEngine, ProcessorOptions};
use crate::pipeline::stats::{RecognitionStats, StatsManager};
use crate::processors::{CalculationProcessor, TextProcessor};
use crate::utils::ImageSource;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Recognizes image-encoded challenges through registered processors, with
/// content-addressed result caching.
///
/// The recognizer is safe to share across threads behind an `Arc`; all
/// methods take `&self`. The cache lock is never held across an engine
/// invocation, so two concurrent misses for the same image may both invoke
/// the processor; the duplicate work is tolerated and the second write wins.
pub struct CaptchaRecognizer {
    engine: Arc<dyn OcrEngine>,
    registry: ProcessorRegistry,
    cache: ResultCache,
    config: RecognizerConfig,
    stats: StatsManager,
}

impl CaptchaRecognizer {
    /// Creates a recognizer with default configuration.
    ///
    /// The baseline processors are registered under `"text"` and
    /// `"calculation"`.
    ///
    /// # Arguments
    ///
    /// * `engine` - The OCR engine backing the baseline processors.
    pub fn new(engine: Arc<dyn OcrEngine>) -> CaptchaResult<Self> {
        Self::with_config(engine, RecognizerConfig::default())
    }

    /// Creates a recognizer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` when the configuration fails validation.
    pub fn with_config(engine: Arc<dyn OcrEngine>, config: RecognizerConfig) -> CaptchaResult<Self> {
        config
            .validate()
            .map_err(|e| CaptchaError::invalid_parameter(e.to_string()))?;

        let registry = ProcessorRegistry::new();
        registry.register("text", Arc::new(TextProcessor::new(Arc::clone(&engine))));
        registry.register(
            "calculation",
            Arc::new(CalculationProcessor::new(Arc::clone(&engine))),
        );

        let cache = ResultCache::new(config.cache.max_size, config.cache.ttl_duration());

        Ok(Self {
            engine,
            registry,
            cache,
            config,
            stats: StatsManager::new(),
        })
    }

    /// Registers a processor under a challenge-type tag.
    ///
    /// The last registration for a tag wins; re-registering replaces the
    /// previous processor silently.
    pub fn register_processor(
        &self,
        captcha_type: impl Into<String>,
        processor: Arc<dyn CaptchaProcessor>,
    ) {
        self.registry.register(captcha_type, processor);
    }

    /// Recognizes a challenge image.
    ///
    /// Dispatch order: resolve the processor for `captcha_type`, acquire and
    /// validate the image bytes, look up the cache by content hash and type
    /// (honoring the options digest), invoke the processor on a miss, store
    /// the result, return it. An empty processor result is a recognition
    /// failure and is never cached.
    ///
    /// # Arguments
    ///
    /// * `image` - A path, byte buffer, or decoded image.
    /// * `captcha_type` - The registered challenge type to interpret with.
    /// * `options` - Per-call processor options.
    ///
    /// # Errors
    ///
    /// Always one of the [`CaptchaError`] kinds; no other error type escapes.
    pub fn recognize(
        &self,
        image: impl Into<ImageSource>,
        captcha_type: &str,
        options: &ProcessorOptions,
    ) -> CaptchaResult<String> {
        let started = Instant::now();
        let mut cache_hit = false;

        let result = self.dispatch(image.into(), captcha_type, options, &mut cache_hit);

        // Timing and outcome are recorded on every exit path
        let elapsed = started.elapsed();
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        self.stats.record(result.is_ok(), cache_hit, elapsed_ms);

        match &result {
            Ok(_) if elapsed.as_secs_f64() > self.config.performance.slow_threshold => {
                warn!(captcha_type, elapsed_ms, cache_hit, "slow recognition");
            }
            Ok(_) => {
                debug!(captcha_type, elapsed_ms, cache_hit, "recognition completed");
            }
            Err(error) => {
                warn!(
                    captcha_type,
                    elapsed_ms,
                    error_code = error.code(),
                    %error,
                    "recognition failed"
                );
            }
        }

        result
    }

    /// Recognizes a batch of challenge images of one type.
    ///
    /// Batches above the parallelism threshold are processed on the rayon
    /// thread pool. Results align with the input order; one failure does not
    /// abort the rest of the batch.
    pub fn recognize_batch(
        &self,
        images: Vec<ImageSource>,
        captcha_type: &str,
        options: &ProcessorOptions,
    ) -> Vec<CaptchaResult<String>> {
        if images.len() > DEFAULT_PARALLEL_THRESHOLD {
            images
                .into_par_iter()
                .map(|image| self.recognize(image, captcha_type, options))
                .collect()
        } else {
            images
                .into_iter()
                .map(|image| self.recognize(image, captcha_type, options))
                .collect()
        }
    }

    /// Returns the registered challenge-type tags, sorted.
    pub fn known_types(&self) -> Vec<String> {
        self.registry.known_types()
    }

    /// Returns point-in-time cache statistics.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Removes all cached results.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Returns a copy of the recognition statistics.
    pub fn stats(&self) -> RecognitionStats {
        self.stats.snapshot()
    }

    /// Resets the recognition statistics.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Returns the engine this recognizer dispatches to.
    pub fn engine(&self) -> &Arc<dyn OcrEngine> {
        &self.engine
    }

    /// The uncounted dispatch path behind `recognize`.
    fn dispatch(
        &self,
        image: ImageSource,
        captcha_type: &str,
        options: &ProcessorOptions,
        cache_hit: &mut bool,
    ) -> CaptchaResult<String> {
        let processor = self.registry.resolve(captcha_type)?;

        let bytes = image.into_bytes(&self.config.recognition)?;
        let content_hash = ContentHash::of(&bytes);
        let params_digest = ParamsDigest::of(options);
        let key = CacheKey::new(content_hash, captcha_type);

        if self.config.cache.enabled {
            if let Some(entry) = self.cache.get(&key) {
                if entry.params_digest == params_digest {
                    *cache_hit = true;
                    return Ok(entry.result);
                }
                // Recorded under different options: a miss, recompute
            }
        }

        let result = processor.process(&bytes, options)?;
        if result.trim().is_empty() {
            return Err(CaptchaError::recognition_failed(format!(
                "processor '{}' produced an empty result",
                processor.name()
            )));
        }

        if self.config.cache.enabled {
            self.cache.put(key, result.clone(), params_digest);
        }

        Ok(result)
    }
}

impl std::fmt::Debug for CaptchaRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptchaRecognizer")
            .field("known_types", &self.registry.known_types())
            .field("cache", &self.cache)
            .finish()
    }
}
