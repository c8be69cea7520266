//! Constants used throughout the recognition pipeline.

/// Default maximum number of entries in the result cache.
pub const DEFAULT_CACHE_MAX_SIZE: usize = 1000;

/// Default time-to-live for cache entries, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Default challenge type used when callers do not specify one.
pub const DEFAULT_CAPTCHA_TYPE: &str = "text";

/// Default maximum accepted image payload, in bytes (16 MiB).
pub const DEFAULT_MAX_IMAGE_SIZE: usize = 16 * 1024 * 1024;

/// Default minimum accepted image payload, in bytes.
///
/// No encoded raster image fits below this; smaller payloads are rejected
/// before they reach the engine.
pub const DEFAULT_MIN_IMAGE_SIZE: usize = 32;

/// Default recognition timeout in seconds, enforced by the engine collaborator.
pub const DEFAULT_RECOGNITION_TIMEOUT_SECS: f64 = 30.0;

/// Default threshold above which a successful recognition is logged as slow,
/// in seconds.
pub const DEFAULT_SLOW_THRESHOLD_SECS: f64 = 2.0;

/// Batch sizes above this threshold are processed in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 8;
