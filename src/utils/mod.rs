//! Utility functions for the recognition pipeline.
//!
//! This module provides image source handling: turning paths, byte buffers
//! and decoded images into validated byte payloads for the dispatcher.

pub mod image;

pub use image::ImageSource;
