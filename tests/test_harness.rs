// tests/test_harness.rs
//! Shared setup for the headless integration tests.
//!
//! Boots a `HeadlessEngine` with the full class catalog and hands out the
//! loaded `Engine` plus the engine double for inspection.

#![allow(dead_code)]

use std::sync::Arc;

use gdbind::headless::HeadlessEngine;
use gdbind::{BindError, BindingConfig, Engine};

pub struct TestHarness {
    pub headless: Arc<HeadlessEngine>,
    pub engine: Arc<Engine>,
}

impl TestHarness {
    /// Default headless engine, lenient binds.
    pub fn new() -> Self {
        Self::try_with(HeadlessEngine::new(), BindingConfig::default()).expect("catalog binds resolve")
    }

    pub fn with(headless: HeadlessEngine, config: BindingConfig) -> Self {
        Self::try_with(headless, config).expect("engine loads")
    }

    pub fn try_with(headless: HeadlessEngine, config: BindingConfig) -> Result<Self, BindError> {
        let headless = Arc::new(headless);
        let engine = headless.boot(config)?;
        Ok(Self { headless, engine })
    }

    /// Payloads created and not yet destroyed.
    pub fn assert_no_leaked_payloads(&self) {
        assert_eq!(self.headless.live_payloads(), 0, "temporaries leaked");
        assert_eq!(self.headless.invalid_releases(), 0, "temporary released twice");
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
