use crate::prelude::RepeaterError;
use log::{info, warn};

/// Tags pipeline messages with the name of the stage that emitted them.
pub struct LogManager {
    target: &'static str,
}

impl LogManager {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn record(&self, message: &str) {
        info!("{}: {}", self.target, message);
    }

    pub fn skip(&self, err: &RepeaterError) {
        warn!("{}: skipping record, {}", self.target, err);
    }

    pub fn degrade(&self, err: &RepeaterError) {
        warn!("{}: {}, emitting with blank fields", self.target, err);
    }
}
