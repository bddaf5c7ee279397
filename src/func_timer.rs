use log::debug;
use std::time::Instant;

/// Logs how long a scope took when dropped.
pub struct FunctionTimer {
    name: &'static str,
    start: Instant,
}

impl FunctionTimer {
    pub fn new(name: &'static str) -> Self {
        FunctionTimer {
            name,
            start: Instant::now(),
        }
    }
}

impl Drop for FunctionTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        debug!("{} took {:?}", self.name, duration);
    }
}
