use crate::error::{RezipError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Guards the "start conversion" trigger: only one batch may hold it.
#[derive(Debug, Clone, Default)]
pub struct TriggerGate {
    busy: Arc<AtomicBool>,
}

impl TriggerGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Result<GateGuard> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(RezipError::BatchInProgress);
        }

        Ok(GateGuard {
            busy: self.busy.clone(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        !self.busy.load(Ordering::SeqCst)
    }
}

/// Re-enables the trigger when dropped.
#[derive(Debug)]
pub struct GateGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}
