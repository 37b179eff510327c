//! Bounded pool of console decorations.

use std::sync::{Arc, Mutex};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::decoration::{DecorationPair, PALETTE};

/// Hands out [`DecorationPair`]s to tasks, waiting when all are taken.
///
/// Clones share the same slots, so across the whole process no more tasks
/// hold a pair at once than the palette has entries.
#[derive(Debug, Clone)]
pub struct DecorationPool {
    palette: Arc<Vec<DecorationPair>>,
    free: Arc<Mutex<Vec<usize>>>,
    slots: Arc<Semaphore>,
}

impl DecorationPool {
    /// Pool over the built-in [`PALETTE`].
    pub fn new() -> Self {
        Self::with_palette(PALETTE.to_vec())
    }

    /// Pool over a caller-supplied palette.
    pub fn with_palette(palette: Vec<DecorationPair>) -> Self {
        assert!(!palette.is_empty(), "decoration palette must not be empty");
        // Reversed so the first acquire pops slot 0.
        let free: Vec<usize> = (0..palette.len()).rev().collect();
        let slots = Arc::new(Semaphore::new(palette.len()));
        Self {
            palette: Arc::new(palette),
            free: Arc::new(Mutex::new(free)),
            slots,
        }
    }

    /// Number of pairs the pool can have on loan at once.
    pub fn capacity(&self) -> usize {
        self.palette.len()
    }

    /// Borrow a pair from the pool, waiting until one is free.
    pub async fn acquire(&self) -> DecorationGuard {
        let permit = self
            .slots
            .clone()
            .acquire_owned()
            .await
            .expect("decoration pool semaphore closed");
        let index = self
            .free
            .lock()
            .unwrap()
            .pop()
            .expect("permit held but free list is empty");
        DecorationGuard {
            pair: self.palette[index],
            index,
            free: Arc::clone(&self.free),
            _permit: permit,
        }
    }
}

impl Default for DecorationPool {
    fn default() -> Self {
        Self::new()
    }
}

/// A decoration pair on loan; dropping the guard returns the pair.
#[derive(Debug)]
pub struct DecorationGuard {
    pair: DecorationPair,
    index: usize,
    free: Arc<Mutex<Vec<usize>>>,
    _permit: OwnedSemaphorePermit,
}

impl DecorationGuard {
    /// The borrowed pair.
    pub fn pair(&self) -> DecorationPair {
        self.pair
    }
}

impl Drop for DecorationGuard {
    fn drop(&mut self) {
        // The index is back on the free list before the permit drops, so a
        // waiter woken by the permit always finds a slot.
        self.free.lock().unwrap().push(self.index);
    }
}
