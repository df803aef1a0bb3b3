// Typo-Suggest Reader/Writer Lock
// Counter based RW lock for many short reads and rare writes
//
// The reader counter doubles as the writer announcement: a writer subtracts
// MAX_READERS, which makes the counter negative for every reader arriving
// after it and, at the same time, tells the writer how many readers were
// already inside.

use std::sync::atomic::{AtomicI32, Ordering};

use parking_lot::lock_api::{self, GuardSend};
use parking_lot::{Condvar, Mutex};

/// Upper bound on concurrently active readers
const MAX_READERS: i32 = 1 << 30;

/// Data protected by a [`ConcurrentRwLock`]
pub type RwcLock<T> = lock_api::RwLock<ConcurrentRwLock, T>;

/// Shared guard for [`RwcLock`]
pub type RwcReadGuard<'a, T> = lock_api::RwLockReadGuard<'a, ConcurrentRwLock, T>;

/// Exclusive guard for [`RwcLock`]
pub type RwcWriteGuard<'a, T> = lock_api::RwLockWriteGuard<'a, ConcurrentRwLock, T>;

/// Counting wake-up signal
struct Semaphore {
    permits: Mutex<usize>,
    available: Condvar,
}

impl Semaphore {
    const fn new(permits: usize) -> Self {
        Self {
            permits: parking_lot::const_mutex(permits),
            available: Condvar::new(),
        }
    }

    fn try_acquire(&self) -> bool {
        let mut permits = self.permits.lock();
        if *permits == 0 {
            return false;
        }
        *permits -= 1;
        true
    }

    fn acquire(&self) {
        let mut permits = self.permits.lock();
        while *permits == 0 {
            self.available.wait(&mut permits);
        }
        *permits -= 1;
    }

    fn release(&self, n: usize) {
        if n == 0 {
            return;
        }
        let mut permits = self.permits.lock();
        *permits += n;
        if n == 1 {
            self.available.notify_one();
        } else {
            self.available.notify_all();
        }
    }
}

/// Reader/writer lock tuned for read-heavy workloads
///
/// Readers only touch an atomic counter unless a writer is pending. Writers
/// are serialized by a single-permit semaphore and wait for the readers that were active
/// when they announced themselves; readers arriving after the announcement
/// wait for the writer to finish.
///
/// Unbalanced unlock calls corrupt the counters for every later caller, so
/// they panic instead of returning an error.
pub struct ConcurrentRwLock {
    /// One permit, held by the active writer
    writer: Semaphore,
    /// Active readers, minus MAX_READERS while a writer is pending
    reader_count: AtomicI32,
    /// Readers the pending writer still waits for
    reader_wait: AtomicI32,
    writer_sem: Semaphore,
    reader_sem: Semaphore,
}

impl ConcurrentRwLock {
    pub const fn new() -> Self {
        Self {
            writer: Semaphore::new(1),
            reader_count: AtomicI32::new(0),
            reader_wait: AtomicI32::new(0),
            writer_sem: Semaphore::new(0),
            reader_sem: Semaphore::new(0),
        }
    }

    /// Acquire shared access, blocking while a writer is pending
    pub fn read_lock(&self) {
        if self.reader_count.fetch_add(1, Ordering::SeqCst) + 1 < 0 {
            self.reader_sem.acquire();
        }
    }

    /// Release shared access
    ///
    /// # Panics
    /// When called without a matching [`read_lock`](Self::read_lock).
    pub fn read_unlock(&self) {
        let r = self.reader_count.fetch_sub(1, Ordering::SeqCst) - 1;
        if r >= 0 {
            return;
        }
        if r + 1 == 0 || r + 1 == -MAX_READERS {
            panic!("ConcurrentRwLock: read_unlock of unlocked lock");
        }
        // A writer is pending; the last departing reader wakes it.
        if self.reader_wait.fetch_sub(1, Ordering::SeqCst) - 1 == 0 {
            self.writer_sem.release(1);
        }
    }

    /// Acquire exclusive access
    pub fn lock(&self) {
        self.writer.acquire();
        let active = self.reader_count.fetch_sub(MAX_READERS, Ordering::SeqCst);
        if active != 0 && self.reader_wait.fetch_add(active, Ordering::SeqCst) + active != 0 {
            self.writer_sem.acquire();
        }
    }

    /// Release exclusive access
    ///
    /// # Panics
    /// When called without a matching [`lock`](Self::lock).
    pub fn unlock(&self) {
        let r = self.reader_count.fetch_add(MAX_READERS, Ordering::SeqCst) + MAX_READERS;
        if r >= MAX_READERS {
            panic!("ConcurrentRwLock: unlock of unlocked lock");
        }
        // Release the readers that queued up behind this writer.
        self.reader_sem.release(r as usize);
        self.writer.release(1);
    }

    fn try_read_lock(&self) -> bool {
        let mut current = self.reader_count.load(Ordering::SeqCst);
        loop {
            if current < 0 {
                return false;
            }
            match self.reader_count.compare_exchange_weak(
                current,
                current + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    fn try_lock(&self) -> bool {
        if !self.writer.try_acquire() {
            return false;
        }
        let claimed = self
            .reader_count
            .compare_exchange(0, -MAX_READERS, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok();
        if !claimed {
            self.writer.release(1);
        }
        claimed
    }
}

impl Default for ConcurrentRwLock {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: shared access is granted only while no writer holds the lock, and
// exclusive access only once every earlier reader has departed.
unsafe impl lock_api::RawRwLock for ConcurrentRwLock {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = ConcurrentRwLock::new();

    type GuardMarker = GuardSend;

    fn lock_shared(&self) {
        self.read_lock();
    }

    fn try_lock_shared(&self) -> bool {
        self.try_read_lock()
    }

    unsafe fn unlock_shared(&self) {
        self.read_unlock();
    }

    fn lock_exclusive(&self) {
        self.lock();
    }

    fn try_lock_exclusive(&self) -> bool {
        self.try_lock()
    }

    unsafe fn unlock_exclusive(&self) {
        self.unlock();
    }
}
