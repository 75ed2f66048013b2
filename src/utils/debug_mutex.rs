use std::sync::{Mutex, MutexGuard, PoisonError};

/// a Mutex which traces who locks it and for what reason
///
/// a poisoned lock is recovered, the tables guarded by it are only mutated with single inserts and removes
pub struct DebugMutex<T> {
    name: &'static str,
    mtx: Mutex<T>,
}

impl<T> DebugMutex<T> {
    pub fn new(inner: T, name: &'static str) -> Self {
        DebugMutex {
            mtx: Mutex::new(inner),
            name,
        }
    }
    pub fn lock(&self, reason: &'static str) -> MutexGuard<'_, T> {
        log::trace!(
            "lock mutex:{} for: {} from thread: {}",
            self.name,
            reason,
            thread_id::get()
        );
        let ret = self.mtx.lock().unwrap_or_else(|e: PoisonError<MutexGuard<'_, T>>| {
            log::error!("mutex:{} was poisoned, recovering for: {}", self.name, reason);
            e.into_inner()
        });
        log::trace!(
            "locked mutex:{} for: {} from thread: {}",
            self.name,
            reason,
            thread_id::get()
        );
        ret
    }
    pub fn get_name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
pub mod tests {
    use crate::utils::debug_mutex::DebugMutex;
    use std::sync::Arc;

    #[test]
    fn test_lock_across_threads() {
        let mtx = Arc::new(DebugMutex::new(vec![], "test_vec"));
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let mtx = mtx.clone();
                std::thread::spawn(move || mtx.lock("push").push(i))
            })
            .collect();
        for h in handles {
            h.join().expect("thread failed");
        }
        assert_eq!(mtx.lock("len").len(), 4);
        assert_eq!(mtx.get_name(), "test_vec");
    }

    #[test]
    fn test_poison_recovered() {
        let mtx = Arc::new(DebugMutex::new(1, "poisoned"));
        let mtx2 = mtx.clone();
        let _ = std::thread::spawn(move || {
            let _guard = mtx2.lock("panic");
            panic!("poison it");
        })
        .join();
        assert_eq!(*mtx.lock("read"), 1);
    }
}
