//! the single-flight memo of module loads
//!
//! Every resolved url maps to one shared load future. The entry is inserted before the load is first polled so
//! concurrent callers for the same url all await the same load. Successful loads stay cached, a failed load
//! removes its own entry (and only its own, entries are tagged with an id) so a later caller may retry.
//!
//! A started load is also driven by a task on the helper runtime, it runs to completion even when every caller
//! stops waiting for it.

use crate::moduleerror::ModuleError;
use crate::resolver::ModuleUrl;
use crate::utils::debug_mutex::DebugMutex;
use crate::utils::helper_tasks::add_helper_task_async;
use crate::values::Exports;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub type SharedLoad = Shared<BoxFuture<'static, Result<Exports, ModuleError>>>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LoadState {
    Pending,
    Fulfilled,
    Rejected,
}

#[derive(Clone)]
pub struct LoadEntry {
    id: usize,
    load: SharedLoad,
}

impl LoadEntry {
    pub fn get_id(&self) -> usize {
        self.id
    }

    pub fn state(&self) -> LoadState {
        match self.load.peek() {
            None => LoadState::Pending,
            Some(Ok(_)) => LoadState::Fulfilled,
            Some(Err(_)) => LoadState::Rejected,
        }
    }
}

pub struct LoadCache {
    entries: DebugMutex<HashMap<ModuleUrl, LoadEntry>>,
    last_id: AtomicUsize,
}

impl Default for LoadCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadCache {
    pub fn new() -> Self {
        Self {
            entries: DebugMutex::new(HashMap::new(), "LoadCache::entries"),
            last_id: AtomicUsize::new(0),
        }
    }

    /// get the load for a url, start is only called when there is no entry for the url yet
    pub fn get_or_start<S, F>(self: &Arc<Self>, url: &ModuleUrl, start: S) -> SharedLoad
    where
        S: FnOnce() -> F,
        F: Future<Output = Result<Exports, ModuleError>> + Send + 'static,
    {
        let mut entries = self.entries.lock("get_or_start");
        if let Some(entry) = entries.get(url) {
            log::trace!("LoadCache: joining {:?} load of {}", entry.state(), url);
            return entry.load.clone();
        }

        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        log::trace!("LoadCache: starting load {} of {}", id, url);
        let cache_ref = Arc::downgrade(self);
        let evict_url = url.clone();
        let load = start();
        let load = async move {
            let res = load.await;
            if let Err(e) = &res {
                log::debug!("LoadCache: load {} of {} failed, evicting: {}", id, evict_url, e);
                if let Some(cache) = cache_ref.upgrade() {
                    cache.evict(&evict_url, id);
                }
            }
            res
        }
        .boxed()
        .shared();

        entries.insert(
            url.clone(),
            LoadEntry {
                id,
                load: load.clone(),
            },
        );
        // dropping the join handle detaches the task, the outcome is read through the shared load
        drop(add_helper_task_async(load.clone().map(|_| ())));
        load
    }

    /// remove the entry for url if it is still the entry with the given id
    pub fn evict(&self, url: &ModuleUrl, id: usize) -> bool {
        let mut entries = self.entries.lock("evict");
        match entries.get(url) {
            Some(entry) if entry.id == id => {
                entries.remove(url);
                true
            }
            _ => false,
        }
    }

    pub fn state(&self, url: &ModuleUrl) -> Option<LoadState> {
        self.entries.lock("state").get(url).map(|e| e.state())
    }

    pub fn contains(&self, url: &ModuleUrl) -> bool {
        self.entries.lock("contains").contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.lock("len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
