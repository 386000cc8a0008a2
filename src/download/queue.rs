// src/download/queue.rs

use super::item::DownloadItem;
use crate::{error::AppResult, models::DownloadStatus};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, VecDeque},
    fs,
    path::PathBuf,
    sync::Mutex,
};

/// Invoked synchronously under the queue lock on every progress update.
/// Callers must not block or re-enter the queue from the callback.
pub type QueueProgressCallback = Box<dyn Fn(&DownloadItem) + Send>;

#[derive(Serialize)]
struct SnapshotOut<'a> {
    items: Vec<&'a DownloadItem>,
}

#[derive(Deserialize)]
struct SnapshotIn {
    #[serde(default)]
    items: Vec<DownloadItem>,
}

#[derive(Default)]
struct QueueInner {
    items: HashMap<String, DownloadItem>,
    order: Vec<String>,
    fifo: VecDeque<String>,
    paused: bool,
    on_progress: Option<QueueProgressCallback>,
}

impl QueueInner {
    fn insert(&mut self, item: DownloadItem, enqueue: bool) {
        if enqueue {
            self.fifo.push_back(item.id.clone());
        }
        self.order.push(item.id.clone());
        self.items.insert(item.id.clone(), item);
    }

    /// Items in insertion order, the shape every snapshot is written in.
    fn ordered(&self) -> Vec<&DownloadItem> {
        self.order.iter().filter_map(|id| self.items.get(id)).collect()
    }
}

/// In-memory download queue guarded by a single coarse lock, optionally
/// persisted to a JSON snapshot after every mutation.
pub struct DownloadQueue {
    inner: Mutex<QueueInner>,
    queue_file: Option<PathBuf>,
}

impl DownloadQueue {
    /// An existing snapshot is loaded and its PENDING items re-enqueued in
    /// file order. Malformed snapshot content is treated as an empty queue.
    pub fn new(queue_file: Option<PathBuf>) -> Self {
        let queue = Self {
            inner: Mutex::new(QueueInner::default()),
            queue_file,
        };
        queue.load();
        queue
    }

    pub fn add(&self, url: impl Into<String>, title: impl Into<String>) -> AppResult<DownloadItem> {
        let mut inner = self.inner.lock().unwrap();
        let item = DownloadItem::new(url, title);
        inner.insert(item.clone(), true);
        self.persist(&inner)?;
        Ok(item)
    }

    /// Adds several URLs under one lock acquisition and one persist.
    pub fn add_batch(&self, urls: &[String]) -> AppResult<Vec<DownloadItem>> {
        let mut inner = self.inner.lock().unwrap();
        let mut added = Vec::with_capacity(urls.len());
        for url in urls {
            let item = DownloadItem::new(url.clone(), "");
            inner.insert(item.clone(), true);
            added.push(item);
        }
        self.persist(&inner)?;
        Ok(added)
    }

    /// Pops the next PENDING item. Ids whose item is no longer pending
    /// (cancelled or paused while queued) are dropped and skipped; a
    /// queue-wide pause returns None without consuming anything.
    pub fn get_next(&self) -> Option<DownloadItem> {
        let mut inner = self.inner.lock().unwrap();
        if inner.paused {
            return None;
        }
        while let Some(id) = inner.fifo.pop_front() {
            match inner.items.get(&id) {
                Some(item) if item.status == DownloadStatus::Pending => {
                    return Some(item.clone());
                }
                _ => {
                    debug!("dropping stale queue id {}", id);
                }
            }
        }
        None
    }

    /// Progress is volatile state: it is not written to the snapshot, but
    /// the progress callback fires synchronously under the lock.
    pub fn update_progress(&self, item_id: &str, progress: f64) {
        let inner = &mut *self.inner.lock().unwrap();
        if let Some(item) = inner.items.get_mut(item_id) {
            item.progress = progress;
            if let Some(callback) = &inner.on_progress {
                callback(item);
            }
        }
    }

    /// DOWNLOADING/COMPLETED/FAILED go through the item's `mark_*` helpers
    /// (timestamps and progress as side effects); other statuses are set
    /// directly.
    pub fn update_status(
        &self,
        item_id: &str,
        status: DownloadStatus,
        error: Option<&str>,
    ) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(item) = inner.items.get_mut(item_id) {
            match status {
                DownloadStatus::Downloading => item.mark_started(),
                DownloadStatus::Completed => item.mark_completed(None),
                DownloadStatus::Failed => item.mark_failed(error.unwrap_or("Unknown error")),
                other => item.status = other,
            }
            self.persist(&inner)?;
        }
        Ok(())
    }

    /// With an id: pauses that item. Without: sets the queue-wide pause
    /// flag, which blocks every `get_next` regardless of item status.
    pub fn pause(&self, item_id: Option<&str>) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        match item_id {
            Some(id) => {
                if let Some(item) = inner.items.get_mut(id) {
                    item.status = DownloadStatus::Paused;
                }
            }
            None => inner.paused = true,
        }
        self.persist(&inner)
    }

    /// With an id: re-enqueues the item only if it was PAUSED. Without:
    /// clears the queue-wide pause flag.
    pub fn resume(&self, item_id: Option<&str>) -> AppResult<()> {
        let mut inner = self.inner.lock().unwrap();
        match item_id {
            Some(id) => {
                if let Some(item) = inner.items.get_mut(id)
                    && item.status == DownloadStatus::Paused
                {
                    item.status = DownloadStatus::Pending;
                    inner.fifo.push_back(id.to_string());
                }
            }
            None => inner.paused = false,
        }
        self.persist(&inner)
    }

    /// Returns whether the item existed. The stale FIFO id is dropped
    /// lazily by a later `get_next`.
    pub fn cancel(&self, item_id: &str) -> AppResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(item) = inner.items.get_mut(item_id) {
            item.status = DownloadStatus::Cancelled;
            self.persist(&inner)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Only valid from FAILED: increments the retry count, clears the
    /// error and makes the id reachable again via `get_next`.
    pub fn retry(&self, item_id: &str) -> AppResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(item) = inner.items.get_mut(item_id)
            && item.status == DownloadStatus::Failed
        {
            item.status = DownloadStatus::Pending;
            item.error = None;
            item.retries += 1;
            inner.fifo.push_back(item_id.to_string());
            self.persist(&inner)?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn get_all(&self) -> Vec<DownloadItem> {
        let inner = self.inner.lock().unwrap();
        inner.ordered().into_iter().cloned().collect()
    }

    pub fn get_by_status(&self, status: DownloadStatus) -> Vec<DownloadItem> {
        let inner = self.inner.lock().unwrap();
        inner
            .ordered()
            .into_iter()
            .filter(|item| item.status == status)
            .cloned()
            .collect()
    }

    /// Drops COMPLETED and CANCELLED items, returning how many went.
    pub fn clear_completed(&self) -> AppResult<usize> {
        let inner = &mut *self.inner.lock().unwrap();
        let to_remove: Vec<String> = inner
            .items
            .values()
            .filter(|item| {
                matches!(
                    item.status,
                    DownloadStatus::Completed | DownloadStatus::Cancelled
                )
            })
            .map(|item| item.id.clone())
            .collect();
        for id in &to_remove {
            inner.items.remove(id);
        }
        inner.order.retain(|id| inner.items.contains_key(id));
        self.persist(&inner)?;
        Ok(to_remove.len())
    }

    pub fn set_progress_callback(&self, callback: QueueProgressCallback) {
        self.inner.lock().unwrap().on_progress = Some(callback);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_paused(&self) -> bool {
        self.inner.lock().unwrap().paused
    }

    fn persist(&self, inner: &QueueInner) -> AppResult<()> {
        let Some(path) = &self.queue_file else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let snapshot = SnapshotOut { items: inner.ordered() };
        fs::write(path, serde_json::to_string_pretty(&snapshot)?)?;
        Ok(())
    }

    fn load(&self) {
        let Some(path) = &self.queue_file else {
            return;
        };
        let Ok(content) = fs::read_to_string(path) else {
            return;
        };
        match serde_json::from_str::<SnapshotIn>(&content) {
            Ok(snapshot) => {
                let mut inner = self.inner.lock().unwrap();
                for item in snapshot.items {
                    let pending = item.status == DownloadStatus::Pending;
                    inner.insert(item, pending);
                }
                debug!("restored {} queue items from {:?}", inner.items.len(), path);
            }
            Err(e) => {
                warn!("ignoring malformed queue snapshot {:?}: {}", path, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };
    use tempfile::tempdir;

    fn memory_queue() -> DownloadQueue {
        DownloadQueue::new(None)
    }

    #[test]
    fn test_add_and_get_next_fifo_order() {
        let queue = memory_queue();
        let a = queue.add("https://yt/a", "").unwrap();
        let b = queue.add("https://yt/b", "").unwrap();

        assert_eq!(queue.get_next().unwrap().id, a.id);
        assert_eq!(queue.get_next().unwrap().id, b.id);
        assert!(queue.get_next().is_none());
    }

    #[test]
    fn test_get_next_never_returns_cancelled_item() {
        let queue = memory_queue();
        let a = queue.add("https://yt/a", "").unwrap();
        let b = queue.add("https://yt/b", "").unwrap();
        assert!(queue.cancel(&a.id).unwrap());

        // the cancelled id is skipped and permanently discarded
        assert_eq!(queue.get_next().unwrap().id, b.id);
        assert!(queue.get_next().is_none());
    }

    #[test]
    fn test_queue_wide_pause_blocks_get_next_without_consuming() {
        let queue = memory_queue();
        let a = queue.add("https://yt/a", "").unwrap();

        queue.pause(None).unwrap();
        assert!(queue.is_paused());
        assert!(queue.get_next().is_none());

        queue.resume(None).unwrap();
        assert_eq!(queue.get_next().unwrap().id, a.id);
    }

    #[test]
    fn test_item_pause_and_resume_requeues() {
        let queue = memory_queue();
        let a = queue.add("https://yt/a", "").unwrap();
        queue.pause(Some(&a.id)).unwrap();

        // paused item's id is dropped at dequeue time
        assert!(queue.get_next().is_none());

        queue.resume(Some(&a.id)).unwrap();
        assert_eq!(queue.get_next().unwrap().id, a.id);

        // resuming a non-paused item is a no-op
        queue.resume(Some(&a.id)).unwrap();
        assert!(queue.get_next().is_none());
    }

    #[test]
    fn test_retry_only_valid_from_failed() {
        let queue = memory_queue();
        let a = queue.add("https://yt/a", "").unwrap();

        assert!(!queue.retry(&a.id).unwrap(), "pending item must not be retriable");

        queue.get_next().unwrap();
        queue
            .update_status(&a.id, DownloadStatus::Failed, Some("boom"))
            .unwrap();
        assert!(queue.retry(&a.id).unwrap());

        let item = queue.get_next().unwrap();
        assert_eq!(item.id, a.id);
        assert_eq!(item.status, DownloadStatus::Pending);
        assert_eq!(item.retries, 1);
        assert!(item.error.is_none());
    }

    #[test]
    fn test_cancelled_item_cannot_be_retried() {
        let queue = memory_queue();
        let a = queue.add("https://yt/a", "").unwrap();
        queue
            .update_status(&a.id, DownloadStatus::Failed, Some("boom"))
            .unwrap();
        queue.cancel(&a.id).unwrap();
        assert!(!queue.retry(&a.id).unwrap());
    }

    #[test]
    fn test_update_status_routes_through_mark_helpers() {
        let queue = memory_queue();
        let a = queue.add("https://yt/a", "").unwrap();

        queue.update_status(&a.id, DownloadStatus::Downloading, None).unwrap();
        queue.update_status(&a.id, DownloadStatus::Completed, None).unwrap();

        let item = &queue.get_all()[0];
        assert_eq!(item.status, DownloadStatus::Completed);
        assert_eq!(item.progress, 100.0);
    }

    #[test]
    fn test_clear_completed_removes_exactly_terminal_items() {
        let queue = memory_queue();
        let a = queue.add("https://yt/a", "").unwrap();
        let b = queue.add("https://yt/b", "").unwrap();
        let c = queue.add("https://yt/c", "").unwrap();
        let d = queue.add("https://yt/d", "").unwrap();

        queue.update_status(&a.id, DownloadStatus::Completed, None).unwrap();
        queue.cancel(&b.id).unwrap();
        queue.update_status(&c.id, DownloadStatus::Failed, Some("x")).unwrap();

        assert_eq!(queue.clear_completed().unwrap(), 2);
        let remaining: Vec<String> = queue.get_all().iter().map(|i| i.id.clone()).collect();
        assert_eq!(remaining, vec![c.id.clone(), d.id.clone()]);
        assert_eq!(queue.get_by_status(DownloadStatus::Failed).len(), 1);
    }

    #[test]
    fn test_progress_callback_fires_under_lock() {
        let queue = memory_queue();
        let a = queue.add("https://yt/a", "").unwrap();

        let calls = Arc::new(AtomicU32::new(0));
        let seen = calls.clone();
        queue.set_progress_callback(Box::new(move |item| {
            assert!(item.progress > 0.0);
            seen.fetch_add(1, Ordering::SeqCst);
        }));

        queue.update_progress(&a.id, 25.0);
        queue.update_progress(&a.id, 50.0);
        queue.update_progress("no-such-id", 99.0);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_snapshot_roundtrip_reenqueues_pending() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("queue.json");
        let (pending_id, done_id);
        {
            let queue = DownloadQueue::new(Some(path.clone()));
            let a = queue.add("https://yt/a", "").unwrap();
            let b = queue.add("https://yt/b", "").unwrap();
            queue.update_status(&b.id, DownloadStatus::Completed, None).unwrap();
            pending_id = a.id;
            done_id = b.id;
        }

        let restored = DownloadQueue::new(Some(path));
        assert_eq!(restored.len(), 2);
        let next = restored.get_next().unwrap();
        assert_eq!(next.id, pending_id);
        assert!(restored.get_next().is_none(), "completed item must not re-enqueue");
        assert_eq!(
            restored.get_by_status(DownloadStatus::Completed)[0].id,
            done_id
        );
    }

    #[test]
    fn test_malformed_snapshot_is_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("queue.json");
        fs::write(&path, "{ not json at all").unwrap();

        let queue = DownloadQueue::new(Some(path));
        assert!(queue.is_empty());
        assert!(queue.get_next().is_none());
    }

    #[test]
    fn test_add_batch_single_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("queue.json");
        let queue = DownloadQueue::new(Some(path.clone()));
        let urls = vec!["https://yt/a".to_string(), "https://yt/b".to_string()];
        let items = queue.add_batch(&urls).unwrap();
        assert_eq!(items.len(), 2);

        let snapshot: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(snapshot["items"].as_array().unwrap().len(), 2);
        assert_eq!(snapshot["items"][0]["url"], "https://yt/a");
    }
}
