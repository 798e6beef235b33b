use crate::check::ActivityCheck;
use crate::snapshot::Snapshot;
use common::OperationTimer;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};
use tracker::{ProjectRecord, ProjectSource};

/// Allow-list cache shared by every lookup site.
///
/// Built once at startup and handed out behind an `Arc`. `load` fetches a
/// fresh list, builds a new [`Snapshot`] without holding the lock and swaps
/// it in; readers clone the current `Arc<Snapshot>` and never observe a
/// partially built one.
pub struct ActiveProjectsCache {
    source: Arc<dyn ProjectSource>,
    snapshot: RwLock<Arc<Snapshot>>,
}

impl ActiveProjectsCache {
    pub fn new(source: Arc<dyn ProjectSource>) -> Self {
        Self {
            source,
            snapshot: RwLock::new(Arc::new(Snapshot::empty())),
        }
    }

    /// Fetch from the source and replace the whole snapshot.
    ///
    /// On error the previous snapshot stays in place and the error is
    /// returned unchanged; the caller decides whether to carry on with it.
    pub async fn load(&self) -> anyhow::Result<usize> {
        let timer = OperationTimer::new("active_projects.load");
        let fetched = self.source.fetch_projects().await;
        timer.finish_with_result(&fetched);

        let snapshot = Arc::new(Snapshot::build(fetched?));
        let count = snapshot.len();
        *self.snapshot.write() = snapshot;

        info!(count, "Active projects cache loaded");
        Ok(count)
    }

    /// Current snapshot; stays valid even if a reload happens meanwhile
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().is_loaded()
    }

    /// Accepts `&str` or `Option<&str>`; `None` behaves like an empty query.
    pub fn is_active<'a>(&self, query: impl Into<Option<&'a str>>) -> ActivityCheck {
        let query = query.into();
        let check = self.snapshot().resolve(query);
        debug!(
            query = query.unwrap_or_default(),
            kind = ?check.kind,
            matches = check.matches.len(),
            "Resolved project query"
        );
        check
    }

    pub fn list_all(&self) -> Vec<ProjectRecord> {
        self.snapshot().projects().to_vec()
    }

    pub fn count(&self) -> usize {
        self.snapshot().len()
    }

    pub fn get_sample_names(&self, limit: usize) -> Vec<String> {
        self.snapshot().sample_names(limit)
    }

    /// Parallel key and name lists, for matching in other systems
    pub fn keys_and_names(&self) -> (Vec<String>, Vec<String>) {
        let snapshot = self.snapshot();
        snapshot
            .projects()
            .iter()
            .map(|p| (p.key.clone(), p.name.clone()))
            .unzip()
    }
}

impl std::fmt::Debug for ActiveProjectsCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("ActiveProjectsCache")
            .field("loaded", &snapshot.is_loaded())
            .field("count", &snapshot.len())
            .finish()
    }
}
