use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

/// Job status enum representing the state of a tracked lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    InProgress,
    Completed,
    Failed,
}

struct JobEntry {
    status: JobStatus,
    /// Insertion sequence, used to report in-progress jobs in creation order
    seq: u64,
    /// Set when the job reaches a terminal status; drives TTL pruning
    finished_at: Option<Instant>,
}

struct Inner {
    jobs: HashMap<String, JobEntry>,
    next_seq: u64,
}

/// In-memory registry of lookup jobs
///
/// Jobs live for the lifetime of the process; there is no persistence.
/// Finished jobs are pruned once they are older than the configured TTL,
/// so the map stays bounded under sustained traffic. In-progress jobs are
/// never evicted.
///
/// The mutex is never held across an await point.
pub struct JobRegistry {
    inner: Mutex<Inner>,
    ttl: Duration,
}

impl JobRegistry {
    /// Create an empty registry with the given retention for finished jobs
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                jobs: HashMap::new(),
                next_seq: 0,
            }),
            ttl,
        }
    }

    /// Register a new job and return its generated id
    pub fn create(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let mut inner = self.inner.lock().unwrap();

        Self::prune(&mut inner, self.ttl);

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.jobs.insert(
            id.clone(),
            JobEntry {
                status: JobStatus::InProgress,
                seq,
                finished_at: None,
            },
        );

        info!("Registry: created job {}", id);
        id
    }

    /// Overwrite the status of a tracked job
    ///
    /// A no-op when the id is unknown (it may already have been pruned).
    pub fn set_status(&self, id: &str, status: JobStatus) {
        let mut inner = self.inner.lock().unwrap();
        match inner.jobs.get_mut(id) {
            Some(entry) => {
                entry.status = status;
                if status != JobStatus::InProgress {
                    entry.finished_at = Some(Instant::now());
                }
                info!("Registry: job {} -> {:?}", id, status);
            }
            None => debug!("Registry: set_status for unknown job {}", id),
        }
    }

    /// Look up the current status of a job
    pub fn status(&self, id: &str) -> Option<JobStatus> {
        let inner = self.inner.lock().unwrap();
        inner.jobs.get(id).map(|entry| entry.status)
    }

    /// Snapshot of all in-progress job ids, in creation order
    pub fn in_progress(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        let mut entries: Vec<(&String, &JobEntry)> = inner
            .jobs
            .iter()
            .filter(|(_, entry)| entry.status == JobStatus::InProgress)
            .collect();
        entries.sort_by_key(|(_, entry)| entry.seq);
        entries.into_iter().map(|(id, _)| id.clone()).collect()
    }

    /// Number of jobs currently tracked, any status
    pub fn tracked(&self) -> usize {
        self.inner.lock().unwrap().jobs.len()
    }

    fn prune(inner: &mut Inner, ttl: Duration) {
        let before = inner.jobs.len();
        inner.jobs.retain(|_, entry| match entry.finished_at {
            Some(finished) => finished.elapsed() < ttl,
            None => true,
        });
        let removed = before - inner.jobs.len();
        if removed > 0 {
            debug!("Registry: pruned {} finished jobs", removed);
        }
    }
}
