use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::export::orchestrator::{ExportOrchestrator, ExportSnapshot, ExportStatus, Exporters};

/// Bounds on how many sessions are retained and for how long.
#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    /// An idle session untouched for this long is dropped.
    pub idle_ttl: Duration,
    pub max_sessions: usize,
}

struct SessionEntry {
    orchestrator: Arc<ExportOrchestrator>,
    last_used: Instant,
}

impl SessionEntry {
    /// Idle and not borrowed by an in-flight request.
    fn is_evictable(&self) -> bool {
        Arc::strong_count(&self.orchestrator) == 1
            && self.orchestrator.status() == ExportStatus::Idle
    }
}

/// One orchestrator per editing session, created on first use.
///
/// Sessions that sit idle past `idle_ttl` are pruned, and the map never grows beyond
/// `max_sessions` idle entries: the least recently used idle session goes first. A session
/// that is exporting, or held by a request, is never evicted.
pub struct ExportSessions {
    exporters: Exporters,
    limits: SessionLimits,
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
}

impl ExportSessions {
    pub fn new(exporters: Exporters, limits: SessionLimits) -> Self {
        Self {
            exporters,
            limits,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn open(&self, session_id: Uuid) -> Arc<ExportOrchestrator> {
        let now = Instant::now();
        let mut sessions = self.lock();

        if let Some(entry) = sessions.get_mut(&session_id) {
            entry.last_used = now;
            return entry.orchestrator.clone();
        }

        self.prune(&mut sessions, now);
        debug!(%session_id, live = sessions.len(), "Opening export session");
        let orchestrator = Arc::new(ExportOrchestrator::new(self.exporters.clone()));
        sessions.insert(
            session_id,
            SessionEntry {
                orchestrator: orchestrator.clone(),
                last_used: now,
            },
        );
        orchestrator
    }

    /// Current state of a session. Unknown sessions report an idle, empty snapshot.
    pub fn snapshot(&self, session_id: Uuid) -> ExportSnapshot {
        let mut sessions = self.lock();
        match sessions.get_mut(&session_id) {
            Some(entry) => {
                entry.last_used = Instant::now();
                entry.orchestrator.snapshot()
            }
            None => ExportSnapshot {
                status: ExportStatus::Idle,
                progress: 0,
                last_outcome: None,
            },
        }
    }

    /// Drops expired idle sessions, then the oldest idle ones until one slot is free.
    fn prune(&self, sessions: &mut HashMap<Uuid, SessionEntry>, now: Instant) {
        let before = sessions.len();
        sessions.retain(|_, entry| {
            !(entry.is_evictable() && now.duration_since(entry.last_used) >= self.limits.idle_ttl)
        });

        if sessions.len() >= self.limits.max_sessions {
            let mut idle: Vec<(Uuid, Instant)> = sessions
                .iter()
                .filter(|(_, entry)| entry.is_evictable())
                .map(|(id, entry)| (*id, entry.last_used))
                .collect();
            idle.sort_by_key(|(_, last_used)| *last_used);

            let excess = sessions.len() + 1 - self.limits.max_sessions;
            for (id, _) in idle.into_iter().take(excess) {
                sessions.remove(&id);
            }
        }

        if sessions.len() < before {
            debug!(evicted = before - sessions.len(), "Pruned export sessions");
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, SessionEntry>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.lock().len()
    }
}
