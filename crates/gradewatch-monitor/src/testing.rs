//! In-memory port implementations shared by the monitor tests

use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use gradewatch_core::{
    domain::{Observation, SnapshotError},
    ports::{Credentials, IGradeSource, IPushService, ISnapshotStore, PushRequest},
};

/// Grade source replaying a script of observations
///
/// The last scripted observation repeats once the script is exhausted.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Observation>>,
    error: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn sequence(observations: Vec<Observation>) -> Self {
        Self {
            script: Mutex::new(observations.into()),
            error: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn repeating(observation: Observation) -> Self {
        Self::sequence(vec![observation])
    }

    pub fn failing(message: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            error: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IGradeSource for ScriptedSource {
    async fn acquire(&self, _credentials: &Credentials) -> anyhow::Result<Observation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.error {
            anyhow::bail!("{message}");
        }
        let mut script = self.script.lock().unwrap();
        let next = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        next.ok_or_else(|| anyhow::anyhow!("script is empty"))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Snapshot store held in memory, counting reads and writes
#[derive(Default)]
pub struct MemoryStore {
    snapshot: Mutex<Option<Observation>>,
    failing_saves: AtomicUsize,
    loads: AtomicUsize,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn with_snapshot(observation: Observation) -> Self {
        let store = Self::default();
        *store.snapshot.lock().unwrap() = Some(observation);
        store
    }

    pub fn fail_next_saves(&self, count: usize) {
        self.failing_saves.store(count, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Option<Observation> {
        self.snapshot.lock().unwrap().clone()
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ISnapshotStore for MemoryStore {
    async fn load(&self) -> Result<Option<Observation>, SnapshotError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.snapshot())
    }

    async fn save(&self, observation: &Observation) -> Result<(), SnapshotError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.failing_saves.load(Ordering::SeqCst) > 0 {
            self.failing_saves.fetch_sub(1, Ordering::SeqCst);
            return Err(SnapshotError::Io {
                path: PathBuf::from("memory"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "read-only filesystem"),
            });
        }
        *self.snapshot.lock().unwrap() = Some(observation.clone());
        Ok(())
    }
}

/// Push service recording delivered messages
#[derive(Default)]
pub struct CountingPush {
    contents: Mutex<Vec<String>>,
}

impl CountingPush {
    pub fn count(&self) -> usize {
        self.contents.lock().unwrap().len()
    }

    pub fn last_content(&self) -> Option<String> {
        self.contents.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl IPushService for CountingPush {
    async fn push(&self, request: &PushRequest) -> anyhow::Result<()> {
        self.contents.lock().unwrap().push(request.content.clone());
        Ok(())
    }
}
