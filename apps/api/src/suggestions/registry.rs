//! Task registry and background runner for goal suggestions.
//!
//! One registry is constructed at startup and shared through `AppState`.
//! `submit` records a pending task and spawns generation onto the registry's
//! `JoinSet`; the spawned unit is the only writer of that task's terminal
//! state. There is no cancellation and no timeout: once submitted, generation
//! always runs to completion, and a failed generation is recorded as a
//! completed task carrying `GeneratedGoal::Error`.
//!
//! Entries are never evicted. The registry lives exactly as long as the process.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::suggestions::models::{GeneratedGoal, SuggestionContext};
use crate::suggestions::provider::{ProviderKind, SuggestionProvider};

/// Opaque identifier handed to the client for polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskToken(Uuid);

impl TaskToken {
    fn generate() -> Self {
        TaskToken(Uuid::new_v4())
    }
}

impl fmt::Display for TaskToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TaskToken {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(TaskToken)
    }
}

#[derive(Debug, Clone)]
enum TaskState {
    Pending,
    Completed(GeneratedGoal),
}

#[derive(Debug, Clone)]
struct TaskRecord {
    state: TaskState,
    submitted_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Snapshot of a task as seen by a poller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TaskView {
    Pending {
        submitted_at: DateTime<Utc>,
    },
    Completed {
        submitted_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        result: GeneratedGoal,
    },
}

#[cfg(test)]
impl TaskView {
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskView::Pending { .. })
    }

    pub fn result(&self) -> Option<&GeneratedGoal> {
        match self {
            TaskView::Pending { .. } => None,
            TaskView::Completed { result, .. } => Some(result),
        }
    }
}

struct RegistryInner {
    tasks: RwLock<HashMap<TaskToken, TaskRecord>>,
    running: Mutex<JoinSet<()>>,
    provider: Arc<dyn SuggestionProvider>,
}

/// Process-wide map from task token to task state. Cheap to clone.
#[derive(Clone)]
pub struct TaskRegistry {
    inner: Arc<RegistryInner>,
}

impl TaskRegistry {
    pub fn new(provider: Arc<dyn SuggestionProvider>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                tasks: RwLock::new(HashMap::new()),
                running: Mutex::new(JoinSet::new()),
                provider,
            }),
        }
    }

    /// Kind of the provider used by `submit`.
    pub fn provider_kind(&self) -> ProviderKind {
        self.inner.provider.kind()
    }

    /// Accepts a request with the registry's provider. Returns without waiting
    /// for generation. Must be called from within a Tokio runtime.
    pub fn submit(&self, ctx: SuggestionContext) -> TaskToken {
        self.submit_with(Arc::clone(&self.inner.provider), ctx)
    }

    /// Like `submit`, but generates with `provider` for this one task.
    pub fn submit_with(
        &self,
        provider: Arc<dyn SuggestionProvider>,
        ctx: SuggestionContext,
    ) -> TaskToken {
        let token = self.insert_pending();
        let kind = provider.kind();
        let tier = ctx_tier(&ctx);

        let registry = self.clone();
        let mut running = self
            .inner
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Reap finished units so the set only tracks in-flight work.
        while let Some(finished) = running.try_join_next() {
            log_join_result(finished);
        }
        running.spawn(async move {
            let goal = provider.generate_goal(&ctx).await;
            registry.complete(token, goal);
        });

        info!("Submitted suggestion task {token} (provider: {kind:?}, tier: {tier})");
        token
    }

    pub fn poll(&self, token: &TaskToken) -> Option<TaskView> {
        let tasks = self
            .inner
            .tasks
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        tasks.get(token).map(|record| match &record.state {
            TaskState::Pending => TaskView::Pending {
                submitted_at: record.submitted_at,
            },
            TaskState::Completed(goal) => TaskView::Completed {
                submitted_at: record.submitted_at,
                completed_at: record.completed_at.unwrap_or(record.submitted_at),
                result: goal.clone(),
            },
        })
    }

    /// Total number of tasks ever submitted in this process.
    pub fn task_count(&self) -> usize {
        self.read_tasks().len()
    }

    pub fn pending_count(&self) -> usize {
        self.read_tasks()
            .values()
            .filter(|r| matches!(r.state, TaskState::Pending))
            .count()
    }

    /// Waits for every in-flight generation to finish. Called once after the
    /// HTTP server has stopped accepting requests.
    pub async fn shutdown(&self) {
        let mut running = {
            let mut guard = self
                .inner
                .running
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *guard)
        };

        let in_flight = running.len();
        if in_flight > 0 {
            info!("Waiting for {in_flight} suggestion task(s) to finish");
        }
        while let Some(finished) = running.join_next().await {
            log_join_result(finished);
        }
    }

    fn insert_pending(&self) -> TaskToken {
        let mut tasks = self
            .inner
            .tasks
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let mut token = TaskToken::generate();
        while tasks.contains_key(&token) {
            token = TaskToken::generate();
        }
        tasks.insert(
            token,
            TaskRecord {
                state: TaskState::Pending,
                submitted_at: Utc::now(),
                completed_at: None,
            },
        );
        token
    }

    /// Records the terminal state. Only a pending task can transition.
    fn complete(&self, token: TaskToken, goal: GeneratedGoal) -> bool {
        let mut tasks = self
            .inner
            .tasks
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(record) = tasks.get_mut(&token) else {
            warn!("Completion for unknown suggestion task {token}");
            return false;
        };
        if let TaskState::Completed(_) = record.state {
            warn!("Suggestion task {token} already completed; ignoring second result");
            return false;
        }

        if goal.is_error() {
            warn!("Suggestion task {token} completed with a generation error");
        } else {
            info!("Suggestion task {token} completed");
        }
        record.state = TaskState::Completed(goal);
        record.completed_at = Some(Utc::now());
        true
    }

    fn read_tasks(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<TaskToken, TaskRecord>> {
        self.inner
            .tasks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn ctx_tier(ctx: &SuggestionContext) -> String {
    ctx.potential
        .map(|p| p.to_string())
        .unwrap_or_else(|| "unset".to_string())
}

fn log_join_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        error!("Suggestion task terminated abnormally: {e}");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::suggestions::models::Potential;
    use crate::suggestions::provider::{MockProvider, MOCK_LATENCY};

    fn ctx(potential: Option<Potential>, name: &str) -> SuggestionContext {
        SuggestionContext {
            employee_context: format!("Name: {name}, Role: Engineer"),
            project_context: "General Improvement".to_string(),
            potential,
            additional_criteria: None,
        }
    }

    /// Provider that blocks until released, to observe the pending state.
    struct GatedProvider {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl SuggestionProvider for GatedProvider {
        async fn generate_goal(&self, ctx: &SuggestionContext) -> GeneratedGoal {
            self.gate.notified().await;
            GeneratedGoal::error(format!("released: {}", ctx.employee_context))
        }

        async fn analyze_skill_gap(&self, _team_skills: &[String], _requirements: &str) -> String {
            String::new()
        }

        fn kind(&self) -> ProviderKind {
            ProviderKind::Mock
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_then_completed_with_mock_latency() {
        let registry = TaskRegistry::new(Arc::new(MockProvider::default()));
        let token = registry.submit(ctx(Some(Potential::P3), "Ana"));

        assert!(registry.poll(&token).unwrap().is_pending());

        tokio::time::sleep(MOCK_LATENCY / 2).await;
        assert!(registry.poll(&token).unwrap().is_pending());

        tokio::time::sleep(MOCK_LATENCY).await;
        let view = registry.poll(&token).unwrap();
        let goal = view.result().expect("task should be completed");
        assert!(goal.suggestion().unwrap().title.contains("Maintenance"));
    }

    #[tokio::test]
    async fn test_unknown_token_is_not_found() {
        let registry = TaskRegistry::new(Arc::new(MockProvider::new(Duration::ZERO)));
        let never_issued: TaskToken = "6f1c1c1e-5b1a-4c1e-9d6e-2f0a6b0f9a11".parse().unwrap();
        assert!(registry.poll(&never_issued).is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_submissions_resolve_independently() {
        let registry = TaskRegistry::new(Arc::new(MockProvider::default()));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let registry = registry.clone();
                tokio::spawn(async move {
                    let potential = if i % 2 == 0 { Some(Potential::P1) } else { Some(Potential::P4) };
                    (i, registry.submit(ctx(potential, &format!("Employee {i}"))))
                })
            })
            .collect();

        let mut tokens = Vec::new();
        for handle in handles {
            tokens.push(handle.await.unwrap());
        }

        let unique: HashSet<_> = tokens.iter().map(|(_, t)| *t).collect();
        assert_eq!(unique.len(), tokens.len());

        tokio::time::sleep(MOCK_LATENCY * 2).await;
        for (i, token) in tokens {
            let view = registry.poll(&token).unwrap();
            let goal = view.result().unwrap().suggestion().unwrap().clone();
            if i % 2 == 0 {
                assert!(goal.objective.contains(&format!("Employee {i},")));
            } else {
                assert!(goal.title.contains("Performance Improvement"));
            }
        }
        assert_eq!(registry.pending_count(), 0);
        assert_eq!(registry.task_count(), 16);
    }

    #[tokio::test]
    async fn test_pending_until_provider_finishes() {
        let gate = Arc::new(Notify::new());
        let registry = TaskRegistry::new(Arc::new(GatedProvider {
            gate: Arc::clone(&gate),
        }));

        let token = registry.submit(ctx(None, "Gated"));
        tokio::task::yield_now().await;
        assert!(registry.poll(&token).unwrap().is_pending());
        assert_eq!(registry.pending_count(), 1);

        gate.notify_one();
        registry.shutdown().await;

        let view = registry.poll(&token).unwrap();
        assert_eq!(
            view.result(),
            Some(&GeneratedGoal::error("released: Name: Gated, Role: Engineer"))
        );
    }

    #[tokio::test]
    async fn test_submit_with_overrides_provider() {
        let gate = Arc::new(Notify::new());
        let registry = TaskRegistry::new(Arc::new(GatedProvider { gate }));

        let token = registry.submit_with(
            Arc::new(MockProvider::new(Duration::ZERO)),
            ctx(Some(Potential::P3), "Override"),
        );
        registry.shutdown().await;

        assert!(!registry.poll(&token).unwrap().is_pending());
    }

    #[tokio::test]
    async fn test_completion_is_monotonic() {
        let registry = TaskRegistry::new(Arc::new(MockProvider::new(Duration::ZERO)));
        let token = registry.submit(ctx(Some(Potential::P4), "Once"));
        registry.shutdown().await;

        let first = registry.poll(&token).unwrap();
        assert!(!registry.complete(token, GeneratedGoal::error("late writer")));
        assert_eq!(registry.poll(&token).unwrap(), first);
    }

    #[tokio::test]
    async fn test_shutdown_drains_in_flight_work() {
        let registry = TaskRegistry::new(Arc::new(MockProvider::new(Duration::from_millis(10))));
        let tokens: Vec<_> = (0..4)
            .map(|i| registry.submit(ctx(None, &format!("Drain {i}"))))
            .collect();

        registry.shutdown().await;
        for token in &tokens {
            assert!(!registry.poll(token).unwrap().is_pending());
        }
    }

    #[test]
    fn test_task_view_serialization() {
        let now = Utc::now();
        let pending = serde_json::to_value(TaskView::Pending { submitted_at: now }).unwrap();
        assert_eq!(pending["status"], "pending");
        assert!(pending.get("result").is_none());

        let done = serde_json::to_value(TaskView::Completed {
            submitted_at: now,
            completed_at: now,
            result: GeneratedGoal::error("boom"),
        })
        .unwrap();
        assert_eq!(done["status"], "completed");
        assert_eq!(done["result"]["kind"], "error");
    }

    #[test]
    fn test_token_parse_rejects_garbage() {
        assert!("not-a-token".parse::<TaskToken>().is_err());
    }
}
