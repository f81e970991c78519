//! Session registry - One orchestrator per conversation key.
//!
//! Embedders (webhooks, CLI loops) forward every inbound message here with
//! a key identifying the conversation, e.g. the sender's phone number.
//! Calls for the same key are serialized; different keys run in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::domain::foundation::Timestamp;
use crate::domain::workflow::WorkflowError;

use super::orchestrator::WorkflowOrchestrator;

/// Builds a ready-to-start orchestrator for a conversation key.
pub type OrchestratorFactory =
    Arc<dyn Fn(&str) -> Result<WorkflowOrchestrator, WorkflowError> + Send + Sync>;

/// What happened to an inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// No session was running and the message was not a start keyword.
    Ignored,
    /// A start keyword opened the session.
    Started,
    /// The message was fed to a running session.
    Processed,
    /// A stop keyword closed the session.
    Stopped,
    /// The session ran out of steps during this turn.
    Finished,
}

/// Errors returned by [`SessionRegistry::handle`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("Session limit of {max} reached")]
    CapacityExceeded { max: usize },
}

struct SessionEntry {
    orchestrator: WorkflowOrchestrator,
    last_activity: Timestamp,
    closed: bool,
}

/// Keyed collection of orchestrators.
///
/// The map lock is never held while waiting for a session lock.
pub struct SessionRegistry {
    factory: OrchestratorFactory,
    config: SessionConfig,
    start_keywords: Vec<String>,
    stop_keywords: Vec<String>,
    sessions: RwLock<HashMap<String, Arc<Mutex<SessionEntry>>>>,
}

impl SessionRegistry {
    pub fn new<F>(config: SessionConfig, factory: F) -> Self
    where
        F: Fn(&str) -> Result<WorkflowOrchestrator, WorkflowError> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
            start_keywords: config.start_keywords_list(),
            stop_keywords: config.stop_keywords_list(),
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Routes one inbound message.
    ///
    /// - stop keyword: drops the session
    /// - no running session: a start keyword starts one, anything else is
    ///   ignored without creating a session
    /// - running session: the message is processed
    ///
    /// A finished session is replaced by a fresh orchestrator when the next
    /// start keyword arrives.
    ///
    /// # Errors
    ///
    /// - `CapacityExceeded` when a new session would exceed `max_sessions`
    /// - `Workflow` when the factory or the orchestrator fails
    pub async fn handle(&self, key: &str, input: &str) -> Result<TurnOutcome, SessionError> {
        let text = input.trim();

        if matches_keyword(&self.stop_keywords, text) {
            return Ok(self.stop(key).await);
        }

        let is_start = matches_keyword(&self.start_keywords, text);
        let Some(entry) = self.entry(key, is_start).await? else {
            debug!(key, "Message without session ignored");
            return Ok(TurnOutcome::Ignored);
        };
        let mut session = entry.lock().await;
        if session.closed {
            debug!(key, "Session closed while waiting");
            return Ok(TurnOutcome::Ignored);
        }

        let running = session.orchestrator.is_started() && !session.orchestrator.is_finished();
        if !running && !is_start {
            return Ok(TurnOutcome::Ignored);
        }
        session.last_activity = Timestamp::now();

        if session.orchestrator.is_started() && session.orchestrator.is_finished() {
            debug!(key, "Replacing finished session");
            session.orchestrator = (self.factory)(key)?;
        }

        let orchestrator = &mut session.orchestrator;
        if !orchestrator.is_started() {
            info!(key, session_id = %orchestrator.session_id(), "Conversation opened");
            orchestrator.start().await?;
            return Ok(if orchestrator.is_finished() {
                TurnOutcome::Finished
            } else {
                TurnOutcome::Started
            });
        }

        orchestrator.process(Some(text)).await?;
        Ok(if orchestrator.is_finished() {
            TurnOutcome::Finished
        } else {
            TurnOutcome::Processed
        })
    }

    /// Removes sessions idle for longer than the configured timeout.
    ///
    /// Returns how many sessions were evicted.
    pub async fn evict_idle(&self) -> usize {
        self.evict_idle_as_of(Timestamp::now()).await
    }

    /// Same as [`SessionRegistry::evict_idle`] with an explicit clock.
    pub async fn evict_idle_as_of(&self, now: Timestamp) -> usize {
        let timeout = self.config.idle_timeout_secs;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, entry| match entry.try_lock() {
            Ok(mut session) => {
                if session.last_activity.is_older_than(timeout, &now) {
                    session.closed = true;
                    false
                } else {
                    true
                }
            }
            // Busy sessions are active by definition.
            Err(_) => true,
        });

        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    /// Runs [`SessionRegistry::evict_idle`] every idle timeout period.
    pub fn spawn_eviction(self: &Arc<Self>) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        let period = self.config.idle_timeout();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                registry.evict_idle().await;
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.sessions.read().await.contains_key(key)
    }

    async fn stop(&self, key: &str) -> TurnOutcome {
        let removed = self.sessions.write().await.remove(key);
        match removed {
            Some(entry) => {
                entry.lock().await.closed = true;
                info!(key, "Conversation closed");
                TurnOutcome::Stopped
            }
            None => TurnOutcome::Ignored,
        }
    }

    /// Looks up the session for `key`, creating it only when `create` is set.
    async fn entry(
        &self,
        key: &str,
        create: bool,
    ) -> Result<Option<Arc<Mutex<SessionEntry>>>, SessionError> {
        let existing = self.sessions.read().await.get(key).cloned();
        if existing.is_some() || !create {
            return Ok(existing);
        }

        let mut sessions = self.sessions.write().await;
        if let Some(entry) = sessions.get(key) {
            return Ok(Some(Arc::clone(entry)));
        }
        if sessions.len() >= self.config.max_sessions {
            return Err(SessionError::CapacityExceeded {
                max: self.config.max_sessions,
            });
        }

        let entry = Arc::new(Mutex::new(SessionEntry {
            orchestrator: (self.factory)(key)?,
            last_activity: Timestamp::now(),
            closed: false,
        }));
        sessions.insert(key.to_string(), Arc::clone(&entry));
        debug!(key, sessions = sessions.len(), "Session created");
        Ok(Some(entry))
    }
}

fn matches_keyword(keywords: &[String], text: &str) -> bool {
    let text = text.to_lowercase();
    keywords.iter().any(|k| *k == text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DomainError;
    use crate::domain::workflow::{OrchestratorEvent, StepFactory, WorkflowData, WorkflowStep};
    use crate::ports::{ActionHandler, WorkflowEventHandler};
    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    struct Silent;

    #[async_trait]
    impl ActionHandler for Silent {
        async fn present_message(&self, _: &WorkflowStep, _: &WorkflowData) -> Result<(), DomainError> {
            Ok(())
        }
        async fn present_question(&self, _: &WorkflowStep) -> Result<(), DomainError> {
            Ok(())
        }
        async fn present_pool(&self, _: &WorkflowStep, _: &WorkflowData) -> Result<(), DomainError> {
            Ok(())
        }
        async fn report_error(&self, _: &WorkflowStep, _: &str) {}
    }

    #[async_trait]
    impl WorkflowEventHandler for Silent {
        async fn on_event(&self, _: OrchestratorEvent, _: &WorkflowData) {}
    }

    fn registry(config: SessionConfig) -> SessionRegistry {
        SessionRegistry::new(config, |_key| {
            let mut orchestrator = WorkflowOrchestrator::new(Arc::new(Silent), Arc::new(Silent));
            orchestrator.add_step(StepFactory::message("hi", "Hi", "Olá!"));
            orchestrator.add_step(StepFactory::question("apartment", "Apartamento", "Qual?"));
            Ok(orchestrator)
        })
    }

    #[test]
    fn keywords_match_case_insensitively() {
        let keywords = vec!["#iniciar".to_string()];
        assert!(matches_keyword(&keywords, "#INICIAR"));
        assert!(!matches_keyword(&keywords, "iniciar"));
    }

    #[tokio::test]
    async fn message_without_session_is_ignored() {
        let registry = registry(SessionConfig::default());
        let outcome = registry.handle("5584", "oi").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Ignored);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn ignored_messages_do_not_use_capacity() {
        let registry = registry(SessionConfig {
            max_sessions: 1,
            ..Default::default()
        });

        assert_eq!(registry.handle("stranger", "oi").await.unwrap(), TurnOutcome::Ignored);
        assert_eq!(registry.len().await, 0);
        assert_eq!(registry.handle("resident", "#iniciar").await.unwrap(), TurnOutcome::Started);
    }

    #[tokio::test]
    async fn start_keyword_opens_and_replies_process() {
        let registry = registry(SessionConfig::default());

        assert_eq!(registry.handle("5584", " #Iniciar ").await.unwrap(), TurnOutcome::Started);
        assert_eq!(registry.handle("5584", "").await.unwrap(), TurnOutcome::Processed);
        assert_eq!(registry.handle("5584", "101").await.unwrap(), TurnOutcome::Finished);
    }

    #[tokio::test]
    async fn finished_session_is_replaced() {
        let registry = registry(SessionConfig::default());
        registry.handle("5584", "#agendar").await.unwrap();
        registry.handle("5584", "101").await.unwrap();

        assert_eq!(registry.handle("5584", "101").await.unwrap(), TurnOutcome::Ignored);
        assert_eq!(registry.handle("5584", "#agendar").await.unwrap(), TurnOutcome::Started);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn stop_keyword_removes_session() {
        let registry = registry(SessionConfig::default());
        registry.handle("5584", "#iniciar").await.unwrap();

        assert_eq!(registry.handle("5584", "#encerrar").await.unwrap(), TurnOutcome::Stopped);
        assert!(!registry.contains("5584").await);
        assert_eq!(registry.handle("5584", "#encerrar").await.unwrap(), TurnOutcome::Ignored);
    }

    #[tokio::test]
    async fn capacity_is_enforced() {
        let registry = registry(SessionConfig {
            max_sessions: 1,
            ..Default::default()
        });
        registry.handle("a", "#iniciar").await.unwrap();

        let err = registry.handle("b", "#iniciar").await.unwrap_err();
        assert!(matches!(err, SessionError::CapacityExceeded { max: 1 }));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn idle_sessions_are_evicted() {
        let registry = registry(SessionConfig {
            idle_timeout_secs: 60,
            ..Default::default()
        });
        registry.handle("a", "#iniciar").await.unwrap();

        assert_eq!(registry.evict_idle().await, 0);
        let later = Timestamp::from_datetime(Utc::now() + Duration::seconds(120));
        assert_eq!(registry.evict_idle_as_of(later).await, 1);
        assert!(registry.is_empty().await);
    }
}
