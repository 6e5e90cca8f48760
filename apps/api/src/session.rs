//! In-memory wizard sessions.
//!
//! A session is the per-manager context object: the answers collected so
//! far, the current guide, and whether a generation is outstanding. Nothing
//! is persisted; dropping the process drops every session.
//!
//! At most one generation may be in flight per session. `begin_generation`
//! hands out an [`InFlightGuard`] that releases the slot when it is finished
//! or dropped.
//!
//! Sessions untouched for longer than the TTL are evicted, and the store never
//! holds more than `max_sessions` idle sessions. In-flight sessions are never
//! evicted.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::guide::models::{AnswersPatch, GenerationConfig, StayGuide};

/// Where the wizard currently is, derived from the answers and the guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStage {
    Context = 1,
    Persona = 2,
    Sentiment = 3,
    Result = 4,
}

impl WizardStage {
    /// Wizard step number, 1 through 4.
    pub fn step(self) -> u8 {
        self as u8
    }
}

/// Lifecycle of the session's most recent generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    #[default]
    Idle,
    InFlight,
    Done,
    Failed,
}

#[derive(Debug, Clone)]
pub struct WizardSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub answers: GenerationConfig,
    pub guide: Option<StayGuide>,
    pub status: FetchStatus,
}

impl WizardSession {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            answers: GenerationConfig::default(),
            guide: None,
            status: FetchStatus::Idle,
        }
    }

    pub fn stage(&self) -> WizardStage {
        if self.guide.is_some() {
            WizardStage::Result
        } else if !self.answers.context_complete() {
            WizardStage::Context
        } else if !self.answers.persona_complete() {
            WizardStage::Persona
        } else {
            WizardStage::Sentiment
        }
    }

    pub fn ready_to_generate(&self) -> bool {
        self.answers.is_complete() && self.status != FetchStatus::InFlight
    }

    fn ensure_idle(&self) -> Result<(), AppError> {
        if self.status == FetchStatus::InFlight {
            return Err(AppError::Conflict(format!(
                "Session {} has a generation in flight",
                self.id
            )));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    fn evictable(&self) -> bool {
        self.status != FetchStatus::InFlight
    }
}

/// Bounds on how long and how many sessions are kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionLimits {
    pub ttl: Duration,
    pub max_sessions: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(60),
            max_sessions: 10_000,
        }
    }
}

#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, WizardSession>>>,
    limits: SessionLimits,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: SessionLimits) -> Self {
        Self {
            inner: Arc::default(),
            limits,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, WizardSession>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_session<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut WizardSession) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut sessions = self.lock();
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        f(session)
    }

    pub fn create(&self) -> WizardSession {
        let session = WizardSession::new();
        let mut sessions = self.lock();

        let expired = Self::sweep(&mut sessions, session.created_at - self.limits.ttl);
        if expired > 0 {
            info!("Evicted {expired} expired wizard sessions");
        }

        while sessions.len() >= self.limits.max_sessions {
            let oldest = sessions
                .values()
                .filter(|s| s.evictable())
                .min_by_key(|s| s.updated_at)
                .map(|s| s.id);
            match oldest {
                Some(id) => {
                    sessions.remove(&id);
                    warn!("Session limit reached; evicted least recently used session {id}");
                }
                None => {
                    warn!("Session limit reached but every session has a generation in flight");
                    break;
                }
            }
        }

        sessions.insert(session.id, session.clone());
        info!("Created wizard session {}", session.id);
        session
    }

    /// Drops every idle session not touched within the TTL. Returns how many were dropped.
    pub fn evict_expired(&self) -> usize {
        let cutoff = Utc::now() - self.limits.ttl;
        Self::sweep(&mut self.lock(), cutoff)
    }

    fn sweep(sessions: &mut HashMap<Uuid, WizardSession>, cutoff: DateTime<Utc>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, s| !s.evictable() || s.updated_at >= cutoff);
        before - sessions.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn get(&self, id: Uuid) -> Result<WizardSession, AppError> {
        self.with_session(id, |session| Ok(session.clone()))
    }

    /// Merges one step's answers. A guide generated from the previous answers is discarded.
    pub fn update_answers(&self, id: Uuid, patch: AnswersPatch) -> Result<WizardSession, AppError> {
        self.with_session(id, |session| {
            session.ensure_idle()?;
            session.answers.apply(patch);
            if session.guide.take().is_some() {
                info!("Discarded stale guide for session {id} after answers changed");
            }
            session.status = FetchStatus::Idle;
            session.touch();
            Ok(session.clone())
        })
    }

    /// Back to step 1 with nothing kept.
    pub fn reset(&self, id: Uuid) -> Result<WizardSession, AppError> {
        self.with_session(id, |session| {
            session.ensure_idle()?;
            session.answers = GenerationConfig::default();
            session.guide = None;
            session.status = FetchStatus::Idle;
            session.touch();
            info!("Reset wizard session {id}");
            Ok(session.clone())
        })
    }

    pub fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.lock()
            .remove(&id)
            .map(|_| info!("Removed wizard session {id}"))
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    /// The session's guide, or 404 if it has not produced one yet.
    pub fn guide(&self, id: Uuid) -> Result<(StayGuide, GenerationConfig), AppError> {
        self.with_session(id, |session| {
            let guide = session.guide.clone().ok_or_else(|| {
                AppError::NotFound(format!("Session {id} has no generated guide"))
            })?;
            Ok((guide, session.answers.clone()))
        })
    }

    /// Validates the answers and claims the session's single in-flight slot.
    pub fn begin_generation(&self, id: Uuid) -> Result<InFlightGuard, AppError> {
        let config = self.with_session(id, |session| {
            session.ensure_idle()?;
            session.answers.validate()?;
            session.status = FetchStatus::InFlight;
            session.touch();
            Ok(session.answers.clone())
        })?;

        Ok(InFlightGuard {
            store: self.clone(),
            id,
            config,
            finished: false,
        })
    }

    fn finish(&self, id: Uuid, status: FetchStatus, guide: Option<StayGuide>) {
        let mut sessions = self.lock();
        match sessions.get_mut(&id) {
            Some(session) => {
                session.status = status;
                if guide.is_some() {
                    session.guide = guide;
                }
                session.touch();
            }
            None => warn!("Session {id} was removed while its generation was in flight"),
        }
    }
}

/// Holds a session's in-flight slot. Dropping it unfinished returns the session to idle.
pub struct InFlightGuard {
    store: SessionStore,
    id: Uuid,
    config: GenerationConfig,
    finished: bool,
}

impl InFlightGuard {
    /// Snapshot of the answers taken when the slot was claimed.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn succeed(mut self, guide: StayGuide) {
        self.finished = true;
        self.store.finish(self.id, FetchStatus::Done, Some(guide));
    }

    pub fn fail(mut self) {
        self.finished = true;
        self.store.finish(self.id, FetchStatus::Failed, None);
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.finished {
            warn!("Generation for session {} abandoned before completion", self.id);
            self.store.finish(self.id, FetchStatus::Idle, None);
        }
    }
}
