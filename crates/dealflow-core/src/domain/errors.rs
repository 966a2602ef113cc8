//! Errors and their operational classification.
//!
//! Every layer has its own `thiserror` enum. `ErrorKind` says what the caller
//! can do about a failure: only persistence faults abort a user-visible
//! operation outright.

use thiserror::Error;

use super::ids::{CompanyId, DealId, MessageId, TaskId};

/// ErrorKind classifies errors for callers.
///
/// - Recoverable: a defined degrade-and-continue path exists (manual fallback, re-prompt)
/// - Conflict: lost a uniqueness race; re-resolving fixes it
/// - Fatal: the store failed; surface to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Recoverable,
    Conflict,
    Fatal,
}

/// Store-level failure reported by every store port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("a company with tax id {0} already exists")]
    DuplicateTaxId(String),

    #[error("a company named {0:?} without a tax id already exists")]
    DuplicateName(String),

    #[error("record not found: {0}")]
    NotFound(String),

    #[error("rejected by store: {0}")]
    Rejected(String),

    #[error("store backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::DuplicateTaxId(_) | StoreError::DuplicateName(_) => ErrorKind::Conflict,
            StoreError::NotFound(_) | StoreError::Rejected(_) | StoreError::Backend(_) => {
                ErrorKind::Fatal
            }
        }
    }

    pub fn is_identity_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}

/// Failure of the registry lookup service itself (not a miss).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("registry lookup unavailable: {0}")]
    Unavailable(String),
}

/// Failure of company identity resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("company name is empty and no usable tax id was given")]
    EmptyName,

    #[error("registry lookup unavailable: {0}")]
    LookupUnavailable(String),

    #[error("tax id {tax_id} not found in registry")]
    NotFoundInRegistry { tax_id: String },

    #[error("company {0} has no usable tax id to enrich from")]
    NotEnrichable(CompanyId),

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl ResolveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::EmptyName
            | ResolveError::LookupUnavailable(_)
            | ResolveError::NotFoundInRegistry { .. }
            | ResolveError::NotEnrichable(_) => ErrorKind::Recoverable,
            ResolveError::Persistence(e) => e.kind(),
        }
    }

    /// Whether re-submitting with manual fallback will get past this error.
    pub fn allows_manual_fallback(&self) -> bool {
        matches!(
            self,
            ResolveError::LookupUnavailable(_) | ResolveError::NotFoundInRegistry { .. }
        )
    }
}

impl From<LookupError> for ResolveError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Unavailable(reason) => ResolveError::LookupUnavailable(reason),
        }
    }
}

/// Rejected task state-machine transition. The task is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskTransitionError {
    #[error("task is already done")]
    AlreadyDone,

    #[error("task is not done")]
    NotDone,

    #[error("task is not in progress")]
    NotInProgress,

    #[error("subtasks cannot be toggled while the task is done")]
    SubtasksLocked,

    #[error("subtask index {index} out of range (len={len})")]
    SubtaskOutOfRange { index: usize, len: usize },

    #[error("text must not be empty")]
    EmptyText,

    #[error("pending completion belongs to another task")]
    TaskMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("timeline entry does not belong to {0}")]
    EntryMismatch(TaskId),
}

/// Failure of a deal save attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("company resolution failed: {0}")]
    Resolve(#[from] ResolveError),

    #[error("deal {0} not found")]
    DealNotFound(DealId),

    #[error("deal title must not be empty")]
    EmptyTitle,

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl SaveError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SaveError::Resolve(e) => e.kind(),
            SaveError::DealNotFound(_) | SaveError::EmptyTitle => ErrorKind::Recoverable,
            SaveError::Persistence(e) => e.kind(),
        }
    }
}

/// Failure of a message/task mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivityError {
    #[error(transparent)]
    Transition(#[from] TaskTransitionError),

    #[error("message {0} is deleted")]
    MessageDeleted(MessageId),

    #[error("reply target {0} not found")]
    ReplyTargetNotFound(MessageId),

    #[error("reply target {0} belongs to another deal")]
    CrossDealReply(MessageId),

    #[error("text must not be empty")]
    EmptyText,

    #[error("persistence failure: {0}")]
    Persistence(#[from] StoreError),
}

impl ActivityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ActivityError::Persistence(e) => e.kind(),
            _ => ErrorKind::Recoverable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty_name(ResolveError::EmptyName, ErrorKind::Recoverable)]
    #[case::lookup(ResolveError::LookupUnavailable("timeout".into()), ErrorKind::Recoverable)]
    #[case::miss(ResolveError::NotFoundInRegistry { tax_id: "7707083893".into() }, ErrorKind::Recoverable)]
    #[case::race(ResolveError::Persistence(StoreError::DuplicateTaxId("7707083893".into())), ErrorKind::Conflict)]
    #[case::backend(ResolveError::Persistence(StoreError::Backend("down".into())), ErrorKind::Fatal)]
    fn resolve_error_kinds(#[case] err: ResolveError, #[case] expected: ErrorKind) {
        assert_eq!(err.kind(), expected);
    }

    #[test]
    fn only_registry_failures_allow_manual_fallback() {
        assert!(ResolveError::LookupUnavailable("x".into()).allows_manual_fallback());
        assert!(
            ResolveError::NotFoundInRegistry { tax_id: "1".into() }.allows_manual_fallback()
        );
        assert!(!ResolveError::EmptyName.allows_manual_fallback());
        assert!(!ResolveError::Persistence(StoreError::Backend("x".into())).allows_manual_fallback());
    }

    #[test]
    fn save_error_inherits_kind() {
        let err: SaveError = ResolveError::LookupUnavailable("x".into()).into();
        assert_eq!(err.kind(), ErrorKind::Recoverable);
        let err: SaveError = StoreError::Backend("x".into()).into();
        assert_eq!(err.kind(), ErrorKind::Fatal);
    }
}
