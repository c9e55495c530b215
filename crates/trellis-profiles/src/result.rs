//! Caller-facing status of a registry operation.

/// Classification of an operation's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResultStatus {
    /// The operation succeeded.
    #[default]
    Ok,
    /// The addressed profile does not exist.
    NotFound,
    /// The profile failed validation.
    UnprocessableEntity,
    /// The caller's copy of the profile is stale.
    PreconditionFailed,
    /// An unexpected failure occurred.
    InternalError,
}

/// Status plus the message shown to the caller.
///
/// Once an internal error has been recorded, or any message is present when
/// one is reported, later internal errors leave the result untouched.
///
/// # Example
///
/// ```
/// use trellis_profiles::{OperationResult, ResultStatus};
///
/// let mut result = OperationResult::new();
/// result.internal_error("first");
/// result.internal_error("second");
/// assert_eq!(result.status(), ResultStatus::InternalError);
/// assert_eq!(result.message(), Some("first"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationResult {
    status: ResultStatus,
    message: Option<String>,
}

impl OperationResult {
    /// A successful result with no message.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: ResultStatus::Ok,
            message: None,
        }
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> ResultStatus {
        self.status
    }

    /// Message, if one has been set.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns `true` while the status is [`ResultStatus::Ok`].
    #[must_use]
    pub const fn is_successful(&self) -> bool {
        matches!(self.status, ResultStatus::Ok)
    }

    /// Returns `true` when a message has been attached.
    #[must_use]
    pub const fn has_message(&self) -> bool {
        self.message.is_some()
    }

    /// Sets an informational message without changing the status.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Marks the addressed profile as missing.
    pub fn not_found(&mut self, message: impl Into<String>) {
        self.fail(ResultStatus::NotFound, message);
    }

    /// Marks the profile as invalid.
    pub fn unprocessable_entity(&mut self, message: impl Into<String>) {
        self.fail(ResultStatus::UnprocessableEntity, message);
    }

    /// Marks the caller's copy as stale.
    pub fn precondition_failed(&mut self, message: impl Into<String>) {
        self.fail(ResultStatus::PreconditionFailed, message);
    }

    /// Records an internal error unless a message is already present.
    pub fn internal_error(&mut self, message: impl Into<String>) {
        if self.has_message() {
            return;
        }
        self.fail(ResultStatus::InternalError, message);
    }

    fn fail(&mut self, status: ResultStatus, message: impl Into<String>) {
        self.status = status;
        self.message = Some(message.into());
    }
}
