use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollErrorKind {
    InvalidOption,
    Validation,
    MarkerRegistration,
    SinkUnavailable,
    PollClosed,
    UnknownPoll,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollError {
    pub kind: PollErrorKind,
    pub message: String,
}

impl PollError {
    pub fn new(kind: PollErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for PollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PollError {}

pub fn invalid_option(message: impl Into<String>) -> PollError {
    PollError::new(PollErrorKind::InvalidOption, message)
}

pub fn validation_error(message: impl Into<String>) -> PollError {
    PollError::new(PollErrorKind::Validation, message)
}

pub fn marker_registration_error(message: impl Into<String>) -> PollError {
    PollError::new(PollErrorKind::MarkerRegistration, message)
}

pub fn sink_unavailable(message: impl Into<String>) -> PollError {
    PollError::new(PollErrorKind::SinkUnavailable, message)
}

pub fn poll_closed(message: impl Into<String>) -> PollError {
    PollError::new(PollErrorKind::PollClosed, message)
}

pub fn unknown_poll(message: impl Into<String>) -> PollError {
    PollError::new(PollErrorKind::UnknownPoll, message)
}

pub fn internal_error(message: impl Into<String>) -> PollError {
    PollError::new(PollErrorKind::Internal, message)
}
