use micro_message::protocol::BoxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ActionError {
    #[error("action list is empty")]
    EmptyActions,

    #[error("no request bound to the action")]
    InvalidRequest,

    #[error("action failed: {source}")]
    Action {
        #[from]
        source: BoxError,
    },
}

impl ActionError {
    pub fn action<E: Into<BoxError>>(e: E) -> Self {
        Self::Action { source: e.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn action_keeps_source() {
        let error = ActionError::action(io::Error::other("disk full"));
        assert_eq!(error.to_string(), "action failed: disk full");
        assert_eq!(error.source().map(ToString::to_string).as_deref(), Some("disk full"));
    }

    #[test]
    fn messages() {
        assert_eq!(ActionError::EmptyActions.to_string(), "action list is empty");
        assert_eq!(ActionError::InvalidRequest.to_string(), "no request bound to the action");
    }
}
