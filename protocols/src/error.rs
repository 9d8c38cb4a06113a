use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("'{value}' is not an allowed {kind}")]
    NotAllowed { kind: &'static str, value: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unexpected response to '{command}': {response:?}")]
    UnexpectedResponse { command: String, response: String },

    #[error("rig rejected '{command}' with code {code}")]
    Rejected { command: String, code: i32 },
}
