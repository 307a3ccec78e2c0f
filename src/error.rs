use thiserror::Error;

/// Errors detected while constructing an agent from its configuration.
///
/// All of these are fatal: a misconfigured agent is never partially built,
/// and no decay mode is re-validated once a trial loop is running.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unrecognized alpha decay mode `{0}`")]
    UnknownAlphaDecay(String),

    #[error("unrecognized epsilon decay mode `{0}`")]
    UnknownEpsilonDecay(String),

    #[error("malformed parameter in decay mode `{mode}`: {reason}")]
    MalformedDecayParameter { mode: String, reason: String },

    #[error("{name} must lie in [0, 1], got {value}")]
    ParameterOutOfRange { name: &'static str, value: f64 },

    #[error("environment supplied an empty valid-action set")]
    EmptyActionSet,
}
