use cadence_core::{ActionKey, PortKey, ReactionKey, ReactorKey};

/// Errors the runtime can report. Only configuration errors are recoverable —
/// everything else indicates a bug in the graph builder or the core itself and
/// is handled by panicking at the point of detection (see the module docs on
/// `scheduler` for why an in-flight tag never unwinds gracefully).
#[derive(thiserror::Error, Debug)]
pub enum RuntimeError {
    #[error("reactor key not found: {0:?}")]
    ReactorKeyNotFound(ReactorKey),

    #[error("port key not found: {0:?}")]
    PortKeyNotFound(PortKey),

    #[error("action key not found: {0:?}")]
    ActionKeyNotFound(ActionKey),

    #[error("reaction key not found: {0:?}")]
    ReactionKeyNotFound(ReactionKey),

    #[error("mismatched dynamic types: found {found} but wanted {wanted}")]
    TypeMismatch {
        found: &'static str,
        wanted: &'static str,
    },

    #[error("malformed reaction graph: {0}")]
    MalformedGraph(String),

    #[error("malformed quasi-static schedule: {0}")]
    MalformedSchedule(String),
}
