//! Error types for loading and configuration.
//!
//! Aggregation and statistics never fail; only the edges do.

use serde::Serialize;
use std::fmt;

/// The two independently loaded input streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stream {
    Performance,
    Tests,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Performance => "performance",
            Self::Tests => "tests",
        })
    }
}

/// One summarized failure per stream. Individual malformed lines are never
/// reported here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The source could not be fetched.
    #[error("{stream} data unavailable from {source_name}: {message}")]
    SourceUnavailable {
        stream: Stream,
        source_name: String,
        message: String,
    },

    /// The fetch succeeded but yielded no usable records.
    #[error("no {stream} data yet in {source_name}")]
    SourceEmpty { stream: Stream, source_name: String },
}

impl LoadError {
    pub fn stream(&self) -> Stream {
        match self {
            Self::SourceUnavailable { stream, .. } | Self::SourceEmpty { stream, .. } => *stream,
        }
    }

    pub fn is_empty_source(&self) -> bool {
        matches!(self, Self::SourceEmpty { .. })
    }
}

/// Source fetch failure, before it is attributed to a stream.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("source is not valid UTF-8")]
    Encoding,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config{}: {message}", quoted_path(.path))]
    Parse {
        path: Option<String>,
        message: String,
    },
}

fn quoted_path(path: &Option<String>) -> String {
    path.as_deref().map(|p| format!(" '{p}'")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_stream() {
        let e = LoadError::SourceEmpty {
            stream: Stream::Tests,
            source_name: "data/tests.ndjson".into(),
        };
        assert_eq!(e.to_string(), "no tests data yet in data/tests.ndjson");
        assert_eq!(e.stream(), Stream::Tests);
        assert!(e.is_empty_source());

        let e = LoadError::SourceUnavailable {
            stream: Stream::Performance,
            source_name: "perf.ndjson".into(),
            message: "not found".into(),
        };
        assert!(e.to_string().starts_with("performance data unavailable"));
    }

    #[test]
    fn parse_error_message_with_and_without_path() {
        let e = ConfigError::Parse {
            path: Some("a.yaml".into()),
            message: "bad".into(),
        };
        assert_eq!(e.to_string(), "invalid config 'a.yaml': bad");
        let e = ConfigError::Parse {
            path: None,
            message: "bad".into(),
        };
        assert_eq!(e.to_string(), "invalid config: bad");
    }
}
