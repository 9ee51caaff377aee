//! Run options.
//!
//! These mirror the command-line switches of the bulk uploader: target
//! graph, language, warning policy and append mode.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How warnings are treated when a run finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarnMode {
    /// Report warnings alongside errors; warnings never block output.
    #[default]
    Warn,
    /// Drop warnings.
    Ignore,
    /// Treat every warning as an error.
    Strict,
}

impl WarnMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Ignore => "ignore",
            Self::Strict => "strict",
        }
    }
}

/// Whether rows create new resources or extend existing ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppendMode {
    #[default]
    New,
    /// The identifier column names an existing resource to extend.
    Append,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ltr => "ltr",
            Self::Rtl => "rtl",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A language known to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    #[serde(default)]
    pub default_direction: Direction,
}

impl Language {
    pub fn new(code: impl Into<String>, default_direction: Direction) -> Self {
        Self {
            code: code.into(),
            default_direction,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::new("en", Direction::Ltr)
    }
}

/// Options for a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    /// Target graph (schema) identifier.
    pub graph_id: Option<String>,
    /// Language code used for text values and vocabulary labels.
    pub language: String,
    pub warn_mode: WarnMode,
    pub append_mode: AppendMode,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            graph_id: None,
            language: "en".to_string(),
            warn_mode: WarnMode::default(),
            append_mode: AppendMode::default(),
        }
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options where every warning blocks output.
    pub fn strict() -> Self {
        Self {
            warn_mode: WarnMode::Strict,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_graph(mut self, graph_id: impl Into<String>) -> Self {
        self.graph_id = Some(graph_id.into());
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub fn with_warn_mode(mut self, warn_mode: WarnMode) -> Self {
        self.warn_mode = warn_mode;
        self
    }

    #[must_use]
    pub fn with_append_mode(mut self, append_mode: AppendMode) -> Self {
        self.append_mode = append_mode;
        self
    }
}
