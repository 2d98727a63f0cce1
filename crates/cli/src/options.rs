//! Command-line options that sit on top of [`ClientConfig`](notekeeper_client::config::ClientConfig).

/// Env var selecting the archived listing instead of the active one.
pub const SHOW_ARCHIVED_VAR: &str = "NOTES_SHOW_ARCHIVED";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("{SHOW_ARCHIVED_VAR} must be a boolean, got {0:?}")]
    InvalidFlag(String),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub show_archived: bool,
    /// Local search applied to the loaded notes; empty shows everything.
    pub search: String,
}

impl Options {
    pub fn from_env() -> Result<Self, OptionsError> {
        Self::parse(
            std::env::var(SHOW_ARCHIVED_VAR).ok().as_deref(),
            std::env::args().skip(1),
        )
    }

    /// Build options from the archived flag value and the positional
    /// arguments (program name excluded). At most one search term.
    pub fn parse<I>(show_archived: Option<&str>, args: I) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = String>,
    {
        let show_archived = match show_archived.map(str::trim) {
            None | Some("") => false,
            Some(v) => parse_flag(v).ok_or_else(|| OptionsError::InvalidFlag(v.to_string()))?,
        };

        let mut args = args.into_iter();
        let search = args.next().unwrap_or_default();
        if let Some(extra) = args.next() {
            return Err(OptionsError::UnexpectedArgument(extra));
        }

        Ok(Self {
            show_archived,
            search,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
