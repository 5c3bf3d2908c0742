//! Writer configuration.

/// Options controlling [`to_json_with`](crate::to_json_with).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonConfig {
    /// Indented multi-line output. Not supported; the writer panics when set.
    /// Defaults to `false`.
    pub pretty: bool,
}

impl JsonConfig {
    /// Compact output: no whitespace between tokens.
    pub const fn compact() -> Self {
        Self { pretty: false }
    }
}
