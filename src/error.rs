/// Crate-level error types for doccheck.
///
/// Only structural failures surface here: wrong working directory and
/// unreadable configuration. Broken references are diagnostics, not errors,
/// and per-file read failures are non-fatal skips.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// Expected top-level marker paths are missing from the working
    /// directory, so the tool was not run from the repository root.
    #[error(
        "not at the repository root: missing {}; run from the repository root directory",
        missing.join(", ")
    )]
    NotRepoRoot {
        /// The marker paths that were not found.
        missing: Vec<String>,
    },

    /// Config file exists but is not valid TOML.
    #[error("config invalid: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}
