// ABOUTME: Top-level error types for abort conditions (I/O, lexing, parsing)

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VeurekaError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{line}:{column}: {message}")]
    Lex { message: String, line: usize, column: usize },

    #[error("{line}:{column}: {message}")]
    Parse { message: String, line: usize, column: usize },
}
