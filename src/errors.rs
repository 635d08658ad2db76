use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("task format is not recognized: {0:?}")]
    TaskFormat(String),
    #[error("task index {index} is out of range, the contest has {count} tasks")]
    TaskIndexOutOfRange { index: usize, count: usize },

    #[error("language {0:?} is not supported by this contest")]
    UnsupportedLanguage(String),
    #[error("extension {0:?} is not supported by this contest")]
    UnsupportedExtension(String),
    #[error("cannot guess the language of {0:?}: the file has no extension")]
    NoExtension(String),
    #[error("a language must be passed explicitly when reading code from standard input")]
    LanguageRequired,
    #[error("{0}")]
    Aborted(String),

    #[error("failed to read source code from {path:?}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("contest not chosen! Use \"contest\" command")]
    ContestNotChosen,
    #[error("{0}")]
    CacheFailure(String),
    #[error("{0}")]
    ConfigurationFailure(String),

    #[error("api error: {status}, message: {body}")]
    Api { status: u16, body: String },
    #[error("{0}")]
    Transport(String),

    #[error("connection with the server was lost: {0}")]
    StreamDisconnected(String),
    #[error("judge sent a malformed verdict: {0}")]
    MalformedVerdict(String),
    #[error("no news from the judge in {0:?}, giving up")]
    StreamTimeout(Duration),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

pub use Error::*;

pub trait ToResult<T> {
    fn context_transport<C: AsRef<str>>(self, context: C) -> Result<T, Error>;
    fn with_context_transport<C: AsRef<str>, F: FnOnce() -> C>(self, f: F) -> Result<T, Error>;
    fn context_cache<C: AsRef<str>>(self, context: C) -> Result<T, Error>;
    fn with_context_cache<C: AsRef<str>, F: FnOnce() -> C>(self, f: F) -> Result<T, Error>;
    fn with_context_config<C: AsRef<str>, F: FnOnce() -> C>(self, f: F) -> Result<T, Error>;
}

impl<T, E: std::fmt::Display> ToResult<T> for Result<T, E> {
    fn context_transport<C: AsRef<str>>(self, context: C) -> Result<T, Error> {
        self.map_err(|e| Transport(format!("{}: {e}", context.as_ref())))
    }
    fn with_context_transport<C: AsRef<str>, F: FnOnce() -> C>(self, f: F) -> Result<T, Error> {
        self.map_err(|e| Transport(format!("{}: {e}", f().as_ref())))
    }
    fn context_cache<C: AsRef<str>>(self, context: C) -> Result<T, Error> {
        self.map_err(|e| CacheFailure(format!("{}: {e}", context.as_ref())))
    }
    fn with_context_cache<C: AsRef<str>, F: FnOnce() -> C>(self, f: F) -> Result<T, Error> {
        self.map_err(|e| CacheFailure(format!("{}: {e}", f().as_ref())))
    }
    fn with_context_config<C: AsRef<str>, F: FnOnce() -> C>(self, f: F) -> Result<T, Error> {
        self.map_err(|e| ConfigurationFailure(format!("{}: {e}", f().as_ref())))
    }
}
