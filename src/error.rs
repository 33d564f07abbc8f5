//! A dedicated error for all possible errors in pfdd: I/O, argument parsing, config.
use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;

/// A specific custom `Result` for all functions
pub type Result<T> = std::result::Result<T, self::Error>;

#[derive(Debug)]
pub enum Error {
    // an I/O error, tagged with the path it was operating on
    Io(std::io::Error, PathBuf),

    // a CLI argument error
    Args(clap::Error),

    // a YAML config parsing error
    Yaml(serde_yaml::Error),

    // a dedup/diff input set with no files at all
    NoInputPaths,

    // an input path that is neither a file nor a directory
    NotAFileOrDirectory(PathBuf),

    // error when creating the terminal or file logger
    Logger(log::SetLoggerError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e, path) => write!(f, "I/O error on '{}': {}", path.display(), e),
            Error::Args(e) => write!(f, "argument error: {}", e),
            Error::Yaml(e) => write!(f, "YAML config error: {}", e),
            Error::NoInputPaths => f.write_str("no input paths were given for this set"),
            Error::NotAFileOrDirectory(p) => {
                write!(f, "'{}' is neither a file nor a directory", p.display())
            }
            Error::Logger(e) => write!(f, "error {:?} setting logger", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<Error> for ExitCode {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(..) => ExitCode::from(1),
            Error::Args(_) => ExitCode::from(2),
            Error::Yaml(_) => ExitCode::from(3),
            Error::NoInputPaths => ExitCode::from(4),
            Error::NotAFileOrDirectory(_) => ExitCode::from(5),
            Error::Logger(_) => ExitCode::from(6),
        }
    }
}

impl Error {
    pub fn io(e: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Error::Io(e, path.into())
    }
}

// All conversions for internal errors into Error
macro_rules! ErrFrom {
    ($err:path, $arm:path) => {
        impl From<$err> for Error {
            fn from(err: $err) -> Self {
                $arm(err)
            }
        }
    };
}

ErrFrom!(clap::Error, Error::Args);
ErrFrom!(serde_yaml::Error, Error::Yaml);
ErrFrom!(log::SetLoggerError, Error::Logger);
