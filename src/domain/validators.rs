use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

/// A value rejected by a validation rule, with the message shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationFailure {
    pub message: String,
}

impl ValidationFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

macro_rules! cached_re {
    ($pattern:expr) => {{
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new($pattern).unwrap())
    }};
}

/// The closed set of typed checks a prompt value may be subjected to.
/// Each validator returns the normalized value or a failure carrying a
/// human-readable message.
#[derive(Debug, Clone)]
pub enum Validator {
    Any,
    Integer,
    IntegerRange { low: i64, high: i64, message: &'static str },
    Boolean,
    Identifier,
    Hostname,
    FileName,
    ScriptName,
    Uri,
    DbmsType,
    LogType,
    DbmsRole,
    PolicyMode,
    MysqlBackupMethod,
    PgBackupMethod,
    ReadableFile,
    ReadableDirectory,
    WritableDirectory,
}

impl Validator {
    /// Java heap sizes accepted by the service wrapper configurations.
    pub fn java_mem_size() -> Self {
        Validator::IntegerRange {
            low: 128,
            high: 2048,
            message: "Java heap size must be between 128 and 2048",
        }
    }

    /// Replication block commit buffer sizes.
    pub fn buffer_size() -> Self {
        Validator::IntegerRange {
            low: 1,
            high: 100,
            message: "Replication transaction buffer size must be between 1 and 100",
        }
    }

    pub fn validate(&self, raw: &str) -> Result<String, ValidationFailure> {
        let value = raw.trim();
        match self {
            Validator::Any => Ok(value.to_string()),
            Validator::Integer => {
                accept(cached_re!(r"^[0-9]+$"), value, "Value must be an integer")
            }
            Validator::IntegerRange { low, high, message } => {
                accept(cached_re!(r"^[0-9]+$"), value, message)?;
                let parsed: i64 = value
                    .parse()
                    .map_err(|_| ValidationFailure::new(*message))?;
                if parsed >= *low && parsed <= *high {
                    Ok(value.to_string())
                } else {
                    Err(ValidationFailure::new(*message))
                }
            }
            Validator::Boolean => {
                accept(cached_re!(r"^(true|false)$"), value, "Value must be true or false")
            }
            Validator::Identifier => accept(
                cached_re!(r"^[A-Za-z0-9_]+$"),
                value,
                "Value must consist only of letters, digits, and underscore (_)",
            ),
            Validator::Hostname => accept(
                cached_re!(r"^[A-Za-z0-9_.\-]+$"),
                value,
                "Value must consist only of letters, digits, underscore (_) and periods",
            ),
            Validator::FileName => accept(
                cached_re!(r"^/[A-Za-z0-9_./\-]+$"),
                value,
                "Value must be a valid filename",
            ),
            Validator::ScriptName => accept(
                cached_re!(r"^[A-Za-z0-9_.\-]+$"),
                value,
                "Value must be a valid script filename",
            ),
            Validator::Uri => match Url::parse(value) {
                Ok(_) => Ok(value.to_string()),
                Err(_) => Err(ValidationFailure::new("Value must be a URI")),
            },
            Validator::DbmsType => accept(
                cached_re!(r"^(mysql|postgresql|oracle)$"),
                value,
                "Value must be a database (mysql, postgresql, or oracle)",
            ),
            Validator::LogType => accept(
                cached_re!(r"^(dbms|disk)$"),
                value,
                "Value must be a supported replicator log type: dbms (store in db) or disk",
            ),
            Validator::DbmsRole => {
                accept(cached_re!(r"^(master|slave)$"), value, "Value must be master or slave")
            }
            Validator::PolicyMode => accept(
                cached_re!(r"^(manual|automatic)$"),
                value,
                "Value must be manual or automatic",
            ),
            Validator::MysqlBackupMethod => accept(
                cached_re!(r"^(none|mysqldump|lvm|xtrabackup|script)$"),
                value,
                "Value must be none, mysqldump, lvm, xtrabackup, or script",
            ),
            Validator::PgBackupMethod => accept(
                cached_re!(r"^(none|pg_dump|lvm|script)$"),
                value,
                "Value must be none, pg_dump, lvm, or script",
            ),
            Validator::ReadableFile => {
                let path = Path::new(value);
                if path.is_file() {
                    Ok(value.to_string())
                } else {
                    Err(ValidationFailure::new("Value must be a readable file"))
                }
            }
            Validator::ReadableDirectory => {
                let path = Path::new(value);
                if path.is_dir() {
                    Ok(value.to_string())
                } else {
                    Err(ValidationFailure::new("Value must be a readable directory"))
                }
            }
            Validator::WritableDirectory => {
                let path = Path::new(value);
                if path.is_dir() && !path.metadata().map(|m| m.permissions().readonly()).unwrap_or(true)
                {
                    Ok(value.to_string())
                } else {
                    Err(ValidationFailure::new("Value must be a writable directory"))
                }
            }
        }
    }
}

fn accept(re: &Regex, value: &str, message: &str) -> Result<String, ValidationFailure> {
    if re.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(ValidationFailure::new(message))
    }
}
