/// Severity of a collected finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

/// One finding from a check, a batch prompt pass, or a deployment step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub severity: Severity,
    pub source: String,
    pub host: Option<String>,
    pub key: Option<String>,
    pub current_value: Option<String>,
    pub message: String,
}

/// Accumulates findings across a whole phase so the user sees every problem
/// in one pass instead of one at a time.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    entries: Vec<ReportEntry>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    pub fn info(&mut self, source: &str, message: impl Into<String>) {
        self.push(ReportEntry {
            severity: Severity::Info,
            source: source.to_string(),
            host: None,
            key: None,
            current_value: None,
            message: message.into(),
        });
    }

    pub fn warn(&mut self, source: &str, message: impl Into<String>) {
        self.push(ReportEntry {
            severity: Severity::Warn,
            source: source.to_string(),
            host: None,
            key: None,
            current_value: None,
            message: message.into(),
        });
    }

    pub fn error(&mut self, source: &str, message: impl Into<String>) {
        self.push(ReportEntry {
            severity: Severity::Error,
            source: source.to_string(),
            host: None,
            key: None,
            current_value: None,
            message: message.into(),
        });
    }

    /// A configuration-consistency error tied to a specific key.
    pub fn key_error(
        &mut self,
        source: &str,
        key: &str,
        current_value: Option<&str>,
        message: impl Into<String>,
    ) {
        self.push(ReportEntry {
            severity: Severity::Error,
            source: source.to_string(),
            host: None,
            key: Some(key.to_string()),
            current_value: current_value.map(str::to_string),
            message: message.into(),
        });
    }

    /// Re-tag entries with the host they were collected for.
    pub fn for_host(mut self, host: &str) -> Self {
        for entry in &mut self.entries {
            entry.host.get_or_insert_with(|| host.to_string());
        }
        self
    }

    pub fn extend(&mut self, other: ValidationReport) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn errors(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| e.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}
