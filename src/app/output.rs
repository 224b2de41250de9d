use crate::domain::{Severity, ValidationReport};

/// Console output with a verbosity threshold (`-V` lowers it to Debug, `-q`
/// raises it to Error). All user-facing text goes to stdout so batch runs
/// capture one stream.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    threshold: Severity,
}

impl Default for Output {
    fn default() -> Self {
        Self { threshold: Severity::Info }
    }
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        let threshold = if verbose {
            Severity::Debug
        } else if quiet {
            Severity::Error
        } else {
            Severity::Info
        };
        Self { threshold }
    }

    pub fn write(&self, severity: Severity, message: &str) {
        if severity < self.threshold {
            return;
        }
        match severity {
            Severity::Debug => println!("DEBUG >> {}", message),
            Severity::Info => println!("{}", message),
            Severity::Warn => println!("WARN  >> {}", message),
            Severity::Error => println!("ERROR >> {}", message),
        }
    }

    pub fn debug(&self, message: &str) {
        self.write(Severity::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.write(Severity::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.write(Severity::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.write(Severity::Error, message);
    }

    pub fn divider(&self) {
        self.info("#####################################################################");
    }

    pub fn header(&self, title: &str) {
        self.divider();
        self.info(&format!("# {}", title));
        self.divider();
    }

    /// Print every accumulated finding, errors with their offending key and
    /// current value.
    pub fn print_report(&self, report: &ValidationReport) {
        for entry in report.entries() {
            let host = entry.host.as_deref().map(|h| format!(" [{}]", h)).unwrap_or_default();
            self.write(entry.severity, &format!("{}{}: {}", entry.source, host, entry.message));
            if entry.severity == Severity::Error {
                if let Some(key) = &entry.key {
                    self.error(&format!("> Config Key: {}", key));
                }
                if let Some(value) = &entry.current_value {
                    if !value.is_empty() {
                        self.error(&format!("> Current Value: {}", value));
                    }
                }
            }
        }
        if report.has_errors() {
            self.divider();
            self.error(&format!("{} error(s) collected", report.error_count()));
        }
    }
}
