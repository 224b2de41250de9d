use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use regex::Regex;

use crate::domain::AppError;

/// How a rewrite rule decides whether it owns a line.
pub enum LineMatcher {
    Contains(String),
    Prefix(String),
    Pattern(Regex),
}

impl LineMatcher {
    fn matches(&self, line: &str) -> bool {
        match self {
            LineMatcher::Contains(needle) => line.contains(needle.as_str()),
            LineMatcher::Prefix(prefix) => line.starts_with(prefix.as_str()),
            LineMatcher::Pattern(re) => re.is_match(line),
        }
    }
}

/// What a matched line becomes. `Drop` removes the line from the output,
/// used to comment out or delete a directive.
pub enum Rewrite {
    Replace(String),
    Map(Box<dyn Fn(&str) -> Option<String>>),
    Drop,
}

/// Declarative, ordered rewrite table: each line is offered to the rules in
/// order and the first match wins; unmatched lines copy through verbatim.
#[derive(Default)]
pub struct RewriteRules {
    rules: Vec<(LineMatcher, Rewrite)>,
}

impl RewriteRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, matcher: LineMatcher, rewrite: Rewrite) -> Self {
        self.rules.push((matcher, rewrite));
        self
    }

    /// The common case: rewrite a `key=...` directive to `key=value`.
    pub fn set_property(self, key: &str, value: impl Into<String>) -> Self {
        let prefix = format!("{}=", key);
        let replacement = format!("{}={}", key, value.into());
        self.rule(LineMatcher::Prefix(prefix), Rewrite::Replace(replacement))
    }

    /// Remove any line carrying the given directive.
    pub fn drop_property(self, key: &str) -> Self {
        self.rule(LineMatcher::Prefix(format!("{}=", key)), Rewrite::Drop)
    }

    /// Apply the table to one line. `None` means the line is dropped.
    pub fn apply(&self, line: &str) -> Option<String> {
        for (matcher, rewrite) in &self.rules {
            if matcher.matches(line) {
                return match rewrite {
                    Rewrite::Replace(replacement) => Some(replacement.clone()),
                    Rewrite::Map(f) => f(line),
                    Rewrite::Drop => None,
                };
            }
        }
        Some(line.to_string())
    }
}

/// Line-rewriting engine that turns a sample properties/script file into a
/// concrete, host-specific one. Lines starting with the comment prefix (when
/// set) pass through before any rule is consulted. Single pass, fail fast.
pub struct Transformer {
    source: PathBuf,
    destination: PathBuf,
    comment_prefix: Option<String>,
}

impl Transformer {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        comment_prefix: Option<&str>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            comment_prefix: comment_prefix.map(str::to_string),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn transform(&self, rules: &RewriteRules) -> Result<(), AppError> {
        let content = fs::read_to_string(&self.source)
            .map_err(|_| AppError::TemplateNotReadable(self.source.display().to_string()))?;

        let mut out = String::new();
        for line in content.lines() {
            let passthrough = self
                .comment_prefix
                .as_deref()
                .is_some_and(|prefix| line.starts_with(prefix));
            if passthrough {
                out.push_str(line);
                out.push('\n');
                continue;
            }
            if let Some(rewritten) = rules.apply(line) {
                out.push_str(&rewritten);
                out.push('\n');
            }
        }

        fs::write(&self.destination, out)?;
        Ok(())
    }
}

/// Mark a generated artifact with the configuration timestamp. The marker is
/// a comment line so re-transforming the file leaves it untouched.
pub fn append_generated_marker(path: &Path) -> Result<(), AppError> {
    let mut content = fs::read_to_string(path)?;
    content.push_str(&format!("# AUTO-CONFIGURED: {}\n", Local::now().to_rfc3339()));
    fs::write(path, content)?;
    Ok(())
}

/// Owner-executable bit for generated control scripts; properties files keep
/// default permissions. The policy belongs to the step writing the file.
#[cfg(unix)]
pub fn make_executable(path: &Path) -> Result<(), AppError> {
    use std::os::unix::fs::PermissionsExt;
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)?;
    Ok(())
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> Result<(), AppError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TEMPLATE: &str = "\
# Sample replication service properties
replicator.role=slave
replicator.master.host=
replicator.buffer.size=10
replicator.password=CHANGE_ME
";

    fn write_template(dir: &TempDir) -> PathBuf {
        let src = dir.path().join("sample.properties");
        fs::write(&src, TEMPLATE).unwrap();
        src
    }

    #[test]
    fn first_match_wins_and_unmatched_lines_copy_verbatim() {
        let dir = TempDir::new().unwrap();
        let src = write_template(&dir);
        let dst = dir.path().join("out.properties");

        let rules = RewriteRules::new()
            .set_property("replicator.role", "master")
            .set_property("replicator.role", "never-reached");
        Transformer::new(&src, &dst, Some("#")).transform(&rules).unwrap();

        let result = fs::read_to_string(&dst).unwrap();
        assert!(result.contains("replicator.role=master\n"));
        assert!(!result.contains("never-reached"));
        assert!(result.contains("replicator.buffer.size=10\n"));
    }

    #[test]
    fn comment_lines_pass_through_even_when_a_rule_matches() {
        let dir = TempDir::new().unwrap();
        let src = write_template(&dir);
        let dst = dir.path().join("out.properties");

        let rules = RewriteRules::new().rule(
            LineMatcher::Contains("replication".to_string()),
            Rewrite::Replace("should not appear".to_string()),
        );
        Transformer::new(&src, &dst, Some("#")).transform(&rules).unwrap();

        let result = fs::read_to_string(&dst).unwrap();
        assert!(result.starts_with("# Sample replication service properties\n"));
    }

    #[test]
    fn drop_removes_the_directive() {
        let dir = TempDir::new().unwrap();
        let src = write_template(&dir);
        let dst = dir.path().join("out.properties");

        let rules = RewriteRules::new().drop_property("replicator.password");
        Transformer::new(&src, &dst, Some("#")).transform(&rules).unwrap();

        let result = fs::read_to_string(&dst).unwrap();
        assert!(!result.contains("replicator.password"));
    }

    #[test]
    fn map_rewrite_can_edit_in_place() {
        let dir = TempDir::new().unwrap();
        let src = write_template(&dir);
        let dst = dir.path().join("out.properties");

        let rules = RewriteRules::new().rule(
            LineMatcher::Pattern(Regex::new(r"^replicator\.master\.host=").unwrap()),
            Rewrite::Map(Box::new(|line| Some(format!("{}db1.example.com", line)))),
        );
        Transformer::new(&src, &dst, Some("#")).transform(&rules).unwrap();

        let result = fs::read_to_string(&dst).unwrap();
        assert!(result.contains("replicator.master.host=db1.example.com\n"));
    }

    #[test]
    fn idempotent_rules_applied_twice_change_nothing_further() {
        let dir = TempDir::new().unwrap();
        let src = write_template(&dir);
        let once = dir.path().join("once.properties");
        let twice = dir.path().join("twice.properties");

        let rules = RewriteRules::new()
            .set_property("replicator.role", "master")
            .set_property("replicator.buffer.size", "20");
        Transformer::new(&src, &once, Some("#")).transform(&rules).unwrap();
        Transformer::new(&once, &twice, Some("#")).transform(&rules).unwrap();

        assert_eq!(fs::read_to_string(&once).unwrap(), fs::read_to_string(&twice).unwrap());
    }

    #[test]
    fn generated_marker_survives_retransformation() {
        let dir = TempDir::new().unwrap();
        let src = write_template(&dir);
        let dst = dir.path().join("out.properties");

        let rules = RewriteRules::new().set_property("replicator.role", "master");
        Transformer::new(&src, &dst, Some("#")).transform(&rules).unwrap();
        append_generated_marker(&dst).unwrap();
        let marked = fs::read_to_string(&dst).unwrap();
        assert!(marked.lines().last().unwrap().starts_with("# AUTO-CONFIGURED: "));

        let again = dir.path().join("again.properties");
        Transformer::new(&dst, &again, Some("#")).transform(&rules).unwrap();
        let result = fs::read_to_string(&again).unwrap();
        assert!(result.contains("# AUTO-CONFIGURED: "));
    }

    #[test]
    fn unreadable_source_is_fatal() {
        let dir = TempDir::new().unwrap();
        let err = Transformer::new(dir.path().join("absent"), dir.path().join("out"), None)
            .transform(&RewriteRules::new())
            .unwrap_err();
        assert!(matches!(err, AppError::TemplateNotReadable(_)));
    }
}
