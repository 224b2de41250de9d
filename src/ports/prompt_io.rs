use crate::domain::{AppError, PromptReply};

/// Console interaction for the interactive prompt pipeline. Batch mode never
/// touches this port.
pub trait PromptIo {
    /// Show one prompt with its current/default value and collect a reply.
    fn ask(&mut self, prompt: &str, current: Option<&str>) -> Result<PromptReply, AppError>;

    /// Display an informational block (descriptions, help text, errors).
    fn say(&mut self, text: &str);
}
