use crate::domain::{AppError, PromptDescriptor, PromptReply, PropertyStore, ValidationReport};
use crate::ports::PromptIo;

/// How an interactive pipeline run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    Completed,
    /// The user typed `save`; the store holds everything collected so far.
    SavedEarly,
}

/// Drives the registered prompts in weight order, interactively or from a
/// pre-populated store. Prompt navigation (`prev`, `defaults`, `save`) is an
/// explicit state machine over the replies, not exception control flow.
pub struct PromptPipeline {
    prompts: Vec<PromptDescriptor>,
}

impl PromptPipeline {
    /// Sort is stable: equal weights keep registration order.
    pub fn new(mut prompts: Vec<PromptDescriptor>) -> Self {
        prompts.sort_by_key(PromptDescriptor::weight);
        Self { prompts }
    }

    pub fn prompts(&self) -> &[PromptDescriptor] {
        &self.prompts
    }

    /// Collect a value for every enabled prompt from the console. Advanced
    /// prompts keep their defaults unless `advanced` is set.
    pub fn run_interactive(
        &self,
        store: &mut PropertyStore,
        io: &mut dyn PromptIo,
        advanced: bool,
    ) -> Result<PipelineOutcome, AppError> {
        let mut index = 0;
        let mut answered: Vec<usize> = Vec::new();
        let mut defaulting = false;
        // After rewinding while defaulting, the revisited prompt is asked
        // even if its default validates.
        let mut force_prompt = false;

        'prompts: while index < self.prompts.len() {
            let prompt = &self.prompts[index];

            if !prompt.is_enabled(store) {
                prompt.apply_disabled(store);
                index += 1;
                continue;
            }

            let auto_accept = defaulting || (prompt.is_advanced() && !advanced);
            if auto_accept && !force_prompt {
                let current = prompt.current_value(store).unwrap_or("").to_string();
                match prompt.validate(&current) {
                    Ok(value) => {
                        store.set(&prompt.path(), value);
                        index += 1;
                        continue;
                    }
                    Err(e) => {
                        io.say(&format!(
                            "The default for '{}' is not valid ({}), please provide a value",
                            prompt.key(),
                            e
                        ));
                    }
                }
            }
            force_prompt = false;

            loop {
                let current = prompt.current_value(store).map(str::to_string);
                match io.ask(prompt.prompt(), current.as_deref())? {
                    PromptReply::Help => io.say(prompt.help()),
                    PromptReply::Previous => match answered.pop() {
                        Some(previous) => {
                            index = previous;
                            force_prompt = defaulting;
                            continue 'prompts;
                        }
                        None => io.say("Unable to move to the previous prompt"),
                    },
                    PromptReply::AcceptDefaults => {
                        io.say("Accepting the default value for all remaining prompts");
                        defaulting = true;
                        continue 'prompts;
                    }
                    PromptReply::SaveAndExit => return Ok(PipelineOutcome::SavedEarly),
                    PromptReply::Value(raw) => match prompt.validate(&raw) {
                        Ok(value) => {
                            store.set(&prompt.path(), value);
                            if prompt.allow_previous() {
                                answered.push(index);
                            }
                            index += 1;
                            continue 'prompts;
                        }
                        Err(e) => io.say(&format!("ERROR >> {}", e)),
                    },
                }
            }
        }

        Ok(PipelineOutcome::Completed)
    }

    /// Batch mode: validate the store's pre-existing values (or defaults)
    /// without prompting; failures accumulate instead of re-prompting. On
    /// success every prompt's key is materialized as present-with-value or
    /// explicitly absent.
    pub fn run_batch(&self, store: &mut PropertyStore, report: &mut ValidationReport) {
        for prompt in &self.prompts {
            if let Err(failure) = prompt.check_stored(store) {
                report.key_error(
                    prompt.prompt(),
                    prompt.key(),
                    store.get(&prompt.path()),
                    failure.message,
                );
                continue;
            }
            if prompt.is_enabled(store) {
                let value = prompt.current_value(store).unwrap_or("").to_string();
                if let Ok(normalized) = prompt.validate(&value) {
                    store.set(&prompt.path(), normalized);
                }
            } else {
                prompt.apply_disabled(store);
            }
        }
    }

    /// Consistency pass: flag store entries with no registered prompt. Runs
    /// after collection so orphan keys surface instead of passing through.
    pub fn verify_no_unknown_keys(&self, store: &PropertyStore, report: &mut ValidationReport) {
        let known: Vec<&str> = self.prompts.iter().map(PromptDescriptor::key).collect();
        for (flat_key, value) in store.flat_entries() {
            let dotted = flat_key.replace('[', ".").replace(']', "");
            if !known.contains(&dotted.as_str()) {
                report.key_error(
                    "Unknown configuration key",
                    &dotted,
                    Some(&value),
                    "This is an unknown configuration key",
                );
            }
        }
    }
}
