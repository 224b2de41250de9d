use crate::domain::properties::PropertyStore;
use crate::domain::validators::{ValidationFailure, Validator};

/// What a disabled prompt contributes to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disabled {
    /// The key must be absent; any configured value is removed.
    Remove,
    /// A fixed value is stored without prompting.
    Fixed(String),
    /// The prompt's default is stored without prompting.
    Default,
}

/// Out-of-band replies an interactive console can return instead of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptReply {
    Value(String),
    Help,
    Previous,
    AcceptDefaults,
    SaveAndExit,
}

impl PromptReply {
    /// Map the sentinel tokens typed at the console onto control replies.
    pub fn from_raw(raw: &str) -> PromptReply {
        match raw.trim() {
            "help" => PromptReply::Help,
            "prev" => PromptReply::Previous,
            "defaults" => PromptReply::AcceptDefaults,
            "save" => PromptReply::SaveAndExit,
            other => PromptReply::Value(other.to_string()),
        }
    }
}

type EnablePredicate = Box<dyn Fn(&PropertyStore) -> bool + Send + Sync>;

/// One input descriptor in the configuration pipeline: a store key, the text
/// shown to the user, the validation rule, a default, and an enable predicate
/// evaluated against the current store state.
pub struct PromptDescriptor {
    key: String,
    prompt: String,
    help: Option<String>,
    validator: Validator,
    default: Option<String>,
    weight: i32,
    enabled: Option<EnablePredicate>,
    disabled: Disabled,
    allow_previous: bool,
    advanced: bool,
}

impl PromptDescriptor {
    pub fn new(key: impl Into<String>, prompt: impl Into<String>, validator: Validator) -> Self {
        Self {
            key: key.into(),
            prompt: prompt.into(),
            help: None,
            validator,
            default: None,
            weight: 0,
            enabled: None,
            disabled: Disabled::Remove,
            allow_previous: true,
            advanced: false,
        }
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn enabled_if(
        mut self,
        predicate: impl Fn(&PropertyStore) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.enabled = Some(Box::new(predicate));
        self
    }

    pub fn when_disabled(mut self, disabled: Disabled) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn no_previous(mut self) -> Self {
        self.allow_previous = false;
        self
    }

    /// Tuning prompts most installations leave at the default. They are only
    /// asked when the pipeline runs in advanced mode.
    pub fn advanced(mut self) -> Self {
        self.advanced = true;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Store path segments for this prompt's key.
    pub fn path(&self) -> Vec<&str> {
        self.key.split('.').collect()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn help(&self) -> &str {
        self.help.as_deref().unwrap_or("No help is available for this prompt")
    }

    pub fn weight(&self) -> i32 {
        self.weight
    }

    pub fn allow_previous(&self) -> bool {
        self.allow_previous
    }

    pub fn is_advanced(&self) -> bool {
        self.advanced
    }

    pub fn is_enabled(&self, store: &PropertyStore) -> bool {
        match &self.enabled {
            Some(predicate) => predicate(store),
            None => true,
        }
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// The value shown as the current answer: the stored value, falling back
    /// to the default.
    pub fn current_value<'a>(&'a self, store: &'a PropertyStore) -> Option<&'a str> {
        store.get(&self.path()).or(self.default_value())
    }

    pub fn validate(&self, raw: &str) -> Result<String, ValidationFailure> {
        self.validator.validate(raw)
    }

    /// Write the disabled-state value for this prompt. Never consults any
    /// interactively supplied input.
    pub fn apply_disabled(&self, store: &mut PropertyStore) {
        match &self.disabled {
            Disabled::Remove => {
                store.remove(&self.path());
            }
            Disabled::Fixed(value) => store.set(&self.path(), value.clone()),
            Disabled::Default => {
                let value = self.default.clone().unwrap_or_default();
                store.set(&self.path(), value);
            }
        }
    }

    /// Check an already-stored value the way batch mode does: enabled prompts
    /// need a valid value (or valid default), disabled prompts must carry
    /// exactly their disabled value.
    pub fn check_stored(&self, store: &PropertyStore) -> Result<(), ValidationFailure> {
        let stored = store.get(&self.path());
        if self.is_enabled(store) {
            match stored.or(self.default_value()) {
                Some(value) => self.validate(value).map(|_| ()),
                None => Err(ValidationFailure::new("Value is missing")),
            }
        } else {
            match (&self.disabled, stored) {
                (Disabled::Remove, None) => Ok(()),
                (Disabled::Remove, Some(_)) => Err(ValidationFailure::new(
                    "Value should not be given, remove it from the configuration",
                )),
                (Disabled::Fixed(_) | Disabled::Default, _) => Ok(()),
            }
        }
    }
}

impl std::fmt::Debug for PromptDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptDescriptor")
            .field("key", &self.key)
            .field("weight", &self.weight)
            .field("default", &self.default)
            .finish()
    }
}
