use std::collections::HashMap;

use crate::{
    matcher::Matcher, Action, ActionConfig, ConfigError, MatchError, Matches, Namespace,
};

/// Registry-wide parsing settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Characters that start an option string.
    pub prefix_chars: String,
    /// Accept unambiguous (first registered) prefixes of long options,
    /// e.g. `--verb` for `--verbose`.
    pub allow_abbrev: bool,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings { prefix_chars: "-".to_string(), allow_abbrev: false }
    }
}

/// An ordered list of actions, ready to parse tokens.
///
/// Registration order is matching order for positionals and priority order
/// for abbreviated long options.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    settings: Settings,
    actions: Vec<Action>,
    options: HashMap<String, usize>,
    has_negative_number_options: bool,
}

/// How the matcher sees a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Class {
    Option { action: usize, option: String, explicit: Option<String> },
    UnknownOption,
    Positional,
}

impl Registry {
    pub fn new() -> Registry {
        Registry::default()
    }

    pub fn with_settings(settings: Settings) -> Result<Registry, ConfigError> {
        if settings.prefix_chars.is_empty() {
            return Err(ConfigError::EmptyPrefixChars);
        }
        Ok(Registry { settings, ..Registry::default() })
    }

    /// Runs `f` against a fresh registry, returning it once every
    /// registration succeeded.
    pub fn build<F>(f: F) -> Result<Registry, ConfigError>
    where
        F: FnOnce(&mut Registry) -> Result<(), ConfigError>,
    {
        let mut res = Registry::new();
        f(&mut res)?;
        Ok(res)
    }

    pub fn register(&mut self, config: ActionConfig) -> Result<&Action, ConfigError> {
        let action = Action::with_prefix_chars(config, &self.settings.prefix_chars)?;

        if self.get(action.dest()).is_some() {
            return Err(ConfigError::DuplicateDest(action.dest().to_string()));
        }
        for (i, option) in action.option_strings().iter().enumerate() {
            let existing = match self.options.get(option) {
                Some(&idx) => Some(self.actions[idx].dest()),
                None if action.option_strings()[..i].contains(option) => Some(action.dest()),
                None => None,
            };
            if let Some(existing) = existing {
                return Err(ConfigError::ConflictingOptionString {
                    option: option.clone(),
                    dest: action.dest().to_string(),
                    existing: existing.to_string(),
                });
            }
        }

        let idx = self.actions.len();
        for option in action.option_strings() {
            if self.is_negative_number(option) {
                self.has_negative_number_options = true;
            }
            self.options.insert(option.clone(), idx);
        }
        log::debug!("registered `{}` as {}", action.display_name(), action.dest());
        self.actions.push(action);
        Ok(&self.actions[idx])
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn get(&self, dest: &str) -> Option<&Action> {
        self.actions.iter().find(|it| it.dest() == dest)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Parses `tokens`, failing on anything no action claims.
    pub fn parse<I, S>(&self, tokens: I) -> Result<Namespace, MatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let matches = self.parse_known(tokens)?;
        if !matches.extras.is_empty() {
            return Err(MatchError::UnrecognizedArguments { tokens: matches.extras });
        }
        Ok(matches.namespace)
    }

    /// Parses `tokens`, handing back unclaimed ones instead of failing.
    pub fn parse_known<I, S>(&self, tokens: I) -> Result<Matches, MatchError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens = tokens.into_iter().map(Into::into).collect::<Vec<String>>();
        Matcher::new(self, &tokens).run()
    }

    pub(crate) fn classify(&self, token: &str) -> Class {
        let mut chars = token.chars();
        match chars.next() {
            Some(c) if self.is_prefix(c) => (),
            _ => return Class::Positional,
        }
        if let Some(&action) = self.options.get(token) {
            return Class::Option { action, option: token.to_string(), explicit: None };
        }
        let second = match chars.next() {
            Some(c) => c,
            None => return Class::Positional,
        };

        if let Some((option, explicit)) = token.split_once('=') {
            if let Some(&action) = self.options.get(option) {
                let explicit = Some(explicit.to_string());
                return Class::Option { action, option: option.to_string(), explicit };
            }
        }

        if !self.is_prefix(second) {
            let split = token.len() - chars.as_str().len();
            if let Some(&action) = self.options.get(&token[..split]) {
                let explicit = Some(token[split..].to_string());
                return Class::Option { action, option: token[..split].to_string(), explicit };
            }
        } else if self.settings.allow_abbrev {
            if let Some(class) = self.abbreviation(token) {
                return class;
            }
        }

        if self.is_negative_number(token) && !self.has_negative_number_options {
            return Class::Positional;
        }
        if token.contains(' ') {
            return Class::Positional;
        }
        Class::UnknownOption
    }

    /// Looks up `-x` in a `-xyz` cluster, keeping the cluster's own prefix.
    pub(crate) fn short_option(&self, prefix: char, c: char, rest: &str) -> Option<Class> {
        let option = format!("{prefix}{c}");
        let &action = self.options.get(&option)?;
        let explicit = if rest.is_empty() { None } else { Some(rest.to_string()) };
        Some(Class::Option { action, option, explicit })
    }

    pub(crate) fn is_short(&self, option: &str) -> bool {
        let mut chars = option.chars();
        let (first, second) = (chars.next(), chars.next());
        first.is_some() && second.map_or(false, |c| !self.is_prefix(c)) && chars.next().is_none()
    }

    fn abbreviation(&self, token: &str) -> Option<Class> {
        let (prefix, explicit) = match token.split_once('=') {
            Some((prefix, explicit)) => (prefix, Some(explicit.to_string())),
            None => (token, None),
        };
        if prefix.chars().count() <= 2 {
            return None;
        }
        self.actions.iter().enumerate().find_map(|(action, it)| {
            let option = it.option_strings().iter().find(|option| option.starts_with(prefix))?;
            log::trace!("`{token}` abbreviates `{option}`");
            Some(Class::Option { action, option: option.clone(), explicit: explicit.clone() })
        })
    }

    fn is_prefix(&self, c: char) -> bool {
        self.settings.prefix_chars.contains(c)
    }

    /// `-5` or `-.5`, `-1.25`; no exponents, no trailing dot.
    fn is_negative_number(&self, token: &str) -> bool {
        let digits = match token.strip_prefix('-') {
            Some(it) => it,
            None => return false,
        };
        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        match digits.split_once('.') {
            None => !digits.is_empty() && all_digits(digits),
            Some((int, frac)) => !frac.is_empty() && all_digits(int) && all_digits(frac),
        }
    }
}
