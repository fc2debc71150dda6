use std::{fmt, str::FromStr, sync::Arc};

use crate::{ConfigError, Value};

/// How many tokens an action consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArityMode {
    /// Exactly one token, stored as a scalar.
    #[default]
    Single,
    /// Exactly `n` tokens, stored as a list.
    Exact(usize),
    /// Zero or one token (`?`).
    Optional,
    /// Any number of tokens (`*`).
    ZeroOrMore,
    /// At least one token (`+`).
    OneOrMore,
    /// Everything that is left (`...`).
    Remainder,
}

impl ArityMode {
    pub fn min(self) -> usize {
        match self {
            ArityMode::Single | ArityMode::OneOrMore => 1,
            ArityMode::Exact(n) => n,
            ArityMode::Optional | ArityMode::ZeroOrMore | ArityMode::Remainder => 0,
        }
    }

    pub fn max(self) -> Option<usize> {
        match self {
            ArityMode::Single | ArityMode::Optional => Some(1),
            ArityMode::Exact(n) => Some(n),
            ArityMode::ZeroOrMore | ArityMode::OneOrMore | ArityMode::Remainder => None,
        }
    }

    pub fn is_fixed(self) -> bool {
        matches!(self, ArityMode::Single | ArityMode::Exact(_))
    }

    pub(crate) fn takes_explicit_arg(self) -> bool {
        !matches!(self, ArityMode::Exact(n) if n != 1)
    }
}

impl FromStr for ArityMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<ArityMode, ConfigError> {
        let res = match s {
            "?" => ArityMode::Optional,
            "*" => ArityMode::ZeroOrMore,
            "+" => ArityMode::OneOrMore,
            "..." => ArityMode::Remainder,
            "A..." => return Err(ConfigError::UnsupportedArity(s.to_string())),
            _ => match s.parse::<i64>() {
                Ok(n) => ArityMode::try_from(n)?,
                Err(_) => return Err(ConfigError::InvalidArity(s.to_string())),
            },
        };
        Ok(res)
    }
}

impl TryFrom<i64> for ArityMode {
    type Error = ConfigError;

    fn try_from(n: i64) -> Result<ArityMode, ConfigError> {
        usize::try_from(n).map(ArityMode::Exact).map_err(|_| ConfigError::NegativeArity(n))
    }
}

/// What an action does with the tokens it consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActionKind {
    #[default]
    Store,
    StoreConst,
    Append,
    AppendConst,
    Count,
}

impl ActionKind {
    fn takes_tokens(self) -> bool {
        matches!(self, ActionKind::Store | ActionKind::Append)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Store => "store",
            ActionKind::StoreConst => "store_const",
            ActionKind::Append => "append",
            ActionKind::AppendConst => "append_const",
            ActionKind::Count => "count",
        };
        f.write_str(name)
    }
}

type ConvertFn = dyn Fn(&str) -> Result<Value, String> + Send + Sync;

/// Turns a raw token into a [`Value`].
#[derive(Clone)]
pub struct Conversion {
    name: &'static str,
    f: Arc<ConvertFn>,
}

impl Conversion {
    pub fn new<F>(name: &'static str, f: F) -> Conversion
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        Conversion { name, f: Arc::new(f) }
    }

    /// Conversion through [`FromStr`], e.g. `Conversion::parse::<i64>()`.
    pub fn parse<T>() -> Conversion
    where
        T: FromStr + Into<Value> + 'static,
        T::Err: fmt::Display,
    {
        let name = std::any::type_name::<T>();
        let name = name.rsplit("::").next().unwrap_or(name);
        Conversion::new(name, |raw| raw.parse::<T>().map(Into::into).map_err(|err| err.to_string()))
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub(crate) fn apply(&self, raw: &str) -> Result<Value, String> {
        (self.f)(raw)
    }
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Conversion").field(&self.name).finish()
    }
}

/// Everything a caller can say about an action before it is validated.
#[derive(Debug, Clone, Default)]
pub struct ActionConfig {
    pub option_strings: Vec<String>,
    pub dest: Option<String>,
    pub kind: ActionKind,
    pub arity: Option<ArityMode>,
    pub constant: Option<Value>,
    pub default: Option<Value>,
    pub conversion: Option<Conversion>,
    pub choices: Option<Vec<Value>>,
    pub required: bool,
    pub help: Option<String>,
    pub metavar: Option<String>,
}

impl ActionConfig {
    pub fn option<I, S>(option_strings: I) -> ActionConfig
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ActionConfig {
            option_strings: option_strings.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn positional(dest: impl Into<String>) -> ActionConfig {
        ActionConfig { dest: Some(dest.into()), ..Default::default() }
    }

    /// A `store_const` option storing `true`, defaulting to `false`.
    pub fn flag<I, S>(option_strings: I) -> ActionConfig
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ActionConfig::option(option_strings)
            .kind(ActionKind::StoreConst)
            .constant(true)
            .default(false)
    }

    pub fn count<I, S>(option_strings: I) -> ActionConfig
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ActionConfig::option(option_strings).kind(ActionKind::Count)
    }

    pub fn dest(mut self, dest: impl Into<String>) -> ActionConfig {
        self.dest = Some(dest.into());
        self
    }

    pub fn kind(mut self, kind: ActionKind) -> ActionConfig {
        self.kind = kind;
        self
    }

    pub fn arity(mut self, arity: ArityMode) -> ActionConfig {
        self.arity = Some(arity);
        self
    }

    pub fn constant(mut self, value: impl Into<Value>) -> ActionConfig {
        self.constant = Some(value.into());
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> ActionConfig {
        self.default = Some(value.into());
        self
    }

    pub fn convert(mut self, conversion: Conversion) -> ActionConfig {
        self.conversion = Some(conversion);
        self
    }

    pub fn choices<I, V>(mut self, choices: I) -> ActionConfig
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn required(mut self, yes: bool) -> ActionConfig {
        self.required = yes;
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> ActionConfig {
        self.help = Some(help.into());
        self
    }

    pub fn metavar(mut self, metavar: impl Into<String>) -> ActionConfig {
        self.metavar = Some(metavar.into());
        self
    }
}

/// A validated, immutable argument descriptor.
///
/// Built through [`Action::new`] or, more commonly,
/// [`Registry::register`](crate::Registry::register), which also checks the
/// action against the ones registered before it.
#[derive(Debug, Clone)]
pub struct Action {
    option_strings: Vec<String>,
    dest: String,
    kind: ActionKind,
    arity: ArityMode,
    constant: Value,
    default: Value,
    conversion: Option<Conversion>,
    choices: Option<Vec<Value>>,
    required: bool,
    help: Option<String>,
    metavar: Option<String>,
}

impl Action {
    pub fn new(config: ActionConfig) -> Result<Action, ConfigError> {
        Action::with_prefix_chars(config, "-")
    }

    pub(crate) fn with_prefix_chars(
        config: ActionConfig,
        prefix_chars: &str,
    ) -> Result<Action, ConfigError> {
        let is_prefix = |c: char| prefix_chars.contains(c);
        for option in &config.option_strings {
            let mut chars = option.chars();
            let valid = matches!(chars.next(), Some(c) if is_prefix(c)) && chars.next().is_some();
            if !valid {
                return Err(ConfigError::InvalidOptionString {
                    option: option.clone(),
                    prefix_chars: prefix_chars.to_string(),
                });
            }
        }

        let dest = match config.dest {
            Some(dest) => dest,
            None => derive_dest(&config.option_strings, prefix_chars),
        };
        if dest.is_empty() {
            return Err(ConfigError::EmptyDest);
        }

        let positional = config.option_strings.is_empty();
        if positional && config.required {
            return Err(ConfigError::RequiredPositional(dest));
        }
        if positional && config.kind != ActionKind::Store {
            return Err(ConfigError::PositionalKind { dest, kind: config.kind });
        }

        let arity = if config.kind.takes_tokens() {
            match config.arity.unwrap_or_default() {
                ArityMode::Exact(0) => return Err(ConfigError::ZeroArityStore(dest)),
                arity => arity,
            }
        } else {
            match config.arity {
                None | Some(ArityMode::Exact(0)) => ArityMode::Exact(0),
                Some(_) => return Err(ConfigError::ArityNotAllowed { dest, kind: config.kind }),
            }
        };

        if matches!(&config.choices, Some(choices) if choices.is_empty()) {
            return Err(ConfigError::EmptyChoices(dest));
        }

        Ok(Action {
            option_strings: config.option_strings,
            dest,
            kind: config.kind,
            arity,
            constant: config.constant.unwrap_or_default(),
            default: config.default.unwrap_or_default(),
            conversion: config.conversion,
            choices: config.choices,
            required: config.required,
            help: config.help,
            metavar: config.metavar,
        })
    }

    pub fn option_strings(&self) -> &[String] {
        &self.option_strings
    }
    pub fn dest(&self) -> &str {
        &self.dest
    }
    pub fn kind(&self) -> ActionKind {
        self.kind
    }
    pub fn arity(&self) -> ArityMode {
        self.arity
    }
    pub fn constant(&self) -> &Value {
        &self.constant
    }
    pub fn default(&self) -> &Value {
        &self.default
    }
    pub fn conversion(&self) -> Option<&Conversion> {
        self.conversion.as_ref()
    }
    pub fn choices(&self) -> Option<&[Value]> {
        self.choices.as_deref()
    }
    pub fn required(&self) -> bool {
        self.required
    }
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
    pub fn metavar(&self) -> Option<&str> {
        self.metavar.as_deref()
    }

    pub fn is_positional(&self) -> bool {
        self.option_strings.is_empty()
    }

    /// How the action is named in error messages: `-v/--verbose` for
    /// options, the metavar or dest for positionals.
    pub fn display_name(&self) -> String {
        if !self.option_strings.is_empty() {
            return self.option_strings.join("/");
        }
        self.metavar.clone().unwrap_or_else(|| self.dest.clone())
    }
}

/// `--foo-bar` -> `foo_bar`. Long options win over short ones.
fn derive_dest(option_strings: &[String], prefix_chars: &str) -> String {
    let is_long = |option: &&String| {
        let mut chars = option.chars();
        let first = chars.next();
        first.is_some() && first == chars.next() && first.map_or(false, |c| prefix_chars.contains(c))
    };
    let chosen = option_strings.iter().find(is_long).or_else(|| option_strings.first());
    match chosen {
        Some(option) => option.trim_start_matches(|c: char| prefix_chars.contains(c)).replace('-', "_"),
        None => String::new(),
    }
}
