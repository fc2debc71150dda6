#[derive(Debug)]
pub(crate) struct Actions {
    pub(crate) items: Vec<Item>,
}

#[derive(Debug)]
pub(crate) struct Item {
    pub(crate) kind: Kind,
    /// Option strings, empty for positionals.
    pub(crate) names: Vec<String>,
    /// Dest of a positional.
    pub(crate) positional: Option<String>,
    pub(crate) doc: Option<String>,
    pub(crate) metavar: Option<String>,
    /// Type converted to through `FromStr`.
    pub(crate) ty: Option<String>,
    pub(crate) mods: Vec<Modifier>,
}

impl Item {
    pub(crate) fn takes_value(&self) -> bool {
        !matches!(self.kind, Kind::Flag | Kind::Count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Optional,
    Required,
    Append,
    Flag,
    Count,
    Positional,
}

#[derive(Debug)]
pub(crate) enum Modifier {
    Nargs(Nargs),
    /// Literals are kept as written and passed through to `Into<Value>`.
    Default(String),
    Const(String),
    Choices(Vec<String>),
    Dest(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Nargs {
    Optional,
    ZeroOrMore,
    OneOrMore,
    Remainder,
    Exact(usize),
}
