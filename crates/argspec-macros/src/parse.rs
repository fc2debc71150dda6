use std::{fmt, mem};

#[cfg(not(test))]
use proc_macro::{Delimiter, TokenStream, TokenTree};
#[cfg(test)]
use proc_macro2::{Delimiter, TokenStream, TokenTree};

use crate::ast;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub(crate) struct Error {
    msg: String,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.msg, f)
    }
}

macro_rules! format_err {
    ($($tt:tt)*) => {
        Error { msg: format!($($tt)*) }
    };
}

macro_rules! bail {
    ($($tt:tt)*) => {
        return Err(format_err!($($tt)*))
    };
}

pub(crate) fn actions(ts: TokenStream) -> Result<ast::Actions> {
    let p = &mut Parser::new(ts);
    let mut items = Vec::new();
    while !p.end() {
        let doc = opt_doc(p)?;
        let mut item = item(p)?;
        item.doc = doc;
        items.push(item);
    }
    Ok(ast::Actions { items })
}

fn item(p: &mut Parser) -> Result<ast::Item> {
    let kind = kind(p)?;
    let mut res = ast::Item {
        kind,
        names: Vec::new(),
        positional: None,
        doc: None,
        metavar: None,
        ty: None,
        mods: Vec::new(),
    };

    if kind == ast::Kind::Positional {
        let name = p.expect_name()?;
        if name.starts_with('-') {
            bail!("positional name can't begin with `-`: `{name}`");
        }
        if p.eat_punct(':') {
            res.ty = Some(ty(p)?);
        }
        res.positional = Some(name);
    } else {
        res.names.push(flag_name(p)?);
        while p.eat_punct(',') {
            res.names.push(flag_name(p)?);
        }
        if p.lookahead_punct(':', 1) {
            if !res.takes_value() {
                bail!("`{}` takes no value: `{}`", kind.keyword(), res.names[0]);
            }
            res.metavar = Some(p.expect_name()?);
            p.expect_punct(':')?;
            res.ty = Some(ty(p)?);
        }
    }

    while let Some(modifier) = opt_modifier(p)? {
        if let ast::Modifier::Nargs(_) = modifier {
            if !res.takes_value() {
                bail!("`nargs` is not allowed on `{}`", kind.keyword());
            }
        }
        let name = modifier.keyword();
        if res.mods.iter().any(|it| it.keyword() == name) {
            bail!("duplicate `{name}`");
        }
        res.mods.push(modifier);
    }
    Ok(res)
}

fn kind(p: &mut Parser) -> Result<ast::Kind> {
    const KINDS: [ast::Kind; 6] = [
        ast::Kind::Optional,
        ast::Kind::Required,
        ast::Kind::Append,
        ast::Kind::Flag,
        ast::Kind::Count,
        ast::Kind::Positional,
    ];
    for kind in KINDS {
        if p.eat_keyword(kind.keyword()) {
            return Ok(kind);
        }
    }
    let expected = "`optional`, `required`, `append`, `flag`, `count`, `positional`";
    if let Some(name) = p.eat_name() {
        bail!("expected one of {expected}, got `{name}`")
    }
    let next = p.ts.pop().map(|it| it.to_string()).unwrap_or_default();
    bail!("expected one of {expected}, got `{next}`")
}

impl ast::Kind {
    fn keyword(self) -> &'static str {
        match self {
            ast::Kind::Optional => "optional",
            ast::Kind::Required => "required",
            ast::Kind::Append => "append",
            ast::Kind::Flag => "flag",
            ast::Kind::Count => "count",
            ast::Kind::Positional => "positional",
        }
    }
}

impl ast::Modifier {
    fn keyword(&self) -> &'static str {
        match self {
            ast::Modifier::Nargs(_) => "nargs",
            ast::Modifier::Default(_) => "default",
            ast::Modifier::Const(_) => "const",
            ast::Modifier::Choices(_) => "choices",
            ast::Modifier::Dest(_) => "dest",
        }
    }
}

fn opt_modifier(p: &mut Parser) -> Result<Option<ast::Modifier>> {
    let res = if p.eat_keyword("nargs") {
        ast::Modifier::Nargs(nargs(p)?)
    } else if p.eat_keyword("default") {
        ast::Modifier::Default(p.expect_literal()?)
    } else if p.eat_keyword("const") {
        ast::Modifier::Const(p.expect_literal()?)
    } else if p.eat_keyword("choices") {
        ast::Modifier::Choices(choices(p)?)
    } else if p.eat_keyword("dest") {
        ast::Modifier::Dest(p.expect_name()?)
    } else {
        return Ok(None);
    };
    Ok(Some(res))
}

fn nargs(p: &mut Parser) -> Result<ast::Nargs> {
    let res = if p.eat_punct('?') {
        ast::Nargs::Optional
    } else if p.eat_punct('*') {
        ast::Nargs::ZeroOrMore
    } else if p.eat_punct('+') {
        ast::Nargs::OneOrMore
    } else if p.eat_punct('.') {
        p.expect_punct('.')?;
        p.expect_punct('.')?;
        ast::Nargs::Remainder
    } else if p.at_keyword("A") {
        bail!("`A...` arity is not supported")
    } else if p.eat_punct('-') {
        bail!("`nargs` can't be negative")
    } else {
        let lit = p.expect_literal()?;
        match lit.parse::<usize>() {
            Ok(n) => ast::Nargs::Exact(n),
            Err(_) => bail!("expected one of `?`, `*`, `+`, `...` or a count, got `{lit}`"),
        }
    };
    Ok(res)
}

fn choices(p: &mut Parser) -> Result<Vec<String>> {
    p.enter_delim(Delimiter::Bracket)?;
    let mut res = Vec::new();
    while !p.end() {
        res.push(p.expect_literal()?);
        if !p.eat_punct(',') {
            break;
        }
    }
    p.exit_delim()?;
    if res.is_empty() {
        bail!("`choices` must not be empty");
    }
    Ok(res)
}

fn ty(p: &mut Parser) -> Result<String> {
    let mut res = p.expect_name()?;
    while p.lookahead_punct(':', 0) && p.lookahead_punct(':', 1) {
        p.expect_punct(':')?;
        p.expect_punct(':')?;
        res.push_str("::");
        res.push_str(&p.expect_name()?);
    }
    Ok(res)
}

fn opt_single_doc(p: &mut Parser) -> Result<Option<String>> {
    if !p.eat_punct('#') {
        return Ok(None);
    }
    p.enter_delim(Delimiter::Bracket)?;
    p.expect_keyword("doc")?;
    p.expect_punct('=')?;
    let mut res = p.expect_string()?;
    if let Some(suf) = res.strip_prefix(' ') {
        res = suf.to_string();
    }
    p.exit_delim()?;
    Ok(Some(res))
}

fn opt_doc(p: &mut Parser) -> Result<Option<String>> {
    let lines =
        core::iter::from_fn(|| opt_single_doc(p).transpose()).collect::<Result<Vec<String>>>()?;
    let lines = lines.join("\n");

    if lines.is_empty() {
        Ok(None)
    } else {
        Ok(Some(lines))
    }
}

fn flag_name(p: &mut Parser) -> Result<String> {
    let name = p.expect_name()?;
    if !name.starts_with('-') || name.trim_start_matches('-').is_empty() {
        bail!("option name should begin with `-`: `{name}`");
    }
    Ok(name)
}

struct Parser {
    stack: Vec<Vec<TokenTree>>,
    ts: Vec<TokenTree>,
}

impl Parser {
    fn new(ts: TokenStream) -> Self {
        let mut ts = ts.into_iter().collect::<Vec<_>>();
        ts.reverse();
        Self { stack: Vec::new(), ts }
    }

    fn enter_delim(&mut self, delimiter: Delimiter) -> Result<()> {
        match self.ts.pop() {
            Some(TokenTree::Group(g)) if g.delimiter() == delimiter => {
                let mut ts = g.stream().into_iter().collect::<Vec<_>>();
                ts.reverse();
                let ts = mem::replace(&mut self.ts, ts);
                self.stack.push(ts);
            }
            _ => bail!("expected `{}`", open(delimiter)),
        }
        Ok(())
    }
    fn exit_delim(&mut self) -> Result<()> {
        if !self.end() {
            let next = self.ts.last().map(|it| it.to_string()).unwrap_or_default();
            bail!("unexpected `{next}`")
        }
        match self.stack.pop() {
            Some(ts) => self.ts = ts,
            None => bail!("unbalanced delimiters"),
        }
        Ok(())
    }
    fn end(&mut self) -> bool {
        self.ts.last().is_none()
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<()> {
        if !self.eat_keyword(kw) {
            bail!("expected `{kw}`")
        }
        Ok(())
    }
    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.ts.pop();
            true
        } else {
            false
        }
    }
    fn at_keyword(&mut self, kw: &str) -> bool {
        match self.ts.last() {
            Some(TokenTree::Ident(ident)) => ident.to_string() == kw,
            _ => false,
        }
    }

    fn expect_name(&mut self) -> Result<String> {
        self.eat_name().ok_or_else(|| {
            let next = self.ts.pop().map(|it| it.to_string()).unwrap_or_default();
            format_err!("expected a name, got: `{next}`")
        })
    }
    fn eat_name(&mut self) -> Option<String> {
        let mut buf = String::new();
        let mut prev_ident = false;
        loop {
            match self.ts.last() {
                Some(TokenTree::Punct(p)) if p.as_char() == '-' => {
                    prev_ident = false;
                    buf.push('-');
                }
                Some(TokenTree::Ident(ident)) if !prev_ident => {
                    prev_ident = true;
                    buf.push_str(&ident.to_string());
                }
                _ => break,
            }
            self.ts.pop();
        }
        if buf.is_empty() {
            None
        } else {
            Some(buf)
        }
    }

    fn expect_punct(&mut self, punct: char) -> Result<()> {
        if !self.eat_punct(punct) {
            bail!("expected `{punct}`")
        }
        Ok(())
    }
    fn eat_punct(&mut self, punct: char) -> bool {
        match self.ts.last() {
            Some(TokenTree::Punct(p)) if p.as_char() == punct => {
                self.ts.pop();
                true
            }
            _ => false,
        }
    }
    fn lookahead_punct(&mut self, punct: char, n: usize) -> bool {
        match self.ts.iter().rev().nth(n) {
            Some(TokenTree::Punct(p)) => p.as_char() == punct,
            _ => false,
        }
    }

    fn expect_string(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Literal(lit)) if lit.to_string().starts_with('"') => {
                Ok(str_lit_value(&lit.to_string()))
            }
            _ => bail!("expected a string"),
        }
    }

    /// A literal as written: `"auto"`, `92`, `-1.5`, `true`.
    fn expect_literal(&mut self) -> Result<String> {
        for kw in ["true", "false"] {
            if self.eat_keyword(kw) {
                return Ok(kw.to_string());
            }
        }
        let sign = if self.eat_punct('-') { "-" } else { "" };
        match self.ts.pop() {
            Some(TokenTree::Literal(lit)) => Ok(format!("{sign}{lit}")),
            Some(tt) => bail!("expected a literal, got `{tt}`"),
            None => bail!("expected a literal"),
        }
    }
}

fn open(delimiter: Delimiter) -> &'static str {
    match delimiter {
        Delimiter::Parenthesis => "(",
        Delimiter::Brace => "{",
        Delimiter::Bracket => "[",
        Delimiter::None => "group",
    }
}

/// "Parses" a plain string literal into the corresponding value.
///
/// Really needs support in the proc_macro library:
/// <https://internals.rust-lang.org/t/getting-value-out-of-proc-macro-literal/14140>
fn str_lit_value(lit: &str) -> String {
    let inner = lit.strip_prefix('"').and_then(|it| it.strip_suffix('"')).unwrap_or(lit);
    let mut res = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            res.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => res.push('\n'),
            Some('t') => res.push('\t'),
            Some(c) => res.push(c),
            None => res.push('\\'),
        }
    }
    res
}
