use crate::{
    partition_positionals, registry::Class, Action, ActionKind, ArityMode, MatchError, Matches,
    Namespace, Registry, Unrecognized, Value,
};

/// A raw token together with its position in the input.
type Arg<'a> = (usize, &'a str);

/// Working state of a single parse call.
pub(crate) struct Matcher<'a> {
    registry: &'a Registry,
    tokens: &'a [String],
    classes: Vec<Class>,
    double_dash: Option<usize>,
    namespace: Namespace,
    consumed: Vec<usize>,
    seen: Vec<bool>,
}

impl<'a> Matcher<'a> {
    pub(crate) fn new(registry: &'a Registry, tokens: &'a [String]) -> Matcher<'a> {
        let double_dash = tokens.iter().position(|it| it == "--");
        let classes = tokens
            .iter()
            .enumerate()
            .map(|(i, token)| match double_dash {
                Some(dd) if i >= dd => Class::Positional,
                _ => registry.classify(token),
            })
            .collect();

        let mut namespace = Namespace::default();
        for action in registry.actions() {
            namespace.set(action.dest(), action.default().clone());
        }

        let seen = vec![false; registry.actions().len()];
        Matcher { registry, tokens, classes, double_dash, namespace, consumed: Vec::new(), seen }
    }

    pub(crate) fn run(mut self) -> Result<Matches, MatchError> {
        log::debug!(
            "matching {} tokens against {} actions",
            self.tokens.len(),
            self.registry.actions().len()
        );

        let threshold = self.remainder_threshold();
        let mut residual = Vec::new();
        let mut extras = Vec::new();
        let mut i = 0;
        while i < self.tokens.len() {
            if let Some(threshold) = threshold {
                if residual.len() == threshold && (threshold > 0 || self.is_positional(i)) {
                    log::trace!("remainder captures {} tokens", self.tokens.len() - i);
                    residual.extend(i..self.tokens.len());
                    break;
                }
            }
            if self.double_dash == Some(i) {
                self.consumed.push(i);
                i += 1;
                continue;
            }
            match self.classes[i].clone() {
                Class::Option { action, option, explicit } => {
                    i = self.consume_option(i, action, option, explicit)?;
                }
                Class::UnknownOption => {
                    extras.push(i);
                    i += 1;
                }
                Class::Positional => {
                    residual.push(i);
                    i += 1;
                }
            }
        }

        extras.extend(self.consume_positionals(&residual)?);
        extras.sort_unstable();
        self.check_required()?;
        self.consumed.sort_unstable();

        let tokens = self.tokens;
        let extras = extras
            .into_iter()
            .map(|position| Unrecognized { position, token: tokens[position].clone() })
            .collect::<Vec<_>>();
        log::debug!("matched {} tokens, {} left over", self.consumed.len(), extras.len());
        Ok(Matches { namespace: self.namespace, consumed: self.consumed, extras })
    }

    /// With a `...` positional preceded only by fixed-arity positionals,
    /// everything after the first `n` positional tokens belongs to it.
    fn remainder_threshold(&self) -> Option<usize> {
        let mut total = 0;
        for action in self.registry.actions().iter().filter(|it| it.is_positional()) {
            match action.arity() {
                ArityMode::Remainder => return Some(total),
                arity if arity.is_fixed() => total += arity.min(),
                _ => return None,
            }
        }
        None
    }

    fn is_positional(&self, i: usize) -> bool {
        self.double_dash != Some(i) && self.classes[i] == Class::Positional
    }

    fn consume_option(
        &mut self,
        start: usize,
        mut action: usize,
        mut option: String,
        mut explicit: Option<String>,
    ) -> Result<usize, MatchError> {
        let registry = self.registry;
        let tokens = self.tokens;
        self.consumed.push(start);
        loop {
            let arity = registry.actions()[action].arity();
            let arg = match explicit.take() {
                Some(it) => it,
                None => {
                    let count = self.option_arg_count(action, start + 1)?;
                    log::trace!("`{option}` consumes {count} token(s)");
                    let end = start + 1 + count;
                    let args = (start + 1..end).map(|j| (j, tokens[j].as_str())).collect::<Vec<_>>();
                    self.consumed.extend(start + 1..end);
                    self.take_action(action, &args)?;
                    return Ok(end);
                }
            };

            if arity.takes_explicit_arg() {
                log::trace!("`{option}` consumes explicit `{arg}`");
                self.take_action(action, &[(start, arg.as_str())])?;
                return Ok(start + 1);
            }

            let name = registry.actions()[action].display_name();
            if arity != ArityMode::Exact(0) {
                return Err(MatchError::MissingArgument { arg: name, arity });
            }
            if !registry.is_short(&option) {
                let position = start;
                return Err(MatchError::ExplicitArgumentIgnored { arg: name, value: arg, position });
            }

            // `-abc` is `-a -b -c` while the flags take no arguments.
            self.take_action(action, &[])?;
            let prefix = option.chars().next();
            let mut chars = arg.chars();
            let next = prefix.zip(chars.next());
            match next.and_then(|(prefix, c)| registry.short_option(prefix, c, chars.as_str())) {
                Some(Class::Option { action: next, option: next_option, explicit: rest }) => {
                    action = next;
                    option = next_option;
                    explicit = rest;
                }
                _ => {
                    return Err(MatchError::ExplicitArgumentIgnored {
                        arg: name,
                        value: arg,
                        position: start,
                    })
                }
            }
        }
    }

    fn option_arg_count(&self, action: usize, from: usize) -> Result<usize, MatchError> {
        let action = &self.registry.actions()[action];
        let arity = action.arity();
        if arity == ArityMode::Remainder {
            return Ok(self.tokens.len() - from);
        }
        let available = (from..self.tokens.len()).take_while(|&j| self.is_positional(j)).count();
        let count = match arity.max() {
            Some(max) => available.min(max),
            None => available,
        };
        if count < arity.min() {
            return Err(MatchError::MissingArgument { arg: action.display_name(), arity });
        }
        Ok(count)
    }

    /// Hands the residual tokens to positionals; returns the unclaimed ones.
    fn consume_positionals(&mut self, residual: &[usize]) -> Result<Vec<usize>, MatchError> {
        let registry = self.registry;
        let tokens = self.tokens;
        let positionals = registry
            .actions()
            .iter()
            .enumerate()
            .filter(|(_, it)| it.is_positional())
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        let arities = positionals.iter().map(|&i| registry.actions()[i].arity()).collect::<Vec<_>>();

        let counts = partition_positionals(&arities, residual.len()).map_err(|unsatisfied| {
            let action = &registry.actions()[positionals[unsatisfied]];
            MatchError::MissingArgument { arg: action.display_name(), arity: action.arity() }
        })?;

        let mut rest = residual;
        for (&action, count) in positionals.iter().zip(counts) {
            let (taken, tail) = rest.split_at(count);
            let args = taken.iter().map(|&j| (j, tokens[j].as_str())).collect::<Vec<_>>();
            self.consumed.extend_from_slice(taken);
            self.take_action(action, &args)?;
            rest = tail;
        }
        Ok(rest.to_vec())
    }

    fn take_action(&mut self, idx: usize, args: &[Arg<'_>]) -> Result<(), MatchError> {
        let registry = self.registry;
        let action = &registry.actions()[idx];
        self.seen[idx] = true;
        let dest = action.dest();
        match action.kind() {
            ActionKind::Store => {
                let value = values(action, args)?;
                self.namespace.set(dest, value);
            }
            ActionKind::StoreConst => self.namespace.set(dest, action.constant().clone()),
            ActionKind::Append => {
                let value = values(action, args)?;
                self.append(dest, value);
            }
            ActionKind::AppendConst => self.append(dest, action.constant().clone()),
            ActionKind::Count => {
                let count = self.namespace.get(dest).and_then(Value::as_int).unwrap_or(0);
                self.namespace.set(dest, Value::Int(count.saturating_add(1)));
            }
        }
        Ok(())
    }

    fn append(&mut self, dest: &str, value: Value) {
        let mut items = match self.namespace.take(dest) {
            Value::List(items) => items,
            _ => Vec::new(),
        };
        items.push(value);
        self.namespace.set(dest, Value::List(items));
    }

    fn check_required(&self) -> Result<(), MatchError> {
        let missing = self
            .registry
            .actions()
            .iter()
            .zip(&self.seen)
            .filter(|(action, seen)| action.required() && !**seen)
            .map(|(action, _)| action.display_name())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(MatchError::RequiredArgumentMissing { args: missing });
        }
        Ok(())
    }
}

fn values(action: &Action, args: &[Arg<'_>]) -> Result<Value, MatchError> {
    match (action.arity(), args) {
        (ArityMode::Optional, []) if action.is_positional() => Ok(action.default().clone()),
        (ArityMode::Optional, []) => Ok(action.constant().clone()),
        (ArityMode::ZeroOrMore, []) if action.is_positional() && !action.default().is_none() => {
            Ok(action.default().clone())
        }
        (ArityMode::Single | ArityMode::Optional, [arg]) => convert(action, *arg),
        _ => args.iter().map(|&arg| convert(action, arg)).collect::<Result<Vec<_>, _>>().map(Value::List),
    }
}

fn convert(action: &Action, (position, raw): Arg<'_>) -> Result<Value, MatchError> {
    let value = match action.conversion() {
        Some(conversion) => conversion.apply(raw).map_err(|reason| MatchError::InvalidType {
            arg: action.display_name(),
            conversion: conversion.name().to_string(),
            token: raw.to_string(),
            position,
            reason,
        })?,
        None => Value::Str(raw.to_string()),
    };
    if let Some(choices) = action.choices() {
        if !choices.contains(&value) {
            return Err(MatchError::InvalidChoice {
                arg: action.display_name(),
                value,
                choices: choices.to_vec(),
                position,
            });
        }
    }
    Ok(value)
}
