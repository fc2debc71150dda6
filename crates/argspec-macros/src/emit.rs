use crate::ast;

use std::fmt::Write;

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

pub(crate) fn emit(actions: &ast::Actions) -> String {
    let mut buf = String::new();
    w!(buf, "argspec::Registry::build(|r_| {{\n");
    for item in &actions.items {
        w!(buf, "    r_.register(");
        emit_item(&mut buf, item);
        w!(buf, ")?;\n");
    }
    w!(buf, "    Ok(())\n");
    w!(buf, "}})\n");
    buf
}

fn emit_item(buf: &mut String, item: &ast::Item) {
    let names = item.names.iter().map(|it| format!("{it:?}")).collect::<Vec<_>>().join(", ");
    match item.kind {
        ast::Kind::Flag => w!(buf, "argspec::ActionConfig::flag(vec![{names}])"),
        ast::Kind::Count => w!(buf, "argspec::ActionConfig::count(vec![{names}])"),
        ast::Kind::Positional => {
            let dest = item.positional.as_deref().unwrap_or_default();
            w!(buf, "argspec::ActionConfig::positional({dest:?})")
        }
        ast::Kind::Optional | ast::Kind::Required | ast::Kind::Append => {
            w!(buf, "argspec::ActionConfig::option(vec![{names}])")
        }
    }

    match item.kind {
        ast::Kind::Required => w!(buf, ".required(true)"),
        ast::Kind::Append => w!(buf, ".kind(argspec::ActionKind::Append)"),
        _ => (),
    }
    if let Some(metavar) = &item.metavar {
        w!(buf, ".metavar({metavar:?})");
    }
    if let Some(ty) = &item.ty {
        w!(buf, ".convert(argspec::Conversion::parse::<{ty}>())");
    }

    for modifier in &item.mods {
        match modifier {
            ast::Modifier::Nargs(nargs) => {
                w!(buf, ".arity(argspec::ArityMode::{})", gen_nargs(*nargs))
            }
            ast::Modifier::Default(lit) => w!(buf, ".default({lit})"),
            ast::Modifier::Const(lit) => w!(buf, ".constant({lit})"),
            ast::Modifier::Choices(lits) => w!(buf, ".choices(vec![{}])", lits.join(", ")),
            ast::Modifier::Dest(dest) => w!(buf, ".dest({dest:?})"),
        }
    }

    if let Some(doc) = &item.doc {
        w!(buf, ".help({doc:?})");
    }
}

fn gen_nargs(nargs: ast::Nargs) -> String {
    match nargs {
        ast::Nargs::Optional => "Optional".to_string(),
        ast::Nargs::ZeroOrMore => "ZeroOrMore".to_string(),
        ast::Nargs::OneOrMore => "OneOrMore".to_string(),
        ast::Nargs::Remainder => "Remainder".to_string(),
        ast::Nargs::Exact(n) => format!("Exact({n})"),
    }
}
