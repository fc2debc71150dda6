mod ast;
mod emit;
mod parse;

/// Builds an `argspec::Registry` from a declarative list of actions.
///
/// Expands to a `Result<argspec::Registry, argspec::ConfigError>`.
#[proc_macro]
pub fn actions(_ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    // Stub out the code, but let rust-analyzer resolve the invocation
    #[cfg(not(test))]
    {
        let text = match parse::actions(_ts) {
            Ok(actions) => emit::emit(&actions),
            Err(err) => format!("compile_error!({:?})", format!("invalid actions syntax, {err}")),
        };
        text.parse().unwrap()
    }
    #[cfg(test)]
    unimplemented!()
}

#[cfg(test)]
pub fn compile(src: &str) -> String {
    use proc_macro2::TokenStream;

    let ts = src.parse::<TokenStream>().unwrap();
    match parse::actions(ts) {
        Ok(actions) => emit::emit(&actions),
        Err(err) => err.to_string(),
    }
}
