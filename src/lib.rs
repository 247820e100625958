/*
 *  ctfbot - Discord bot for browsing CTFtime events and teams.
 *  Copyright (C) 2025  ctfbot contributors
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */
/*
 * The package is a proc-macro library so the bot binary can annotate its commands with
 * `#[ctfbot::log_cmd]`. Everything else lives in the binary.
 */
extern crate proc_macro;
use darling::ast::NestedMeta;
use darling::FromMeta;
use proc_macro::TokenStream;
use quote::quote;
use quote::ToTokens as _;
use syn::spanned::Spanned as _;
use syn::{parse_macro_input, ItemFn};

/// Arguments accepted by `#[log_cmd]`.
#[derive(Default, FromMeta)]
struct LogCmdArgs {
    /// Log level for the invocation line (`info` when omitted).
    #[darling(default)]
    level: Option<String>,
}

/**
 * Inserts a log statement at the top of a poise command, recording the invocation and who
 * triggered it.
 *
 * The first argument of the function must be the poise context (e.g. `ctx: Context<'_>`).
 * Usage: `#[ctfbot::log_cmd]` or `#[ctfbot::log_cmd(level = "debug")]`.
 */
#[proc_macro_attribute]
pub fn log_cmd(macro_attrs: TokenStream, function: TokenStream) -> TokenStream {
    let attr_args = match NestedMeta::parse_meta_list(macro_attrs.into()) {
        Ok(args) => args,
        Err(e) => return darling::Error::from(e).write_errors().into(),
    };
    let args = match LogCmdArgs::from_list(&attr_args) {
        Ok(args) => args,
        Err(e) => return e.write_errors().into(),
    };

    let mut function = parse_macro_input!(function as ItemFn);

    let level = match args.level.as_deref().unwrap_or("info") {
        "error" => quote!(::log::Level::Error),
        "warn" => quote!(::log::Level::Warn),
        "info" => quote!(::log::Level::Info),
        "debug" => quote!(::log::Level::Debug),
        "trace" => quote!(::log::Level::Trace),
        other => {
            return darling::Error::from(syn::Error::new(
                function.sig.span(),
                format!("[log_cmd] unknown log level `{}`", other),
            ))
            .write_errors()
            .into()
        }
    };

    let Some(first_arg) = function.sig.inputs.first() else {
        return darling::Error::from(syn::Error::new(
            function.sig.span(),
            "[log_cmd] function must have the command context as first argument",
        ))
        .write_errors()
        .into();
    };
    let syn::FnArg::Typed(ctx_arg) = first_arg else {
        return darling::Error::from(syn::Error::new(
            first_arg.span(),
            "[log_cmd] `self` argument is not allowed",
        ))
        .write_errors()
        .into();
    };
    let syn::Pat::Ident(ident) = &*ctx_arg.pat else {
        return darling::Error::from(syn::Error::new(
            ctx_arg.pat.span(),
            "[log_cmd] expected an identifier",
        ))
        .write_errors()
        .into();
    };
    let ctx_ident = ident.ident.clone();

    let statement: syn::Stmt = syn::parse_quote! {
        crate::utils::log_cmd!(#ctx_ident, #level);
    };
    function.block.stmts.insert(0, statement);

    function.into_token_stream().into()
}
