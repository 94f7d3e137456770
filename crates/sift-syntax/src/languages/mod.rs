//! Dialects for each supported grammar.

mod csharp;
mod css;
mod html;
mod javascript;
mod lua;
mod python;
mod rust;

use crate::dialect::Dialect;
use crate::language::SupportedLanguage;

/// Returns the dialect used for `language`.
pub(crate) fn dialect_for(language: SupportedLanguage) -> &'static dyn Dialect {
    match language {
        SupportedLanguage::JavaScript => &javascript::JAVASCRIPT,
        SupportedLanguage::TypeScript | SupportedLanguage::Tsx => &javascript::TYPESCRIPT,
        SupportedLanguage::Python => &python::PYTHON,
        SupportedLanguage::CSharp => &csharp::CSHARP,
        SupportedLanguage::Css => &css::CSS,
        SupportedLanguage::Html => &html::HTML,
        SupportedLanguage::Rust => &rust::RUST,
        SupportedLanguage::Lua => &lua::LUA,
    }
}
