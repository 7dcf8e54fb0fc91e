//! Asset loader rules.

pub mod font;

pub use font::{
    create_font_loader_rule, node_modules_resolver, FontLoaderRule, LoaderSpec, UrlLoaderOptions,
};
