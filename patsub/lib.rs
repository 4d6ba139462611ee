pub mod config;
mod error;
pub mod glob;
mod matcher;
mod quote;
pub mod scan;
pub mod template;

pub use indexmap;

pub use config::{CompiledConfig, CompiledTemplate, Config, ConfigError, TemplateConfig};
pub use error::*;
pub use glob::{Glob, GlobList, compile_glob, glob_to_regex};
pub use quote::*;
pub use scan::{Fragment, MatchGroups, concat, find_all, scan, scan_with, substitute};
pub use template::{
    Bindings, FieldSet, Placeholder, Template, bindings, expand, extract_placeholders, validate,
};
