//! Named templates and globs, declared in TOML.
//!
//! ```toml
//! [templates.greeting]
//! template = "Hello {name}, you are {age}"
//! fields = ["name", "age"]
//!
//! [globs]
//! logs = "{foo,bar}.log"
//! ```

use indexmap::{IndexMap, IndexSet};

use crate::{Bindings, Error, FieldError, GlobList, Template};

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub templates: IndexMap<String, TemplateConfig>,
    #[serde(default)]
    pub globs: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    pub template: String,
    /// The fields the template is allowed to reference.
    pub fields: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml_edit::de::Error),
    #[error("template `{name}`: {error}")]
    Template {
        name: String,
        #[source]
        error: FieldError,
    },
    #[error("glob `{name}`: {error}")]
    Glob {
        name: String,
        #[source]
        error: Error,
    },
}

impl Config {
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        Ok(toml_edit::de::from_str(input)?)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        tracing::debug!("Loading config: {}", path.display());
        let input = std::fs::read_to_string(path)?;
        Self::parse(&input)
    }

    /// Validate every template against its field list and compile every glob.
    /// Stops at the first invalid entry.
    pub fn compile(&self) -> Result<CompiledConfig, ConfigError> {
        let mut templates = IndexMap::with_capacity(self.templates.len());
        for (name, config) in &self.templates {
            let template = Template::new(config.template.as_str());
            template
                .validate(&config.fields)
                .map_err(|error| ConfigError::Template {
                    name: name.clone(),
                    error,
                })?;
            templates.insert(
                name.clone(),
                CompiledTemplate {
                    template,
                    fields: config.fields.iter().cloned().collect(),
                },
            );
        }

        let mut globs = GlobList::new();
        for (name, pattern) in &self.globs {
            globs
                .insert(name.as_str(), pattern)
                .map_err(|error| ConfigError::Glob {
                    name: name.clone(),
                    error,
                })?;
        }

        tracing::debug!(
            "Compiled {} templates and {} globs",
            templates.len(),
            globs.len()
        );
        Ok(CompiledConfig { templates, globs })
    }
}

#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    pub template: Template,
    pub fields: IndexSet<String>,
}

/// A configuration where every template is known to be valid and every glob
/// is compiled.
#[derive(Debug, Clone, Default)]
pub struct CompiledConfig {
    templates: IndexMap<String, CompiledTemplate>,
    globs: GlobList,
}

impl CompiledConfig {
    #[inline]
    #[must_use]
    pub fn template(&self, name: &str) -> Option<&CompiledTemplate> {
        self.templates.get(name)
    }

    pub fn templates(&self) -> impl Iterator<Item = (&str, &CompiledTemplate)> {
        self.templates.iter().map(|(name, t)| (name.as_str(), t))
    }

    #[inline]
    #[must_use]
    pub fn globs(&self) -> &GlobList {
        &self.globs
    }

    /// Expand the template called `name`, or `None` if there is no such
    /// template.
    #[must_use]
    pub fn expand<B: Bindings + ?Sized>(&self, name: &str, bindings: &B) -> Option<String> {
        self.template(name).map(|t| t.template.expand(bindings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PatternError, bindings};

    static EXAMPLE: &str = r#"
[templates.greeting]
template = "Hello {name}, you are {age}"
fields = ["name", "age"]

[templates.path]
template = "{dir}/{name}.{ext}"
fields = ["dir", "name", "ext"]

[globs]
text = "*.txt"
logs = "{foo,bar}.log"
"#;

    #[test]
    fn parse_example() {
        let config = Config::parse(EXAMPLE).unwrap();
        assert_eq!(
            config.templates.keys().collect::<Vec<_>>(),
            ["greeting", "path"]
        );
        assert_eq!(config.templates["greeting"].fields, ["name", "age"]);
        assert_eq!(config.globs["logs"], "{foo,bar}.log");
    }

    #[test]
    fn empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        let compiled = config.compile().unwrap();
        assert!(compiled.globs().is_empty());
        assert_eq!(compiled.templates().count(), 0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            Config::parse("[other]\nx = 1"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            Config::parse("[templates.a]\ntemplate = \"{x}\"\nfields = []\nextra = 1"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn compile_and_expand() {
        let compiled = Config::parse(EXAMPLE).unwrap().compile().unwrap();
        let vars = bindings([("dir", "out"), ("name", "report"), ("ext", "pdf")]);
        assert_eq!(
            compiled.expand("path", &vars).as_deref(),
            Some("out/report.pdf")
        );
        assert_eq!(compiled.expand("missing", &vars), None);
        assert_eq!(
            compiled.globs().first_match("bar.log").map(|(name, _)| name),
            Some("logs")
        );
        assert!(compiled.template("greeting").unwrap().fields.contains("age"));
    }

    #[test]
    fn invalid_template_is_named() {
        let config = Config::parse(
            r#"
[templates.broken]
template = "Hello {who}"
fields = ["name"]
"#,
        )
        .unwrap();
        let err = config.compile().unwrap_err();
        assert_eq!(
            err.to_string(),
            "template `broken`: template references unknown field `who`"
        );
        assert!(matches!(
            err,
            ConfigError::Template {
                error: FieldError::UnknownField(_),
                ..
            }
        ));
    }

    #[test]
    fn invalid_glob_is_named() {
        let config = Config::parse("[globs]\nbad = \"src/{a,b\"").unwrap();
        let err = config.compile().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Glob {
                ref name,
                error: Error::Pattern(PatternError::UnclosedBrace { offset: 4 }),
            } if name == "bad"
        ));
    }
}
