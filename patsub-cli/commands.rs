use std::{io::BufRead as _, process::ExitCode};

use anyhow::{Context as _, Result};
use owo_colors::OwoColorize as _;
use patsub::{ConfigError, Error, Fragment, PatternError};

use crate::Command;

pub fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Glob { pattern, paths } => glob(&pattern, &paths),
        Command::Quote { text } => {
            anstream::println!("{}", patsub::quote_literal(&text));
            Ok(ExitCode::SUCCESS)
        }
        Command::Scan { regex, text } => scan(&regex, &text),
        Command::Validate { template, fields } => {
            patsub::validate(&template, &fields)?;
            anstream::println!("{}", "ok".green());
            Ok(ExitCode::SUCCESS)
        }
        Command::Expand {
            template,
            define,
            strict,
            fields,
        } => expand(&template, &define, strict, &fields),
        Command::Check { config } => check(&config),
    }
}

fn print_pattern_error(pattern: &str, err: &PatternError) {
    anstream::eprintln!("{}", err.with_source(pattern));
}

fn glob(pattern: &str, paths: &[String]) -> Result<ExitCode> {
    let glob = match patsub::compile_glob(pattern) {
        Ok(glob) => glob,
        Err(Error::Pattern(err)) => {
            print_pattern_error(pattern, &err);
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };

    if paths.is_empty() {
        anstream::println!("{}", glob.regex_str());
        return Ok(ExitCode::SUCCESS);
    }

    let mut any_match = false;
    let mut check = |path: &str| {
        if glob.is_match(path) {
            any_match = true;
            anstream::println!("{path}");
        } else {
            tracing::trace!("no match: {path}");
        }
    };

    for path in paths {
        if path == "-" {
            for line in std::io::stdin().lock().lines() {
                check(&line.context("reading paths from stdin")?);
            }
        } else {
            check(path);
        }
    }

    Ok(if any_match {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn scan(regex: &str, text: &str) -> Result<ExitCode> {
    let regex = regex::Regex::new(regex).with_context(|| format!("invalid regex `{regex}`"))?;
    for fragment in patsub::scan(&regex, text) {
        let span = fragment.span();
        match fragment {
            Fragment::Literal { text, .. } => {
                anstream::println!("literal {:?} {text:?}", span.dimmed());
            }
            Fragment::Matched { text, .. } => {
                anstream::println!("{}   {:?} {:?}", "match".green(), span, text.bold());
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn parse_define(define: &str) -> Result<(&str, &str)> {
    define
        .split_once('=')
        .with_context(|| format!("invalid binding `{define}`, expected `name=value`"))
}

fn expand(template: &str, define: &[String], strict: bool, fields: &[String]) -> Result<ExitCode> {
    let bindings = define
        .iter()
        .map(|d| parse_define(d))
        .collect::<Result<patsub::indexmap::IndexMap<_, _>>>()?;

    if strict {
        patsub::validate(template, fields)?;
    }

    anstream::println!("{}", patsub::expand(template, &bindings));
    Ok(ExitCode::SUCCESS)
}

fn check(path: &std::path::Path) -> Result<ExitCode> {
    let config = patsub::Config::load(path)
        .with_context(|| format!("loading configuration from {}", path.display()))?;

    let compiled = match config.compile() {
        Ok(compiled) => compiled,
        Err(ConfigError::Glob {
            name,
            error: Error::Pattern(err),
        }) => {
            anstream::eprintln!("{} in glob `{name}`:", "error".red().bold());
            print_pattern_error(&config.globs[&name], &err);
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    };

    for (name, template) in compiled.templates() {
        let fields = template.fields.iter().map(String::as_str).collect::<Vec<_>>();
        anstream::println!(
            "{} {}  [{}]",
            "template".cyan(),
            name.bold(),
            fields.join(", ")
        );
    }
    for (name, glob) in compiled.globs().iter() {
        anstream::println!(
            "{}     {}  {}",
            "glob".cyan(),
            name.bold(),
            glob.regex_str().dimmed()
        );
    }
    Ok(ExitCode::SUCCESS)
}
