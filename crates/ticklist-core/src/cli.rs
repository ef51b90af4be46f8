use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::{expand_command_abbrev, known_command_names};
use crate::config::Config;

#[derive(Debug, Clone)]
pub struct PreprocessedArgs {
    pub cleaned_args: Vec<OsString>,
    pub rc_overrides: Vec<(String, String)>,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "ticklist",
    version,
    about = "Ticklist: a small to-do list with due dates",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Config override, e.g. `--rc storage.key=work`.
    #[arg(long = "rc", value_name = "KEY=VALUE", value_parser = parse_rc_flag)]
    pub rc_overrides: Vec<(String, String)>,

    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    #[arg(long = "data")]
    pub data: Option<PathBuf>,

    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub rest: Vec<OsString>,
}

fn parse_rc_flag(s: &str) -> anyhow::Result<(String, String)> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("empty key in --rc {s}"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

/// `RUST_LOG` wins; otherwise `-q` quiets below the `warn` default and `-v`
/// raises it one level per flag.
pub fn default_log_level(verbose: u8, quiet: u8) -> &'static str {
    match (quiet, verbose) {
        (2.., _) => "error",
        (1, _) | (0, 0) => "warn",
        (0, 1) => "info",
        (0, 2) => "debug",
        (0, _) => "trace",
    }
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_log_level(verbose, quiet))
            .map_err(|e| anyhow!("invalid log filter: {e}"))?,
    };

    // Notices and tables own stdout.
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
    if installed.is_err() {
        debug!("tracing subscriber already installed");
    }

    Ok(())
}

/// Pulls positional `rc.KEY=VALUE` / `rc.KEY:VALUE` tokens out of argv,
/// leaving the binary name and everything else for clap.
#[tracing::instrument(skip_all)]
pub fn preprocess_args(raw: &[OsString]) -> PreprocessedArgs {
    let mut cleaned_args = Vec::with_capacity(raw.len());
    let mut rc_overrides = Vec::new();

    for (idx, arg) in raw.iter().enumerate() {
        let split = (idx > 0)
            .then(|| positional_override(&arg.to_string_lossy()))
            .flatten();
        match split {
            Some((key, value)) => {
                debug!(key = %key, value = %value, "captured positional rc override");
                rc_overrides.push((key, value));
            }
            None => cleaned_args.push(arg.clone()),
        }
    }

    PreprocessedArgs {
        cleaned_args,
        rc_overrides,
    }
}

fn positional_override(token: &str) -> Option<(String, String)> {
    let body = token.strip_prefix("rc.")?;
    let (key, value) = body.split_once('=').or_else(|| body.split_once(':'))?;
    Some((format!("rc.{key}"), value.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: String,
    pub args: Vec<String>,
}

impl Invocation {
    #[tracing::instrument(skip(cfg, rest))]
    pub fn parse(cfg: &Config, rest: Vec<OsString>) -> anyhow::Result<Self> {
        let mut tokens = rest
            .into_iter()
            .map(|arg| arg.to_string_lossy().to_string());

        let Some(first) = tokens.next() else {
            let cmd = cfg
                .get("default.command")
                .unwrap_or_else(|| "list".to_string());
            debug!(command = %cmd, "no explicit command, using default");
            return Ok(Self {
                command: cmd,
                args: vec![],
            });
        };

        let known = known_command_names();
        let command = expand_command_abbrev(&first, &known)
            .ok_or_else(|| anyhow!("unknown or ambiguous command: {first}"))?;
        debug!(token = %first, expanded = %command, "resolved command token");

        Ok(Self {
            command: command.to_string(),
            args: tokens.collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use clap::Parser;

    use super::{GlobalCli, default_log_level, preprocess_args};

    fn argv(items: &[&str]) -> Vec<OsString> {
        items.iter().map(OsString::from).collect()
    }

    #[test]
    fn log_level_follows_verbose_and_quiet_counts() {
        assert_eq!(default_log_level(0, 0), "warn");
        assert_eq!(default_log_level(1, 0), "info");
        assert_eq!(default_log_level(2, 0), "debug");
        assert_eq!(default_log_level(5, 0), "trace");
        assert_eq!(default_log_level(0, 1), "warn");
        assert_eq!(default_log_level(3, 2), "error");
    }

    #[test]
    fn positional_overrides_are_removed_from_argv() {
        let pre = preprocess_args(&argv(&[
            "ticklist",
            "rc.storage.key=work",
            "add",
            "rc.color:off",
            "rc.nothing",
            "Buy",
        ]));
        assert_eq!(
            pre.rc_overrides,
            vec![
                ("rc.storage.key".to_string(), "work".to_string()),
                ("rc.color".to_string(), "off".to_string()),
            ]
        );
        assert_eq!(
            pre.cleaned_args,
            argv(&["ticklist", "add", "rc.nothing", "Buy"])
        );
    }

    #[test]
    fn rc_flag_takes_key_value_pairs() {
        let cli = GlobalCli::try_parse_from(["ticklist", "--rc", " color = off ", "-vv", "list"])
            .expect("parse");
        assert_eq!(cli.rc_overrides, vec![("color".to_string(), "off".to_string())]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.rest, argv(&["list"]));

        assert!(GlobalCli::try_parse_from(["ticklist", "--rc", "color"]).is_err());
        assert!(GlobalCli::try_parse_from(["ticklist", "--rc", "=off"]).is_err());
    }
}
