//! Command-line flags.
//!
//! Long flags are also accepted with a single dash (`-config`, `-port`,
//! `-version`), the spelling used by deployment manifests.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

/// agnx agent runtime server.
#[derive(Debug, Parser)]
#[command(name = "agnx", disable_version_flag = true)]
pub struct Cli {
    /// Path to a YAML config file. Defaults apply when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Port to listen on, overriding the config file.
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// Print build metadata and exit.
    #[arg(short = 'V', long)]
    pub version: bool,
}

/// Long flags that may be spelled with a single dash.
const LONG_FLAGS: [&str; 4] = ["config", "port", "version", "help"];

/// Rewrite single-dash long flags (`-port 9000`, `-config=a.yaml`) to their
/// `--` form so clap does not read them as clustered short flags.
///
/// The first argument is the program name and everything after a bare
/// `--` is left alone.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    let mut positional = false;
    args.into_iter()
        .map(Into::<OsString>::into)
        .enumerate()
        .map(|(index, arg)| {
            if index == 0 || positional {
                return arg;
            }
            if arg == "--" {
                positional = true;
                return arg;
            }
            match arg.to_str().and_then(single_dash_long_flag) {
                Some(rewritten) => OsString::from(rewritten),
                None => arg,
            }
        })
        .collect()
}

fn single_dash_long_flag(arg: &str) -> Option<String> {
    let rest = arg.strip_prefix('-')?;
    if rest.starts_with('-') {
        return None;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    LONG_FLAGS.contains(&name).then(|| format!("-{arg}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(normalize_args(args.iter().copied()))
    }

    #[test]
    fn no_flags_means_defaults() {
        let cli = Cli::try_parse_from(["agnx"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.port.is_none());
        assert!(!cli.version);
    }

    #[test]
    fn parses_every_flag() {
        let cli =
            Cli::try_parse_from(["agnx", "--config", "agnx.yaml", "--port", "9000", "--version"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("agnx.yaml")));
        assert_eq!(cli.port, Some(9000));
        assert!(cli.version);
    }

    #[test]
    fn short_flags() {
        let cli = Cli::try_parse_from(["agnx", "-c", "a.yaml", "-p", "7000", "-V"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("a.yaml")));
        assert_eq!(cli.port, Some(7000));
        assert!(cli.version);
    }

    #[test]
    fn port_zero_is_rejected() {
        assert!(Cli::try_parse_from(["agnx", "--port", "0"]).is_err());
    }

    #[test]
    fn port_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["agnx", "--port", "70000"]).is_err());
    }

    #[test]
    fn single_dash_long_flags() {
        let cli = parse(&["agnx", "-config", "a.yaml", "-port", "9000", "-version"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("a.yaml")));
        assert_eq!(cli.port, Some(9000));
        assert!(cli.version);
    }

    #[test]
    fn single_dash_long_flags_with_equals() {
        let cli = parse(&["agnx", "-config=b.yaml", "-port=7000"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("b.yaml")));
        assert_eq!(cli.port, Some(7000));
    }

    #[test]
    fn short_and_double_dash_flags_are_untouched() {
        let args = normalize_args(["agnx", "-c", "x.yaml", "--port", "80", "-V"]);
        assert_eq!(args, ["agnx", "-c", "x.yaml", "--port", "80", "-V"]);
    }

    #[test]
    fn program_name_and_trailing_args_are_untouched() {
        let args = normalize_args(["-port", "--", "-version"]);
        assert_eq!(args, ["-port", "--", "-version"]);
    }

    #[test]
    fn unknown_single_dash_words_stay_errors() {
        assert!(parse(&["agnx", "-verbose"]).is_err());
    }
}
