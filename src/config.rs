use std::path::PathBuf;

use clap::{arg, value_parser, ArgAction, ArgMatches, Command};

pub const STORE_ENV: &str = "JURL_STORE";
pub const OUTPUT_DIR_ENV: &str = "JURL_OUTPUT_DIR";
pub const DEFAULT_STORE: &str = "saved-requests.json";
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Runtime settings. Command line values win over the environment, which
/// wins over the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_path: PathBuf,
    pub output_dir: PathBuf,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store_path: PathBuf::from(DEFAULT_STORE),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            verbose: false,
        }
    }
}

/// The jurl command line. Global options come first, everything from the
/// first unknown token on is handed to the command parser untouched.
pub fn cli() -> Command {
    Command::new("jurl")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .disable_help_flag(true)
        .arg(
            arg!(--store <PATH>)
                .help("saved requests file")
                .env(STORE_ENV)
                .default_value(DEFAULT_STORE)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(--"output-dir" <DIR>)
                .help("directory for response files written with -O")
                .env(OUTPUT_DIR_ENV)
                .default_value(DEFAULT_OUTPUT_DIR)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            arg!(-v - -verbose)
                .help("debug logging on stderr")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!(-h - -help)
                .help("print the jurl usage")
                .action(ArgAction::SetTrue),
        )
        .arg(
            arg!([ARGS] "url with request options, or create / list / fire")
                .num_args(1..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .value_parser(value_parser!(String)),
        )
}

impl Config {
    pub fn from_matches(matches: &ArgMatches) -> Config {
        let defaults = Config::default();
        Config {
            store_path: matches
                .get_one::<PathBuf>("store")
                .cloned()
                .unwrap_or(defaults.store_path),
            output_dir: matches
                .get_one::<PathBuf>("output-dir")
                .cloned()
                .unwrap_or(defaults.output_dir),
            verbose: matches.get_flag("verbose"),
        }
    }
}

/// Raw command tokens; no tokens or `-h` anywhere before them means help.
pub fn command_args(matches: &ArgMatches) -> Vec<String> {
    let args: Vec<String> = matches
        .get_many::<String>("ARGS")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    if args.is_empty() || matches.get_flag("help") {
        vec!["-h".to_string()]
    } else {
        args
    }
}
