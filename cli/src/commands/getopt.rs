//! # TokenForge Getopt Command
//!
//! File: cli/src/commands/getopt.rs
//!
//! ## Overview
//!
//! Implements `tokenforge getopt`, a drop-in for the parsing half of
//! util-linux `getopt(1)`. Shell scripts hand it their option description and
//! their own arguments; it prints a normalised, shell-quoted command line that
//! the script can `eval set --`.
//!
//! ## Architecture
//!
//! Output is one line: every recognised option (arguments as separate quoted
//! words), then ` --`, then the remaining parameters. Options that take an
//! optional argument print `''` when it was not given. Diagnostics go to
//! stderr and make the command exit with status 1, but the normalised line is
//! still printed, as `getopt(1)` does.
//!
//! When `-o` is not given, the first parameter is taken as the short option
//! string.
//!
//! ## Examples
//!
//! ```bash
//! args=$(tokenforge getopt -o ab:c:: -l alpha,beta:,gamma:: -n myscript -- "$@") || exit 1
//! eval set -- "$args"
//!
//! $ tokenforge getopt -o ab: -- file -a -b 'x y'
//!  -a -b 'x y' -- 'file'
//! ```
//!
use crate::core::error::{ForgeError, Result};
use anyhow::anyhow;
use clap::Parser;
use tokenforge::getopt::{parse_long_options, CommandLine, GetoptError, HasArg, LongOption, Opt};
use tracing::{debug, info};

/// Arguments for `tokenforge getopt`.
#[derive(Parser, Debug)]
pub struct GetoptArgs {
    /// Short options to recognise, e.g. `ab:c::`.
    #[arg(long = "options", short = 'o', allow_hyphen_values = true)]
    options: Option<String>,

    /// Long options to recognise, comma separated, e.g. `alpha,beta:,gamma::`.
    /// Can be specified multiple times.
    #[arg(long = "longoptions", short = 'l', action = clap::ArgAction::Append)]
    longoptions: Vec<String>,

    /// Program name used in diagnostics.
    #[arg(long = "name", short = 'n', default_value = "getopt")]
    name: String,

    /// Allow long options to start with a single `-`.
    #[arg(long = "alternative", short = 'a')]
    alternative: bool,

    /// Stop at the first non-option and use POSIX diagnostics.
    #[arg(long)]
    posix: bool,

    /// Do not print diagnostics for unrecognised options.
    #[arg(long = "quiet", short = 'q')]
    quiet: bool,

    /// Do not quote the output.
    #[arg(long = "unquoted", short = 'u')]
    unquoted: bool,

    /// The arguments to parse, given after `--`.
    #[arg(last = true, allow_hyphen_values = true)]
    parameters: Vec<String>,
}

/// Quotes `arg` for a POSIX shell: `it's` becomes `'it'\''s'`.
fn shell_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// The result of normalising one command line.
#[derive(Debug, Default, PartialEq, Eq)]
struct Normalized {
    words: Vec<String>,
    errors: Vec<GetoptError>,
}

impl Normalized {
    fn render(&self) -> String {
        let mut line = String::new();
        for word in &self.words {
            line.push(' ');
            line.push_str(word);
        }
        line
    }
}

/// Scans `cmd` to the end and builds the normalised words.
fn normalize(mut cmd: CommandLine, longs: &[LongOption], quote: bool) -> Normalized {
    let word = |arg: &str| {
        if quote {
            shell_quote(arg)
        } else {
            arg.to_string()
        }
    };

    let mut out = Normalized::default();
    while let Some(result) = cmd.next_option() {
        match result {
            Ok(Opt::Short { option, argument }) => {
                out.words.push(format!("-{option}"));
                if cmd.short_has_arg(option).is_some_and(|has_arg| has_arg != HasArg::No) {
                    out.words.push(word(argument.as_deref().unwrap_or("")));
                }
            }
            Ok(Opt::Long {
                index,
                name,
                argument,
                ..
            }) => {
                out.words.push(format!("--{name}"));
                if longs[index].has_arg != HasArg::No {
                    out.words.push(word(argument.as_deref().unwrap_or("")));
                }
            }
            Ok(Opt::Free(arg)) => out.words.push(word(arg.as_str())),
            Err(err) => {
                debug!("Option error: {}", err);
                out.errors.push(err);
            }
        }
    }

    out.words.push("--".to_string());
    out.words
        .extend(cmd.remaining().iter().map(|arg| word(arg.as_str())));
    out
}

/// Handles `tokenforge getopt`. Returns the number of option errors found.
pub fn handle_getopt(args: GetoptArgs) -> Result<usize> {
    info!("Handling getopt command...");
    let mut parameters = args.parameters;
    let shorts = match args.options {
        Some(options) => options,
        None if !parameters.is_empty() => parameters.remove(0),
        None => {
            return Err(anyhow!(ForgeError::ArgumentParsing(
                "missing optstring argument".to_string()
            )))
        }
    };

    let mut longs = Vec::new();
    for spec in &args.longoptions {
        longs.extend(parse_long_options(spec)?);
    }
    debug!(
        "Normalising {} parameter(s) with optstring '{}' and {} long option(s)",
        parameters.len(),
        shorts,
        longs.len()
    );

    let cmd = CommandLine::new(args.name, parameters, &shorts)
        .long_options(longs.clone())
        .long_only(args.alternative)
        .posix(args.posix);
    let normalized = normalize(cmd, &longs, !args.unquoted);

    if !args.quiet {
        for err in &normalized.errors {
            eprintln!("{err}");
        }
    }
    println!("{}", normalized.render());
    Ok(normalized.errors.len())
}
