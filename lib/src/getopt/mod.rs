//! # Command-Line Option Scanner
//!
//! File: lib/src/getopt/mod.rs
//!
//! ## Overview
//!
//! A `getopt_long`-style scanner. It handles short option clusters (`-abc`),
//! attached and separate arguments (`-ofile`, `-o file`), long options with
//! unique-prefix abbreviation (`--verb` for `--verbose`), `--name=value`, the
//! `--` terminator, `-W name` as an alias for `--name`, and long-only mode
//! (`-name`).
//!
//! ## Architecture
//!
//! - `spec`: option tables ([`HasArg`], [`LongOption`], [`Ordering`]) and
//!   optstring parsing.
//! - `error`: [`GetoptError`], one variant per diagnostic.
//! - this module: [`CommandLine`], the scanner itself.
//!
//! In [`Ordering::Permute`] mode (the default) non-options are skipped and
//! later rotated behind the options they preceded, so once scanning ends
//! [`CommandLine::remaining`] holds every operand in its original relative
//! order.
//!
//! ## Examples
//!
//! ```rust
//! use tokenforge::getopt::{CommandLine, HasArg, LongOption, Opt};
//!
//! let args = ["file.txt", "-v", "--output=out.txt", "-n3"];
//! let mut cmd = CommandLine::new("demo", args, "vn:")
//!     .long_options(vec![LongOption::new("output", HasArg::Required).with_value('o')]);
//!
//! let mut seen = Vec::new();
//! for opt in cmd.by_ref() {
//!     seen.push(opt.unwrap());
//! }
//! assert_eq!(seen[0], Opt::Short { option: 'v', argument: None });
//! assert_eq!(cmd.remaining(), ["file.txt"]);
//! ```
//!
mod error;
mod spec;

pub use error::GetoptError;
pub use spec::{parse_long_options, HasArg, LongOption, Ordering};

use spec::ShortOptions;
use tracing::{debug, trace};

/// One scanning result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opt {
    Short {
        option: char,
        argument: Option<String>,
    },
    Long {
        /// Position of the matched option in the long option table.
        index: usize,
        name: String,
        value: Option<char>,
        argument: Option<String>,
    },
    /// A non-option argument, only produced in [`Ordering::ReturnInOrder`] mode.
    Free(String),
}

/// `getopt_long` over an owned argument vector (without the program name).
#[derive(Debug, Clone)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
    shorts: ShortOptions,
    longs: Vec<LongOption>,
    long_only: bool,
    posix: bool,
    /// Next element to scan.
    index: usize,
    /// Unprocessed characters of the current short option cluster.
    cursor: String,
    first_nonopt: usize,
    last_nonopt: usize,
    finished: bool,
}

fn is_non_option(arg: &str) -> bool {
    !arg.starts_with('-') || arg == "-"
}

impl CommandLine {
    pub fn new<I, S>(program: impl Into<String>, args: I, optstring: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            shorts: ShortOptions::parse(optstring),
            longs: Vec::new(),
            long_only: false,
            posix: false,
            index: 0,
            cursor: String::new(),
            first_nonopt: 0,
            last_nonopt: 0,
            finished: false,
        }
    }

    pub fn long_options(mut self, longs: Vec<LongOption>) -> Self {
        self.longs = longs;
        self
    }

    /// Lets a single dash introduce long options (`-verbose`).
    pub fn long_only(mut self, long_only: bool) -> Self {
        self.long_only = long_only;
        self
    }

    /// POSIX mode: require-order unless the optstring says otherwise, and POSIX
    /// wording for invalid options.
    pub fn posix(mut self, posix: bool) -> Self {
        self.posix = posix;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn ordering(&self) -> Ordering {
        match self.shorts.ordering() {
            Some(ordering) => ordering,
            None if self.posix => Ordering::RequireOrder,
            None => Ordering::Permute,
        }
    }

    /// Index of the next element to scan; after scanning ends, the first operand.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The argument vector, permuted so far.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Elements from [`CommandLine::index`] on; the operands once scanning has ended.
    pub fn remaining(&self) -> &[String] {
        &self.args[self.index.min(self.args.len())..]
    }

    /// How the short option `option` takes its argument, `None` when it is not declared.
    ///
    /// A `W;` declaration only acts as the long option escape when long options
    /// are configured; otherwise `-W` is a plain flag.
    pub fn short_has_arg(&self, option: char) -> Option<HasArg> {
        if option == ':' {
            return None;
        }
        if option == 'W' && self.shorts.long_escape() && self.longs.is_empty() {
            return Some(HasArg::No);
        }
        self.shorts.get(option)
    }

    /// Scans the next option. `None` once the options are exhausted.
    pub fn next_option(&mut self) -> Option<Result<Opt, GetoptError>> {
        if self.finished {
            return None;
        }

        if self.cursor.is_empty() {
            if self.last_nonopt > self.index {
                self.last_nonopt = self.index;
            }
            if self.first_nonopt > self.index {
                self.first_nonopt = self.index;
            }

            if self.ordering() == Ordering::Permute {
                if self.first_nonopt != self.last_nonopt && self.last_nonopt != self.index {
                    self.exchange();
                } else if self.last_nonopt != self.index {
                    self.first_nonopt = self.index;
                }
                while self.index < self.args.len() && is_non_option(&self.args[self.index]) {
                    self.index += 1;
                }
                self.last_nonopt = self.index;
            }

            // `--` ends the options; everything after it is an operand.
            if self.index != self.args.len() && self.args[self.index] == "--" {
                self.index += 1;
                if self.first_nonopt != self.last_nonopt && self.last_nonopt != self.index {
                    self.exchange();
                } else if self.first_nonopt == self.last_nonopt {
                    self.first_nonopt = self.index;
                }
                self.last_nonopt = self.args.len();
                self.index = self.args.len();
            }

            if self.index == self.args.len() {
                if self.first_nonopt != self.last_nonopt {
                    self.index = self.first_nonopt;
                }
                debug!("Option scanning finished at index {}", self.index);
                self.finished = true;
                return None;
            }

            let arg = self.args[self.index].clone();
            if is_non_option(&arg) {
                if self.ordering() == Ordering::RequireOrder {
                    self.finished = true;
                    return None;
                }
                self.index += 1;
                return Some(Ok(Opt::Free(arg)));
            }

            if !self.longs.is_empty() {
                if let Some(rest) = arg.strip_prefix("--") {
                    self.cursor = rest.to_string();
                    return Some(
                        self.long_option("--")
                            .unwrap_or_else(|| Err(self.unrecognized("--"))),
                    );
                }
                if self.long_only {
                    let rest = &arg[1..];
                    let first = rest.chars().next();
                    let single_short = rest.chars().count() == 1
                        && first.and_then(|c| self.shorts.get(c)).is_some();
                    if !single_short {
                        self.cursor = rest.to_string();
                        if let Some(result) = self.long_option("-") {
                            return Some(result);
                        }
                        if first.and_then(|c| self.shorts.get(c)).is_none() {
                            return Some(Err(self.unrecognized("-")));
                        }
                    }
                }
            }
            self.cursor = arg[1..].to_string();
        }

        Some(self.short_option())
    }

    /// Handles the next character of the current short option cluster.
    fn short_option(&mut self) -> Result<Opt, GetoptError> {
        let mut chars = self.cursor.chars();
        let Some(option) = chars.next() else {
            // An option element always has a character after its dash.
            self.index += 1;
            return Err(self.invalid('-'));
        };
        self.cursor = chars.as_str().to_string();
        trace!("Scanning short option '{}'", option);

        let has_arg = self.short_has_arg(option);
        if self.cursor.is_empty() {
            self.index += 1;
        }
        let Some(has_arg) = has_arg else {
            return Err(self.invalid(option));
        };

        if option == 'W' && self.shorts.long_escape() && !self.longs.is_empty() {
            if self.cursor.is_empty() {
                if self.index == self.args.len() {
                    return Err(GetoptError::MissingArgument {
                        program: self.program.clone(),
                        option,
                    });
                }
                self.cursor = self.args[self.index].clone();
            }
            return match self.long_option("-W ") {
                Some(result) => result,
                None => {
                    let err = self.unrecognized("-W ");
                    self.index += 1;
                    Err(err)
                }
            };
        }

        let argument = match has_arg {
            HasArg::No => None,
            HasArg::Optional if self.cursor.is_empty() => None,
            HasArg::Optional | HasArg::Required if !self.cursor.is_empty() => {
                self.index += 1;
                Some(std::mem::take(&mut self.cursor))
            }
            _ => {
                if self.index == self.args.len() {
                    return Err(GetoptError::MissingArgument {
                        program: self.program.clone(),
                        option,
                    });
                }
                self.index += 1;
                Some(self.args[self.index - 1].clone())
            }
        };
        Ok(Opt::Short { option, argument })
    }

    /// Matches the cursor (`name` or `name=value`) against the long option table.
    ///
    /// Returns `None`, leaving all state untouched, when no option matches.
    fn long_option(&mut self, prefix: &str) -> Option<Result<Opt, GetoptError>> {
        let (name, inline) = match self.cursor.split_once('=') {
            Some((name, value)) => (name.to_string(), Some(value.to_string())),
            None => (self.cursor.clone(), None),
        };

        let mut found = None;
        let mut ambiguous = false;
        for (i, option) in self.longs.iter().enumerate() {
            if option.name == name {
                found = Some(i);
                ambiguous = false;
                break;
            }
            if option.name.starts_with(&name) {
                if found.is_none() {
                    found = Some(i);
                } else {
                    ambiguous = true;
                }
            }
        }

        if ambiguous {
            self.cursor.clear();
            self.index += 1;
            return Some(Err(GetoptError::AmbiguousOption {
                program: self.program.clone(),
                option: format!("{prefix}{name}"),
            }));
        }

        let index = found?;
        let option = self.longs[index].clone();
        trace!("Matched long option '{}' for '{}'", option.name, name);
        self.cursor.clear();
        self.index += 1;

        let argument = match (option.has_arg, inline) {
            (HasArg::No, Some(_)) => {
                return Some(Err(GetoptError::UnexpectedArgument {
                    program: self.program.clone(),
                    option: format!("{prefix}{}", option.name),
                }))
            }
            (_, Some(value)) => Some(value),
            (HasArg::Required, None) => {
                if self.index >= self.args.len() {
                    return Some(Err(GetoptError::MissingLongArgument {
                        program: self.program.clone(),
                        option: format!("{prefix}{}", option.name),
                    }));
                }
                self.index += 1;
                Some(self.args[self.index - 1].clone())
            }
            (_, None) => None,
        };

        Some(Ok(Opt::Long {
            index,
            name: option.name,
            value: option.value,
            argument,
        }))
    }

    /// Moves the skipped non-options `[first_nonopt, last_nonopt)` behind the
    /// options `[last_nonopt, index)` scanned since.
    fn exchange(&mut self) {
        let (bottom, middle, top) = (self.first_nonopt, self.last_nonopt, self.index);
        self.args[bottom..top].rotate_left(middle - bottom);
        self.first_nonopt += top - middle;
        self.last_nonopt = top;
    }

    fn unrecognized(&mut self, prefix: &str) -> GetoptError {
        let option = format!("{prefix}{}", std::mem::take(&mut self.cursor));
        if !prefix.starts_with("-W") {
            self.index += 1;
        }
        GetoptError::UnrecognizedOption {
            program: self.program.clone(),
            option,
        }
    }

    fn invalid(&self, option: char) -> GetoptError {
        let program = self.program.clone();
        if self.posix {
            GetoptError::IllegalOption { program, option }
        } else {
            GetoptError::InvalidOption { program, option }
        }
    }
}

impl Iterator for CommandLine {
    type Item = Result<Opt, GetoptError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_option()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(cmd: &mut CommandLine) -> Vec<Result<Opt, GetoptError>> {
        cmd.by_ref().collect()
    }

    fn short(option: char, argument: Option<&str>) -> Result<Opt, GetoptError> {
        Ok(Opt::Short {
            option,
            argument: argument.map(str::to_string),
        })
    }

    #[test]
    fn test_short_cluster_and_arguments() {
        let mut cmd = CommandLine::new("prog", ["-ab", "-cvalue", "-c", "next"], "abc:");
        assert_eq!(
            scan(&mut cmd),
            vec![
                short('a', None),
                short('b', None),
                short('c', Some("value")),
                short('c', Some("next")),
            ]
        );
        assert!(cmd.remaining().is_empty());
    }

    #[test]
    fn test_optional_argument_must_be_attached() {
        let mut cmd = CommandLine::new("prog", ["-o", "file", "-oinline"], "o::");
        assert_eq!(
            scan(&mut cmd),
            vec![short('o', None), short('o', Some("inline"))]
        );
        assert_eq!(cmd.remaining(), ["file"]);
    }

    #[test]
    fn test_cluster_ending_in_required_argument() {
        let mut cmd = CommandLine::new("prog", ["-abfile"], "abf:");
        assert_eq!(
            scan(&mut cmd),
            vec![short('a', None), short('b', None), short('f', Some("ile"))]
        );
    }

    #[test]
    fn test_permutes_non_options_to_the_end() {
        let mut cmd = CommandLine::new("prog", ["one", "-a", "two", "-b", "x", "three"], "ab:");
        assert_eq!(scan(&mut cmd), vec![short('a', None), short('b', Some("x"))]);
        assert_eq!(cmd.remaining(), ["one", "two", "three"]);
        assert_eq!(cmd.args(), ["-a", "-b", "x", "one", "two", "three"]);
        assert_eq!(cmd.index(), 3);
    }

    #[test]
    fn test_double_dash_ends_options() {
        let mut cmd = CommandLine::new("prog", ["a", "-x", "b", "--", "-y", "c"], "xy");
        assert_eq!(scan(&mut cmd), vec![short('x', None)]);
        assert_eq!(cmd.remaining(), ["a", "b", "-y", "c"]);
        assert_eq!(cmd.args()[..2], ["-x", "--"]);
    }

    #[test]
    fn test_require_order_stops_at_first_operand() {
        let mut cmd = CommandLine::new("prog", ["-a", "file", "-b"], "+ab");
        assert_eq!(cmd.ordering(), Ordering::RequireOrder);
        assert_eq!(scan(&mut cmd), vec![short('a', None)]);
        assert_eq!(cmd.remaining(), ["file", "-b"]);
    }

    #[test]
    fn test_posix_mode_defaults_to_require_order() {
        let mut cmd = CommandLine::new("prog", ["file", "-a"], "a").posix(true);
        assert_eq!(cmd.ordering(), Ordering::RequireOrder);
        assert!(scan(&mut cmd).is_empty());
        assert_eq!(cmd.remaining(), ["file", "-a"]);
    }

    #[test]
    fn test_return_in_order_yields_free_arguments() {
        let mut cmd = CommandLine::new("prog", ["x", "-a", "y"], "-a");
        assert_eq!(
            scan(&mut cmd),
            vec![
                Ok(Opt::Free("x".to_string())),
                short('a', None),
                Ok(Opt::Free("y".to_string())),
            ]
        );
    }

    #[test]
    fn test_single_dash_is_an_operand() {
        let mut cmd = CommandLine::new("prog", ["-", "-a"], "a");
        assert_eq!(scan(&mut cmd), vec![short('a', None)]);
        assert_eq!(cmd.remaining(), ["-"]);
    }

    #[test]
    fn test_invalid_and_missing_arguments() {
        let mut cmd = CommandLine::new("prog", ["-z", "-:", "-b"], "b:");
        assert_eq!(
            scan(&mut cmd),
            vec![
                Err(GetoptError::InvalidOption {
                    program: "prog".into(),
                    option: 'z'
                }),
                Err(GetoptError::InvalidOption {
                    program: "prog".into(),
                    option: ':'
                }),
                Err(GetoptError::MissingArgument {
                    program: "prog".into(),
                    option: 'b'
                }),
            ]
        );
    }

    #[test]
    fn test_posix_wording_for_invalid_option() {
        let mut cmd = CommandLine::new("prog", ["-q"], "a").posix(true);
        assert_eq!(
            cmd.next(),
            Some(Err(GetoptError::IllegalOption {
                program: "prog".into(),
                option: 'q'
            }))
        );
    }

    #[test]
    fn test_scanning_continues_after_error() {
        let mut cmd = CommandLine::new("prog", ["-qa", "rest"], "a");
        let results = scan(&mut cmd);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert_eq!(results[1], short('a', None));
        assert_eq!(cmd.remaining(), ["rest"]);
    }

    fn long_table() -> Vec<LongOption> {
        vec![
            LongOption::new("verbose", HasArg::No).with_value('v'),
            LongOption::new("version", HasArg::No),
            LongOption::new("output", HasArg::Required).with_value('o'),
            LongOption::new("color", HasArg::Optional),
        ]
    }

    fn long(index: usize, argument: Option<&str>) -> Result<Opt, GetoptError> {
        let table = long_table();
        Ok(Opt::Long {
            index,
            name: table[index].name.clone(),
            value: table[index].value,
            argument: argument.map(str::to_string),
        })
    }

    #[test]
    fn test_long_options_exact_prefix_and_arguments() {
        let mut cmd = CommandLine::new(
            "prog",
            ["--verbose", "--out", "a.txt", "--output=b.txt", "--col", "--color=always"],
            "",
        )
        .long_options(long_table());
        assert_eq!(
            scan(&mut cmd),
            vec![
                long(0, None),
                long(2, Some("a.txt")),
                long(2, Some("b.txt")),
                long(3, None),
                long(3, Some("always")),
            ]
        );
    }

    #[test]
    fn test_long_option_empty_inline_argument() {
        let mut cmd = CommandLine::new("prog", ["--output="], "").long_options(long_table());
        assert_eq!(scan(&mut cmd), vec![long(2, Some(""))]);
    }

    #[test]
    fn test_long_option_errors() {
        let mut cmd = CommandLine::new(
            "prog",
            ["--ver", "--verbose=yes", "--nope", "--output"],
            "",
        )
        .long_options(long_table());
        assert_eq!(
            scan(&mut cmd),
            vec![
                Err(GetoptError::AmbiguousOption {
                    program: "prog".into(),
                    option: "--ver".into()
                }),
                Err(GetoptError::UnexpectedArgument {
                    program: "prog".into(),
                    option: "--verbose".into()
                }),
                Err(GetoptError::UnrecognizedOption {
                    program: "prog".into(),
                    option: "--nope".into()
                }),
                Err(GetoptError::MissingLongArgument {
                    program: "prog".into(),
                    option: "--output".into()
                }),
            ]
        );
    }

    #[test]
    fn test_exact_match_beats_ambiguity() {
        let table = vec![
            LongOption::new("list-all", HasArg::No),
            LongOption::new("list", HasArg::No),
        ];
        let mut cmd = CommandLine::new("prog", ["--list"], "").long_options(table);
        assert_eq!(
            cmd.next(),
            Some(Ok(Opt::Long {
                index: 1,
                name: "list".into(),
                value: None,
                argument: None
            }))
        );
    }

    #[test]
    fn test_double_dash_without_long_table_is_invalid() {
        let mut cmd = CommandLine::new("prog", ["--a"], "a");
        assert_eq!(
            scan(&mut cmd),
            vec![
                Err(GetoptError::InvalidOption {
                    program: "prog".into(),
                    option: '-'
                }),
                short('a', None),
            ]
        );
    }

    #[test]
    fn test_long_only_mode() {
        let mut cmd = CommandLine::new("prog", ["-verbose", "-o", "x", "-vo", "y"], "vo:")
            .long_options(long_table())
            .long_only(true);
        assert_eq!(
            scan(&mut cmd),
            vec![
                long(0, None),
                short('o', Some("x")),
                short('v', None),
                short('o', Some("y")),
            ]
        );
    }

    #[test]
    fn test_long_only_unknown_word_is_unrecognized() {
        let mut cmd = CommandLine::new("prog", ["-zzz"], "a")
            .long_options(long_table())
            .long_only(true);
        assert_eq!(
            scan(&mut cmd),
            vec![Err(GetoptError::UnrecognizedOption {
                program: "prog".into(),
                option: "-zzz".into()
            })]
        );
    }

    #[test]
    fn test_w_escape_selects_long_option() {
        let mut cmd = CommandLine::new("prog", ["-W", "output=z", "-Wverbose", "-W", "bogus"], "W;")
            .long_options(long_table());
        let results = scan(&mut cmd);
        assert_eq!(results[0], long(2, Some("z")));
        assert_eq!(results[1], long(0, None));
        assert_eq!(
            results[2],
            Err(GetoptError::UnrecognizedOption {
                program: "prog".into(),
                option: "-W bogus".into()
            })
        );
        assert!(cmd.remaining().is_empty());
    }

    #[test]
    fn test_w_escape_without_long_table_is_a_flag() {
        let mut cmd = CommandLine::new("prog", ["-W", "foo"], "W;");
        assert_eq!(cmd.short_has_arg('W'), Some(HasArg::No));
        assert_eq!(scan(&mut cmd), vec![short('W', None)]);
        assert_eq!(cmd.remaining(), ["foo"]);

        let cmd = CommandLine::new("prog", ["-W", "foo"], "W;").long_options(long_table());
        assert_eq!(cmd.short_has_arg('W'), Some(HasArg::Required));
        assert_eq!(cmd.short_has_arg(':'), None);
    }
}
