// This file is part of tidesh, a POSIX-style command shell.
// Copyright (C) 2026 The tidesh contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Command-line argument parser for the `tidesh` binary.
//!
//! Hand-rolled rather than built on a parsing crate: there is no `clap`
//! in this workspace's dependency table, so none is introduced here just
//! for this one binary.

use thiserror::Error;

/// What the input source for the main read-eval loop should be.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Source {
    /// Interactive prompt (or `--keep-alive` after a script/`-c` ran).
    Stdin,
    /// A script file path, or `-` meaning "read the script from stdin"
    /// (distinct from `Source::Stdin`, which is interactive).
    File(String),
    /// `--eval <cmd>` / `-c <cmd>`.
    Command(String),
}

/// Whether terminal colour support should be forced on/off, or left to
/// whatever the (out-of-scope) line editor would otherwise detect.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ColorMode {
    Auto,
    Enabled,
    Disabled,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Flags {
    pub source: Source,
    pub keep_alive: bool,
    pub cd: Option<String>,
    pub rc: Option<String>,
    pub history: Option<String>,
    pub disable_history: bool,
    pub color: ColorMode,
}

impl Default for Flags {
    fn default() -> Self {
        Flags {
            source: Source::Stdin,
            keep_alive: false,
            cd: None,
            rc: None,
            history: None,
            disable_history: false,
            color: ColorMode::Auto,
        }
    }
}

/// Outcome of parsing `argv`.
#[derive(Clone, Debug, PartialEq)]
pub enum Parse {
    Run(Flags),
    Help,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Error {
    #[error("option `{0}` requires an argument")]
    MissingArgument(String),
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("unexpected operand `{0}`")]
    UnexpectedOperand(String),
    #[error("cannot specify both `--eval`/`-c` and a script operand")]
    ConflictingSources,
}

/// Parses `argv` (not including `argv[0]`, the program name).
pub fn parse(argv: &[String]) -> Result<Parse, Error> {
    let mut flags = Flags::default();
    let mut have_explicit_source = false;
    let mut args = argv.iter().peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" => return Ok(Parse::Help),
            "--eval" | "-c" => {
                if have_explicit_source {
                    return Err(Error::ConflictingSources);
                }
                let value = args.next().ok_or_else(|| Error::MissingArgument(arg.clone()))?;
                flags.source = Source::Command(value.clone());
                have_explicit_source = true;
            }
            "--keep-alive" => flags.keep_alive = true,
            "--cd" => {
                let value = args.next().ok_or_else(|| Error::MissingArgument(arg.clone()))?;
                flags.cd = Some(value.clone());
            }
            "--rc" => {
                let value = args.next().ok_or_else(|| Error::MissingArgument(arg.clone()))?;
                flags.rc = Some(value.clone());
            }
            "--history" => {
                let value = args.next().ok_or_else(|| Error::MissingArgument(arg.clone()))?;
                flags.history = Some(value.clone());
            }
            "--disable-history" => flags.disable_history = true,
            "--enable-colors" => flags.color = ColorMode::Enabled,
            "--disable-colors" => flags.color = ColorMode::Disabled,
            "--" => {
                if let Some(path) = args.next() {
                    if have_explicit_source {
                        return Err(Error::ConflictingSources);
                    }
                    flags.source = Source::File(path.clone());
                    have_explicit_source = true;
                }
                if let Some(extra) = args.next() {
                    return Err(Error::UnexpectedOperand(extra.clone()));
                }
            }
            _ if arg.starts_with('-') && arg != "-" => {
                return Err(Error::UnknownOption(arg.clone()));
            }
            operand => {
                if have_explicit_source {
                    return Err(Error::ConflictingSources);
                }
                flags.source = Source::File(operand.to_owned());
                have_explicit_source = true;
                if let Some(extra) = args.next() {
                    return Err(Error::UnexpectedOperand(extra.clone()));
                }
            }
        }
    }

    Ok(Parse::Run(flags))
}

pub const USAGE: &str = "\
Usage: tidesh [OPTIONS] [SCRIPT | -]

  --eval <cmd>, -c <cmd>   execute <cmd> then exit (unless --keep-alive)
  --keep-alive             after --eval/script, drop to the interactive loop
  --cd <dir>               chdir to <dir> before sourcing the rc file
  --rc <file>              alternative rc file (default ~/.tideshrc)
  --history <file>         alternative history file (default ~/.tidesh-history)
  --disable-history        suppress history entirely
  --enable-colors          force terminal colour support on
  --disable-colors         force terminal colour support off
  --help                   print this message and exit

With no SCRIPT operand and no --eval, tidesh reads commands interactively.
A SCRIPT of `-` reads the script from standard input.
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_is_interactive_stdin() {
        let flags = match parse(&[]).unwrap() {
            Parse::Run(f) => f,
            Parse::Help => panic!("expected Run"),
        };
        assert_eq!(flags.source, Source::Stdin);
        assert!(!flags.keep_alive);
    }

    #[test]
    fn help_flag_short_circuits() {
        assert_eq!(parse(&["--help".to_owned()]).unwrap(), Parse::Help);
    }

    #[test]
    fn eval_flag_sets_command_source() {
        let argv = vec!["--eval".to_owned(), "echo hi".to_owned()];
        let flags = match parse(&argv).unwrap() {
            Parse::Run(f) => f,
            Parse::Help => panic!("expected Run"),
        };
        assert_eq!(flags.source, Source::Command("echo hi".to_owned()));
    }

    #[test]
    fn short_c_flag_is_equivalent_to_eval() {
        let argv = vec!["-c".to_owned(), "exit 3".to_owned()];
        let flags = match parse(&argv).unwrap() {
            Parse::Run(f) => f,
            Parse::Help => panic!("expected Run"),
        };
        assert_eq!(flags.source, Source::Command("exit 3".to_owned()));
    }

    #[test]
    fn positional_operand_is_a_script_path() {
        let argv = vec!["./myscript.sh".to_owned()];
        let flags = match parse(&argv).unwrap() {
            Parse::Run(f) => f,
            Parse::Help => panic!("expected Run"),
        };
        assert_eq!(flags.source, Source::File("./myscript.sh".to_owned()));
    }

    #[test]
    fn dash_operand_means_stdin_script() {
        let argv = vec!["-".to_owned()];
        let flags = match parse(&argv).unwrap() {
            Parse::Run(f) => f,
            Parse::Help => panic!("expected Run"),
        };
        assert_eq!(flags.source, Source::File("-".to_owned()));
    }

    #[test]
    fn eval_and_script_conflict() {
        let argv = vec!["--eval".to_owned(), "echo hi".to_owned(), "script.sh".to_owned()];
        assert_eq!(parse(&argv), Err(Error::ConflictingSources));
    }

    #[test]
    fn unknown_option_is_an_error() {
        assert_eq!(parse(&["--bogus".to_owned()]), Err(Error::UnknownOption("--bogus".to_owned())));
    }

    #[test]
    fn missing_argument_is_an_error() {
        assert_eq!(parse(&["--cd".to_owned()]), Err(Error::MissingArgument("--cd".to_owned())));
    }

    #[test]
    fn cd_rc_history_flags_are_captured() {
        let argv = vec![
            "--cd".to_owned(),
            "/tmp".to_owned(),
            "--rc".to_owned(),
            "/etc/tideshrc".to_owned(),
            "--history".to_owned(),
            "/tmp/hist".to_owned(),
            "--disable-history".to_owned(),
        ];
        let flags = match parse(&argv).unwrap() {
            Parse::Run(f) => f,
            Parse::Help => panic!("expected Run"),
        };
        assert_eq!(flags.cd.as_deref(), Some("/tmp"));
        assert_eq!(flags.rc.as_deref(), Some("/etc/tideshrc"));
        assert_eq!(flags.history.as_deref(), Some("/tmp/hist"));
        assert!(flags.disable_history);
    }

    #[test]
    fn color_flags_set_mode() {
        let flags = match parse(&["--disable-colors".to_owned()]).unwrap() {
            Parse::Run(f) => f,
            Parse::Help => panic!("expected Run"),
        };
        assert_eq!(flags.color, ColorMode::Disabled);
    }
}
