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

//! `tidesh`'s binary entry point: argument parsing, rc/script sourcing,
//! and handing off to the interactive loop.
//!
//! Splits a hand-rolled argument parser ([`args`]) from the read-eval
//! loop proper ([`repl`]); `main` calls straight down into
//! `tidesh_semantics::exec`, a single-threaded, directly-blocking model
//! with no async executor threaded through it.

mod args;
mod repl;

use std::path::PathBuf;
use std::process::ExitCode;
use tidesh_env::Env;
use tidesh_syntax::source::Source;

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let flags = match args::parse(&argv) {
        Ok(args::Parse::Help) => {
            print!("{}", args::USAGE);
            return ExitCode::SUCCESS;
        }
        Ok(args::Parse::Run(flags)) => flags,
        Err(e) => {
            eprintln!("tidesh: {e}");
            eprintln!("{}", args::USAGE);
            return ExitCode::from(2);
        }
    };

    let status = run(flags);
    let byte = (status & 0xff) as u8;
    ExitCode::from(byte)
}

fn run(flags: args::Flags) -> i32 {
    let mut env = Env::new();
    tidesh_builtin::register_all(&mut env);

    apply_color_mode(&mut env, flags.color);

    #[cfg(unix)]
    if tidesh_env::signals::install_handlers().is_err() {
        eprintln!("tidesh: warning: failed to install signal handlers");
    }

    if let Some(dir) = &flags.cd {
        if let Err(e) = std::env::set_current_dir(dir) {
            eprintln!("tidesh: --cd: {dir}: {e}");
            return 1;
        }
        env.set_cwd(PathBuf::from(dir));
    }

    configure_history(&mut env, &flags);

    source_rc_file(&mut env, flags.rc.as_deref());

    tidesh_semantics::hooks::run(&mut env, "start", &[]);

    let status = match flags.source {
        args::Source::Command(command) => {
            let status = tidesh_semantics::exec::execute_string_no_history(&mut env, &command, Source::CommandLine);
            env.environment.set_exit_status(status);
            status
        }
        args::Source::File(path) => run_script(&mut env, &path),
        args::Source::Stdin => 0,
    };

    let ran_noninteractively = !matches!(flags.source, args::Source::Stdin);
    let final_status = if !ran_noninteractively || flags.keep_alive {
        let mut source = repl::StdinLineSource::new();
        repl::run(&mut env, &mut source);
        env.exit_requested.unwrap_or_else(|| env.environment.exit_status())
    } else {
        status
    };

    tidesh_semantics::hooks::run(&mut env, "end", &[]);
    let _ = env.history.save();

    final_status
}

fn apply_color_mode(env: &mut Env, mode: args::ColorMode) {
    match mode {
        args::ColorMode::Enabled => env.environment.set("TIDESH_COLOR", "1"),
        args::ColorMode::Disabled => env.environment.set("TIDESH_COLOR", "0"),
        args::ColorMode::Auto => {}
    }
}

fn configure_history(env: &mut Env, flags: &args::Flags) {
    if flags.disable_history {
        env.features.disable(tidesh_env::features::Feature::History);
        env.history.set_disabled(true);
        return;
    }

    let path = flags
        .history
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_under_home(env, ".tidesh-history"));
    env.history = tidesh_env::history::History::with_file(path);
    if let Err(e) = env.history.load() {
        eprintln!("tidesh: history: {e}");
    }
}

fn default_under_home(env: &Env, name: &str) -> PathBuf {
    let home = env.environment.get("HOME").unwrap_or("/");
    PathBuf::from(home).join(name)
}

/// Sources the rc file like a script, after `--cd` and before the
/// interactive loop, with history suppressed for its commands. A
/// missing default rc file is silently skipped; an explicit `--rc` path
/// that doesn't exist is reported.
fn source_rc_file(env: &mut Env, explicit: Option<&str>) {
    let (path, was_explicit) = match explicit {
        Some(p) => (PathBuf::from(p), true),
        None => (default_under_home(env, ".tideshrc"), false),
    };

    match std::fs::read_to_string(&path) {
        Ok(script) => {
            let source = Source::File { path: path.to_string_lossy().into_owned().into() };
            tidesh_semantics::exec::execute_string_no_history(env, &script, source);
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !was_explicit => {}
        Err(e) => eprintln!("tidesh: {}: {e}", path.display()),
    }
}

/// Runs a script file (or, for `-`, a script read from stdin) with
/// history suppressed, matching rc-sourcing semantics.
fn run_script(env: &mut Env, path: &str) -> i32 {
    use std::io::Read;

    let (script, source) = if path == "-" {
        let mut buf = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
            eprintln!("tidesh: -: {e}");
            return 1;
        }
        (buf, Source::File { path: "-".into() })
    } else {
        match std::fs::read_to_string(path) {
            Ok(s) => (s, Source::File { path: path.to_owned().into() }),
            Err(e) => {
                eprintln!("tidesh: {path}: {e}");
                return 127;
            }
        }
    };

    let status = tidesh_semantics::exec::execute_string_no_history(env, &script, source);
    env.environment.set_exit_status(status);
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidesh_env_test_helper::fixture_env;

    #[test]
    fn run_script_executes_file_contents() {
        let (mut env, _guard) = fixture_env();
        let script_path = env.cwd.join("script.tidesh");
        std::fs::write(&script_path, "exit 5\n").unwrap();
        let status = run_script(&mut env, script_path.to_str().unwrap());
        assert_eq!(status, 5);
    }

    #[test]
    fn run_script_reports_missing_file_as_127() {
        let (mut env, _guard) = fixture_env();
        let status = run_script(&mut env, "/no/such/script.tidesh");
        assert_eq!(status, 127);
    }

    #[test]
    fn missing_default_rc_is_silently_skipped() {
        let (mut env, _guard) = fixture_env();
        source_rc_file(&mut env, None);
        assert_eq!(env.environment.exit_status(), 0);
    }

    #[test]
    fn explicit_missing_rc_reports_error_but_does_not_panic() {
        let (mut env, _guard) = fixture_env();
        source_rc_file(&mut env, Some("/no/such/rcfile"));
    }

    #[test]
    fn rc_file_commands_do_not_enter_history() {
        let (mut env, _guard) = fixture_env();
        let rc_path = env.cwd.join(".tideshrc");
        std::fs::write(&rc_path, "FOO=bar\n").unwrap();
        source_rc_file(&mut env, Some(rc_path.to_str().unwrap()));
        assert_eq!(env.environment.get("FOO"), Some("bar"));
        assert!(env.history.is_empty());
    }

    #[test]
    fn disable_history_flag_disables_the_feature() {
        let (mut env, _guard) = fixture_env();
        let flags = args::Flags {
            disable_history: true,
            ..args::Flags::default()
        };
        configure_history(&mut env, &flags);
        assert!(env.history.is_disabled());
        assert!(!env.features.is_enabled(tidesh_env::features::Feature::History));
    }

    #[test]
    fn color_flags_set_the_environment_slot() {
        let (mut env, _guard) = fixture_env();
        apply_color_mode(&mut env, args::ColorMode::Enabled);
        assert_eq!(env.environment.get("TIDESH_COLOR"), Some("1"));
        apply_color_mode(&mut env, args::ColorMode::Disabled);
        assert_eq!(env.environment.get("TIDESH_COLOR"), Some("0"));
    }
}
