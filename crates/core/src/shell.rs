//! Shell quoting and command helpers for pkgfs
//!
//! External programs are normally launched with an argument vector. A
//! shell is only involved when the caller hands over a full command string,
//! and every value interpolated into such a string goes through [`quote`].

use std::borrow::Cow;
use std::path::Path;
use std::process::{Command, ExitStatus};

use crate::{Error, Result};

/// The shell used for string commands
pub const SHELL: &str = "sh";

/// Quote a value for safe interpolation into a POSIX shell command.
///
/// # Errors
///
/// Returns an error if the value contains a NUL byte, which no shell
/// word can carry.
pub fn quote(value: &str) -> Result<String> {
    shlex::try_quote(value)
        .map(Cow::into_owned)
        .map_err(|e| Error::configuration(format!("cannot quote {value:?}: {e}")))
}

/// Quote and join a program and its arguments into one command prefix.
///
/// # Errors
///
/// Returns an error if any part cannot be quoted.
pub fn join<'a>(parts: impl IntoIterator<Item = &'a str>) -> Result<String> {
    parts
        .into_iter()
        .map(quote)
        .collect::<Result<Vec<_>>>()
        .map(|quoted| quoted.join(" "))
}

/// Build a command that runs `command` through the shell with `dir` as cwd.
#[must_use]
pub fn command_in(dir: &Path, command: &str) -> Command {
    let mut cmd = Command::new(SHELL);
    cmd.arg("-c").arg(command).current_dir(dir);
    cmd
}

/// Whether a child exited successfully.
///
/// Only an explicit exit code of `0` counts; a child terminated by a
/// signal has no code and is a failure.
#[must_use]
pub fn succeeded(status: &ExitStatus) -> bool {
    status.code() == Some(0)
}
