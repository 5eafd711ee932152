//! Maps short command names to fixed shell invocations.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::process::Command;

use clap::{Arg, ArgAction};

/// Name, shell command.
pub const COMMANDS: &[(&str, &str)] = &[
  ("install", "cargo build --release --workspace"),
  ("test", "cargo run --release -q -p postgres_bench -- --test"),
  ("benchmark", "cargo run --release -q -p postgres_bench --"),
  ("batch", "cargo run --release -q -p postgres_bench -- --batch"),
  ("cleanup", "cargo run --release -q -p postgres_bench -- --cleanup"),
  ("benchmark-async", "cargo run --release -q -p tokio_postgres_bench --"),
  ("docker-up", "docker-compose up -d"),
  ("docker-down", "docker-compose down"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  pub name: &'static str,
  pub command: &'static str,
  /// Forwarded to the command after its fixed arguments.
  pub args: Vec<String>,
}

/// Why no command runs. Displays as the text to show the user.
#[derive(Debug)]
pub enum Usage {
  Missing,
  Unknown(String),
  /// `--help`, `--version` and malformed flags, rendered by clap.
  Clap(clap::Error),
}

impl Usage {
  pub fn exit_code(&self) -> i32 {
    return match self {
      Usage::Clap(err) if !err.use_stderr() => 0,
      _ => 1,
    };
  }
}

impl fmt::Display for Usage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Usage::Missing => write!(f, "{}", help()),
      Usage::Unknown(name) => write!(f, "Unknown command: {name}\n\n{}", help()),
      Usage::Clap(err) => write!(f, "{err}"),
    }
  }
}

pub fn help() -> String {
  let mut text = String::from("Citus Benchmark Runner\n");
  text.push_str("======================\n\n");
  text.push_str("Available commands:\n");
  for (name, actual) in COMMANDS {
    text.push_str(&format!("  {name:<12} - {actual}\n"));
  }
  text.push_str("\nUsage: run <command> [args...]\n");
  text.push_str("Example: run test\n");
  return text;
}

pub fn cli() -> clap::Command {
  let commands = COMMANDS.iter().map(|(name, actual)| {
    clap::Command::new(*name).about(*actual).arg(
      Arg::new("args")
        .action(ArgAction::Append)
        .num_args(0..)
        .trailing_var_arg(true)
        .allow_hyphen_values(true),
    )
  });

  // Unknown names come back as external subcommands so they can be reported
  // against the table above.
  return clap::Command::new("run")
    .override_help(help())
    .allow_external_subcommands(true)
    .subcommands(commands);
}

pub fn parse<I, T>(argv: I) -> Result<Invocation, Usage>
where
  I: IntoIterator<Item = T>,
  T: Into<OsString> + Clone,
{
  let matches = cli().try_get_matches_from(argv).map_err(Usage::Clap)?;
  let Some((requested, sub)) = matches.subcommand() else {
    return Err(Usage::Missing);
  };
  let Some(&(name, command)) = COMMANDS.iter().find(|(cmd, _)| *cmd == requested) else {
    return Err(Usage::Unknown(requested.to_string()));
  };

  let args = sub
    .get_many::<String>("args")
    .map(|values| values.cloned().collect())
    .unwrap_or_default();

  return Ok(Invocation {
    name,
    command,
    args,
  });
}

impl Invocation {
  pub fn display(&self) -> String {
    if self.args.is_empty() {
      return self.command.to_string();
    }
    return format!("{} {}", self.command, self.args.join(" "));
  }

  /// Runs the command through `sh` with inherited stdio and returns its exit
  /// code, or 1 when it was terminated by a signal.
  pub fn execute(&self) -> io::Result<i32> {
    let status = Command::new("sh")
      .arg("-c")
      .arg(format!("{} \"$@\"", self.command))
      .arg(self.name)
      .args(&self.args)
      .status()?;

    return Ok(status.code().unwrap_or(1));
  }
}
