use std::process::exit;

use log::error;

fn main() {
  common::logging::init();

  let invocation = match runner::parse(std::env::args_os()) {
    Ok(invocation) => invocation,
    Err(usage) => {
      match &usage {
        runner::Usage::Clap(err) => {
          let _ = err.print();
        }
        _ => print!("{usage}"),
      }
      exit(usage.exit_code());
    }
  };

  println!("Running: {}", invocation.display());
  println!("{}", "-".repeat(50));

  match invocation.execute() {
    Ok(code) => exit(code),
    Err(err) => {
      error!("Failed to run {:?}: {err}", invocation.command);
      exit(1);
    }
  }
}
