use std::env;
use std::process;

use fncc::{CompileError, codegen, parser, printer, tokenizer};
use snafu::Snafu;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const DEMO_SOURCE: &str = "fn main(void) : int { return ~-2; }";

#[derive(Debug, Snafu)]
enum RunError {
  #[snafu(context(false), display("{source}"))]
  Compile { source: CompileError },

  #[snafu(context(false), display("failed to render output: {source}"))]
  Render { source: serde_json::Error },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
  Lex,
  Parse,
  Lower,
}

#[derive(Debug)]
struct Options {
  stage: Stage,
  source: String,
}

enum Command {
  Help,
  Compile(Options),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Command, String> {
  let mut stage = Stage::Lower;
  let mut source = None;

  while let Some(arg) = args.next() {
    match arg.as_str() {
      "-h" | "--help" => return Ok(Command::Help),
      "-s" | "--stage" => {
        stage = match args.next().as_deref() {
          Some("lex") => Stage::Lex,
          Some("parse") => Stage::Parse,
          Some("lower") => Stage::Lower,
          Some(other) => return Err(format!("invalid stage '{other}'")),
          None => return Err("missing stage name after '-s'|'--stage'".to_string()),
        };
      }
      flag if flag.starts_with('-') && flag.len() > 1 => {
        return Err(format!("invalid flag '{flag}'"));
      }
      _ if source.is_some() => return Err("more than one source given".to_string()),
      _ => source = Some(arg),
    }
  }

  Ok(Command::Compile(Options {
    stage,
    source: source.unwrap_or_else(|| DEMO_SOURCE.to_string()),
  }))
}

fn run(options: &Options) -> Result<String, RunError> {
  let tokens = tokenizer::tokenize(&options.source).map_err(CompileError::from)?;
  if options.stage == Stage::Lex {
    return Ok(tokenizer::dump_tokens(&tokens));
  }

  let ast = parser::parse(tokens).map_err(CompileError::from)?;
  if options.stage == Stage::Parse {
    return Ok(printer::dump_ast(&ast)? + "\n");
  }

  let ir = codegen::lower(ast).map_err(CompileError::from)?;
  Ok(printer::dump_assembly(&ir)? + "\n")
}

fn print_usage(program: &str) {
  eprintln!("usage: {program} [-s|--stage lex|parse|lower] [source]");
  eprintln!("compiles the built-in demo program when no source is given");
}

fn main() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();

  let mut args = env::args();
  let program = args.next().unwrap_or_else(|| "fncc".to_string());

  let options = match parse_args(args) {
    Ok(Command::Compile(options)) => options,
    Ok(Command::Help) => {
      print_usage(&program);
      return;
    }
    Err(message) => {
      eprintln!("{program}: {message}");
      print_usage(&program);
      process::exit(1);
    }
  };
  debug!(stage = ?options.stage, "compiling");

  match run(&options) {
    Ok(output) => print!("{output}"),
    Err(RunError::Compile { source }) => {
      eprintln!("{}", source.render(&options.source));
      process::exit(1);
    }
    Err(err) => {
      eprintln!("{program}: {err}");
      process::exit(1);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn args(list: &[&str]) -> impl Iterator<Item = String> {
    list
      .iter()
      .map(|arg| arg.to_string())
      .collect::<Vec<_>>()
      .into_iter()
  }

  #[test]
  fn defaults_to_demo_program_and_lowering() {
    let Ok(Command::Compile(options)) = parse_args(args(&[])) else {
      panic!("expected compile command");
    };
    assert_eq!(options.stage, Stage::Lower);
    assert_eq!(options.source, DEMO_SOURCE);
  }

  #[test]
  fn stage_flag_selects_output() {
    let Ok(Command::Compile(options)) = parse_args(args(&["--stage", "lex", "fn"])) else {
      panic!("expected compile command");
    };
    assert_eq!(options.stage, Stage::Lex);
    assert_eq!(run(&options).unwrap(), "(Token: FN, Content: 'fn')\n(Token: EOF, Content: '')\n");
  }

  #[test]
  fn bad_arguments_are_reported() {
    assert!(parse_args(args(&["-s", "emit"])).is_err());
    assert!(parse_args(args(&["-s"])).is_err());
    assert!(parse_args(args(&["-x"])).is_err());
    assert!(parse_args(args(&["a", "b"])).is_err());
  }

  #[test]
  fn demo_program_lowers() {
    let options = Options {
      stage: Stage::Lower,
      source: DEMO_SOURCE.to_string(),
    };
    let output = run(&options).unwrap();
    assert!(output.contains("\"Complement\""));
    assert!(output.contains("\"tmp1\""));
  }

  #[test]
  fn compile_errors_keep_their_stage() {
    let options = Options {
      stage: Stage::Parse,
      source: "fn main() : int { return 2 }".to_string(),
    };
    assert!(matches!(
      run(&options),
      Err(RunError::Compile {
        source: CompileError::Syntax { .. }
      })
    ));
  }
}
