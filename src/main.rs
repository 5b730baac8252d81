use std::io::Read;
use std::process;

use tracing_subscriber::EnvFilter;

use hexaforth::{compile, Context, Dictionary, VmConfig};

const LOG_VARIABLE: &str = "HEXAFORTH_LOG";

enum Output {
  Run,
  Listing,
  Hex,
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_env(LOG_VARIABLE))
    .with_writer(std::io::stderr)
    .init();

  #[cfg(feature = "trace_computation")]
  eprintln!("Computation Tracing ENABLED");

  if let Err(message) = run() {
    eprintln!("error: {}", message);
    process::exit(1);
  }
}

fn run() -> Result<(), String> {
  let mut output = Output::Run;
  let mut words  = Vec::new();
  for argument in std::env::args().skip(1) {
    match argument.as_str() {
      "--listing" => output = Output::Listing,
      "--hex"     => output = Output::Hex,
      _           => words.push(argument),
    }
  }

  let source = match words.is_empty() {
    true => {
      let mut text = String::new();
      std::io::stdin().read_to_string(&mut text).map_err(|e| e.to_string())?;
      text
    }
    false => words.join(" ")
  };

  let dictionary = Dictionary::base().map_err(|e| e.to_string())?;
  let image      = compile(&source, &dictionary).map_err(|e| e.to_string())?;

  match output {
    Output::Listing => print!("{}", image.listing(&dictionary)),
    Output::Hex     => print!("{}", image.to_hex_lines()),
    Output::Run     => {
      let mut context = Context::new(VmConfig::default())
        .with_input(std::io::stdin())
        .with_output(std::io::stdout());
      let start = context.load_image(&image).map_err(|e| e.to_string())?;
      context.set_eip(start);
      let result = context.run();
      println!();
      println!("{}", context);
      result.map_err(|e| e.to_string())?;
    }
  } // end match output

  Ok(())
}
