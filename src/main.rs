use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "txt2mid")]
#[command(version = "2.0.0")]
#[command(about = "Text score to Standard MIDI File compiler", long_about = None)]
struct Args {
    /// Input text score file
    input: PathBuf,
}

fn main() -> Result<(), txt2mid::Error> {
    let args = Args::parse();

    // Output lands next to the input, with ".mid" appended
    let mut output = args.input.clone().into_os_string();
    output.push(".mid");
    let output = PathBuf::from(output);

    let mut compiler = txt2mid::Compiler::new();
    compiler.compile_file(&args.input, &output)?;

    Ok(())
}
