mod cli;

use std::path::PathBuf;

use clap::Parser;

/// Retargetable source-to-source translator.
#[derive(Parser)]
#[command(name = "rosetta", version, about)]
struct Args {
    /// Source language of the input file (py, js).
    #[arg(long = "from", value_name = "LANG")]
    from: String,

    /// Target language to emit (python, c, tcl).
    #[arg(long = "to", value_name = "LANG")]
    to: String,

    /// Input source file.
    input: PathBuf,

    /// Write the output here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the IR tree to stderr before emitting.
    #[arg(long)]
    print_ir: bool,

    /// Dump the IR as JSON instead of the tree form (implies --print-ir).
    #[arg(long)]
    ir_json: bool,
}

fn main() {
    let args = Args::parse();
    cli::cmd_translate(
        &args.input,
        &args.from,
        &args.to,
        args.output.as_deref(),
        args.print_ir,
        args.ir_json,
    );
}
