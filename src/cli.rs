use std::path::Path;
use std::process;

use rosetta::emit::Target;
use rosetta::{emit, parse_source, pretty, Language};

/// Read, translate, write. All user-facing I/O lives here; the library
/// itself never touches the filesystem or prints.
pub fn cmd_translate(
    input: &Path,
    from: &str,
    to: &str,
    output: Option<&Path>,
    print_ir: bool,
    ir_json: bool,
) {
    let Some(language) = Language::from_tag(from) else {
        eprintln!("error: unsupported --from '{}' (supported: py, js)", from);
        process::exit(1);
    };
    let Some(target) = Target::from_tag(to) else {
        eprintln!("error: unsupported --to '{}' (supported: python, c, tcl)", to);
        process::exit(1);
    };

    let source = match std::fs::read_to_string(input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", input.display(), e);
            process::exit(1);
        }
    };
    let filename = input.display().to_string();

    let program = match parse_source(&source, language) {
        Ok(program) => program,
        Err(e) => {
            e.render(&filename, &source);
            process::exit(1);
        }
    };

    if print_ir || ir_json {
        if ir_json {
            eprintln!("{}", pretty::to_json(&program));
        } else {
            eprintln!("{}", pretty::pretty(&program));
        }
    }

    let translated = match emit::emit(&program, target) {
        Ok(text) => text,
        Err(e) => {
            e.render(&filename, &source);
            process::exit(1);
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &translated) {
                eprintln!("error: cannot write '{}': {}", path.display(), e);
                process::exit(1);
            }
            eprintln!("Translated -> {}", path.display());
        }
        None => print!("{}", translated),
    }
}
