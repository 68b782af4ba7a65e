/// httest compiler driver
///
/// Usage: httest <file.test>
///
/// Compiles the DSL source into tests/generated_tests.rs. Exit codes:
/// 0 on success, 2 on a syntax/validation diagnostic, 1 otherwise.
use std::fs;
use std::io;
use std::path::Path;
use std::process;

const OUTPUT_PATH: &str = "tests/generated_tests.rs";

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: httest <file.test>");
        process::exit(1);
    }

    let src_path = &args[1];
    let source = fs::read_to_string(src_path)?;

    match httest_dsl::compile(&source, src_path) {
        Ok(generated) => {
            let out_path = Path::new(OUTPUT_PATH);
            if let Some(dir) = out_path.parent() {
                fs::create_dir_all(dir)?;
            }
            fs::write(out_path, generated)?;
            println!(
                "✅ Generated {} from {} successfully!",
                OUTPUT_PATH, src_path
            );
            Ok(())
        }
        Err(diagnostic) => {
            eprintln!("{}", diagnostic);
            process::exit(2);
        }
    }
}
