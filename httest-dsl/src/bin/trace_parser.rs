/// Pipeline tracer - shows the flow through Lexer → Parser → Validator → CodeGen
///
/// Usage: cargo run --bin trace_parser <file.test>
use httest_dsl::{codegen, pretty_print, validate, Lexer, Parser};
use std::fs;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --bin trace_parser <file.test>");
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --bin trace_parser demos/login.test");
        std::process::exit(1);
    }

    let src_path = &args[1];

    let source = match fs::read_to_string(src_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("❌ Failed to read {}: {}", src_path, e);
            std::process::exit(1);
        }
    };

    println!("📝 INPUT SOURCE:");
    println!("{}", source);
    println!();

    println!("🔍 TOKENS:");
    println!("─────────────────────────────────────────────────────────────");
    let tokens = Lexer::new(&source).tokenize();
    for token in &tokens {
        println!(
            "{:>4}:{:<3} {:?}",
            token.span.line, token.span.column, token.kind
        );
    }
    println!();

    let mut parser = Parser::new(tokens);
    let program = match parser.parse() {
        Ok(program) => program,
        Err(e) => {
            eprintln!("❌ Parse error: {}", e);
            std::process::exit(1);
        }
    };

    println!("🌳 AST:");
    println!("─────────────────────────────────────────────────────────────");
    match serde_json::to_string_pretty(&program) {
        Ok(json) => println!("{}", json),
        Err(e) => println!("(AST not serializable: {})", e),
    }
    println!();

    println!("🔄 CANONICAL FORM:");
    println!("─────────────────────────────────────────────────────────────");
    println!("{}", pretty_print(&program));

    if let Err(e) = validate(&program) {
        eprintln!("❌ Validation error: {}", e);
        std::process::exit(1);
    }

    println!("⚙️ GENERATED OUTPUT:");
    println!("─────────────────────────────────────────────────────────────");
    println!("{}", codegen::generate(&program, src_path));

    println!("✅ Compile succeeded!");
}
