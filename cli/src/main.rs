mod test_runner;

use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

const SUBCOMMANDS: &[&str] = &["check", "find", "test", "help"];

#[derive(Parser)]
#[command(name = "notelint", version, about = "Structured-notes outline checker")]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a notes file and report violations
    Check(CheckArgs),

    /// Query items by chapter or title
    Find(FindArgs),

    /// Run .test.md expectation files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Notes file to check
    file: String,

    /// Dump the parsed document tree
    #[arg(long)]
    ast: bool,

    /// Print the chapter/item outline
    #[arg(long)]
    outline: bool,

    /// Suppress violation output, report via exit code only
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::Args)]
struct FindArgs {
    /// Notes file to query
    file: String,

    /// Only items in this chapter
    #[arg(short, long)]
    chapter: Option<u64>,

    /// Only items whose title contains this text (case-insensitive)
    #[arg(long)]
    contains: Option<String>,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .test.md file or directory containing them
    path: String,

    /// Run only tests in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    // Backwards compatibility: if the first positional arg is not a known
    // subcommand, inject "check" so `notelint notes.md` works like
    // `notelint check notes.md`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(first_pos) = args.iter().skip(1).find(|a| !a.starts_with('-')) {
        let first_pos = first_pos.clone();
        if !SUBCOMMANDS.contains(&first_pos.as_str()) {
            let pos = args.iter().position(|a| *a == first_pos).unwrap();
            args.insert(pos, "check".to_string());
        }
    }

    let cli = Cli::parse_from(&args);

    match cli.command {
        Command::Check(check_args) => do_check(check_args, cli.no_color),
        Command::Find(find_args) => do_find(find_args, cli.no_color),
        Command::Test(test_args) => {
            let path = Path::new(&test_args.path);
            if test_args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &test_args.category);
            process::exit(exit_code);
        }
    }
}

fn do_check(args: CheckArgs, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file, e);
            process::exit(1);
        }
    };

    // Set up codespan file database
    let mut files = SimpleFiles::new();
    let file_id = files.add(args.file.clone(), source.clone());

    let parser = notes::parser::Parser::new(source, file_id);
    let document = match parser.parse() {
        Ok(d) => d,
        Err(errors) => {
            let writer = StandardStream::stderr(color_choice);
            let config = term::Config::default();
            for error in &errors {
                let diagnostic = error.to_diagnostic();
                let _ =
                    term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
            }
            process::exit(1);
        }
    };

    // --ast: dump the parsed tree
    if args.ast {
        println!("{:#?}", document);
        return;
    }

    // --outline: print the chapter/item tree
    if args.outline {
        for chapter in &document.chapters {
            println!("Chapter {}. {}", chapter.number, chapter.title);
            for item in &chapter.items {
                println!("  Item {}: {}", item.number, item.title);
            }
        }
        return;
    }

    let violations = lint::validate(&document);
    if violations.is_empty() {
        if !args.quiet {
            eprintln!(
                "ok: {} is well-formed ({} chapters, {} items)",
                args.file,
                document.chapters.len(),
                document.items().count()
            );
        }
        return;
    }

    if !args.quiet {
        let writer = StandardStream::stderr(color_choice);
        let config = term::Config::default();
        for violation in &violations {
            let diagnostic = violation.to_diagnostic();
            let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
        }
        eprintln!("{}: {} violation(s)", args.file, violations.len());
    }
    process::exit(1);
}

fn do_find(args: FindArgs, no_color: bool) {
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file, e);
            process::exit(1);
        }
    };

    let mut files = SimpleFiles::new();
    let file_id = files.add(args.file.clone(), source.clone());

    let parser = notes::parser::Parser::new(source, file_id);
    let document = match parser.parse() {
        Ok(d) => d,
        Err(errors) => {
            let writer = StandardStream::stderr(color_choice);
            let config = term::Config::default();
            for error in &errors {
                let diagnostic = error.to_diagnostic();
                let _ =
                    term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
            }
            process::exit(1);
        }
    };

    let chapter = args.chapter;
    let contains = args.contains.map(|s| s.to_lowercase());

    let matches = lint::find(&document, |item: &notes::document::Item| {
        chapter.map_or(true, |n| item.chapter == n)
            && contains
                .as_deref()
                .map_or(true, |s| item.title.to_lowercase().contains(s))
    });

    let mut count = 0usize;
    for item in matches {
        println!("Item {}: {}  (chapter {})", item.number, item.title, item.chapter);
        count += 1;
    }
    if count == 0 {
        eprintln!("no matching items");
    }
}
