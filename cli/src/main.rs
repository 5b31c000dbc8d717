mod logging;
mod test_runner;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use chatmark::segment::{SegmentWarning, Segmenter};
use render::{Theme, Transcript};

const SUBCOMMANDS: &[&str] = &["render", "blocks", "highlight", "test", "help"];

#[derive(Parser)]
#[command(name = "chatmark", version, about = "Render chat replies with highlighted code")]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Log at debug level (overrides CHATMARK_LOG / RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML file overriding the default colors
    #[arg(long, global = true)]
    theme: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a message (or a .toml transcript) to the terminal
    Render(RenderArgs),

    /// Print the blocks a message splits into
    Blocks(BlocksArgs),

    /// Print the highlight spans for a file of code
    Highlight(HighlightArgs),

    /// Run .test.md fixture files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Message file, or a transcript of [[message]] tables
    file: String,

    /// Treat the file as a transcript even without a .toml extension
    #[arg(long)]
    transcript: bool,
}

#[derive(clap::Args)]
struct BlocksArgs {
    /// Message file to segment
    file: String,

    /// Also print the resolved highlight spans of each code block
    #[arg(long)]
    spans: bool,
}

#[derive(clap::Args)]
struct HighlightArgs {
    /// File containing only code
    file: String,

    /// Language used to pick keywords (unknown names use the default set)
    #[arg(short, long, default_value = "")]
    lang: String,

    /// Print every pass match before overlap resolution
    #[arg(long)]
    raw: bool,
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
    // `chatmark reply.md` is shorthand for `chatmark render reply.md`.
    let mut args: Vec<String> = std::env::args().collect();
    let first_pos = args
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, a)| !a.starts_with('-'))
        .map(|(pos, a)| (pos, a.clone()));
    if let Some((pos, first)) = first_pos {
        if !SUBCOMMANDS.contains(&first.as_str()) {
            args.insert(pos, "render".to_string());
        }
    }

    let cli = Cli::parse_from(&args);
    logging::init(cli.verbose);

    let color_choice = if cli.no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };

    match cli.command {
        Command::Render(render_args) => {
            let theme = load_theme(cli.theme.as_deref());
            do_render(render_args, &theme, color_choice);
        }
        Command::Blocks(blocks_args) => do_blocks(blocks_args, color_choice),
        Command::Highlight(highlight_args) => do_highlight(highlight_args),
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

fn read_source(file: &str) -> String {
    match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", file, e);
            process::exit(1);
        }
    }
}

fn load_theme(path: Option<&Path>) -> Theme {
    let Some(path) = path else {
        return Theme::default();
    };
    match Theme::load(path) {
        Ok(theme) => theme,
        Err(e) => {
            eprintln!("error: cannot load theme '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn do_render(args: RenderArgs, theme: &Theme, color_choice: ColorChoice) {
    let mut stdout = StandardStream::stdout(color_choice);

    let is_transcript = args.transcript || args.file.ends_with(".toml");
    let result = if is_transcript {
        let transcript = match Transcript::load(Path::new(&args.file)) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: {}", e);
                process::exit(1);
            }
        };
        transcript.render(&mut stdout, theme)
    } else {
        let source = read_source(&args.file);
        emit_warnings(&args.file, &source, color_choice);
        render::render_message(&mut stdout, &source, theme)
    };

    if let Err(e) = result {
        eprintln!("error: cannot write output: {}", e);
        process::exit(1);
    }
}

fn do_blocks(args: BlocksArgs, color_choice: ColorChoice) {
    let source = read_source(&args.file);
    emit_warnings(&args.file, &source, color_choice);

    if args.spans {
        println!("{:#?}", chatmark::Message::parse(&source));
    } else {
        println!("{:#?}", chatmark::segment(&source));
    }
}

fn do_highlight(args: HighlightArgs) {
    let source = read_source(&args.file);
    let spans = if args.raw {
        chatmark::highlight::highlight_passes(&source, &args.lang)
    } else {
        chatmark::highlight(&source, &args.lang)
    };
    for span in spans {
        println!(
            "{}..{}\t{}\t{:?}",
            span.start,
            span.end,
            span.style,
            &source[span.range()]
        );
    }
}

/// Report segment warnings (unterminated fences) on stderr.
fn emit_warnings(file: &str, source: &str, color_choice: ColorChoice) {
    let mut files = SimpleFiles::new();
    let file_id = files.add(file.to_string(), source.to_string());
    let warnings: Vec<SegmentWarning> = Segmenter::new(source, file_id).segment().warnings;

    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    for warning in &warnings {
        let diagnostic = warning.to_diagnostic();
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
    }
}
