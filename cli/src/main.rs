mod sources;

use bumpalo::Bump;
use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use reedline::{
    DefaultPrompt, DefaultPromptSegment, EditCommand, Emacs, KeyCode, KeyModifiers, Keybindings,
    Reedline, ReedlineEvent, Signal, default_emacs_keybindings,
};
use std::io::Read;
use std::path::PathBuf;
use tiny::{AbstractValue, AnalyzerOptions, Bindings, Diagnostic, Error, Value};
use tiny_core::{analyzer, evaluator, parser};

use sources::SourceArg;

/// Tiny - a rule language with an abstract interpreter
#[derive(Parser, Debug)]
#[command(name = "tiny")]
#[command(about = "Analyze or run tiny rule programs", long_about = None)]
struct Args {
    /// Run on concrete values instead of ranges
    #[arg(long)]
    concrete: bool,

    /// Bind a source: NAME=N, NAME=LO..HI, NAME=.., NAME=true|false|bool
    #[arg(long = "source", value_name = "NAME=SPEC")]
    sources: Vec<SourceArg>,

    /// Report divisors that may be zero
    #[arg(long)]
    report_precision_loss: bool,

    /// Warn when an always-true predicate makes `otherwise` dead
    #[arg(long)]
    warn_unreachable_otherwise: bool,

    /// Print the parsed program (for debugging)
    #[arg(long)]
    debug_parse: bool,

    /// Program file (if not provided, reads from stdin)
    file: Option<PathBuf>,
}

enum Sources {
    Abstract(Bindings<AbstractValue>, AnalyzerOptions),
    Concrete(Bindings<Value>),
}

struct Session {
    sources: Sources,
    debug_parse: bool,
    use_color: bool,
}

impl Session {
    fn new(args: &Args) -> Result<Self> {
        let sources = if args.concrete {
            Sources::Concrete(sources::concrete_sources(&args.sources).into_diagnostic()?)
        } else {
            let options = AnalyzerOptions {
                report_precision_loss: args.report_precision_loss,
                warn_unreachable_otherwise: args.warn_unreachable_otherwise,
            };
            Sources::Abstract(
                sources::abstract_sources(&args.sources).into_diagnostic()?,
                options,
            )
        };
        Ok(Self {
            sources,
            debug_parse: args.debug_parse,
            use_color: atty::is(atty::Stream::Stderr),
        })
    }

    /// Runs one program, printing sinks to stdout and diagnostics to stderr.
    /// Returns the number of errors reported.
    fn run(&self, input: &str) -> usize {
        let arena = Bump::new();
        let program = match parser::parse(&arena, input) {
            Ok(program) => program,
            Err(e) => return self.fail(input, e.into()),
        };

        if self.debug_parse {
            println!("=== Parsed Program ===");
            println!("{:#?}", program.statements);
            println!();
        }

        let (sinks, diagnostics) = match &self.sources {
            Sources::Abstract(sources, options) => {
                match analyzer::evaluate_with_options(&program, sources, *options) {
                    Ok(evaluation) => (tiny::format_sinks(&evaluation.sinks), evaluation.diagnostics),
                    Err(e) => return self.fail(input, e.into()),
                }
            }
            Sources::Concrete(sources) => match evaluator::interpret(&program, sources) {
                Ok(evaluation) => (tiny::format_sinks(&evaluation.sinks), evaluation.diagnostics),
                Err(e) => return self.fail(input, e.into()),
            },
        };

        self.render(input, diagnostics.as_slice());
        print!("{}", sinks);
        diagnostics.iter().filter(|d| d.is_error()).count()
    }

    fn fail(&self, input: &str, error: Error) -> usize {
        tracing::debug!(%error, "pass stopped");
        self.render(input, &[error.to_diagnostic(input)]);
        1
    }

    fn render(&self, input: &str, diagnostics: &[Diagnostic]) {
        let mut stderr = std::io::stderr();
        if let Err(e) = tiny::render_diagnostics(input, diagnostics, &mut stderr, self.use_color) {
            eprintln!("Error writing diagnostics: {}", e);
        }
    }
}

fn add_keybindings(keybindings: &mut Keybindings) {
    keybindings.add_binding(
        KeyModifiers::ALT,
        KeyCode::Enter,
        ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
    );
}

fn setup_reedline() -> (Reedline, DefaultPrompt) {
    let mut keybindings = default_emacs_keybindings();
    add_keybindings(&mut keybindings);

    let edit_mode = Box::new(Emacs::new(keybindings));
    let line_editor = Reedline::create().with_edit_mode(edit_mode);

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("tiny".to_string()),
        DefaultPromptSegment::Empty,
    );

    (line_editor, prompt)
}

fn repl(session: &Session) -> Result<()> {
    let (mut line_editor, prompt) = setup_reedline();

    println!("Tiny REPL - Enter a program (Alt+Enter for a new line, Ctrl+D or Ctrl+C to exit)");

    loop {
        let sig = match line_editor.read_line(&prompt) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Reedline error: {e}");
                return Ok(());
            }
        };

        match sig {
            Signal::Success(buffer) => {
                if !buffer.trim().is_empty() {
                    session.run(&buffer);
                }
            }
            Signal::CtrlD | Signal::CtrlC => {
                println!("\nGoodbye!");
                return Ok(());
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG environment variable to control log level
    // Default to WARN if not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let session = Session::new(&args)?;

    let input = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("reading {}", path.display()))?,
        None if atty::is(atty::Stream::Stdin) => return repl(&session),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .into_diagnostic()
                .wrap_err("reading stdin")?;
            input
        }
    };

    let errors = session.run(&input);
    if errors > 0 {
        miette::bail!("{} error(s) reported", errors);
    }
    Ok(())
}
