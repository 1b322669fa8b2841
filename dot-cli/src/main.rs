/*!
# dotc

Packs directories of dot templates into JavaScript render functions and
renders single templates from the command line.
*/
use crate::error::CliError;
use clap::Parser;
use dot::{Compiler, Definitions, SettingsOverride, Template};
use dot_library::World;
use dot_library::diag::codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use dot_library::diag::codespan_reporting::term;
use dot_library::diag::{SourceDiagnostic, write_diagnostics};
use dot_library::world::SourceMap;
use dot_syntax::Source;
use tracing_subscriber::EnvFilter;

mod error;
mod explain;
mod pack;
mod render;

#[derive(Debug, clap::Parser)]
#[clap(name = "dotc", version)]
struct Args {
    #[clap(subcommand)]
    pub command: Command,

    /// Log every compiler stage.
    #[clap(long, global = true)]
    pub trace: bool,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Compile every template in a directory into JavaScript files.
    Pack(pack::PackArgs),
    /// Compile a template and render it once.
    Render(render::RenderArgs),
    /// Explain an error code.
    Explain(explain::ExplainArgs),
}

/// Compiler options shared by the subcommands.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CompileArgs {
    /// The name data is bound to inside templates.
    #[clap(long)]
    pub varname: Option<String>,

    /// Keep whitespace and newlines as written.
    #[clap(long)]
    pub no_strip: bool,

    /// Generate template literals instead of string concatenation.
    #[clap(long)]
    pub tstring: bool,
}

impl CompileArgs {
    pub fn overrides(&self) -> SettingsOverride {
        let mut overrides = SettingsOverride::new()
            .strip(!self.no_strip)
            .log(|source| tracing::trace!(source, "generated"));
        if let Some(varname) = &self.varname {
            overrides = overrides.varname(varname.as_str());
        }
        if self.tstring {
            overrides = overrides.tstring(true);
        }
        overrides
    }
}

fn main() -> Result<(), CliError> {
    let args = Args::parse();
    init_tracing(args.trace);

    match args.command {
        Command::Pack(args) => pack::pack_command(args)?,
        Command::Render(args) => render::render_command(args)?,
        Command::Explain(args) => explain::explain_command(args)?,
    }

    Ok(())
}

fn init_tracing(trace: bool) {
    let filter = if trace {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Compiles the template file `name`, printing diagnostics on failure.
pub fn compile_file(
    compiler: &Compiler,
    name: &str,
    text: &str,
    defs: &mut Definitions,
    overrides: &SettingsOverride,
) -> Result<Template, CliError> {
    match compiler.compile_named(name, text, defs, overrides) {
        Ok(template) => Ok(template),
        Err(errors) => {
            let mut world = SourceMap::new();
            if let Some(source) = Source::try_from_string(name, text) {
                world.insert(source);
            }
            print_diagnostics(&world, &errors)?;
            Err(CliError::Execution)
        }
    }
}

pub fn print_diagnostics(
    world: &dyn World,
    errors: &[SourceDiagnostic],
) -> Result<(), CliError> {
    let writer = StandardStream::stderr(ColorChoice::Auto);
    let config = term::Config::default();

    write_diagnostics(world, errors, &mut writer.lock(), &config)?;

    Ok(())
}
