use crate::error::CliError;
use crate::{CompileArgs, compile_file, print_diagnostics};
use dot::{Compiler, Definitions};
use dot_library::diag::FileError;
use dot_library::world::SourceMap;
use dot_syntax::Source;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, clap::Parser)]
pub struct RenderArgs {
    pub template: PathBuf,

    /// JSON file with the data the template is rendered with.
    #[clap(long)]
    pub data: Option<PathBuf>,

    /// Print the generated function body before rendering.
    #[clap(long)]
    pub print_source: bool,

    #[clap(flatten)]
    pub compile: CompileArgs,
}

pub fn render_command(args: RenderArgs) -> Result<(), CliError> {
    let text = read(&args.template)?;
    let data = match &args.data {
        Some(path) => serde_json::from_str(&read(path)?)?,
        None => serde_json::Value::Object(Default::default()),
    };

    let name = args.template.display().to_string();
    let template = compile_file(
        &Compiler::new(),
        &name,
        &text,
        &mut Definitions::new(),
        &args.compile.overrides(),
    )?;

    if args.print_source {
        println!("{template:?}\n");
    }

    match template.render_json(&data) {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(errors) => {
            let world = SourceMap::new()
                .with(Source::from_string(&name, text))
                .with(template.source().clone());
            print_diagnostics(&world, &errors)?;
            Err(CliError::Execution)
        }
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|e| FileError::from_io(e, path).into())
}
