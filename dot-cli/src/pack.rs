use crate::error::CliError;
use crate::{CompileArgs, compile_file};
use dot::{Compiler, Definition, Definitions, SettingsOverride};
use ignore::WalkBuilder;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tap::Pipe;

#[derive(Debug, clap::Parser)]
pub struct PackArgs {
    /// Directory with `.def`, `.dot` and `.jst` files.
    pub src: PathBuf,

    /// Directory the compiled `.js` files are written to.
    pub dest: PathBuf,

    /// The global variable to install the templates in.
    #[clap(long, short, default_value = "window.render")]
    pub global: String,

    /// Bundle every `.js` file in DEST into this file. A path ending in `/`
    /// is a directory that receives `bundle.js`.
    #[clap(long, short)]
    pub package: Option<String>,

    #[clap(flatten)]
    pub compile: CompileArgs,
}

pub fn pack_command(args: PackArgs) -> Result<(), CliError> {
    let written = pack(&args.src, &args.dest, &args.global, &args.compile.overrides())?;
    for path in &written {
        println!("{}", path.display());
    }

    if let Some(package) = &args.package {
        let bundle = bundle(&args.dest, package)?;
        println!("Packaged all files into {}", bundle.display());
    }

    Ok(())
}

/// Compiles every template below `src` into `dest`, returning the files
/// written.
///
/// Templates see the text of every `.def` file as a define named by its file
/// stem. Each template gets its own copy of those defines. Two templates with
/// the same stem would write the same module, so that is an error.
pub fn pack(
    src: &Path,
    dest: &Path,
    global: &str,
    overrides: &SettingsOverride,
) -> Result<Vec<PathBuf>, CliError> {
    let files = collect(src)?;
    fs::create_dir_all(dest)?;

    let mut defs = Definitions::new();
    for path in files.iter().filter(|path| has_extension(path, &["def"])) {
        let text = fs::read_to_string(path)?;
        defs.insert(stem(path), Definition::Text(text.into()));
    }
    tracing::debug!(count = defs.len(), "loaded defines");

    let templates: Vec<&PathBuf> = files
        .iter()
        .filter(|path| has_extension(path, &["dot", "jst"]))
        .collect();
    let mut stems: HashMap<String, &PathBuf> = HashMap::new();
    for &path in &templates {
        if let Some(first) = stems.insert(stem(path), path) {
            return Err(CliError::DuplicateStem {
                stem: stem(path),
                first: first.clone(),
                second: path.clone(),
            });
        }
    }

    let compiler = Compiler::new();
    let mut written = vec![];
    let mut failed = false;

    for path in templates {
        let text = fs::read_to_string(path)?;
        let name = path.display().to_string();
        let template = match compile_file(&compiler, &name, &text, &mut defs.clone(), overrides) {
            Ok(template) => template,
            Err(CliError::Execution) => {
                failed = true;
                continue;
            }
            Err(err) => return Err(err),
        };

        let stem = stem(path);
        let module = format!(
            "(function(){{{global}={global}||{{}};{global}['{key}']=function anonymous({varname}){{{source}}};}}());",
            key = quote_key(&stem),
            varname = template.varname(),
            source = template.source().text(),
        );
        let target = dest.join(format!("{stem}.js"));
        fs::write(&target, module)?;
        tracing::debug!(template = %name, target = %target.display(), "packed template");
        written.push(target);
    }

    if failed {
        return Err(CliError::Execution);
    }
    Ok(written)
}

/// Concatenates the `.js` files in `dest` into one file.
pub fn bundle(dest: &Path, package: &str) -> Result<PathBuf, CliError> {
    let target = if package.ends_with('/') {
        fs::create_dir_all(package)?;
        Path::new(package).join("bundle.js")
    } else {
        PathBuf::from(package)
    };

    let mut scripts = fs::read_dir(dest)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|entry| entry.path())
        .filter(|path| has_extension(path, &["js"]))
        .collect::<Vec<_>>();
    scripts.sort();

    let mut code = String::new();
    for script in &scripts {
        code.push_str(&minify(&fs::read_to_string(script)?));
    }

    fs::write(&target, code)?;
    Ok(target)
}

/// Trims every line and drops blank ones.
fn minify(script: &str) -> String {
    script
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .fold(String::new(), |mut out, line| {
            out.push_str(line);
            out.push('\n');
            out
        })
}

fn collect(src: &Path) -> Result<Vec<PathBuf>, CliError> {
    if !src.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", src.display()),
        )
        .into());
    }

    WalkBuilder::new(src)
        .build()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|e| e.into_path())
        .collect::<Vec<_>>()
        .pipe(|mut files| {
            files.sort();
            Ok(files)
        })
}

/// Escapes `key` for a single-quoted script string.
fn quote_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.contains(&ext))
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, text: &str) {
        fs::write(dir.join(name), text).expect("failed to write fixture");
    }

    #[test]
    fn packs_templates_with_defines() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        write(src.path(), "header.def", "<h1>{{=it.title}}</h1>");
        write(src.path(), "page.dot", "{{#def.header}}<p>{{=it.body}}</p>");
        write(src.path(), "notes.txt", "ignored");

        let written = pack(src.path(), dest.path(), "window.render", &SettingsOverride::new()).unwrap();

        assert_eq!(written, vec![dest.path().join("page.js")]);
        let module = fs::read_to_string(dest.path().join("page.js")).unwrap();
        assert!(module.starts_with(
            "(function(){window.render=window.render||{};window.render['page']=function anonymous(it){"
        ));
        assert!(module.ends_with("};}());"));
        assert!(module.contains("<h1>"));
        assert!(!module.contains("def.header"));
    }

    #[test]
    fn jst_files_and_custom_global() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        write(src.path(), "list.jst", "{{~it.items :item}}{{=item}}{{~}}");

        pack(src.path(), dest.path(), "app.tpl", &SettingsOverride::new()).unwrap();

        let module = fs::read_to_string(dest.path().join("list.js")).unwrap();
        assert!(module.starts_with("(function(){app.tpl=app.tpl||{};app.tpl['list']="));
    }

    #[test]
    fn creates_missing_destination() {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        let dest = out.path().join("nested").join("dest");
        write(src.path(), "a.dot", "a");

        pack(src.path(), &dest, "window.render", &SettingsOverride::new()).unwrap();

        assert!(dest.join("a.js").is_file());
    }

    #[test]
    fn broken_template_fails_the_pack() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        write(src.path(), "bad.dot", "{{= it.a + }}");
        write(src.path(), "good.dot", "ok");

        let result = pack(src.path(), dest.path(), "window.render", &SettingsOverride::new());

        assert!(matches!(result, Err(CliError::Execution)));
        assert!(dest.path().join("good.js").is_file());
        assert!(!dest.path().join("bad.js").exists());
    }

    #[test]
    fn duplicate_stems_are_rejected() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        fs::create_dir(src.path().join("a")).unwrap();
        fs::create_dir(src.path().join("b")).unwrap();
        write(&src.path().join("a"), "x.dot", "first");
        write(&src.path().join("b"), "x.jst", "second");

        let result = pack(src.path(), dest.path(), "window.render", &SettingsOverride::new());

        match result {
            Err(CliError::DuplicateStem { stem, first, second }) => {
                assert_eq!(stem, "x");
                assert_eq!(first, src.path().join("a").join("x.dot"));
                assert_eq!(second, src.path().join("b").join("x.jst"));
            }
            other => panic!("expected a duplicate stem error, got {other:?}"),
        }
        assert!(!dest.path().join("x.js").exists());
    }

    #[test]
    fn quotes_in_stems_are_escaped() {
        let src = tempdir().unwrap();
        let dest = tempdir().unwrap();
        write(src.path(), "it's.dot", "ok");

        pack(src.path(), dest.path(), "window.render", &SettingsOverride::new()).unwrap();

        let module = fs::read_to_string(dest.path().join("it's.js")).unwrap();
        assert!(module.contains(r"window.render['it\'s']=function"));
        assert_eq!(quote_key(r"a\b"), r"a\\b");
    }

    #[test]
    fn missing_source_directory() {
        let dest = tempdir().unwrap();
        let missing = dest.path().join("missing");

        let result = pack(&missing, dest.path(), "window.render", &SettingsOverride::new());

        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn bundles_into_directory() {
        let dest = tempdir().unwrap();
        let out = tempdir().unwrap();
        write(dest.path(), "b.js", "  second();\n\n");
        write(dest.path(), "a.js", "first();\n   \n");
        write(dest.path(), "readme.md", "skipped");

        let package = format!("{}/", out.path().join("dist").display());
        let target = bundle(dest.path(), &package).unwrap();

        assert_eq!(target, out.path().join("dist").join("bundle.js"));
        assert_eq!(fs::read_to_string(target).unwrap(), "first();\nsecond();\n");
    }

    #[test]
    fn bundles_into_file() {
        let dest = tempdir().unwrap();
        let out = tempdir().unwrap();
        write(dest.path(), "a.js", "a();");

        let package = out.path().join("all.js");
        let target = bundle(dest.path(), &package.display().to_string()).unwrap();

        assert_eq!(target, package);
        assert_eq!(fs::read_to_string(package).unwrap(), "a();\n");
    }
}
