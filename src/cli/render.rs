//! Render command implementation.
//!
//! Evaluates script files, prints their text output to stdout and lets
//! `$renderCanvas` write images under the configured output directory.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use walkdir::WalkDir;

use crate::config::Config;
use crate::default_registry;
use crate::error::{EaselError, Result};
use crate::output::{display_path, plural, Printer};
use crate::script::Evaluator;

/// Evaluate scripts and render their canvases
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Script files or directories to evaluate (default: current directory)
    pub paths: Vec<PathBuf>,

    /// Config file (default: easel.yaml in the current directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output directory for relative render paths (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: RenderArgs, printer: &Printer) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::discover(Path::new("."))?,
    };
    if let Some(output) = args.output {
        config.output = output;
    }

    let paths = if args.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        args.paths
    };
    let scripts = collect_scripts(&paths, &config.extension)?;
    if scripts.is_empty() {
        printer.warning(
            "Skipping",
            &format!("no .{} scripts found", config.extension),
        );
        return Ok(());
    }

    let registry = default_registry(&config)?;
    let evaluator = Evaluator::new(&registry, &config);
    let mut images = 0;

    for script in &scripts {
        printer.status("Evaluating", &display_path(script));

        let source = fs::read_to_string(script).map_err(|e| EaselError::Io {
            path: script.clone(),
            message: format!("Failed to read script: {}", e),
        })?;

        let evaluation = match evaluator.evaluate(&source) {
            Ok(evaluation) => evaluation,
            Err(e) => {
                printer.error("Failed", &display_path(script));
                return Err(e);
            }
        };

        let output = evaluation.output.trim();
        if !output.is_empty() {
            println!("{}", output);
        }
        images += evaluation
            .canvases
            .iter()
            .map(|canvas| canvas.renders() as usize)
            .sum::<usize>();
    }

    printer.success(
        "Finished",
        &format!(
            "{}, {} written to {}",
            plural(scripts.len(), "script", "scripts"),
            plural(images, "image", "images"),
            display_path(&config.output)
        ),
    );

    Ok(())
}

/// Expand files and directories into a sorted list of script files.
///
/// Files named explicitly are kept whatever their extension; directories
/// are walked for files ending in `.{extension}`.
pub fn collect_scripts(paths: &[PathBuf], extension: &str) -> Result<Vec<PathBuf>> {
    let mut scripts = Vec::new();

    for path in paths {
        if path.is_file() {
            scripts.push(path.clone());
        } else if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| p.extension().is_some_and(|ext| ext == extension))
                .collect();
            found.sort();
            scripts.extend(found);
        } else {
            return Err(EaselError::Io {
                path: path.clone(),
                message: "No such file or directory".to_string(),
            });
        }
    }

    Ok(scripts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_collect_scripts_walks_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("cards/nested")).unwrap();
        fs::write(dir.path().join("cards/b.easel"), "").unwrap();
        fs::write(dir.path().join("cards/nested/a.easel"), "").unwrap();
        fs::write(dir.path().join("cards/notes.txt"), "").unwrap();

        let scripts = collect_scripts(&[dir.path().join("cards")], "easel").unwrap();
        let names: Vec<_> = scripts
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(names, vec!["b.easel", "a.easel"]);
    }

    #[test]
    fn test_collect_scripts_keeps_explicit_files() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("card.txt");
        fs::write(&file, "").unwrap();

        let scripts = collect_scripts(std::slice::from_ref(&file), "easel").unwrap();
        assert_eq!(scripts, vec![file]);
    }

    #[test]
    fn test_collect_scripts_missing_path() {
        let dir = tempdir().unwrap();
        let result = collect_scripts(&[dir.path().join("missing")], "easel");
        assert!(matches!(result, Err(EaselError::Io { .. })));
    }

    #[test]
    fn test_render_writes_images() {
        let dir = tempdir().unwrap();
        let script = dir.path().join("dot.easel");
        fs::write(
            &script,
            "$createCanvas[4;4;$addCircleLayer[0;0;2;#ff0000]$renderCanvas[dot.png]]",
        )
        .unwrap();

        let args = RenderArgs {
            paths: vec![script],
            config: None,
            output: Some(dir.path().join("out")),
        };
        run(args, &Printer::plain()).unwrap();

        assert!(dir.path().join("out/dot.png").is_file());
    }

    #[test]
    fn test_render_reports_script_errors() {
        let dir = tempdir().unwrap();
        let script = dir.path().join("bad.easel");
        fs::write(&script, "$createCanvas[0;10;]").unwrap();

        let args = RenderArgs {
            paths: vec![script],
            config: None,
            output: Some(dir.path().to_path_buf()),
        };
        assert!(run(args, &Printer::plain()).is_err());
    }
}
