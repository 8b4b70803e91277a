//! `compress` command: finalize files the way a host pipeline would.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use asset_finalizer::asset::default_logical_name;
use asset_finalizer::{CompressionRequest, Finalizer, log};
use rayon::prelude::*;

use super::args::CompressArgs;

/// Finalize every file in `args`.
///
/// Files are independent and their artifacts content-addressed, so they are
/// processed in parallel.
pub fn run(finalizer: &Finalizer, args: &CompressArgs) -> Result<()> {
    if args.name.is_some() && args.files.len() > 1 {
        bail!("--name can only be used with a single file");
    }

    let to_stdout = args.out_dir.is_none() && args.files.len() == 1;
    if let Some(out_dir) = &args.out_dir {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("failed to create `{}`", out_dir.display()))?;
    }

    let jobs: Vec<(&PathBuf, String)> = args
        .files
        .iter()
        .map(|file| {
            let name = args
                .name
                .clone()
                .unwrap_or_else(|| default_logical_name(file));
            (file, name)
        })
        .collect();
    if !to_stdout {
        check_unique_names(&jobs)?;
    }

    let results: Vec<(PathBuf, Result<String>)> = jobs
        .par_iter()
        .map(|(file, name)| {
            let result = finalize_file(finalizer, file, name).and_then(|data| {
                if to_stdout {
                    return Ok(data);
                }
                let target = output_path(args.out_dir.as_deref(), name);
                write_output(&target, &data)?;
                Ok(target.display().to_string())
            });
            ((*file).clone(), result)
        })
        .collect();

    let mut failed = 0usize;
    for (file, result) in results {
        match result {
            Ok(data) if to_stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(data.as_bytes())?;
                stdout.flush()?;
            }
            Ok(target) => log!("assets"; "{} -> {}", file.display(), target),
            Err(e) => {
                failed += 1;
                log!("error"; "{}: {:#}", file.display(), e);
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} files failed", args.files.len());
    }
    Ok(())
}

/// Two files with the same logical name would write the same output file.
fn check_unique_names(jobs: &[(&PathBuf, String)]) -> Result<()> {
    let mut seen: HashMap<&str, &PathBuf> = HashMap::new();
    for (file, name) in jobs {
        if let Some(previous) = seen.insert(name.as_str(), *file) {
            bail!(
                "`{}` and `{}` both map to `{name}.js`; pass them in separate runs",
                previous.display(),
                file.display()
            );
        }
    }
    Ok(())
}

fn finalize_file(finalizer: &Finalizer, file: &Path, name: &str) -> Result<String> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("failed to read `{}`", file.display()))?;
    let request = CompressionRequest::new(source, name, file);
    let output = finalizer.compress(&request)?;
    Ok(output.into_data())
}

/// `<out_dir>/<name>.js`, or `<name>.js` in the current directory.
fn output_path(out_dir: Option<&Path>, name: &str) -> PathBuf {
    let file = format!("{name}.js");
    match out_dir {
        Some(dir) => dir.join(file),
        None => PathBuf::from(file),
    }
}

fn write_output(target: &Path, data: &str) -> Result<()> {
    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(target, data).with_context(|| format!("failed to write `{}`", target.display()))
}
