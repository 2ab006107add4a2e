//! Directory batch processing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indicatif::ProgressBar;

use docoutline::{has_pdf_extension, render, JsonFormat, OutlineExtractor};

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// JSON files written
    pub written: Vec<PathBuf>,
    /// Inputs that could not be written, with the reason
    pub failed: Vec<(PathBuf, String)>,
    /// The input directory was missing and has been created
    pub created_input: bool,
}

/// PDF files directly inside `dir`, sorted by name.
pub fn collect_pdfs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && has_pdf_extension(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Write `<stem>.json` into `output` for every PDF in `input`.
///
/// One document failing never stops the run.
pub fn run(
    input: &Path,
    output: &Path,
    extractor: &OutlineExtractor,
    format: JsonFormat,
    progress: &ProgressBar,
) -> io::Result<BatchReport> {
    let mut report = BatchReport::default();

    if !input.exists() {
        fs::create_dir_all(input)?;
        report.created_input = true;
        return Ok(report);
    }
    fs::create_dir_all(output)?;

    let files = collect_pdfs(input)?;
    progress.set_length(files.len() as u64);

    for file in files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        progress.set_message(name);

        match write_outline(&file, output, extractor, format) {
            Ok(path) => report.written.push(path),
            Err(e) => {
                log::warn!("Failed to process {}: {}", file.display(), e);
                report.failed.push((file, e.to_string()));
            }
        }
        progress.inc(1);
    }

    Ok(report)
}

fn write_outline(
    file: &Path,
    output: &Path,
    extractor: &OutlineExtractor,
    format: JsonFormat,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let outline = extractor.extract_file(file);
    let json = render::to_json(&outline, format)?;

    let stem = file.file_stem().unwrap_or_default().to_string_lossy();
    let target = output.join(format!("{}.json", stem));
    fs::write(&target, json)?;
    Ok(target)
}
