//! Printing of estimates, progress and reports.

use serde::Serialize;
use std::io::Write;

use convertino_core::{
    task::ConversionOutcome, BatchProgress, BatchReport, FileReport, SizeEstimate,
};

/// Writes `value` as pretty JSON followed by a newline.
pub fn print_json<W: Write, T: Serialize>(
    out: &mut W,
    value: &T,
) -> Result<(), serde_json::Error> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out).map_err(serde_json::Error::io)
}

pub fn print_estimates<W: Write>(out: &mut W, estimates: &[SizeEstimate]) -> std::io::Result<()> {
    for estimate in estimates {
        let name = estimate.encoding.as_str().to_uppercase();
        match (&estimate.bytes, estimate.megabytes()) {
            (Err(reason), _) => {
                writeln!(out, "Estimated {} size: unavailable ({})", name, reason)?
            }
            (Ok(_), mb) => writeln!(
                out,
                "Estimated {} size: {:.2} MB",
                name,
                mb.unwrap_or_default()
            )?,
        }
    }
    Ok(())
}

pub fn print_progress<W: Write>(out: &mut W, progress: &BatchProgress) -> std::io::Result<()> {
    match progress {
        BatchProgress::Started { total, width, .. } => {
            writeln!(out, "Found {} files, using {} workers", total, width)
        }
        BatchProgress::FileCompleted {
            path,
            succeeded,
            failed,
            completed,
            total,
        } => writeln!(
            out,
            "[{}/{}] {} ({} written, {} failed)",
            completed,
            total,
            path.display(),
            succeeded,
            failed
        ),
        BatchProgress::Finished { .. } => Ok(()),
    }
}

pub fn print_file_report<W: Write>(out: &mut W, report: &FileReport) -> std::io::Result<()> {
    for result in &report.results {
        match (&result.outcome, result.encoding) {
            (ConversionOutcome::Converted { path, .. }, _) => {
                writeln!(out, "Converted file saved as: {}", path.display())?
            }
            (ConversionOutcome::Failed { error }, Some(encoding)) => writeln!(
                out,
                "Failed to convert {} to {}: {}",
                report.input_path.display(),
                encoding,
                error
            )?,
            (ConversionOutcome::Failed { error }, None) => writeln!(
                out,
                "Could not read {}: {}",
                report.input_path.display(),
                error
            )?,
        }
    }
    Ok(())
}

pub fn print_elapsed<W: Write>(out: &mut W, millis: u64) -> std::io::Result<()> {
    writeln!(out, "Elapsed time: {:.2} seconds", millis as f64 / 1000.0)
}

pub fn print_batch_report<W: Write>(out: &mut W, report: &BatchReport) -> std::io::Result<()> {
    for file in &report.files {
        print_file_report(out, file)?;
    }
    writeln!(
        out,
        "{} files: {} outputs written, {} failed, {} fully converted",
        report.file_count(),
        report.succeeded(),
        report.failed(),
        report.files_fully_converted()
    )?;
    print_elapsed(out, report.elapsed_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use convertino_core::{ConversionResult, Encoding};
    use std::path::PathBuf;

    fn render<F: FnOnce(&mut Vec<u8>) -> std::io::Result<()>>(f: F) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_estimates_use_two_decimals() {
        let estimates = vec![
            SizeEstimate {
                encoding: Encoding::Wav,
                bytes: Ok(10 * 1024 * 1024 + 512 * 1024),
            },
            SizeEstimate {
                encoding: Encoding::Mp3,
                bytes: Err("ffmpeg not found".to_string()),
            },
        ];
        let text = render(|out| print_estimates(out, &estimates));
        assert_eq!(
            text,
            "Estimated WAV size: 10.50 MB\nEstimated MP3 size: unavailable (ffmpeg not found)\n"
        );
    }

    #[test]
    fn test_file_report_lines() {
        let report = FileReport {
            input_path: PathBuf::from("/in/a.wav"),
            results: vec![
                ConversionResult::converted(Encoding::Aif, PathBuf::from("/in/a.aiff"), 100),
                ConversionResult::failed_with_message(Some(Encoding::Mp3), "encoder missing"),
            ],
            duration_ms: 12,
        };
        let text = render(|out| print_file_report(out, &report));
        assert!(text.contains("Converted file saved as: /in/a.aiff"));
        assert!(text.contains("Failed to convert /in/a.wav to mp3: encoder missing"));
    }

    #[test]
    fn test_elapsed_format() {
        assert_eq!(
            render(|out| print_elapsed(out, 1234)),
            "Elapsed time: 1.23 seconds\n"
        );
    }

    #[test]
    fn test_progress_lines() {
        let text = render(|out| {
            print_progress(
                out,
                &BatchProgress::FileCompleted {
                    path: PathBuf::from("/in/b.mp3"),
                    succeeded: 0,
                    failed: 1,
                    completed: 2,
                    total: 3,
                },
            )
        });
        assert_eq!(text, "[2/3] /in/b.mp3 (0 written, 1 failed)\n");
    }
}
