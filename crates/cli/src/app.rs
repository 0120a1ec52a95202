//! The conversion flows behind the command line.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::AsyncBufRead;
use tokio::sync::mpsc;
use tracing::info;

use convertino_core::{
    estimate_sizes, task::ConversionRequest, AudioBuffer, AudioCodec, BatchScheduler,
    ConversionTask, Encoding, FileReport, ReportFormat,
};

use crate::error::{AppError, UsageError};
use crate::interactive::{parse_choice, prompt_choice, MENU};
use crate::report;

/// Buffer size for batch progress notifications
const PROGRESS_BUFFER_SIZE: usize = 256;

/// Runs one invocation against a codec.
pub struct App<C: AudioCodec + ?Sized> {
    codec: Arc<C>,
    format: ReportFormat,
}

impl<C: AudioCodec + ?Sized + 'static> App<C> {
    pub fn new(codec: Arc<C>, format: ReportFormat) -> Self {
        Self { codec, format }
    }

    /// Dispatches on the input kind and whether an encoding was given.
    ///
    /// | input     | encoding | flow                          |
    /// |-----------|----------|-------------------------------|
    /// | directory | none     | missing encoding error        |
    /// | directory | some     | batch conversion              |
    /// | file      | some     | single conversion             |
    /// | file      | none     | size estimates, then prompt   |
    ///
    /// Reports go to `out`. With JSON reports the estimates and the prompt
    /// go to `console` so that `out` stays a single JSON document.
    pub async fn run<R, W, P>(
        &self,
        path: &Path,
        encoding: Option<Encoding>,
        input: &mut R,
        out: &mut W,
        console: &mut P,
    ) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        P: Write,
    {
        let is_dir = tokio::fs::metadata(path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

        match (is_dir, encoding) {
            (true, None) => Err(UsageError::MissingEncodingArgument.into()),
            (true, Some(encoding)) => self.convert_directory(path, encoding, out).await,
            (false, Some(encoding)) => self.convert_file(path, encoding, out).await,
            (false, None) => self.choose_and_convert(path, input, out, console).await,
        }
    }

    async fn convert_directory<W: Write>(
        &self,
        directory: &Path,
        encoding: Encoding,
        out: &mut W,
    ) -> Result<(), AppError> {
        let encodings = [encoding];

        if self.format == ReportFormat::Json {
            let report = BatchScheduler::new(Arc::clone(&self.codec))
                .run_batch(directory, &encodings)
                .await?;
            report::print_json(out, &report)?;
            return Ok(());
        }

        writeln!(
            out,
            "Converting files in {} to {}...",
            directory.display(),
            encoding
        )?;

        let (tx, mut rx) = mpsc::channel(PROGRESS_BUFFER_SIZE);
        let scheduler = BatchScheduler::new(Arc::clone(&self.codec)).with_progress(tx);

        // The scheduler owns the sender, so the channel closes when the batch ends
        let batch = async move { scheduler.run_batch(directory, &encodings).await };
        let printer = async {
            while let Some(progress) = rx.recv().await {
                report::print_progress(&mut *out, &progress)?;
            }
            Ok::<_, std::io::Error>(())
        };

        let (result, printed) = tokio::join!(batch, printer);
        printed?;
        let report = result?;

        report::print_batch_report(out, &report)?;
        Ok(())
    }

    async fn convert_file<W: Write>(
        &self,
        path: &Path,
        encoding: Encoding,
        out: &mut W,
    ) -> Result<(), AppError> {
        if self.format == ReportFormat::Text {
            writeln!(out, "Converting {} to {}...", path.display(), encoding)?;
        }

        let start = Instant::now();
        let task = ConversionTask::new(Arc::clone(&self.codec));
        let buffer = task.load(path).await.map_err(AppError::UnreadableInput)?;

        let report = convert_single(&task, path, buffer, encoding, start).await;
        self.print_file(out, &report)
    }

    async fn choose_and_convert<R, W, P>(
        &self,
        path: &Path,
        input: &mut R,
        out: &mut W,
        console: &mut P,
    ) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        P: Write,
    {
        let task = ConversionTask::new(Arc::clone(&self.codec));
        let buffer = task.load(path).await.map_err(AppError::UnreadableInput)?;

        let estimates = estimate_sizes(Arc::clone(&self.codec), Arc::clone(&buffer), &MENU).await;

        let mut dialog: &mut dyn Write = match self.format {
            ReportFormat::Json => &mut *console,
            ReportFormat::Text => &mut *out,
        };
        report::print_estimates(&mut dialog, &estimates)?;
        let answer = prompt_choice(input, &mut dialog).await?;

        let encoding = parse_choice(&answer)?;
        info!(input = %path.display(), encoding = %encoding, "Format chosen");

        let report = convert_single(&task, path, buffer, encoding, Instant::now()).await;
        self.print_file(out, &report)
    }

    fn print_file<W: Write>(&self, out: &mut W, report: &FileReport) -> Result<(), AppError> {
        match self.format {
            ReportFormat::Json => report::print_json(out, report)?,
            ReportFormat::Text => {
                report::print_file_report(out, report)?;
                report::print_elapsed(out, report.duration_ms)?;
            }
        }
        Ok(())
    }
}

/// Writes one encoding of a decoded file next to it.
async fn convert_single<C: AudioCodec + ?Sized>(
    task: &ConversionTask<C>,
    path: &Path,
    buffer: Arc<AudioBuffer>,
    encoding: Encoding,
    start: Instant,
) -> FileReport {
    let request = ConversionRequest::new(path, vec![encoding]);
    let result = task
        .convert_buffer(buffer, &request.directory, &request.base_name, encoding)
        .await;

    FileReport {
        input_path: request.input_path,
        results: vec![result],
        duration_ms: start.elapsed().as_millis() as u64,
    }
}
