use tracing::{debug, info, instrument};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::thread;

use crate::image_pipeline::{
    common::error::{PgxError, Result},
    pgx::{DecodeConfig, PgxDecoder, PgxReader},
    stats::ImageSummary,
};

pub struct PgxStatsPipeline<R: PgxReader = PgxDecoder> {
    reader: R,
}

impl PgxStatsPipeline<PgxDecoder> {
    pub fn new(config: DecodeConfig) -> Self {
        Self {
            reader: PgxDecoder::new(config),
        }
    }

    pub fn config(&self) -> &DecodeConfig {
        self.reader.config()
    }

    pub fn set_config(&mut self, config: DecodeConfig) {
        self.reader = PgxDecoder::new(config);
    }
}

impl Default for PgxStatsPipeline<PgxDecoder> {
    fn default() -> Self {
        Self::new(DecodeConfig::default())
    }
}

impl<R: PgxReader> PgxStatsPipeline<R> {
    pub fn with_custom(reader: R) -> Self {
        Self { reader }
    }

    #[instrument(skip(self, input))]
    pub fn summarize(&self, name: &str, input: &mut dyn BufRead) -> Result<ImageSummary> {
        let grid = {
            let _span = tracing::info_span!("decode_pgx").entered();
            self.reader.read_pgx(name, input)?
        };

        let summary = {
            let _span = tracing::info_span!("compute_stats",
                height = grid.height(),
                width = grid.width()
            ).entered();
            ImageSummary::new(name, &grid)
        };

        debug!(
            name,
            kind = %summary.element_kind,
            height = grid.height(),
            width = grid.width(),
            "Summary complete"
        );
        Ok(summary)
    }

    /// Decodes the file at `path` and summarizes it under `name`.
    ///
    /// Errors carry the file path so the failing input can be located.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn summarize_file<P: AsRef<Path>>(&self, name: &str, path: P) -> Result<ImageSummary> {
        let path = path.as_ref();
        let source_name = path.display().to_string();

        info!(name, input = %path.display(), "Summarizing file");

        let mut input = {
            let _span = tracing::info_span!("open_input_file").entered();
            let file = File::open(path).map_err(|e| PgxError::io(&source_name, e))?;
            BufReader::new(file)
        };

        let grid = {
            let _span = tracing::info_span!("decode_pgx").entered();
            self.reader.read_pgx(&source_name, &mut input)?
        };

        Ok(ImageSummary::new(name, &grid))
    }

    /// Summarizes each `(name, path)` in order. The first failure aborts the batch.
    pub fn summarize_batch<N, P>(&self, inputs: &[(N, P)]) -> Result<Vec<ImageSummary>>
    where
        N: AsRef<str>,
        P: AsRef<Path>,
    {
        info!(count = inputs.len(), "Summarizing batch");
        inputs
            .iter()
            .map(|(name, path)| self.summarize_file(name.as_ref(), path))
            .collect()
    }

    /// Like [`summarize_batch`](Self::summarize_batch), decoding every file on
    /// its own thread. Summaries keep the input order; on failure the error of
    /// the earliest failing input is returned.
    pub fn summarize_batch_parallel<N, P>(&self, inputs: &[(N, P)]) -> Result<Vec<ImageSummary>>
    where
        R: Sync,
        N: AsRef<str> + Sync,
        P: AsRef<Path> + Sync,
    {
        info!(count = inputs.len(), "Summarizing batch in parallel");
        thread::scope(|scope| {
            let handles: Vec<_> = inputs
                .iter()
                .map(|(name, path)| scope.spawn(move || self.summarize_file(name.as_ref(), path)))
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        })
    }
}
