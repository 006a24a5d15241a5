use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::blurring::domain::region_blurrer::RegionBlurrer;
use crate::blurring::infrastructure::cpu_rectangular_blurrer::CpuRectangularBlurrer;
use crate::imaging::domain::image_reader::ImageReader;
use crate::imaging::domain::image_writer::ImageWriter;
use crate::imaging::domain::ImageIoError;
use crate::imaging::infrastructure::image_file_reader::ImageFileReader;
use crate::imaging::infrastructure::image_file_writer::ImageFileWriter;
use crate::matching::orientation::{Orientation, ORIENTATION_PAIRS};
use crate::matching::region_search::{SearchMiss, SqDiffSearcher, TemplateSearcher};
use crate::matching::selector::{accept, keep_better, select_best, Candidate};
use crate::matching::similarity::{gray_view, gray_window, GaussianSsimScorer, SimilarityScorer};
use crate::pipeline::pipeline_logger::{NullPipelineLogger, PipelineLogger};
use crate::preprocessing::{prepare_input, prepare_mask, PreparedInput, PreparedMask};
use crate::shared::config::RedactionConfig;
use crate::shared::error::{RedactError, SearchWarning};
use crate::shared::rect::Rect;

/// Outcome of a successful run.
#[derive(Clone, Debug, PartialEq)]
pub struct RedactionReport {
    /// Best match in input image coordinates.
    pub matched: Rect,
    /// `matched` grown by the blur margin and clamped to the image.
    pub blurred: Rect,
    pub similarity: f64,
    pub mask_index: usize,
    pub mask_path: PathBuf,
    pub input_orientation: Orientation,
    pub mask_orientation: Orientation,
    /// Recoverable problems skipped along the way, in encounter order.
    pub warnings: Vec<SearchWarning>,
    /// `false` for dry runs.
    pub written: bool,
}

/// Single-image redaction pipeline:
/// read → prepare → search every mask → select → blur → write.
pub struct RedactImageUseCase {
    reader: Box<dyn ImageReader>,
    writer: Box<dyn ImageWriter>,
    searcher: Box<dyn TemplateSearcher>,
    scorer: Box<dyn SimilarityScorer>,
    blurrer: Box<dyn RegionBlurrer>,
    logger: Box<dyn PipelineLogger>,
}

impl RedactImageUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        searcher: Box<dyn TemplateSearcher>,
        scorer: Box<dyn SimilarityScorer>,
        blurrer: Box<dyn RegionBlurrer>,
    ) -> Self {
        Self {
            reader,
            writer,
            searcher,
            scorer,
            blurrer,
            logger: Box::new(NullPipelineLogger),
        }
    }

    /// File-backed pipeline with the default search, scoring and blur
    /// implementations, blurring with the config's kernel settings.
    /// The config is validated before any collaborator is built.
    pub fn from_config(config: &RedactionConfig) -> Result<Self, RedactError> {
        config.validate()?;
        Ok(Self::new(
            Box::new(ImageFileReader::new()),
            Box::new(ImageFileWriter::new()),
            Box::new(SqDiffSearcher::new()),
            Box::new(GaussianSsimScorer::new()),
            Box::new(CpuRectangularBlurrer::new(
                config.blur_kernel_size,
                config.blur_deviation,
            )?),
        ))
    }

    pub fn with_logger(mut self, logger: Box<dyn PipelineLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Runs the full pipeline. Nothing is written unless a match scores
    /// strictly above `config.min_similarity`.
    pub fn execute(&mut self, config: &RedactionConfig) -> Result<RedactionReport, RedactError> {
        config.validate()?;
        let started = Instant::now();

        let stage = Instant::now();
        let mut frame = self
            .reader
            .read(&config.input_path)
            .map_err(|source| RedactError::InputDecode {
                path: config.input_path.clone(),
                source,
            })?;
        let input = prepare_input(&frame, config.threshold).ok_or_else(|| {
            RedactError::InputDecode {
                path: config.input_path.clone(),
                source: ImageIoError::InvalidBuffer {
                    width: frame.width(),
                    height: frame.height(),
                    channels: frame.channels(),
                },
            }
        })?;
        self.logger.timing("preprocess", elapsed_ms(stage));
        log::debug!(
            "Prepared {}x{} input with threshold {}",
            frame.width(),
            frame.height(),
            config.threshold
        );

        let mut warnings = Vec::new();
        let mut best: Option<Candidate> = None;
        let mut valid_masks = 0usize;
        let total = config.mask_paths.len();

        for (mask_index, mask_path) in config.mask_paths.iter().enumerate() {
            if let Some(deadline) = config.deadline {
                if started.elapsed() > deadline {
                    return Err(RedactError::DeadlineExceeded(deadline));
                }
            }
            self.logger.progress(mask_index + 1, total);

            let mask = match self.load_mask(mask_path) {
                Ok(mask) => mask,
                Err(warning) => {
                    log::warn!("{warning}");
                    warnings.push(warning);
                    continue;
                }
            };
            valid_masks += 1;

            let stage = Instant::now();
            let mut candidates = Vec::with_capacity(ORIENTATION_PAIRS.len());
            for (input_o, mask_o) in ORIENTATION_PAIRS {
                match self.evaluate(&input, &mask, mask_index, input_o, mask_o, config) {
                    Ok(candidate) => {
                        log::debug!(
                            "Mask #{mask_index} ({} input, {} mask) matched {} with similarity {:.6}",
                            input_o.as_str(),
                            mask_o.as_str(),
                            candidate.rect,
                            candidate.score
                        );
                        self.logger.metric("similarity", candidate.score);
                        candidates.push(candidate);
                    }
                    Err(warning) => {
                        if !warnings.contains(&warning) {
                            log::warn!("{warning}");
                            warnings.push(warning);
                        }
                    }
                }
            }
            if let Some(mask_best) = select_best(candidates) {
                best = keep_better(best, mask_best);
            }
            self.logger.timing("match", elapsed_ms(stage));
        }

        if valid_masks == 0 {
            return Err(RedactError::NoValidMasks { count: total });
        }

        let chosen = accept(best, config.min_similarity)?;
        log::info!(
            "Best match: mask #{} at {} with similarity {:.6}",
            chosen.mask_index,
            chosen.rect,
            chosen.score
        );

        let stage = Instant::now();
        let blurred = chosen
            .rect
            .expand(&config.blur_margin)
            .clamp_to(frame.width(), frame.height())
            .unwrap_or(chosen.rect);
        self.blurrer.blur(&mut frame, &blurred)?;
        self.logger.timing("blur", elapsed_ms(stage));

        let written = if config.dry_run {
            log::info!(
                "Dry run: not writing {}",
                config.output_path.display()
            );
            false
        } else {
            let stage = Instant::now();
            self.writer
                .write(&config.output_path, &frame)
                .map_err(|source| RedactError::OutputWrite {
                    path: config.output_path.clone(),
                    source,
                })?;
            self.logger.timing("write", elapsed_ms(stage));
            true
        };

        self.logger.summary();

        Ok(RedactionReport {
            matched: chosen.rect,
            blurred,
            similarity: chosen.score,
            mask_index: chosen.mask_index,
            mask_path: config.mask_paths[chosen.mask_index].clone(),
            input_orientation: chosen.input,
            mask_orientation: chosen.mask,
            warnings,
            written,
        })
    }

    fn load_mask(&self, path: &Path) -> Result<PreparedMask, SearchWarning> {
        let frame = self.reader.read(path).map_err(|e| SearchWarning::MaskDecode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        prepare_mask(&frame).ok_or_else(|| SearchWarning::MaskDecode {
            path: path.to_path_buf(),
            reason: format!("unsupported layout with {} channel(s)", frame.channels()),
        })
    }

    /// Searches the thresholded input for one mask orientation and scores
    /// the hit against the un-thresholded input of the same orientation.
    fn evaluate(
        &self,
        input: &PreparedInput,
        mask: &PreparedMask,
        mask_index: usize,
        input_o: Orientation,
        mask_o: Orientation,
        config: &RedactionConfig,
    ) -> Result<Candidate, SearchWarning> {
        let haystack = input.variant(input_o);
        let needle = mask.variant(mask_o);
        let (mask_width, mask_height) = needle.dimensions();

        let hit = self
            .searcher
            .search(&haystack.binary, &config.roi, needle)
            .map_err(|miss| match miss {
                SearchMiss::EmptyRoi { anchored } => SearchWarning::EmptyRoi {
                    mask_index,
                    input: input_o,
                    mask: mask_o,
                    roi: anchored,
                },
                SearchMiss::NeedleTooLarge { window } => SearchWarning::NeedleTooLarge {
                    mask_index,
                    mask_width,
                    mask_height,
                    roi: window,
                },
            })?;

        let rect = hit.absolute_rect(mask_width, mask_height);
        let score = gray_window(&haystack.gray, &rect)
            .and_then(|window| self.scorer.score(window, gray_view(needle)))
            .ok_or(SearchWarning::UnscorableWindow { mask_index, rect })?;

        Ok(Candidate {
            rect,
            score,
            mask_index,
            input: input_o,
            mask: mask_o,
        })
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
