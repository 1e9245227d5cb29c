use platen_fonts::FontStore;
use platen_impose::{calculate_layout, ImposeError, SheetSpec};
use platen_press::{
    add_crop_marks, apply_bleed, convert_to_cmyk, ColorMode, GhostscriptConfig, PressError,
};
use platen_render::{AssetCatalog, DocumentBuilder};
use platen_resolver::{resolve_page, ResolvedPage};
use platen_scene::{Page, Record, Scene, SceneError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),

    #[error("invalid layout: {0}")]
    Impose(#[from] ImposeError),

    #[error(transparent)]
    Press(#[from] PressError),

    #[error("merge job has no records")]
    NoRecords,
}

/// Per-record progress, monotone within one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MergeOptions {
    /// Document title; defaults to the scene name.
    pub title: Option<String>,
    pub cmyk: bool,
    pub crop_marks: bool,
    /// Overrides the scene page's own bleed when set.
    pub bleed_mm: Option<f32>,
    pub ghostscript: GhostscriptConfig,
}

/// One merge run: a scene, the records to substitute into it, and an
/// optional sheet layout that switches output from one-page-per-record
/// to imposed label sheets.
#[derive(Debug)]
pub struct MergeJob {
    pub scene: Scene,
    pub records: Vec<Record>,
    pub layout: Option<SheetSpec>,
    pub options: MergeOptions,
}

#[derive(Debug)]
pub struct MergeOutput {
    pub pdf: Vec<u8>,
    /// Output pages (sheets, for imposed jobs).
    pub pages: usize,
    /// Label instances placed; zero for non-imposed jobs.
    pub labels: usize,
    pub elapsed: Duration,
    /// `None` when no conversion was requested.
    pub color_mode: Option<ColorMode>,
    /// Human-readable reasons for any degraded stage.
    pub fallbacks: Vec<String>,
}

/// Runs a whole merge job. Records are processed sequentially against
/// the immutable scene; per-record problems degrade inside the
/// resolver and renderer, so the only hard failures here are input
/// errors and structural PDF errors.
pub async fn run_merge(
    job: MergeJob,
    fonts: &FontStore,
    assets: &AssetCatalog,
    progress: Option<&watch::Sender<Progress>>,
) -> Result<MergeOutput, PipelineError> {
    let started = Instant::now();
    job.scene.validate()?;
    if job.records.is_empty() {
        return Err(PipelineError::NoRecords);
    }

    // Scoped so the non-Send `DocumentBuilder` is gone before the
    // first await; otherwise the returned future is not Send.
    let (labels, pages, mut pdf) = {
        let title = job.options.title.as_deref().unwrap_or(&job.scene.name);
        let mut builder = DocumentBuilder::new(title);

        let labels = match &job.layout {
            Some(spec) => impose_labels(&mut builder, &job, spec, fonts, assets, progress)?,
            None => {
                sequential_pages(&mut builder, &job, fonts, assets, progress);
                0
            }
        };

        let pages = builder.page_count();
        (labels, pages, builder.finish())
    };
    let mut fallbacks = Vec::new();

    let bleed = job
        .options
        .bleed_mm
        .or_else(|| job.scene.pages.first().and_then(|p| p.bleed_mm));
    if let Some(bleed) = bleed {
        pdf = apply_bleed(&pdf, bleed)?;
    }
    if job.options.crop_marks {
        pdf = add_crop_marks(&pdf)?;
    }

    let mut color_mode = None;
    if job.options.cmyk {
        let outcome = convert_to_cmyk(&pdf, &job.options.ghostscript).await;
        pdf = outcome.pdf;
        color_mode = Some(outcome.mode);
        if let Some(reason) = outcome.fallback_reason {
            fallbacks.push(format!("color conversion: {}", reason));
        }
    }

    log::info!(
        "merge complete: {} records, {} pages, {} labels in {:?}",
        job.records.len(),
        pages,
        labels,
        started.elapsed()
    );

    Ok(MergeOutput {
        pdf,
        pages,
        labels,
        elapsed: started.elapsed(),
        color_mode,
        fallbacks,
    })
}

/// One output page per record per scene page, in record order.
fn sequential_pages(
    builder: &mut DocumentBuilder,
    job: &MergeJob,
    fonts: &FontStore,
    assets: &AssetCatalog,
    progress: Option<&watch::Sender<Progress>>,
) {
    let total = job.records.len();
    for (index, record) in job.records.iter().enumerate() {
        for page in &job.scene.pages {
            let resolved = resolve_page(page, record, index, fonts);
            builder.add_page(&resolved, fonts, assets);
        }
        notify(progress, index + 1, total);
    }
}

/// Imposed flow: instance `i` lands at grid slot `i % per_sheet` on
/// sheet `i / per_sheet`. Returns the number of labels placed.
fn impose_labels(
    builder: &mut DocumentBuilder,
    job: &MergeJob,
    spec: &SheetSpec,
    fonts: &FontStore,
    assets: &AssetCatalog,
    progress: Option<&watch::Sender<Progress>>,
) -> Result<usize, PipelineError> {
    let layout = calculate_layout(spec)?;
    let page = design_page(&job.scene)?;
    let total = job.records.len();

    for (sheet_index, chunk) in job.records.chunks(layout.per_sheet).enumerate() {
        let mut resolved: Vec<ResolvedPage> = Vec::with_capacity(chunk.len());
        for (slot, record) in chunk.iter().enumerate() {
            let index = sheet_index * layout.per_sheet + slot;
            resolved.push(resolve_page(page, record, index, fonts));
            notify(progress, index + 1, total);
        }
        let placements: Vec<(&ResolvedPage, (f32, f32))> = resolved
            .iter()
            .enumerate()
            .map(|(slot, instance)| (instance, layout.position(slot)))
            .collect();
        builder.add_sheet(spec.sheet, &placements, fonts, assets);
    }

    Ok(total)
}

fn design_page(scene: &Scene) -> Result<&Page, PipelineError> {
    if scene.pages.len() > 1 {
        log::warn!(
            "label export uses the first scene page; {} further pages ignored",
            scene.pages.len() - 1
        );
    }
    scene
        .pages
        .first()
        .ok_or(PipelineError::Scene(SceneError::EmptyScene))
}

fn notify(progress: Option<&watch::Sender<Progress>>, current: usize, total: usize) {
    if let Some(tx) = progress {
        // A dropped receiver only means nobody is watching.
        let _ = tx.send(Progress { current, total });
    }
}
