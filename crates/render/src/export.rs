//! Frame export.
//!
//! Offline export renders frame `i` of `N` at loop progress `i / N`, so the
//! last frame leads back into the first without repeating it. The
//! [`ExportWorker`] runs that loop on a background thread and reports over a
//! channel; the only state it shares with the caller is the cancel flag.
//! Live capture is driven by elapsed time instead and ends through a
//! [`StopLatch`]. Encoding the frames is left to the caller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;

use motif_core::animation;
use motif_core::error::MotifError;
use motif_core::state::AppState;
use resvg::tiny_skia::Pixmap;

use crate::assets::ImageStore;
use crate::raster::RasterRenderer;
use crate::texture::GrainTexture;
use crate::{FrameRequest, RenderResult};

/// Frames buffered between the worker and the consumer.
const CHANNEL_CAPACITY: usize = 4;

/// Everything the worker needs, moved to it in one piece.
#[derive(Debug, Clone)]
pub struct ExportJob {
    /// The document as JSON.
    pub state_json: String,
    pub images: ImageStore,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Loop length in seconds.
    pub duration: f64,
    pub grain: Option<GrainTexture>,
    pub transparent_background: bool,
}

impl ExportJob {
    /// Serializes `state`. Timing defaults to the active layer's animation
    /// settings.
    pub fn new(state: &AppState, images: ImageStore, width: u32, height: u32) -> RenderResult<Self> {
        let timing = state
            .active_layer()
            .map(|l| l.config().animation)
            .unwrap_or_default();
        Ok(Self {
            state_json: serde_json::to_string(state)?,
            images,
            width,
            height,
            fps: timing.fps,
            duration: timing.duration,
            grain: None,
            transparent_background: false,
        })
    }

    pub fn with_timing(mut self, fps: u32, duration: f64) -> Self {
        self.fps = fps;
        self.duration = duration;
        self
    }

    pub fn with_grain(mut self, grain: GrainTexture) -> Self {
        self.grain = Some(grain);
        self
    }

    pub fn with_transparent_background(mut self, transparent: bool) -> Self {
        self.transparent_background = transparent;
        self
    }

    /// Frames in one loop, at least 1.
    pub fn frame_count(&self) -> u32 {
        animation::total_frames(self.fps, self.duration)
    }

    pub fn state(&self) -> RenderResult<AppState> {
        Ok(serde_json::from_str(&self.state_json)?)
    }

    fn surface(&self) -> RenderResult<Pixmap> {
        if self.width == 0 || self.height == 0 {
            return Err(MotifError::InvalidDimensions);
        }
        Pixmap::new(self.width, self.height).ok_or(MotifError::InvalidDimensions)
    }

    fn request<'a>(&'a self, state: &'a AppState) -> FrameRequest<'a> {
        let request = FrameRequest::new(state, &self.images).with_transparent_background(self.transparent_background);
        match &self.grain {
            Some(g) => request.with_grain(g),
            None => request,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ExportEvent {
    Started { total: u32 },
    Progress { done: u32, total: u32 },
    Frame { index: u32, pixmap: Pixmap },
    Finished { frames: u32 },
    Failed { message: String },
}

/// Renders every frame of `job`, handing events to `sink`.
///
/// `cancel` is checked before each frame; a cancelled run returns the number
/// of frames already emitted without a `Finished` event. A sink error aborts
/// the run.
#[tracing::instrument(skip_all, fields(width = job.width, height = job.height, fps = job.fps))]
pub fn render_frames<F>(job: &ExportJob, renderer: &RasterRenderer, cancel: &AtomicBool, mut sink: F) -> RenderResult<u32>
where
    F: FnMut(ExportEvent) -> RenderResult<()>,
{
    let state = job.state()?;
    let total = job.frame_count();
    sink(ExportEvent::Started { total })?;

    for index in 0..total {
        if cancel.load(Ordering::Relaxed) {
            tracing::debug!(done = index, total, "export cancelled");
            return Ok(index);
        }
        let mut pixmap = job.surface()?;
        let request = job
            .request(&state)
            .at_progress(animation::frame_progress(index, total));
        renderer.render(&mut pixmap, &request)?;
        sink(ExportEvent::Frame { index, pixmap })?;
        sink(ExportEvent::Progress { done: index + 1, total })?;
    }

    sink(ExportEvent::Finished { frames: total })?;
    Ok(total)
}

/// Background export thread.
pub struct ExportWorker {
    cancel: Arc<AtomicBool>,
    events: mpsc::Receiver<ExportEvent>,
    handle: Option<JoinHandle<()>>,
}

impl ExportWorker {
    pub fn spawn(job: ExportJob, renderer: RasterRenderer) -> RenderResult<Self> {
        let cancel = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::sync_channel(CHANNEL_CAPACITY);
        let flag = Arc::clone(&cancel);

        let handle = std::thread::Builder::new()
            .name("motif-export".into())
            .spawn(move || {
                let result = render_frames(&job, &renderer, &flag, |event| {
                    tx.send(event)
                        .map_err(|_| MotifError::Export("event receiver dropped".into()))
                });
                if let Err(e) = result {
                    tracing::warn!(error = %e, "export failed");
                    let _ = tx.send(ExportEvent::Failed { message: e.to_string() });
                }
            })
            .map_err(|e| MotifError::Export(format!("spawn export thread: {e}")))?;

        Ok(Self {
            cancel,
            events: rx,
            handle: Some(handle),
        })
    }

    /// Stops the worker before its next frame.
    pub fn terminate(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn events(&self) -> &mpsc::Receiver<ExportEvent> {
        &self.events
    }

    /// Blocks for the next event; `None` once the worker is done.
    pub fn recv(&self) -> Option<ExportEvent> {
        self.events.recv().ok()
    }

    /// Stops the worker and waits for the thread to exit. Undelivered events
    /// are discarded.
    pub fn join(mut self) -> RenderResult<()> {
        self.terminate();
        while self.events.recv().is_ok() {}
        match self.handle.take() {
            Some(h) => h
                .join()
                .map_err(|_| MotifError::Export("export thread panicked".into())),
            None => Ok(()),
        }
    }
}

impl Drop for ExportWorker {
    fn drop(&mut self) {
        self.terminate();
    }
}

/// Single-use stop signal: the first `stop` wins, later calls are no-ops.
#[derive(Debug, Clone, Default)]
pub struct StopLatch {
    stopped: Arc<AtomicBool>,
}

impl StopLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` only for the call that actually stopped the latch.
    pub fn stop(&self) -> bool {
        !self.stopped.swap(true, Ordering::AcqRel)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Live capture: renders at whatever time `clock` (elapsed milliseconds)
/// reports until the loop duration has elapsed or `latch` is stopped
/// elsewhere. Returns the number of captured frames.
pub fn capture_live<C, F>(
    job: &ExportJob,
    renderer: &RasterRenderer,
    latch: &StopLatch,
    mut clock: C,
    mut sink: F,
) -> RenderResult<u32>
where
    C: FnMut() -> u64,
    F: FnMut(u32, Pixmap) -> RenderResult<()>,
{
    let state = job.state()?;
    let limit_ms = (job.duration.max(0.0) * 1000.0).round() as u64;
    let mut frames = 0;
    loop {
        let elapsed = clock();
        if elapsed >= limit_ms && latch.stop() {
            tracing::debug!(elapsed, frames, "live capture reached its duration");
        }
        if latch.is_stopped() {
            return Ok(frames);
        }
        let mut pixmap = job.surface()?;
        renderer.render(&mut pixmap, &job.request(&state).at(elapsed))?;
        sink(frames, pixmap)?;
        frames += 1;
    }
}
