//! The underlay editing session.
//!
//! [`UnderlaySession`] ties the pieces together for one editing session: it
//! owns the selected underlay, the pose accumulator fed by the gesture
//! recognizer, the view mode, the last preview, and the export tier.
//!
//! Rendering never reads accumulator state directly. Every render captures
//! the effective pose first, so a render in flight (see [`ExportJob`]) is
//! unaffected by gestures that arrive afterwards.

use std::sync::Arc;

use kurbo::Vec2;

use crate::config::{CanvasConfig, ExportResolution};
use crate::error::ExportError;
use crate::fit::AspectFit;
use crate::gesture::{GestureEvent, PoseAccumulator};
use crate::pose::Pose;
use crate::render::{output_pixels, render, ExportedRaster, InterpolationFilter, SourceImage};
use crate::transform::{ExportTransform, TransformComposer};

/// What the session is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// The live, manipulable underlay.
    #[default]
    Underlay,
    /// The last rendered preview.
    Preview,
    /// The photo picker is open.
    UnderlayPicker,
}

/// Receives exported rasters, e.g. to write them to a photo library.
pub trait ExportSink {
    fn save(&mut self, raster: ExportedRaster) -> Result<(), ExportError>;
}

impl<F> ExportSink for F
where
    F: FnMut(ExportedRaster) -> Result<(), ExportError>,
{
    fn save(&mut self, raster: ExportedRaster) -> Result<(), ExportError> {
        self(raster)
    }
}

/// Fit, compose, and render `source` at `output_side` pixels.
///
/// Errors are reported in order: source, then output size, before any
/// buffer is allocated.
pub fn render_underlay(
    source: &SourceImage,
    pose: &Pose,
    canvas: CanvasConfig,
    output_side: f64,
    filter: InterpolationFilter,
) -> Result<ExportedRaster, ExportError> {
    let fit_scale = AspectFit::new(canvas).fit_scale(source.width as f64, source.height as f64)?;
    let side = output_pixels(output_side)?;
    let transform =
        TransformComposer::new(canvas).compose(pose, fit_scale, side as f64, source.size())?;
    render(source, &transform, filter)
}

/// A self-contained export: source, pose snapshot, and target size.
///
/// Jobs are `Send` and can be run on any thread. Concurrent jobs share the
/// source read-only and each allocate their own output.
#[derive(Debug, Clone)]
pub struct ExportJob {
    source: Arc<SourceImage>,
    pose: Pose,
    canvas: CanvasConfig,
    output_side: u32,
    filter: InterpolationFilter,
}

impl ExportJob {
    /// The pose captured when the job was created.
    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn output_side(&self) -> u32 {
        self.output_side
    }

    pub fn filter(&self) -> InterpolationFilter {
        self.filter
    }

    pub fn with_filter(mut self, filter: InterpolationFilter) -> Self {
        self.filter = filter;
        self
    }

    #[tracing::instrument(skip(self), fields(output_side = self.output_side))]
    pub fn run(&self) -> Result<ExportedRaster, ExportError> {
        render_underlay(
            &self.source,
            &self.pose,
            self.canvas,
            self.output_side as f64,
            self.filter,
        )
    }
}

/// State for one underlay editing session.
#[derive(Debug, Clone)]
pub struct UnderlaySession {
    canvas: CanvasConfig,
    fit: AspectFit,
    composer: TransformComposer,
    mode: Mode,
    underlay: Option<Arc<SourceImage>>,
    accumulator: PoseAccumulator,
    preview: Option<ExportedRaster>,
    resolution: ExportResolution,
}

impl UnderlaySession {
    pub fn new(canvas: CanvasConfig) -> Self {
        Self {
            canvas,
            fit: AspectFit::new(canvas),
            composer: TransformComposer::new(canvas),
            mode: Mode::default(),
            underlay: None,
            accumulator: PoseAccumulator::new(),
            preview: None,
            resolution: ExportResolution::default(),
        }
    }

    pub fn canvas(&self) -> CanvasConfig {
        self.canvas
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn underlay(&self) -> Option<&SourceImage> {
        self.underlay.as_deref()
    }

    pub fn preview(&self) -> Option<&ExportedRaster> {
        self.preview.as_ref()
    }

    pub fn resolution(&self) -> ExportResolution {
        self.resolution
    }

    pub fn set_resolution(&mut self, resolution: ExportResolution) {
        self.resolution = resolution;
    }

    /// Advance to the next export tier and return it.
    pub fn cycle_resolution(&mut self) -> ExportResolution {
        self.resolution = self.resolution.next();
        self.resolution
    }

    pub fn accumulator(&self) -> &PoseAccumulator {
        &self.accumulator
    }

    /// The pose currently on screen, live gestures included.
    pub fn pose(&self) -> Pose {
        self.accumulator.effective_pose()
    }

    // ----- Underlay selection and mode -----

    /// Use `image` as the new underlay. The pose returns to identity and any
    /// preview of the previous underlay is dropped.
    pub fn select_underlay(&mut self, image: SourceImage) {
        tracing::debug!(width = image.width, height = image.height, "underlay selected");
        self.underlay = Some(Arc::new(image));
        self.accumulator.reset();
        self.preview = None;
        self.mode = Mode::Underlay;
    }

    pub fn open_picker(&mut self) {
        self.mode = Mode::UnderlayPicker;
    }

    /// Picker dismissed without a selection.
    pub fn close_picker(&mut self) {
        self.mode = Mode::Underlay;
    }

    /// Switch between the underlay and the preview.
    pub fn toggle_preview(&mut self) -> Mode {
        self.mode = match self.mode {
            Mode::Underlay => Mode::Preview,
            _ => Mode::Underlay,
        };
        self.mode
    }

    // ----- Gesture forwarding -----

    pub fn apply(&mut self, event: GestureEvent) {
        self.accumulator.apply(event);
    }

    pub fn rotate_changed(&mut self, delta_radians: f64) {
        self.accumulator.on_rotate_changed(delta_radians);
    }

    pub fn rotate_ended(&mut self) {
        self.accumulator.on_rotate_ended();
    }

    pub fn scale_changed(&mut self, ratio: f64) -> f64 {
        self.accumulator.on_scale_changed(ratio)
    }

    pub fn scale_ended(&mut self) {
        self.accumulator.on_scale_ended();
    }

    pub fn drag_changed(&mut self, translation: Vec2) {
        self.accumulator.on_drag_changed(translation);
    }

    pub fn drag_ended(&mut self) {
        self.accumulator.on_drag_ended();
    }

    // ----- Transforms and rendering -----

    fn source(&self) -> Result<&Arc<SourceImage>, ExportError> {
        self.underlay.as_ref().ok_or(ExportError::NoSourceImage)
    }

    /// Display fit scale of the current underlay.
    pub fn fit_scale(&self) -> Result<f64, ExportError> {
        let source = self.source()?;
        self.fit.fit_scale(source.width as f64, source.height as f64)
    }

    /// On-screen placement of the underlay under the current pose.
    pub fn display_transform(&self) -> Result<ExportTransform, ExportError> {
        let source = self.source()?;
        let fit_scale = self.fit_scale()?;
        self.composer
            .compose_display(&self.pose(), fit_scale, source.size())
    }

    /// Render the current view at `output_side` pixels.
    pub fn render(
        &self,
        output_side: f64,
        filter: InterpolationFilter,
    ) -> Result<ExportedRaster, ExportError> {
        self.export_job(output_side)?.with_filter(filter).run()
    }

    /// Snapshot everything an export needs so it can run elsewhere.
    ///
    /// Uses the high-quality Lanczos3 filter unless overridden.
    pub fn export_job(&self, output_side: f64) -> Result<ExportJob, ExportError> {
        let source = Arc::clone(self.source()?);
        let output_side = output_pixels(output_side)?;
        Ok(ExportJob {
            source,
            pose: self.pose(),
            canvas: self.canvas,
            output_side,
            filter: InterpolationFilter::Lanczos3,
        })
    }

    /// Render the view at canvas size and keep it as the preview.
    #[tracing::instrument(skip(self))]
    pub fn make_preview(&mut self) -> Result<&ExportedRaster, ExportError> {
        let raster = self.render(self.canvas.canvas_length, InterpolationFilter::Bilinear)?;
        Ok(&*self.preview.insert(raster))
    }

    /// Render at the selected tier and hand the raster to `sink`.
    ///
    /// Returns `ExportError::NoSourceImage` without touching the sink when no
    /// underlay is selected.
    #[tracing::instrument(skip(self, sink), fields(resolution = %self.resolution))]
    pub fn export<S: ExportSink>(&self, sink: &mut S) -> Result<(), ExportError> {
        let side = self.resolution.side_length(&self.canvas);
        let raster = self.export_job(side)?.run()?;
        tracing::info!(side = raster.side, "exporting underlay");
        sink.save(raster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn session(canvas: f64) -> UnderlaySession {
        UnderlaySession::new(CanvasConfig::new(canvas).unwrap())
    }

    #[test]
    fn test_new_session_defaults() {
        let s = session(800.0);
        assert_eq!(s.mode(), Mode::Underlay);
        assert!(s.underlay().is_none());
        assert!(s.preview().is_none());
        assert_eq!(s.resolution(), ExportResolution::Medium);
        assert!(s.pose().is_identity());
    }

    #[test]
    fn test_render_without_underlay_is_no_op() {
        let s = session(800.0);
        let err = s.render(400.0, InterpolationFilter::Bilinear).unwrap_err();
        assert_eq!(err, ExportError::NoSourceImage);
        assert!(err.is_no_op());
        assert_eq!(s.display_transform(), Err(ExportError::NoSourceImage));
    }

    #[test]
    fn test_export_without_underlay_skips_sink() {
        let s = session(800.0);
        let mut calls = 0;
        let mut sink = |_raster: ExportedRaster| -> Result<(), ExportError> {
            calls += 1;
            Ok(())
        };
        assert_eq!(s.export(&mut sink), Err(ExportError::NoSourceImage));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_select_underlay_resets_pose() {
        let mut s = session(800.0);
        s.select_underlay(SourceImage::filled(4, 3, BLUE));
        s.rotate_changed(1.0);
        s.rotate_ended();
        s.scale_changed(2.0);
        s.open_picker();
        assert_eq!(s.mode(), Mode::UnderlayPicker);

        s.select_underlay(SourceImage::filled(3, 4, BLUE));
        assert!(s.pose().is_identity());
        assert_eq!(s.mode(), Mode::Underlay);
        assert_eq!(s.underlay().map(|u| (u.width, u.height)), Some((3, 4)));
    }

    #[test]
    fn test_mode_transitions() {
        let mut s = session(800.0);
        assert_eq!(s.toggle_preview(), Mode::Preview);
        assert_eq!(s.toggle_preview(), Mode::Underlay);

        s.open_picker();
        s.close_picker();
        assert_eq!(s.mode(), Mode::Underlay);

        s.open_picker();
        assert_eq!(s.toggle_preview(), Mode::Underlay);
    }

    #[test]
    fn test_gestures_drive_display_transform() {
        let mut s = session(800.0);
        s.select_underlay(SourceImage::filled(400, 300, BLUE));
        s.scale_changed(2.0);
        s.rotate_changed(FRAC_PI_2);
        s.drag_changed(Vec2::new(10.0, 0.0));

        let t = s.display_transform().unwrap();
        assert_eq!(s.fit_scale().unwrap(), 2.0);
        assert_eq!(t.combined_scale, 4.0);
        assert_eq!(t.translation, Vec2::new(10.0, 0.0));
        assert_eq!(t.rotation, FRAC_PI_2);
    }

    #[test]
    fn test_make_preview_renders_canvas_size() {
        let mut s = session(80.0);
        s.select_underlay(SourceImage::filled(40, 30, BLUE));

        let preview = s.make_preview().unwrap();
        assert_eq!(preview.side, 80);
        assert_eq!(preview.occupied_bounds(), Some((0, 10, 80, 70)));
        assert!(s.preview().is_some());

        // A new underlay invalidates the preview
        s.select_underlay(SourceImage::filled(40, 30, BLUE));
        assert!(s.preview().is_none());
    }

    #[test]
    fn test_export_uses_selected_tier() {
        let mut s = session(40.0);
        s.select_underlay(SourceImage::filled(20, 10, BLUE));
        s.set_resolution(ExportResolution::High);

        let mut saved = Vec::new();
        let mut sink = |raster: ExportedRaster| -> Result<(), ExportError> {
            saved.push(raster);
            Ok(())
        };
        s.export(&mut sink).unwrap();

        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].side, 120);
        assert_eq!(saved[0].occupied_bounds(), Some((0, 30, 120, 90)));
    }

    #[test]
    fn test_export_propagates_sink_error() {
        let mut s = session(40.0);
        s.select_underlay(SourceImage::filled(20, 10, BLUE));
        let mut sink =
            |_raster: ExportedRaster| Err(ExportError::Sink("photo library denied".to_string()));
        assert_eq!(
            s.export(&mut sink),
            Err(ExportError::Sink("photo library denied".to_string()))
        );
    }

    #[test]
    fn test_invalid_inputs_reported() {
        let mut s = session(800.0);
        s.select_underlay(SourceImage::new(0, 0, vec![]));
        assert!(matches!(
            s.render(400.0, InterpolationFilter::Bilinear),
            Err(ExportError::InvalidSourceImage { .. })
        ));

        s.select_underlay(SourceImage::filled(4, 3, BLUE));
        assert_eq!(
            s.render(-1.0, InterpolationFilter::Bilinear),
            Err(ExportError::InvalidOutputSize(-1.0))
        );
    }

    #[test]
    fn test_export_job_is_a_snapshot() {
        let mut s = session(40.0);
        s.select_underlay(SourceImage::filled(20, 20, BLUE));
        s.scale_changed(0.5);

        let job = s.export_job(40.0).unwrap();
        let snapshot = job.pose();

        // Gestures after the snapshot do not leak into the job
        s.scale_ended();
        s.scale_changed(2.0);
        s.drag_changed(Vec2::new(5.0, 5.0));
        assert_eq!(job.pose(), snapshot);

        let raster = std::thread::spawn(move || job.run()).join().unwrap().unwrap();
        // 20x20 fit to 40 is 40x40, halved to 20x20, centered
        assert_eq!(raster.occupied_bounds(), Some((10, 10, 30, 30)));
    }

    #[test]
    fn test_concurrent_exports_are_independent() {
        let mut s = session(40.0);
        s.select_underlay(SourceImage::filled(20, 10, BLUE));

        let handles: Vec<_> = [40.0, 80.0, 120.0]
            .into_iter()
            .map(|side| {
                let job = s.export_job(side).unwrap();
                std::thread::spawn(move || job.run())
            })
            .collect();

        let sides: Vec<u32> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap().side)
            .collect();
        assert_eq!(sides, vec![40, 80, 120]);
    }

    #[test]
    fn test_render_underlay_matches_session() {
        let mut s = session(60.0);
        let source = SourceImage::filled(30, 20, BLUE);
        s.select_underlay(source.clone());
        s.rotate_changed(0.4);

        let direct = render_underlay(
            &source,
            &s.pose(),
            s.canvas(),
            90.0,
            InterpolationFilter::Bilinear,
        )
        .unwrap();
        let via_session = s.render(90.0, InterpolationFilter::Bilinear).unwrap();
        assert_eq!(direct, via_session);
    }

    #[test]
    fn test_cycle_resolution() {
        let mut s = session(800.0);
        assert_eq!(s.cycle_resolution(), ExportResolution::High);
        assert_eq!(s.cycle_resolution(), ExportResolution::Low);
    }
}
