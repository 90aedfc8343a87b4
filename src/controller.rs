//! The controller object.
//!
//! One `CardFormController` owns all mutable state for the page: the typed
//! form, the sync registry, the tab router, the upload tracker, the result
//! resource store, and the surface it paints on. The embedder forwards user
//! events to the methods here; nothing in the crate keeps ambient statics.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};
use crate::fields::{self, FieldId, FormState};
use crate::presets;
use crate::resource::{ResourceHandle, ResourceStore};
use crate::surface::Surface;
use crate::sync::{SyncRegistry, SyncSide};
use crate::tabs::{self, TabKey, TabRouter};
use crate::uploads::{DragEvent, SlotId, UploadFile, UploadTracker};
use crate::validate::{self, ValidationOutcome};
use crate::ControllerConfig;

pub(crate) const STATUS_INITIAL: &str = "Drop in your artwork files to get started.";
pub(crate) const STATUS_FILES_READY: &str = "Files ready. Adjust settings and render when ready.";
pub(crate) const STATUS_MISSING_FILES: &str =
    "Background and character artwork are both required.";

/// Form controller for the card render page.
///
/// Constructed once at startup; all state lives in explicit fields so the
/// resource-lifecycle invariant (revoke-before-replace, release-on-drop) is
/// locally checkable.
pub struct CardFormController<S: Surface> {
    pub(crate) config: ControllerConfig,
    pub(crate) endpoint: Url,
    pub(crate) client: reqwest::Client,
    pub(crate) form: FormState,
    sync: SyncRegistry,
    tabs: TabRouter,
    pub(crate) uploads: UploadTracker,
    pub(crate) resources: ResourceStore,
    pub(crate) surface: S,
    pub(crate) busy: bool,
}

impl<S: Surface> CardFormController<S> {
    /// Build the controller and paint the initial UI state: first tab
    /// active, placeholder labels, default icon, and the starting status
    /// line.
    pub fn new(config: ControllerConfig, surface: S) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|err| {
            Error::ConfigError(format!("invalid endpoint {:?}: {}", config.endpoint, err))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::ConfigError(format!(
                "endpoint must be http(s), got {:?}",
                endpoint.scheme()
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|err| Error::ConfigError(format!("failed to build HTTP client: {}", err)))?;

        let mut controller = Self {
            config,
            endpoint,
            client,
            form: FormState::new(),
            sync: SyncRegistry::standard(),
            tabs: TabRouter::new(),
            uploads: UploadTracker::new(),
            resources: ResourceStore::new(),
            surface,
            busy: false,
        };
        controller.init_surface();
        Ok(controller)
    }

    fn init_surface(&mut self) {
        let first = self.tabs.active();
        self.tabs.activate(first, &mut self.surface);
        self.uploads.refresh_labels(&mut self.surface);
        let icon = self
            .form
            .get(FieldId::PlaystyleIcon)
            .unwrap_or("rushdown")
            .to_string();
        self.surface.select_icon(&icon);
        self.surface.set_status(STATUS_INITIAL);
    }

    // --- Read access, mainly for embedders and tests ---

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn uploads(&self) -> &UploadTracker {
        &self.uploads
    }

    pub fn active_tab(&self) -> TabKey {
        self.tabs.active()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Currently live result resource, if a render has succeeded.
    pub fn active_resource(&self) -> Option<&ResourceHandle> {
        self.resources.active()
    }

    /// Number of live result resources (0 or 1 by construction).
    pub fn live_resources(&self) -> usize {
        self.resources.live_count()
    }

    // --- Event entry points ---

    /// Write a field value programmatically. Synced fields update both
    /// mirrored controls; the icon picker is reflected as well.
    pub fn set_field(&mut self, field: FieldId, value: impl Into<String>) {
        let value = value.into();
        let spec = fields::spec_for(field);
        let wrote_pair = match spec.sync_key {
            Some(key) => self.sync.write_pair(key, &value, &mut self.surface).is_some(),
            None => false,
        };
        if !wrote_pair {
            self.surface.set_field_value(field, &value);
        }
        if field == FieldId::PlaystyleIcon {
            self.surface.select_icon(&value);
        }
        self.form.set(field, value);
    }

    /// Select a playstyle icon.
    pub fn select_icon(&mut self, key: &str) {
        self.set_field(FieldId::PlaystyleIcon, key);
    }

    /// Input event on one member of a synced pair: mirror the raw string to
    /// the partner control and store it. Events for unregistered keys are
    /// ignored.
    pub fn handle_sync_input(&mut self, key: &str, side: SyncSide, value: &str) {
        if let Some(field) = self.sync.mirror_input(key, side, value, &mut self.surface) {
            self.form.set(field, value.to_string());
        }
    }

    /// Apply a named preset. Unknown keys are a no-op. Never renders.
    pub fn apply_preset(&mut self, key: &str) {
        let Some(preset) = presets::preset(key) else {
            return;
        };

        self.set_field(FieldId::Width, preset.width.to_string());
        self.set_field(FieldId::Height, preset.height.to_string());
        self.set_field(FieldId::Dpr, preset.dpr.to_string());
        self.set_field(FieldId::Format, preset.format);

        let layer_fields = [
            (FieldId::BgScale, preset.bg_scale),
            (FieldId::BgOffsetX, preset.bg_offset_x),
            (FieldId::BgOffsetY, preset.bg_offset_y),
            (FieldId::MainScale, preset.main_scale),
            (FieldId::MainOffsetX, preset.main_offset_x),
            (FieldId::MainOffsetY, preset.main_offset_y),
        ];
        for (field, value) in layer_fields {
            if let Some(value) = value {
                self.set_field(field, value.to_string());
            }
        }

        self.surface.set_status(&format!(
            "Applied {} preset. Update the preview to render with new dimensions.",
            preset.key
        ));
    }

    /// File selection on a slot (the change path). Updates labels, clears
    /// the slot's error flag, and reports readiness once every required
    /// slot has files.
    pub fn attach_files(&mut self, slot: SlotId, files: Vec<UploadFile>) {
        if self.uploads.assign_files(slot, files, &mut self.surface) {
            self.surface.set_status(STATUS_FILES_READY);
        }
    }

    /// Drag-and-drop phase on a slot. A drop with files runs the same
    /// change path as `attach_files`.
    pub fn drag_event(&mut self, slot: SlotId, event: DragEvent) {
        if self.uploads.handle_drag(slot, event, &mut self.surface) {
            self.surface.set_status(STATUS_FILES_READY);
        }
    }

    /// Activate a tab by key.
    pub fn activate_tab(&mut self, key: TabKey) {
        self.tabs.activate(key, &mut self.surface);
    }

    /// The gate run before every render attempt.
    ///
    /// Missing required files fail fast with their own status copy;
    /// otherwise the first constraint violation switches to the offending
    /// tab, focuses the field (logging any report failure non-fatally), and
    /// blocks the attempt.
    pub fn validate_before_render(&mut self) -> bool {
        let outcome = validate::check(&self.form, &self.uploads);

        let missing = match &outcome {
            ValidationOutcome::MissingFiles(slots) => slots.clone(),
            _ => Vec::new(),
        };
        for slot in self.uploads.slot_ids() {
            self.uploads
                .set_error(slot, missing.contains(&slot), &mut self.surface);
        }

        match outcome {
            ValidationOutcome::Ready => true,
            ValidationOutcome::MissingFiles(_) => {
                self.surface.set_status(STATUS_MISSING_FILES);
                false
            }
            ValidationOutcome::InvalidField { field, reason } => {
                if let Some(tab) = tabs::tab_for_field(field) {
                    if tab != self.tabs.active() {
                        self.tabs.activate(tab, &mut self.surface);
                    }
                }
                if let Err(err) = self.surface.focus_field(field) {
                    log::warn!("validity report for {} failed: {}", field.name(), err);
                }
                self.surface
                    .set_status(&format!("Invalid value for {}: {}", field.name(), reason));
                false
            }
        }
    }

    /// Called when the preview image finishes loading in the UI; clears the
    /// busy state independently of the network round trip.
    pub fn notify_preview_loaded(&mut self) {
        self.busy = false;
        self.surface.set_busy(false);
    }

    pub(crate) fn set_busy_state(&mut self, busy: bool) {
        self.busy = busy;
        self.surface.set_busy(busy);
    }

    /// Release held resources (the unload path). Dropping the controller
    /// has the same effect.
    pub fn close(mut self) -> Result<()> {
        self.resources.revoke_active();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceEvent};

    fn controller() -> CardFormController<RecordingSurface> {
        CardFormController::new(ControllerConfig::default(), RecordingSurface::new())
            .expect("controller builds with default config")
    }

    fn png_file(name: &str) -> UploadFile {
        UploadFile::new(name, "image/png", vec![0u8; 8])
    }

    #[test]
    fn rejects_non_http_endpoint() {
        let config = ControllerConfig {
            endpoint: "ftp://example.com/render".into(),
            ..Default::default()
        };
        assert!(CardFormController::new(config, RecordingSurface::new()).is_err());
    }

    #[test]
    fn initial_surface_state() {
        let controller = controller();
        let surface = controller.surface();
        assert_eq!(surface.last_status(), Some(STATUS_INITIAL));
        assert!(surface
            .events
            .contains(&SurfaceEvent::TabState(TabKey::Layout, true)));
        assert!(surface
            .events
            .contains(&SurfaceEvent::IconSelected("rushdown".into())));
        assert!(surface.upload_label(SlotId::BgFile).is_some());
    }

    #[test]
    fn wide_preset_overwrites_dimensions_and_format() {
        let mut controller = controller();
        controller.set_field(FieldId::Width, "100");
        controller.set_field(FieldId::Format, "png");

        controller.apply_preset("wide");
        assert_eq!(controller.form().get(FieldId::Width), Some("768"));
        assert_eq!(controller.form().get(FieldId::Height), Some("1024"));
        assert_eq!(controller.form().get(FieldId::Dpr), Some("2"));
        assert_eq!(controller.form().get(FieldId::Format), Some("jpeg"));
        assert_eq!(controller.form().get(FieldId::BgOffsetY), Some("-60"));

        // Synced layer fields were written through both mirrored controls.
        let surface = controller.surface();
        assert_eq!(surface.sync_value("bgOffsetY", SyncSide::Number), Some("-60"));
        assert_eq!(surface.sync_value("bgOffsetY", SyncSide::Range), Some("-60"));
        assert!(surface.last_status().unwrap().contains("wide"));
    }

    #[test]
    fn unknown_preset_is_a_noop() {
        let mut controller = controller();
        let events_before = controller.surface().events.len();
        controller.apply_preset("poster");
        assert_eq!(controller.surface().events.len(), events_before);
    }

    #[test]
    fn sync_input_updates_partner_and_form() {
        let mut controller = controller();
        controller.handle_sync_input("mainScale", SyncSide::Range, "120");
        assert_eq!(controller.form().get(FieldId::MainScale), Some("120"));
        assert_eq!(
            controller.surface().sync_value("mainScale", SyncSide::Number),
            Some("120")
        );
    }

    #[test]
    fn validate_flags_missing_slots() {
        let mut controller = controller();
        assert!(!controller.validate_before_render());
        assert_eq!(
            controller.surface().last_status(),
            Some(STATUS_MISSING_FILES)
        );
        assert_eq!(controller.surface().upload_error(SlotId::BgFile), Some(true));
        assert_eq!(
            controller.surface().upload_error(SlotId::MainFile),
            Some(true)
        );
    }

    #[test]
    fn validate_switches_tab_and_focuses_invalid_field() {
        let mut controller = controller();
        controller.attach_files(SlotId::BgFile, vec![png_file("bg.png")]);
        controller.attach_files(SlotId::MainFile, vec![png_file("main.png")]);
        controller.set_field(FieldId::MainScale, "9999");

        assert!(!controller.validate_before_render());
        assert_eq!(controller.active_tab(), TabKey::Artwork);
        assert!(controller
            .surface()
            .events
            .contains(&SurfaceEvent::Focus(FieldId::MainScale)));
        // Error flags were unmarked: the files are present.
        assert_eq!(controller.surface().upload_error(SlotId::BgFile), Some(false));
    }

    #[test]
    fn focus_failure_is_swallowed() {
        let mut controller = controller();
        controller.attach_files(SlotId::BgFile, vec![png_file("bg.png")]);
        controller.attach_files(SlotId::MainFile, vec![png_file("main.png")]);
        controller.set_field(FieldId::Width, "9000");
        controller.surface_mut().fail_focus = Some("detached".into());

        assert!(!controller.validate_before_render());
    }

    #[test]
    fn readiness_status_after_both_files() {
        let mut controller = controller();
        controller.attach_files(SlotId::BgFile, vec![png_file("bg.png")]);
        assert_ne!(controller.surface().last_status(), Some(STATUS_FILES_READY));
        controller.attach_files(SlotId::MainFile, vec![png_file("main.png")]);
        assert_eq!(controller.surface().last_status(), Some(STATUS_FILES_READY));
    }
}
