//! The UI seam.
//!
//! Everything the controller does to the page goes through this trait:
//! status line, busy indicator, control values, upload labels, tab
//! visibility, the preview image, and the download control. Embedders
//! implement it over their actual UI; `NullSurface` is the safe headless
//! default and `RecordingSurface` captures effects for tests.

use crate::fields::FieldId;
use crate::resource::ResourceHandle;
use crate::sync::SyncSide;
use crate::tabs::TabKey;
use crate::uploads::SlotId;

/// UI effects the controller can request.
pub trait Surface {
    /// Update the user-visible status line.
    fn set_status(&mut self, message: &str);

    /// Toggle the busy affordances as one unit: loader visibility, the
    /// preview control's disabled state, and the form's busy flag.
    fn set_busy(&mut self, busy: bool);

    /// Write a plain (non-synced) field control's value.
    fn set_field_value(&mut self, field: FieldId, value: &str);

    /// Write one member of a synced number/range pair.
    fn set_sync_control(&mut self, key: &str, side: SyncSide, value: &str);

    /// Replace an upload slot's label text.
    fn set_upload_label(&mut self, slot: SlotId, label: &str);

    /// Mark or clear an upload slot's error styling.
    fn set_upload_error(&mut self, slot: SlotId, flagged: bool);

    /// Mark or clear an upload slot's drag-hover styling.
    fn set_drag_active(&mut self, slot: SlotId, active: bool);

    /// Show or hide one tab panel. The active panel is visible, marked
    /// selected, and keyboard-reachable; inactive panels are hidden with
    /// their tab order removed.
    fn set_tab_state(&mut self, tab: TabKey, active: bool);

    /// Display a result resource as the preview image and hide the
    /// placeholder graphic.
    fn show_preview(&mut self, handle: &ResourceHandle);

    /// Point the download control at a result resource with the given
    /// filename and enable it.
    fn set_download_target(&mut self, handle: &ResourceHandle, filename: &str);

    /// Invoke the download: click the download control if the page has one,
    /// else synthesize and discard a temporary link.
    fn trigger_download(&mut self, handle: &ResourceHandle, filename: &str);

    /// Focus a field without scrolling and trigger the native validity
    /// report. Reporting may fail (detached nodes, unsupported embedders);
    /// callers swallow and log the error.
    fn focus_field(&mut self, field: FieldId) -> std::result::Result<(), String>;

    /// Reflect the selected playstyle icon.
    fn select_icon(&mut self, key: &str);
}

/// A surface that does nothing beyond debug logging. Used by headless
/// embedders (the CLI) where only the render result matters.
pub struct NullSurface;

impl NullSurface {
    pub fn new() -> Self {
        NullSurface
    }
}

impl Default for NullSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for NullSurface {
    fn set_status(&mut self, message: &str) {
        log::debug!("status: {}", message);
    }

    fn set_busy(&mut self, busy: bool) {
        log::debug!("busy: {}", busy);
    }

    fn set_field_value(&mut self, _field: FieldId, _value: &str) {}

    fn set_sync_control(&mut self, _key: &str, _side: SyncSide, _value: &str) {}

    fn set_upload_label(&mut self, _slot: SlotId, _label: &str) {}

    fn set_upload_error(&mut self, slot: SlotId, flagged: bool) {
        if flagged {
            log::debug!("upload slot {} flagged", slot.name());
        }
    }

    fn set_drag_active(&mut self, _slot: SlotId, _active: bool) {}

    fn set_tab_state(&mut self, _tab: TabKey, _active: bool) {}

    fn show_preview(&mut self, handle: &ResourceHandle) {
        log::debug!("preview: {} ({} bytes)", handle.id(), handle.bytes().len());
    }

    fn set_download_target(&mut self, handle: &ResourceHandle, filename: &str) {
        log::debug!("download target: {} -> {}", handle.id(), filename);
    }

    fn trigger_download(&mut self, handle: &ResourceHandle, filename: &str) {
        log::debug!("download triggered: {} -> {}", handle.id(), filename);
    }

    fn focus_field(&mut self, _field: FieldId) -> std::result::Result<(), String> {
        Ok(())
    }

    fn select_icon(&mut self, _key: &str) {}
}

/// One recorded UI effect.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Status(String),
    Busy(bool),
    FieldValue(FieldId, String),
    SyncControl {
        key: String,
        side: SyncSide,
        value: String,
    },
    UploadLabel(SlotId, String),
    UploadError(SlotId, bool),
    DragActive(SlotId, bool),
    TabState(TabKey, bool),
    Preview {
        handle_id: String,
    },
    DownloadTarget {
        handle_id: String,
        filename: String,
    },
    DownloadTriggered {
        handle_id: String,
        filename: String,
    },
    Focus(FieldId),
    IconSelected(String),
}

/// A surface that records every effect in order. Used in unit and
/// integration tests, and handy as a reference while writing a real
/// embedder.
pub struct RecordingSurface {
    pub events: Vec<SurfaceEvent>,
    /// When set, `focus_field` fails with this message (exercises the
    /// swallow-and-log path of the validator).
    pub fail_focus: Option<String>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            fail_focus: None,
        }
    }

    /// Most recent status message, if any.
    pub fn last_status(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|event| match event {
            SurfaceEvent::Status(message) => Some(message.as_str()),
            _ => None,
        })
    }

    /// All busy toggles in order.
    pub fn busy_flags(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::Busy(flag) => Some(*flag),
                _ => None,
            })
            .collect()
    }

    /// Most recent value written to one member of a synced pair.
    pub fn sync_value(&self, key: &str, side: SyncSide) -> Option<&str> {
        self.events.iter().rev().find_map(|event| match event {
            SurfaceEvent::SyncControl {
                key: k,
                side: s,
                value,
            } if k == key && *s == side => Some(value.as_str()),
            _ => None,
        })
    }

    /// Most recent value written to a plain field control.
    pub fn field_value(&self, field: FieldId) -> Option<&str> {
        self.events.iter().rev().find_map(|event| match event {
            SurfaceEvent::FieldValue(f, value) if *f == field => Some(value.as_str()),
            _ => None,
        })
    }

    /// Most recent label pushed to a slot.
    pub fn upload_label(&self, slot: SlotId) -> Option<&str> {
        self.events.iter().rev().find_map(|event| match event {
            SurfaceEvent::UploadLabel(s, label) if *s == slot => Some(label.as_str()),
            _ => None,
        })
    }

    /// Most recent error flag pushed to a slot.
    pub fn upload_error(&self, slot: SlotId) -> Option<bool> {
        self.events.iter().rev().find_map(|event| match event {
            SurfaceEvent::UploadError(s, flagged) if *s == slot => Some(*flagged),
            _ => None,
        })
    }

    /// Handle id of the most recently displayed preview.
    pub fn last_preview(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|event| match event {
            SurfaceEvent::Preview { handle_id } => Some(handle_id.as_str()),
            _ => None,
        })
    }

    /// Filenames of downloads triggered so far, in order.
    pub fn downloads_triggered(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                SurfaceEvent::DownloadTriggered { filename, .. } => Some(filename.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Most recent download target filename.
    pub fn download_target(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|event| match event {
            SurfaceEvent::DownloadTarget { filename, .. } => Some(filename.as_str()),
            _ => None,
        })
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for RecordingSurface {
    fn set_status(&mut self, message: &str) {
        self.events.push(SurfaceEvent::Status(message.to_string()));
    }

    fn set_busy(&mut self, busy: bool) {
        self.events.push(SurfaceEvent::Busy(busy));
    }

    fn set_field_value(&mut self, field: FieldId, value: &str) {
        self.events
            .push(SurfaceEvent::FieldValue(field, value.to_string()));
    }

    fn set_sync_control(&mut self, key: &str, side: SyncSide, value: &str) {
        self.events.push(SurfaceEvent::SyncControl {
            key: key.to_string(),
            side,
            value: value.to_string(),
        });
    }

    fn set_upload_label(&mut self, slot: SlotId, label: &str) {
        self.events
            .push(SurfaceEvent::UploadLabel(slot, label.to_string()));
    }

    fn set_upload_error(&mut self, slot: SlotId, flagged: bool) {
        self.events.push(SurfaceEvent::UploadError(slot, flagged));
    }

    fn set_drag_active(&mut self, slot: SlotId, active: bool) {
        self.events.push(SurfaceEvent::DragActive(slot, active));
    }

    fn set_tab_state(&mut self, tab: TabKey, active: bool) {
        self.events.push(SurfaceEvent::TabState(tab, active));
    }

    fn show_preview(&mut self, handle: &ResourceHandle) {
        self.events.push(SurfaceEvent::Preview {
            handle_id: handle.id().to_string(),
        });
    }

    fn set_download_target(&mut self, handle: &ResourceHandle, filename: &str) {
        self.events.push(SurfaceEvent::DownloadTarget {
            handle_id: handle.id().to_string(),
            filename: filename.to_string(),
        });
    }

    fn trigger_download(&mut self, handle: &ResourceHandle, filename: &str) {
        self.events.push(SurfaceEvent::DownloadTriggered {
            handle_id: handle.id().to_string(),
            filename: filename.to_string(),
        });
    }

    fn focus_field(&mut self, field: FieldId) -> std::result::Result<(), String> {
        self.events.push(SurfaceEvent::Focus(field));
        match &self.fail_focus {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        }
    }

    fn select_icon(&mut self, key: &str) {
        self.events.push(SurfaceEvent::IconSelected(key.to_string()));
    }
}
