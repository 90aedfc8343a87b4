//! Upload slots: file selection, labels, and drag-and-drop state.

use crate::surface::Surface;

/// The file slots the form declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    BgFile,
    MainFile,
}

impl SlotId {
    /// Wire name of the slot's file input.
    pub fn name(self) -> &'static str {
        match self {
            SlotId::BgFile => "bgFile",
            SlotId::MainFile => "mainFile",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            SlotId::BgFile => "Drop the background artwork here",
            SlotId::MainFile => "Drop the character artwork here",
        }
    }
}

/// One file attached to a slot.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }
}

/// Drag-and-drop phases forwarded from the embedder. Enter and over mark the
/// slot visually active (the embedder suppresses the default navigation);
/// leave and drop clear it, and a drop carrying files runs the same change
/// path as a manual pick.
#[derive(Debug, Clone)]
pub enum DragEvent {
    Enter,
    Over,
    Leave,
    Drop(Vec<UploadFile>),
}

struct UploadSlot {
    id: SlotId,
    required: bool,
    files: Vec<UploadFile>,
    error: bool,
    dragging: bool,
}

/// Tracks every upload slot and keeps the surface labels in step.
pub struct UploadTracker {
    slots: Vec<UploadSlot>,
}

impl UploadTracker {
    /// The standard form: both artwork slots present and required.
    pub fn new() -> Self {
        Self {
            slots: [SlotId::BgFile, SlotId::MainFile]
                .into_iter()
                .map(|id| UploadSlot {
                    id,
                    required: true,
                    files: Vec::new(),
                    error: false,
                    dragging: false,
                })
                .collect(),
        }
    }

    fn slot(&self, id: SlotId) -> &UploadSlot {
        self.slots
            .iter()
            .find(|slot| slot.id == id)
            .expect("slot exists for every SlotId")
    }

    fn slot_mut(&mut self, id: SlotId) -> &mut UploadSlot {
        self.slots
            .iter_mut()
            .find(|slot| slot.id == id)
            .expect("slot exists for every SlotId")
    }

    /// Files currently attached to a slot.
    pub fn files(&self, id: SlotId) -> &[UploadFile] {
        &self.slot(id).files
    }

    /// Whether a slot is currently flagged as erroneous.
    pub fn error_flag(&self, id: SlotId) -> bool {
        self.slot(id).error
    }

    /// Whether a slot is currently showing its drag-hover state.
    pub fn drag_active(&self, id: SlotId) -> bool {
        self.slot(id).dragging
    }

    /// Label text for a slot: the placeholder, or the comma-joined names of
    /// the selected files.
    pub fn label_for(&self, id: SlotId) -> String {
        let slot = self.slot(id);
        if slot.files.is_empty() {
            slot.id.placeholder().to_string()
        } else {
            slot.files
                .iter()
                .map(|file| file.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// Push every slot's label to the surface.
    pub fn refresh_labels<S: Surface>(&self, surface: &mut S) {
        for slot in &self.slots {
            surface.set_upload_label(slot.id, &self.label_for(slot.id));
        }
    }

    /// The change path shared by manual picks and drops: assign the files,
    /// clear the edited slot's error flag, and recompute every label.
    /// Returns true when every required slot now has at least one file.
    pub fn assign_files<S: Surface>(
        &mut self,
        id: SlotId,
        files: Vec<UploadFile>,
        surface: &mut S,
    ) -> bool {
        {
            let slot = self.slot_mut(id);
            slot.files = files;
            slot.error = false;
        }
        surface.set_upload_error(id, false);
        self.refresh_labels(surface);
        self.all_required_filled()
    }

    /// Handle a drag phase on a slot. A drop carrying files is forwarded to
    /// `assign_files`; an empty drop only clears the visual state. The
    /// return value mirrors `assign_files` and is `false` for non-drop
    /// phases.
    pub fn handle_drag<S: Surface>(
        &mut self,
        id: SlotId,
        event: DragEvent,
        surface: &mut S,
    ) -> bool {
        match event {
            DragEvent::Enter | DragEvent::Over => {
                self.slot_mut(id).dragging = true;
                surface.set_drag_active(id, true);
                false
            }
            DragEvent::Leave => {
                self.slot_mut(id).dragging = false;
                surface.set_drag_active(id, false);
                false
            }
            DragEvent::Drop(files) => {
                self.slot_mut(id).dragging = false;
                surface.set_drag_active(id, false);
                if files.is_empty() {
                    false
                } else {
                    self.assign_files(id, files, surface)
                }
            }
        }
    }

    /// Mark or clear a slot's transient error flag.
    pub fn set_error<S: Surface>(&mut self, id: SlotId, flagged: bool, surface: &mut S) {
        self.slot_mut(id).error = flagged;
        surface.set_upload_error(id, flagged);
    }

    /// Required slots that currently have no files.
    pub fn missing_required(&self) -> Vec<SlotId> {
        self.slots
            .iter()
            .filter(|slot| slot.required && slot.files.is_empty())
            .map(|slot| slot.id)
            .collect()
    }

    /// Whether every required slot has at least one file.
    pub fn all_required_filled(&self) -> bool {
        self.missing_required().is_empty()
    }

    /// All declared slots, in form order.
    pub fn slot_ids(&self) -> Vec<SlotId> {
        self.slots.iter().map(|slot| slot.id).collect()
    }
}

impl Default for UploadTracker {
    fn default() -> Self {
        Self::new()
    }
}
