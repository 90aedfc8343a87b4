//! Behavioral tests for the form controller that never touch the network.

use cardform::{
    fields::FIELD_SPECS, CardFormController, ControllerConfig, DragEvent, FieldId,
    RecordingSurface, SlotId, SyncSide, TabKey, UploadFile,
};

fn controller() -> CardFormController<RecordingSurface> {
    CardFormController::new(ControllerConfig::default(), RecordingSurface::new())
        .expect("controller builds")
}

#[test]
fn every_registered_pair_mirrors_both_directions() {
    let mut controller = controller();
    let sync_keys: Vec<(&str, FieldId)> = FIELD_SPECS
        .iter()
        .filter_map(|spec| spec.sync_key.map(|key| (key, spec.id)))
        .collect();
    assert_eq!(sync_keys.len(), 6);

    for (key, field) in sync_keys {
        controller.handle_sync_input(key, SyncSide::Number, "42");
        assert_eq!(
            controller.surface().sync_value(key, SyncSide::Range),
            Some("42"),
            "number -> range for {}",
            key
        );
        assert_eq!(controller.form().get(field), Some("42"));

        controller.handle_sync_input(key, SyncSide::Range, "-7");
        assert_eq!(
            controller.surface().sync_value(key, SyncSide::Number),
            Some("-7"),
            "range -> number for {}",
            key
        );
        assert_eq!(controller.form().get(field), Some("-7"));
    }
}

#[test]
fn wide_preset_applies_regardless_of_prior_values() {
    let mut controller = controller();
    controller.set_field(FieldId::Width, "1");
    controller.set_field(FieldId::Height, "1");
    controller.set_field(FieldId::Format, "pdf");

    controller.apply_preset("wide");

    assert_eq!(controller.form().get(FieldId::Width), Some("768"));
    assert_eq!(controller.form().get(FieldId::Height), Some("1024"));
    assert_eq!(controller.form().get(FieldId::Format), Some("jpeg"));
}

#[test]
fn dropped_files_match_a_manual_pick() {
    let mut manual = controller();
    let mut dropped = controller();
    let files = || {
        vec![
            UploadFile::new("a.png", "image/png", vec![1]),
            UploadFile::new("b.png", "image/png", vec![2]),
        ]
    };

    manual.attach_files(SlotId::BgFile, files());
    dropped.drag_event(SlotId::BgFile, DragEvent::Drop(files()));

    assert_eq!(
        manual.uploads().files(SlotId::BgFile).len(),
        dropped.uploads().files(SlotId::BgFile).len()
    );
    assert_eq!(
        manual.surface().upload_label(SlotId::BgFile),
        dropped.surface().upload_label(SlotId::BgFile)
    );
    assert_eq!(
        dropped.surface().upload_label(SlotId::BgFile),
        Some("a.png, b.png")
    );
}

#[test]
fn tab_activation_is_exclusive() {
    let mut controller = controller();
    controller.activate_tab(TabKey::Style);
    assert_eq!(controller.active_tab(), TabKey::Style);

    controller.activate_tab(TabKey::Artwork);
    assert_eq!(controller.active_tab(), TabKey::Artwork);
}

#[test]
fn invalid_field_on_inactive_tab_forces_switch() {
    let mut controller = controller();
    controller.attach_files(
        SlotId::BgFile,
        vec![UploadFile::new("bg.png", "image/png", vec![0])],
    );
    controller.attach_files(
        SlotId::MainFile,
        vec![UploadFile::new("main.png", "image/png", vec![0])],
    );
    controller.set_field(FieldId::BorderWidth, "500");

    assert_eq!(controller.active_tab(), TabKey::Layout);
    assert!(!controller.validate_before_render());
    assert_eq!(controller.active_tab(), TabKey::Style);
}

#[test]
fn close_revokes_the_active_resource() {
    // No render has happened, so close is a plain release; the drop-based
    // path is covered by the resource store's own tests.
    let controller = controller();
    assert_eq!(controller.live_resources(), 0);
    controller.close().expect("close");
}
