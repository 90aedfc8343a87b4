//! Integration tests for the render pipeline against a loopback server.

use std::io::Read;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use cardform::{
    CardFormController, ControllerConfig, RecordingSurface, RenderOutcome, RenderTrigger, SlotId,
    SurfaceEvent, UploadFile,
};

const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nnot really pixels";

/// Serve every request with a fixed status and body; returns the endpoint
/// URL and a hit counter.
fn start_render_server(
    status: u16,
    body: &'static [u8],
    content_type: &'static str,
) -> (String, Arc<AtomicUsize>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_thread = hits.clone();

    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            hits_thread.fetch_add(1, Ordering::SeqCst);
            let response = tiny_http::Response::from_data(body.to_vec())
                .with_status_code(status)
                .with_header(
                    format!("Content-Type: {}", content_type)
                        .parse::<tiny_http::Header>()
                        .unwrap(),
                );
            let _ = request.respond(response);
        }
    });

    (format!("http://{}/api/render-card", addr), hits)
}

/// Like `start_render_server`, but also forwards each request body for
/// inspection.
fn start_capture_server(body: &'static [u8]) -> (String, mpsc::Receiver<String>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let mut buf = Vec::new();
            let _ = request.as_reader().read_to_end(&mut buf);
            let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
            let response = tiny_http::Response::from_data(body.to_vec()).with_header(
                "Content-Type: image/png"
                    .parse::<tiny_http::Header>()
                    .unwrap(),
            );
            let _ = request.respond(response);
        }
    });

    (format!("http://{}/api/render-card", addr), rx)
}

fn ready_controller(endpoint: String) -> CardFormController<RecordingSurface> {
    let config = ControllerConfig {
        endpoint,
        timeout_ms: 5_000,
        ..Default::default()
    };
    let mut controller =
        CardFormController::new(config, RecordingSurface::new()).expect("controller builds");
    controller.attach_files(
        SlotId::BgFile,
        vec![UploadFile::new("bg.png", "image/png", vec![1u8; 16])],
    );
    controller.attach_files(
        SlotId::MainFile,
        vec![UploadFile::new("main.png", "image/png", vec![2u8; 16])],
    );
    controller
}

#[tokio::test]
async fn successful_preview_shows_result_and_enables_download() {
    let (endpoint, hits) = start_render_server(200, FAKE_PNG, "image/png");
    let mut controller = ready_controller(endpoint);

    let outcome = controller.render(RenderTrigger::Preview).await.expect("render");
    let handle = match outcome {
        RenderOutcome::Completed(handle) => handle,
        other => panic!("expected Completed, got {:?}", other),
    };

    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(handle.bytes(), FAKE_PNG);
    assert_eq!(handle.media_type(), "image/png");
    assert_eq!(controller.live_resources(), 1);

    let surface = controller.surface();
    assert_eq!(surface.last_preview(), Some(handle.id()));
    assert_eq!(surface.download_target(), Some("card.png"));
    assert_eq!(surface.busy_flags(), vec![true, false]);
    assert_eq!(surface.last_status(), Some("Preview updated successfully."));
    assert!(surface.downloads_triggered().is_empty());
}

#[tokio::test]
async fn second_render_revokes_first_handle() {
    let (endpoint, _) = start_render_server(200, FAKE_PNG, "image/png");
    let mut controller = ready_controller(endpoint);

    let first = match controller.render(RenderTrigger::Preview).await.unwrap() {
        RenderOutcome::Completed(handle) => handle,
        other => panic!("expected Completed, got {:?}", other),
    };
    assert!(!first.is_revoked());

    let second = match controller.render(RenderTrigger::Preview).await.unwrap() {
        RenderOutcome::Completed(handle) => handle,
        other => panic!("expected Completed, got {:?}", other),
    };

    assert!(first.is_revoked());
    assert!(!second.is_revoked());
    assert_ne!(first.id(), second.id());
    assert_eq!(controller.live_resources(), 1);
}

#[tokio::test]
async fn missing_file_blocks_without_any_request() {
    let (endpoint, hits) = start_render_server(200, FAKE_PNG, "image/png");
    let config = ControllerConfig {
        endpoint,
        ..Default::default()
    };
    let mut controller = CardFormController::new(config, RecordingSurface::new()).unwrap();
    // Only the background slot gets a file.
    controller.attach_files(
        SlotId::BgFile,
        vec![UploadFile::new("bg.png", "image/png", vec![1u8; 16])],
    );

    let outcome = controller.render(RenderTrigger::Preview).await.unwrap();
    assert!(matches!(outcome, RenderOutcome::Blocked));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(controller.surface().upload_error(SlotId::MainFile), Some(true));
    assert_eq!(controller.surface().upload_error(SlotId::BgFile), Some(false));
    // Busy never toggled: blocked attempts stay out of the busy state.
    assert!(controller.surface().busy_flags().is_empty());
}

#[tokio::test]
async fn server_error_body_is_surfaced_and_preview_untouched() {
    let (endpoint, _) = start_render_server(500, b"bad image", "text/plain");
    let mut controller = ready_controller(endpoint);

    let err = controller
        .render(RenderTrigger::Preview)
        .await
        .expect_err("non-2xx must fail");
    assert!(err.to_string().contains("bad image"));

    let surface = controller.surface();
    assert!(surface.last_status().unwrap().contains("bad image"));
    assert_eq!(surface.last_preview(), None);
    assert_eq!(controller.live_resources(), 0);
    // Busy was still bracketed around the failed round trip.
    assert_eq!(surface.busy_flags(), vec![true, false]);
}

#[tokio::test]
async fn empty_error_body_falls_back_to_status_text() {
    let (endpoint, _) = start_render_server(503, b"", "text/plain");
    let mut controller = ready_controller(endpoint);

    let err = controller
        .render(RenderTrigger::Preview)
        .await
        .expect_err("non-2xx must fail");
    assert!(err.to_string().contains("Service Unavailable"));
}

#[tokio::test]
async fn download_trigger_clicks_after_target_attached() {
    let (endpoint, _) = start_render_server(200, FAKE_PNG, "application/pdf");
    let mut controller = ready_controller(endpoint);
    controller.set_field(cardform::FieldId::Format, "pdf");

    controller.render(RenderTrigger::Download).await.expect("render");

    let surface = controller.surface();
    assert_eq!(surface.downloads_triggered(), vec!["card.pdf"]);

    let target_pos = surface
        .events
        .iter()
        .position(|event| matches!(event, SurfaceEvent::DownloadTarget { .. }))
        .unwrap();
    let click_pos = surface
        .events
        .iter()
        .position(|event| matches!(event, SurfaceEvent::DownloadTriggered { .. }))
        .unwrap();
    assert!(target_pos < click_pos);
    assert_eq!(
        surface.last_status(),
        Some("Render complete. Download should begin shortly.")
    );
}

#[tokio::test]
async fn download_filename_follows_format_field() {
    let (endpoint, _) = start_render_server(200, FAKE_PNG, "image/jpeg");
    let mut controller = ready_controller(endpoint);
    controller.set_field(cardform::FieldId::Format, "jpeg");

    controller.render(RenderTrigger::Download).await.expect("render");
    assert_eq!(controller.surface().downloads_triggered(), vec!["card.jpeg"]);
}

#[tokio::test]
async fn preview_load_notification_clears_busy() {
    let (endpoint, _) = start_render_server(200, FAKE_PNG, "image/png");
    let mut controller = ready_controller(endpoint);

    controller.render(RenderTrigger::Preview).await.expect("render");
    assert!(!controller.is_busy());

    controller.notify_preview_loaded();
    assert!(!controller.is_busy());
    assert_eq!(controller.surface().busy_flags(), vec![true, false, false]);
}

#[tokio::test]
async fn multipart_body_carries_fields_and_files() {
    let (endpoint, rx) = start_capture_server(FAKE_PNG);
    let mut controller = ready_controller(endpoint);
    controller.apply_preset("wide");

    controller.render(RenderTrigger::Preview).await.expect("render");

    let body = rx.recv().expect("captured request body");
    assert!(body.contains("name=\"width\""));
    assert!(body.contains("768"));
    assert!(body.contains("name=\"format\""));
    assert!(body.contains("jpeg"));
    assert!(body.contains("name=\"playstyleIcon\""));
    assert!(body.contains("rushdown"));
    assert!(body.contains("filename=\"bg.png\""));
    assert!(body.contains("filename=\"main.png\""));
    // The flag field is unset, so it is absent from the submission.
    assert!(!body.contains("name=\"transparent\""));
}

#[tokio::test]
async fn handle_id_matches_content_digest() {
    let (endpoint, _) = start_render_server(200, FAKE_PNG, "image/png");
    let mut controller = ready_controller(endpoint);

    let handle = match controller.render(RenderTrigger::Preview).await.unwrap() {
        RenderOutcome::Completed(handle) => handle,
        other => panic!("expected Completed, got {:?}", other),
    };

    let digest = hex::encode(Sha256::digest(FAKE_PNG));
    assert!(handle.id().ends_with(&digest[..12]));
}
