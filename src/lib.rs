//! Card form controller
//!
//! A headless client for the card render endpoint: it models the render
//! form (presets, synced controls, tabs, upload slots), validates it, posts
//! it as multipart form data to `POST /api/render-card`, and manages the
//! returned binary output behind a single revocable resource handle.
//!
//! UI effects go through the [`Surface`] trait, so the same controller
//! drives a real page, a test double, or nothing at all.
//!
//! # Example
//!
//! ```no_run
//! use cardform::{
//!     CardFormController, ControllerConfig, NullSurface, RenderTrigger, SlotId, UploadFile,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ControllerConfig {
//!     endpoint: "http://127.0.0.1:5000/api/render-card".to_string(),
//!     ..Default::default()
//! };
//! let mut controller = CardFormController::new(config, NullSurface::new())?;
//!
//! controller.apply_preset("standard");
//! controller.attach_files(
//!     SlotId::BgFile,
//!     vec![UploadFile::new("bg.png", "image/png", std::fs::read("bg.png")?)],
//! );
//! controller.attach_files(
//!     SlotId::MainFile,
//!     vec![UploadFile::new("main.png", "image/png", std::fs::read("main.png")?)],
//! );
//!
//! let outcome = controller.render(RenderTrigger::Preview).await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod fields;
pub mod presets;
pub mod sync;
pub mod tabs;
pub mod uploads;

pub mod surface;
pub use surface::{NullSurface, RecordingSurface, Surface, SurfaceEvent};

pub mod resource;
pub use resource::{ResourceHandle, ResourceStore};

pub mod validate;
pub use validate::ValidationOutcome;

mod controller;
pub use controller::CardFormController;

mod pipeline;
pub use pipeline::{RenderOutcome, RenderTrigger};

pub use fields::{FieldDomain, FieldId, FormState};
pub use presets::{Preset, PRESETS};
pub use sync::{SyncRegistry, SyncSide};
pub use tabs::{TabKey, TabRouter};
pub use uploads::{DragEvent, SlotId, UploadFile, UploadTracker};

/// Configuration for the form controller.
///
/// The defaults target a render service on the local loopback and mirror
/// the timeouts the service itself uses.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Full URL of the render endpoint.
    pub endpoint: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// User agent string to send with requests.
    pub user_agent: String,
    /// Delay between attaching the download target and dispatching the
    /// click, in milliseconds.
    pub download_click_delay_ms: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000/api/render-card".to_string(),
            timeout_ms: 15_000,
            user_agent: format!("cardform/{}", env!("CARGO_PKG_VERSION")),
            download_click_delay_ms: 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ControllerConfig::default();
        assert!(config.endpoint.ends_with("/api/render-card"));
        assert_eq!(config.timeout_ms, 15_000);
        assert!(config.user_agent.starts_with("cardform/"));
    }
}
