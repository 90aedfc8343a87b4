//! The render pipeline.
//!
//! One render attempt is a single awaited sequence:
//! `Idle -> Validating -> (Blocked) | Busy -> {Succeeded, Failed} -> Idle`.
//! Busy state is set before the request goes out and cleared on every exit
//! path; the preview-load notification on the controller covers the case
//! where clearing must wait for image decode instead.

use std::time::Duration;

use reqwest::multipart::{Form, Part};

use crate::controller::CardFormController;
use crate::error::{Error, Result};
use crate::fields::{FieldDomain, FieldId, FIELD_SPECS};
use crate::resource::ResourceHandle;
use crate::surface::Surface;

/// What started the render attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTrigger {
    Preview,
    Download,
}

/// Result of one render attempt that did not error.
#[derive(Debug)]
pub enum RenderOutcome {
    /// The validator blocked the attempt; no request was sent.
    Blocked,
    /// The endpoint returned output, now held as the live resource.
    Completed(ResourceHandle),
}

const STATUS_RENDERING_PREVIEW: &str = "Rendering preview…";
const STATUS_RENDERING_DOWNLOAD: &str = "Rendering a fresh download-ready version…";
const STATUS_PREVIEW_DONE: &str = "Preview updated successfully.";
const STATUS_DOWNLOAD_DONE: &str = "Render complete. Download should begin shortly.";

impl<S: Surface> CardFormController<S> {
    /// Run one render attempt.
    ///
    /// A blocked attempt returns `Ok(RenderOutcome::Blocked)` without
    /// touching the network. Failures are logged and surfaced on the status
    /// line before being returned; the form stays usable for a retry.
    pub async fn render(&mut self, trigger: RenderTrigger) -> Result<RenderOutcome> {
        if !self.validate_before_render() {
            return Ok(RenderOutcome::Blocked);
        }

        self.set_busy_state(true);
        self.surface.set_status(match trigger {
            RenderTrigger::Preview => STATUS_RENDERING_PREVIEW,
            RenderTrigger::Download => STATUS_RENDERING_DOWNLOAD,
        });

        let result = self.dispatch(trigger).await;
        self.set_busy_state(false);

        match result {
            Ok(handle) => Ok(RenderOutcome::Completed(handle)),
            Err(err) => {
                log::error!("render attempt failed: {}", err);
                self.surface.set_status(&format!("Render failed: {}", err));
                Err(err)
            }
        }
    }

    async fn dispatch(&mut self, trigger: RenderTrigger) -> Result<ResourceHandle> {
        let body = self.serialize_form()?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The endpoint reports failures as a text body; fall back to the
            // status text when the body is empty.
            let body_text = response.text().await.unwrap_or_default();
            let detail = if body_text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                body_text
            };
            return Err(Error::RenderError(detail));
        }

        let bytes = response.bytes().await?;

        let fmt = normalized_format(self.form.get(FieldId::Format));
        let handle = self
            .resources
            .replace(bytes.to_vec(), &media_type_for_format(&fmt));
        self.surface.show_preview(&handle);

        let filename = format!("card.{}", extension_for_format(&fmt));
        self.surface.set_download_target(&handle, &filename);

        self.surface.set_status(match trigger {
            RenderTrigger::Preview => STATUS_PREVIEW_DONE,
            RenderTrigger::Download => STATUS_DOWNLOAD_DONE,
        });

        if trigger == RenderTrigger::Download {
            // Let the download target attach before dispatching the click.
            tokio::time::sleep(Duration::from_millis(self.config.download_click_delay_ms)).await;
            self.surface.trigger_download(&handle, &filename);
        }

        Ok(handle)
    }

    /// Serialize the live form to multipart form data. Every present value
    /// is checked against its declared domain here, at the boundary; the
    /// flag field is included only when set, matching checkbox submission.
    fn serialize_form(&self) -> Result<Form> {
        let mut body = Form::new();

        for spec in FIELD_SPECS {
            let Some(raw) = self.form.get(spec.id) else {
                continue;
            };
            if matches!(spec.domain, FieldDomain::Flag) && !self.form.flag_set(spec.id) {
                continue;
            }
            spec.domain.check(raw).map_err(|reason| {
                Error::ValidationError(format!("{} {}", spec.id.name(), reason))
            })?;
            body = body.text(spec.id.name(), raw.to_string());
        }

        for slot in self.uploads.slot_ids() {
            for file in self.uploads.files(slot) {
                let part = Part::bytes(file.bytes.clone())
                    .file_name(file.name.clone())
                    .mime_str(&file.media_type)
                    .map_err(|err| {
                        Error::ValidationError(format!(
                            "{}: invalid media type {:?}: {}",
                            slot.name(),
                            file.media_type,
                            err
                        ))
                    })?;
                body = body.part(slot.name(), part);
            }
        }

        Ok(body)
    }
}

/// Lowercased format value with the empty default applied.
fn normalized_format(raw: Option<&str>) -> String {
    let fmt = raw.unwrap_or("").trim().to_ascii_lowercase();
    if fmt.is_empty() {
        "png".to_string()
    } else {
        fmt
    }
}

/// Download extension derived from the format field: `pdf` maps to `.pdf`,
/// everything else passes through unchanged.
fn extension_for_format(fmt: &str) -> &str {
    if fmt == "pdf" {
        "pdf"
    } else {
        fmt
    }
}

/// Media type the endpoint uses for a format.
fn media_type_for_format(fmt: &str) -> String {
    if fmt == "pdf" {
        "application/pdf".to_string()
    } else {
        format!("image/{}", fmt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_defaults_to_png() {
        assert_eq!(extension_for_format(&normalized_format(None)), "png");
        assert_eq!(extension_for_format(&normalized_format(Some(""))), "png");
    }

    #[test]
    fn extension_passes_through_known_formats() {
        assert_eq!(extension_for_format(&normalized_format(Some("jpeg"))), "jpeg");
        assert_eq!(extension_for_format(&normalized_format(Some("PDF"))), "pdf");
        assert_eq!(extension_for_format(&normalized_format(Some("webp"))), "webp");
    }

    #[test]
    fn media_type_for_pdf_is_application() {
        assert_eq!(media_type_for_format("pdf"), "application/pdf");
        assert_eq!(media_type_for_format("png"), "image/png");
        assert_eq!(media_type_for_format("jpeg"), "image/jpeg");
    }
}
