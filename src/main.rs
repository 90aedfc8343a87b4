use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use sha2::{Digest, Sha256};

use cardform::{
    presets, CardFormController, ControllerConfig, FieldId, NullSurface, RenderOutcome,
    RenderTrigger, SlotId, UploadFile, PRESETS,
};

/// Drive the card form headlessly: fill it in, render, write the bytes out.
#[derive(Parser)]
#[command(name = "cardform", version, about)]
struct Args {
    /// Render endpoint URL
    #[arg(long, default_value = "http://127.0.0.1:5000/api/render-card")]
    endpoint: String,

    /// Background artwork file
    #[arg(long)]
    bg: Option<PathBuf>,

    /// Character artwork file
    #[arg(long = "main", value_name = "FILE")]
    main_art: Option<PathBuf>,

    /// Preset to apply before any field overrides
    #[arg(long)]
    preset: Option<String>,

    /// Field override, repeatable (wire names, e.g. --set width=768)
    #[arg(long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// JSON file holding a map of field names to values
    #[arg(long)]
    values: Option<PathBuf>,

    /// Output path (defaults to card.<ext> from the format field)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[arg(long, default_value_t = 15_000)]
    timeout_ms: u64,

    /// Print the preset table as JSON and exit
    #[arg(long)]
    list_presets: bool,
}

fn media_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

fn load_upload(path: &Path) -> anyhow::Result<UploadFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("upload")
        .to_string();
    Ok(UploadFile::new(name, media_type_for_path(path), bytes))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.list_presets {
        println!("{}", serde_json::to_string_pretty(PRESETS)?);
        return Ok(());
    }

    let bg = args.bg.context("--bg is required (background artwork)")?;
    let main_art = args
        .main_art
        .context("--main is required (character artwork)")?;

    let config = ControllerConfig {
        endpoint: args.endpoint,
        timeout_ms: args.timeout_ms,
        ..Default::default()
    };
    let mut controller = CardFormController::new(config, NullSurface::new())?;

    if let Some(key) = &args.preset {
        if presets::preset(key).is_none() {
            bail!("unknown preset {:?}; try --list-presets", key);
        }
        controller.apply_preset(key);
    }

    if let Some(path) = &args.values {
        let raw = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let values: HashMap<String, String> =
            serde_json::from_slice(&raw).context("values file must be a JSON string map")?;
        for (name, value) in values {
            let field = FieldId::from_name(&name)
                .with_context(|| format!("unknown field {:?} in values file", name))?;
            controller.set_field(field, value);
        }
    }

    for entry in &args.set {
        let (name, value) = entry
            .split_once('=')
            .with_context(|| format!("--set expects NAME=VALUE, got {:?}", entry))?;
        let field =
            FieldId::from_name(name).with_context(|| format!("unknown field {:?}", name))?;
        controller.set_field(field, value.to_string());
    }

    controller.attach_files(SlotId::BgFile, vec![load_upload(&bg)?]);
    controller.attach_files(SlotId::MainFile, vec![load_upload(&main_art)?]);

    let handle = match controller.render(RenderTrigger::Download).await? {
        RenderOutcome::Completed(handle) => handle,
        RenderOutcome::Blocked => bail!("the form did not validate; nothing was sent"),
    };

    let fmt = controller
        .form()
        .get(FieldId::Format)
        .unwrap_or("png")
        .trim()
        .to_ascii_lowercase();
    let ext = if fmt.is_empty() { "png".to_string() } else { fmt };
    let out = args
        .out
        .unwrap_or_else(|| PathBuf::from(format!("card.{}", ext)));

    std::fs::write(&out, handle.bytes())
        .with_context(|| format!("failed to write {}", out.display()))?;

    let digest = Sha256::digest(handle.bytes());
    println!(
        "Wrote {} ({} bytes, sha256 {})",
        out.display(),
        handle.bytes().len(),
        hex::encode(digest)
    );

    Ok(())
}
