//! Sprite project I/O: PNG frame sequences plus a JSON manifest.
//!
//! A project is a directory:
//! ```text
//! walk_cycle/
//!   sprite.json        manifest (size, fps, frame file order)
//!   frame.0000.png
//!   frame.0001.png
//! ```
//!
//! The in-memory API (`encode_frames` / `decode_frames`) passes encoded
//! payloads explicitly; nothing is stashed in shared state between save and
//! load.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use image::ImageFormat;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::frame_store::FrameStore;
use crate::core::player::frame_delay_ms;
use crate::editor::Editor;
use crate::entities::frame::Frame;

/// Manifest file name inside a project directory
pub const MANIFEST_FILE: &str = "sprite.json";

/// Current manifest version
pub const MANIFEST_VERSION: u32 = 1;

/// Project manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteManifest {
    pub version: u32,
    pub id: Uuid,
    pub width: u32,
    pub height: u32,
    pub fps: i32,
    /// Frame files relative to the project directory, in playback order
    pub frames: Vec<String>,
}

/// Frames and settings read back from disk
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub manifest: SpriteManifest,
    pub frames: Vec<Frame>,
}

/// Frame file name for index (frame.0007.png)
pub fn frame_file_name(prefix: &str, index: usize) -> String {
    format!("{}.{:04}.png", prefix, index)
}

/// Encode every frame as PNG bytes, in order
pub fn encode_frames(store: &FrameStore) -> Result<Vec<Vec<u8>>> {
    store
        .frames()
        .enumerate()
        .map(|(i, frame)| encode_png(frame).with_context(|| format!("Failed to encode frame {}", i)))
        .collect()
}

/// Decode PNG payloads back into frames
pub fn decode_frames(payload: &[Vec<u8>]) -> Result<Vec<Frame>> {
    payload
        .iter()
        .enumerate()
        .map(|(i, bytes)| decode_png(bytes).with_context(|| format!("Failed to decode frame {}", i)))
        .collect()
}

fn encode_png(frame: &Frame) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    frame.image().write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

fn decode_png(bytes: &[u8]) -> Result<Frame> {
    let img = image::load_from_memory_with_format(bytes, ImageFormat::Png)?;
    Ok(Frame::from_image(img.to_rgba8()))
}

/// Write frames as a numbered PNG sequence. Returns written paths.
pub fn export_png_sequence(store: &FrameStore, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut written = Vec::with_capacity(store.num_frames());
    for (index, frame) in store.frames().enumerate() {
        let path = dir.join(frame_file_name(prefix, index));
        frame
            .image()
            .save_with_format(&path, ImageFormat::Png)
            .with_context(|| format!("Failed to write frame: {}", path.display()))?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Save the editor document into a project directory
pub fn save_project(editor: &Editor, dir: &Path) -> Result<SpriteManifest> {
    let store = editor.frames();
    let paths = export_png_sequence(store, dir, "frame")?;
    let (width, height) = store.dimensions();

    let manifest = SpriteManifest {
        version: MANIFEST_VERSION,
        id: Uuid::new_v4(),
        width,
        height,
        fps: editor.player().fps() as i32,
        frames: paths
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect(),
    };

    let json = serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
    let manifest_path = dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, json)
        .with_context(|| format!("Failed to write manifest: {}", manifest_path.display()))?;

    info!("Saved {} frames to {}", manifest.frames.len(), dir.display());
    Ok(manifest)
}

/// Read a project directory (or a path to its manifest)
pub fn read_project(path: &Path) -> Result<LoadedProject> {
    let (dir, manifest_path) = if path.is_dir() {
        (path.to_path_buf(), path.join(MANIFEST_FILE))
    } else {
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        (dir, path.to_path_buf())
    };

    let json = fs::read_to_string(&manifest_path)
        .with_context(|| format!("Failed to read manifest: {}", manifest_path.display()))?;
    let manifest: SpriteManifest = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse manifest: {}", manifest_path.display()))?;

    if manifest.version > MANIFEST_VERSION {
        bail!("Unsupported manifest version {}", manifest.version);
    }
    if manifest.frames.is_empty() {
        bail!("Project has no frames: {}", manifest_path.display());
    }
    frame_delay_ms(manifest.fps)
        .with_context(|| format!("Bad fps in manifest: {}", manifest_path.display()))?;

    let mut frames = Vec::with_capacity(manifest.frames.len());
    for name in &manifest.frames {
        let frame_path = dir.join(name);
        let img = image::open(&frame_path)
            .with_context(|| format!("Failed to load frame: {}", frame_path.display()))?;
        let frame = Frame::from_image(img.to_rgba8());
        if frame.dimensions() != (manifest.width, manifest.height) {
            bail!(
                "Frame {} is {}x{}, project is {}x{}",
                name,
                frame.width(),
                frame.height(),
                manifest.width,
                manifest.height
            );
        }
        frames.push(frame);
    }

    Ok(LoadedProject { manifest, frames })
}

/// Load a project into the editor: apply fps, replace frames, select frame 0.
/// The open document is untouched when reading or validation fails.
pub fn load_project(editor: &mut Editor, path: &Path) -> Result<SpriteManifest> {
    let LoadedProject { manifest, frames } = read_project(path)?;
    editor.update_fps(manifest.fps)?;
    editor.load_frames(frames)?;
    info!("Loaded project {} ({} frames)", path.display(), manifest.frames.len());
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorSettings;
    use crate::core::event_bus::EventBus;
    use crate::entities::frame::{Point, WHITE};
    use image::Rgba;

    const RED: image::Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn sample_editor() -> Editor {
        let settings = EditorSettings {
            canvas_width: 6,
            canvas_height: 4,
            fps: 8,
            ..Default::default()
        };
        let mut editor = Editor::new(&settings, &EventBus::new()).unwrap();
        editor.add_frame();
        editor.set_current_frame(1).unwrap();
        editor.set_pen_color(RED);
        editor.draw_pressed(Point::new(5, 3));
        editor.draw_released(Point::new(5, 3));
        editor
    }

    /// Test: In-memory payload round trip
    #[test]
    fn test_encode_decode_payload() {
        let editor = sample_editor();
        let payload = encode_frames(editor.frames()).unwrap();
        assert_eq!(payload.len(), 2);

        let frames = decode_frames(&payload).unwrap();
        assert_eq!(frames[0], *editor.frames().frame(0));
        assert_eq!(frames[1].pixel(Point::new(5, 3)), Some(RED));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_frames(&[vec![1, 2, 3]]).is_err());
    }

    /// Test: Save and load a project directory
    /// Validates: pixels, fps, frame order survive; load resets to frame 0
    #[test]
    fn test_project_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let editor = sample_editor();
        let saved = save_project(&editor, dir.path()).unwrap();
        assert_eq!(saved.frames, vec!["frame.0000.png", "frame.0001.png"]);
        assert!(dir.path().join(MANIFEST_FILE).exists());

        let mut other = Editor::new(&EditorSettings::default(), &EventBus::new()).unwrap();
        let loaded = load_project(&mut other, dir.path()).unwrap();
        assert_eq!(loaded.id, saved.id);
        assert_eq!(other.frames().num_frames(), 2);
        assert_eq!(other.frames().dimensions(), (6, 4));
        assert_eq!(other.current_index(), 0);
        assert_eq!(other.player().fps(), 8);
        assert!(other.frames().frame(0).is_uniform(WHITE));
        assert_eq!(other.frames().frame(1).pixel(Point::new(5, 3)), Some(RED));

        // Manifest path works as well
        let again = read_project(&dir.path().join(MANIFEST_FILE)).unwrap();
        assert_eq!(again.frames.len(), 2);
    }

    /// Test: Invalid manifest fps fails before the document changes
    #[test]
    fn test_load_bad_fps_keeps_document() {
        let dir = tempfile::tempdir().unwrap();
        save_project(&sample_editor(), dir.path()).unwrap();

        let manifest_path = dir.path().join(MANIFEST_FILE);
        let mut manifest: SpriteManifest =
            serde_json::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
        manifest.fps = 0;
        fs::write(&manifest_path, serde_json::to_string(&manifest).unwrap()).unwrap();

        let mut other = Editor::new(&EditorSettings::default(), &EventBus::new()).unwrap();
        other.draw_pressed(Point::new(0, 0));
        other.draw_released(Point::new(0, 0));

        let err = load_project(&mut other, dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid FPS: 0"));
        assert_eq!(other.frames().num_frames(), 1);
        assert_eq!(other.frames().dimensions(), (100, 100));
        assert_eq!(other.player().fps(), 12);
        assert!(other.history().can_undo());
    }

    #[test]
    fn test_read_rejects_size_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let editor = sample_editor();
        save_project(&editor, dir.path()).unwrap();

        Frame::new(2, 2)
            .image()
            .save_with_format(dir.path().join("frame.0001.png"), ImageFormat::Png)
            .unwrap();
        let err = read_project(dir.path()).unwrap_err();
        assert!(err.to_string().contains("frame.0001.png"));
    }
}
