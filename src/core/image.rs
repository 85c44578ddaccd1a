//! Photo file reads.
//!
//! Picked image files are read on a background runtime and turned into
//! `data:` URLs, which is the opaque form photos are stored in. Each read
//! reports back exactly once through a channel drained by the UI thread.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::edit::{Edit, PhotoSlot};
use super::journal::ImageData;

/// Image file extensions offered by the photo picker
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Guess a MIME type from a file extension
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Encode raw bytes as a base64 data URL
pub fn encode_data_url(bytes: &[u8], mime: &str) -> ImageData {
    ImageData::new(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// Split a base64 data URL back into its MIME type and bytes
pub fn decode_data_url(url: &str) -> Option<(&str, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((mime, bytes))
}

/// A finished image read
#[derive(Debug, Clone)]
pub struct ImageLoaded {
    pub slot: PhotoSlot,
    pub image: ImageData,
}

impl ImageLoaded {
    /// The single edit this read results in
    pub fn into_edit(self) -> Edit {
        Edit::SetPhotoImage {
            slot: self.slot,
            image: Some(self.image),
        }
    }
}

/// Background reader for picked photo files
pub struct ImageLoader {
    runtime: Runtime,
    tx: UnboundedSender<ImageLoaded>,
    rx: UnboundedReceiver<ImageLoaded>,
    /// Called after each completed read, used to wake the UI
    notify: Arc<dyn Fn() + Send + Sync>,
}

impl ImageLoader {
    /// Create a loader with its own runtime
    pub fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("image-reader")
            .enable_all()
            .build()
            .context("Failed to start image reader runtime")?;
        let (tx, rx) = mpsc::unbounded_channel();

        Ok(Self {
            runtime,
            tx,
            rx,
            notify: Arc::new(|| {}),
        })
    }

    /// Register a callback fired whenever a read completes
    pub fn with_notify(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notify = Arc::new(notify);
        self
    }

    /// Start reading `path` for the photo at `slot`
    pub fn request(&self, slot: PhotoSlot, path: PathBuf) {
        let tx = self.tx.clone();
        let notify = Arc::clone(&self.notify);

        self.runtime.spawn(async move {
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    let image = encode_data_url(&bytes, mime_for_path(&path));
                    tracing::info!(
                        "Read photo {} ({} bytes) for page {} slot {}",
                        path.display(),
                        bytes.len(),
                        slot.page + 1,
                        slot.photo + 1
                    );
                    // The receiver only goes away when the app shuts down
                    let _ = tx.send(ImageLoaded { slot, image });
                    notify();
                }
                Err(e) => {
                    tracing::error!("Failed to read photo {}: {}", path.display(), e);
                }
            }
        });
    }

    /// Drain reads that finished since the last poll
    pub fn poll(&mut self) -> Vec<ImageLoaded> {
        let mut done = Vec::new();
        while let Ok(loaded) = self.rx.try_recv() {
            done.push(loaded);
        }
        done
    }

    /// Block until the next read finishes
    #[allow(dead_code)]
    pub fn wait(&mut self) -> Option<ImageLoaded> {
        self.runtime.block_on(self.rx.recv())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(Path::new("a/b/beach.JPG")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("x.png")), "image/png");
        assert_eq!(mime_for_path(Path::new("notes")), "application/octet-stream");
    }

    #[test]
    fn test_picker_extensions_are_decodable() {
        for ext in IMAGE_EXTENSIONS {
            let format = ::image::ImageFormat::from_extension(ext).unwrap();
            assert!(format.reading_enabled(), "no decoder for .{}", ext);
        }
        // region maps are served as .jpg
        assert!(::image::ImageFormat::Jpeg.reading_enabled());
    }

    #[test]
    fn test_data_url_round_trip() {
        let bytes = [0x89, b'P', b'N', b'G', 0, 1, 2, 255];
        let image = encode_data_url(&bytes, "image/png");
        assert!(image.as_str().starts_with("data:image/png;base64,"));

        let (mime, decoded) = decode_data_url(image.as_str()).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_decode_rejects_other_urls() {
        assert!(decode_data_url("https://example.com/a.png").is_none());
        assert!(decode_data_url("data:image/png,rawtext").is_none());
        assert!(decode_data_url("data:image/png;base64,***").is_none());
    }

    #[test]
    fn test_loader_reports_each_read_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.gif");
        std::fs::write(&path, b"GIF89a").unwrap();

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let mut loader = ImageLoader::new()
            .unwrap()
            .with_notify(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        let slot = PhotoSlot { page: 1, photo: 2 };
        loader.request(slot, path);
        let loaded = loader.wait().unwrap();
        assert_eq!(loaded.slot, slot);
        assert_eq!(decode_data_url(loaded.image.as_str()).unwrap().1, b"GIF89a");
        assert!(loader.poll().is_empty());

        match loaded.into_edit() {
            Edit::SetPhotoImage { slot: s, image } => {
                assert_eq!(s, slot);
                assert!(image.is_some());
            }
            other => panic!("unexpected edit {:?}", other),
        }
    }
}
