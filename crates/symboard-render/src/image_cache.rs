//! Asynchronous image loading with generation-tagged delivery.
//!
//! Loads are started by an [`ImageSource`] and complete on another thread;
//! results travel back over a channel and are applied on the UI thread by
//! [`ImageCache::drain`]. Every waiter carries the [`Generation`] it was
//! requested under, and is handed its bitmap only if that generation is
//! still current when the result is drained.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::pass::Generation;
use crate::surface::Bitmap;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why an image could not be loaded.
#[derive(Debug)]
pub enum ImageError {
    /// The file could not be read.
    Io { url: String, source: std::io::Error },
    /// The bytes are not a supported image.
    Decode { url: String, source: image::ImageError },
    /// The source does not handle this URL scheme.
    UnsupportedSource(String),
    /// Every decode worker of the source has stopped.
    NoWorker(String),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Io { url, source } => write!(f, "reading {url}: {source}"),
            ImageError::Decode { url, source } => write!(f, "decoding {url}: {source}"),
            ImageError::UnsupportedSource(url) => write!(f, "no image source for {url}"),
            ImageError::NoWorker(url) => write!(f, "no decode worker left for {url}"),
        }
    }
}

impl std::error::Error for ImageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImageError::Io { source, .. } => Some(source),
            ImageError::Decode { source, .. } => Some(source),
            ImageError::UnsupportedSource(_) | ImageError::NoWorker(_) => None,
        }
    }
}

/// Outcome of one load.
pub type LoadResult = Result<Bitmap, ImageError>;

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Handle through which a source reports the result of one load.
///
/// May be sent to another thread; completing after the cache is gone is a
/// no-op.
#[derive(Debug)]
pub struct Completion {
    url: String,
    tx: Sender<(String, LoadResult)>,
}

impl Completion {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn complete(self, result: LoadResult) {
        let _ = self.tx.send((self.url, result));
    }
}

/// Something that can start loading an image by URL.
///
/// `fetch` must not block; the result is reported through `done`, from any
/// thread, exactly once.
pub trait ImageSource {
    fn fetch(&self, url: &str, done: Completion);
}

/// Decode threads started by [`FsImageSource::new`].
pub const DEFAULT_WORKERS: usize = 4;

type Job = (PathBuf, Completion);

/// Loads images from the local filesystem on a fixed pool of worker
/// threads.
///
/// Accepts plain paths and `file://` URLs. Relative paths resolve against
/// `root` when one is set. Workers exit once every clone of the source is
/// dropped.
#[derive(Clone, Debug)]
pub struct FsImageSource {
    root: Option<PathBuf>,
    jobs: Sender<Job>,
}

impl FsImageSource {
    pub fn new() -> Self {
        Self::with_workers(None, DEFAULT_WORKERS)
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self::with_workers(Some(root.into()), DEFAULT_WORKERS)
    }

    /// A source with `workers` decode threads (at least one).
    pub fn with_workers(root: Option<PathBuf>, workers: usize) -> Self {
        let (jobs, rx) = mpsc::channel::<Job>();
        let rx = Arc::new(Mutex::new(rx));
        for i in 0..workers.max(1) {
            let rx = Arc::clone(&rx);
            let spawned = thread::Builder::new()
                .name(format!("symboard-image-{i}"))
                .spawn(move || run_worker(&rx));
            if let Err(err) = spawned {
                log::warn!("image worker {i} not started: {err}");
            }
        }
        Self { root, jobs }
    }

    fn path_for(&self, url: &str) -> Option<PathBuf> {
        let path = match url.strip_prefix("file://") {
            Some(p) => p,
            None if url.contains("://") || url.starts_with("data:") => return None,
            None => url,
        };
        let path = Path::new(path);
        Some(match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        })
    }
}

impl Default for FsImageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSource for FsImageSource {
    fn fetch(&self, url: &str, done: Completion) {
        let Some(path) = self.path_for(url) else {
            done.complete(Err(ImageError::UnsupportedSource(url.to_string())));
            return;
        };
        // Fails only if no worker is left to take the job.
        if let Err(mpsc::SendError((_, done))) = self.jobs.send((path, done)) {
            let url = done.url().to_string();
            done.complete(Err(ImageError::NoWorker(url)));
        }
    }
}

fn run_worker(jobs: &Mutex<Receiver<Job>>) {
    loop {
        let job = match jobs.lock() {
            Ok(rx) => rx.recv(),
            Err(_) => return,
        };
        let Ok((path, done)) = job else {
            return;
        };
        let result = decode_file(done.url(), &path);
        done.complete(result);
    }
}

/// Read and decode one image file.
pub fn decode_file(url: &str, path: &Path) -> LoadResult {
    let bytes = std::fs::read(path).map_err(|source| ImageError::Io {
        url: url.to_string(),
        source,
    })?;
    decode_bytes(url, &bytes)
}

/// Decode an encoded image (PNG or JPEG).
pub fn decode_bytes(url: &str, bytes: &[u8]) -> LoadResult {
    let img = image::load_from_memory(bytes).map_err(|source| ImageError::Decode {
        url: url.to_string(),
        source,
    })?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();
    Bitmap::from_rgba8(w, h, rgba.into_raw()).ok_or_else(|| ImageError::Decode {
        url: url.to_string(),
        source: image::ImageError::Limits(image::error::LimitError::from_kind(
            image::error::LimitErrorKind::DimensionError,
        )),
    })
}

// ---------------------------------------------------------------------------
// ImageCache
// ---------------------------------------------------------------------------

/// URL-keyed bitmap cache, one per rendering session.
///
/// `W` is whatever the caller needs back when an image arrives (the
/// renderer uses a tile id plus what to paint).
pub struct ImageCache<W> {
    source: Box<dyn ImageSource>,
    ready: HashMap<String, Bitmap>,
    in_flight: HashMap<String, Vec<(Generation, W)>>,
    tx: Sender<(String, LoadResult)>,
    rx: Receiver<(String, LoadResult)>,
    loads_started: u64,
}

impl<W> ImageCache<W> {
    pub fn new(source: impl ImageSource + 'static) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source: Box::new(source),
            ready: HashMap::new(),
            in_flight: HashMap::new(),
            tx,
            rx,
            loads_started: 0,
        }
    }

    /// The bitmap for `url` if it is loaded. Otherwise register `waiter`
    /// under `generation` and make sure a load is in flight.
    pub fn resolve(&mut self, url: &str, generation: Generation, waiter: W) -> Option<Bitmap> {
        if let Some(bitmap) = self.ready.get(url) {
            return Some(bitmap.clone());
        }
        if let Some(waiters) = self.in_flight.get_mut(url) {
            log::trace!("{url}: attaching to in-flight load ({} waiting)", waiters.len());
            waiters.push((generation, waiter));
            return None;
        }
        self.in_flight
            .insert(url.to_string(), vec![(generation, waiter)]);
        self.loads_started += 1;
        self.source.fetch(
            url,
            Completion {
                url: url.to_string(),
                tx: self.tx.clone(),
            },
        );
        None
    }

    /// Apply every finished load, in arrival order. Returns the waiters
    /// whose generation equals `current`; the rest are dropped. Successful
    /// results are cached regardless of generation.
    pub fn drain(&mut self, current: Generation) -> Vec<(W, Bitmap)> {
        let mut delivered = Vec::new();
        loop {
            let (url, result) = match self.rx.try_recv() {
                Ok(msg) => msg,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };
            let waiters = self.in_flight.remove(&url).unwrap_or_default();
            match result {
                Ok(bitmap) => {
                    for (generation, waiter) in waiters {
                        if generation == current {
                            delivered.push((waiter, bitmap.clone()));
                        } else {
                            log::trace!("{url}: dropping paint for stale {generation}");
                        }
                    }
                    self.ready.insert(url, bitmap);
                }
                Err(err) => log::warn!("image load failed: {err}"),
            }
        }
        delivered
    }

    /// Cached bitmap for `url`, without starting a load.
    pub fn get(&self, url: &str) -> Option<&Bitmap> {
        self.ready.get(url)
    }

    /// Whether a load for `url` has been started and not yet drained.
    pub fn is_loading(&self, url: &str) -> bool {
        self.in_flight.contains_key(url)
    }

    /// Number of loads handed to the source so far.
    pub fn loads_started(&self) -> u64 {
        self.loads_started
    }

    /// Number of cached bitmaps.
    pub fn len(&self) -> usize {
        self.ready.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }
}

impl<W> fmt::Debug for ImageCache<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageCache")
            .field("ready", &self.ready.len())
            .field("in_flight", &self.in_flight.len())
            .field("loads_started", &self.loads_started)
            .finish()
    }
}
