//! Files served under `/images/*`.
//!
//! # Security
//!
//! A request path is accepted only if every component is a plain name (no
//! root, no `.`/`..`, no drive prefix). The joined path is then
//! canonicalized and must still lie under the canonical root, which defeats
//! symlinks that point outside it. Any failure is reported as not found.

use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::instrument;

/// A file read from the store.
#[derive(Debug, Clone)]
pub struct Resource {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Read-only view of the image root directory.
#[derive(Debug, Clone)]
pub struct ResourceStore {
    root: PathBuf,
}

impl ResourceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Read the file at `relative` under the root.
    ///
    /// Returns `None` for rejected paths, missing files, directories and
    /// unreadable files alike.
    #[instrument(skip_all, name = "image.services.resource_store.fetch")]
    pub async fn fetch(&self, relative: &str) -> Option<Resource> {
        let path = match self.resolve(relative).await {
            Ok(Some(path)) => path,
            Ok(None) => {
                tracing::debug!(target: "image.services.resources", "Resource path rejected");
                return None;
            }
            Err(e) => {
                tracing::debug!(target: "image.services.resources", error = %e, "Resource not found");
                return None;
            }
        };

        let metadata = tokio::fs::metadata(&path).await.ok()?;
        if !metadata.is_file() {
            tracing::debug!(target: "image.services.resources", "Resource is not a regular file");
            return None;
        }

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(target: "image.services.resources", error = %e, "Failed to read resource");
                return None;
            }
        };

        Some(Resource {
            bytes,
            content_type: content_type_for(&path),
        })
    }

    /// Map `relative` to a canonical path under the root.
    ///
    /// `Ok(None)` means the path was rejected; `Err` means it does not exist.
    async fn resolve(&self, relative: &str) -> io::Result<Option<PathBuf>> {
        let Some(clean) = sanitize_relative_path(relative) else {
            return Ok(None);
        };

        let root = tokio::fs::canonicalize(&self.root).await?;
        let candidate = tokio::fs::canonicalize(root.join(clean)).await?;

        if candidate.starts_with(&root) {
            Ok(Some(candidate))
        } else {
            Ok(None)
        }
    }
}

/// Turn a URL path remainder into a relative path of plain components.
///
/// One leading `/` is tolerated. Empty paths and any `..`, `.`, root or
/// prefix component yield `None`.
pub fn sanitize_relative_path(relative: &str) -> Option<PathBuf> {
    let trimmed = relative.strip_prefix('/').unwrap_or(relative);
    if trimmed.is_empty() || trimmed.contains('\0') || trimmed.contains('\\') {
        return None;
    }

    let path = Path::new(trimmed);
    let mut clean = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir
            | Component::ParentDir
            | Component::RootDir
            | Component::Prefix(_) => return None,
        }
    }

    // `Path::components` silently drops interior `.` segments
    if trimmed.split('/').any(|segment| segment == "." || segment == "..") {
        return None;
    }

    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}

/// Content type from the file extension (case-insensitive).
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        Some("ico") => "image/x-icon",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    fn store_with_photo() -> (tempfile::TempDir, ResourceStore) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photo.jpg"), JPEG_BYTES).unwrap();
        std::fs::create_dir(dir.path().join("albums")).unwrap();
        std::fs::write(dir.path().join("albums").join("cover.PNG"), b"png").unwrap();
        let store = ResourceStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_sanitize_accepts_plain_paths() {
        assert_eq!(
            sanitize_relative_path("photo.jpg"),
            Some(PathBuf::from("photo.jpg"))
        );
        assert_eq!(
            sanitize_relative_path("/albums/cover.png"),
            Some(PathBuf::from("albums/cover.png"))
        );
    }

    #[test]
    fn test_sanitize_rejects_traversal_and_absolute() {
        for bad in [
            "",
            "/",
            "../etc/passwd",
            "../../etc/passwd",
            "albums/../../secret",
            "albums/./cover.png",
            "//etc/passwd",
            "..",
            "a\\..\\b",
            "photo.jpg\0",
        ] {
            assert_eq!(sanitize_relative_path(bad), None, "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_content_type_for_known_and_unknown() {
        assert_eq!(content_type_for(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.JPEG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.png")), "image/png");
        assert_eq!(content_type_for(Path::new("a.svg")), "image/svg+xml");
        assert_eq!(content_type_for(Path::new("a.txt")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_fetch_existing_file() {
        let (_dir, store) = store_with_photo();

        let resource = store.fetch("photo.jpg").await.expect("photo should exist");
        assert_eq!(resource.bytes, JPEG_BYTES);
        assert_eq!(resource.content_type, "image/jpeg");

        let nested = store.fetch("albums/cover.PNG").await.expect("cover should exist");
        assert_eq!(nested.content_type, "image/png");
    }

    #[tokio::test]
    async fn test_fetch_missing_file_and_directory() {
        let (_dir, store) = store_with_photo();

        assert!(store.fetch("missing.jpg").await.is_none());
        assert!(store.fetch("albums").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_rejects_escape_to_sibling() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("images");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer.path().join("secret.txt"), b"top secret").unwrap();

        let store = ResourceStore::new(&root);
        assert!(store.fetch("../secret.txt").await.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_fetch_rejects_symlink_out_of_root() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("images");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(outer.path().join("secret.jpg"), b"top secret").unwrap();
        std::os::unix::fs::symlink(outer.path().join("secret.jpg"), root.join("link.jpg"))
            .unwrap();

        let store = ResourceStore::new(&root);
        assert!(store.fetch("link.jpg").await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_with_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = ResourceStore::new(dir.path().join("does-not-exist"));

        assert!(store.fetch("photo.jpg").await.is_none());
    }
}
