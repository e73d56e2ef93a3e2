use std::path::{Path, PathBuf};

use crate::shared::constants::{IMAGES_DIR, MASKS_DIR, TIMESTAMP_FORMAT};

use super::errors::BatchError;

/// Resolved paths of one video's workspace, built once per run.
///
/// ```text
/// <root>/<video name>/
///     images/            source frames
///     masks/             masks, paired to frames by number
///     <kind>/<stamp>/    output frames of one run
///     <kind>/<kind>_<stamp>.mp4
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkspaceLayout {
    base: PathBuf,
    images: PathBuf,
    masks: PathBuf,
}

impl WorkspaceLayout {
    /// Locates `<root>/<video_name>` and checks that it holds `images/` and
    /// `masks/` directories.
    pub fn resolve(root: &Path, video_name: &str) -> Result<Self, BatchError> {
        let base = root.join(video_name);
        if !base.is_dir() {
            return Err(BatchError::WorkspaceNotFound(base));
        }
        let base = base.canonicalize().unwrap_or(base);

        let images = base.join(IMAGES_DIR);
        if !images.is_dir() {
            return Err(BatchError::MissingDirectory(images));
        }
        let masks = base.join(MASKS_DIR);
        if !masks.is_dir() {
            return Err(BatchError::MissingDirectory(masks));
        }

        Ok(Self {
            base,
            images,
            masks,
        })
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn images_dir(&self) -> &Path {
        &self.images
    }

    pub fn masks_dir(&self) -> &Path {
        &self.masks
    }

    pub fn output_dir(&self, kind: &str, stamp: &str) -> PathBuf {
        self.base.join(kind).join(stamp)
    }

    /// Where the video exported from `output_dir(kind, stamp)` goes.
    pub fn video_path(&self, kind: &str, stamp: &str) -> PathBuf {
        self.base.join(kind).join(format!("{kind}_{stamp}.mp4"))
    }
}

/// Local time formatted for output directory names, e.g. `20240131_235959`.
pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Regular files in `dir` whose extension matches one of `extensions`
/// (case-insensitive), sorted by file name.
pub fn list_image_files(dir: &Path, extensions: &[&str]) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_extension(&path, extensions) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)))
}

/// File name of `path` as UTF-8, lossy.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::FRAME_EXTENSIONS;
    use std::fs;

    fn make_workspace(root: &Path, name: &str) -> PathBuf {
        let base = root.join(name);
        fs::create_dir_all(base.join("images")).unwrap();
        fs::create_dir_all(base.join("masks")).unwrap();
        base
    }

    #[test]
    fn test_resolve_finds_subdirectories() {
        let root = tempfile::tempdir().unwrap();
        make_workspace(root.path(), "demo");

        let layout = WorkspaceLayout::resolve(root.path(), "demo").unwrap();

        assert!(layout.base().is_absolute());
        assert!(layout.base().ends_with("demo"));
        assert!(layout.images_dir().ends_with("demo/images"));
        assert!(layout.masks_dir().ends_with("demo/masks"));
    }

    #[test]
    fn test_resolve_missing_workspace() {
        let root = tempfile::tempdir().unwrap();
        let err = WorkspaceLayout::resolve(root.path(), "nope").unwrap_err();
        assert!(matches!(err, BatchError::WorkspaceNotFound(_)));
    }

    #[test]
    fn test_resolve_missing_masks_dir() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("demo").join("images")).unwrap();
        let err = WorkspaceLayout::resolve(root.path(), "demo").unwrap_err();
        match err {
            BatchError::MissingDirectory(p) => assert!(p.ends_with("masks")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_output_and_video_paths() {
        let root = tempfile::tempdir().unwrap();
        make_workspace(root.path(), "demo");
        let layout = WorkspaceLayout::resolve(root.path(), "demo").unwrap();

        assert_eq!(
            layout.output_dir("mosaic", "20240101_120000"),
            layout.base().join("mosaic").join("20240101_120000")
        );
        assert_eq!(
            layout.video_path("mosaic", "20240101_120000"),
            layout.base().join("mosaic").join("mosaic_20240101_120000.mp4")
        );
    }

    #[test]
    fn test_timestamp_shape() {
        let stamp = timestamp();
        assert_eq!(stamp.len(), 15);
        assert_eq!(&stamp[8..9], "_");
        assert!(stamp.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.PNG", "a.jpg", "c.jpeg", "notes.txt", "d.bmp", "e"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("sub.png")).unwrap();

        let names: Vec<String> = list_image_files(dir.path(), FRAME_EXTENSIONS)
            .unwrap()
            .iter()
            .map(|p| file_name_of(p))
            .collect();

        assert_eq!(names, vec!["a.jpg", "b.PNG", "c.jpeg"]);
    }

    #[test]
    fn test_list_missing_dir_is_error() {
        assert!(list_image_files(Path::new("/nonexistent/dir"), FRAME_EXTENSIONS).is_err());
    }
}
