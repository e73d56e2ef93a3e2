use std::path::{Path, PathBuf};

use crate::correspondence::domain::frame_resolver::{
    FrameResolver, Resolution, ResolutionStrategy,
};
use crate::shared::constants::SOURCE_PROBE_EXTENSIONS;
use crate::shared::frame_index::extract_frame_index;

use super::image_index::ImageIndex;

/// Pairs masks with images through a cascade, first hit wins:
///
/// 1. frame number of the mask looked up in the [`ImageIndex`];
/// 2. mask stem + `.jpg`, `.jpeg`, `.png` probed on disk, in that order;
/// 3. the mask's own file name inside the image directory, unchecked.
pub struct IndexedFrameResolver {
    image_dir: PathBuf,
    index: ImageIndex,
}

impl IndexedFrameResolver {
    pub fn new(image_dir: impl Into<PathBuf>, index: ImageIndex) -> Self {
        Self {
            image_dir: image_dir.into(),
            index,
        }
    }

    pub fn index(&self) -> &ImageIndex {
        &self.index
    }

    fn by_frame_index(&self, mask_file_name: &str) -> Option<Resolution> {
        let frame = match extract_frame_index(mask_file_name) {
            Ok(frame) => frame,
            Err(e) => {
                log::debug!("{e}; falling back to extension probing");
                return None;
            }
        };
        self.index.get(frame).map(|image| Resolution {
            path: self.image_dir.join(image),
            strategy: ResolutionStrategy::FrameIndex(frame),
        })
    }
}

impl FrameResolver for IndexedFrameResolver {
    fn resolve(&self, mask_file_name: &str) -> Option<Resolution> {
        if let Some(found) = self.by_frame_index(mask_file_name) {
            return Some(found);
        }

        let stem = Path::new(mask_file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(mask_file_name);
        if let Some((path, ext)) = probe_extensions(&self.image_dir, stem, SOURCE_PROBE_EXTENSIONS)
        {
            return Some(Resolution {
                path,
                strategy: ResolutionStrategy::ExtensionProbe(ext),
            });
        }

        Some(Resolution {
            path: self.image_dir.join(mask_file_name),
            strategy: ResolutionStrategy::SameName,
        })
    }
}

/// First `dir/<stem>.<ext>` that exists, trying `extensions` in order.
pub fn probe_extensions(
    dir: &Path,
    stem: &str,
    extensions: &[&'static str],
) -> Option<(PathBuf, &'static str)> {
    extensions.iter().find_map(|&ext| {
        let candidate = dir.join(format!("{stem}.{ext}"));
        candidate.is_file().then_some((candidate, ext))
    })
}
