use std::path::PathBuf;

/// Which rule paired a mask with its source frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// Matched through the frame number embedded in both file names.
    FrameIndex(u64),
    /// Mask stem with this extension exists in the image directory.
    ExtensionProbe(&'static str),
    /// Same file name as the mask; existence not checked.
    SameName,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub path: PathBuf,
    pub strategy: ResolutionStrategy,
}

/// Maps a mask file name to the source frame it belongs to.
///
/// Returned paths are candidates: the caller still checks that the file
/// exists before loading it. `None` means no candidate at all.
pub trait FrameResolver: Send {
    fn resolve(&self, mask_file_name: &str) -> Option<Resolution>;
}
