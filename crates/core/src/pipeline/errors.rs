use std::path::PathBuf;

use thiserror::Error;

/// Conditions that stop a batch before or while it starts.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("workspace not found: {0}")]
    WorkspaceNotFound(PathBuf),
    #[error("directory not found: {0}")]
    MissingDirectory(PathBuf),
    #[error("cannot list {path}: {source}")]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no mask files in {0}")]
    NoMasks(PathBuf),
    #[error("no image files in {0}")]
    NoImages(PathBuf),
    #[error("cannot create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why one mask produced no output frame. The batch carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("cannot read mask: {0}")]
    MaskUnreadable(String),
    #[error("no source frame could be resolved")]
    Unresolved,
    #[error("source frame not found: {0}")]
    SourceMissing(PathBuf),
    #[error("cannot read source frame {path}: {reason}")]
    SourceUnreadable { path: PathBuf, reason: String },
    #[error("mask is {mask_width}x{mask_height} but frame is {frame_width}x{frame_height}")]
    DimensionMismatch {
        frame_width: u32,
        frame_height: u32,
        mask_width: u32,
        mask_height: u32,
    },
    #[error("compositing failed: {0}")]
    CompositeFailed(String),
    #[error("cannot write {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = BatchError::NoMasks(PathBuf::from("/ws/demo/masks"));
        assert_eq!(err.to_string(), "no mask files in /ws/demo/masks");

        let err = FrameError::SourceMissing(PathBuf::from("/ws/demo/images/0001.png"));
        assert!(err.to_string().contains("0001.png"));
    }

    #[test]
    fn test_io_source_is_kept() {
        use std::error::Error;
        let err = BatchError::OutputDirectory {
            path: PathBuf::from("/ro/out"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_dimension_mismatch_message() {
        let err = FrameError::DimensionMismatch {
            frame_width: 640,
            frame_height: 480,
            mask_width: 320,
            mask_height: 240,
        };
        assert_eq!(err.to_string(), "mask is 320x240 but frame is 640x480");
    }
}
