use std::collections::HashMap;

use crate::shared::frame_index::extract_frame_index;

/// Frame number → image file name, built once per batch.
///
/// Names without digits are left out. When two names share a frame
/// number the later one in iteration order replaces the earlier one.
#[derive(Clone, Debug, Default)]
pub struct ImageIndex {
    entries: HashMap<u64, String>,
}

impl ImageIndex {
    pub fn build<I, S>(file_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries = HashMap::new();
        for name in file_names {
            let name = name.as_ref();
            match extract_frame_index(name) {
                Ok(index) => {
                    if let Some(previous) = entries.insert(index, name.to_string()) {
                        log::debug!("Frame {index}: {name} replaces {previous}");
                    }
                }
                Err(e) => log::debug!("Not indexed: {e}"),
            }
        }
        Self { entries }
    }

    pub fn get(&self, index: u64) -> Option<&str> {
        self.entries.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
