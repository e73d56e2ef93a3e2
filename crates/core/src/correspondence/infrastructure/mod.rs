pub mod image_index;
pub mod indexed_frame_resolver;
