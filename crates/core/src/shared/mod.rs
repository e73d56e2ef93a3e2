pub mod bounding_box;
pub mod constants;
pub mod effect_params;
pub mod fill_color;
pub mod frame;
pub mod frame_index;
pub mod mask;
pub mod video_metadata;
