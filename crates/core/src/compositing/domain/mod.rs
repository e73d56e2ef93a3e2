pub mod compose;
pub mod frame_compositor;
pub mod region_effects;
pub mod region_transform;
