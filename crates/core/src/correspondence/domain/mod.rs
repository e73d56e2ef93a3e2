pub mod frame_resolver;
