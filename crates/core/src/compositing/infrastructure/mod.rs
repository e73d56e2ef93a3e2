pub mod compositor_factory;
pub mod green_background_compositor;
pub mod mosaic_compositor;
