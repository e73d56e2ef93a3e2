pub mod compositing;
pub mod correspondence;
pub mod imaging;
pub mod masking;
pub mod pipeline;
pub mod shared;
pub mod video;
