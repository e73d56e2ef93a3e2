pub mod errors;
pub mod export_video_use_case;
pub mod mask_batch_use_case;
pub mod pipeline_logger;
pub mod rescale_images_use_case;
pub mod workspace;
