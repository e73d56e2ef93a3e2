pub mod mask_normalizer;
