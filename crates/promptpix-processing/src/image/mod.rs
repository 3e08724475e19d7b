//! Image decoding and PNG re-encoding

mod normalizer;

pub use normalizer::ImageNormalizer;
