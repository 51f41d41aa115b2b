pub mod pgm;

pub use pgm::RasterImage;
