pub mod image_io;
pub mod manifest;
pub mod prepare;
