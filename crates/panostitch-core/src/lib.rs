pub mod camera;
pub mod composite;
pub mod consts;
pub mod equirect;
pub mod error;
pub mod feather;
pub mod fill;
pub mod filters;
pub mod frame;
pub mod io;
pub mod pipeline;
pub mod sampler;
