pub mod camera;
pub mod canvas_pipeline;
pub mod frame_batch;
pub mod gpu_context;
pub mod texture;
pub mod vertex;

pub use camera::{CameraUniform, ScreenCamera};
pub use canvas_pipeline::CanvasPipeline;
pub use frame_batch::{DrawCall, FrameBatch, TextLabel, WHITE_TEXTURE_KEY};
pub use gpu_context::GpuContext;
pub use texture::Texture;
pub use vertex::CanvasVertex;
