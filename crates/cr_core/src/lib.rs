pub mod canvas;
pub mod input;
pub mod time;
