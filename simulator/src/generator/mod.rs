pub mod preset;
pub mod scene;
