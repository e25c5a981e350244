pub mod assets;
pub mod camera;
pub mod core;
pub mod elements;
pub mod loading;
pub mod scene;
pub mod systems;
pub mod viewport;
