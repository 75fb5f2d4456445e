pub mod canvas;
pub mod config;
pub mod demo;
pub mod geometry;
pub mod runtime;
pub mod scene;
pub mod tooling;
pub mod transform;
