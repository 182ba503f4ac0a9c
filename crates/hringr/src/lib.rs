//! # Hringr — Textured Torus Viewer
//!
//! A small demo viewer built on winit + wgpu: one window, one procedurally
//! generated torus, one procedurally generated texture, and a shader program
//! loaded from disk — either GLSL source or precompiled SPIR-V, selected at
//! runtime. Left-drag orbits the camera, right-drag zooms, Escape quits.

pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod mesh;
pub mod reload;
pub mod render;
pub mod shader;
pub mod texture;
