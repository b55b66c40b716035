use std::path::PathBuf;

use anyhow::Result;

mod camera;
mod config;
mod demo;
mod engine;
mod overlay;
mod rendering;
mod scene_graph;
mod window;

fn main() -> Result<()> {
    pretty_env_logger::init();

    // Optional glTF scene whose named nodes provide the markers and models.
    let scene_path = std::env::args_os().nth(1).map(PathBuf::from);

    pollster::block_on(window::run(scene_path))?;

    Ok(())
}
