pub mod renderer;

pub use renderer::{NO_REPOSITORIES, Renderer};
