pub mod animation;
pub mod color;
pub mod emitter;
