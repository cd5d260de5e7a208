pub mod collision;
pub mod math;
#[cfg(feature = "physics")]
pub mod physics;
pub mod shapes;
