pub mod hit;
pub mod scene;

pub use hit::{PortHit, hit_test, hit_test_port, hit_test_rect};
pub use scene::{ContentSlot, NodeVisual, Scene, project};
