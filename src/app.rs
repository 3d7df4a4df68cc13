use crate::scene::{NodeId, Scene};
use crate::walkthrough::Walkthrough;

/// One line describing a node's world placement.
pub fn describe_node(scene: &Scene, id: NodeId) -> String {
    let node = &scene[id];
    let position = scene.world_position(id);
    format!(
        " - {} ({}) pos=({:.2}, {:.2}, {:.2})",
        node.name,
        node.kind.label(),
        position.x,
        position.y,
        position.z
    )
}

pub fn print_final_state(walk: &Walkthrough) {
    let scene = walk.scene();
    println!("Final object states after {} frame(s):", walk.frame_count());
    for (id, _) in scene.nodes() {
        println!("{}", describe_node(scene, id));
    }
    let glint = scene.material(walk.handles().glint_material);
    println!(
        "Glint material transparent={} opacity={:.2}",
        glint.transparent, glint.opacity
    );
}

/// Runs `frames` updates back to back, as a host without a display would.
pub fn run_frames(walk: &mut Walkthrough, frames: u64) {
    for _ in 0..frames {
        walk.update();
    }
}
