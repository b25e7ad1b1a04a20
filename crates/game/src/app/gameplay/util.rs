fn pose_lerp(start: &Transform, target: &Transform, t: f32) -> Transform {
    Transform {
        position: start.position.lerp(target.position, t),
        rotation: start.rotation.nlerp(target.rotation, t),
    }
}

/// Horizontal bearing from one point to another; None when the points
/// stack vertically.
fn yaw_toward(from: Vec3, to: Vec3) -> Option<f32> {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    if dx * dx + dz * dz <= f32::EPSILON {
        return None;
    }
    Some(dx.atan2(dz))
}

fn flat_forward(yaw: f32) -> Vec3 {
    Vec3 {
        x: yaw.sin(),
        y: 0.0,
        z: yaw.cos(),
    }
}
