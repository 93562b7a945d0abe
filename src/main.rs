use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use orbitview::{
    Camera, CameraKind, Easing, Input, KeyCode, MeshData, MouseButton, Scene, SceneObject,
    Transform, Vec2, Vec3, Viewport,
};

const DT: f32 = 1.0 / 60.0;

/// Scripted editor session: orbit, click, fly to the selection.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut scene = Scene::new();
    let cube = Arc::new(MeshData::cube(1.0));
    let floor = scene.add_object(
        SceneObject::new("floor")
            .with_mesh(MeshData::plane(20.0))
            .with_transform(Transform::from_position(Vec3::new(0.0, -0.5, 0.0))),
    );
    for (i, x) in [-3.0, 0.0, 3.0].into_iter().enumerate() {
        scene.add_object(
            SceneObject::new(format!("crate-{i}"))
                .with_mesh(cube.clone())
                .with_transform(Transform::from_position(Vec3::new(x, 0.0, 0.0))),
        );
    }
    log::info!("scene has {} objects (floor is {floor})", scene.len());

    let viewport = Viewport::new(0.0, 0.0, 1280.0, 720.0);
    let mut camera = Camera::create(CameraKind::Perspective, "editor", viewport.aspect_ratio(), 0.1, 1000.0);
    camera.set_viewport_bounds(viewport);
    camera.set_easing(Easing::EaseInOutCubic);

    let mut input = Input::new();
    let center = Vec2::new(640.0, 360.0);

    // Middle-drag upward and to the right to look down on the crates.
    input.move_cursor(center);
    input.press_button(MouseButton::Middle);
    camera.update(&input, DT);
    for _ in 0..10 {
        input.begin_frame();
        let next = input.mouse_position() + Vec2::new(6.0, -8.0);
        input.move_cursor(next);
        camera.update(&input, DT);
    }
    input.begin_frame();
    input.release_button(MouseButton::Middle);
    camera.update(&input, DT);
    log::info!(
        "orbited to yaw {:.1}°, pitch {:.1}°, position {:.2}",
        camera.yaw(),
        camera.pitch(),
        camera.position()
    );

    // Scroll in a little.
    input.begin_frame();
    input.add_scroll(Vec2::new(0.0, 2.0));
    camera.update(&input, DT);
    log::info!("zoomed to distance {:.2}", camera.distance());

    // Click in the middle of the viewport.
    match scene.select_at_cursor(&camera, center) {
        Some(hit) => {
            let name = scene.get(hit.object).map(|o| o.name.clone()).unwrap_or_default();
            log::info!("picked {name} ({}) at {:.2} units, point {:.2}", hit.object, hit.distance, hit.point);
        }
        None => log::info!("picked nothing"),
    }

    // Fly to the rightmost crate.
    let Some(target) = scene.find_by_name("crate-2") else {
        log::error!("crate-2 is missing");
        return;
    };
    let focus = scene.get(target).map(|o| o.world_center()).unwrap_or(Vec3::ZERO);
    let arrived = Rc::new(Cell::new(false));
    let flag = arrived.clone();
    let offset = camera.position() - camera.target();
    camera.move_to_then(focus + offset, focus, 0.5, move || flag.set(true));

    // Held keys are ignored while the camera flies.
    input.begin_frame();
    input.press_key(KeyCode::ArrowUp);
    let mut frames = 0;
    while camera.is_animating() {
        camera.update(&input, DT);
        frames += 1;
    }
    log::info!(
        "arrived after {frames} frames (callback fired: {}), target {:.2}",
        arrived.get(),
        camera.target()
    );

    scene.select(target);
    let uniforms = camera.uniforms();
    log::info!(
        "selected {:?}; camera uniforms are {} bytes",
        scene.selected(),
        uniforms.as_bytes().len()
    );
}
