use super::*;
use crate::model::Rgb8;
use approx::assert_relative_eq;
use std::cell::RefCell;
use std::rc::Rc;

fn recorded(scene: &mut Scene) -> Rc<RefCell<Vec<SceneEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    scene.subscribe(move |event| sink.borrow_mut().push(*event));
    events
}

#[test]
fn test_new_scene_defaults() {
    let scene = Scene::new(800, 600);
    assert!(scene.lights().is_empty());
    assert_eq!(scene.entries().len(), 2);
    assert_eq!(scene.options().primitive(), PrimitiveKind::Sphere);
    assert_relative_eq!(scene.camera().aspect(), 800.0 / 600.0);
    assert_eq!(scene.time(), 0.0);
}

#[test]
fn test_default_entries_selected_then_plate() {
    let mut scene = Scene::new(800, 600);
    scene.next_primitive();

    let entries = scene.entries();
    assert_eq!(entries[0].primitive_kind(scene.options()), PrimitiveKind::Cube);
    assert_eq!(entries[0].material(scene.material()), scene.material());
    assert_eq!(entries[1].primitive_kind(scene.options()), PrimitiveKind::Cube);
    assert_eq!(entries[1].material(scene.material()), &Material::matte(150));
    assert!(entries[1].transform.position.y < 0.0);
}

#[test]
fn test_from_config() {
    let config = ViewerConfig {
        width: 640,
        height: 480,
        primitive: PrimitiveKind::Torus,
        wireframe: true,
        depth_test: false,
        show_normals: true,
        animation: false,
        ..ViewerConfig::default()
    };
    let scene = Scene::from_config(&config);

    assert_eq!(scene.options().primitive(), PrimitiveKind::Torus);
    assert_eq!(scene.options().fill_mode(), FillMode::Wireframe);
    assert!(!scene.options().depth_test);
    assert!(scene.options().backface_culling);
    assert!(scene.options().show_normals);
    assert!(!scene.is_animating());
    assert_eq!(scene.lights().len(), 1);
    assert_relative_eq!(scene.camera().aspect(), 640.0 / 480.0);

    let unlit = Scene::from_config(&ViewerConfig {
        seed_light: false,
        ..ViewerConfig::default()
    });
    assert!(unlit.lights().is_empty());
}

#[test]
fn test_from_config_with_zero_size() {
    for (width, height) in [(1280, 0), (0, 720)] {
        let scene = Scene::from_config(&ViewerConfig {
            width,
            height,
            ..ViewerConfig::default()
        });
        assert_relative_eq!(scene.camera().aspect(), 1.0);
        assert!(scene.camera().projection_matrix().is_finite());
    }
}

#[test]
fn test_tick_advances_only_while_animating() {
    let mut scene = Scene::new(800, 600);
    for _ in 0..60 {
        scene.tick();
    }
    assert_relative_eq!(scene.time(), 1.0, epsilon = 1e-4);

    scene.set_animation(false);
    scene.tick();
    assert_relative_eq!(scene.time(), 1.0, epsilon = 1e-4);
}

#[test]
fn test_setters_notify_observers() {
    let mut scene = Scene::new(800, 600);
    let events = recorded(&mut scene);

    scene.set_eye(Vec3::new(0.0, 1.0, -5.0));
    scene.set_fovy(60.0);
    scene.add_default_light(LightKind::Point);
    scene.set_light_active(0, false);
    scene.update_material(|m| m.set_shininess(10.0));
    scene.toggle_depth_test();

    assert_eq!(
        *events.borrow(),
        vec![
            SceneEvent::CameraChanged,
            SceneEvent::ProjectionChanged,
            SceneEvent::LightAdded(0),
            SceneEvent::LightChanged(0),
            SceneEvent::MaterialChanged,
            SceneEvent::OptionsChanged,
        ]
    );
}

#[test]
fn test_rejected_edits_are_silent() {
    let mut scene = Scene::new(800, 600);
    for _ in 0..MAX_LIGHTS {
        assert!(scene.add_default_light(LightKind::Point));
    }
    let events = recorded(&mut scene);

    assert!(!scene.add_default_light(LightKind::Point));
    assert!(!scene.set_light_active(MAX_LIGHTS, false));
    scene.set_fovy(100.0);
    events.borrow_mut().clear();
    assert!(!scene.zoom(100.0));
    assert!(events.borrow().is_empty());
}

#[test]
fn test_default_lights_walk_a_circle() {
    let mut scene = Scene::new(800, 600);
    scene.add_default_light(LightKind::Point);
    scene.add_default_light(LightKind::Point);
    scene.add_default_light(LightKind::Directional);

    let first = scene.lights().get(0).unwrap();
    assert_relative_eq!(first.position.x, 3.0, epsilon = 1e-5);
    assert_relative_eq!(first.position.z, 0.0, epsilon = 1e-5);

    let second = scene.lights().get(1).unwrap();
    assert_relative_eq!(second.position.x, second.position.z, epsilon = 1e-5);

    let third = scene.lights().get(2).unwrap();
    assert!(third.is_directional());
    assert_relative_eq!(third.position.x, 0.0, epsilon = 1e-5);
    assert_relative_eq!(third.position.z, 1.0, epsilon = 1e-5);
}

#[test]
fn test_update_light_changes_serialized_slot() {
    let mut scene = Scene::new(800, 600);
    scene.add_light(Light::point(Vec3::ZERO));
    assert!(scene.update_light(0, |light| light.diffuse = Rgb8::new(0, 255, 0)));

    let uniforms = scene.lights().serialize();
    assert_eq!(uniforms.slots[0].diffuse, [0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn test_resize_updates_aspect() {
    let mut scene = Scene::new(800, 600);
    let events = recorded(&mut scene);

    scene.resize(1920, 1080);
    assert_relative_eq!(scene.camera().aspect(), 1920.0 / 1080.0);

    // minimized window
    scene.resize(1920, 0);
    assert_relative_eq!(scene.camera().aspect(), 1920.0 / 1080.0);
    assert_eq!(events.borrow().len(), 1);
}
