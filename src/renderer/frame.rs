use glam::{Mat4, Vec3};

use super::program::{ProgramId, ProgramSet};
use crate::error::Result;
use crate::model::PrimitiveKind;
use crate::scene::{FillMode, Scene, TransformStack};

/// Uniform scale applied to the unit sphere drawn at each light.
pub const MARKER_SCALE: f32 = 0.1;

/// One draw: which program and mesh to bind, and the bytes of its uniform block.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub program: ProgramId,
    pub primitive: PrimitiveKind,
    pub fill: FillMode,
    pub uniforms: Vec<u8>,
}

/// Everything the GPU pass needs for one frame, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub draws: Vec<DrawCall>,
    pub depth_test: bool,
    pub backface_culling: bool,
}

impl FramePlan {
    pub fn objects(&self) -> impl Iterator<Item = &DrawCall> {
        self.draws.iter().filter(|draw| draw.program != ProgramId::Marker)
    }

    pub fn markers(&self) -> impl Iterator<Item = &DrawCall> {
        self.draws.iter().filter(|draw| draw.program == ProgramId::Marker)
    }
}

fn normal_matrix(matrix: Mat4) -> [[f32; 4]; 4] {
    matrix.inverse().transpose().to_cols_array_2d()
}

/// Walks the scene list under `stack` and records one draw per entry, then
/// one marker per active light. The stack starts the frame at the camera view
/// and must be back at that depth when the walk ends.
pub fn build_frame(scene: &Scene, stack: &mut TransformStack, programs: &mut ProgramSet) -> Result<FramePlan> {
    let options = scene.options();
    let projection = scene.camera().projection_matrix().to_cols_array_2d();
    let view = scene.camera().view_matrix();

    stack.load(view);
    let lights = scene.lights().serialize();

    let object_program = if options.show_normals {
        ProgramId::Normals
    } else {
        ProgramId::Phong
    };

    let mut draws = Vec::with_capacity(scene.entries().len() + lights.count as usize);

    for entry in scene.entries() {
        stack.push();
        entry.transform.apply(stack);
        let model_view = stack.current();

        let program = programs.get_mut(object_program);
        let mut block = program.begin();
        program.set(&mut block, "mProjection", &projection);
        program.set(&mut block, "mModelView", &model_view.to_cols_array_2d());
        program.set(&mut block, "mView", &view.to_cols_array_2d());
        program.set(&mut block, "mNormals", &normal_matrix(model_view));
        program.set(&mut block, "mViewNormals", &normal_matrix(view));
        program.set(&mut block, "uMaterial", &entry.material(scene.material()).to_uniform());
        program.set(&mut block, "uNumLights", &lights.count);
        program.set(&mut block, "uLights", &lights.slots);

        draws.push(DrawCall {
            program: object_program,
            primitive: entry.primitive_kind(options),
            fill: options.fill_mode(),
            uniforms: block.into_bytes(),
        });
        stack.pop()?;
    }

    for light in scene.lights().active() {
        stack.push();
        stack.translate(light.position);
        stack.scale(Vec3::splat(MARKER_SCALE));

        let program = programs.get_mut(ProgramId::Marker);
        let mut block = program.begin();
        program.set(&mut block, "mProjection", &projection);
        program.set(&mut block, "mModelView", &stack.current().to_cols_array_2d());
        program.set(&mut block, "uColor", &light.diffuse.normalized());

        draws.push(DrawCall {
            program: ProgramId::Marker,
            primitive: PrimitiveKind::Sphere,
            fill: FillMode::Solid,
            uniforms: block.into_bytes(),
        });
        stack.pop()?;
    }

    stack.ensure_balanced()?;

    Ok(FramePlan {
        draws,
        depth_test: options.depth_test,
        backface_culling: options.backface_culling,
    })
}

/// Unwraps a built plan. A failed walk aborts only this frame: the error is
/// logged and the caller draws nothing.
pub fn plan_or_abort(plan: Result<FramePlan>) -> Option<FramePlan> {
    match plan {
        Ok(plan) => Some(plan),
        Err(e) => {
            log::error!("Frame aborted: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewerError;
    use crate::model::Rgb8;
    use crate::scene::{EntryPrimitive, Light, LightKind, LightSlot, SceneEntry, Transform, MAX_LIGHTS};
    use approx::assert_relative_eq;
    use glam::Vec4;

    fn read<T: bytemuck::Pod>(programs: &ProgramSet, draw: &DrawCall, name: &str) -> T {
        let slot = programs
            .get(draw.program)
            .table()
            .slot(name)
            .unwrap_or_else(|| panic!("{:?} has no uniform {}", draw.program, name));
        bytemuck::pod_read_unaligned(&draw.uniforms[slot.offset..slot.offset + std::mem::size_of::<T>()])
    }

    #[test]
    fn test_empty_scene_draws_entries_only() {
        let scene = Scene::new(800, 600);
        let mut stack = TransformStack::new();
        let mut programs = ProgramSet::new();

        let plan = build_frame(&scene, &mut stack, &mut programs).unwrap();
        assert_eq!(plan.objects().count(), scene.entries().len());
        assert_eq!(plan.markers().count(), 0);
        assert_eq!(stack.depth(), 0);

        let object = &plan.draws[0];
        assert_eq!(object.program, ProgramId::Phong);
        assert_eq!(object.primitive, PrimitiveKind::Sphere);
        assert_eq!(read::<u32>(&programs, object, "uNumLights"), 0);
    }

    #[test]
    fn test_single_red_light_end_to_end() {
        let mut scene = Scene::new(800, 600);
        let red = Rgb8::new(255, 0, 0);
        scene.add_light(Light::point(Vec3::new(0.0, 2.0, 0.0)).with_colors(red, red, red));

        let mut stack = TransformStack::new();
        let mut programs = ProgramSet::new();
        let plan = build_frame(&scene, &mut stack, &mut programs).unwrap();

        let object = &plan.draws[0];
        assert_eq!(read::<u32>(&programs, object, "uNumLights"), 1);
        let slots: [LightSlot; MAX_LIGHTS] = read(&programs, object, "uLights");
        assert!(slots[0].active());
        assert_eq!(slots[0].position, [0.0, 2.0, 0.0, 1.0]);
        assert_eq!(slots[0].is_directional, 0);
        assert_eq!(slots[0].ambient, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(slots[0].diffuse, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(slots[0].specular, [1.0, 0.0, 0.0, 1.0]);
        assert!(slots[1..].iter().all(|slot| !slot.active()));

        let markers: Vec<_> = plan.markers().collect();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].primitive, PrimitiveKind::Sphere);
        assert_eq!(read::<[f32; 4]>(&programs, markers[0], "uColor"), [1.0, 0.0, 0.0, 1.0]);

        // marker centre lands on the light, seen through the camera
        let model_view = Mat4::from_cols_array_2d(&read(&programs, markers[0], "mModelView"));
        let expected = scene.camera().view_matrix() * Vec4::new(0.0, 2.0, 0.0, 1.0);
        let centre = model_view * Vec4::W;
        assert_relative_eq!(centre.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(centre.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(centre.z, expected.z, epsilon = 1e-5);
    }

    #[test]
    fn test_inactive_lights_have_no_marker() {
        let mut scene = Scene::new(800, 600);
        scene.add_default_light(LightKind::Point);
        scene.add_default_light(LightKind::Directional);
        scene.set_light_active(0, false);

        let mut programs = ProgramSet::new();
        let plan = build_frame(&scene, &mut TransformStack::new(), &mut programs).unwrap();
        assert_eq!(plan.markers().count(), 1);
        assert_eq!(read::<u32>(&programs, &plan.draws[0], "uNumLights"), 2);
    }

    #[test]
    fn test_entry_transform_composes_with_view() {
        let scene = Scene::new(800, 600);
        let mut programs = ProgramSet::new();
        let plan = build_frame(&scene, &mut TransformStack::new(), &mut programs).unwrap();

        let plate = &scene.entries()[1];
        let model_view = Mat4::from_cols_array_2d(&read(&programs, &plan.draws[1], "mModelView"));
        let expected = scene.camera().view_matrix() * plate.transform.to_matrix();
        assert!(model_view.abs_diff_eq(expected, 1e-5));
        assert_eq!(plan.draws[1].primitive, PrimitiveKind::Cube);
    }

    #[test]
    fn test_pushed_entry_is_drawn() {
        let mut scene = Scene::new(800, 600);
        let shiny = crate::model::Material::new(Rgb8::gray(20), Rgb8::new(0, 0, 255), Rgb8::WHITE, 80.0);
        scene.push_entry(SceneEntry {
            primitive: EntryPrimitive::Fixed(PrimitiveKind::Pyramid),
            transform: Transform::new().at(Vec3::new(1.5, 0.0, 0.0)),
            material: Some(shiny),
        });

        let mut programs = ProgramSet::new();
        let plan = build_frame(&scene, &mut TransformStack::new(), &mut programs).unwrap();
        assert_eq!(plan.objects().count(), 3);

        let third = &plan.draws[2];
        assert_eq!(third.primitive, PrimitiveKind::Pyramid);
        let material: crate::model::MaterialUniform = read(&programs, third, "uMaterial");
        assert_eq!(material, shiny.to_uniform());
    }

    #[test]
    fn test_options_flow_into_plan() {
        let mut scene = Scene::new(800, 600);
        scene.toggle_wireframe();
        scene.toggle_depth_test();
        scene.next_primitive();
        scene.add_default_light(LightKind::Point);

        let plan = build_frame(&scene, &mut TransformStack::new(), &mut ProgramSet::new()).unwrap();
        assert!(!plan.depth_test);
        assert!(plan.backface_culling);
        assert_eq!(plan.draws[0].fill, FillMode::Wireframe);
        assert_eq!(plan.draws[0].primitive, PrimitiveKind::Cube);
        // markers stay solid
        assert!(plan.markers().all(|draw| draw.fill == FillMode::Solid));
    }

    #[test_log::test]
    fn test_normals_program_skips_lighting() {
        let mut scene = Scene::new(800, 600);
        scene.toggle_normals();
        scene.add_default_light(LightKind::Point);

        let mut programs = ProgramSet::new();
        let plan = build_frame(&scene, &mut TransformStack::new(), &mut programs).unwrap();
        let object = &plan.draws[0];
        assert_eq!(object.program, ProgramId::Normals);
        assert_eq!(object.uniforms.len(), programs.get(ProgramId::Normals).table().size());

        // a second frame reuses the already-warned program without failing
        let again = build_frame(&scene, &mut TransformStack::new(), &mut programs).unwrap();
        assert_eq!(again, plan);
    }

    #[test]
    fn test_stack_left_unbalanced_is_repaired() {
        let scene = Scene::new(800, 600);
        let mut stack = TransformStack::new();
        stack.push();
        stack.push();

        build_frame(&scene, &mut stack, &mut ProgramSet::new()).unwrap();
        assert_eq!(stack.depth(), 0);
    }

    #[test_log::test]
    fn test_failed_walk_aborts_only_the_frame() {
        assert_eq!(plan_or_abort(Err(ViewerError::StackUnderflow)), None);
        assert_eq!(plan_or_abort(Err(ViewerError::UnbalancedStack { depth: 2 })), None);

        // the next frame builds normally from the same stack
        let scene = Scene::new(800, 600);
        let mut stack = TransformStack::new();
        assert_eq!(stack.pop(), Err(ViewerError::StackUnderflow));
        let plan = plan_or_abort(build_frame(&scene, &mut stack, &mut ProgramSet::new()));
        assert_eq!(plan.map(|plan| plan.draws.len()), Some(scene.entries().len()));
    }
}
