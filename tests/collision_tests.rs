use tautline::collision::{circle_vs_box, collide};
use tautline::{Collider, Material, SimulationConfig, Strand, StrandConfig, Vec2, World};

fn ground() -> Collider<f32> {
    // Top face at y = 0.
    Collider::cuboid(Vec2::new(0.0, -1.0), Vec2::new(20.0, 2.0))
}

#[test]
fn falling_rope_rests_on_box() {
    let mut world: World<f32> = World::new(SimulationConfig::new());
    world.add_collider(ground());
    let rope = Strand::from_path(
        &[Vec2::new(-1.0, 3.0), Vec2::new(1.0, 3.0)],
        StrandConfig::new(),
        false,
    )
    .unwrap();
    let key = world.register_strand(rope);

    for _ in 0..300 {
        world.step();
    }
    let strand = world.strand(key).unwrap();
    assert_eq!(strand.point_count(), 9);
    let radius = strand.point_radius();
    for pos in strand.positions() {
        assert!(pos.y >= radius - 1e-4, "point sank to {}", pos.y);
        assert!(pos.y < 0.5, "point never landed: {}", pos.y);
    }
}

#[test]
fn fast_falling_rope_clears_the_box_in_one_step() {
    let mut world: World<f32> = World::new(SimulationConfig::new());
    world.add_collider(ground());
    let mut rope = Strand::new(StrandConfig::new());
    let a = rope.add_point(Vec2::new(-0.5, 0.15), false);
    let b = rope.add_point(Vec2::new(0.5, 0.15), false);
    rope.add_stick(a, b).unwrap();
    for key in [a, b] {
        let p = rope.point_mut(key).unwrap();
        // Moving down 0.3 per step, past the top face by more than the radius.
        p.teleport(Vec2::new(p.position().x, 0.45));
        p.set_position(Vec2::new(p.position().x, 0.15));
    }
    let key = world.register_strand(rope);

    let report = world.step();
    assert_eq!(report.contacts, 2);
    let strand = world.strand(key).unwrap();
    let radius = strand.point_radius();
    for pos in strand.positions() {
        assert!(pos.y >= radius - 1e-5, "point left inside the box at {}", pos.y);
    }
}

#[test]
fn rotated_box_deflects_rope_sideways() {
    let mut world: World<f32> = World::new(SimulationConfig::new());
    // A ramp tilted down toward +x.
    world.add_collider(
        Collider::cuboid(Vec2::new(0.0, 0.0), Vec2::new(6.0, 0.5)).with_rotation(-0.4),
    );
    let rope = Strand::from_path(
        &[Vec2::new(-0.25, 2.0), Vec2::new(0.25, 2.0)],
        StrandConfig::new(),
        false,
    )
    .unwrap();
    let key = world.register_strand(rope);

    for _ in 0..120 {
        world.step();
    }
    let center = world.strand(key).unwrap().bounds().unwrap().center();
    assert!(center.x > 0.0, "rope should slide down the ramp, at {:?}", center);
}

#[test]
fn circle_collider_holds_rope() {
    let mut world: World<f32> = World::new(SimulationConfig::new());
    world.add_collider(Collider::circle(Vec2::new(0.0, 0.0), 1.0));
    let rope = Strand::from_path(
        &[Vec2::new(-0.5, 1.5), Vec2::new(0.5, 1.5)],
        StrandConfig::new(),
        false,
    )
    .unwrap();
    let key = world.register_strand(rope);

    for _ in 0..30 {
        world.step();
    }
    for pos in world.strand(key).unwrap().positions() {
        assert!(pos.length() >= 1.1 - 1e-3, "point inside the circle at {:?}", pos);
    }
}

#[test]
fn tearing_collider_cuts_falling_rope() {
    let mut world: World<f32> = World::new(SimulationConfig::new());
    world.add_collider(
        Collider::cuboid(Vec2::new(0.0, 0.0), Vec2::new(0.2, 0.2))
            .with_material(Material::default().tearing()),
    );
    let rope = Strand::from_path(
        &[Vec2::new(-2.0, 0.5), Vec2::new(-2.0, -3.0)],
        StrandConfig::new(),
        true,
    )
    .unwrap();
    let key = world.register_strand(rope);
    let before = world.strand(key).unwrap().stick_count();

    // Swing the pinned top through the blade.
    let top = world.strand(key).unwrap().pick_point(Vec2::new(-2.0, 0.5)).unwrap();
    world
        .strand_mut(key)
        .unwrap()
        .point_mut(top)
        .unwrap()
        .set_position(Vec2::new(0.0, 0.0));
    world.step();

    let after = world.strand(key).unwrap().stick_count();
    assert!(after < before, "expected a cut, {} -> {}", before, after);
    assert!(!world.strand(key).unwrap().contains_point(top));
}

#[test]
fn bouncy_material_reflects_normal_velocity() {
    let mut world: World<f32> = World::new(SimulationConfig::new().with_gravity(Vec2::zero()));
    world.add_collider(ground().with_material(Material::new(0.0, 1.0).unwrap()));
    let mut rope = Strand::new(StrandConfig::new());
    let a = rope.add_point(Vec2::new(0.0, 0.12), false);
    let b = rope.add_point(Vec2::new(0.5, 0.12), false);
    rope.add_stick(a, b).unwrap();
    for key in [a, b] {
        let p = rope.point_mut(key).unwrap();
        // Moving down at 0.05 per step.
        p.teleport(Vec2::new(p.position().x, 0.17));
        p.set_position(Vec2::new(p.position().x, 0.12));
    }
    let key = world.register_strand(rope);

    world.step();
    let v = world.strand(key).unwrap().point(a).unwrap().velocity_raw();
    assert!(v.y > 0.0, "point should move up after bouncing, v = {:?}", v);
}

#[test]
fn rope_and_rigid_passes_share_one_primitive() {
    let boxed = ground();
    let circle = Collider::circle(Vec2::new(0.0, 0.05), 0.1);
    let direct = circle_vs_box(circle.position(), 0.1, &boxed).unwrap();
    let via_dispatch = collide(&circle, &boxed).unwrap();
    assert_eq!(direct, via_dispatch);
    assert!((direct.depth - 0.05).abs() < 1e-5);
}
