use tautline::{ClothConfig, RopeError, SimulationConfig, Strand, StrandConfig, Vec2, World};

#[test]
fn path_rope_hangs_from_its_first_point() {
    let mut world: World<f32> = World::new(SimulationConfig::new());
    let rope = Strand::from_path(
        &[Vec2::new(0.0, 10.0), Vec2::new(5.0, 10.0)],
        StrandConfig::new().with_path_spacing(0.5),
        true,
    )
    .unwrap();
    assert_eq!(rope.point_count(), 11);
    assert_eq!(rope.stick_count(), 10);
    let key = world.register_strand(rope);

    for _ in 0..120 {
        world.step();
    }
    let bounds = world.strand(key).unwrap().bounds().unwrap();
    assert!(bounds.min.y < 8.0, "rope should hang down, bounds = {:?}", bounds);
}

#[test]
fn uneven_segment_is_evenly_divided() {
    let rope = Strand::from_path(
        &[Vec2::new(0.0f32, 0.0), Vec2::new(1.1, 0.0)],
        StrandConfig::new(),
        false,
    )
    .unwrap();
    // ceil(1.1 / 0.25) = 5 intervals of 0.22.
    assert_eq!(rope.stick_count(), 5);
    for (_, stick) in rope.sticks() {
        assert!((stick.rest_length() - 0.22).abs() < 1e-5);
    }
}

#[test]
fn spacing_must_be_positive() {
    let config = StrandConfig::new().with_path_spacing(0.0f32);
    let err = Strand::from_path(&[Vec2::zero(), Vec2::new(1.0, 0.0)], config, false).unwrap_err();
    assert_eq!(err, RopeError::InsufficientPath);
}

#[test]
fn cloth_counts_with_and_without_shear() {
    let plain = ClothConfig::new(10, 8, 0.25f32);
    let (s, grid) = Strand::cloth(Vec2::zero(), &plain, StrandConfig::new()).unwrap();
    assert_eq!(s.point_count(), 80);
    assert_eq!(s.stick_count(), 9 * 8 + 10 * 7);
    assert_eq!((grid.cols(), grid.rows()), (10, 8));

    let (sheared, _) = Strand::cloth(Vec2::zero(), &plain.with_shear(true), StrandConfig::new()).unwrap();
    assert_eq!(sheared.stick_count(), 9 * 8 + 10 * 7 + 2 * 9 * 7);
}

#[test]
fn pinned_cloth_keeps_its_top_edge() {
    let mut world: World<f32> = World::new(SimulationConfig::new());
    let cfg = ClothConfig::new(5, 5, 0.5f32).with_pin_every(Some(2));
    let (cloth, grid) = Strand::cloth(Vec2::new(0.0, 5.0), &cfg, StrandConfig::new()).unwrap();
    let key = world.register_strand(cloth);

    for _ in 0..60 {
        world.step();
    }
    let strand = world.strand(key).unwrap();
    for col in [0, 2, 4] {
        let pos = strand.point(grid.at(col, 0).unwrap()).unwrap().position();
        assert_eq!(pos, Vec2::new(col as f32 * 0.5, 5.0));
    }
    let loose = strand.point(grid.at(1, 0).unwrap()).unwrap().position();
    assert!(loose.y < 5.0);
}

#[test]
fn cloth_can_be_added_to_an_existing_strand() {
    let mut s: Strand<f32> = Strand::new(StrandConfig::new());
    s.add_cloth(Vec2::zero(), &ClothConfig::new(3, 3, 1.0)).unwrap();
    s.add_cloth(Vec2::new(10.0, 0.0), &ClothConfig::new(3, 3, 1.0)).unwrap();
    assert_eq!(s.point_count(), 18);
    assert_eq!(s.stick_count(), 24);
}
