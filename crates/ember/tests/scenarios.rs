use ember::{
    Aabb, BroadPhase, Circle, ColliderShape, CollisionConfig, ColorLoop, EmitterConfig,
    EmitterKind, NarrowPhase, NoColliders, Particle, ParticleBuffer, ParticleEmitter, Rgba,
    SequenceRandom, StaticColliders,
};
use glam::Vec2;

const DT: f32 = 1.0 / 60.0;

fn no_collision() -> CollisionConfig {
    CollisionConfig::default()
}

#[test]
fn red_to_green_over_two_seconds() {
    let config = EmitterConfig::exact()
        .with_lifespan(2.0, 0.0)
        .with_colors(Rgba::new(255.0, 0.0, 0.0, 255.0), Rgba::new(0.0, 255.0, 0.0, 255.0))
        .with_color_loop(ColorLoop::None);
    let mut p = Particle::spawned(&config, Vec2::ZERO, &mut SequenceRandom::zero());

    for _ in 0..4 {
        assert!(!p.advance(0.25, &config, &no_collision(), Vec2::ZERO, &NoColliders));
    }
    let [r, g, b, a] = p.color().to_u8();
    assert!((127..=128).contains(&r), "r = {}", r);
    assert!((127..=128).contains(&g), "g = {}", g);
    assert_eq!((b, a), (0, 255));

    let mut expired_at = None;
    for tick in 0..8 {
        if p.advance(0.25, &config, &no_collision(), Vec2::ZERO, &NoColliders) {
            expired_at = Some(tick);
            break;
        }
    }
    // 1s of life left: the fourth quarter-second tick reaches zero
    assert_eq!(expired_at, Some(3));
}

#[test]
fn radial_emitter_completes_one_revolution() {
    let config = EmitterConfig::exact()
        .with_kind(EmitterKind::Radial)
        .with_radius(100.0, 100.0)
        .with_rotate_per_second(360.0)
        .with_lifespan(3.0, 0.0);
    let mut p = Particle::spawned(&config, Vec2::ZERO, &mut SequenceRandom::zero());
    let a0 = p.angle();
    let at_t0 = Vec2::new(-a0.cos(), -a0.sin()) * 100.0;

    assert!(!p.advance(1.0, &config, &no_collision(), Vec2::ZERO, &NoColliders));
    assert!((p.position() - at_t0).length() < 1e-3, "{:?} vs {:?}", p.position(), at_t0);
    assert!((p.position().length() - 100.0).abs() < 1e-3);
}

#[test]
fn elastic_frictionless_wall_reflects_normal_velocity() {
    let config = EmitterConfig::exact()
        .with_speed(120.0, 0.0)
        .with_angle(30.0, 0.0)
        .with_lifespan(5.0, 0.0)
        .with_sizes(8.0, 8.0);
    let collision = CollisionConfig::enabled()
        .with_material(0.0, 1.0)
        .with_gravity(Vec2::ZERO)
        .with_radius_scale(1.0);
    let world = StaticColliders::new().with(
        ColliderShape::Box(Aabb::new(Vec2::new(30.0, -500.0), Vec2::new(60.0, 500.0))),
        1,
    );

    let mut p = Particle::spawned(&config, Vec2::ZERO, &mut SequenceRandom::zero());
    let incoming = p.direction();
    for _ in 0..120 {
        p.advance(DT, &config, &collision, Vec2::ZERO, &world);
        if p.has_collided() {
            break;
        }
    }
    assert!(p.has_collided());

    let out = p.velocity();
    assert!((out.x + incoming.x).abs() < 1e-3, "normal not reversed: {:?}", out);
    assert!((out.y - incoming.y).abs() < 1e-3, "tangent changed: {:?}", out);
}

#[test]
fn resolved_overlap_stays_resolved() {
    let world = StaticColliders::new()
        .with(ColliderShape::Circle(Circle::new(Vec2::new(3.0, 4.0), 2.0)), 1);
    let probe = Circle::new(Vec2::ZERO, 4.0);

    let neighbors = world.query_neighbors(&probe, u32::MAX);
    let mtv = world.intersects(&probe, neighbors[0]).expect("overlap");

    let moved = Circle::new(probe.center - mtv, probe.radius);
    let hits: Vec<_> = world
        .query_neighbors(&moved, u32::MAX)
        .into_iter()
        .filter_map(|n| world.intersects(&moved, n))
        .collect();
    assert!(hits.is_empty());
}

#[test]
fn emitter_runs_to_completion_and_renders() {
    let config = EmitterConfig::new()
        .with_emission_rate(120.0)
        .with_max_particles(64)
        .with_duration(0.5)
        .with_lifespan(0.4, 0.1)
        .with_gravity(Vec2::new(0.0, 200.0));
    let mut emitter = ParticleEmitter::new(config, 1234);
    let mut buffer = ParticleBuffer::new();
    let mut peak = 0;

    for _ in 0..120 {
        emitter.update(DT, Vec2::new(320.0, 240.0), &NoColliders);
        buffer.rebuild(&emitter, Vec2::new(320.0, 240.0));
        assert_eq!(buffer.instance_count() as usize, emitter.live_count());
        for inst in &buffer.instances {
            for ch in [inst.r, inst.g, inst.b, inst.a] {
                assert!((0.0..=1.0).contains(&ch));
            }
            assert!(inst.size >= 0.0);
        }
        peak = peak.max(emitter.live_count());
    }

    assert!(peak > 0 && peak <= 64);
    assert!(emitter.all_expired());
}

#[test]
fn config_loaded_from_json_drives_emitter() {
    let json = r#"{
        "emitter_kind": "Radial",
        "max_radius": 40.0,
        "min_radius": 0.0,
        "rotate_per_second": 180.0,
        "particle_lifespan": 1.0,
        "max_particles": 4,
        "emission_rate": 0.0
    }"#;
    let config = EmitterConfig::from_json(json).unwrap();
    let mut emitter = ParticleEmitter::new(config, 5);
    assert_eq!(emitter.emit(10, Vec2::ZERO), 4);
    emitter.update(0.5, Vec2::ZERO, &NoColliders);
    for p in emitter.particles() {
        assert!((p.position().length() - 20.0).abs() < 1e-3);
    }
}

#[cfg(feature = "physics")]
#[test]
fn rapier_world_bounces_particles() {
    use ember::{ColliderDesc, PhysicsWorld};

    let mut world = PhysicsWorld::new();
    world.add_collider(
        ColliderDesc::Cuboid { half_width: 100.0, half_height: 5.0 },
        Vec2::new(0.0, 50.0),
        0.0,
        1,
    );

    let config = EmitterConfig::exact()
        .with_speed(0.0, 0.0)
        .with_gravity(Vec2::new(0.0, 400.0))
        .with_lifespan(3.0, 0.0)
        .with_sizes(6.0, 6.0);
    let collision = CollisionConfig::enabled()
        .with_material(0.0, 0.5)
        .with_radius_scale(1.0);

    let mut p = Particle::spawned(&config, Vec2::ZERO, &mut SequenceRandom::zero());
    for _ in 0..120 {
        if p.advance(DT, &config, &collision, Vec2::ZERO, &world) || p.has_collided() {
            break;
        }
    }
    assert!(p.has_collided());
    assert!(p.velocity().y < 0.0, "should bounce upward: {:?}", p.velocity());
    assert!(p.position().y + 3.0 <= 45.0 + 1e-2);
}
