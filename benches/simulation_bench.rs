use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use physics2d::{Collider, CollisionFilter, PhysicsWorld, RigidBody, Shape, Transform, Vec2};

fn floor_world() -> PhysicsWorld {
    let mut world = PhysicsWorld::new();
    world.gravity = Vec2::new(0.0, 10.0);
    let floor = world.spawn(Transform::from_position(Vec2::new(0.0, 1.0)));
    world.add_rigidbody(floor, RigidBody::fixed()).unwrap();
    world.attach_collider(floor, Collider::new(Shape::rectangle(200.0, 2.0))).unwrap();
    world
}

// --- Helper for creating stack benchmarks ---
fn run_circle_stack_bench(world: &mut PhysicsWorld, num_circles: usize) {
    let radius = 0.5;

    for i in 0..num_circles {
        // Columns of ten, stacked upwards (y down) with a slight gap
        let x = (i / 10) as f64 * 1.5 - 50.0;
        let y = -radius - ((i % 10) as f64 * radius * 2.1);
        let ball = world.spawn(Transform::from_position(Vec2::new(x, y)));
        world.add_rigidbody(ball, RigidBody::dynamic()).unwrap();
        world.attach_collider(ball, Collider::new(Shape::circle(radius))).unwrap();
    }

    let dt = 1.0 / 120.0;
    for _ in 0..60 {
        world.step(black_box(dt));
    }
}

// Benchmark for columns of circles settling on a floor
fn bench_circle_stack(c: &mut Criterion) {
    let mut group = c.benchmark_group("circle_stack");

    for num_circles in [10, 100, 300].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(num_circles), num_circles, |b, &n| {
            b.iter(|| {
                let mut world = floor_world();
                run_circle_stack_bench(&mut world, black_box(n));
            });
        });
    }
    group.finish();
}

// Benchmark for fast bodies swept against thin walls
fn bench_continuous_collisions(c: &mut Criterion) {
    c.bench_function("continuous_walls", |b| {
        b.iter(|| {
            let mut world = PhysicsWorld::new();
            world.gravity = Vec2::ZERO;
            for i in 0..20 {
                let wall = world.spawn(Transform::from_position(Vec2::new(5.0, i as f64 * 2.0)));
                world.add_rigidbody(wall, RigidBody::fixed()).unwrap();
                world.attach_collider(wall, Collider::new(Shape::rectangle(0.2, 1.5))).unwrap();

                let bullet = world.spawn(Transform::from_position(Vec2::new(0.0, i as f64 * 2.0)));
                let body = RigidBody::dynamic()
                    .with_velocity(Vec2::new(600.0, 0.0))
                    .with_continuous_collisions(true);
                world.add_rigidbody(bullet, body).unwrap();
                world.attach_collider(bullet, Collider::new(Shape::circle(0.25))).unwrap();
            }
            world.step(black_box(1.0 / 60.0));
        });
    });
}

// Benchmark for raycasts against a field of static boxes
fn bench_raycast(c: &mut Criterion) {
    let mut world = PhysicsWorld::new();
    for i in 0..200 {
        let x = (i % 20) as f64 * 3.0;
        let y = (i / 20) as f64 * 3.0;
        let crate_box = world.spawn(Transform::from_position(Vec2::new(x, y)));
        world.add_rigidbody(crate_box, RigidBody::fixed()).unwrap();
        world.attach_collider(crate_box, Collider::new(Shape::rectangle(1.0, 1.0))).unwrap();
    }
    let filter = CollisionFilter::new();

    c.bench_function("raycast_200_boxes", |b| {
        b.iter(|| world.raycast(black_box(Vec2::new(-5.0, 13.5)), black_box(0.0), 100.0, &filter));
    });
}

criterion_group!(benches, bench_circle_stack, bench_continuous_collisions, bench_raycast);
criterion_main!(benches);
