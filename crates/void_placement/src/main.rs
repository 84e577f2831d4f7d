//! Placement demo
//!
//! Replays a scripted editing session against the in-memory scene and
//! logs the status line every time it changes.
//!
//! Run with: cargo run -p void_placement
//!       or: cargo run --bin void_placement_demo -- path/to/settings.toml

use void_placement::prelude::*;

const FRAME: f64 = 1.0 / 60.0;

/// Engine, scene and the raw device state being scripted.
struct Replay {
    engine: PlacementEngine,
    scene: SimulatedScene,
    raw: RawInput,
    last_line: String,
}

impl Replay {
    fn new(settings: Settings) -> Self {
        Self {
            engine: PlacementEngine::new(settings),
            scene: SimulatedScene::default(),
            raw: RawInput::new(),
            last_line: String::new(),
        }
    }

    fn frames(&mut self, count: usize) {
        for _ in 0..count {
            let report = self.engine.tick(&mut self.scene, &self.raw, FRAME);
            let line = report.status.to_string();
            if line != self.last_line {
                log::info!("{}", line);
                self.last_line = line;
            }
            if let Some(end) = report.ended {
                log::info!("Session ended: {:?}", end);
            }
        }
    }

    fn aim(&mut self, world: Vec3) {
        self.raw.cursor = self.scene.cursor_for(world);
        self.frames(2);
    }

    fn tap(&mut self, key: &str) {
        self.raw.press(key);
        self.frames(2);
        self.raw.release(key);
        self.frames(2);
    }

    fn hold(&mut self, key: &str, frames: usize) {
        self.raw.press(key);
        self.frames(frames);
        self.raw.release(key);
        self.frames(1);
    }

    fn click(&mut self, button: MouseButton) {
        self.raw.mouse.set(button, true);
        self.frames(1);
        self.raw.mouse.set(button, false);
        self.frames(1);
    }

    fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.tap(&c.to_string());
        }
    }
}

fn load_settings() -> Settings {
    let Some(path) = std::env::args().nth(1) else {
        return Settings::default();
    };
    match Settings::load(&path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Could not load settings from {}: {}, using defaults", path, e);
            Settings::default()
        }
    }
}

fn run(replay: &mut Replay) -> Result<()> {
    let table = replay
        .scene
        .add_box("table", Vec3::new(6.0, 0.5, 0.0), Aabb::new(Vec3::new(-1.5, -0.5, -1.0), Vec3::new(1.5, 0.5, 1.0)));

    // Place a crate on the ground, turned and raised a little
    let settings = replay.engine.settings().clone();
    let mesh = MeshDescriptor::new("crate").with_bounds(Aabb::UNIT);
    replay.engine.start_placement(&mut replay.scene, &mesh, &settings)?;
    replay.aim(Vec3::new(2.3, 0.0, 4.7));
    replay.tap("Y");
    replay.hold("E", 30);
    replay.click(MouseButton::Left);

    // Place a lamp on the table, rotation carried over from the crate
    let lamp = MeshDescriptor::new("lamp").with_bounds(Aabb::new(Vec3::new(-0.25, 0.0, -0.25), Vec3::new(0.25, 1.0, 0.25)));
    replay.engine.start_placement(&mut replay.scene, &lamp, &settings)?;
    replay.aim(Vec3::new(6.2, 0.0, 0.4));
    replay.tap("Enter");

    // Move the table and the crate together along X, typed
    let mut targets = vec![table];
    targets.extend(replay.scene.committed.first().copied());
    replay.engine.start_transform(&mut replay.scene, &targets, &settings)?;
    replay.tap("X");
    replay.type_text("-3");
    replay.tap("Enter");
    replay.tap("Enter");

    // Rotate the table, then change our mind
    replay.engine.start_transform(&mut replay.scene, &[table], &settings)?;
    replay.tap("R");
    replay.raw.cursor = replay.raw.cursor.map(|c| c + Vec2::new(90.0, 0.0));
    replay.frames(3);
    replay.tap("Escape");

    for (id, node) in replay.scene.nodes() {
        let t = node.transform;
        log::info!(
            "{} '{}': pos ({:.2}, {:.2}, {:.2}) yaw {:.1} scale {:.2}",
            id,
            node.name,
            t.position.x,
            t.position.y,
            t.position.z,
            t.rotation_degrees.y,
            t.scale.x
        );
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut replay = Replay::new(load_settings());
    if let Err(e) = run(&mut replay) {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}
