//! Lifecycle sandbox
//!
//! A scripted session against the engine core: seed a working directory
//! with assets, build and wire a small scene, pulse it for a couple of
//! seconds, then tear elements down and watch the cascade clean up.
//! Run with `RUST_LOG=debug` to see the per-element lifecycle logging.

use lattice_engine::assets::{
    encode_lga, encode_lgm, AnimationData, BoneData, GeometryData, Vertex,
};
use lattice_engine::elements::model::NO_BONE;
use lattice_engine::prelude::*;
use std::path::Path;
use std::time::Duration;

const WORKING_DIR: &str = "sandbox_data";

/// Write the session's assets under the working directory.
fn seed_assets(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;

    let mesh = GeometryData {
        vertices: vec![
            Vertex {
                position: [-0.5, 0.0, 0.0],
                normal: [0.0, 1.0, 0.0],
                uv: [0.0, 0.0],
            },
            Vertex {
                position: [0.5, 0.0, 0.0],
                normal: [0.0, 1.0, 0.0],
                uv: [1.0, 0.0],
            },
            Vertex {
                position: [0.0, 1.0, 0.0],
                normal: [0.0, 1.0, 0.0],
                uv: [0.5, 1.0],
            },
        ],
        indices: vec![0, 1, 2],
        bones: vec![
            BoneData {
                name: "root".to_owned(),
                parent: -1,
            },
            BoneData {
                name: "hand".to_owned(),
                parent: 0,
            },
        ],
        bound_radius: 1.0,
    };
    std::fs::write(dir.join("actor.lgm"), encode_lgm(&mesh))?;

    let clip = AnimationData {
        bone_count: 2,
        frame_count: 48,
        fps: 24.0,
    };
    std::fs::write(dir.join("walk.lga"), encode_lga(&clip))?;

    std::fs::write(dir.join("scene.vert"), b"void main() {}\n")?;
    std::fs::write(
        dir.join("scene.frag"),
        b"uniform sampler2D gColorMap;\nvoid main() {}\n",
    )?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    log::info!("seeding assets under {WORKING_DIR}/");
    seed_assets(Path::new(WORKING_DIR))?;
    let mut engine = Engine::new(EngineConfig::new(WORKING_DIR))?;

    // Scene wiring.
    let scene = engine.elements_mut().create_scene();
    let camera = engine.elements_mut().create_camera(Projection::Perspective);
    let light = engine.elements_mut().create_light();
    engine.elements_mut().set_scene_camera(scene, camera)?;
    engine.elements_mut().set_scene_light(scene, light)?;
    engine.set_active_scene(scene)?;

    // Offscreen target feeding a shader sampler.
    let shader = engine
        .elements_mut()
        .create_shader("scene.vert", "scene.frag", None)?;
    let target = engine.elements_mut().create_render_target(
        RenderTargetKind::Rgba,
        (256, 256),
        Filtering::Linear,
    )?;
    let unit = engine
        .elements_mut()
        .attach_drawable_to_shader(shader, target, "gColorMap")?;
    log::info!("render target bound to texture unit {unit}");
    engine.set_active_shader(shader)?;

    // A load that fails leaves no element behind.
    if let Err(err) = engine
        .elements_mut()
        .create_texture("missing.png", Filtering::Linear)
    {
        log::warn!("texture factory refused: {err}");
    }

    // Geometry arrives from the worker thread; the element exists only
    // once a pulse has drained the completion.
    let ticket = engine.create_geometry_async("actor.lgm");
    let mut geometry = None;
    for _ in 0..1000 {
        engine.pulse();
        if let Some(handle) = engine.resolve_geometry(ticket) {
            geometry = Some(handle);
            break;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    let Some(geometry) = geometry else {
        log::error!("background geometry never arrived");
        return Ok(());
    };

    // An animated actor with a lantern hanging off its hand bone and a
    // collision body falling under gravity.
    let actor = engine.create_model(Some(geometry))?;
    let lantern = engine.create_model(None)?;
    engine.attach_model_to_model(lantern, actor, 1)?;
    let clip = engine.elements_mut().create_animation("walk.lga")?;
    engine.elements_mut().set_model_animation(actor, clip)?;
    if let Some(model) = engine.elements_mut().registry_mut().model_mut(actor) {
        model.play_animation();
    }

    let body = engine.create_collision(CollisionShape::Sphere, Vec3::new(0.5, 0.0, 0.0), 3.0);
    engine.elements_mut().attach_collision_to_model(body, actor)?;
    if let Some(collision) = engine.elements_mut().registry_mut().collision_mut(body) {
        collision.set_position(Vec3::new(0.0, 8.0, 0.0));
    }

    // Wiring that must be refused leaves everything as it was.
    if let Err(err) = engine.attach_model_to_model(actor, lantern, NO_BONE) {
        log::warn!("attach refused: {err}");
    }

    log::info!(
        "session running: {} elements, {} relation edges",
        engine.elements().registry().len(),
        engine.elements().relations().edge_count()
    );

    for frame in 0..120_u32 {
        let dt = engine.pulse();
        if frame % 30 == 0 {
            let registry = engine.elements().registry();
            if let Some(model) = registry.model(actor) {
                log::info!(
                    "frame {frame}: dt {:.4}s, actor at y {:.2}, clip at {:.2}s",
                    dt,
                    model.position().y,
                    model.play_time()
                );
            }
        }
        std::thread::sleep(Duration::from_millis(4));
    }

    // Teardown: the cascade releases dependents without destroying them.
    engine.destroy_element(actor);
    let lantern_parent = engine
        .elements()
        .registry()
        .model(lantern)
        .and_then(|model| model.parent());
    log::info!(
        "actor destroyed: lantern parent {lantern_parent:?}, {} edges left",
        engine.elements().relations().edge_count()
    );
    let again = engine.destroy_element(actor);
    log::info!("destroying the actor again returned {again}");
    engine.destroy_element(geometry);

    engine.shutdown();
    log::info!("session over, {} elements remain", engine.elements().registry().len());
    Ok(())
}
