use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::Parser;
use plotters::prelude::*;

use skill_orrery::config::SceneConfig;
use skill_orrery::content::{SkillQuery, SkillSource, TomlSkillSource};
use skill_orrery::gui::meteors::MeteorShower;
use skill_orrery::scene::{Scene, Viewport};

/// Runs a scene without a window and plots where every body went.
#[derive(Debug, Parser)]
struct Args {
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "skills.toml")]
    skills: PathBuf,

    #[arg(long, default_value_t = 2000)]
    frames: u64,

    #[arg(long, default_value = "plots/trace.png")]
    output: PathBuf,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 800)]
    height: u32,
}

const FRAME_SECONDS: f64 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => SceneConfig::load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SceneConfig::default(),
    };
    let seed = config.seed;
    let records = TomlSkillSource::new(&args.skills)
        .fetch(&SkillQuery::default())
        .context("reading skills")?;

    let mut scene = Scene::new(config).context("building the scene")?;
    scene.load_skills(records);
    let mut meteors = MeteorShower::new(seed);

    let viewport = Viewport::new(args.width as f64, args.height as f64);
    let mut paths = vec![Vec::new(); scene.bodies().len()];
    let mut collisions = 0;

    for frame in 0..args.frames {
        meteors.step(&viewport);
        let output = scene
            .tick_with_source(&mut meteors, viewport, frame as f64 * FRAME_SECONDS, None)
            .ok_or_else(|| anyhow!("scene stopped on its own"))?;
        collisions += output.particle_effects.len();

        for (path, body) in paths.iter_mut().zip(scene.bodies()) {
            // Flipped, since screen y grows downwards
            let p = body.screen_position();
            path.push((p.x, viewport.height - p.y));
        }
    }
    println!(
        "{} frames, {} bodies, {} collisions",
        args.frames,
        scene.bodies().len(),
        collisions
    );

    // Readouts as of the last frame, same as the detail panel would show
    let ids: Vec<_> = scene.bodies().iter().map(|b| b.id).collect();
    for id in ids {
        scene.select(id);
        if let Some(selected) = scene.selection() {
            let r = &selected.readout;
            println!("{}", selected.name);
            println!("- Semi-major axis: {:.2}", selected.semimajor_axis);
            println!("- Eccentricity: {:.3}", selected.eccentricity);
            println!("- Aphelion: {:.2}", r.aphelion);
            println!("- Perihelion: {:.2}", r.perihelion);
            println!("- Radial distance: {:.2}", r.radial_distance);
            println!("- Orbital velocity: {:.4}", r.orbital_velocity);
            println!("- Period: {:?}", r.period);
            println!("- Mass: {:.1}", r.mass);
        }
    }

    draw_paths(&args.output, &scene, &paths, &viewport)
        .map_err(|err| anyhow!("drawing {}: {}", args.output.display(), err))?;
    println!("wrote {}", args.output.display());
    Ok(())
}

fn draw_paths(
    output: &Path,
    scene: &Scene,
    paths: &[Vec<(f64, f64)>],
    viewport: &Viewport,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let root = BitMapBackend::new(output, (viewport.width as u32, viewport.height as u32))
        .into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(0.0..viewport.width, 0.0..viewport.height)?;

    chart.configure_mesh().draw()?;

    for (path, body) in paths.iter().zip(scene.bodies()) {
        let c = body.info.color;
        let color = RGBColor(
            (c.x * 255.0) as u8,
            (c.y * 255.0) as u8,
            (c.z * 255.0) as u8,
        );
        chart
            .draw_series(LineSeries::new(path.iter().copied(), &color))?
            .label(body.info.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .draw()?;
    root.present()?;

    Ok(())
}
