use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use kiss3d::window::Window;

use skill_orrery::config::SceneConfig;
use skill_orrery::content::{spawn_fetch, SkillQuery, TomlSkillSource};
use skill_orrery::gui::Viewer;
use skill_orrery::scene::theme::Theme;
use skill_orrery::scene::Scene;

/// Skills as planets. Click one for details; Space pauses, T swaps the
/// theme, Escape deselects, Q quits.
#[derive(Debug, Parser)]
struct Args {
    /// Scene configuration (TOML). Defaults are used if left out.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skill list (TOML, `[[skills]]` tables).
    #[arg(long, default_value = "skills.toml")]
    skills: PathBuf,

    /// Only show skills in this category.
    #[arg(long)]
    category: Option<String>,

    /// Start with the light theme.
    #[arg(long)]
    light: bool,

    /// Overrides the seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SceneConfig::load_from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SceneConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut scene = Scene::new(config).context("building the scene")?;
    if args.light {
        scene.set_theme(Theme::Light);
    }

    // The scene runs with no bodies until this arrives
    let query = SkillQuery {
        category: args.category,
        limit: None,
    };
    let skills = spawn_fetch(Box::new(TomlSkillSource::new(&args.skills)), query);

    let mut window = Window::new("Skill Orrery");
    window.set_framerate_limit(Some(60));

    let viewer = Viewer::new(scene, skills);
    window.render_loop(viewer);
    Ok(())
}
