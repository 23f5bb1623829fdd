use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::Vec2;
use oasis_avatar::{Accessory, AvatarConfig, BodyType, HeadDetail, HeadType};
use oasis_common::{Color, LaunchLog, NotificationLog, WorldId};
use oasis_input::PointerEvent;
use oasis_interact::InteractableId;
use oasis_kernel::{Session, SessionConfig, SessionInspector};
use oasis_persist::{FileStore, PersistenceAdapter};
use oasis_scene::MemoryScene;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oasis-cli", about = "CLI tool for oasis sessions")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Session config (YAML). Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the worlds and what each one contains
    Worlds,
    /// Start a session and walk through a sequence of worlds
    Tour {
        /// Worlds to visit in order
        #[arg(default_values_t = ["arcade".to_string(), "race".to_string(), "social".to_string()])]
        worlds: Vec<String>,
        /// Frames (at 60 Hz) to run after each load
        #[arg(short, long, default_value = "30")]
        frames: u32,
        /// Print the scene tree after each load
        #[arg(short, long)]
        describe: bool,
    },
    /// Load a world and click (or hover) at a screen position
    Pick {
        /// World to load first
        world: String,
        /// Horizontal position in normalized device coordinates
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        x: f32,
        /// Vertical position in normalized device coordinates
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        y: f32,
        /// Aim at the center of this interactable instead of --x/--y
        #[arg(short, long)]
        target: Option<String>,
        /// Hover only, no click
        #[arg(long)]
        hover: bool,
    },
    /// Inspect or change the stored avatar
    Avatar {
        /// Directory holding stored preferences
        #[arg(short, long, default_value = ".oasis")]
        store: PathBuf,
        #[command(subcommand)]
        action: AvatarAction,
    },
}

#[derive(Subcommand)]
enum AvatarAction {
    /// Print the stored avatar config
    Show,
    /// Change parts of the stored avatar config
    Set {
        #[arg(long)]
        body: Option<BodyType>,
        #[arg(long)]
        head: Option<HeadType>,
        #[arg(long)]
        detail: Option<HeadDetail>,
        /// Primary color as #RRGGBB
        #[arg(long)]
        primary: Option<Color>,
        /// Secondary color as #RRGGBB
        #[arg(long)]
        secondary: Option<Color>,
        #[arg(long)]
        accessory: Option<Accessory>,
    },
    /// Forget the stored avatar and go back to the default
    Reset,
}

/// A session wired to recording collaborators so the CLI can print what
/// the user would have seen.
struct Console {
    session: Session,
    notes: Rc<NotificationLog>,
    games: Rc<LaunchLog>,
}

impl Console {
    fn new(config: SessionConfig) -> Self {
        let notes = Rc::new(NotificationLog::new());
        let games = Rc::new(LaunchLog::new());
        let session = Session::new(config, MemoryScene::new())
            .with_notifier(notes.clone())
            .with_launcher(games.clone());
        Self {
            session,
            notes,
            games,
        }
    }

    fn with_store(mut self, store: FileStore) -> Self {
        self.session = self.session.with_store(Box::new(store));
        self
    }

    fn flush(&self) {
        for message in self.notes.messages() {
            println!("  notice: {message}");
        }
        self.notes.clear();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SessionConfig::default(),
    };

    match cli.command {
        Commands::Worlds => list_worlds(config)?,
        Commands::Tour {
            worlds,
            frames,
            describe,
        } => tour(config, &worlds, frames, describe)?,
        Commands::Pick {
            world,
            x,
            y,
            target,
            hover,
        } => pick(config, &world, Vec2::new(x, y), target.as_deref(), hover)?,
        Commands::Avatar { store, action } => avatar(config, &store, action)?,
    }

    Ok(())
}

fn list_worlds(config: SessionConfig) -> anyhow::Result<()> {
    let mut console = Console::new(config);
    let ids: Vec<WorldId> = console.session.manager().catalog().ids().collect();
    for id in ids {
        console.session.load_world(id.name())?;
        let summary = SessionInspector::summary(&console.session);
        let spawn = console.session.avatar().pose().position;
        println!(
            "{:<8} {:<12} interactables={:<3} nodes={:<4} spawn=({:.1}, {:.1}, {:.1})",
            id.name(),
            id.title(),
            summary.interactables,
            summary.scene_nodes,
            spawn.x,
            spawn.y,
            spawn.z
        );
    }
    Ok(())
}

fn tour(config: SessionConfig, worlds: &[String], frames: u32, describe: bool) -> anyhow::Result<()> {
    let mut console = Console::new(config);
    console.session.start()?;
    println!("{}", SessionInspector::summary(&console.session));
    console.flush();

    for name in worlds {
        println!("==> {name}");
        if let Err(e) = console.session.load_world(name) {
            println!("  error: {e}");
            console.flush();
            continue;
        }
        for _ in 0..frames {
            console.session.update(1.0 / 60.0);
        }
        println!("{}", SessionInspector::summary(&console.session));
        console.flush();
        if describe {
            print!("{}", console.session.scene().describe());
        }
    }
    Ok(())
}

fn pick(
    config: SessionConfig,
    world: &str,
    ndc: Vec2,
    target: Option<&str>,
    hover: bool,
) -> anyhow::Result<()> {
    let mut console = Console::new(config);
    console.session.load_world(world)?;
    console.flush();

    let ndc = match target {
        Some(id) => aim_at(&console.session, id)?,
        None => ndc,
    };
    println!("pointer at ({:.3}, {:.3})", ndc.x, ndc.y);

    let picked = console.session.pointer(PointerEvent { ndc, click: !hover });
    match console.session.dispatcher().hovered() {
        Some(id) => println!("hover: {id}"),
        None => println!("hover: nothing"),
    }
    if !hover {
        match picked {
            Some(id) => println!("clicked: {id}"),
            None => println!("clicked: nothing"),
        }
    }
    console.flush();
    for game in console.games.started() {
        println!("  mini-game: {game}");
    }
    match console.session.active_world() {
        Some(id) => println!("active world: {}", id.title()),
        None => println!("active world: none"),
    }
    Ok(())
}

/// Screen position of an interactable's node origin.
fn aim_at(session: &Session, id: &str) -> anyhow::Result<Vec2> {
    let entity = session
        .manager()
        .registry()
        .get(&InteractableId::new(id))
        .with_context(|| format!("no interactable '{id}' in the active world"))?;
    let matrix = session
        .scene()
        .world_matrix(entity.node)
        .with_context(|| format!("interactable '{id}' has no scene node"))?;
    let center = matrix.w_axis.truncate();
    let clip = session
        .camera()
        .view_projection(session.config().aspect)
        .project_point3(center);
    Ok(clip.truncate())
}

fn avatar(config: SessionConfig, store_dir: &Path, action: AvatarAction) -> anyhow::Result<()> {
    let store = FileStore::open(store_dir)
        .with_context(|| format!("opening store {}", store_dir.display()))?;
    let key = config.avatar.storage_key.clone();

    match action {
        AvatarAction::Show => match AvatarConfig::load(&store, &key) {
            Ok(Some(stored)) => print_avatar("stored", &stored)?,
            Ok(None) => print_avatar("default (nothing stored)", &AvatarConfig::default())?,
            Err(e) => {
                println!("stored avatar is unreadable: {e}");
                print_avatar("default", &AvatarConfig::default())?;
            }
        },
        AvatarAction::Set {
            body,
            head,
            detail,
            primary,
            secondary,
            accessory,
        } => {
            let current = match AvatarConfig::load(&store, &key) {
                Ok(stored) => stored.unwrap_or_default(),
                Err(e) => {
                    tracing::warn!(error = %e, "replacing unreadable stored avatar");
                    AvatarConfig::default()
                }
            };
            let updated = AvatarConfig {
                body_type: body.unwrap_or(current.body_type),
                head_type: head.unwrap_or(current.head_type),
                head_detail: detail.unwrap_or(current.head_detail),
                primary_color: primary.unwrap_or(current.primary_color),
                secondary_color: secondary.unwrap_or(current.secondary_color),
                accessory: accessory.unwrap_or(current.accessory),
            };
            let mut console = Console::new(config).with_store(store);
            console.session.start()?;
            console.session.set_avatar_config(updated)?;
            print_avatar("saved", &updated)?;
            if let Some(rig) = console.session.avatar().rig() {
                println!("rig parts: {}", rig.labels().join(", "));
            }
        }
        AvatarAction::Reset => {
            let existed = store.get(&key)?.is_some();
            let mut console = Console::new(config).with_store(store);
            console.session.reset_avatar()?;
            if existed {
                println!("stored avatar removed");
            } else {
                println!("nothing stored");
            }
        }
    }
    Ok(())
}

fn print_avatar(label: &str, config: &AvatarConfig) -> anyhow::Result<()> {
    println!("{label}: {}", config.to_json()?);
    println!(
        "  body={} head={} detail={} primary={} secondary={} accessory={}",
        config.body_type,
        config.head_type,
        config.head_detail,
        config.primary_color,
        config.secondary_color,
        config.accessory
    );
    Ok(())
}
