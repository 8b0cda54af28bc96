use anyhow::{Context, Result, anyhow};
use beautyshot::config::Config;
use beautyshot::editor::Editor;
use beautyshot::export::{self, ExportFormat, file};
use beautyshot::ingest;
use beautyshot::scene::{
    BackgroundConfig, FrameConfig, FrameTheme, PositionPreset, RenderSnapshot, SceneFormat,
};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BEAUTYSHOT_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "beautyshot")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Put a screenshot on a background with padding, shadow, frame and annotations")]
struct Cli {
    /// Screenshot to beautify (PNG or JPEG)
    #[arg(value_name = "INPUT", required_unless_present_any = ["dump_scene", "init_config", "list_presets"])]
    input: Option<PathBuf>,

    /// Scene file (TOML or JSON) with background, layout, frame and annotations
    #[arg(long, short = 's', value_name = "FILE")]
    scene: Option<PathBuf>,

    /// Write the result to this path instead of the configured save directory
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output format (defaults to the output extension, then the config)
    #[arg(long, short = 'f', value_enum)]
    format: Option<ExportFormat>,

    /// Output resolution multiplier (e.g. 1, 2, 3)
    #[arg(long, value_name = "N")]
    scale: Option<f64>,

    /// Background preset: purple, blue, pink, green, nebula, space, galaxy or a hex swatch
    #[arg(long, short = 'b', value_name = "NAME")]
    background_preset: Option<String>,

    /// Nine-grid position of the subject
    #[arg(long, value_enum)]
    position: Option<PositionPreset>,

    /// Enable the window frame with this title
    #[arg(long, value_name = "TITLE")]
    title: Option<String>,

    /// Use the light window frame theme
    #[arg(long, action = ArgAction::SetTrue)]
    light_frame: bool,

    /// Reserve the frame space but do not draw the title bar
    #[arg(long, action = ArgAction::SetTrue)]
    no_frame_bake: bool,

    /// Config file to use instead of ~/.config/beautyshot/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the scene (defaults, or the --scene file) as TOML and exit
    #[arg(long, action = ArgAction::SetTrue)]
    dump_scene: bool,

    /// Write a documented default config file and exit
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,

    /// List background preset names and exit
    #[arg(long, action = ArgAction::SetTrue)]
    list_presets: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Created {}", path.display());
        return Ok(());
    }

    if cli.list_presets {
        for name in BackgroundConfig::preset_names() {
            println!("{name}");
        }
        return Ok(());
    }

    if cli.dump_scene {
        let scene = match &cli.scene {
            Some(path) => RenderSnapshot::load_scene(path)?,
            None => RenderSnapshot::default(),
        };
        print!("{}", scene.to_scene_string(SceneFormat::Toml)?);
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let input = cli
        .input
        .as_deref()
        .ok_or_else(|| anyhow!("No input image given"))?;
    let saved = run(&cli, &config, input).await?;
    println!("{}", saved.display());
    Ok(())
}

async fn run(cli: &Cli, config: &Config, input: &Path) -> Result<PathBuf> {
    let subject = ingest::load_subject(input)
        .await
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let mut editor = Editor::from_config(config);
    editor.on_image_decoded(subject);

    if let Some(path) = &cli.scene {
        editor.apply_scene(RenderSnapshot::load_scene(path)?);
    }

    if let Some(name) = &cli.background_preset {
        let background = BackgroundConfig::preset(name).with_context(|| {
            format!(
                "Unknown background preset '{name}' (try one of: {})",
                BackgroundConfig::preset_names().collect::<Vec<_>>().join(", ")
            )
        })?;
        editor.set_background(background);
    }

    if let Some(preset) = cli.position {
        let manipulation = editor.snapshot().manipulation.with_position_preset(preset);
        editor.set_image_manipulation(manipulation);
    }

    if cli.title.is_some() || cli.light_frame {
        let current = editor.snapshot().frame.clone();
        editor.set_frame(FrameConfig {
            enabled: true,
            theme: if cli.light_frame {
                FrameTheme::Light
            } else {
                current.theme
            },
            title: cli.title.clone().or(current.title),
        });
    }

    let mut settings = config.export_settings();
    settings.format = cli
        .format
        .or_else(|| {
            cli.output
                .as_deref()
                .and_then(|p| p.extension())
                .and_then(|ext| ext.to_str())
                .and_then(ExportFormat::from_extension)
        })
        .unwrap_or(settings.format);
    if let Some(scale) = cli.scale {
        settings.scale = scale;
    }
    if cli.no_frame_bake {
        settings.render.bake_frame = false;
    }

    log::info!(
        "Exporting {} annotations as {:?} at {}x",
        editor.snapshot().annotations.len(),
        settings.format,
        settings.scale
    );
    let data = export::export_image_async(editor.snapshot().clone(), settings.clone()).await?;

    let path = match &cli.output {
        Some(path) => {
            file::write_export(&data, path)?;
            path.clone()
        }
        None => {
            let mut save = config.file_save_config();
            save.format = settings.format;
            file::save_export(&data, &save)?
        }
    };
    Ok(path)
}
