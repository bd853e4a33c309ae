use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "hexcurtain", version)]
struct Cli {
    /// Log debug events to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the grid layout for a viewport as JSON.
    Grid(GridArgs),
    /// Trigger the reveal and write every frame as a PNG.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct ViewportArgs {
    /// Viewport width in CSS pixels.
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Viewport height in CSS pixels.
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Curtain config JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct GridArgs {
    #[command(flatten)]
    viewport: ViewportArgs,

    /// Include every cell center in the output.
    #[arg(long)]
    cells: bool,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    viewport: ViewportArgs,

    /// Device pixel ratio, clamped to [1, 2].
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Image painted under the cells.
    #[arg(long)]
    background: Option<PathBuf>,

    /// Page color shown through the holes, straight RGBA hex (e.g. `f4efe6ff`).
    #[arg(long, default_value = "f4efe6ff")]
    site: String,

    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Frame at which the curtain is activated.
    #[arg(long, default_value_t = 0)]
    trigger_frame: u32,

    /// Stop after this many frames even if the reveal is unfinished.
    #[arg(long, default_value_t = 600)]
    max_frames: u32,

    /// Output directory for `frame_00000.png`, ...
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .try_init();

    match cli.cmd {
        Command::Grid(args) => cmd_grid(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<hexcurtain::CurtainConfig> {
    let mut cfg = match path {
        Some(p) => hexcurtain::CurtainConfig::from_path(p)
            .with_context(|| format!("load curtain config '{}'", p.display()))?,
        None => hexcurtain::CurtainConfig::default(),
    };
    if reduced_motion_from_env() {
        cfg.reduced_motion = true;
    }
    Ok(cfg)
}

fn reduced_motion_from_env() -> bool {
    std::env::var("HEXCURTAIN_REDUCED_MOTION")
        .map(|v| matches!(v.trim(), "1" | "true" | "yes" | "reduce"))
        .unwrap_or(false)
}

fn viewport(args: &ViewportArgs) -> anyhow::Result<hexcurtain::Viewport> {
    Ok(hexcurtain::Viewport::try_new(args.width, args.height)?)
}

fn cmd_grid(args: GridArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.viewport.config.as_deref())?;
    let vp = viewport(&args.viewport)?;
    let grid = hexcurtain::build_grid(vp, &cfg.grid);

    let mut out = serde_json::json!({
        "width": vp.width,
        "height": vp.height,
        "radius": grid.radius(),
        "cells": grid.len(),
    });
    if args.cells {
        out["centers"] = grid
            .cells()
            .iter()
            .map(|c| serde_json::json!({ "col": c.col, "row": c.row, "x": c.center.x, "y": c.center.y }))
            .collect();
    }
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Collects orchestrator callbacks between frames.
#[derive(Default)]
struct FrameHost {
    pulse: Option<Option<hexcurtain::PulseFrame>>,
    title: Option<String>,
    revealed: bool,
}

impl hexcurtain::RevealHost for FrameHost {
    fn on_impact(&mut self, point: hexcurtain::Point) {
        tracing::info!(x = point.x, y = point.y, "impact");
    }

    fn on_pulse(&mut self, frame: Option<&hexcurtain::PulseFrame>) {
        self.pulse = Some(frame.copied());
    }

    fn on_title(&mut self, text: &str) {
        self.title = Some(text.to_owned());
    }

    fn on_revealed(&mut self) {
        self.revealed = true;
        tracing::info!("revealed");
    }
}

fn parse_site_color(s: &str) -> anyhow::Result<[u8; 4]> {
    let s = s.trim_start_matches('#');
    anyhow::ensure!(
        s.len() == 8 && s.is_ascii(),
        "site color must be 8 hex digits (RRGGBBAA)"
    );
    let mut rgba = [0u8; 4];
    for (i, c) in rgba.iter_mut().enumerate() {
        *c = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
            .with_context(|| format!("parse site color '{s}'"))?;
    }
    Ok(rgba)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.fps > 0, "fps must be > 0");
    let cfg = read_config(args.viewport.config.as_deref())?;
    let vp = viewport(&args.viewport)?;
    let site = hexcurtain::Rgba8Premul::from_straight(parse_site_color(&args.site)?);

    let mut engine = hexcurtain::DissolveEngine::new(
        hexcurtain::CpuCurtain::new(cfg.style.clone()),
        &cfg,
        vp,
        args.dpr,
    )
    .context("create curtain")?;
    if let Some(path) = &args.background {
        engine.set_background(hexcurtain::load_background(path))?;
    }
    let mut fx = hexcurtain::FxLayer::new();
    fx.fit(vp, engine.device_pixel_ratio())?;

    let mut orch = hexcurtain::RevealOrchestrator::new(&cfg);
    orch.arm();
    let mut host = FrameHost::default();

    let (w, h) = (
        engine.surface().surface().width_px(),
        engine.surface().surface().height_px(),
    );
    anyhow::ensure!(w > 0 && h > 0, "viewport has no pixels");
    let site_px = site.to_array().repeat(w as usize * h as usize);

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let dt = 1000.0 / f64::from(args.fps);
    let mut settled_frames = 0u32;
    for frame in 0..args.max_frames {
        if frame == args.trigger_frame {
            orch.activate(&mut engine, &mut host, &hexcurtain::Activation::Pointer)?;
        }
        if frame > 0 {
            orch.tick(&mut engine, &mut host, dt)?;
        }
        if let Some(pulse) = host.pulse.take() {
            fx.draw_pulse(pulse.as_ref())?;
        }
        if let Some(title) = host.title.take() {
            tracing::info!(frame, %title, "title");
            settled_frames = 0;
        }

        let mut out = site_px.clone();
        if let Some(curtain) = engine.surface().surface().data() {
            hexcurtain::over_in_place(&mut out, curtain)?;
        }
        if let Some(layer) = fx.surface().data() {
            hexcurtain::over_in_place(&mut out, layer)?;
        }
        let path = args.out.join(format!("frame_{frame:05}.png"));
        image::save_buffer_with_format(
            &path,
            &out,
            w,
            h,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;

        if host.revealed {
            settled_frames += 1;
            // Hold the final frame briefly once the title has settled.
            if settled_frames > args.fps / 4 {
                eprintln!("wrote {} frames to {}", frame + 1, args.out.display());
                return Ok(());
            }
        }
    }
    eprintln!(
        "wrote {} frames to {} (reveal unfinished)",
        args.max_frames,
        args.out.display()
    );
    Ok(())
}
