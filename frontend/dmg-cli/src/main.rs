use anyhow::{Context, anyhow};
use clap::Parser;
use dmg_common::frontend::{Color, FrameSize, Renderer};
use dmg_config::DmgPalette;
use dmg_core::api::{DmgEmulator, DmgEmulatorConfig};
use dmg_core::memory::Memory;
use env_logger::Env;
use std::convert::Infallible;
use std::fs;
use std::num::NonZeroU16;
use std::path::{Path, PathBuf};

#[derive(Parser)]
struct Args {
    /// Raw 64 KiB memory image with VRAM, OAM and the PPU registers at their DMG addresses
    #[arg(short = 'f', long)]
    file_path: PathBuf,

    /// Number of frames to run before writing the output image
    #[arg(long, default_value_t = 1)]
    frames: u32,

    /// Cycles handed to the PPU per simulated instruction
    #[arg(long, default_value = "4")]
    cycles_per_step: NonZeroU16,

    /// Display palette (Classic / GreenTint / LimeGreen)
    #[arg(long, default_value_t)]
    palette: DmgPalette,

    /// Where to write the last rendered frame as a PNG
    #[arg(short = 'o', long, default_value = "frame.png")]
    output_path: PathBuf,
}

/// Keeps the most recently presented frame in memory.
#[derive(Debug, Default)]
struct CaptureRenderer {
    frame: Vec<Color>,
    frame_size: Option<FrameSize>,
    frames_rendered: u32,
}

impl Renderer for CaptureRenderer {
    type Err = Infallible;

    fn render_frame(
        &mut self,
        frame_buffer: &[Color],
        frame_size: FrameSize,
    ) -> Result<(), Self::Err> {
        self.frame.clear();
        self.frame.extend_from_slice(&frame_buffer[..frame_size.len()]);
        self.frame_size = Some(frame_size);
        self.frames_rendered += 1;

        Ok(())
    }
}

impl CaptureRenderer {
    fn save_png(&self, path: &Path) -> anyhow::Result<()> {
        let frame_size = self.frame_size.ok_or_else(|| anyhow!("No frame was rendered"))?;

        let frame_image = image::RgbaImage::from_raw(
            frame_size.width,
            frame_size.height,
            bytemuck::cast_slice(self.frame.as_slice()).to_vec(),
        )
        .ok_or_else(|| anyhow!("Frame buffer does not match frame size {frame_size:?}"))?;

        frame_image
            .save(path)
            .with_context(|| format!("Failed to write image to '{}'", path.display()))
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let image_bytes = fs::read(&args.file_path).with_context(|| {
        format!("Failed to read memory image from '{}'", args.file_path.display())
    })?;
    let memory = Memory::from_image(&image_bytes)?;

    log::info!(
        "Running {} frame(s) at {} cycles per step with palette {}",
        args.frames,
        args.cycles_per_step,
        args.palette
    );

    let mut emulator = DmgEmulator::new(memory, DmgEmulatorConfig { palette: args.palette });
    let mut renderer = CaptureRenderer::default();

    for _ in 0..args.frames {
        emulator.run_frame(args.cycles_per_step, &mut renderer)?;
    }

    if renderer.frames_rendered == 0 {
        emulator.force_render(&mut renderer)?;
    }

    renderer.save_png(&args.output_path)?;
    log::info!("Wrote frame {} to '{}'", renderer.frames_rendered, args.output_path.display());

    Ok(())
}
