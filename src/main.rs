//! Raster Tiler - split large rasters into tile grids and stitch them back.
//!
//! This binary wires the CLI subcommands to the library.

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use raster_tiler::{
    bench_codecs, decode_image, encode_gray_png,
    config::{AssembleConfig, BenchConfig, ChannelsConfig, Cli, Command, CropConfig, SplitConfig},
    split_channels, DecodedImage, FsTileStore, Tile, TileGrid, TilingService,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Split(config) => run_split(config).await,
        Command::Assemble(config) => run_assemble(config).await,
        Command::Crop(config) => run_crop(config).await,
        Command::Channels(config) => run_channels(config).await,
        Command::Bench(config) => run_bench(config).await,
    }
}

/// Log the error and map the outcome to an exit code.
fn finish(command: &str, result: Result<(), String>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{} failed: {}", command, e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Split Command
// =============================================================================

async fn run_split(config: SplitConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    finish("split", split(&config).await)
}

async fn split(config: &SplitConfig) -> Result<(), String> {
    let image = load_image(&config.input).await?;
    let source = image
        .channel_tile(config.channel)
        .map_err(|e| e.to_string())?;

    let grid = TileGrid::new(
        source.width(),
        source.height(),
        config.tile_width,
        config.tile_height,
    )
    .map_err(|e| e.to_string())?;

    info!("Configuration:");
    info!("  Input: {} ({}x{})", config.input.display(), image.width, image.height);
    info!("  Channel: {} of {}", config.channel, image.channels);
    info!(
        "  Grid: {}x{} cells of {}x{}{}",
        grid.columns(),
        grid.rows(),
        config.tile_width,
        config.tile_height,
        if grid.is_exact() { "" } else { " (edge cells clipped)" }
    );
    info!("  Codec: {}", config.compression);

    // The interleaved image is no longer needed once the channel is extracted
    drop(image);

    let service = TilingService::new(FsTileStore::new(&config.output_dir));
    let manifest = service
        .write_grid(&source, grid, config.compression)
        .await
        .map_err(|e| e.to_string())?;

    info!(
        "Wrote {} tiles to {}",
        manifest.columns * manifest.rows,
        config.output_dir.display()
    );
    Ok(())
}

// =============================================================================
// Assemble Command
// =============================================================================

async fn run_assemble(config: AssembleConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    finish("assemble", assemble(&config).await)
}

async fn assemble(config: &AssembleConfig) -> Result<(), String> {
    let service =
        TilingService::with_cache_capacity(FsTileStore::new(&config.tiles_dir), config.cache_size);

    let manifest = service.load_manifest().await.map_err(|e| e.to_string())?;
    debug!(
        "Loaded manifest: {}x{} image, {}x{} cells, {}",
        manifest.image_width,
        manifest.image_height,
        manifest.columns,
        manifest.rows,
        manifest.compression
    );

    let start = Instant::now();
    let composite = service
        .assemble_row(&manifest, config.row, config.col_start, config.col_end)
        .await
        .map_err(|e| e.to_string())?;

    let png = encode_gray_png(&composite).map_err(|e| e.to_string())?;
    write_file(&config.output, &png).await?;

    info!(
        "Stitched {} tiles of row {} into {} ({}x{}) in {:?}",
        config.tile_count(),
        config.row,
        config.output.display(),
        composite.width(),
        composite.height(),
        start.elapsed()
    );
    Ok(())
}

// =============================================================================
// Crop Command
// =============================================================================

async fn run_crop(config: CropConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    finish("crop", crop(&config).await)
}

async fn crop(config: &CropConfig) -> Result<(), String> {
    let image = load_image(&config.input).await?;
    let source = image
        .channel_tile(config.channel)
        .map_err(|e| e.to_string())?;

    let tile = source
        .subset(config.x0, config.y0, config.x1, config.y1)
        .map_err(|e| e.to_string())?;

    let png = encode_gray_png(&tile).map_err(|e| e.to_string())?;
    write_file(&config.output, &png).await?;

    info!(
        "Cropped {}x{} from {} into {}",
        tile.width(),
        tile.height(),
        config.input.display(),
        config.output.display()
    );
    Ok(())
}

// =============================================================================
// Channels Command
// =============================================================================

async fn run_channels(config: ChannelsConfig) -> ExitCode {
    init_logging(config.verbose);
    finish("channels", channels(&config).await)
}

async fn channels(config: &ChannelsConfig) -> Result<(), String> {
    let image = load_image(&config.input).await?;
    let planes = split_channels(&image.data, image.channels).map_err(|e| e.to_string())?;

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|e| format!("{}: {}", config.output_dir.display(), e))?;

    for (index, plane) in planes.into_iter().enumerate() {
        let raw_path = config.output_dir.join(format!("channel_{}.raw", index));
        write_file(&raw_path, &plane).await?;

        let tile = Tile::new(plane, image.width, image.height)
            .map_err(|e| e.to_string())?;
        let png = encode_gray_png(&tile).map_err(|e| e.to_string())?;
        let png_path = config.output_dir.join(format!("channel_{}.png", index));
        write_file(&png_path, &png).await?;

        debug!("Wrote channel {} to {}", index, png_path.display());
    }

    info!(
        "Split {} channels of {} into {}",
        image.channels,
        config.input.display(),
        config.output_dir.display()
    );
    Ok(())
}

// =============================================================================
// Bench Command
// =============================================================================

async fn run_bench(config: BenchConfig) -> ExitCode {
    init_logging(config.verbose);
    finish("bench", bench(&config).await)
}

async fn bench(config: &BenchConfig) -> Result<(), String> {
    let image = load_image(&config.input).await?;
    let store = FsTileStore::new(&config.output_dir);

    let reports = bench_codecs(&store, "dat", &image.data, &config.selected_codecs())
        .await
        .map_err(|e| e.to_string())?;

    println!("Codec benchmark: {}", config.input.display());
    println!("══════════════════════════════════════════════════════════");
    println!(
        "{:<8} {:>14} {:>14} {:>8} {:>10} {:>10}",
        "codec", "raw bytes", "stored bytes", "ratio", "write ms", "read ms"
    );
    for report in &reports {
        println!(
            "{:<8} {:>14} {:>14} {:>8.3} {:>10.1} {:>10.1}",
            report.codec.name(),
            report.raw_bytes,
            report.stored_bytes,
            report.ratio(),
            report.write_time.as_secs_f64() * 1000.0,
            report.read_time.as_secs_f64() * 1000.0,
        );
    }

    Ok(())
}

// =============================================================================
// Helpers
// =============================================================================

async fn load_image(path: &Path) -> Result<DecodedImage, String> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    let image = decode_image(&bytes).map_err(|e| format!("{}: {}", path.display(), e))?;
    debug!(
        "Decoded {}: {}x{}, {} channel(s)",
        path.display(),
        image.width,
        image.height,
        image.channels
    );
    Ok(image)
}

async fn write_file(path: &Path, data: &[u8]) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| format!("{}: {}", parent.display(), e))?;
    }
    tokio::fs::write(path, data)
        .await
        .map_err(|e| format!("{}: {}", path.display(), e))
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "raster_tiler=debug"
    } else {
        "raster_tiler=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
