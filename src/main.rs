use clap::{Parser, Subcommand};
use pixfit::imaging::{self, AspectRatio, ImageFile, OutputFormat, Quality, Region, RustBackend};
use pixfit::{batch, config, output, presets};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("PIXFIT_ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("PIXFIT_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

/// Encoding overrides shared by commands that write images.
#[derive(clap::Args, Clone)]
struct EncodeArgs {
    /// Output format for re-encoded images [default: from config, jpeg]
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Lossy encoding quality, 1-100 [default: from config, 92]
    #[arg(long)]
    quality: Option<u32>,
}

#[derive(Parser)]
#[command(name = "pixfit")]
#[command(about = "Shrink images to a size bound or crop them to social-media presets")]
#[command(long_about = "\
Shrink images to a size bound or crop them to social-media presets

Resizing keeps the aspect ratio and only ever shrinks: an image whose longer
side already fits the bound is copied byte for byte, anything larger is
redrawn once and re-encoded (JPEG by default).

Presets cover an exact platform size (e.g. ig-story, 1080 × 1920) and
center-crop whatever sticks out. 'crop' keeps an aspect ratio or a region
without scaling, and 'split' cuts an image into a grid of tiles.

Run 'pixfit gen-config' to generate a documented pixfit.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file [default: ./pixfit.toml when present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log per-file decisions (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Shrink images so the longer side fits a bound
    Resize {
        /// Image files or directories (walked recursively)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Longer-edge bound in pixels [default: from config, 1500]
        #[arg(long)]
        max_size: Option<u32>,

        /// Output directory
        #[arg(long, default_value = "resized")]
        output: PathBuf,

        /// Write a JSON report of every file's outcome
        #[arg(long)]
        report: Option<PathBuf>,

        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Cover a social-media preset size and center-crop
    Preset {
        /// Preset id, see 'pixfit presets'
        id: String,

        /// Source image
        input: PathBuf,

        /// Output directory
        #[arg(long, default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Crop to an aspect ratio (centered) or an exact region
    Crop {
        /// Source image
        input: PathBuf,

        /// Keep the largest centered area with this ratio, e.g. 16:9
        #[arg(long, required_unless_present = "region", conflicts_with = "region")]
        aspect: Option<AspectRatio>,

        /// Keep exactly this area, as WxH+X+Y (e.g. 800x600+10+20)
        #[arg(long)]
        region: Option<Region>,

        /// Output directory
        #[arg(long, default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Split an image into a grid of equal tiles
    Split {
        /// Source image
        input: PathBuf,

        /// Tiles per row
        #[arg(long, default_value_t = 3)]
        columns: u32,

        /// Tiles per column
        #[arg(long, default_value_t = 1)]
        rows: u32,

        /// Give every tile this shape, e.g. 1:1 or 4:5 [default: whatever the image gives]
        #[arg(long)]
        tile_aspect: Option<AspectRatio>,

        /// Output directory
        #[arg(long, default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// List social-media presets
    Presets {
        /// Only show one platform
        #[arg(long, value_enum)]
        platform: Option<presets::Platform>,
    },
    /// Decode a base64 data URI from a text file into an image file
    DataUri {
        /// Text file containing a `data:...;base64,...` URI
        input: PathBuf,

        /// Output file [default: input stem + extension for the URI's type]
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also shrink the decoded image to this bound
        #[arg(long)]
        max_size: Option<u32>,

        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Print a stock pixfit.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let tool_config = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(Path::new("."))?,
    };

    match cli.command {
        Command::Resize {
            inputs,
            max_size,
            output: output_dir,
            report,
            encode,
        } => {
            init_thread_pool(&tool_config.processing);
            let options = batch::BatchOptions {
                max_size: max_size.unwrap_or(tool_config.resize.max_size),
                encode: encode_params(&tool_config, &encode),
            };
            let files = batch::collect_inputs(&inputs)?;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_batch_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result =
                batch::run_batch(&RustBackend::new(), &files, &output_dir, &options, Some(tx));
            printer
                .join()
                .map_err(|_| "progress printer thread panicked")?;
            let result = result?;

            println!();
            println!("{}", output::format_batch_summary(&result));
            if let Some(path) = report {
                result.write_json(&path)?;
                println!("Report: {}", path.display());
            }

            let failed = result.count(batch::FileStatus::Failed);
            if failed > 0 {
                return Err(format!("{} of {} files failed", failed, result.entries.len()).into());
            }
        }
        Command::Preset {
            id,
            input,
            output: output_dir,
            encode,
        } => {
            let preset = presets::find_preset(&id).ok_or_else(|| {
                format!("Unknown preset '{id}'. Run 'pixfit presets' to list them.")
            })?;
            let (written, outcome) = batch::apply_preset(
                &RustBackend::new(),
                &input,
                preset,
                &output_dir,
                &encode_params(&tool_config, &encode),
            )?;
            output::print_preset_result(preset, &input, &written, &outcome);
        }
        Command::Crop {
            input,
            aspect,
            region,
            output: output_dir,
            encode,
        } => {
            let target = match (aspect, region) {
                (Some(ratio), _) => batch::CropTarget::Aspect(ratio),
                (None, Some(region)) => batch::CropTarget::Region(region),
                (None, None) => return Err("crop needs --aspect or --region".into()),
            };
            let (written, outcome) = batch::apply_crop(
                &RustBackend::new(),
                &input,
                target,
                &output_dir,
                &encode_params(&tool_config, &encode),
            )?;
            output::print_crop_result(&target, &input, &written, &outcome);
        }
        Command::Split {
            input,
            columns,
            rows,
            tile_aspect,
            output: output_dir,
            encode,
        } => {
            let tiles = batch::apply_split(
                &RustBackend::new(),
                &input,
                columns,
                rows,
                tile_aspect,
                &output_dir,
                &encode_params(&tool_config, &encode),
            )?;
            output::print_split_result(columns, rows, &input, &tiles);
        }
        Command::Presets { platform } => {
            output::print_preset_list(&presets::presets_for(platform));
        }
        Command::DataUri {
            input,
            output: output_path,
            max_size,
            encode,
        } => {
            let uri = std::fs::read_to_string(&input)?;
            let blob = imaging::decode_data_uri(&uri)?;
            let name = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            let mut file = blob.into_file(name);

            if let Some(max_size) = max_size {
                let outcome = imaging::resize_with(
                    &RustBackend::new(),
                    file,
                    max_size,
                    &encode_params(&tool_config, &encode),
                )?;
                if let Some(original) = outcome.original {
                    println!(
                        "Resized {}x{} → {}x{}",
                        original.width,
                        original.height,
                        outcome.dimensions.width,
                        outcome.dimensions.height
                    );
                }
                file = outcome.file;
            }

            let path = output_path.unwrap_or_else(|| default_data_uri_output(&input, &file));
            std::fs::write(&path, &file.bytes)?;
            println!(
                "Wrote {} ({}, {} bytes)",
                path.display(),
                file.media_type,
                file.bytes.len()
            );
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Config values with CLI flags layered on top.
fn encode_params(tool_config: &config::ToolConfig, args: &EncodeArgs) -> imaging::EncodeParams {
    let mut params = tool_config.resize.encode_params();
    if let Some(format) = args.format {
        params.format = format;
    }
    if let Some(quality) = args.quality {
        params.quality = Quality::new(quality);
    }
    params
}

/// `<input stem>.<ext>`, next to the input, with the extension taken from the media type.
fn default_data_uri_output(input: &Path, file: &ImageFile) -> PathBuf {
    let ext = image::ImageFormat::from_mime_type(&file.media_type)
        .and_then(|f| f.extensions_str().first().copied())
        .unwrap_or("bin");
    input.with_file_name(format!("{}.{}", file.name, ext))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. Config can lower it, never raise it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
