use clap::{Parser, Subcommand};
use retouch::imaging::TextParams;
use retouch::{config, output, process};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "retouch")]
#[command(about = "Apply filters, text, date stamps and style transfer to images")]
#[command(long_about = "\
Apply filters, text, date stamps and style transfer to images

Sources are read from the upload directory and results written next to
each other in the output directory as {stem}_{code}{ext}:

  uploads/photo.jpg  --op mnc  →  static/uploads/photo_mnc.jpg

Operation codes:
  txt  text overlay (--text, --x and --y required)
  anm  neural style transfer
  mnc  monochrome
  crd  card color grade
  rtr  vintage sepia
  dnt  weekday and date stamp

Run 'retouch gen-config' to generate a documented retouch.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = config::DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Text overlay parameters, passed through uncoerced.
#[derive(clap::Args, Clone)]
struct TextArgs {
    /// Text to draw (txt)
    #[arg(long)]
    text: Option<String>,
    /// Font key, e.g. arimo, tinos, playwrite, allan, anton
    #[arg(long)]
    font: Option<String>,
    /// Font size in pixels; anything but a positive integer uses the default
    #[arg(long)]
    font_size: Option<String>,
    /// Text color: #rgb, #rrggbb or a basic color name
    #[arg(long)]
    color: Option<String>,
    /// Left edge of the text
    #[arg(long, allow_hyphen_values = true)]
    x: Option<String>,
    /// Top edge of the text
    #[arg(long, allow_hyphen_values = true)]
    y: Option<String>,
}

impl From<TextArgs> for TextParams {
    fn from(args: TextArgs) -> Self {
        TextParams {
            text: args.text,
            font: args.font,
            font_size: args.font_size,
            color: args.color,
            x: args.x,
            y: args.y,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Apply one operation to an uploaded image
    Process {
        /// File name inside the upload directory
        name: String,
        /// Operation code
        #[arg(long)]
        op: String,
        #[command(flatten)]
        text: TextArgs,
    },
    /// Tile images into a grid collage
    Collage {
        /// Input images, placed row by row
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Grid rows (default from config)
        #[arg(long)]
        rows: Option<u32>,
        /// Grid columns (default from config)
        #[arg(long)]
        cols: Option<u32>,
    },
    /// Print a stock retouch.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let json = cli.json;
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                println!("{}", output::format_error_json(e.as_ref()));
            } else {
                log::error!("{e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Process { name, op, text } => {
            let app_config = config::load_config(&cli.config)?;
            init_thread_pool(&app_config.processing);
            let result = process::process_image(&app_config, &name, &op, &text.into())?;
            output::print_processed(&name, &result, cli.json);
        }
        Command::Collage { files, rows, cols } => {
            let app_config = config::load_config(&cli.config)?;
            init_thread_pool(&app_config.processing);
            let rows = rows.unwrap_or(app_config.collage.rows);
            let cols = cols.unwrap_or(app_config.collage.cols);
            let result = process::create_collage(&app_config, &files, rows, cols)?;
            output::print_collage(&result, cli.json);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
