mod logger;
mod pages;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use log::info;
use std::path::PathBuf;

use pdf_nup::{
    Assembler, AssemblyState, DescriptorDefaults, LayoutSettings, NUp, PREVIEW_SCALE,
    PageSession, PdfiumRasterizer, Preset, Raster, RendererAdapter, Rotation,
};

use logger::CliLogger;
use pages::{parse_overlay, parse_page, parse_page_list};

#[derive(Parser)]
#[command(name = "pdfn", about = "Print lecture slides N-up with ink-saving filters", version)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble pages onto N-up sheets
    Assemble {
        #[command(flatten)]
        pages: PageArgs,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Annotation image drawn over a page, as PAGE=image.png (repeatable)
        #[arg(long)]
        overlay: Vec<String>,

        /// Directory holding the PDFium library
        #[arg(long)]
        pdfium_dir: Option<PathBuf>,
    },

    /// Show sheet count and paper savings without rendering
    Stats {
        #[command(flatten)]
        pages: PageArgs,
    },

    /// Render one filtered page to an image
    Preview {
        #[command(flatten)]
        pages: PageArgs,

        /// Page to render (1-based, counted across all inputs)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Render scale (pixels per point)
        #[arg(long, default_value_t = PREVIEW_SCALE)]
        scale: f32,

        /// Output image file (format from extension)
        #[arg(short, long)]
        output: PathBuf,

        /// Directory holding the PDFium library
        #[arg(long)]
        pdfium_dir: Option<PathBuf>,
    },
}

/// Inputs plus the page and layout edits shared by every command
#[derive(Args)]
struct PageArgs {
    /// Input PDF file(s) - can specify multiple
    #[arg(short, long, required = true, num_args = 1..)]
    input: Vec<PathBuf>,

    /// Pages to print, in order, e.g. "3,1-2" (1-based across all inputs)
    #[arg(long)]
    pages: Option<String>,

    /// Start every page inverted, high-contrast and turned 90 degrees
    #[arg(long)]
    ink_saver_defaults: bool,

    /// Layout settings JSON file
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Apply a preset layout and page edits
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,

    /// Pages per sheet (1-8)
    #[arg(long)]
    n_up: Option<u8>,

    /// Outline every occupied cell
    #[arg(long, conflicts_with = "no_borders")]
    borders: bool,

    /// Do not outline cells
    #[arg(long)]
    no_borders: bool,

    /// Print the sheet number at the bottom of each sheet
    #[arg(long)]
    page_numbers: bool,

    /// Invert colors of the printed pages
    #[arg(long)]
    invert: bool,

    /// Convert printed pages to grayscale
    #[arg(long)]
    grayscale: bool,

    /// Brightness boost (0-100)
    #[arg(long)]
    whiteness: Option<f32>,

    /// Contrast boost (0-100)
    #[arg(long)]
    blackness: Option<f32>,

    /// Rotate printed pages clockwise (multiple of 90)
    #[arg(long, allow_hyphen_values = true)]
    rotate: Option<i32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Standard,
    SmartGrid,
    InkSaver,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Standard => Self::Standard,
            PresetArg::SmartGrid => Self::SmartGrid,
            PresetArg::InkSaver => Self::InkSaver,
        }
    }
}

/// Session with every command-line edit applied, plus the original
/// enumeration order used to resolve page numbers
struct Prepared {
    session: PageSession,
    layout: LayoutSettings,
    enumerated: Vec<pdf_nup::PageId>,
}

async fn prepare(args: &PageArgs) -> Result<Prepared> {
    let defaults = if args.ink_saver_defaults {
        DescriptorDefaults::ink_saver()
    } else {
        DescriptorDefaults::default()
    };
    let mut session = PageSession::new(defaults);

    for pdf in pdf_nup::load_multiple_pdfs(&args.input).await? {
        session.add_document(pdf);
    }
    let enumerated: Vec<_> = session.pages().iter().map(|p| p.id).collect();

    let mut layout = match &args.layout {
        Some(path) => LayoutSettings::load(path)
            .await
            .with_context(|| format!("Failed to load layout {}", path.display()))?,
        None => LayoutSettings::new(NUp::FOUR, true),
    };

    if let Some(preset) = args.preset {
        session.apply_preset(preset.into(), &mut layout);
    }
    if let Some(n) = args.n_up {
        layout.n_up = NUp::new(n)?;
    }
    if args.borders {
        layout.show_borders = true;
    }
    if args.no_borders {
        layout.show_borders = false;
    }
    if args.page_numbers {
        layout.show_page_numbers = true;
    }

    if let Some(list) = &args.pages {
        let order: Vec<_> = parse_page_list(list, enumerated.len())?
            .into_iter()
            .map(|i| enumerated[i])
            .collect();
        session.arrange(&order)?;
    }

    if args.invert || args.grayscale || args.whiteness.is_some() || args.blackness.is_some() {
        session.update_selected_filters(|f| {
            f.invert |= args.invert;
            f.grayscale |= args.grayscale;
            if let Some(w) = args.whiteness {
                f.set_whiteness(w);
            }
            if let Some(b) = args.blackness {
                f.set_blackness(b);
            }
        });
    }

    if let Some(degrees) = args.rotate {
        let rotation = Rotation::from_degrees(degrees)?;
        let selected: Vec<_> = session.selected_pages().map(|p| p.id).collect();
        for id in selected {
            session.set_rotation(id, rotation)?;
        }
    }

    Ok(Prepared {
        session,
        layout,
        enumerated,
    })
}

fn rasterizer(pdfium_dir: Option<PathBuf>) -> PdfiumRasterizer {
    match pdfium_dir {
        Some(dir) => PdfiumRasterizer::with_library_dir(dir),
        None => PdfiumRasterizer::new(),
    }
}

fn print_statistics(prepared: &Prepared) -> Result<()> {
    let stats = pdf_nup::calculate_statistics(prepared.session.pages(), &prepared.layout)?;
    println!("Assembly Statistics:");
    println!("  Total pages: {}", stats.total_pages);
    println!("  Selected pages: {}", stats.selected_pages);
    println!("  Pages per sheet: {}", prepared.layout.n_up.get());
    println!("  Output sheets: {}", stats.output_sheets);
    println!("  Empty cells: {}", stats.empty_cells);
    println!("  Paper saved: {}%", stats.savings_percent);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    CliLogger::new(cli.verbose).init()?;

    match cli.command {
        Commands::Assemble {
            pages,
            output,
            overlay,
            pdfium_dir,
        } => {
            let mut prepared = prepare(&pages).await?;

            for arg in &overlay {
                let (index, path) = parse_overlay(arg, prepared.enumerated.len())?;
                let image = image::open(&path)
                    .with_context(|| format!("Failed to read overlay {}", path.display()))?;
                prepared
                    .session
                    .set_overlay(prepared.enumerated[index], Some(Raster::from_image(&image)))?;
            }

            print_statistics(&prepared)?;

            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
            let progress = tokio::spawn(async move {
                while let Some(state) = rx.recv().await {
                    if let AssemblyState::Rendering { sheet, cell } = state {
                        info!("Rendering sheet {} cell {}", sheet + 1, cell + 1);
                    }
                }
            });

            let bytes = Assembler::new()
                .with_progress(tx)
                .assemble(
                    prepared.session.pages(),
                    prepared.session.documents(),
                    &prepared.layout,
                    rasterizer(pdfium_dir),
                )
                .await?;
            progress.await?;

            pdf_nup::save_pdf(&bytes, &output).await?;
            println!("Assembled → {}", output.display());
        }

        Commands::Stats { pages } => {
            let prepared = prepare(&pages).await?;
            print_statistics(&prepared)?;
        }

        Commands::Preview {
            pages,
            page,
            scale,
            output,
            pdfium_dir,
        } => {
            let prepared = prepare(&pages).await?;
            let index = parse_page(&page.to_string(), prepared.enumerated.len())?;
            let Some(descriptor) = prepared.session.page(prepared.enumerated[index]).cloned()
            else {
                bail!("Page {} is not available", page);
            };
            let documents = prepared.session.documents().clone();
            let rasterizer = rasterizer(pdfium_dir);

            let raster = tokio::task::spawn_blocking(move || {
                let adapter = RendererAdapter::new(&documents, &rasterizer);
                pdf_nup::render_preview(&adapter, &descriptor, scale)
            })
            .await??;

            raster
                .to_image()?
                .save(&output)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "Preview {}x{} → {}",
                raster.width(),
                raster.height(),
                output.display()
            );
        }
    }

    Ok(())
}
