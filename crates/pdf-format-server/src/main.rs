use anyhow::Result;
use clap::{Parser, Subcommand};
use pdf_format_server::{api, config::ServiceConfig, state::AppState};
use pdf_manuscript::{ExtractOptions, Manuscript, ManuscriptSource};
use pdf_typeset::{FontRegistry, TypesetOptions};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pdff", about = "KDP manuscript formatter", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP formatting service
    Serve {
        /// Service configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Listen address, overrides the configuration
        #[arg(long)]
        bind: Option<String>,
    },

    /// Format a manuscript file into a print-ready PDF
    Format {
        /// Input manuscript (.docx or .txt)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Service configuration (JSON), for fonts and layout defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Typesetting options (JSON) used as the starting point
        #[arg(long)]
        options: Option<PathBuf>,

        #[arg(long)]
        heading_font: Option<String>,

        #[arg(long)]
        body_font: Option<String>,

        /// Heading size in points
        #[arg(long)]
        heading_size: Option<f32>,

        /// Body size in points
        #[arg(long)]
        body_size: Option<f32>,

        /// Trim size, e.g. "6x9" or "5.5 x 8.5 in"
        #[arg(long)]
        trim: Option<String>,

        /// Inside margin in inches, replaces the page-count based gutter
        #[arg(long)]
        gutter: Option<f32>,

        #[arg(long)]
        bleed: bool,

        /// Add a table of contents
        #[arg(long)]
        toc: bool,

        #[arg(long)]
        drop_caps: bool,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        subtitle: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        dedication: Option<String>,

        #[arg(long)]
        copyright: Option<String>,

        #[arg(long)]
        no_page_numbers: bool,

        /// Show statistics only, don't write the PDF
        #[arg(long)]
        stats_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, bind } => {
            let mut config = ServiceConfig::resolve(config.as_deref()).await?;
            if let Some(bind) = bind {
                config.server.bind = bind;
                config.validate()?;
            }
            let addr = config.server.bind.clone();
            let state = AppState::from_config(config).await?;
            api::start_server(&addr, state).await?;
        }

        Commands::Format {
            input,
            output,
            config,
            options,
            heading_font,
            body_font,
            heading_size,
            body_size,
            trim,
            gutter,
            bleed,
            toc,
            drop_caps,
            title,
            subtitle,
            author,
            dedication,
            copyright,
            no_page_numbers,
            stats_only,
        } => {
            let config = ServiceConfig::resolve(config.as_deref()).await?;

            let mut typeset_options = match options {
                Some(path) => TypesetOptions::load(path).await?,
                None => TypesetOptions {
                    strict_trim_size: config.layout.strict_trim_size,
                    drop_caps: config.layout.drop_caps,
                    page_numbers: config.layout.page_numbers,
                    ..Default::default()
                },
            };
            if let Some(font) = heading_font {
                typeset_options.heading_font = font;
            }
            if let Some(font) = body_font {
                typeset_options.body_font = font;
            }
            if let Some(size) = heading_size {
                typeset_options.heading_size = size;
            }
            if let Some(size) = body_size {
                typeset_options.body_size = size;
            }
            if let Some(trim) = trim {
                typeset_options.trim_size = trim;
            }
            if gutter.is_some() {
                typeset_options.gutter_override_in = gutter;
            }
            typeset_options.bleed |= bleed;
            typeset_options.generate_toc |= toc;
            typeset_options.drop_caps |= drop_caps;
            if no_page_numbers {
                typeset_options.page_numbers.enabled = false;
            }
            let front = &mut typeset_options.front_matter;
            front.title = title.or(front.title.take());
            front.subtitle = subtitle.or(front.subtitle.take());
            front.author = author.or(front.author.take());
            front.dedication = dedication.or(front.dedication.take());
            front.copyright = copyright.or(front.copyright.take());
            typeset_options.validate()?;

            let aliases = config.fonts.aliases.clone().into_iter().collect();
            let fonts = Arc::new(FontRegistry::load(config.fonts.dir.clone(), aliases).await?);

            let source = ManuscriptSource::load(&input).await?;
            let extract = ExtractOptions {
                drop_caps: typeset_options.drop_caps,
            };
            let manuscript = Manuscript::extract(source, extract).await?;

            let statistics = if stats_only {
                pdf_typeset::layout_book(&manuscript, &typeset_options, &fonts)?.statistics
            } else {
                let book = pdf_typeset::typeset(manuscript, typeset_options, fonts).await?;
                tokio::fs::write(&output, &book.pdf).await?;
                book.statistics
            };

            println!("Typesetting Statistics:");
            println!("  Words: {}", statistics.word_count);
            println!("  Estimated pages: {}", statistics.estimated_pages);
            println!("  Pages: {}", statistics.page_count);
            println!("  Unnumbered pages: {}", statistics.unnumbered_pages);
            println!("  Trim: {}", statistics.trim);
            println!("  Gutter: {:.3} in", statistics.gutter_in);
            if statistics.bleed {
                println!("  Bleed: yes");
            }
            for (requested, drawn) in &statistics.substituted_fonts {
                println!("  Font substituted: {} → {}", requested, drawn);
            }

            if !stats_only {
                println!("Formatted {} → {}", input.display(), output.display());
            }
        }
    }

    Ok(())
}
