//! Command-line interface for shutterdesk.
//!
//! Provides commands for managing documents, tutorials, the featured
//! list, and the manual display order of each category.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::adapters::{
    ArrangementStore, ContentStore, DocumentPatch, LocalBackend, RestBackend, TutorialPatch,
};
use crate::config::{self, BackendConfig, ResolvedConfig};
use crate::domain::{ContentId, ContentKind, Document, DocumentSource, Tutorial};
use crate::library::{metadata, ContentHub};
use crate::view::{DeviceKind, DevicePreview, Orientation, ViewContext};

pub mod arrange;

use arrange::ArrangeCommands;

/// shutterdesk - content hub for photography and videography businesses
#[derive(Parser, Debug)]
#[command(name = "shutterdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Render as a site visitor (read-only)
    #[arg(long, global = true)]
    pub visitor: bool,

    /// Simulate a device for listing output
    #[arg(long, global = true, value_enum)]
    pub preview: Option<PreviewDevice>,

    /// Landscape orientation for the simulated device
    #[arg(long, global = true)]
    pub landscape: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage document templates
    Doc {
        #[command(subcommand)]
        command: DocCommands,
    },

    /// Manage tutorials
    Tutorial {
        #[command(subcommand)]
        command: TutorialCommands,
    },

    /// Manage the manual display order of a category
    Arrange {
        #[command(subcommand)]
        command: ArrangeCommands,
    },

    /// Manage the featured list
    Featured {
        #[command(subcommand)]
        command: FeaturedCommands,
    },

    /// Show resolved configuration (debug)
    Config,
}

#[derive(Subcommand, Debug)]
pub enum DocCommands {
    /// Add a document
    Add {
        /// Category the document belongs to
        #[arg(short, long)]
        category: String,

        /// External link to the document
        #[arg(long)]
        link: Option<String>,

        /// URL of an already-uploaded file
        #[arg(long)]
        file_url: Option<String>,

        /// Title (derived from the URL if not specified)
        #[arg(short, long)]
        title: Option<String>,

        /// Short description
        #[arg(short, long)]
        description: Option<String>,

        /// Finer-grained grouping within the category
        #[arg(long)]
        subcategory: Option<String>,

        /// Preview image URL
        #[arg(long)]
        thumbnail: Option<String>,
    },

    /// List documents in a category, in display order
    List {
        /// Category to list
        category: String,
    },

    /// Update fields of a document
    Update {
        /// Document id
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(long)]
        subcategory: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        thumbnail: Option<String>,
    },

    /// Remove a document
    Rm {
        /// Document id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TutorialCommands {
    /// Add a tutorial from a YouTube URL
    Add {
        /// YouTube URL of the video
        url: String,

        /// Category the tutorial belongs to
        #[arg(short, long)]
        category: String,

        /// Title (fetched from YouTube if not specified)
        #[arg(short, long)]
        title: Option<String>,

        /// Short description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List tutorials in a category, in display order
    List {
        /// Category to list
        category: String,
    },

    /// Update fields of a tutorial
    Update {
        /// Tutorial id
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(long)]
        duration: Option<String>,

        #[arg(long)]
        views: Option<u64>,
    },

    /// Remove a tutorial
    Rm {
        /// Tutorial id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum FeaturedCommands {
    /// Feature a document or tutorial on the home page
    Add {
        /// Kind of the content to feature
        #[arg(value_enum)]
        kind: KindArg,

        /// Id of the content to feature
        id: String,
    },

    /// List featured content
    List,

    /// Remove content from the featured list
    Rm {
        /// Id of the featured content
        id: String,
    },
}

/// Content kind for CLI (maps to ContentKind)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    /// Document (template, contract, business form)
    Doc,

    /// Video tutorial
    Tutorial,
}

impl From<KindArg> for ContentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Doc => ContentKind::Document,
            KindArg::Tutorial => ContentKind::Tutorial,
        }
    }
}

/// Device class for CLI (maps to DeviceKind)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PreviewDevice {
    Phone,
    Tablet,
}

impl From<PreviewDevice> for DeviceKind {
    fn from(device: PreviewDevice) -> Self {
        match device {
            PreviewDevice::Phone => DeviceKind::Phone,
            PreviewDevice::Tablet => DeviceKind::Tablet,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let config = config::load()?;
        let view = self.view_context();

        match config.backend {
            BackendConfig::Local => {
                let hub = ContentHub::new(LocalBackend::open(&config.home));
                execute_command(self.command, &hub, &view, &config).await
            }
            BackendConfig::Rest {
                ref url,
                ref api_key,
            } => {
                let hub = ContentHub::new(RestBackend::new(url.clone(), api_key)?);
                execute_command(self.command, &hub, &view, &config).await
            }
        }
    }

    /// Build the session view context from the global flags
    fn view_context(&self) -> ViewContext {
        let mut view = if self.visitor {
            ViewContext::visitor()
        } else {
            ViewContext::admin()
        };

        if let Some(device) = self.preview {
            let orientation = if self.landscape {
                Orientation::Landscape
            } else {
                Orientation::Portrait
            };
            view.set_preview(DevicePreview::new(device.into(), orientation));
        }

        view
    }
}

async fn execute_command<S: ContentStore + ArrangementStore>(
    command: Commands,
    hub: &ContentHub<S>,
    view: &ViewContext,
    config: &ResolvedConfig,
) -> Result<()> {
    match command {
        Commands::Doc { command } => execute_doc(command, hub, view).await,
        Commands::Tutorial { command } => execute_tutorial(command, hub, view).await,
        Commands::Arrange { command } => arrange::execute(command, hub, view).await,
        Commands::Featured { command } => execute_featured(command, hub, view).await,
        Commands::Config => show_config(config),
    }
}

async fn execute_doc<S: ContentStore + ArrangementStore>(
    command: DocCommands,
    hub: &ContentHub<S>,
    view: &ViewContext,
) -> Result<()> {
    match command {
        DocCommands::Add {
            category,
            link,
            file_url,
            title,
            description,
            subcategory,
            thumbnail,
        } => {
            view.require_admin("doc add")?;

            let (source, url) = match (link, file_url) {
                (Some(url), None) => (DocumentSource::Link, url),
                (None, Some(url)) => (DocumentSource::File, url),
                _ => anyhow::bail!("Provide exactly one of --link or --file-url"),
            };

            let title = title.unwrap_or_else(|| metadata::link_title(&url));

            let mut document = Document::new(title, category, source, url);
            if let Some(description) = description {
                document = document.with_description(description);
            }
            if let Some(subcategory) = subcategory {
                document = document.with_subcategory(subcategory);
            }
            if let Some(thumbnail) = thumbnail {
                document = document.with_thumbnail(thumbnail);
            }

            let document = hub.add_document(document).await?;
            println!("Added document '{}' ({})", document.title, document.id);
            Ok(())
        }

        DocCommands::List { category } => {
            let documents = hub.arranged_documents(&category).await?;

            if documents.is_empty() {
                println!("No documents in '{}'", category);
                return Ok(());
            }

            if view.compact_output() {
                for document in &documents {
                    println!("{}  {}", document.id, document.title);
                }
                return Ok(());
            }

            println!(
                "{:<18} {:<32} {:<16} {:<8}",
                "ID", "TITLE", "SUBCATEGORY", "SOURCE"
            );
            println!("{}", "-".repeat(76));
            for document in &documents {
                let source = match document.source {
                    DocumentSource::File => "file",
                    DocumentSource::Link => "link",
                };
                println!(
                    "{:<18} {:<32} {:<16} {:<8}",
                    truncate(document.id.as_str(), 16),
                    truncate(&document.title, 30),
                    truncate(&document.subcategory, 14),
                    source
                );
            }
            Ok(())
        }

        DocCommands::Update {
            id,
            title,
            description,
            category,
            subcategory,
            url,
            thumbnail,
        } => {
            view.require_admin("doc update")?;

            let patch = DocumentPatch {
                title,
                description,
                category,
                subcategory,
                url,
                thumbnail_url: thumbnail,
            };
            let document = hub.update_document(&ContentId::from(id), patch).await?;
            println!("Updated document '{}' ({})", document.title, document.id);
            Ok(())
        }

        DocCommands::Rm { id } => {
            view.require_admin("doc rm")?;

            hub.remove_document(&ContentId::from(id.as_str())).await?;
            println!("Removed document {}", id);
            Ok(())
        }
    }
}

async fn execute_tutorial<S: ContentStore + ArrangementStore>(
    command: TutorialCommands,
    hub: &ContentHub<S>,
    view: &ViewContext,
) -> Result<()> {
    match command {
        TutorialCommands::Add {
            url,
            category,
            title,
            description,
        } => {
            view.require_admin("tutorial add")?;

            let mut tutorial = match title {
                Some(title) => Tutorial::new(title, category, url.as_str()),
                None => {
                    let meta = metadata::fetch_youtube_metadata(&url).await.context(
                        "Failed to fetch video metadata; pass --title to skip the lookup",
                    )?;
                    Tutorial::new(meta.title, category, url.as_str())
                        .with_thumbnail(meta.thumbnail_url)
                        .with_duration(meta.duration)
                }
            };
            if let Some(description) = description {
                tutorial = tutorial.with_description(description);
            }

            let tutorial = hub.add_tutorial(tutorial).await?;
            println!("Added tutorial '{}' ({})", tutorial.title, tutorial.id);
            Ok(())
        }

        TutorialCommands::List { category } => {
            let tutorials = hub.arranged_tutorials(&category).await?;

            if tutorials.is_empty() {
                println!("No tutorials in '{}'", category);
                return Ok(());
            }

            if view.compact_output() {
                for tutorial in &tutorials {
                    println!("{}  {}", tutorial.id, tutorial.title);
                }
                return Ok(());
            }

            println!(
                "{:<18} {:<32} {:<8} {:<8}",
                "ID", "TITLE", "LENGTH", "VIEWS"
            );
            println!("{}", "-".repeat(68));
            for tutorial in &tutorials {
                println!(
                    "{:<18} {:<32} {:<8} {:<8}",
                    truncate(tutorial.id.as_str(), 16),
                    truncate(&tutorial.title, 30),
                    tutorial.duration,
                    tutorial.views
                );
            }
            Ok(())
        }

        TutorialCommands::Update {
            id,
            title,
            description,
            category,
            duration,
            views,
        } => {
            view.require_admin("tutorial update")?;

            let patch = TutorialPatch {
                title,
                description,
                category,
                thumbnail_url: None,
                duration,
                views,
            };
            let tutorial = hub.update_tutorial(&ContentId::from(id), patch).await?;
            println!("Updated tutorial '{}' ({})", tutorial.title, tutorial.id);
            Ok(())
        }

        TutorialCommands::Rm { id } => {
            view.require_admin("tutorial rm")?;

            hub.remove_tutorial(&ContentId::from(id.as_str())).await?;
            println!("Removed tutorial {}", id);
            Ok(())
        }
    }
}

async fn execute_featured<S: ContentStore + ArrangementStore>(
    command: FeaturedCommands,
    hub: &ContentHub<S>,
    view: &ViewContext,
) -> Result<()> {
    match command {
        FeaturedCommands::Add { kind, id } => {
            view.require_admin("featured add")?;

            let item = hub.feature(kind.into(), &ContentId::from(id)).await?;
            println!("Featured '{}' ({})", item.title, item.id);
            Ok(())
        }

        FeaturedCommands::List => {
            let featured = hub.featured().await?;

            if featured.is_empty() {
                println!("Nothing is featured");
                return Ok(());
            }

            println!("{:<18} {:<32} {:<10} {:<16}", "ID", "TITLE", "KIND", "CATEGORY");
            println!("{}", "-".repeat(78));
            for item in &featured {
                println!(
                    "{:<18} {:<32} {:<10} {:<16}",
                    truncate(item.id.as_str(), 16),
                    truncate(&item.title, 30),
                    item.kind,
                    truncate(&item.category, 14)
                );
            }
            Ok(())
        }

        FeaturedCommands::Rm { id } => {
            view.require_admin("featured rm")?;

            hub.unfeature(&ContentId::from(id.as_str())).await?;
            println!("Unfeatured {}", id);
            Ok(())
        }
    }
}

fn show_config(config: &ResolvedConfig) -> Result<()> {
    println!("Home: {}", config.home.display());
    match &config.backend {
        BackendConfig::Local => {
            println!("Backend: local ({})", config.home.join("hub.json").display());
        }
        BackendConfig::Rest { url, .. } => {
            println!("Backend: rest ({})", url);
        }
    }
    match &config.config_file {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: (none)"),
    }
    Ok(())
}

/// Clip a string for fixed-width table output
fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let clipped: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", clipped)
    }
}
