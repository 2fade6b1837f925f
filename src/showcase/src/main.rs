//! Showcase: command-line front end for the site's reviews, gallery and
//! admin session, backed by a directory of JSON files.

use anyhow::Context;
use bytes::Bytes;
use clap::{Parser, Subcommand};
use serde::Serialize;
use showcase_core::{AppConfig, ImageId, ReviewDraft};
use showcase_gallery::{ConfirmationPrompt, UploadFile};
use showcase_site::SiteState;
use showcase_storage::JsonFileStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "showcase")]
#[command(about = "Reviews, gallery and admin tools for the showcase site")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(long, env = "SHOWCASE_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory (overrides config)
    #[arg(long, env = "SHOWCASE__STORAGE__DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Print machine-readable JSON and log as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summary of reviews, gallery and session
    Status,

    /// Customer reviews
    Reviews {
        #[command(subcommand)]
        action: ReviewsAction,
    },

    /// Start an admin session
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// End the admin session
    Logout,

    /// Gallery images
    Gallery {
        #[command(subcommand)]
        action: GalleryAction,
    },
}

#[derive(Subcommand, Debug)]
enum ReviewsAction {
    /// Show the newest reviews
    List {
        /// Show every review instead of the preview
        #[arg(long, default_value_t = false)]
        all: bool,
    },

    /// Add a review
    Submit {
        #[arg(long)]
        name: String,

        #[arg(long)]
        location: Option<String>,

        /// Star rating, 1 to 5
        #[arg(long)]
        rating: i64,

        #[arg(long)]
        message: String,
    },
}

#[derive(Subcommand, Debug)]
enum GalleryAction {
    /// List images, newest first
    List,

    /// Stage image files and save them to the gallery
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Delete one image
    Delete {
        id: ImageId,

        /// Confirm without prompting
        #[arg(short, long, default_value_t = false)]
        yes: bool,
    },

    /// Select several images and delete them together
    DeleteMany {
        #[arg(required = true)]
        ids: Vec<ImageId>,

        /// Confirm without prompting
        #[arg(short, long, default_value_t = false)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let mut config = AppConfig::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = dir;
    }

    info!(
        data_dir = %config.storage.data_dir.display(),
        quota_bytes = ?config.storage.quota_bytes,
        "Configuration loaded"
    );

    let store = JsonFileStore::open(&config.storage.data_dir, config.storage.quota_bytes)
        .with_context(|| {
            format!(
                "opening data directory {}",
                config.storage.data_dir.display()
            )
        })?;
    let mut site = SiteState::new(config, Arc::new(store));
    let out = Output { json: cli.json };

    match cli.command {
        Commands::Status => cmd_status(&site, out),
        Commands::Reviews { action } => match action {
            ReviewsAction::List { all } => cmd_reviews_list(&site, all, out),
            ReviewsAction::Submit {
                name,
                location,
                rating,
                message,
            } => {
                let draft = ReviewDraft {
                    name,
                    location,
                    rating,
                    message,
                };
                cmd_reviews_submit(&mut site, draft, out)
            }
        },
        Commands::Login { username, password } => {
            site.login(&username, &password)?;
            out.line(&format!(
                "Logged in as {}",
                site.session().current_admin().unwrap_or(&username)
            ));
            Ok(())
        }
        Commands::Logout => {
            site.logout();
            out.line("Logged out");
            Ok(())
        }
        Commands::Gallery { action } => match action {
            GalleryAction::List => cmd_gallery_list(&site, out),
            GalleryAction::Upload { files } => cmd_gallery_upload(&mut site, &files, out).await,
            GalleryAction::Delete { id, yes } => cmd_gallery_delete(&mut site, Some(id), yes, out),
            GalleryAction::DeleteMany { ids, yes } => {
                for id in ids {
                    if !site.toggle_selection(id, true)? {
                        warn!(id, "Not in gallery, skipping");
                    }
                }
                cmd_gallery_delete(&mut site, None, yes, out)
            }
        },
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "showcase=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

// ─── Output ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    fn value<T: Serialize>(self, value: &T, text: impl FnOnce()) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text();
        }
        Ok(())
    }

    fn line(self, message: &str) {
        if self.json {
            println!("{}", serde_json::json!({ "message": message }));
        } else {
            println!("{message}");
        }
    }
}

// ─── Commands ─────────────────────────────────────────────────────────────

fn cmd_status(site: &SiteState, out: Output) -> anyhow::Result<()> {
    let reviews = site.reviews_view(false);
    let status = serde_json::json!({
        "reviews": site.reviews().len(),
        "average_rating": reviews.average,
        "images": site.catalog().len(),
        "gallery_capacity": site.catalog().capacity(),
        "admin": site.session().current_admin(),
    });
    out.value(&status, || {
        println!("Reviews:  {} (average {})", site.reviews().len(), reviews.average);
        println!(
            "Gallery:  {} / {} images",
            site.catalog().len(),
            site.catalog().capacity()
        );
        match site.session().current_admin() {
            Some(name) => println!("Admin:    {name}"),
            None => println!("Admin:    not logged in"),
        }
    })
}

fn cmd_reviews_list(site: &SiteState, all: bool, out: Output) -> anyhow::Result<()> {
    let view = site.reviews_view(all);
    out.value(&view, || {
        println!("Average rating: {}", view.average);
        if let Some(empty) = &view.empty_message {
            println!("{empty}");
        }
        for card in &view.cards {
            println!();
            match &card.location {
                Some(loc) => println!("{}  {} ({loc})", card.stars, card.name),
                None => println!("{}  {}", card.stars, card.name),
            }
            println!("  {}", card.message);
            println!("  {}", card.date);
        }
        if let Some(more) = view.show_more_label() {
            println!();
            println!("{more}");
        }
    })
}

fn cmd_reviews_submit(site: &mut SiteState, draft: ReviewDraft, out: Output) -> anyhow::Result<()> {
    let review = site.submit_review(draft)?;
    let average = site.reviews().format_average(site.config().reviews.rating_decimals);
    out.value(&review, || {
        println!("Thanks, {}! Your review was added.", review.name);
        println!("Average rating is now {average}");
    })
}

fn cmd_gallery_list(site: &SiteState, out: Output) -> anyhow::Result<()> {
    let view = site.gallery_view();
    out.value(&view, || {
        if let Some(empty) = &view.empty_message {
            println!("{empty}");
        }
        for (tile, image) in view.tiles.iter().zip(site.catalog().images()) {
            println!(
                "{}  {}  {} bytes",
                tile.id,
                image.timestamp.format("%Y-%m-%d %H:%M:%S"),
                tile.src.len()
            );
        }
    })
}

async fn cmd_gallery_upload(
    site: &mut SiteState,
    files: &[PathBuf],
    out: Output,
) -> anyhow::Result<()> {
    let mut uploads = Vec::with_capacity(files.len());
    for path in files {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        uploads.push(UploadFile::new(name, content_type(path), Bytes::from(data)));
    }

    let staged = site.stage_uploads(uploads).await?;
    if staged < files.len() {
        warn!(skipped = files.len() - staged, "Some files were not images");
    }
    let committed = site.commit_uploads()?;
    let message = site
        .notices()
        .last()
        .filter(|_| committed > 0)
        .map(|n| n.message.clone())
        .unwrap_or_else(|| "No images to add".to_string());
    out.line(&message);
    Ok(())
}

fn cmd_gallery_delete(
    site: &mut SiteState,
    target: Option<ImageId>,
    yes: bool,
    out: Output,
) -> anyhow::Result<()> {
    let Some(prompt) = site.request_delete(target)? else {
        out.line("Nothing selected");
        return Ok(());
    };

    if !yes {
        print_prompt(&prompt, out);
        site.cancel_delete();
        out.line("Cancelled. Re-run with --yes to delete.");
        return Ok(());
    }

    let outcome = site.confirm_delete()?;
    if outcome.removed() == 0 {
        out.line("Image not found");
        return Ok(());
    }
    let message = site
        .notices()
        .last()
        .map(|n| n.message.clone())
        .unwrap_or_default();
    out.line(&message);
    Ok(())
}

fn print_prompt(prompt: &ConfirmationPrompt, out: Output) {
    if out.json {
        println!(
            "{}",
            serde_json::json!({ "title": prompt.title, "message": prompt.message })
        );
    } else {
        println!("{}", prompt.title);
        println!("{}", prompt.message);
    }
}

/// Media type from the file extension; anything unknown is not an image.
fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}
