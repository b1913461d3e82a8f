//! Arrangement subcommands: inspect and edit the manual display order
//! of a category.

use anyhow::Result;
use clap::Subcommand;

use crate::adapters::{ArrangementStore, ContentStore};
use crate::domain::{ContentId, ContentKind};
use crate::library::ContentHub;
use crate::view::ViewContext;

use super::KindArg;

/// Arrangement-related subcommands
#[derive(Subcommand, Debug)]
pub enum ArrangeCommands {
    /// Show the stored order for a category
    Show {
        /// Category to inspect
        category: String,

        /// Content kind the order applies to
        #[arg(short, long, value_enum, default_value = "doc")]
        kind: KindArg,
    },

    /// Replace the stored order with an explicit id sequence
    Set {
        /// Category to arrange
        category: String,

        /// Content kind the order applies to
        #[arg(short, long, value_enum, default_value = "doc")]
        kind: KindArg,

        /// Item ids in the desired display order
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Move one item within the display order
    Move {
        /// Category to arrange
        category: String,

        /// Content kind the order applies to
        #[arg(short, long, value_enum, default_value = "doc")]
        kind: KindArg,

        /// Current position of the item (0-based)
        #[arg(long)]
        from: usize,

        /// Position the item should land at (0-based)
        #[arg(long)]
        to: usize,
    },

    /// Drop ids that no longer match live content from the stored order
    Prune {
        /// Category to prune
        category: String,

        /// Content kind the order applies to
        #[arg(short, long, value_enum, default_value = "doc")]
        kind: KindArg,
    },
}

/// Execute arrangement subcommands
pub async fn execute<S: ContentStore + ArrangementStore>(
    command: ArrangeCommands,
    hub: &ContentHub<S>,
    view: &ViewContext,
) -> Result<()> {
    match command {
        ArrangeCommands::Show { category, kind } => execute_show(&category, kind.into(), hub).await,
        ArrangeCommands::Set {
            category,
            kind,
            ids,
        } => {
            view.require_admin("arrange set")?;
            execute_set(&category, kind.into(), ids, hub).await
        }
        ArrangeCommands::Move {
            category,
            kind,
            from,
            to,
        } => {
            view.require_admin("arrange move")?;
            execute_move(&category, kind.into(), from, to, hub).await
        }
        ArrangeCommands::Prune { category, kind } => {
            view.require_admin("arrange prune")?;
            execute_prune(&category, kind.into(), hub).await
        }
    }
}

async fn execute_show<S: ContentStore + ArrangementStore>(
    category: &str,
    kind: ContentKind,
    hub: &ContentHub<S>,
) -> Result<()> {
    let order = hub.stored_order(category, kind).await?;

    if order.is_empty() {
        println!(
            "No manual arrangement for {}/{}; natural order applies",
            category, kind
        );
        return Ok(());
    }

    for (position, id) in order.iter().enumerate() {
        println!("{:>3}  {}", position, id);
    }
    Ok(())
}

async fn execute_set<S: ContentStore + ArrangementStore>(
    category: &str,
    kind: ContentKind,
    ids: Vec<String>,
    hub: &ContentHub<S>,
) -> Result<()> {
    let order: Vec<ContentId> = ids.into_iter().map(ContentId::from).collect();
    let count = order.len();

    hub.set_order(category, kind, order).await?;
    println!("Saved order of {} items for {}/{}", count, category, kind);
    Ok(())
}

async fn execute_move<S: ContentStore + ArrangementStore>(
    category: &str,
    kind: ContentKind,
    from: usize,
    to: usize,
    hub: &ContentHub<S>,
) -> Result<()> {
    match kind {
        ContentKind::Document => {
            let documents = hub.move_document(category, from, to).await?;
            for (position, document) in documents.iter().enumerate() {
                println!("{:>3}  {}", position, document.title);
            }
        }
        ContentKind::Tutorial => {
            let tutorials = hub.move_tutorial(category, from, to).await?;
            for (position, tutorial) in tutorials.iter().enumerate() {
                println!("{:>3}  {}", position, tutorial.title);
            }
        }
    }
    Ok(())
}

async fn execute_prune<S: ContentStore + ArrangementStore>(
    category: &str,
    kind: ContentKind,
    hub: &ContentHub<S>,
) -> Result<()> {
    let dropped = hub.prune_arrangement(category, kind).await?;

    if dropped == 0 {
        println!("Nothing to prune for {}/{}", category, kind);
    } else {
        println!("Dropped {} stale id(s) from {}/{}", dropped, category, kind);
    }
    Ok(())
}
