use clap::{Args, Subcommand, ValueEnum};
use std::io::{self, Write};

use prayertrack::client::{
    render_list, ConfirmDialog, HttpApi, MutationController, PrayerForm, StatusFilter,
};
use prayertrack::models::Category;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Args)]
pub struct PrayerCommand {
    #[command(subcommand)]
    pub command: PrayerSubcommand,
}

#[derive(Subcommand)]
pub enum PrayerSubcommand {
    /// List prayer requests, grouped by category
    List {
        /// Only show one category (unbelievers or brethren)
        #[arg(long, short)]
        category: Option<Category>,

        /// Filter by status
        #[arg(long, value_enum, default_value = "all")]
        filter: StatusFilter,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a prayer request
    Add {
        /// Who or what to pray for
        name: String,

        /// Category (unbelievers or brethren)
        #[arg(long, short)]
        category: Category,

        /// Prayer details
        #[arg(long, short)]
        description: Option<String>,
    },

    /// Mark a prayer answered, or unanswered again
    Toggle {
        /// Prayer ID
        id: i64,
    },

    /// Delete a prayer request
    Delete {
        /// Prayer ID
        id: i64,

        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

impl PrayerCommand {
    pub async fn run(
        &self,
        controller: &MutationController<HttpApi>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            PrayerSubcommand::List {
                category,
                filter,
                format,
            } => {
                let entries = controller.entries().await?;

                match format {
                    OutputFormat::Json => {
                        let shown: Vec<_> = entries
                            .iter()
                            .filter(|e| category.map_or(true, |c| e.category == c))
                            .filter(|e| filter.matches(e))
                            .collect();
                        println!("{}", serde_json::to_string_pretty(&shown)?);
                    }
                    OutputFormat::Text => {
                        print!("{}", render_list(&entries, *category, *filter));
                    }
                }
                Ok(())
            }

            PrayerSubcommand::Add {
                name,
                category,
                description,
            } => {
                // Load the list first so the optimistic entry lands on real state
                controller.entries().await?;

                let mut form = PrayerForm::new(*category);
                form.open();
                form.name = name.clone();
                form.description = description.clone().unwrap_or_default();

                let created = controller.create(&mut form).await?;
                println!("Added prayer #{}: {}", created.id, created.name);

                print_reconciled(controller, *category).await
            }

            PrayerSubcommand::Toggle { id } => {
                controller.entries().await?;

                let updated = controller.toggle(*id).await?;
                let status = if updated.is_resolved {
                    "answered"
                } else {
                    "unanswered"
                };
                println!("Marked prayer #{} {}", updated.id, status);

                print_reconciled(controller, updated.category).await
            }

            PrayerSubcommand::Delete { id, force } => {
                let entries = controller.entries().await?;
                let entry = entries
                    .iter()
                    .find(|e| e.id == *id)
                    .ok_or_else(|| format!("Prayer #{} not found", id))?;

                let mut dialog = ConfirmDialog::default();
                dialog.open(*id);

                // Confirm deletion unless --force is used
                if !force {
                    print!(
                        "Delete prayer #{} '{}'? This cannot be undone. [y/N] ",
                        entry.id, entry.name
                    );
                    io::stdout().flush()?;

                    let mut input = String::new();
                    io::stdin().read_line(&mut input)?;
                    if !input.trim().eq_ignore_ascii_case("y") {
                        dialog.close();
                        println!("Cancelled");
                        return Ok(());
                    }
                }

                let category = entry.category;
                controller.delete(&mut dialog).await?;
                println!("Deleted prayer #{}", id);

                print_reconciled(controller, category).await
            }
        }
    }
}

/// Re-reads the list after a write and prints the affected section.
async fn print_reconciled(
    controller: &MutationController<HttpApi>,
    category: Category,
) -> Result<(), Box<dyn std::error::Error>> {
    let entries = controller.entries().await?;
    println!();
    print!("{}", render_list(&entries, Some(category), StatusFilter::All));
    Ok(())
}
