use clap::{Parser, Subcommand};
use frr_core::{
    resolve_data_dir, ActivityLog, CoreConfig, NotesService, ReportingService, SubmitOutcome,
};
use frr_report::FieldValue;
use frr_share::{share_link, share_text};
use frr_store::{DocumentId, FsDocumentStore};
use frr_types::{CategorySlug, NonEmptyText};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "frr")]
#[command(about = "FRR field-report repository CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered incident categories
    Categories,
    /// List all persisted reports
    List,
    /// Submit a report from a JSON draft file
    Submit {
        /// Incident category slug
        category: String,
        /// Path to a JSON file holding the draft mapping
        draft_file: String,
        /// Opaque reporter id (optional)
        #[arg(long)]
        reporter: Option<String>,
        /// Optional sections to hide (repeatable)
        #[arg(long = "hide")]
        hidden: Vec<String>,
        /// Persist immediately even for staged categories
        #[arg(long)]
        confirm: bool,
    },
    /// Render the share message for a persisted report
    Share {
        /// Report document id
        report_id: String,
    },
    /// Create a personal note
    Note {
        /// Opaque author id
        author: String,
        /// Note body
        body: String,
    },
    /// List notes, optionally for one author
    Notes {
        #[arg(long)]
        author: Option<String>,
    },
    /// Show the activity log
    Activity,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let data_dir = resolve_data_dir(std::env::var("FRR_DATA_DIR").ok());
    let operator = std::env::var("FRR_OPERATOR").unwrap_or_else(|_| "frr.cli".into());
    let cfg = Arc::new(CoreConfig::new(data_dir, NonEmptyText::new(operator)?)?);
    let store = Arc::new(FsDocumentStore::new(cfg.data_dir()));
    let reporting = ReportingService::new(Arc::clone(&cfg), Arc::clone(&store));

    match cli.command {
        Some(Commands::Categories) => {
            for profile in reporting.registry().profiles() {
                println!("{}", profile.category());
            }
        }
        Some(Commands::List) => {
            let stored = reporting.list_reports()?;
            if stored.is_empty() {
                println!("No reports found.");
            } else {
                for entry in stored {
                    println!(
                        "ID: {}, Category: {}, Created: {}, Reporter: {}",
                        entry.id,
                        entry.report.category,
                        entry.report.created_at.to_rfc3339(),
                        entry.report.reported_by.as_deref().unwrap_or("-")
                    );
                }
            }
        }
        Some(Commands::Submit {
            category,
            draft_file,
            reporter,
            hidden,
            confirm,
        }) => {
            let category = CategorySlug::new(&category)?;
            let contents = std::fs::read_to_string(&draft_file)?;
            let json: serde_json::Value = serde_json::from_str(&contents)?;
            let draft = FieldValue::from(json);
            let hidden: BTreeSet<String> = hidden.into_iter().collect();

            match reporting.submit(&category, draft, &hidden, reporter) {
                Ok(SubmitOutcome::Persisted(id)) => {
                    println!("Report persisted with ID: {}", id);
                }
                Ok(SubmitOutcome::Staged(report)) => {
                    println!("{}", share_text(&report));
                    if confirm {
                        let id = reporting.persist(report)?;
                        println!("\nReport persisted with ID: {}", id);
                    } else {
                        println!("\nStaged only. Re-run with --confirm to persist.");
                    }
                }
                Err(e) => eprintln!("Error submitting report: {}", e),
            }
        }
        Some(Commands::Share { report_id }) => {
            let id = DocumentId::parse(&report_id)?;
            match reporting.get_report(&id)? {
                Some(report) => {
                    let text = share_text(&report);
                    println!("{}", text);
                    println!("\n{}", share_link(&text));
                }
                None => eprintln!("No report found with ID: {}", report_id),
            }
        }
        Some(Commands::Note { author, body }) => {
            let notes = NotesService::new(Arc::clone(&store));
            match notes.create_note(&author, NonEmptyText::new(&body)?) {
                Ok(id) => println!("Note created with ID: {}", id),
                Err(e) => eprintln!("Error creating note: {}", e),
            }
        }
        Some(Commands::Notes { author }) => {
            let notes = NotesService::new(Arc::clone(&store));
            let listed = notes.list_notes(author.as_deref())?;
            if listed.is_empty() {
                println!("No notes found.");
            } else {
                for (id, note) in listed {
                    println!(
                        "ID: {}, Author: {}, Created: {}\n  {}",
                        id,
                        note.author,
                        note.created_at.to_rfc3339(),
                        note.body
                    );
                }
            }
        }
        Some(Commands::Activity) => {
            let log = ActivityLog::new(Arc::clone(&store));
            let entries = log.list()?;
            if entries.is_empty() {
                println!("No activity recorded.");
            } else {
                for entry in entries {
                    println!(
                        "{} {} {} ({})",
                        entry.recorded_at.to_rfc3339(),
                        entry.actor,
                        entry.action.as_str(),
                        entry.detail
                    );
                }
            }
        }
        None => {
            println!("No command given. Try `frr --help`.");
        }
    }

    Ok(())
}
