//! Medq CLI - Command-line interface for the Medq Queue Engine
//!
//! Front-desk convenience tool; talks to the daemon through the SDK.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use colored::Colorize;
use medq_sdk::{
    CreateRequest, MedqClient, QueueEntryView, TransferRequest, TransferView, UpdateStatusRequest,
};
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9533";

#[derive(Parser)]
#[command(name = "medq")]
#[command(about = "Medq Queue Engine CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "MEDQ_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a patient and print the assigned queue number
    Create {
        /// Patient ID
        #[arg(short, long)]
        patient: i64,

        /// Reason for visit
        #[arg(short, long)]
        reason: String,

        /// Department ID
        #[arg(long)]
        department: Option<i64>,

        /// Doctor ID
        #[arg(long)]
        doctor: Option<i64>,

        /// Priority: regular, senior, pwd, emergency
        #[arg(long)]
        priority: Option<String>,

        /// Queue date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Move an entry through the status state machine
    Status {
        /// Queue entry ID
        queue_id: String,

        /// Target status: attending, attended, no_show
        #[arg(short, long)]
        to: String,

        /// Medical record ID (when marking attended)
        #[arg(long)]
        medical_record: Option<i64>,
    },

    /// Transfer an entry to another doctor and/or department
    Transfer {
        /// Queue entry ID
        queue_id: String,

        /// Target doctor ID
        #[arg(long)]
        doctor: Option<i64>,

        /// Target department ID
        #[arg(long)]
        department: Option<i64>,

        /// Transfer reason
        #[arg(long)]
        reason: Option<String>,

        /// Staff user performing the transfer
        #[arg(long)]
        by: i64,
    },

    /// Show the transfer history of an entry
    Transfers {
        /// Queue entry ID
        queue_id: String,
    },

    /// Show the day's queue in serving order
    Snapshot {
        /// Queue date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Administratively delete an entry
    Delete {
        /// Queue entry ID
        queue_id: String,
    },
}

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "No.")]
    number: i64,
    #[tabled(rename = "Patient")]
    patient: i64,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Wait (min)")]
    wait: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&QueueEntryView> for EntryRow {
    fn from(entry: &QueueEntryView) -> Self {
        Self {
            number: entry.queue_number,
            patient: entry.patient_id,
            priority: entry.priority.clone(),
            status: entry.status.clone(),
            wait: entry
                .estimated_wait_minutes
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string()),
            id: entry.id.clone(),
        }
    }
}

#[derive(Tabled)]
struct TransferRow {
    #[tabled(rename = "From Dr.")]
    from_doctor: String,
    #[tabled(rename = "To Dr.")]
    to_doctor: String,
    #[tabled(rename = "From Dept.")]
    from_department: String,
    #[tabled(rename = "To Dept.")]
    to_department: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "By")]
    by: i64,
}

fn opt(id: Option<i64>) -> String {
    id.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

impl From<&TransferView> for TransferRow {
    fn from(t: &TransferView) -> Self {
        Self {
            from_doctor: opt(t.from_doctor_id),
            to_doctor: opt(t.to_doctor_id),
            from_department: opt(t.from_department_id),
            to_department: opt(t.to_department_id),
            reason: t.reason.clone().unwrap_or_else(|| "-".to_string()),
            by: t.transferred_by,
        }
    }
}

fn print_entry(entry: &QueueEntryView) {
    let table = Table::new(vec![EntryRow::from(entry)]).to_string();
    println!("{}", table);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let client = MedqClient::connect(&cli.rpc_url)
        .await
        .context("Failed to connect to daemon")?;

    match cli.command {
        Commands::Create {
            patient,
            reason,
            department,
            doctor,
            priority,
            date,
        } => {
            let entry = client
                .create(CreateRequest {
                    patient_id: patient,
                    reason_for_visit: reason,
                    department_id: department,
                    doctor_id: doctor,
                    priority,
                    queue_date: date,
                })
                .await?;

            println!(
                "{}",
                format!("✓ Registered as number {}", entry.queue_number)
                    .green()
                    .bold()
            );
            println!();
            print_entry(&entry);
        }

        Commands::Status {
            queue_id,
            to,
            medical_record,
        } => {
            let entry = client
                .update_status(UpdateStatusRequest {
                    queue_id,
                    status: to,
                    medical_record_id: medical_record,
                })
                .await?;

            println!(
                "{}",
                format!("✓ Entry {} is now {}", entry.id, entry.status)
                    .green()
                    .bold()
            );
            println!();
            print_entry(&entry);
        }

        Commands::Transfer {
            queue_id,
            doctor,
            department,
            reason,
            by,
        } => {
            let transfer = client
                .transfer(TransferRequest {
                    queue_id,
                    to_doctor_id: doctor,
                    to_department_id: department,
                    reason,
                    transferred_by: by,
                })
                .await?;

            println!(
                "{}",
                format!("✓ Entry {} transferred", transfer.queue_id)
                    .green()
                    .bold()
            );
            println!();
            let table = Table::new(vec![TransferRow::from(&transfer)]).to_string();
            println!("{}", table);
        }

        Commands::Transfers { queue_id } => {
            let history = client.transfers(queue_id).await?;

            if history.transfers.is_empty() {
                println!("{}", "No transfers recorded".yellow());
            } else {
                println!(
                    "{}",
                    format!("Transfer history for {}:", history.queue_id)
                        .cyan()
                        .bold()
                );
                println!();
                let rows: Vec<TransferRow> =
                    history.transfers.iter().map(TransferRow::from).collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::Snapshot { date } => {
            let snapshot = client.snapshot(date).await?;

            println!(
                "{}",
                format!("Queue for {}", snapshot.date).cyan().bold()
            );
            println!(
                "  waiting: {}  attending: {}  attended: {}  no_show: {}",
                snapshot.counts.waiting.to_string().yellow(),
                snapshot.counts.attending.to_string().cyan(),
                snapshot.counts.attended.to_string().green(),
                snapshot.counts.no_show.to_string().red(),
            );
            println!();

            if snapshot.entries.is_empty() {
                println!("{}", "Queue is empty".yellow());
            } else {
                let rows: Vec<EntryRow> = snapshot.entries.iter().map(EntryRow::from).collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::Delete { queue_id } => {
            let response = client.delete(queue_id).await?;

            println!(
                "{}",
                format!("✓ Entry {} deleted", response.queue_id).green().bold()
            );
        }
    }

    Ok(())
}
