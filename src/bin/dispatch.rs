//! flashfix-dispatch
//!
//! Signs in against a FlashFix server and runs one dashboard action.

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use flashfix::{
    dashboard::{ApiClient, Dashboard, DashboardState},
    dtos::dispatchdtos::CreateJobDto,
    models::jobmodel::JobStatus,
};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "flashfix-dispatch")]
#[command(about = "Dispatch jobs to contractors from the terminal", long_about = None)]
struct Args {
    /// Server root, without the /api prefix
    #[arg(long, value_name = "URL", default_value = "http://localhost:8000")]
    base_url: String,

    #[arg(long, value_name = "EMAIL")]
    email: String,

    #[arg(long, value_name = "PASSWORD")]
    password: String,

    /// Log requests and state changes
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the jobs visible to this account
    Jobs,
    /// List contractors
    Contractors,
    /// Assign a contractor to a job
    Assign {
        #[arg(long)]
        job: i64,
        #[arg(long)]
        contractor: i64,
    },
    /// Change a job's status ("Pending", "In Progress" or "Completed")
    Status {
        #[arg(long)]
        job: i64,
        #[arg(long)]
        status: JobStatus,
    },
    /// Create a new job
    CreateJob {
        #[arg(long)]
        unit: String,
        #[arg(long)]
        client_name: String,
        #[arg(long)]
        client_email: Option<String>,
        #[arg(long)]
        address: String,
        #[arg(long)]
        service_type: String,
        /// YYYY-MM-DD
        #[arg(long)]
        service_date: NaiveDate,
        #[arg(long)]
        lockbox_code: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::WARN
        })
        .init();

    let mut dashboard = Dashboard::new(ApiClient::new(args.base_url));

    dashboard
        .sign_in(&args.email, &args.password)
        .await
        .context("sign in failed")?;

    let outcome = run(&mut dashboard, args.command).await;
    dashboard.sign_out().await;
    outcome
}

async fn run(dashboard: &mut Dashboard<ApiClient>, command: Command) -> anyhow::Result<()> {
    let Some(role) = dashboard.state().role else {
        bail!("this account has no profile yet; try again shortly");
    };

    if let Some(error) = &dashboard.state().last_error {
        bail!("could not load dashboard: {}", error);
    }

    println!("signed in as {}", role);

    match command {
        Command::Jobs => print_jobs(dashboard.state()),
        Command::Contractors => {
            for contractor in &dashboard.state().contractors {
                println!(
                    "{:>4}  {:<24} {:<16} {:.1}",
                    contractor.id, contractor.name, contractor.specialty, contractor.rating
                );
            }
        }
        Command::Assign { job, contractor } => {
            let updated = dashboard
                .assign_contractor(job, contractor)
                .await
                .context("assignment rejected")?;
            println!(
                "job {} assigned to {} ({})",
                updated.id,
                updated.contractor_name.as_deref().unwrap_or("unknown"),
                updated.status
            );
        }
        Command::Status { job, status } => {
            let updated = dashboard
                .update_status(job, status)
                .await
                .context("status change rejected")?;
            println!("job {} is now {}", updated.id, updated.status);
        }
        Command::CreateJob {
            unit,
            client_name,
            client_email,
            address,
            service_type,
            service_date,
            lockbox_code,
            notes,
        } => {
            let created = dashboard
                .create_job(CreateJobDto {
                    unit,
                    client_name,
                    client_email,
                    address,
                    service_type,
                    service_date,
                    lockbox_code,
                    checklist_notes: notes,
                })
                .await
                .context("job creation rejected")?;
            println!("created job {} for {}", created.id, created.service_date);
        }
    }

    Ok(())
}

fn print_jobs(state: &DashboardState) {
    if state.jobs.is_empty() {
        println!("no jobs");
        return;
    }

    for job in &state.jobs {
        println!(
            "{:>4}  {}  {:<6} {:<24} {:<16} {:<12} {}",
            job.id,
            job.service_date,
            job.unit,
            job.client_name,
            job.service_type,
            job.status.to_str(),
            job.contractor_name.as_deref().unwrap_or("-")
        );
    }
}
