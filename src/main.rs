// src/main.rs
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use facemark::attempt::{AttemptController, TriggerResult};
use facemark::capture::FileCamera;
use facemark::config::Settings;
use facemark::present;
use facemark::service::HttpRecognitionService;

#[derive(Parser)]
#[command(name = "facemark")]
#[command(about = "Face-recognition attendance client", long_about = None)]
struct Cli {
    /// Attendance server URL (default: http://127.0.0.1:8000)
    #[arg(long, global = true)]
    server: Option<String>,

    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture one frame and mark attendance
    Capture {
        /// Image file the camera writes its current frame to
        #[arg(long, short = 'i')]
        image: PathBuf,
    },
    /// Enter captures, `r` resets, `q` quits
    Interactive {
        /// Image file the camera writes its current frame to
        #[arg(long, short = 'i')]
        image: PathBuf,
    },
    /// List enrolled students
    Students,
    /// Show recent attendance records
    Attendance {
        #[arg(long, short = 'n', default_value_t = 20)]
        limit: u32,

        /// Write each record's face photo into this directory
        #[arg(long)]
        save_dir: Option<PathBuf>,
    },
    /// Download the face photo of one attendance record
    Photo {
        id: i64,

        #[arg(long)]
        save: PathBuf,
    },
    /// Check that the attendance server is up
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init_from_env(env_logger::Env::default().filter_or("RUST_LOG", "info"));

    let cli = Cli::parse();
    let settings =
        Settings::load(cli.config.as_deref())?.with_overrides(cli.server, cli.timeout);
    let service = HttpRecognitionService::new(&settings)?;

    match cli.command {
        Commands::Capture { image } => run_capture(&settings, service, image).await,
        Commands::Interactive { image } => run_interactive(&settings, service, image).await,
        Commands::Students => list_students(&service).await,
        Commands::Attendance { limit, save_dir } => {
            list_attendance(&service, limit, save_dir.as_deref()).await
        }
        Commands::Photo { id, save } => save_photo(&service, id, &save).await,
        Commands::Check => check_server(&service, &settings).await,
    }
}

fn controller(
    settings: &Settings,
    service: HttpRecognitionService,
    image: PathBuf,
) -> AttemptController<FileCamera, HttpRecognitionService> {
    let camera = FileCamera::new(image).with_quality(settings.jpeg_quality);
    AttemptController::new(camera, service).with_file_name(settings.file_name.clone())
}

async fn run_capture(settings: &Settings, service: HttpRecognitionService, image: PathBuf) -> Result<()> {
    info!("Capturing from {}", image.display());
    let ctrl = controller(settings, service, image);

    let result = ctrl.trigger().await;
    println!("\n{}\n", present::render(&ctrl.view()));

    match result {
        TriggerResult::Completed(outcome) if outcome.is_recognized() => Ok(()),
        TriggerResult::Aborted => Err(anyhow!("no frame captured")),
        _ => Err(anyhow!("attendance not marked")),
    }
}

async fn run_interactive(settings: &Settings, service: HttpRecognitionService, image: PathBuf) -> Result<()> {
    println!("Facemark Interactive Mode");
    println!("=========================");
    println!("Enter: capture & mark attendance | r: reset | q: quit\n");

    let ctrl = Arc::new(controller(settings, service, image));
    let presenter = tokio::spawn(present::console(ctrl.subscribe()));
    println!("{}", present::render(&ctrl.view()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => {
                let ctrl = Arc::clone(&ctrl);
                tokio::spawn(async move {
                    if let TriggerResult::Ignored = ctrl.trigger().await {
                        println!("Still processing, please wait");
                    }
                });
            }
            "r" => {
                if !ctrl.reset() {
                    println!("Cannot reset while an attempt is running");
                }
            }
            "q" => break,
            other => println!("Unknown input '{}'", other),
        }
    }

    drop(ctrl);
    if let Err(e) = presenter.await {
        warn!("Presenter task ended abnormally: {}", e);
    }
    println!("Exiting Facemark");
    Ok(())
}

async fn list_students(service: &HttpRecognitionService) -> Result<()> {
    let students = service.students().await?;

    println!("\nEnrolled students:");
    if students.is_empty() {
        println!("  No students enrolled");
    }
    for student in &students {
        println!("  {:>4}. {}", student.id, student.name);
    }
    println!();
    Ok(())
}

async fn list_attendance(service: &HttpRecognitionService, limit: u32, save_dir: Option<&Path>) -> Result<()> {
    let list = service.attendance(limit).await?;

    println!("\nLast {} attendance record(s):", list.count);
    for record in &list.items {
        println!(
            "  #{:<5} {:<24} {} ({})",
            record.id, record.student_name, record.timestamp_ist, record.day_ist
        );

        if let Some(dir) = save_dir {
            match record.photo_bytes() {
                Ok(Some(bytes)) => {
                    let path = dir.join(format!("attendance_{}.jpg", record.id));
                    std::fs::write(&path, bytes)?;
                    info!("Photo saved to: {}", path.display());
                }
                Ok(None) => {}
                Err(e) => error!("Record {} has an unreadable photo: {}", record.id, e),
            }
        }
    }
    println!();
    Ok(())
}

async fn save_photo(service: &HttpRecognitionService, id: i64, save: &Path) -> Result<()> {
    let bytes = service.attendance_photo(id).await?;
    std::fs::write(save, &bytes)?;
    println!("Photo for record {} saved to: {}", id, save.display());
    Ok(())
}

async fn check_server(service: &HttpRecognitionService, settings: &Settings) -> Result<()> {
    match service.health().await {
        Ok(message) => {
            println!("[ok] Attendance server is running at {}", settings.server_url);
            println!("     {}", message);
            match service.students().await {
                Ok(students) => println!("[ok] {} student(s) enrolled", students.len()),
                Err(e) => println!("[!!] Could not list students: {}", e),
            }
        }
        Err(e) => {
            println!("[!!] Could not reach attendance server at {}", settings.server_url);
            println!("     Error: {}", e);
            println!("\nMake sure the backend is running and reachable,");
            println!("or point --server / FACEMARK_URL at it.");
        }
    }
    Ok(())
}
