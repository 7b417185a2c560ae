//! `punchc` - CLI for punchcard
//!
//! This binary provides the command-line interface for clocking in with a
//! photo and browsing attendance records.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use clap::Parser;

use punchcard::cli::{
    Cli, ClockInCommand, Command, ConfigCommand, EmployeeCommand, HistoryCommand, RecordsCommand,
};
use punchcard::{
    init_logging, AttendanceClient, CameraDevice, CaptureWorkflow, Config, CredentialProvider,
    EmployeeClient, Mode, NewEmployee, Photo, SpoolDevice, TokenFile,
};
use punchcard::records::{AttendanceRecord, EmployeeUpdate};
use punchcard_spool::SpoolCamera;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::ClockIn(cmd) => handle_clock_in(&config, cmd).await,
        Command::History(cmd) => handle_history(&config, &cmd).await,
        Command::Records(cmd) => handle_records(&config, &cmd).await,
        Command::Employee(cmd) => handle_employee(&config, cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn credentials(config: &Config) -> Arc<dyn CredentialProvider> {
    Arc::new(TokenFile::new(config.token_file()))
}

fn spool_camera(config: &Config) -> SpoolDevice {
    SpoolDevice::new(
        SpoolCamera::new(config.spool_dir())
            .with_min_frame_bytes(config.camera.min_frame_bytes)
            .with_max_frame_age(config.max_frame_age()),
    )
}

async fn handle_clock_in(
    config: &Config,
    cmd: ClockInCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let creds = credentials(config);
    let client = AttendanceClient::new(config, creds)?;
    let camera: Arc<dyn CameraDevice> = Arc::new(spool_camera(config));
    let mut workflow = CaptureWorkflow::new(Arc::new(client), camera);

    workflow.start().await?;
    if workflow.mode() == Mode::Completed {
        if let Some(status) = workflow.status() {
            println!("{}", status.text);
        }
        return Ok(());
    }

    if let Some(path) = cmd.photo {
        println!("Uploading {}...", path.display());
        let photo = Photo::from_file(&path)?;
        workflow.select_file(photo)?;
    } else {
        println!("Capturing from camera...");
        workflow.open_camera().await?;
        workflow.capture().await?;
    }

    workflow.submit().await?;
    if let Some(status) = workflow.status() {
        println!("{}", status.text);
    }
    Ok(())
}

async fn handle_history(
    config: &Config,
    cmd: &HistoryCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    use punchcard::AttendanceApi;

    let client = AttendanceClient::new(config, credentials(config))?;
    let mut records = client.my_history().await?;
    records.truncate(cmd.limit);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        println!("No attendance records.");
    } else {
        for record in &records {
            println!("{}", render_record(record));
        }
    }
    Ok(())
}

async fn handle_records(
    config: &Config,
    cmd: &RecordsCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = AttendanceClient::new(config, credentials(config))?;
    let page = client
        .all_records(cmd.filter.into(), cmd.page, cmd.page_size)
        .await?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    if page.data.is_empty() {
        println!("No attendance records.");
    } else {
        for record in &page.data {
            let who = record
                .user
                .as_ref()
                .map_or("(unknown)", |user| user.name.as_str());
            println!("{:<24} {}", who, render_record(record));
        }
    }
    println!();
    println!(
        "Page {} of {} ({} records)",
        page.meta.current_page, page.meta.total_pages, page.meta.total_items
    );
    Ok(())
}

async fn handle_employee(
    config: &Config,
    cmd: EmployeeCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = EmployeeClient::new(config, credentials(config))?;

    match cmd {
        EmployeeCommand::List {
            page,
            page_size,
            json,
        } => {
            let listing = client.list(page, page_size).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
                return Ok(());
            }
            if listing.data.is_empty() {
                println!("No employees.");
            } else {
                for employee in &listing.data {
                    println!(
                        "{:>6}  {:<24} {:<32} {}",
                        employee.id, employee.name, employee.email, employee.role
                    );
                }
            }
            println!();
            println!(
                "Page {} of {} ({} accounts)",
                listing.meta.current_page, listing.meta.total_pages, listing.meta.total_items
            );
        }
        EmployeeCommand::Add {
            name,
            email,
            password,
            role,
        } => {
            client
                .create(&NewEmployee {
                    name,
                    email,
                    password,
                    role: role.into(),
                })
                .await?;
            println!("Employee created.");
        }
        EmployeeCommand::Update {
            id,
            name,
            email,
            role,
            password,
        } => {
            client
                .update(
                    id,
                    &EmployeeUpdate {
                        name,
                        email,
                        role: role.into(),
                        password,
                    },
                )
                .await?;
            println!("Employee {id} updated.");
        }
        EmployeeCommand::Remove { id } => {
            client.delete(id).await?;
            println!("Employee {id} deleted.");
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Service]");
                println!("  Attendance URL:   {}", config.attendance_url());
                println!("  User URL:         {}", config.user_url());
                println!(
                    "  Request timeout:  {}s",
                    config.service.request_timeout_secs
                );
                println!();
                println!("[Camera]");
                println!("  Spool directory:  {}", config.spool_dir().display());
                println!("  Min frame bytes:  {}", config.camera.min_frame_bytes);
                println!(
                    "  Max frame age:    {}",
                    config
                        .max_frame_age()
                        .map_or("unlimited".to_string(), |age| format!("{}s", age.as_secs()))
                );
                println!();
                println!("[Credentials]");
                println!("  Token file:       {}", config.token_file().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn render_record(record: &AttendanceRecord) -> String {
    let when = record
        .clock_in_time
        .with_timezone(&chrono::Local)
        .format("%Y-%m-%d %H:%M");
    let status = record
        .status
        .map_or("-".to_string(), |status| status.to_string());
    let photo = record.photo_url.as_deref().unwrap_or("-");
    format!("{when}  {status:<8} {photo}")
}
