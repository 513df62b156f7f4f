//! Application orchestrator.
//! Initializes logging, then runs one subcommand against the library and
//! reports its outcome on the terminal.

use anyhow::Result;
use tracing::{debug, error, info};

use drowsy::cli::{Args, Command, FtpArgs, HttpArgs, LocalTransfer};
use drowsy::output as out;
use drowsy::{Error, FtpClient, HttpClient, LogLevel, Presence, fs_ops};

use crate::logging::init_tracing;

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    let level = args.effective_log_level().unwrap_or(LogLevel::Normal);
    if args.effective_log_level().is_none()
        && let Some(raw) = args.log_level.as_deref()
    {
        out::print_warn(&format!("Unknown log level '{raw}'; using {level}"));
    }

    let guard = init_tracing(&level, args.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;

    let name = args.command.name();
    debug!(command = name, ?args.command, "Starting drowsy");

    let result = dispatch(&args.command);
    match &result {
        Ok(()) => info!(command = name, "Command completed"),
        Err(e) => match e.downcast_ref::<Error>() {
            Some(err) => error!(command = name, code = err.code(), error = %err, "Command failed"),
            None => error!(command = name, error = ?e, "Command failed"),
        },
    }

    // Flush the file appender before the process exits.
    drop(guard);
    result
}

fn dispatch(command: &Command) -> Result<()> {
    match command {
        Command::Touch { path } => {
            fs_ops::touch(path)?;
            out::print_success(&format!("Created {}", path.display()));
        }
        Command::Rm { path } => {
            fs_ops::remove(path)?;
            out::print_success(&format!("Removed {}", path.display()));
        }
        Command::Cp { paths } => {
            let bytes = fs_ops::copy(&paths.source, &paths.destination, paths.overwrite)?;
            out::print_success(&format!("Copied {} ({bytes} bytes)", arrow(paths)));
        }
        Command::Mv { paths } => {
            fs_ops::move_file(&paths.source, &paths.destination, paths.overwrite)?;
            out::print_success(&format!("Moved {}", arrow(paths)));
        }
        Command::Rename { paths } => {
            fs_ops::rename(&paths.source, &paths.destination, paths.overwrite)?;
            out::print_success(&format!("Renamed {}", arrow(paths)));
        }
        Command::Mkdir { paths, exist_ok } => {
            fs_ops::make_dirs(paths, *exist_ok)?;
            out::print_success(&format!("Created {} directories", paths.len()));
        }
        Command::FtpLs { ftp, directory } => {
            let mut client = connect_ftp(ftp)?;
            for entry in client.list_directory(directory)? {
                out::print_user(&entry);
            }
            client.disconnect()?;
        }
        Command::FtpGet {
            ftp,
            source,
            destination,
            overwrite,
        } => {
            let mut client = connect_ftp(ftp)?;
            let bytes = client.download(source, destination, *overwrite)?;
            client.disconnect()?;
            out::print_success(&format!(
                "Downloaded {source} -> {} ({bytes} bytes)",
                destination.display()
            ));
        }
        Command::FtpPut {
            ftp,
            source,
            destination,
            overwrite,
        } => {
            let mut client = connect_ftp(ftp)?;
            let bytes = client.upload(source, destination, *overwrite)?;
            client.disconnect()?;
            out::print_success(&format!(
                "Uploaded {} -> {destination} ({bytes} bytes)",
                source.display()
            ));
        }
        Command::FtpCheck { ftp, path, dir } => {
            let mut client = connect_ftp(ftp)?;
            let presence = if *dir {
                client.check_directory(path)
            } else {
                client.check_file_path(path)
            };
            client.disconnect()?;
            match presence {
                Presence::Exists => out::print_user(&format!("{path}: exists")),
                Presence::NotFound => return Err(Error::NotFound(path.clone()).into()),
                Presence::Unknown(e) => return Err(e.into()),
            }
        }
        Command::HttpCheck { http, url } => {
            http_client(http)?.check_url(url)?;
            out::print_success(&format!("{url} is reachable"));
        }
        Command::HttpSearch {
            http,
            url,
            extension,
        } => {
            let links = http_client(http)?.search(url, extension)?;
            if links.is_empty() {
                out::print_warn(&format!("No .{} links found at {url}", extension.trim_start_matches('.')));
            }
            for link in links {
                out::print_user(&link);
            }
        }
        Command::HttpGet {
            http,
            url,
            destination,
            overwrite,
        } => {
            let bytes = http_client(http)?.download(url, destination, *overwrite)?;
            out::print_success(&format!(
                "Downloaded {url} -> {} ({bytes} bytes)",
                destination.display()
            ));
        }
    }
    Ok(())
}

fn connect_ftp(ftp: &FtpArgs) -> drowsy::Result<FtpClient> {
    let mut client = FtpClient::with_options(
        &ftp.host,
        ftp.port,
        ftp.user.as_deref(),
        ftp.password.as_deref(),
        ftp.options(),
    )?;
    client.connect()?;
    Ok(client)
}

fn http_client(http: &HttpArgs) -> drowsy::Result<HttpClient> {
    HttpClient::with_options(http.options())
}

fn arrow(paths: &LocalTransfer) -> String {
    format!("{} -> {}", paths.source.display(), paths.destination.display())
}
