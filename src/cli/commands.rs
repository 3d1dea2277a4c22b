use anyhow::{Context, Result};
use colored::Colorize;
use std::fmt::Write as _;
use tracing::warn;

use crate::{
    app::{init_config, load_config, Controller, FileReport, ScreenReport, ScreenRequest, TablePlan},
    files::{DirectorySink, UploadedFile},
    router::Screen,
};

use super::{Cli, Commands, OutputFormat};

/// Run the parsed command line; returns false when something was reported as failed
pub fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Init => {
            let (path, created) = init_config(cli.config.clone())?;
            if created {
                println!("Created default configuration at: {}", path.display());
            } else {
                println!("Configuration already exists at: {}", path.display());
            }
            Ok(true)
        }
        Commands::Version => {
            show_version();
            Ok(true)
        }
        Commands::Sections => {
            println!("Choose a section:");
            for screen in Screen::ALL {
                println!("  • {}", screen.label().green());
            }
            Ok(true)
        }
        _ => run_screen(cli),
    }
}

/// Show version information
pub fn show_version() {
    println!("Data Sweeper v{}", env!("CARGO_PKG_VERSION"));
    println!("   Convert CSV, Excel and image files with built-in data cleaning");
}

/// Log in, open the requested screen, print its report and log out
fn run_screen(cli: Cli) -> Result<bool> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(out) = &cli.out {
        config.output.dir = out.clone();
    }

    let sink = DirectorySink::new(config.output.dir.clone(), config.output.overwrite);
    let mut controller = Controller::new(config, sink);

    if let Err(e) = controller.login(
        cli.name.as_deref().unwrap_or_default(),
        cli.email.as_deref().unwrap_or_default(),
        cli.password.as_deref().unwrap_or_default(),
    ) {
        eprintln!("{} {}", "Login Required:".red().bold(), e);
        return Ok(false);
    }

    let (request, read_failures) = build_request(cli.command, &controller)?;
    let mut report = controller.open(request)?;
    controller.finish();

    // Unreadable files go back to their upload position
    for (position, failure) in read_failures {
        let position = position.min(report.files.len());
        report.files.insert(position, failure);
    }

    println!("{}", format_report(&report, cli.format)?);
    Ok(!report.has_errors())
}

fn build_request(
    command: Commands,
    controller: &Controller<DirectorySink>,
) -> Result<(ScreenRequest, Vec<(usize, FileReport)>)> {
    let defaults = &controller.config().defaults;

    let request = match command {
        Commands::Image { file, to } => {
            let upload = UploadedFile::from_path(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            ScreenRequest::ImageConvert {
                upload,
                target: to.unwrap_or(defaults.image_format),
            }
        }
        Commands::Table {
            files,
            steps,
            to,
            no_preview,
            no_chart,
        } => {
            let mut uploads = Vec::new();
            let mut failures = Vec::new();
            for (position, path) in files.iter().enumerate() {
                match UploadedFile::from_path(path) {
                    Ok(upload) => uploads.push(upload),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "could not read upload");
                        failures.push((position, FileReport::failed(&path.display().to_string(), e)));
                    }
                }
            }

            let plan = TablePlan {
                steps,
                preview: !no_preview,
                chart: !no_chart,
                convert_to: Some(to.unwrap_or(defaults.table_format)),
            };
            return Ok((ScreenRequest::UploadProcess { uploads, plan }, failures));
        }
        _ => ScreenRequest::About,
    };

    Ok((request, Vec::new()))
}

/// Render a report as colored text or JSON
pub fn format_report(report: &ScreenReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

fn format_text(report: &ScreenReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", report.title.red().bold());
    let _ = writeln!(out, "Welcome, {}!", report.user);
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", report.intro);

    for file in &report.files {
        let _ = writeln!(out);
        let _ = writeln!(out, "📄 {}", file.name.bold());

        if let Some(image) = &file.image {
            let _ = writeln!(
                out,
                "   Uploaded Image: {}x{} ({})",
                image.width, image.height, image.color
            );
        }
        if let Some(preview) = &file.preview {
            let _ = writeln!(out, "🔍 Preview the head of the Dataframe");
            out.push_str(preview);
        }
        for message in &file.messages {
            let _ = writeln!(out, "✅ {}", message.green());
        }
        if let Some(chart) = &file.chart {
            let _ = writeln!(out, "📊 Data Visualization");
            out.push_str(chart);
        }
        for saved in &file.outputs {
            let _ = writeln!(
                out,
                "💾 {} ({}, {} bytes)",
                saved.path.display(),
                saved.mime_type,
                saved.bytes
            );
        }
        if let Some(error) = &file.error {
            let _ = writeln!(out, "❌ {}", error.red());
        }
    }

    if report.screen == Screen::UploadProcess && !report.files.is_empty() {
        let _ = writeln!(out);
        if report.has_errors() {
            let _ = writeln!(
                out,
                "{} of {} files processed",
                report.succeeded(),
                report.files.len()
            );
        } else {
            let _ = writeln!(out, "🎉 All Files processed successfully!");
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SavedOutput;
    use std::path::PathBuf;

    fn sample_report() -> ScreenReport {
        let mut report = ScreenReport::new("Ada", Screen::UploadProcess);
        let mut ok = FileReport::new("data.csv");
        ok.messages.push("Duplicates removed successfully (1 rows)".to_string());
        ok.outputs.push(SavedOutput {
            file_name: "data.xlsx".to_string(),
            mime_type: "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
                .to_string(),
            bytes: 42,
            path: PathBuf::from("out/data.xlsx"),
        });
        report.files.push(ok);
        report
            .files
            .push(FileReport::failed("notes.txt", "Unsupported file type: .txt"));
        report
    }

    #[test]
    fn test_text_report() {
        colored::control::set_override(false);
        let text = format_report(&sample_report(), OutputFormat::Text).unwrap();

        assert!(text.starts_with("Data Sweeper\nWelcome, Ada!"));
        assert!(text.contains("✅ Duplicates removed successfully (1 rows)"));
        assert!(text.contains("💾 out/data.xlsx"));
        assert!(text.contains("❌ Unsupported file type: .txt"));
        assert!(text.contains("1 of 2 files processed"));
    }

    #[test]
    fn test_json_report() {
        let json = format_report(&sample_report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["user"], "Ada");
        assert_eq!(value["screen"], "UploadProcess");
        assert_eq!(value["files"][0]["outputs"][0]["file_name"], "data.xlsx");
        assert_eq!(value["files"][1]["error"], "Unsupported file type: .txt");
        assert!(value["files"][0].get("error").is_none());
    }
}
