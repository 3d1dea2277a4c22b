use tracing::{info, warn};

use crate::app::report::{FileReport, SavedOutput, ScreenReport};
use crate::app::Config;
use crate::files::{DownloadSink, OutputBuffer, UploadedFile};
use crate::imaging::{convert_image, ImageTarget};
use crate::router::{route, Screen};
use crate::session::{Authenticated, Session};
use crate::tabular::{Action, CleaningStep, FileId, Outcome, TabularTarget, Workbench};
use crate::tui::{render_chart, render_preview, terminal_width};
use crate::utils::Result;

/// What to do with each tabular upload
#[derive(Debug, Clone, Default)]
pub struct TablePlan {
    /// Cleaning steps in the order the user asked for them
    pub steps: Vec<CleaningStep>,
    pub preview: bool,
    pub chart: bool,
    pub convert_to: Option<TabularTarget>,
}

/// A request for one of the screens behind the session gate
#[derive(Debug, Clone)]
pub enum ScreenRequest {
    About,
    ImageConvert {
        upload: UploadedFile,
        target: ImageTarget,
    },
    UploadProcess {
        uploads: Vec<UploadedFile>,
        plan: TablePlan,
    },
}

impl ScreenRequest {
    /// Navigation label of the section this request belongs to
    pub fn selection(&self) -> &'static str {
        match self {
            Self::About => Screen::About.label(),
            Self::ImageConvert { .. } => Screen::ImageConvert.label(),
            Self::UploadProcess { .. } => Screen::UploadProcess.label(),
        }
    }
}

/// Top-level controller owning the session context
///
/// Login is the init step and [`Controller::finish`] the teardown; every
/// screen handler receives the session through the controller.
pub struct Controller<S: DownloadSink> {
    config: Config,
    session: Session,
    sink: S,
}

impl<S: DownloadSink> Controller<S> {
    pub fn new(config: Config, sink: S) -> Self {
        Self {
            config,
            session: Session::new(),
            sink,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn login(&mut self, name: &str, email: &str, password: &str) -> Result<Authenticated> {
        self.session.submit_login(name, email, password)
    }

    /// Route a request to its screen and run it
    ///
    /// Per-file failures end up in the report; only the session gate fails
    /// the whole request.
    pub fn open(&mut self, request: ScreenRequest) -> Result<ScreenReport> {
        let user = self.session.require_user()?.to_string();
        let screen = route(request.selection());
        info!(user = %user, screen = screen.label(), "opening screen");

        let mut report = ScreenReport::new(&user, screen);
        match request {
            ScreenRequest::About => {}
            ScreenRequest::ImageConvert { upload, target } => {
                report.files.push(self.image_convert(&upload, target));
            }
            ScreenRequest::UploadProcess { uploads, plan } => {
                report.files = self.upload_process(&uploads, &plan);
            }
        }
        Ok(report)
    }

    /// End the session; screens need a fresh login afterwards
    pub fn logout(&mut self) {
        self.session.logout();
    }

    /// Log out and hand back the sink
    pub fn finish(mut self) -> S {
        self.logout();
        self.sink
    }

    fn image_convert(&mut self, upload: &UploadedFile, target: ImageTarget) -> FileReport {
        let converted = match convert_image(upload, target) {
            Ok(converted) => converted,
            Err(e) => {
                warn!(file = %upload.name, error = %e, "image rejected");
                return FileReport::failed(&upload.name, e);
            }
        };

        let mut report = FileReport::new(&upload.name);
        report.image = Some(converted.summary);

        match self.deliver(converted.output) {
            Ok(saved) => {
                report.messages.push(format!(
                    "Converted {} to {} ({})",
                    upload.name,
                    target.label(),
                    saved.file_name
                ));
                report.outputs.push(saved);
            }
            Err(e) => report.error = Some(e.to_string()),
        }
        report
    }

    fn upload_process(&mut self, uploads: &[UploadedFile], plan: &TablePlan) -> Vec<FileReport> {
        let (mut bench, skipped) = Workbench::load(uploads);
        let mut reports: Vec<(FileId, FileReport)> = skipped
            .into_iter()
            .map(|s| (s.id, FileReport::failed(&s.name, s.error)))
            .collect();

        for id in bench.ids() {
            let Some(name) = bench.get(id).map(|f| f.name().to_string()) else {
                continue;
            };
            let report = self.process_file(&mut bench, id, &name, plan);
            reports.push((id, report));
        }

        // Present results in upload order
        reports.sort_by_key(|(id, _)| *id);
        reports.into_iter().map(|(_, report)| report).collect()
    }

    fn process_file(
        &mut self,
        bench: &mut Workbench,
        id: FileId,
        name: &str,
        plan: &TablePlan,
    ) -> FileReport {
        let mut report = FileReport::new(name);
        let display = self.config.display.clone();
        let width = terminal_width(display.max_width);

        let mut actions: Vec<Action> = Vec::new();
        if plan.preview {
            actions.push(Action::Preview(display.preview_rows));
        }
        actions.extend(plan.steps.iter().copied().map(Action::from));
        if plan.chart {
            actions.push(Action::Visualize);
        }
        if let Some(target) = plan.convert_to {
            actions.push(Action::Convert(target));
        }

        for action in actions {
            let outcome = match bench.handle(id, action) {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(file = %name, error = %e, "action failed");
                    report.error = Some(e.to_string());
                    break;
                }
            };

            match outcome {
                Outcome::Preview(head) => {
                    report.preview = Some(render_preview(&head, name, width));
                }
                Outcome::DuplicatesRemoved { removed } => {
                    report
                        .messages
                        .push(format!("Duplicates removed successfully ({} rows)", removed));
                }
                Outcome::MissingFilled { filled } => {
                    report
                        .messages
                        .push(format!("Missing values have been filled ({} cells)", filled));
                }
                Outcome::Chart(Some(chart)) => {
                    report.chart = Some(render_chart(
                        &chart,
                        "Data Visualization",
                        display.chart_height,
                        display.chart_max_rows,
                        width,
                    ));
                }
                Outcome::Chart(None) => {
                    report
                        .messages
                        .push("No numeric columns to chart".to_string());
                }
                Outcome::Converted(output) => match self.deliver(output) {
                    Ok(saved) => {
                        report
                            .messages
                            .push(format!("Converted {} to {}", name, saved.file_name));
                        report.outputs.push(saved);
                    }
                    Err(e) => {
                        report.error = Some(e.to_string());
                        break;
                    }
                },
            }
        }

        report
    }

    fn deliver(&mut self, output: OutputBuffer) -> Result<SavedOutput> {
        let file_name = output.file_name.clone();
        let mime_type = output.mime_type.to_string();
        let bytes = output.len();
        let path = self.sink.offer(output)?;
        Ok(SavedOutput {
            file_name,
            mime_type,
            bytes,
            path,
        })
    }
}
