use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::files::{OutputBuffer, UploadedFile};
use crate::utils::{Result, SweeperError};

use super::chart::{visualize, Chart};
use super::clean::{fill_missing, remove_duplicates};
use super::dataset::Dataset;
use super::export::{convert, TabularTarget};
use super::parse::parse;

/// Where a file is in its workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileState {
    Uploaded,
    Previewed,
    Cleaned,
    Converted,
}

/// Cleaning steps the user can trigger, in any order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CleaningStep {
    RemoveDuplicates,
    FillMissing,
}

/// A user action on one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Preview(usize),
    RemoveDuplicates,
    FillMissing,
    Visualize,
    Convert(TabularTarget),
}

impl From<CleaningStep> for Action {
    fn from(step: CleaningStep) -> Self {
        match step {
            CleaningStep::RemoveDuplicates => Self::RemoveDuplicates,
            CleaningStep::FillMissing => Self::FillMissing,
        }
    }
}

/// What an action produced
#[derive(Debug, Clone)]
pub enum Outcome {
    Preview(Dataset),
    DuplicatesRemoved { removed: usize },
    MissingFilled { filled: usize },
    Chart(Option<Chart>),
    Converted(OutputBuffer),
}

/// One file's workflow: its name, state and current dataset snapshot
///
/// Sessions are immutable; [`FileSession::apply`] returns the next one and
/// leaves the current snapshot untouched.
#[derive(Debug, Clone)]
pub struct FileSession {
    name: String,
    state: FileState,
    dataset: Arc<Dataset>,
}

impl FileSession {
    /// Parse an upload; unsupported or malformed files yield an error instead
    pub fn open(file: &UploadedFile) -> Result<Self> {
        let dataset = parse(file)?;
        Ok(Self {
            name: file.name.clone(),
            state: FileState::Uploaded,
            dataset: Arc::new(dataset),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> FileState {
        self.state
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Run an action, producing the next session and the action's outcome
    pub fn apply(&self, action: Action) -> Result<(FileSession, Outcome)> {
        let (next, outcome) = match action {
            Action::Preview(rows) => {
                let state = match self.state {
                    FileState::Uploaded => FileState::Previewed,
                    other => other,
                };
                (
                    self.transition(state, Arc::clone(&self.dataset)),
                    Outcome::Preview(self.dataset.head(rows)),
                )
            }
            Action::RemoveDuplicates => {
                let deduped = remove_duplicates(&self.dataset);
                let removed = self.dataset.height() - deduped.height();
                (
                    self.transition(FileState::Cleaned, Arc::new(deduped)),
                    Outcome::DuplicatesRemoved { removed },
                )
            }
            Action::FillMissing => {
                let filled = fill_missing(&self.dataset);
                let count = self.dataset.missing_count() - filled.missing_count();
                (
                    self.transition(FileState::Cleaned, Arc::new(filled)),
                    Outcome::MissingFilled { filled: count },
                )
            }
            Action::Visualize => (
                self.transition(self.state, Arc::clone(&self.dataset)),
                Outcome::Chart(visualize(&self.dataset)),
            ),
            Action::Convert(target) => {
                let output = convert(&self.dataset, &self.name, target)?;
                (
                    self.transition(FileState::Converted, Arc::clone(&self.dataset)),
                    Outcome::Converted(output),
                )
            }
        };

        info!(file = %self.name, ?action, from = ?self.state, to = ?next.state, "file action");
        Ok((next, outcome))
    }

    fn transition(&self, state: FileState, dataset: Arc<Dataset>) -> Self {
        Self {
            name: self.name.clone(),
            state,
            dataset,
        }
    }
}

/// Identity of a file within a workbench: its position in the upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileId(pub usize);

/// An upload that could not be opened
#[derive(Debug)]
pub struct SkippedFile {
    pub id: FileId,
    pub name: String,
    pub error: SweeperError,
}

/// File-scoped workflows for a multi-file upload
///
/// Each file has its own session; handling an action on one file never
/// touches another file's dataset.
#[derive(Debug, Default)]
pub struct Workbench {
    files: BTreeMap<FileId, FileSession>,
}

impl Workbench {
    /// Open every upload, skipping (and reporting) the ones that fail
    pub fn load(uploads: &[UploadedFile]) -> (Self, Vec<SkippedFile>) {
        let mut bench = Self::default();
        let mut skipped = Vec::new();

        for (idx, upload) in uploads.iter().enumerate() {
            let id = FileId(idx);
            match FileSession::open(upload) {
                Ok(session) => {
                    bench.files.insert(id, session);
                }
                Err(error) => {
                    warn!(file = %upload.name, %error, "skipping upload");
                    skipped.push(SkippedFile {
                        id,
                        name: upload.name.clone(),
                        error,
                    });
                }
            }
        }

        (bench, skipped)
    }

    /// Ids of the opened files, in upload order
    pub fn ids(&self) -> Vec<FileId> {
        self.files.keys().copied().collect()
    }

    pub fn get(&self, id: FileId) -> Option<&FileSession> {
        self.files.get(&id)
    }

    pub fn find(&self, name: &str) -> Option<FileId> {
        self.files
            .iter()
            .find(|(_, f)| f.name == name)
            .map(|(id, _)| *id)
    }

    /// Apply `action` to one file and keep the resulting snapshot
    ///
    /// Repeating the same (file, action) pair is safe: cleaning steps are
    /// idempotent and previews, charts and conversions do not change data.
    pub fn handle(&mut self, id: FileId, action: Action) -> Result<Outcome> {
        let current = self.files.get(&id).ok_or_else(|| {
            SweeperError::ValidationError(format!("no uploaded file with id {}", id.0))
        })?;
        let (next, outcome) = current.apply(action)?;
        self.files.insert(id, next);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::Cell;

    fn upload(name: &str, content: &str) -> UploadedFile {
        UploadedFile::new(name, content.as_bytes().to_vec())
    }

    #[test]
    fn test_state_transitions() {
        let session = FileSession::open(&upload("data.csv", "A,B\n1,\n2,4\n1,\n")).unwrap();
        assert_eq!(session.state(), FileState::Uploaded);

        let (previewed, _) = session.apply(Action::Preview(5)).unwrap();
        assert_eq!(previewed.state(), FileState::Previewed);

        let (cleaned, outcome) = previewed.apply(Action::FillMissing).unwrap();
        assert_eq!(cleaned.state(), FileState::Cleaned);
        assert!(matches!(outcome, Outcome::MissingFilled { filled: 2 }));

        let (charted, _) = cleaned.apply(Action::Visualize).unwrap();
        assert_eq!(charted.state(), FileState::Cleaned);

        let (converted, outcome) = charted.apply(Action::Convert(TabularTarget::Csv)).unwrap();
        assert_eq!(converted.state(), FileState::Converted);
        match outcome {
            Outcome::Converted(output) => assert_eq!(output.file_name, "data.csv"),
            other => panic!("unexpected outcome {:?}", other),
        }

        // Earlier snapshots are untouched
        assert_eq!(session.dataset().missing_count(), 2);
        assert_eq!(previewed.dataset().missing_count(), 2);
    }

    #[test]
    fn test_preview_does_not_mutate() {
        let content = "n\n1\n2\n3\n4\n5\n6\n7\n";
        let session = FileSession::open(&upload("n.csv", content)).unwrap();
        let (next, outcome) = session.apply(Action::Preview(5)).unwrap();

        match outcome {
            Outcome::Preview(head) => assert_eq!(head.height(), 5),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(next.dataset().height(), 7);
    }

    #[test]
    fn test_workbench_skips_unsupported_files() {
        let uploads = vec![
            upload("a.csv", "x\n1\n"),
            upload("notes.txt", "hello"),
            upload("b.csv", "y\n2\n"),
        ];
        let (bench, skipped) = Workbench::load(&uploads);

        assert_eq!(bench.ids().len(), 2);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].id, FileId(1));
        assert_eq!(skipped[0].name, "notes.txt");
        assert!(matches!(
            skipped[0].error,
            SweeperError::UnsupportedTypeError(ref ext) if ext == ".txt"
        ));
        assert_eq!(bench.find("b.csv"), Some(FileId(2)));
        assert_eq!(bench.ids(), vec![FileId(0), FileId(2)]);
    }

    #[test]
    fn test_workbench_files_are_independent() {
        let uploads = vec![
            upload("a.csv", "x\n1\n1\n"),
            upload("b.csv", "x\n1\n1\n"),
        ];
        let (mut bench, _) = Workbench::load(&uploads);
        let a = bench.find("a.csv").unwrap();
        let b = bench.find("b.csv").unwrap();

        bench.handle(a, Action::RemoveDuplicates).unwrap();

        assert_eq!(bench.get(a).unwrap().dataset().height(), 1);
        assert_eq!(bench.get(b).unwrap().dataset().height(), 2);
        assert_eq!(bench.get(b).unwrap().state(), FileState::Uploaded);
    }

    #[test]
    fn test_repeated_handling_is_idempotent() {
        let (mut bench, _) = Workbench::load(&[upload("d.csv", "A,B\n1,\n2,4\n1,\n")]);
        let id = FileId(0);

        for action in [Action::FillMissing, Action::RemoveDuplicates] {
            bench.handle(id, action).unwrap();
            let once = bench.get(id).unwrap().dataset().clone();
            bench.handle(id, action).unwrap();
            assert_eq!(bench.get(id).unwrap().dataset(), &once);
        }

        assert_eq!(
            bench.get(id).unwrap().dataset().rows().to_vec(),
            vec![
                vec![Cell::Int(1), Cell::Float(4.0)],
                vec![Cell::Int(2), Cell::Float(4.0)],
            ]
        );
    }

    #[test]
    fn test_handle_unknown_file() {
        let mut bench = Workbench::default();
        assert!(bench.handle(FileId(3), Action::Visualize).is_err());
    }
}
