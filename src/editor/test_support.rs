use crate::{
    api::{GenderApi, StudentApi},
    config::EditorSettings,
    data::{Gender, ImageUpload, Student, UploadedImage},
    diagnostics::{DiagnosticEvent, DiagnosticKind, DiagnosticSink},
    editor::{Collaborators, EditorController},
    error::{EditorError, EditorResult, MissingStudentSnafu},
    feedback::{Navigator, Notifier},
    form::BoundForm,
};
use async_trait::async_trait;
use snafu::OptionExt;
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::Duration,
};

pub const IMAGE_BASE: &str = "http://api.local";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    GetStudent(String),
    Update(String),
    Delete(String),
    Add,
    Upload(String),
    GetGenders,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Get,
    Update,
    Delete,
    Add,
    Upload,
    Genders,
}

#[derive(Default)]
pub struct MockStudentApi {
    pub students: HashMap<String, Student>,
    pub failing: HashSet<Op>,
    pub record_delay: Duration,
    pub gender_delay: Duration,
    pub next_id: String,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockStudentApi {
    pub fn new() -> Self {
        Self {
            next_id: "42".into(),
            ..Self::default()
        }
    }

    pub fn with_student(mut self, student: Student) -> Self {
        self.students.insert(student.id.clone(), student);
        self
    }

    pub fn failing(mut self, op: Op) -> Self {
        self.failing.insert(op);
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn count(&self, matches: impl Fn(&ApiCall) -> bool) -> usize {
        self.calls().iter().filter(|call| matches(call)).count()
    }

    fn record(&self, call: ApiCall, op: Op) -> EditorResult<()> {
        self.calls.lock().expect("calls lock").push(call);
        if self.failing.contains(&op) {
            return Err(EditorError::ApiUnavailable {
                reason: format!("{op:?} failed on purpose"),
            });
        }
        Ok(())
    }
}

pub fn genders() -> Vec<Gender> {
    vec![Gender::new("g1", "Female"), Gender::new("g2", "Male")]
}

pub fn saved_student(id: &str) -> Student {
    Student {
        id: id.into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        date_of_birth: "1815-12-10T00:00:00".into(),
        email: "ada@example.com".into(),
        mobile: 7_700_900_000,
        gender_id: "g1".into(),
        gender: Gender::new("g1", "Female"),
        ..Student::default()
    }
}

#[async_trait]
impl StudentApi for MockStudentApi {
    async fn get_student(&self, id: &str) -> EditorResult<Student> {
        self.record(ApiCall::GetStudent(id.into()), Op::Get)?;
        tokio::time::sleep(self.record_delay).await;
        self.students
            .get(id)
            .cloned()
            .context(MissingStudentSnafu { id })
    }

    async fn update_student(&self, id: &str, student: Student) -> EditorResult<Student> {
        self.record(ApiCall::Update(id.into()), Op::Update)?;
        Ok(student)
    }

    async fn delete_student(&self, id: &str) -> EditorResult<()> {
        self.record(ApiCall::Delete(id.into()), Op::Delete)
    }

    async fn add_student(&self, mut student: Student) -> EditorResult<Student> {
        self.record(ApiCall::Add, Op::Add)?;
        student.id.clone_from(&self.next_id);
        Ok(student)
    }

    async fn upload_image(&self, id: &str, image: ImageUpload) -> EditorResult<UploadedImage> {
        self.record(ApiCall::Upload(id.into()), Op::Upload)?;
        Ok(UploadedImage {
            id: id.into(),
            profile_image_url: format!("images/{id}.{}", image.extension),
        })
    }

    fn get_image_path(&self, relative_path: &str) -> String {
        format!("{IMAGE_BASE}/{relative_path}")
    }
}

#[async_trait]
impl GenderApi for MockStudentApi {
    async fn get_gender_list(&self) -> EditorResult<Vec<Gender>> {
        self.record(ApiCall::GetGenders, Op::Genders)?;
        tokio::time::sleep(self.gender_delay).await;
        Ok(genders())
    }
}

#[derive(Default)]
pub struct RecordingNavigator(Mutex<Vec<String>>);

impl RecordingNavigator {
    pub fn urls(&self) -> Vec<String> {
        self.0.lock().expect("navigator lock").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate_by_url(&self, url: &str) {
        self.0.lock().expect("navigator lock").push(url.to_string());
    }
}

#[derive(Default)]
pub struct RecordingNotifier(Mutex<Vec<(String, Duration)>>);

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.0
            .lock()
            .expect("notifier lock")
            .iter()
            .map(|(message, _)| message.clone())
            .collect()
    }

    pub fn durations(&self) -> Vec<Duration> {
        self.0
            .lock()
            .expect("notifier lock")
            .iter()
            .map(|(_, duration)| *duration)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn open(&self, message: &str, duration: Duration) {
        self.0
            .lock()
            .expect("notifier lock")
            .push((message.to_string(), duration));
    }
}

#[derive(Default)]
pub struct RecordingDiagnostics(Mutex<Vec<DiagnosticEvent>>);

impl RecordingDiagnostics {
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.0.lock().expect("diagnostics lock").clone()
    }

    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.events().into_iter().map(|event| event.kind).collect()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn report(&self, event: DiagnosticEvent) {
        self.0.lock().expect("diagnostics lock").push(event);
    }
}

/// A form whose validity is fixed up front.
pub struct FixedForm(pub bool);

impl BoundForm for FixedForm {
    fn is_valid(&self, _: &Student) -> bool {
        self.0
    }
}

pub struct Harness {
    pub api: Arc<MockStudentApi>,
    pub navigator: Arc<RecordingNavigator>,
    pub notifier: Arc<RecordingNotifier>,
    pub diagnostics: Arc<RecordingDiagnostics>,
}

impl Harness {
    pub fn new(api: MockStudentApi) -> Self {
        Self {
            api: Arc::new(api),
            navigator: Arc::default(),
            notifier: Arc::default(),
            diagnostics: Arc::default(),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            students: self.api.clone(),
            genders: self.api.clone(),
            navigator: self.navigator.clone(),
            notifier: self.notifier.clone(),
            diagnostics: self.diagnostics.clone(),
        }
    }

    pub fn unbound_controller(&self) -> EditorController {
        EditorController::new(self.collaborators(), Arc::new(EditorSettings::default()))
    }

    pub fn controller(&self, form_is_valid: bool) -> EditorController {
        self.unbound_controller().with_form(FixedForm(form_is_valid))
    }
}
