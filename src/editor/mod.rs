//! The student editor: turns route emissions and user commands into calls on
//! the student API, and sequences the feedback that follows.
//!
//! Everything runs on the task that owns the [`EditorController`]. Requests are
//! futures parked in the controller and their completions are applied one at a
//! time, so the working copy never needs a lock.

use crate::{
    api::{GenderApi, StudentApi},
    config::EditorSettings,
    data::{FileInput, Gender, ImageUpload, Student, StudentField, UploadedImage},
    diagnostics::{DiagnosticEvent, DiagnosticKind, DiagnosticSink},
    error::EditorResult,
    feedback::{Navigator, Notifier},
    form::BoundForm,
    route::{ParamMap, is_add_sentinel},
};
use futures::{
    FutureExt, Stream, StreamExt,
    future::BoxFuture,
    stream::FuturesUnordered,
};
use phase::{EditorMode, EditorPhase, PhaseEvent, PhaseMachine};
use std::{pin::Pin, sync::Arc};
use tokio::{
    sync::{mpsc::UnboundedReceiver, oneshot},
    time::{Sleep, sleep},
};

pub mod phase;
pub mod view;

#[cfg(test)]
mod test_support;

pub const ADD_HEADER: &str = "Add New Student";
pub const EDIT_HEADER: &str = "Edit Student";
pub const UPDATED_MESSAGE: &str = "Student updated successfully!";
pub const ADDED_MESSAGE: &str = "Student added successfully!";
pub const DELETED_MESSAGE: &str = "Student deleted successfully!";
pub const IMAGE_UPDATED_MESSAGE: &str = "Image updated successfully!";

/// Everything outside the editor that it calls into.
#[derive(Clone)]
pub struct Collaborators {
    pub students: Arc<dyn StudentApi>,
    pub genders: Arc<dyn GenderApi>,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub diagnostics: Arc<dyn DiagnosticSink>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    Update,
    Create,
    Delete,
    Upload,
}

impl EditorAction {
    const fn diagnostic_kind(self) -> DiagnosticKind {
        match self {
            Self::Update => DiagnosticKind::Update,
            Self::Create => DiagnosticKind::Create,
            Self::Delete => DiagnosticKind::Delete,
            Self::Upload => DiagnosticKind::Upload,
        }
    }
}

pub enum EditorCommand {
    SetField(StudentField, String),
    /// Create or update, depending on the mode.
    Save,
    Update,
    Create,
    Delete,
    UploadImage(FileInput),
    Snapshot(oneshot::Sender<EditorSnapshot>),
    Deactivate,
}

#[derive(Debug, Clone)]
pub struct EditorSnapshot {
    pub phase: EditorPhase,
    pub header: String,
    pub route_id: Option<String>,
    pub student: Student,
    pub genders: Vec<Gender>,
    pub display_image_url: String,
    pub form_is_valid: bool,
}

impl EditorSnapshot {
    pub fn mode(&self) -> Option<EditorMode> {
        self.phase.mode()
    }
}

enum Completion {
    Record(EditorResult<Student>),
    Genders(EditorResult<Vec<Gender>>),
    Updated(EditorResult<Student>),
    Created(EditorResult<Student>),
    Deleted(EditorResult<()>),
    Uploaded(EditorResult<UploadedImage>),
}

struct PendingRedirect {
    timer: Pin<Box<Sleep>>,
    target: String,
}

pub struct EditorController {
    collaborators: Collaborators,
    settings: Arc<EditorSettings>,
    form: Option<Box<dyn BoundForm>>,
    machine: PhaseMachine,
    route_id: Option<String>,
    header: String,
    student: Student,
    genders: Vec<Gender>,
    display_image_url: String,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
    action_in_flight: Option<EditorAction>,
    pending_redirect: Option<PendingRedirect>,
}

impl EditorController {
    pub fn new(collaborators: Collaborators, settings: Arc<EditorSettings>) -> Self {
        Self {
            collaborators,
            settings,
            form: None,
            machine: PhaseMachine::new(),
            route_id: None,
            header: String::new(),
            student: Student::default(),
            genders: Vec::new(),
            display_image_url: String::new(),
            in_flight: FuturesUnordered::new(),
            action_in_flight: None,
            pending_redirect: None,
        }
    }

    #[must_use]
    pub fn with_form(mut self, form: impl BoundForm + 'static) -> Self {
        self.bind_form(form);
        self
    }

    pub fn bind_form(&mut self, form: impl BoundForm + 'static) {
        self.form = Some(Box::new(form));
    }

    pub const fn phase(&self) -> EditorPhase {
        self.machine.phase()
    }

    pub const fn mode(&self) -> Option<EditorMode> {
        self.machine.phase().mode()
    }

    pub fn is_new_student(&self) -> bool {
        self.mode() == Some(EditorMode::Create)
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn route_id(&self) -> Option<&str> {
        self.route_id.as_deref()
    }

    pub const fn student(&self) -> &Student {
        &self.student
    }

    pub fn genders(&self) -> &[Gender] {
        &self.genders
    }

    pub fn display_image_url(&self) -> &str {
        &self.display_image_url
    }

    /// An unbound form is never valid.
    pub fn form_is_valid(&self) -> bool {
        self.form
            .as_ref()
            .is_some_and(|form| form.is_valid(&self.student))
    }

    pub fn has_pending_redirect(&self) -> bool {
        self.pending_redirect.is_some()
    }

    pub fn has_pending_work(&self) -> bool {
        !self.in_flight.is_empty() || self.pending_redirect.is_some()
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            phase: self.phase(),
            header: self.header.clone(),
            route_id: self.route_id.clone(),
            student: self.student.clone(),
            genders: self.genders.clone(),
            display_image_url: self.display_image_url.clone(),
            form_is_valid: self.form_is_valid(),
        }
    }

    /// Handles one emission of the route. Each emission with an id is a fresh
    /// activation: earlier requests and any scheduled redirect are dropped.
    pub fn on_params(&mut self, params: &ParamMap) -> EditorResult<()> {
        let Some(id) = params.id() else {
            debug!(?params, "route emitted without an id, nothing to do");
            return Ok(());
        };

        let event = if is_add_sentinel(id) {
            PhaseEvent::ResolveCreate
        } else {
            PhaseEvent::ResolveEdit
        };
        self.machine.transition(event)?;
        self.cancel_outstanding();

        self.route_id = Some(id.to_string());
        self.student = Student::default();
        self.genders.clear();

        if event == PhaseEvent::ResolveCreate {
            info!("editing a new student");
            self.header = ADD_HEADER.to_string();
        } else {
            info!(%id, "editing an existing student");
            self.header = EDIT_HEADER.to_string();

            let students = self.collaborators.students.clone();
            let id = id.to_string();
            self.in_flight.push(
                async move { Completion::Record(students.get_student(&id).await) }.boxed(),
            );
        }
        self.set_image();

        let genders = self.collaborators.genders.clone();
        self.in_flight
            .push(async move { Completion::Genders(genders.get_gender_list().await) }.boxed());

        Ok(())
    }

    pub fn set_field(&mut self, field: StudentField, value: impl Into<String>) -> EditorResult<()> {
        self.student.set_field(field, value, &self.genders)
    }

    pub fn save(&mut self) {
        match self.mode() {
            Some(EditorMode::Create) => self.on_add(),
            Some(EditorMode::Edit) => self.on_update(),
            None => debug!("save requested before the route resolved"),
        }
    }

    pub fn on_update(&mut self) {
        if !self.form_is_valid() {
            debug!("update skipped, form invalid");
            return;
        }
        if !self.begin(EditorAction::Update) {
            return;
        }

        let students = self.collaborators.students.clone();
        let id = self.student.id.clone();
        let student = self.student.clone();
        self.in_flight.push(
            async move { Completion::Updated(students.update_student(&id, student).await) }
                .boxed(),
        );
    }

    pub fn on_add(&mut self) {
        if !self.form_is_valid() {
            debug!("add skipped, form invalid");
            return;
        }
        if !self.begin(EditorAction::Create) {
            return;
        }

        let students = self.collaborators.students.clone();
        let student = self.student.clone();
        self.in_flight
            .push(async move { Completion::Created(students.add_student(student).await) }.boxed());
    }

    pub fn on_delete(&mut self) {
        if !self.student.is_persisted() {
            self.report(DiagnosticEvent::new(
                DiagnosticKind::RejectedInput,
                "delete",
                "no saved student to delete",
            ));
            return;
        }
        if !self.begin(EditorAction::Delete) {
            return;
        }

        let students = self.collaborators.students.clone();
        let id = self.student.id.clone();
        self.in_flight
            .push(async move { Completion::Deleted(students.delete_student(&id).await) }.boxed());
    }

    pub fn upload_image(&mut self, input: &FileInput) {
        if self.route_id.is_none() || !self.student.is_persisted() {
            self.report(DiagnosticEvent::new(
                DiagnosticKind::RejectedInput,
                "upload",
                "no active student to attach an image to",
            ));
            return;
        }
        let upload = match ImageUpload::from_input(input) {
            Ok(upload) => upload,
            Err(e) => {
                self.report(DiagnosticEvent::from_error(
                    DiagnosticKind::RejectedInput,
                    "upload",
                    &e,
                ));
                return;
            }
        };
        if !self.begin(EditorAction::Upload) {
            return;
        }

        debug!(id = %self.student.id, file = %upload.file_name, "uploading profile image");
        let students = self.collaborators.students.clone();
        let id = self.student.id.clone();
        self.in_flight.push(
            async move { Completion::Uploaded(students.upload_image(&id, upload).await) }.boxed(),
        );
    }

    /// Waits for the next request to finish or the scheduled redirect to fire,
    /// and applies it. Returns `false` straight away when nothing is pending.
    pub async fn step(&mut self) -> bool {
        enum Next {
            Completion(Completion),
            Redirect,
        }

        let has_in_flight = !self.in_flight.is_empty();
        let has_redirect = self.pending_redirect.is_some();
        let in_flight = &mut self.in_flight;
        let redirect = &mut self.pending_redirect;

        let next = tokio::select! {
            Some(completion) = in_flight.next(), if has_in_flight => Next::Completion(completion),
            () = async {
                if let Some(pending) = redirect.as_mut() {
                    pending.timer.as_mut().await;
                }
            }, if has_redirect => Next::Redirect,
            else => return false,
        };

        match next {
            Next::Completion(completion) => self.apply(completion),
            Next::Redirect => {
                if let Some(PendingRedirect { target, .. }) = self.pending_redirect.take() {
                    info!(%target, "navigating");
                    self.collaborators.navigator.navigate_by_url(&target);
                }
            }
        }
        true
    }

    /// Runs [`Self::step`] until no request or redirect is left.
    pub async fn settle(&mut self) {
        while self.step().await {}
    }

    /// Tears the editor down. Requests still in flight are dropped and a
    /// scheduled redirect never fires.
    pub fn deactivate(&mut self) {
        self.cancel_outstanding();
        if self.phase() != EditorPhase::Closed {
            if let Err(e) = self.machine.transition(PhaseEvent::Deactivate) {
                warn!(?e, "unable to close editor");
            }
        }
    }

    pub fn dispatch(&mut self, command: EditorCommand) {
        match command {
            EditorCommand::SetField(field, value) => {
                if let Err(e) = self.set_field(field, value) {
                    self.report(DiagnosticEvent::from_error(
                        DiagnosticKind::RejectedInput,
                        format!("{field:?}"),
                        &e,
                    ));
                }
            }
            EditorCommand::Save => self.save(),
            EditorCommand::Update => self.on_update(),
            EditorCommand::Create => self.on_add(),
            EditorCommand::Delete => self.on_delete(),
            EditorCommand::UploadImage(input) => self.upload_image(&input),
            EditorCommand::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            EditorCommand::Deactivate => self.deactivate(),
        }
    }

    /// Drives the editor for as long as the route stream and the command
    /// channel stay open, then tears it down and hands back the final state.
    pub async fn run(
        mut self,
        mut params: impl Stream<Item = ParamMap> + Unpin,
        mut commands: UnboundedReceiver<EditorCommand>,
    ) -> EditorSnapshot {
        loop {
            //route changes first, so commands always see the current activation
            tokio::select! {
                biased;
                emitted = params.next() => match emitted {
                    Some(params) => {
                        if let Err(e) = self.on_params(&params) {
                            warn!(?e, "unable to handle route parameters");
                        }
                    }
                    None => {
                        debug!("route stream closed");
                        break;
                    }
                },
                command = commands.recv() => match command {
                    Some(EditorCommand::Deactivate) | None => break,
                    Some(command) => self.dispatch(command),
                },
                _ = self.step(), if self.has_pending_work() => {}
            }
        }

        self.deactivate();
        self.snapshot()
    }

    fn begin(&mut self, action: EditorAction) -> bool {
        let busy = if self.phase() == EditorPhase::Closed {
            Some("editor is closed".to_string())
        } else if let Some(running) = self.action_in_flight {
            Some(format!("{running:?} still in flight"))
        } else {
            self.pending_redirect
                .as_ref()
                .map(|pending| format!("leaving for {}", pending.target))
        };

        if let Some(reason) = busy {
            self.report(DiagnosticEvent::new(
                DiagnosticKind::Ignored,
                format!("{action:?}"),
                reason,
            ));
            return false;
        }

        self.action_in_flight = Some(action);
        true
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Record(result) => {
                match result {
                    Ok(student) => self.student = student,
                    Err(e) => {
                        let context = self.route_id.clone().unwrap_or_default();
                        self.report(DiagnosticEvent::from_error(
                            DiagnosticKind::LoadRecord,
                            context,
                            &e,
                        ));
                    }
                }
                self.set_image();
                if self.phase() == EditorPhase::Loading {
                    if let Err(e) = self.machine.transition(PhaseEvent::RecordSettled) {
                        warn!(?e, "unable to leave loading");
                    }
                }
            }
            Completion::Genders(Ok(genders)) => self.genders = genders,
            Completion::Genders(Err(e)) => {
                self.genders.clear();
                self.report(DiagnosticEvent::from_error(
                    DiagnosticKind::LoadGenders,
                    "gender list",
                    &e,
                ));
            }
            Completion::Updated(result) => {
                if self.finish(EditorAction::Update, result).is_some() {
                    self.notify(UPDATED_MESSAGE);
                }
            }
            Completion::Created(result) => {
                if let Some(created) = self.finish(EditorAction::Create, result) {
                    self.notify(ADDED_MESSAGE);
                    self.schedule_redirect(self.settings.detail_path(&created.id));
                }
            }
            Completion::Deleted(result) => {
                if self.finish(EditorAction::Delete, result).is_some() {
                    self.notify(DELETED_MESSAGE);
                    self.schedule_redirect(self.settings.collection_path.clone());
                }
            }
            Completion::Uploaded(result) => {
                if let Some(uploaded) = self.finish(EditorAction::Upload, result) {
                    self.student.profile_image_url = uploaded.profile_image_url;
                    self.set_image();
                    self.notify(IMAGE_UPDATED_MESSAGE);
                    //the response id, even though the student already existed
                    self.schedule_redirect(self.settings.detail_path(&uploaded.id));
                }
            }
        }
    }

    fn finish<T>(&mut self, action: EditorAction, result: EditorResult<T>) -> Option<T> {
        self.action_in_flight = None;
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                let context = if self.student.id.is_empty() {
                    format!("{action:?}")
                } else {
                    format!("{action:?} {}", self.student.id)
                };
                self.report(DiagnosticEvent::from_error(
                    action.diagnostic_kind(),
                    context,
                    &e,
                ));
                None
            }
        }
    }

    fn set_image(&mut self) {
        self.display_image_url = if self.student.profile_image_url.is_empty() {
            self.settings.default_image.clone()
        } else {
            self.collaborators
                .students
                .get_image_path(&self.student.profile_image_url)
        };
    }

    fn notify(&self, message: &str) {
        self.collaborators
            .notifier
            .open(message, self.settings.notification_duration);
    }

    fn schedule_redirect(&mut self, target: String) {
        debug!(%target, delay = ?self.settings.redirect_delay, "redirect scheduled");
        self.pending_redirect = Some(PendingRedirect {
            timer: Box::pin(sleep(self.settings.redirect_delay)),
            target,
        });
    }

    fn report(&self, event: DiagnosticEvent) {
        self.collaborators.diagnostics.report(event);
    }

    fn cancel_outstanding(&mut self) {
        if self.has_pending_work() {
            debug!(
                requests = self.in_flight.len(),
                redirect = self.pending_redirect.is_some(),
                "dropping outstanding editor work"
            );
        }
        self.in_flight = FuturesUnordered::new();
        self.action_in_flight = None;
        self.pending_redirect = None;
    }
}
