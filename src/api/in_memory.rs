use crate::{
    api::{GenderApi, StudentApi},
    config::ApiConfig,
    data::{Gender, ImageUpload, Student, UploadedImage},
    error::{EditorResult, MissingGenderSnafu, MissingStudentSnafu},
};
use async_trait::async_trait;
use snafu::OptionExt;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

/// An in-process stand-in for the remote student API.
#[derive(Debug)]
pub struct InMemoryStudentApi {
    students: RwLock<HashMap<String, Student>>,
    images: RwLock<HashMap<String, Vec<u8>>>,
    genders: Vec<Gender>,
    api_config: Arc<ApiConfig>,
}

impl InMemoryStudentApi {
    pub fn new(api_config: Arc<ApiConfig>, genders: Vec<Gender>) -> Self {
        Self {
            students: RwLock::default(),
            images: RwLock::default(),
            genders,
            api_config,
        }
    }

    pub fn with_default_genders(api_config: Arc<ApiConfig>) -> Self {
        let genders = ["Female", "Male", "Other"]
            .into_iter()
            .map(|description| Gender::new(Uuid::new_v4().to_string(), description))
            .collect();
        Self::new(api_config, genders)
    }

    pub fn genders(&self) -> &[Gender] {
        &self.genders
    }

    pub async fn image_bytes(&self, relative_path: &str) -> Option<Vec<u8>> {
        self.images.read().await.get(relative_path).cloned()
    }

    fn resolve_gender(&self, student: &mut Student) -> EditorResult<()> {
        if student.gender_id.is_empty() {
            student.gender = Gender::default();
            return Ok(());
        }
        let gender = self
            .genders
            .iter()
            .find(|gender| gender.id == student.gender_id)
            .context(MissingGenderSnafu {
                id: student.gender_id.clone(),
            })?;
        student.gender = gender.clone();
        Ok(())
    }
}

#[async_trait]
impl StudentApi for InMemoryStudentApi {
    async fn get_student(&self, id: &str) -> EditorResult<Student> {
        self.students
            .read()
            .await
            .get(id)
            .cloned()
            .context(MissingStudentSnafu { id })
    }

    async fn update_student(&self, id: &str, mut student: Student) -> EditorResult<Student> {
        self.resolve_gender(&mut student)?;

        let mut students = self.students.write().await;
        let existing = students.get_mut(id).context(MissingStudentSnafu { id })?;

        //the image only changes through uploads, and ids never change
        student.id = existing.id.clone();
        student.address.id = existing.address.id.clone();
        student.profile_image_url = existing.profile_image_url.clone();
        *existing = student.clone();

        Ok(student)
    }

    async fn delete_student(&self, id: &str) -> EditorResult<()> {
        let removed = self
            .students
            .write()
            .await
            .remove(id)
            .context(MissingStudentSnafu { id })?;

        if !removed.profile_image_url.is_empty() {
            self.images.write().await.remove(&removed.profile_image_url);
        }
        Ok(())
    }

    async fn add_student(&self, mut student: Student) -> EditorResult<Student> {
        self.resolve_gender(&mut student)?;

        student.id = Uuid::new_v4().to_string();
        student.address.id = Uuid::new_v4().to_string();
        student.profile_image_url = String::new();

        self.students
            .write()
            .await
            .insert(student.id.clone(), student.clone());
        debug!(id = %student.id, "stored new student");
        Ok(student)
    }

    async fn upload_image(&self, id: &str, image: ImageUpload) -> EditorResult<UploadedImage> {
        let mut students = self.students.write().await;
        let student = students.get_mut(id).context(MissingStudentSnafu { id })?;

        let relative_path = format!("images/{id}.{}", image.extension);
        self.images
            .write()
            .await
            .insert(relative_path.clone(), image.bytes);
        student.profile_image_url.clone_from(&relative_path);
        debug!(%id, %relative_path, content_type = %image.content_type, "stored profile image");

        Ok(UploadedImage {
            id: id.to_string(),
            profile_image_url: relative_path,
        })
    }

    fn get_image_path(&self, relative_path: &str) -> String {
        self.api_config.image_path(relative_path)
    }
}

#[async_trait]
impl GenderApi for InMemoryStudentApi {
    async fn get_gender_list(&self) -> EditorResult<Vec<Gender>> {
        Ok(self.genders.clone())
    }
}
