//! The request/response surface the editor talks to. Transport is up to the
//! implementation; the editor only ever sees these traits.

use crate::{
    data::{Gender, ImageUpload, Student, UploadedImage},
    error::EditorResult,
};
use async_trait::async_trait;

pub mod in_memory;

pub use in_memory::InMemoryStudentApi;

#[async_trait]
pub trait StudentApi: Send + Sync {
    async fn get_student(&self, id: &str) -> EditorResult<Student>;
    async fn update_student(&self, id: &str, student: Student) -> EditorResult<Student>;
    async fn delete_student(&self, id: &str) -> EditorResult<()>;
    /// Returns the stored record, including the id the API assigned.
    async fn add_student(&self, student: Student) -> EditorResult<Student>;
    async fn upload_image(&self, id: &str, image: ImageUpload) -> EditorResult<UploadedImage>;

    /// Maps a stored image reference to a fetchable URL. Must not block.
    fn get_image_path(&self, relative_path: &str) -> String;
}

#[async_trait]
pub trait GenderApi: Send + Sync {
    async fn get_gender_list(&self) -> EditorResult<Vec<Gender>>;
}
