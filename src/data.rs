pub mod gender;
pub mod image;
pub mod student;

pub use gender::Gender;
pub use image::{FileInput, ImageUpload, SelectedFile, UploadedImage};
pub use student::{Address, Student, StudentField};
