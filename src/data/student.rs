use crate::{
    data::Gender,
    error::{EditorError, EditorResult, MissingGenderSnafu, ParseNumberSnafu},
};
use serde::{Deserialize, Serialize};
use snafu::{OptionExt, ResultExt};
use std::str::FromStr;

/// The working copy of a student record.
///
/// An empty `id` means the record has never been saved. The embedded `gender`
/// and `address` also carry empty-string ids until the server assigns them, so
/// every field the form binds to always exists.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub email: String,
    pub mobile: u64,
    pub gender_id: String,
    pub profile_image_url: String,
    pub gender: Gender,
    pub address: Address,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub id: String,
    pub physical_address: String,
    pub postal_address: String,
}

impl Student {
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }

    /// Applies a single form edit. Choosing a gender also refreshes the
    /// denormalized copy from `genders`.
    pub fn set_field(
        &mut self,
        field: StudentField,
        value: impl Into<String>,
        genders: &[Gender],
    ) -> EditorResult<()> {
        let value = value.into();
        match field {
            StudentField::FirstName => self.first_name = value,
            StudentField::LastName => self.last_name = value,
            StudentField::DateOfBirth => self.date_of_birth = value,
            StudentField::Email => self.email = value,
            StudentField::Mobile => {
                self.mobile = value.trim().parse::<u64>().context(ParseNumberSnafu {
                    name: "mobile",
                    original: value.clone(),
                })?;
            }
            StudentField::Gender => {
                let gender = genders
                    .iter()
                    .find(|gender| gender.id == value)
                    .context(MissingGenderSnafu { id: value.clone() })?;
                self.gender_id.clone_from(&gender.id);
                self.gender = gender.clone();
            }
            StudentField::PhysicalAddress => self.address.physical_address = value,
            StudentField::PostalAddress => self.address.postal_address = value,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentField {
    FirstName,
    LastName,
    DateOfBirth,
    Email,
    Mobile,
    Gender,
    PhysicalAddress,
    PostalAddress,
}

impl FromStr for StudentField {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "firstName" | "first_name" => Self::FirstName,
            "lastName" | "last_name" => Self::LastName,
            "dateOfBirth" | "date_of_birth" => Self::DateOfBirth,
            "email" => Self::Email,
            "mobile" => Self::Mobile,
            "gender" | "genderId" | "gender_id" => Self::Gender,
            "physicalAddress" | "physical_address" => Self::PhysicalAddress,
            "postalAddress" | "postal_address" => Self::PostalAddress,
            _ => {
                return Err(EditorError::UnknownField {
                    name: s.to_string(),
                });
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_student_uses_empty_sentinels() {
        let student = Student::default();
        assert!(!student.is_persisted());
        assert_eq!(student.gender.id, "");
        assert_eq!(student.address.id, "");
        assert_eq!(student.profile_image_url, "");
    }

    #[test]
    fn wire_format_is_camel_case_and_tolerates_missing_fields() {
        let student: Student = serde_json::from_str(
            r#"{"id":"7","firstName":"Ada","profileImageUrl":"images/7.png","address":{"postalAddress":"PO Box 1"}}"#,
        )
        .expect("partial student should deserialize");

        assert_eq!(student.id, "7");
        assert_eq!(student.first_name, "Ada");
        assert_eq!(student.profile_image_url, "images/7.png");
        assert_eq!(student.address.postal_address, "PO Box 1");
        assert_eq!(student.address.id, "");

        let json = serde_json::to_value(&student).expect("student should serialize");
        assert!(json.get("dateOfBirth").is_some());
        assert!(json.get("date_of_birth").is_none());
    }

    #[test]
    fn selecting_gender_refreshes_embedded_copy() {
        let genders = vec![Gender::new("g1", "Female"), Gender::new("g2", "Male")];
        let mut student = Student::default();

        student
            .set_field(StudentField::Gender, "g2", &genders)
            .expect("known gender should be selectable");

        assert_eq!(student.gender_id, "g2");
        assert_eq!(student.gender, Gender::new("g2", "Male"));
    }

    #[test]
    fn unknown_gender_and_bad_mobile_are_rejected() {
        let mut student = Student::default();

        let err = student
            .set_field(StudentField::Gender, "nope", &[])
            .expect_err("unknown gender should fail");
        assert!(matches!(err, EditorError::MissingGender { .. }));

        let err = student
            .set_field(StudentField::Mobile, "12ab", &[])
            .expect_err("non-numeric mobile should fail");
        assert!(matches!(err, EditorError::ParseNumber { name: "mobile", .. }));
        assert_eq!(student.mobile, 0);
    }

    #[test]
    fn field_names_parse_in_both_cases() {
        assert_eq!(
            "firstName".parse::<StudentField>().expect("camel case"),
            StudentField::FirstName
        );
        assert_eq!(
            "postal_address".parse::<StudentField>().expect("snake case"),
            StudentField::PostalAddress
        );
        assert!("shoe_size".parse::<StudentField>().is_err());
    }
}
