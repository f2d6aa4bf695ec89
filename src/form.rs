use crate::data::Student;
use email_address::EmailAddress;
use jiff::{
    Timestamp,
    civil::{Date, DateTime},
};

/// The form bound to the editor. The editor only ever asks whether it is valid.
pub trait BoundForm: Send {
    fn is_valid(&self, student: &Student) -> bool;
}

/// The rules of the student details form.
#[derive(Debug, Default, Clone, Copy)]
pub struct StudentDetailsForm;

impl StudentDetailsForm {
    /// Names of the fields that currently fail validation.
    pub fn invalid_fields(student: &Student) -> Vec<&'static str> {
        let mut invalid = Vec::new();
        if student.first_name.trim().is_empty() {
            invalid.push("firstName");
        }
        if student.last_name.trim().is_empty() {
            invalid.push("lastName");
        }
        if !EmailAddress::is_valid(student.email.trim()) {
            invalid.push("email");
        }
        if !is_date_of_birth(&student.date_of_birth) {
            invalid.push("dateOfBirth");
        }
        if student.mobile == 0 {
            invalid.push("mobile");
        }
        if student.gender_id.is_empty() {
            invalid.push("genderId");
        }
        invalid
    }
}

impl BoundForm for StudentDetailsForm {
    fn is_valid(&self, student: &Student) -> bool {
        let invalid = Self::invalid_fields(student);
        if !invalid.is_empty() {
            debug!(?invalid, "student form invalid");
        }
        invalid.is_empty()
    }
}

//the API hands dates back as date-times, with or without an offset or `Z`,
//the date picker sends plain dates
fn is_date_of_birth(raw: &str) -> bool {
    let raw = raw.trim();
    raw.parse::<Date>().is_ok()
        || raw.parse::<DateTime>().is_ok()
        || raw.parse::<Timestamp>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_student() -> Student {
        Student {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            date_of_birth: "1815-12-10".into(),
            email: "ada@example.com".into(),
            mobile: 447_700_900_000,
            gender_id: "g1".into(),
            ..Student::default()
        }
    }

    #[test]
    fn complete_student_is_valid() {
        assert!(StudentDetailsForm.is_valid(&valid_student()));

        let api_shaped = Student {
            date_of_birth: "1815-12-10T00:00:00".into(),
            ..valid_student()
        };
        assert!(StudentDetailsForm.is_valid(&api_shaped));
    }

    #[test]
    fn utc_and_offset_dates_are_accepted() {
        for date_of_birth in ["2000-01-01T00:00:00Z", "2000-01-01T00:00:00+02:00"] {
            let student = Student {
                date_of_birth: date_of_birth.into(),
                ..valid_student()
            };
            assert!(
                StudentDetailsForm::invalid_fields(&student).is_empty(),
                "{date_of_birth} should be a valid date of birth"
            );
        }
    }

    #[test]
    fn empty_student_fails_every_rule() {
        assert_eq!(
            StudentDetailsForm::invalid_fields(&Student::default()),
            vec!["firstName", "lastName", "email", "dateOfBirth", "mobile", "genderId"]
        );
    }

    #[test]
    fn malformed_email_and_date_are_caught() {
        let student = Student {
            email: "not an email".into(),
            date_of_birth: "10/12/1815".into(),
            ..valid_student()
        };
        assert_eq!(
            StudentDetailsForm::invalid_fields(&student),
            vec!["email", "dateOfBirth"]
        );
    }
}
