use crate::{
    editor::{EditorSnapshot, phase::EditorMode},
    maud_conveniences::{select_element, simple_form_element, title},
};
use maud::{DOCTYPE, Markup, html};

pub fn render_page(snapshot: &EditorSnapshot) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8" {}
                meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                title { (snapshot.header) }
            }
            body class="bg-gray-900 h-screen flex flex-col items-center justify-center text-white" {
                (render_editor(snapshot))
            }
        }
    }
}

pub fn render_editor(snapshot: &EditorSnapshot) -> Markup {
    let student = &snapshot.student;
    let genders = snapshot
        .genders
        .iter()
        .map(|gender| (gender.id.clone(), gender.description.clone()));
    let mobile = if student.mobile == 0 {
        String::new()
    } else {
        student.mobile.to_string()
    };

    html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-4xl w-full flex flex-col space-y-4" {
            (title(snapshot.header.as_str()))

            div class="flex flex-row space-x-8" {
                div class="flex flex-col items-center space-y-2" {
                    img src=(snapshot.display_image_url) alt="Profile image" class="w-48 h-48 rounded-full object-cover" {}
                    @if snapshot.mode() == Some(EditorMode::Edit) {
                        label for="profile_image" class="text-sm text-gray-300 cursor-pointer" {"Change image"}
                        input type="file" accept="image/*" id="profile_image" name="profile_image" class="text-sm" {}
                    }
                }

                form id="student_details" class="p-4 flex-1" {
                    (simple_form_element("first_name", "First Name", true, None, &student.first_name))
                    (simple_form_element("last_name", "Last Name", true, None, &student.last_name))
                    (simple_form_element("date_of_birth", "Date of Birth", true, Some("date"), student.date_of_birth.get(..10).unwrap_or(student.date_of_birth.as_str())))
                    (simple_form_element("email", "Email", true, Some("email"), &student.email))
                    (simple_form_element("mobile", "Mobile", true, Some("tel"), &mobile))
                    (select_element("gender_id", "Gender", &student.gender_id, genders))
                    (simple_form_element("physical_address", "Physical Address", false, None, &student.address.physical_address))
                    (simple_form_element("postal_address", "Postal Address", false, None, &student.address.postal_address))

                    div class="flex items-center justify-between" {
                        @match snapshot.mode() {
                            Some(EditorMode::Create) => {
                                button type="submit" disabled[!snapshot.form_is_valid] class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded" {"Add"}
                            }
                            Some(EditorMode::Edit) => {
                                button type="submit" disabled[!snapshot.form_is_valid] class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded" {"Save"}
                                button type="button" class="bg-red-600 hover:bg-red-800 font-bold py-2 px-4 rounded" {"Delete"}
                            }
                            None => {}
                        }
                    }
                }
            }
        }
    }
}
