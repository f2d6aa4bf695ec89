use maud::{Markup, Render, html};

const INPUT_CLASSES: &str = "shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600";

pub fn title(s: impl Render) -> Markup {
    html! {
        h1 class="text-2xl font-semibold mb-4" {(s)}
    }
}

pub fn form_element(id: &'static str, label: &'static str, input: Markup) -> Markup {
    html! {
        div class="mb-4" {
            label for=(id) class="block text-sm font-bold mb-2 text-gray-300" {(label)}
            (input)
        }
    }
}

pub fn simple_form_element(
    id: &'static str,
    label: &'static str,
    required: bool,
    input_type: Option<&'static str>,
    value: &str,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            input required[required] type=(input_type.unwrap_or("text")) id=(id) name=(id) value=(value) class=(INPUT_CLASSES) {}
        },
    )
}

pub fn select_element(
    id: &'static str,
    label: &'static str,
    selected: &str,
    options: impl IntoIterator<Item = (String, String)>,
) -> Markup {
    form_element(
        id,
        label,
        html! {
            select required id=(id) name=(id) class=(INPUT_CLASSES) {
                option value="" selected[selected.is_empty()] {"Select..."}
                @for (value, text) in options {
                    option value=(value) selected[value == selected] {(text)}
                }
            }
        },
    )
}
