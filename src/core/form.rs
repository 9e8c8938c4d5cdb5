//! # Form Engine
//!
//! A form is an ordered list of named fields plus a trailing yes/no
//! `confirm` field. Input is fed one event at a time through
//! [`Form::update`]; once the confirm field is submitted (or the form is
//! abandoned with Esc) the form is complete and its values can be read back
//! with [`Form::get_string`] / [`Form::get_bool`].
//!
//! Completion with `confirm = false` is an ordinary outcome, not an error.
//! There is no other validation: empty strings are accepted.
//!
//! ```text
//! ┌ Project Name ─────┐
//! │ Target Folder     │   Enter/Tab/↓  next field
//! │ File Name         │   Shift+Tab/↑  previous field
//! │ Confirm  [Yes] No │   ←/→ y/n      toggle, Enter submits
//! └───────────────────┘   Esc          abandon (confirm = false)
//! ```

use crate::core::input::Input;
use crate::core::project::Project;

/// Key of the accept/decline field every form carries.
pub const CONFIRM_KEY: &str = "confirm";

pub const PROJECT_NAME_KEY: &str = "Name";
pub const PROJECT_FOLDER_KEY: &str = "Folder";
pub const PROJECT_FILE_KEY: &str = "File";
pub const VARIABLE_KEY_KEY: &str = "key";
pub const VARIABLE_VALUE_KEY: &str = "value";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text {
        value: String,
        /// Byte offset into `value`, always on a char boundary.
        cursor: usize,
    },
    Confirm {
        value: bool,
        affirmative: String,
        negative: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: FieldKind,
}

impl Field {
    pub fn text(key: &str, title: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.len();
        Self {
            key: key.to_string(),
            title: title.to_string(),
            description: None,
            kind: FieldKind::Text { value, cursor },
        }
    }

    pub fn confirm(title: &str, default: bool) -> Self {
        Self {
            key: CONFIRM_KEY.to_string(),
            title: title.to_string(),
            description: None,
            kind: FieldKind::Confirm {
                value: default,
                affirmative: "Yes".to_string(),
                negative: "No".to_string(),
            },
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_confirm(&self) -> bool {
        matches!(self.kind, FieldKind::Confirm { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub title: String,
    fields: Vec<Field>,
    focus: usize,
    complete: bool,
}

impl Form {
    /// Builds a form from `fields`. A default confirm field is appended
    /// when the caller did not supply one.
    pub fn new(title: impl Into<String>, mut fields: Vec<Field>) -> Self {
        if !fields.iter().any(|f| f.key == CONFIRM_KEY) {
            fields.push(Field::confirm("Confirm", true));
        }
        Self {
            title: title.into(),
            fields,
            focus: 0,
            complete: false,
        }
    }

    /// Create/edit form bound to the draft's values. The name field only
    /// exists on create: an existing project's name is its identity.
    pub fn project(draft: &Project, is_new: bool) -> Self {
        let mut fields = Vec::with_capacity(4);
        if is_new {
            fields.push(Field::text(PROJECT_NAME_KEY, "Project Name", draft.name.as_str()));
        }
        fields.push(Field::text(
            PROJECT_FOLDER_KEY,
            "Target Folder",
            draft.target_folder.as_str(),
        ));
        fields.push(Field::text(PROJECT_FILE_KEY, "File Name", draft.file_name.as_str()));
        fields.push(Field::confirm("Confirm Changes", true));

        let title = if is_new { "Creating Project" } else { "Editing Project" };
        Self::new(title, fields)
    }

    pub fn variable(key: &str, value: &str, is_new: bool) -> Self {
        let (title, confirm) = if is_new {
            ("Adding New Variable", "Add Variable")
        } else {
            ("Editing Variable", "Save Variable")
        };
        Self::new(
            title,
            vec![
                Field::text(VARIABLE_KEY_KEY, "Variable Key", key),
                Field::text(VARIABLE_VALUE_KEY, "Variable Value", value),
                Field::confirm(confirm, true),
            ],
        )
    }

    /// Yes/no dialog. Defaults to "No" so a stray Enter never destroys data.
    pub fn confirmation(message: &str, description: &str) -> Self {
        Self::new(
            "Confirm",
            vec![Field::confirm(message, false).with_description(description)],
        )
    }

    /// Feeds one input event. Returns whether the form is now complete.
    pub fn update(&mut self, input: &Input) -> bool {
        if self.complete {
            return true;
        }

        if matches!(input, Input::Esc | Input::Interrupt) {
            self.set_confirm(false);
            self.complete = true;
            return true;
        }

        match input {
            Input::Tab | Input::Down => self.focus_next(),
            Input::BackTab | Input::Up => self.focus_prev(),
            _ => {
                let is_last = self.focus + 1 == self.fields.len();
                let advance = match &mut self.fields[self.focus].kind {
                    FieldKind::Text { value, cursor } => {
                        if matches!(input, Input::Enter) {
                            true
                        } else {
                            edit_text(value, cursor, input);
                            false
                        }
                    }
                    FieldKind::Confirm { value, .. } => match input {
                        Input::Left | Input::Right | Input::Char('h') | Input::Char('l') => {
                            *value = !*value;
                            false
                        }
                        Input::Char('y') | Input::Char('Y') => {
                            *value = true;
                            false
                        }
                        Input::Char('n') | Input::Char('N') => {
                            *value = false;
                            false
                        }
                        Input::Enter if is_last => {
                            self.complete = true;
                            false
                        }
                        Input::Enter => true,
                        _ => false,
                    },
                };
                if advance {
                    self.focus_next();
                }
            }
        }

        self.complete
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(|f| match &f.kind {
            FieldKind::Text { value, .. } => Some(value.as_str()),
            FieldKind::Confirm { .. } => None,
        })
    }

    /// Missing and non-boolean fields read as `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.field(key)
            .map(|f| matches!(f.kind, FieldKind::Confirm { value: true, .. }))
            .unwrap_or(false)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    fn set_confirm(&mut self, accepted: bool) {
        for field in &mut self.fields {
            if let FieldKind::Confirm { value, .. } = &mut field.kind {
                *value = accepted;
            }
        }
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1).min(self.fields.len() - 1);
    }

    fn focus_prev(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }
}

fn edit_text(value: &mut String, cursor: &mut usize, input: &Input) {
    match input {
        Input::Char(c) => {
            value.insert(*cursor, *c);
            *cursor += c.len_utf8();
        }
        Input::Paste(text) => {
            let line: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
            value.insert_str(*cursor, &line);
            *cursor += line.len();
        }
        Input::Backspace => {
            if let Some((idx, _)) = value[..*cursor].char_indices().next_back() {
                value.drain(idx..*cursor);
                *cursor = idx;
            }
        }
        Input::Delete => {
            if let Some(c) = value[*cursor..].chars().next() {
                value.drain(*cursor..*cursor + c.len_utf8());
            }
        }
        Input::Left => {
            if let Some((idx, _)) = value[..*cursor].char_indices().next_back() {
                *cursor = idx;
            }
        }
        Input::Right => {
            if let Some(c) = value[*cursor..].chars().next() {
                *cursor += c.len_utf8();
            }
        }
        Input::Home => *cursor = 0,
        Input::End => *cursor = value.len(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(form: &mut Form, text: &str) {
        for c in text.chars() {
            form.update(&Input::Char(c));
        }
    }

    #[test]
    fn test_new_appends_confirm_field() {
        let form = Form::new("t", vec![Field::text("a", "A", "")]);
        assert_eq!(form.fields().len(), 2);
        assert!(form.fields()[1].is_confirm());
    }

    #[test]
    fn test_create_project_form_flow() {
        let draft = Project::default();
        let mut form = Form::project(&draft, true);

        type_text(&mut form, "db");
        assert!(!form.update(&Input::Enter));
        type_text(&mut form, "/d");
        form.update(&Input::Enter);
        type_text(&mut form, ".env");
        form.update(&Input::Enter);
        assert!(form.update(&Input::Enter));

        assert!(form.is_complete());
        assert_eq!(form.get_string(PROJECT_NAME_KEY), Some("db"));
        assert_eq!(form.get_string(PROJECT_FOLDER_KEY), Some("/d"));
        assert_eq!(form.get_string(PROJECT_FILE_KEY), Some(".env"));
        assert!(form.get_bool(CONFIRM_KEY));
    }

    #[test]
    fn test_edit_form_has_no_name_field() {
        let draft = Project::new("web", "/w", ".env");
        let form = Form::project(&draft, false);
        assert_eq!(form.get_string(PROJECT_NAME_KEY), None);
        assert_eq!(form.get_string(PROJECT_FOLDER_KEY), Some("/w"));
    }

    #[test]
    fn test_declining_completes_with_false() {
        let mut form = Form::variable("K", "V", false);
        form.update(&Input::Tab);
        form.update(&Input::Tab);
        form.update(&Input::Char('n'));
        assert!(form.update(&Input::Enter));
        assert!(!form.get_bool(CONFIRM_KEY));
        assert_eq!(form.get_string(VARIABLE_KEY_KEY), Some("K"));
    }

    #[test]
    fn test_escape_abandons_form() {
        let mut form = Form::variable("", "", true);
        type_text(&mut form, "PORT");
        assert!(form.update(&Input::Esc));
        assert!(!form.get_bool(CONFIRM_KEY));
    }

    #[test]
    fn test_confirmation_defaults_to_no() {
        let mut form = Form::confirmation("Delete?", "Project 'web'");
        assert!(form.update(&Input::Enter));
        assert!(!form.get_bool(CONFIRM_KEY));

        let mut form = Form::confirmation("Delete?", "Project 'web'");
        form.update(&Input::Left);
        assert!(form.update(&Input::Enter));
        assert!(form.get_bool(CONFIRM_KEY));
    }

    #[test]
    fn test_empty_strings_are_accepted() {
        let mut form = Form::variable("", "", true);
        form.update(&Input::Enter);
        form.update(&Input::Enter);
        assert!(form.update(&Input::Enter));
        assert_eq!(form.get_string(VARIABLE_KEY_KEY), Some(""));
        assert!(form.get_bool(CONFIRM_KEY));
    }

    #[test]
    fn test_text_editing_respects_char_boundaries() {
        let mut form = Form::variable("", "", true);
        type_text(&mut form, "héllo");
        form.update(&Input::Left);
        form.update(&Input::Left);
        form.update(&Input::Left);
        form.update(&Input::Backspace);
        assert_eq!(form.get_string(VARIABLE_KEY_KEY), Some("hllo"));
        form.update(&Input::Home);
        form.update(&Input::Delete);
        assert_eq!(form.get_string(VARIABLE_KEY_KEY), Some("llo"));
        form.update(&Input::Paste("A\nB".to_string()));
        assert_eq!(form.get_string(VARIABLE_KEY_KEY), Some("ABllo"));
    }

    #[test]
    fn test_updates_after_completion_are_ignored() {
        let mut form = Form::confirmation("Delete?", "x");
        form.update(&Input::Esc);
        form.update(&Input::Char('y'));
        assert!(!form.get_bool(CONFIRM_KEY));
    }
}
