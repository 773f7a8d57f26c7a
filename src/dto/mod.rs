use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use std::collections::BTreeMap;

use crate::models::{NoteChanges, NoteDraft, ProfileChanges};

pub const TITLE_MAX_CHARS: usize = 200;

/// Per-field validation messages, keyed by input field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Wire input that can be checked and turned into a typed command.
pub trait Validate {
    type Valid;

    fn validate(self) -> Result<Self::Valid, FieldErrors>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProfileUpdateInput {
    /// Display name, at least one character
    pub name: Option<String>,
    /// IANA zone name, at least one character
    pub timezone: Option<String>,
}

impl Validate for ProfileUpdateInput {
    type Valid = ProfileChanges;

    fn validate(self) -> Result<ProfileChanges, FieldErrors> {
        let mut errors = FieldErrors::default();
        let name = required_text(&mut errors, "name", self.name, "Name is required");
        let timezone = required_text(
            &mut errors,
            "timezone",
            self.timezone,
            "Timezone is required",
        );

        errors.into_result(ProfileChanges {
            name: Some(name),
            timezone: Some(timezone),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NoteIdInput {
    /// Note ID (uuid)
    pub id: Option<String>,
}

impl Validate for NoteIdInput {
    type Valid = Uuid;

    fn validate(self) -> Result<Uuid, FieldErrors> {
        let mut errors = FieldErrors::default();
        let id = note_id(&mut errors, self.id);
        errors.into_result(id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NoteCreateInput {
    /// Note title, 1 to 200 characters
    pub title: Option<String>,
    /// Note body, empty when omitted
    pub content: Option<String>,
}

impl Validate for NoteCreateInput {
    type Valid = NoteDraft;

    fn validate(self) -> Result<NoteDraft, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = match self.title {
            Some(title) => {
                check_title(&mut errors, &title);
                title
            }
            None => {
                errors.push("title", "Required");
                String::new()
            }
        };

        errors.into_result(NoteDraft {
            title,
            content: self.content,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct NoteUpdateInput {
    /// Note ID (uuid)
    pub id: Option<String>,
    /// New title, 1 to 200 characters
    pub title: Option<String>,
    /// New body
    pub content: Option<String>,
}

impl Validate for NoteUpdateInput {
    type Valid = (Uuid, NoteChanges);

    fn validate(self) -> Result<(Uuid, NoteChanges), FieldErrors> {
        let mut errors = FieldErrors::default();
        let id = note_id(&mut errors, self.id);
        if let Some(title) = &self.title {
            check_title(&mut errors, title);
        }

        errors.into_result((
            id,
            NoteChanges {
                title: self.title,
                content: self.content,
            },
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteNoteResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SignInInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Credentials ready for the password grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Validate for SignInInput {
    type Valid = Credentials;

    fn validate(self) -> Result<Credentials, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = required_text(&mut errors, "email", self.email, "Email is required");
        let password = required_text(
            &mut errors,
            "password",
            self.password,
            "Password is required",
        );

        errors.into_result(Credentials { email, password })
    }
}

fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<String>,
    too_short: &str,
) -> String {
    match value {
        Some(value) if value.is_empty() => {
            errors.push(field, too_short);
            value
        }
        Some(value) => value,
        None => {
            errors.push(field, "Required");
            String::new()
        }
    }
}

fn check_title(errors: &mut FieldErrors, title: &str) {
    let len = title.chars().count();
    if len == 0 {
        errors.push("title", "Title is required");
    } else if len > TITLE_MAX_CHARS {
        errors.push("title", "Title is too long");
    }
}

/// Only the hyphenated `8-4-4-4-12` form is a note id.
fn parse_hyphenated(id: &str) -> Option<Uuid> {
    let bytes = id.as_bytes();
    let hyphenated = bytes.len() == 36 && [8, 13, 18, 23].iter().all(|&i| bytes[i] == b'-');

    if hyphenated {
        Uuid::try_parse(id).ok()
    } else {
        None
    }
}

fn note_id(errors: &mut FieldErrors, id: Option<String>) -> Uuid {
    match id.as_deref().map(parse_hyphenated) {
        Some(Some(id)) => id,
        Some(None) => {
            errors.push("id", "Invalid uuid");
            Uuid::nil()
        }
        None => {
            errors.push("id", "Required");
            Uuid::nil()
        }
    }
}
