use std::{fmt, sync::LazyLock};

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static WORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w").expect("word-start pattern is valid"));

/// The five fields of the earnings form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    FirstName,
    JobTitle,
    Salary,
    WorkHours,
    State,
}

impl FormField {
    pub fn all() -> &'static [FormField] {
        &[
            FormField::FirstName,
            FormField::JobTitle,
            FormField::Salary,
            FormField::WorkHours,
            FormField::State,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First Name",
            Self::JobTitle => "Job Title",
            Self::Salary => "Salary",
            Self::WorkHours => "Work Hours",
            Self::State => "State",
        }
    }

    /// Job title is the only optional field.
    pub fn is_required(&self) -> bool {
        !matches!(self, Self::JobTitle)
    }

    /// Accepts the short console names as well as the form names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "name" | "firstname" | "first_name" | "first-name" => Some(Self::FirstName),
            "title" | "jobtitle" | "job_title" | "job-title" => Some(Self::JobTitle),
            "salary" | "wage" => Some(Self::Salary),
            "hours" | "workhours" | "work_hours" | "work-hours" => Some(Self::WorkHours),
            "state" => Some(Self::State),
            _ => None,
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Collapses whitespace runs to a single space and upper-cases the first
/// character of every word. Leading and trailing space survive; callers trim
/// at submit time.
pub fn normalize_field(value: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(value, " ");
    WORD_START
        .replace_all(&collapsed, |caps: &Captures<'_>| caps[0].to_uppercase())
        .into_owned()
}

/// Free-text form contents as the user typed them (after normalization).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFormInput {
    pub first_name: String,
    pub job_title: String,
    pub salary: String,
    pub work_hours: String,
    pub state: String,
}

impl RawFormInput {
    /// Stores `value` into `field`, normalized the same way on every edit.
    pub fn set(
        &mut self,
        field: FormField,
        value: &str,
    ) {
        *self.slot_mut(field) = normalize_field(value);
    }

    pub fn get(
        &self,
        field: FormField,
    ) -> &str {
        match field {
            FormField::FirstName => &self.first_name,
            FormField::JobTitle => &self.job_title,
            FormField::Salary => &self.salary,
            FormField::WorkHours => &self.work_hours,
            FormField::State => &self.state,
        }
    }

    fn slot_mut(
        &mut self,
        field: FormField,
    ) -> &mut String {
        match field {
            FormField::FirstName => &mut self.first_name,
            FormField::JobTitle => &mut self.job_title,
            FormField::Salary => &mut self.salary,
            FormField::WorkHours => &mut self.work_hours,
            FormField::State => &mut self.state,
        }
    }

    /// A copy with every field trimmed.
    pub fn trimmed(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            job_title: self.job_title.trim().to_string(),
            salary: self.salary.trim().to_string(),
            work_hours: self.work_hours.trim().to_string(),
            state: self.state.trim().to_string(),
        }
    }

    /// Required fields that are blank after trimming, in form order.
    pub fn blank_required_fields(&self) -> Vec<FormField> {
        FormField::all()
            .iter()
            .copied()
            .filter(|field| field.is_required() && self.get(*field).trim().is_empty())
            .collect()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

impl fmt::Display for RawFormInput {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for field in FormField::all() {
            let marker = if field.is_required() && self.get(*field).trim().is_empty() {
                " *"
            } else {
                ""
            };
            writeln!(f, "{:<12}{}{}", format!("{}:", field.label()), self.get(*field), marker)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normalize_collapses_whitespace_runs() {
        assert_eq!(normalize_field("new   \t york"), "New York");
    }

    #[test]
    fn normalize_capitalizes_every_word() {
        assert_eq!(normalize_field("software engineer"), "Software Engineer");
    }

    #[test]
    fn normalize_keeps_single_edge_spaces() {
        assert_eq!(normalize_field("   ada  "), " Ada ");
    }

    #[test]
    fn normalize_leaves_inner_capitals_alone() {
        assert_eq!(normalize_field("mcDonald"), "McDonald");
    }

    #[test]
    fn normalize_capitalizes_non_ascii_word_starts() {
        assert_eq!(normalize_field("élodie ørsted"), "Élodie Ørsted");
    }

    #[test]
    fn normalize_leaves_numbers_unchanged() {
        assert_eq!(normalize_field("1,250.50"), "1,250.50");
    }

    #[test]
    fn set_normalizes_on_every_edit() {
        let mut form = RawFormInput::default();

        form.set(FormField::State, "north  carolina");

        assert_eq!(form.get(FormField::State), "North Carolina");
    }

    #[test]
    fn trimmed_strips_edges_of_every_field() {
        let mut form = RawFormInput::default();
        form.set(FormField::FirstName, "  ada ");
        form.set(FormField::Salary, " 100 ");

        let trimmed = form.trimmed();

        assert_eq!(trimmed.first_name, "Ada");
        assert_eq!(trimmed.salary, "100");
    }

    #[test]
    fn blank_required_fields_skips_job_title() {
        let mut form = RawFormInput::default();
        form.set(FormField::FirstName, "Ada");

        assert_eq!(
            form.blank_required_fields(),
            vec![FormField::Salary, FormField::WorkHours, FormField::State]
        );
    }

    #[test]
    fn clear_resets_every_field() {
        let mut form = RawFormInput::default();
        form.set(FormField::FirstName, "Ada");
        form.set(FormField::State, "Ohio");

        form.clear();

        assert_eq!(form, RawFormInput::default());
    }

    #[test]
    fn parse_accepts_short_and_long_names() {
        assert_eq!(FormField::parse("name"), Some(FormField::FirstName));
        assert_eq!(FormField::parse("firstName"), Some(FormField::FirstName));
        assert_eq!(FormField::parse("HOURS"), Some(FormField::WorkHours));
        assert_eq!(FormField::parse("work-hours"), Some(FormField::WorkHours));
        assert_eq!(FormField::parse("zip"), None);
    }
}
