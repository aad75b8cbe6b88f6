//! Prompt builder for the morning greeting request.
//!
//! Templates use three placeholders:
//! * `{name}` — the configured display name
//! * `{day}`  — full weekday name, e.g. `Friday`
//! * `{time}` — 12-hour clock time, e.g. `07:45 AM`
//!
//! A custom template that mentions none of them gets a trailing
//! `Name / Date / Time` block so the model still sees the context.

use chrono::{DateTime, TimeZone};

use crate::config::Language;

// ---------------------------------------------------------------------------
// Default templates
// ---------------------------------------------------------------------------

const TEMPLATE_EN: &str = "\
Write a good-morning wish in a single line. Also remind the person to take care \
of themselves, their appearance and their wellbeing, to get their tasks done, to \
brush their teeth and to go to bed on time.
Name: {name}
Date: {day}
Time: {time}";

const TEMPLATE_RU: &str = "\
генерируй в одну строку пожелания на доброе утро, так же человек должен: \
заботиться о себе, о внешности, о состоянии, выполнять задачи, чистить зубы и \
засыпать вовремя.
Имя: {name}
Дата: {day}
Время: {time}";

const PLACEHOLDERS: [&str; 3] = ["{name}", "{day}", "{time}"];

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds the system prompt sent with the greeting request.
///
/// # Example
/// ```rust
/// use chrono::{Local, TimeZone};
/// use good_morning::config::Language;
/// use good_morning::greeting::PromptBuilder;
///
/// let now = Local.with_ymd_and_hms(2024, 3, 1, 7, 30, 0).unwrap();
/// let prompt = PromptBuilder::new(Language::English, None).build("Alice", &now);
/// assert!(prompt.contains("Alice"));
/// assert!(prompt.contains("Friday"));
/// ```
pub struct PromptBuilder {
    language: Language,
    template: Option<String>,
}

impl PromptBuilder {
    /// `template = None` selects the default for `language`.
    pub fn new(language: Language, template: Option<&str>) -> Self {
        Self {
            language,
            template: template.map(str::to_string),
        }
    }

    /// The built-in template for `language`.
    pub fn default_template(language: Language) -> &'static str {
        match language {
            Language::English => TEMPLATE_EN,
            Language::Russian => TEMPLATE_RU,
        }
    }

    /// Substitute `name` and the weekday/time of `now` into the template.
    pub fn build<Tz: TimeZone>(&self, name: &str, now: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        let name = match name.trim() {
            "" => self.fallback_name(),
            trimmed => trimmed,
        };
        let day = now.format("%A").to_string();
        let time = now.format("%I:%M %p").to_string();

        let template = self
            .template
            .as_deref()
            .unwrap_or_else(|| Self::default_template(self.language));

        let mut prompt = template
            .replace("{name}", name)
            .replace("{day}", &day)
            .replace("{time}", &time);

        if !PLACEHOLDERS.iter().any(|p| template.contains(p)) {
            prompt.push_str(&format!("\nName: {name}\nDate: {day}\nTime: {time}"));
        }

        prompt.trim().to_string()
    }

    fn fallback_name(&self) -> &'static str {
        match self.language {
            Language::English => "user",
            Language::Russian => "пользователь",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
