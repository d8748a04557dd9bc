//! A small layout engine shared by the stage prompts.

/// Rule printed under the output marker.
pub const RULE: &str = "------------------------------------";

#[derive(Debug, Clone, PartialEq)]
enum Section {
    Context {
        title: String,
        entries: Vec<(String, String)>,
    },
    Fenced {
        title: String,
        body: String,
    },
    Instructions {
        title: String,
        items: Vec<String>,
    },
    Text {
        title: String,
        body: String,
    },
}

/// Layout of one stage prompt.
///
/// A task line, then titled sections (context entries, fenced text, numbered
/// instructions, free text), then a final reminder and the marker after which
/// the model is expected to answer.
///
/// # Examples
///
/// ```
/// use bulle_pipeline::PromptTemplate;
///
/// let prompt = PromptTemplate::new("Tâche : Résumer.")
///     .context("CONTEXTE :", [("Genre", Some("polar")), ("Ton", None)])
///     .instructions("INSTRUCTIONS :", ["Sois bref."])
///     .finish("RAPPEL : bref.", "RÉSUMÉ CI-DESSOUS :")
///     .render();
///
/// assert!(prompt.starts_with("Tâche : Résumer.\n\nCONTEXTE :\n- Genre : polar\n"));
/// assert!(!prompt.contains("Ton"));
/// assert!(prompt.contains("1. Sois bref.\n"));
/// assert!(prompt.ends_with("RÉSUMÉ CI-DESSOUS :\n------------------------------------\n"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    task: String,
    label_separator: &'static str,
    sections: Vec<Section>,
    reminder: String,
    marker: String,
}

impl PromptTemplate {
    /// Start a prompt with its task line.
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            label_separator: " : ",
            sections: Vec::new(),
            reminder: String::new(),
            marker: String::new(),
        }
    }

    /// Separator between a context label and its value, `" : "` by default.
    pub fn label_separator(mut self, separator: &'static str) -> Self {
        self.label_separator = separator;
        self
    }

    /// Add a context block. Entries without a value (or with a blank one) are skipped.
    pub fn context<'a, L, I>(mut self, title: impl Into<String>, entries: I) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = (L, Option<&'a str>)>,
    {
        let entries = entries
            .into_iter()
            .filter_map(|(label, value)| {
                value
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| (label.into(), v.to_string()))
            })
            .collect();
        self.sections.push(Section::Context {
            title: title.into(),
            entries,
        });
        self
    }

    /// Add text inside a fenced block.
    pub fn fenced(mut self, title: impl Into<String>, body: impl Into<String>) -> Self {
        self.sections.push(Section::Fenced {
            title: title.into(),
            body: body.into(),
        });
        self
    }

    /// Add a numbered instruction list.
    pub fn instructions<S, I>(mut self, title: impl Into<String>, items: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        self.sections.push(Section::Instructions {
            title: title.into(),
            items: items.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Add free text, typically the expected output format.
    pub fn text(mut self, title: impl Into<String>, body: impl Into<String>) -> Self {
        self.sections.push(Section::Text {
            title: title.into(),
            body: body.into(),
        });
        self
    }

    /// Set the final reminder and the answer marker.
    pub fn finish(mut self, reminder: impl Into<String>, marker: impl Into<String>) -> Self {
        self.reminder = reminder.into();
        self.marker = marker.into();
        self
    }

    /// Render the prompt text.
    pub fn render(&self) -> String {
        let mut out = format!("{}\n\n", self.task);

        for section in &self.sections {
            match section {
                Section::Context { title, entries } => {
                    out.push_str(title);
                    out.push('\n');
                    for (label, value) in entries {
                        out.push_str(&format!("- {label}{}{value}\n", self.label_separator));
                    }
                }
                Section::Fenced { title, body } => {
                    out.push_str(&format!("{title}\n```\n{}\n```\n", body.trim_end()));
                }
                Section::Instructions { title, items } => {
                    out.push_str(title);
                    out.push('\n');
                    for (i, item) in items.iter().enumerate() {
                        out.push_str(&format!("{}. {item}\n", i + 1));
                    }
                }
                Section::Text { title, body } => {
                    out.push_str(&format!("{title}\n\n{}\n", body.trim_end()));
                }
            }
            out.push('\n');
        }

        if !self.reminder.is_empty() {
            out.push_str(&self.reminder);
            out.push('\n');
        }
        out.push_str(&self.marker);
        out.push('\n');
        out.push_str(RULE);
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_entries_are_skipped() {
        let prompt = PromptTemplate::new("T")
            .context("C :", [("A", Some("  ")), ("B", Some("b"))])
            .finish("", "M")
            .render();
        assert_eq!(prompt, format!("T\n\nC :\n- B : b\n\nM\n{RULE}\n"));
    }

    #[test]
    fn test_english_separator_and_fence() {
        let prompt = PromptTemplate::new("TASK")
            .label_separator(": ")
            .context("CONTEXT:", [("Visual Style", Some("ink"))])
            .fenced("PANELS:", "PAGE 1\n\n")
            .finish("CHECK", "BELOW:")
            .render();
        assert!(prompt.contains("- Visual Style: ink\n"));
        assert!(prompt.contains("PANELS:\n```\nPAGE 1\n```\n"));
        assert!(prompt.contains("CHECK\nBELOW:\n"));
    }
}
