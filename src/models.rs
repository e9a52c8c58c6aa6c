use std::fmt;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::Deserialize;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FocusArea {
    /// The editor captures every key.
    Editor,
    /// Editor panel selected, single keys trigger commands.
    Code,
    Output,
}

/// Languages offered by the selector. Only affects highlighting.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    JavaScript,
    TypeScript,
    Python,
    Java,
    Cpp,
    CSharp,
    Html,
    Css,
    Json,
    Php,
    Go,
    Rust,
    Sql,
}

impl Language {
    pub const ALL: [Language; 13] = [
        Language::JavaScript,
        Language::TypeScript,
        Language::Python,
        Language::Java,
        Language::Cpp,
        Language::CSharp,
        Language::Html,
        Language::Css,
        Language::Json,
        Language::Php,
        Language::Go,
        Language::Rust,
        Language::Sql,
    ];

    pub fn value(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Html => "html",
            Language::Css => "css",
            Language::Json => "json",
            Language::Php => "php",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Sql => "sql",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Python => "Python",
            Language::Java => "Java",
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::Json => "JSON",
            Language::Php => "PHP",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::Sql => "SQL",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        let value = value.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|l| l.value() == value)
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|l| *l == self).unwrap_or(0)
    }

    /// Guess from a file extension, used when a file is opened from the command line.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let lang = match ext.as_str() {
            "js" | "mjs" | "cjs" | "jsx" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "py" => Language::Python,
            "java" => Language::Java,
            "c" | "cc" | "cpp" | "cxx" | "h" | "hpp" => Language::Cpp,
            "cs" => Language::CSharp,
            "html" | "htm" => Language::Html,
            "css" => Language::Css,
            "json" => Language::Json,
            "php" => Language::Php,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "sql" => Language::Sql,
            _ => return None,
        };
        Some(lang)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Indicator shown on the toggle, naming the mode you switch to.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            ThemeMode::Light => "🌙",
            ThemeMode::Dark => "☀️",
        }
    }
}

/// Output panel state, shared with the request task.
#[derive(Default)]
pub struct Explanation {
    pub text: String,
    pub loading: bool,
    pub updated_at: Option<DateTime<Local>>,
}

#[derive(Default)]
pub struct CopyConfirmation {
    pub copied: bool,
}

/// Language selector popup.
pub struct LanguagePicker {
    pub visible: bool,
    pub cursor: usize,
}
