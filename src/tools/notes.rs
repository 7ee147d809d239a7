//! Keyword search over a directory of plain-text course notes.
//!
//! Every `.md` or `.txt` file is one course, named after the file stem.
//! A line such as `Lesson 3` or `## Lecture 3: Joins` starts a new lesson;
//! paragraphs below it are tagged with that lesson number.

use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::executor::ToolError;
use super::registry::Tool;
use crate::providers::types::tool::ToolDeclaration;

pub const SEARCH_TOOL_NAME: &str = "search_course_content";
const MAX_RESULTS: usize = 5;

lazy_static! {
    static ref LESSON_HEADING: Regex =
        Regex::new(r"(?i)^\s*#*\s*(?:lesson|lecture)\s+(\d+)\b").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct Passage {
    pub course: String,
    pub lesson: Option<u32>,
    pub text: String,
}

impl Passage {
    fn header(&self) -> String {
        match self.lesson {
            Some(lesson) => format!("[{} - Lesson {}]", self.course, lesson),
            None => format!("[{}]", self.course),
        }
    }
}

#[derive(Debug, Default)]
pub struct NotesIndex {
    passages: Vec<Passage>,
}

impl NotesIndex {
    /// Index every note file directly inside `dir`
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths: Vec<_> = fs::read_dir(dir)
            .with_context(|| format!("reading notes directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && matches!(
                        path.extension().and_then(|ext| ext.to_str()),
                        Some("md") | Some("txt")
                    )
            })
            .collect();
        paths.sort();

        let mut index = Self::default();
        for path in paths {
            let course = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .ok_or_else(|| anyhow!("invalid notes file name: {}", path.display()))?
                .to_string();
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("reading notes file {}", path.display()))?;
            index.add_course(&course, &contents);
        }

        debug!(passages = index.passages.len(), "loaded course notes");
        Ok(index)
    }

    pub fn add_course(&mut self, course: &str, contents: &str) {
        let mut lesson = None;
        let mut paragraph: Vec<&str> = Vec::new();

        for line in contents.lines() {
            if let Some(caps) = LESSON_HEADING.captures(line) {
                self.flush(course, lesson, &mut paragraph);
                lesson = caps[1].parse().ok();
                paragraph.push(line.trim());
            } else if line.trim().is_empty() {
                self.flush(course, lesson, &mut paragraph);
            } else {
                paragraph.push(line.trim());
            }
        }
        self.flush(course, lesson, &mut paragraph);
    }

    fn flush(&mut self, course: &str, lesson: Option<u32>, paragraph: &mut Vec<&str>) {
        if paragraph.is_empty() {
            return;
        }
        self.passages.push(Passage {
            course: course.to_string(),
            lesson,
            text: paragraph.join("\n"),
        });
        paragraph.clear();
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Best matching passages, most query terms first
    pub fn search(&self, query: &str, course: Option<&str>, lesson: Option<u32>) -> Vec<&Passage> {
        let terms = tokenize(query);
        let course = course.map(str::to_lowercase);

        let mut scored: Vec<(usize, &Passage)> = self
            .passages
            .iter()
            .filter(|p| {
                course
                    .as_deref()
                    .map_or(true, |c| p.course.to_lowercase().contains(c))
            })
            .filter(|p| lesson.map_or(true, |l| p.lesson == Some(l)))
            .map(|p| {
                let words = tokenize(&p.text);
                (terms.intersection(&words).count(), p)
            })
            .filter(|(score, _)| terms.is_empty() || *score > 0)
            .collect();

        // stable, so ties keep note order
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().take(MAX_RESULTS).map(|(_, p)| p).collect()
    }

    pub fn declaration() -> ToolDeclaration {
        ToolDeclaration::new(
            SEARCH_TOOL_NAME,
            "Search course materials with optional course and lesson filters",
            json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to search for in the course content"
                    },
                    "course_name": {
                        "type": "string",
                        "description": "Course title, partial matches work"
                    },
                    "lesson_number": {
                        "type": "integer",
                        "description": "Specific lesson number to search within"
                    }
                },
                "required": ["query"]
            }),
        )
    }

    /// Expose the index as the `search_course_content` tool
    pub fn into_tool(self) -> Tool {
        Tool::new(Self::declaration(), move |args| self.run(args))
    }

    fn run(&self, args: &Map<String, Value>) -> Result<Value> {
        let query = args
            .get("query")
            .and_then(Value::as_str)
            .ok_or_else(|| ToolError::InvalidParameters("query is required".to_string()))?;
        let course = args.get("course_name").and_then(Value::as_str);
        let lesson = args.get("lesson_number").and_then(lesson_number);

        let hits = self.search(query, course, lesson);
        if hits.is_empty() {
            return Ok(json!(no_results_message(course, lesson)));
        }

        let formatted: Vec<String> = hits
            .iter()
            .map(|p| format!("{}\n{}", p.header(), p.text))
            .collect();
        Ok(json!(formatted.join("\n\n")))
    }
}

fn lesson_number(value: &Value) -> Option<u32> {
    match value {
        // models sometimes send integers as floats, e.g. 3.0
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
                    .map(|f| f as u64)
            })
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn no_results_message(course: Option<&str>, lesson: Option<u32>) -> String {
    let mut message = "No relevant content found".to_string();
    if let Some(course) = course {
        message.push_str(&format!(" in course '{}'", course));
    }
    if let Some(lesson) = lesson {
        message.push_str(&format!(" in lesson {}", lesson));
    }
    message.push('.');
    message
}

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| word.len() > 1)
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ToolExecutor, ToolRegistry};
    use std::io::Write;
    use tempfile::TempDir;

    const RUST_NOTES: &str = "\
Course overview and logistics.

Lesson 1: Ownership
Every value has a single owner.
Moves transfer ownership.

Borrowing lets code read without taking ownership.

## Lesson 2: Traits
Traits describe shared behavior.
";

    const SQL_NOTES: &str = "\
Lecture 3
Joins combine rows from two tables.
";

    fn notes_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, contents) in [
            ("Rust Basics.md", RUST_NOTES),
            ("Databases.txt", SQL_NOTES),
            ("ignored.json", "{}"),
        ] {
            let mut file = fs::File::create(dir.path().join(name)).unwrap();
            file.write_all(contents.as_bytes()).unwrap();
        }
        dir
    }

    #[test]
    fn test_load_splits_lessons() {
        let dir = notes_dir();
        let index = NotesIndex::load(dir.path()).unwrap();

        assert_eq!(index.len(), 5);
        let hits = index.search("shared behavior", None, None);
        assert_eq!(hits[0].course, "Rust Basics");
        assert_eq!(hits[0].lesson, Some(2));
        assert!(hits[0].text.starts_with("## Lesson 2: Traits"));
    }

    #[test]
    fn test_load_missing_directory() {
        assert!(NotesIndex::load("/nonexistent/notes/dir").is_err());
    }

    #[test]
    fn test_search_ranks_by_overlap() {
        let mut index = NotesIndex::default();
        index.add_course("Rust Basics", RUST_NOTES);

        let hits = index.search("ownership owner", None, None);
        assert_eq!(hits.len(), 2);
        assert!(hits[0].text.contains("single owner"));
        assert!(hits[1].text.contains("Borrowing"));
    }

    #[test]
    fn test_search_filters() {
        let dir = notes_dir();
        let index = NotesIndex::load(dir.path()).unwrap();

        assert!(index.search("ownership", Some("databases"), None).is_empty());
        assert_eq!(index.search("joins", Some("data"), Some(3)).len(), 1);
        assert!(index.search("ownership", None, Some(2)).is_empty());
        assert_eq!(index.search("", Some("rust"), Some(1)).len(), 2);
    }

    #[tokio::test]
    async fn test_tool_through_registry() {
        let dir = notes_dir();
        let index = NotesIndex::load(dir.path()).unwrap();
        let registry = ToolRegistry::new().with_tool(index.into_tool()).unwrap();

        let args = json!({"query": "joins", "course_name": "Databases", "lesson_number": 3});
        let output = registry
            .execute(SEARCH_TOOL_NAME, args.as_object().unwrap())
            .await
            .unwrap();
        let text = output.as_str().unwrap();
        assert!(text.starts_with("[Databases - Lesson 3]"));
        assert!(text.contains("Joins combine rows"));

        let args = json!({"query": "monads", "lesson_number": "9"});
        let output = registry
            .execute(SEARCH_TOOL_NAME, args.as_object().unwrap())
            .await
            .unwrap();
        assert_eq!(output, json!("No relevant content found in lesson 9."));
    }

    #[tokio::test]
    async fn test_tool_requires_query() {
        let registry = ToolRegistry::new()
            .with_tool(NotesIndex::default().into_tool())
            .unwrap();
        let err = registry
            .execute(SEARCH_TOOL_NAME, &Map::new())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ToolError::InvalidParameters("query is required".to_string())
        );
    }

    #[test]
    fn test_lesson_number_accepts_whole_floats() {
        assert_eq!(lesson_number(&json!(3)), Some(3));
        assert_eq!(lesson_number(&json!(3.0)), Some(3));
        assert_eq!(lesson_number(&json!(" 4 ")), Some(4));
        assert_eq!(lesson_number(&json!(3.5)), None);
        assert_eq!(lesson_number(&json!(-1)), None);
        assert_eq!(lesson_number(&json!(-2.0)), None);
        assert_eq!(lesson_number(&json!(null)), None);
    }

    #[tokio::test]
    async fn test_tool_float_lesson_filter() {
        let dir = notes_dir();
        let registry = ToolRegistry::new()
            .with_tool(NotesIndex::load(dir.path()).unwrap().into_tool())
            .unwrap();

        let args = json!({"query": "joins", "lesson_number": 3.0});
        let output = registry
            .execute(SEARCH_TOOL_NAME, args.as_object().unwrap())
            .await
            .unwrap();
        assert!(output.as_str().unwrap().starts_with("[Databases - Lesson 3]"));
    }
}
