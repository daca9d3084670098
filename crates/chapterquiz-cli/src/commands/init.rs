//! The `chapterquiz init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("chapterquiz.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("questions")?;
    write_if_missing(Path::new("questions/meta.json"), SAMPLE_META)?;
    write_if_missing(Path::new("questions/ch1.json"), SAMPLE_CHAPTER)?;

    println!("\nNext steps:");
    println!("  1. Edit questions/ch1.json or add more ch{{id}}.json files");
    println!("  2. Run: chapterquiz validate --chapter 1");
    println!("  3. Run: chapterquiz grade --chapter 1 --answers answers.json");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# chapterquiz configuration

results_dir = "./chapterquiz-results"

[source]
type = "directory"
path = "./questions"

# Serve content from a static host instead:
# [source]
# type = "http"
# base_url = "${CHAPTERQUIZ_HOST}"
"#;

const SAMPLE_META: &str = r#"[
  { "id": 1, "title": "Chapter 1", "desc": "Sample chapter", "total": 2 }
]
"#;

const SAMPLE_CHAPTER: &str = r#"[
  {
    "id": "q1",
    "type": "single",
    "stem": "Which number is even?",
    "options": ["3", "4", "5"],
    "answerIndex": 1,
    "explain": "4 is divisible by 2."
  },
  {
    "id": "q2",
    "type": "multiple",
    "stem": "Select every prime.",
    "options": ["2", "4", "5", "9"],
    "answerIndices": [0, 2]
  },
  {
    "id": "q3",
    "type": "fill",
    "stem": "Explain why the sum of two odd numbers is even."
  }
]
"#;
