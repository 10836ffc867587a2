//! Complete command: inline completions for the end of a file

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use cwhisper_core::common::ProgrammingLanguage;
use cwhisper_core::recommendation::{FileContext, ListRecommendationsRequest};

use super::common;
use crate::output::{OutputFormat, write_json, write_table};

pub struct CompleteArgs {
    pub file: PathBuf,
    pub language: Option<String>,
    pub max_results: Option<u32>,
    pub output: OutputFormat,
}

pub async fn run(args: CompleteArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let language = match args.language.or_else(|| language_for(&args.file).map(String::from)) {
        Some(language) => language,
        None => bail!(
            "cannot tell the language of {}; pass --language",
            args.file.display()
        ),
    };
    let filename = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let client = common::client().await?;
    let request = ListRecommendationsRequest {
        max_results: args.max_results,
        profile_arn: client.active_profile_arn(),
        ..ListRecommendationsRequest::new(FileContext {
            filename,
            programming_language: ProgrammingLanguage::new(language),
            left_file_content: content,
            right_file_content: String::new(),
        })
    };

    let response = client.list_recommendations(&request).await?;

    match args.output {
        OutputFormat::Json => write_json(&mut std::io::stdout(), &response)?,
        OutputFormat::Table => {
            let rows = response
                .recommendations
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    let references = r.references.as_ref().map_or(0, Vec::len);
                    vec![(i + 1).to_string(), r.content.clone(), references.to_string()]
                })
                .collect();
            write_table(&mut std::io::stdout(), &["#", "completion", "references"], rows)?;
        }
    }

    if response.recommendations.is_empty() {
        eprintln!("{}", "No completions returned.".dimmed());
    }
    Ok(())
}

/// Service language name for a source file, by extension.
fn language_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let language = match ext.as_str() {
        "py" => "python",
        "java" => "java",
        "js" | "jsx" | "mjs" | "cjs" => "javascript",
        "ts" | "tsx" => "typescript",
        "cs" => "csharp",
        "go" => "go",
        "rs" => "rust",
        "rb" => "ruby",
        "kt" | "kts" => "kotlin",
        "php" => "php",
        "scala" => "scala",
        "sql" => "sql",
        "c" | "h" => "c",
        "cc" | "cpp" | "cxx" | "hpp" => "cpp",
        "sh" | "bash" | "zsh" => "shell",
        "tf" | "hcl" => "tf",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        _ => return None,
    };
    Some(language)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_for_known_extensions() {
        assert_eq!(language_for(Path::new("src/main.rs")), Some("rust"));
        assert_eq!(language_for(Path::new("app/Component.TSX")), Some("typescript"));
        assert_eq!(language_for(Path::new("infra/main.tf")), Some("tf"));
    }

    #[test]
    fn test_language_for_unknown() {
        assert_eq!(language_for(Path::new("notes.txt")), None);
        assert_eq!(language_for(Path::new("Makefile")), None);
    }
}
