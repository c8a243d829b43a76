//! Markdown section chunker.
//!
//! Splits documentation files on `##` headers, then on `###` subheaders
//! for more granular chunks. Produces the chunk records served by the
//! search pipeline; runs offline in the indexer, never during serving.

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::DocumentChunk;

struct Section {
    title: String,
    content: String,
}

/// Totals written next to the chunks file after indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSummary {
    pub total_documents: usize,
    pub total_chunks: usize,
    pub indexed_at: String,
}

#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    /// Sections shorter than this are dropped as noise.
    pub min_section_chars: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self { min_section_chars: 50 }
    }
}

#[derive(Default)]
pub struct MarkdownChunker {
    config: ChunkerConfig,
}

impl MarkdownChunker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chunk every `.md` file under `doc_dir` into section records.
    pub fn process_directory(&self, doc_dir: &Path) -> Result<Vec<DocumentChunk>> {
        let files = self.list_markdown_files(doc_dir);
        if files.is_empty() {
            info!(dir = %doc_dir.display(), "no .md files found");
            return Ok(vec![]);
        }
        let mut all_chunks = Vec::new();
        for file_path in &files {
            let content = std::fs::read_to_string(file_path)?;
            let file_name = file_path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let doc_title = document_title_from_file_name(&file_name);
            let sections = self.extract_sections(&content);
            info!(file = %file_name, sections = sections.len(), "chunked document");
            let total = sections.len();
            for (i, section) in sections.into_iter().enumerate() {
                all_chunks.push(DocumentChunk {
                    document_title: doc_title.clone(),
                    document_path: file_path.to_string_lossy().to_string(),
                    section_title: section.title,
                    chunk_id: format!("{}_section_{}", file_name, i),
                    content: section.content,
                    chunk_index: i,
                    total_chunks: total,
                });
            }
        }
        info!(files = files.len(), chunks = all_chunks.len(), "chunking complete");
        Ok(all_chunks)
    }

    pub fn summary(&self, chunks: &[DocumentChunk]) -> IndexSummary {
        let titles: std::collections::HashSet<&str> =
            chunks.iter().map(|c| c.document_title.as_str()).collect();
        IndexSummary {
            total_documents: titles.len(),
            total_chunks: chunks.len(),
            indexed_at: Utc::now().to_rfc3339(),
        }
    }

    /// Split markdown into `##` sections, then refine into `###`
    /// subsections titled "Section - Subsection".
    fn extract_sections(&self, content: &str) -> Vec<Section> {
        let mut sections = Vec::new();
        for (i, part) in content.split("\n## ").enumerate() {
            if i == 0 && !part.starts_with("## ") {
                // Document preamble before the first section header.
                continue;
            }
            let part = if i > 0 { format!("## {part}") } else { part.to_string() };
            let title = part
                .lines()
                .next()
                .unwrap_or("")
                .replace("## ", "")
                .replace('#', "")
                .trim()
                .to_string();
            if part.trim().len() > self.config.min_section_chars {
                sections.push(Section { title, content: part });
            }
        }

        let mut detailed = Vec::new();
        for section in sections {
            let h3_parts: Vec<&str> = section.content.split("\n### ").collect();
            if h3_parts.len() > 1 {
                for (j, h3_part) in h3_parts.iter().enumerate() {
                    if j == 0 {
                        if h3_part.trim().len() > self.config.min_section_chars {
                            detailed.push(Section {
                                title: section.title.clone(),
                                content: (*h3_part).to_string(),
                            });
                        }
                    } else {
                        let sub = format!("### {h3_part}");
                        let sub_title = sub
                            .lines()
                            .next()
                            .unwrap_or("")
                            .replace("### ", "")
                            .trim()
                            .to_string();
                        detailed.push(Section {
                            title: format!("{} - {}", section.title, sub_title),
                            content: sub,
                        });
                    }
                }
            } else {
                detailed.push(section);
            }
        }
        detailed
    }

    fn list_markdown_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut md_files = Vec::new();
        for entry in walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("md") {
                md_files.push(path.to_path_buf());
            }
        }
        md_files.sort();
        md_files
    }
}

/// "team_and_people.md" -> "Team And People".
fn document_title_from_file_name(file_name: &str) -> String {
    let stem = file_name.trim_end_matches(".md").replace('_', " ");
    stem.split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>()
                    + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
