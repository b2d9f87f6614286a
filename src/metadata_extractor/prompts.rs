//! Prompt construction for metadata extraction

use super::schema::{JobFunction, JobType, Region};
use crate::utils::safe_truncate_boundary;

const INSTRUCTIONS: &str = "You extract structured metadata from the text of a single job posting.

Reply with exactly one fenced ```json block containing one object with these fields:
- \"jobTitle\": the job title as written in the posting
- \"companyName\": the hiring company
- \"location\": one of {regions}
- \"jobFunction\": one of {functions}
- \"jobType\": one of {types}
- \"datePosted\": the posting date as YYYY-MM-DD

Use only the listed values for location, jobFunction and jobType. Pick REMOTE when the role is fully remote. If the posting date is not stated, use the most recent date mentioned on the page.

Example:
```json
{\"jobTitle\": \"Senior Backend Engineer\", \"companyName\": \"Acme\", \"location\": \"EUROPE\", \"jobFunction\": \"ENGINEERING\", \"jobType\": \"FULL_TIME\", \"datePosted\": \"2024-05-01\"}
```";

fn join<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the extraction prompt, keeping at most `max_chars` of page text.
#[must_use]
pub fn build_extraction_prompt(page_text: &str, max_chars: usize) -> String {
    let cut = safe_truncate_boundary(page_text, max_chars, ".,;");
    let body = &page_text[..cut];
    let truncated = cut < page_text.len();

    let instructions = INSTRUCTIONS
        .replace("{regions}", &join(Region::ALL))
        .replace("{functions}", &join(JobFunction::ALL))
        .replace("{types}", &join(JobType::ALL));

    let mut prompt = String::with_capacity(instructions.len() + body.len() + 64);
    prompt.push_str(&instructions);
    prompt.push_str("\n\nJob posting text:\n\"\"\"\n");
    prompt.push_str(body);
    if truncated {
        prompt.push_str("\n[truncated]");
    }
    prompt.push_str("\n\"\"\"\n");
    prompt
}
