use crate::llm_client::prompts::{FACTUAL_ONLY_INSTRUCTION, JSON_ONLY_SYSTEM};

pub const JOB_EXTRACTION_SYSTEM: &str = JSON_ONLY_SYSTEM;

/// Output contract given to the model. Keys match `JobSpecification`'s wire names.
pub const JOB_FORMAT_INSTRUCTIONS: &str = r#"You must respond with a valid JSON object containing the following fields (all fields are optional, omit if not found):

{
  "jobTitle": "string - The job title or position name",
  "company": "string - Company or organization name",
  "location": "string - Job location (city, country, remote, hybrid, etc.)",
  "employmentType": "string - Employment type (full-time, part-time, contract, freelance, internship, etc.)",
  "experienceLevel": "string - Required experience level (entry-level, junior, mid-level, senior, lead, etc.)",
  "salary": "string - Salary range or compensation details",
  "requiredSkills": ["array of strings - List of required technical and soft skills"],
  "preferredSkills": ["array of strings - List of preferred or nice-to-have skills"],
  "education": "string - Educational requirements (degree, field of study)",
  "responsibilities": ["array of strings - Key job responsibilities and duties"],
  "benefits": ["array of strings - Benefits and perks offered"],
  "applicationDeadline": "string - Application deadline if mentioned"
}

Ensure your response is ONLY valid JSON, with no additional text before or after."#;

pub const JOB_EXTRACTION_PROMPT_TEMPLATE: &str = r#"You are an expert HR analyst specialized in extracting structured information from job descriptions.

Analyze the following job description and extract all information useful for matching candidates to this position.

Source Language: {source_language}
Target Language: {target_language}

Job Description:
{job_description}

Instructions:
1. Extract all relevant fields from the job description
2. Normalize field values (use snake_case for multi-word values where appropriate)
3. If the source language differs from the target language, translate the extracted information to the target language
4. Include implicit information (e.g. "5+ years experience" implies experienceLevel "senior" or "mid-level")
5. Split compound skills into individual items (e.g. "React/Vue.js" becomes ["React", "Vue.js"])
6. Ensure all arrays contain unique items

{format_instructions}

{factual_only}"#;

pub fn build_extraction_prompt(
    job_description: &str,
    source_language: &str,
    target_language: &str,
) -> String {
    JOB_EXTRACTION_PROMPT_TEMPLATE
        .replace("{source_language}", source_language)
        .replace("{target_language}", target_language)
        .replace("{format_instructions}", JOB_FORMAT_INSTRUCTIONS)
        .replace("{factual_only}", FACTUAL_ONLY_INSTRUCTION)
        // last, so placeholders inside the description are left alone
        .replace("{job_description}", job_description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_fills_every_placeholder() {
        let prompt = build_extraction_prompt("Rust Engineer at Acme", "vn", "en");
        assert!(prompt.contains("Source Language: vn"));
        assert!(prompt.contains("Target Language: en"));
        assert!(prompt.contains("Rust Engineer at Acme"));
        assert!(prompt.contains("\"applicationDeadline\""));
        assert!(!prompt.contains("{format_instructions}"));
        assert!(!prompt.contains("{job_description}"));
    }

    #[test]
    fn test_description_placeholders_are_not_expanded() {
        let prompt = build_extraction_prompt("Use {target_language} daily", "en", "jp");
        assert!(prompt.contains("Use {target_language} daily"));
    }
}
