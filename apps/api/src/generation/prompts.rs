// Prompt templates for document generation, and the builders that fill them.
// Templates use `{name}` slots; `fill` substitutes every slot in a single pass
// so user text that happens to contain `{...}` is never re-expanded.

use crate::generation::requests::{
    CoverLetterRequest, EducationDetail, ProjectDetail, ResumeRequest,
};
use crate::models::ExperienceEntry;

/// Stand-in for optional fields the user left blank.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Cover letter prompt template.
/// Slots: {applicant_name}, {job_title}, {company_name}, {job_source},
///        {hiring_manager}, {company_address}, {skills}, {achievements}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Generate a professional cover letter with the following specifications:

### FORMATTING RULES:
1. Business letter format with proper spacing
2. Current date at the top (format: Month Day, Year)
3. 3-4 paragraphs, 250-350 words in total
4. A blank line between paragraphs
5. Formal but engaging tone

### CONTENT STRUCTURE:
Applicant name and contact information
Date

Hiring manager name
Company name
Company address

Salutation addressed to the hiring manager

Opening paragraph:
- Name the position being applied for
- Express enthusiasm about the role
- Mention where the posting was found
- Briefly introduce the applicant's professional background

Skills paragraph, highlighting the 2-3 most relevant of:
{skills}
- Give a concrete example of each skill in use
- Relate each one directly to the role
- Use action verbs (developed, implemented, optimized)

Achievements paragraph, showcasing 1-2 of:
{achievements}
- Quantify results (increased X by Y%, reduced costs by $Z)
- Focus on measurable impact
- Align with what the company needs

Closing paragraph:
- Restate interest in the role
- Ask for an interview
- Give contact availability
- Thank the reader

Sign-off ("Sincerely,") followed by the applicant's name

### SPECIFIC INSTRUCTIONS:
1. For: {applicant_name} applying to {job_title} at {company_name}
2. Found via: {job_source}
3. Address to: {hiring_manager}
4. Company address: {company_address}
5. Include measurable results where possible
6. Avoid generic phrases like "team player"
7. Tailor the letter to {company_name}'s industry
8. Use the real details above; never emit bracketed placeholders such as [Your Name]

### EXAMPLE CONTENT:
"At my previous role at TechSolutions, I led a team that developed a customer portal..."
"Implemented a new inventory system that reduced processing time by 30%...""#;

/// Resume prompt template.
/// Slots: {contact_block}, {experience_blocks}, {education_blocks},
///        {optional_sections}, {tailor_target}
pub const RESUME_PROMPT_TEMPLATE: &str = r#"Generate a professional resume with these specifications:

### FORMATTING RULES:
1. Clean, single-column layout
2. Name as the title
3. Contact information below the name
4. Reverse-chronological order
5. Clear section headings in ALL CAPS
6. Bullet points ("• ") for achievements
7. One blank line between sections

### REQUIRED SECTIONS:
CONTACT INFORMATION
{contact_block}

PROFESSIONAL SUMMARY
- 3-4 sentence overview
- Include years of experience and key skills
- Highlight major achievements
- Tailor to the target role

PROFESSIONAL EXPERIENCE
{experience_blocks}

EDUCATION
{education_blocks}
{optional_sections}
### CONTENT REQUIREMENTS:
1. Begin bullet points with strong action verbs
2. Quantify achievements (metrics, percentages)
3. Focus on results over responsibilities
4. Keep a professional tone (no pronouns)
5. Tailor to {tailor_target} roles

### EXAMPLE FORMAT:
SOFTWARE ENGINEER | TECH COMPANY | 2020-Present
• Developed 15+ microservices improving efficiency by 40%
• Led team of 5 to deliver project 3 weeks early
• Reduced server costs by $25K/year through optimization

Do not include any placeholder text like [Your Name]."#;

/// Builds the cover letter prompt. Blank optional fields fall back to defaults.
pub fn cover_letter_prompt(request: &CoverLetterRequest) -> String {
    fill(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("applicant_name", request.applicant_name.trim()),
            ("job_title", request.job_title.trim()),
            ("company_name", request.company_name.trim()),
            ("job_source", or_default(&request.job_source, "job posting")),
            ("hiring_manager", or_default(&request.hiring_manager, "Hiring Manager")),
            ("company_address", or_default(&request.company_address, NOT_SPECIFIED)),
            ("skills", or_default(&request.skills, NOT_SPECIFIED)),
            ("achievements", or_default(&request.achievements, NOT_SPECIFIED)),
        ],
    )
}

/// Builds the resume prompt. Skills, certifications, and projects sections are
/// only included when the user supplied at least one entry.
pub fn resume_prompt(request: &ResumeRequest) -> String {
    let mut contact = vec![request.full_name.trim().to_string()];
    if !request.address.trim().is_empty() {
        contact.push(request.address.trim().to_string());
    }
    contact.push(format!("{} | {}", request.phone.trim(), request.email.trim()));

    let experience_blocks = blocks_or_placeholder(request.experiences.iter().map(experience_block));
    let education_blocks = blocks_or_placeholder(request.education.iter().map(education_block));

    let mut optional_sections = String::new();
    if let Some(list) = bullet_list(&request.skills) {
        optional_sections.push_str(&format!("\nTECHNICAL SKILLS\n{list}\n"));
    }
    if let Some(list) = bullet_list(&request.certifications) {
        optional_sections.push_str(&format!("\nCERTIFICATIONS\n{list}\n"));
    }
    let projects: Vec<String> = request
        .projects
        .iter()
        .filter(|project| !project.is_blank())
        .map(project_block)
        .collect();
    if !projects.is_empty() {
        let projects = projects.join("\n\n");
        optional_sections.push_str(&format!("\nKEY PROJECTS\n{projects}\n"));
    }

    let tailor_target = if request.summary.to_lowercase().contains("technical") {
        "technical"
    } else {
        "professional"
    };

    let contact_block = contact.join("\n");

    fill(
        RESUME_PROMPT_TEMPLATE,
        &[
            ("contact_block", contact_block.as_str()),
            ("experience_blocks", experience_blocks.as_str()),
            ("education_blocks", education_blocks.as_str()),
            ("optional_sections", optional_sections.as_str()),
            ("tailor_target", tailor_target),
        ],
    )
}

fn experience_block(exp: &ExperienceEntry) -> String {
    format!(
        "{} | {}\n{}\n{}",
        exp.company.trim().to_uppercase(),
        exp.duration.trim(),
        exp.job_title.trim(),
        description_bullets(&exp.description)
    )
}

fn education_block(edu: &EducationDetail) -> String {
    let mut block = format!(
        "{} | {}\n{}",
        edu.institution.trim().to_uppercase(),
        edu.year.trim(),
        edu.degree.trim()
    );
    if !edu.gpa.trim().is_empty() {
        block.push_str(&format!("\nGPA: {}", edu.gpa.trim()));
    }
    block
}

fn project_block(project: &ProjectDetail) -> String {
    format!(
        "{} | {}\n{}",
        project.name.trim().to_uppercase(),
        project.technologies.trim(),
        description_bullets(&project.description)
    )
}

/// One bullet per non-blank line of a free-text description.
fn description_bullets(description: &str) -> String {
    let bullets: Vec<String> = description
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("• {line}"))
        .collect();
    if bullets.is_empty() {
        format!("• {NOT_SPECIFIED}")
    } else {
        bullets.join("\n")
    }
}

fn bullet_list(items: &[String]) -> Option<String> {
    let bullets: Vec<String> = items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(|item| format!("• {item}"))
        .collect();
    (!bullets.is_empty()).then(|| bullets.join("\n"))
}

fn blocks_or_placeholder(blocks: impl Iterator<Item = String>) -> String {
    let joined = blocks.collect::<Vec<_>>().join("\n\n");
    if joined.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        joined
    }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        default
    } else {
        value
    }
}

/// Substitutes `{name}` slots in one left-to-right pass.
/// Unknown slots are copied through untouched.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let slot = after
            .find('}')
            .map(|close| &after[..close])
            .and_then(|name| values.iter().find(|(key, _)| *key == name));

        match slot {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
