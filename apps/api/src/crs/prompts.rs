// CRS prompt construction.
// The rubric travels as the system instruction; the user turn carries only
// the labeled input sections.

use crate::crs::models::ScoreRequest;

/// Substituted for an empty keyword list so the section is never omitted.
pub const NONE_SPECIFIED: &str = "None specified.";

const RESUME_LABEL: &str = "Resume:";
const JOB_DESCRIPTION_LABEL: &str = "Job Description:";
const MUST_HAVE_LABEL: &str = "Must-Have Keywords/Skills (critical for a good score):";
const MUST_HAVE_EMPTY_LABEL: &str = "Must-Have Keywords/Skills:";
const NICE_TO_HAVE_LABEL: &str = "Nice-to-Have Keywords/Skills (beneficial but not critical):";
const NICE_TO_HAVE_EMPTY_LABEL: &str = "Nice-to-Have Keywords/Skills:";

/// System instruction for CRS scoring. Fixed across calls.
pub const SCORING_SYSTEM: &str = r#"You are an expert HR analyst and resume screener. Compare the provided resume against the job description and compute a Contextual Relevance Score (CRS): an INTEGER from 0 to 100, where 0 means no relevance and 100 means a perfect match.

Weigh the following:

1. KEYWORD & SKILL ALIGNMENT (weighted, semantic)
   - Must-Have Keywords/Skills are critical. Each one missing from the resume lowers the CRS significantly and must be listed as a major weakness.
   - Nice-to-Have Keywords/Skills add to the score when present. Their absence is at most a minor weakness.
   - Match on meaning, not spelling: synonyms, equivalent tools, and closely related concepts count (e.g. "managed a team of 5" satisfies "team leadership").
   - In detailedAnalysis.keywordMatch, state which Must-Haves were found (and how, when the match is semantic), which are missing, and how Nice-to-Haves contributed.

2. EXPERIENCE RELEVANCE (semantic mapping)
   - Identify the core responsibilities of the role from the job description.
   - For each, look for resume statements describing similar work or outcomes, even when worded differently.
   - Extract quantifiable achievements inside matched experience: percentages, money, scale (team size, users, projects), and time-based results. Only count metrics that show real impact relevant to the role.
   - In detailedAnalysis.experienceRelevance, go responsibility by responsibility: quote or paraphrase the matching experience and explain why it matches, highlighting any metric; say explicitly when no match was found.
   - List each extracted achievement as its own string in detailedAnalysis.quantifiableAchievements.
   - Depth of matches and significance of achievements should weigh heavily on the CRS.

3. EDUCATION & QUALIFICATIONS: compare degrees and certifications with the requirements.

4. SKILL ADJACENCY & POTENTIAL: when the role needs skill X and the candidate shows strong related skill Y plus evidence of fast learning, call it out as an adjacent skill match in detailedAnalysis.skillAdjacency.

5. PROFESSIONAL ATTRIBUTES: note language that suggests attributes such as collaborative, data-driven, or proactive in detailedAnalysis.potentialAlignment. Present these as possible signals, never as judgments.

6. RESUME CLARITY (minor): note briefly whether structure and completeness help or hinder the assessment.

Respond ONLY with a JSON object of this exact shape:
{
  "score": <integer 0-100>,
  "explanation": "<overall summary under 100 words>",
  "strengths": ["<strength>", "..."],
  "weaknesses": ["<weakness>", "..."],
  "detailedAnalysis": {
    "keywordMatch": "<string>",
    "experienceRelevance": "<string>",
    "quantifiableAchievements": ["<achievement>", "..."],
    "skillAdjacency": "<string>",
    "potentialAlignment": "<string>"
  }
}

Rules:
- "strengths": up to 4 direct positives for this role.
- "weaknesses": up to 3 gaps relative to the job description.
- detailedAnalysis string fields may be omitted or empty when there is nothing to report; quantifiableAchievements may be an empty array or omitted.
- Do NOT include any text outside the JSON object."#;

/// Builds the user-turn prompt for a CRS request.
///
/// Every section is always present and fenced with `---` lines so the model
/// cannot confuse one field for another.
pub fn build_score_prompt(request: &ScoreRequest) -> String {
    let mut prompt = String::new();

    push_section(&mut prompt, RESUME_LABEL, request.resume_text());
    push_section(
        &mut prompt,
        JOB_DESCRIPTION_LABEL,
        request.job_description_text(),
    );

    match request.must_have_keywords() {
        Some(keywords) => push_section(&mut prompt, MUST_HAVE_LABEL, keywords),
        None => push_section(&mut prompt, MUST_HAVE_EMPTY_LABEL, NONE_SPECIFIED),
    }

    match request.nice_to_have_keywords() {
        Some(keywords) => push_section(&mut prompt, NICE_TO_HAVE_LABEL, keywords),
        None => push_section(&mut prompt, NICE_TO_HAVE_EMPTY_LABEL, NONE_SPECIFIED),
    }

    prompt
}

fn push_section(prompt: &mut String, label: &str, body: &str) {
    prompt.push('\n');
    prompt.push_str(label);
    prompt.push_str("\n---\n");
    prompt.push_str(body);
    prompt.push_str("\n---\n");
}
