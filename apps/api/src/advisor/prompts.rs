// All LLM prompt constants for the advisor features.
// Templates use `{placeholder}` markers filled with `str::replace` before sending.
// The JSON-only rule is appended by `llm_client::prompts::json_system`.

// ─── Career roadmap & profile insights ──────────────────────────────────────

pub const ROADMAP_SYSTEM: &str = "You are the Career Agent for the Career Path Simulator. \
    You generate detailed, phase-based career roadmaps from a user's academic profile, \
    skills, interests and goals. Focus on realistic progression, skill acquisition and \
    current industry trends.";

/// Replace: {profile_json}
pub const ROADMAP_PROMPT_TEMPLATE: &str = r#"Generate career roadmap options for the following user profile:
{profile_json}

Offer exactly 3 distinct options, for example an "Ambitious Path", a "Balanced Path" and a "Safe Path".
Split every option into 4 phases: Foundation, Specialization, Industry Entry, Growth/Hiring.

Return a JSON object with this EXACT schema:
{
  "options": [
    {
      "option_name": "Ambitious Path",
      "match_score": 85,
      "phases": [
        {
          "title": "Phase 1: Foundation",
          "duration": "0-6 months",
          "description": "Summary of the phase",
          "skills": ["Skill 1", "Skill 2"],
          "actions": ["Action 1", "Action 2"]
        }
      ],
      "summary": "Overall outlook for this path"
    }
  ]
}

RULES:
1. match_score is an integer from 0 to 100 reflecting fit with the profile
2. Every option has exactly 4 phases
3. Ground skills and actions in the user's stated skills, interests and constraints"#;

pub const INSIGHTS_SYSTEM: &str = "You are a candid career counsellor. \
    You assess a student's or professional's profile and identify strengths, \
    weaknesses and concrete next steps for the job market.";

/// Replace: {profile_json}
pub const INSIGHTS_PROMPT_TEMPLATE: &str = r#"Analyse this user profile:
{profile_json}

Return a JSON object with this EXACT schema:
{
  "strengths": ["string"],
  "weaknesses": ["string"],
  "suggestions": ["string"],
  "market_readiness": "Low" | "Medium" | "High"
}

Give 3 to 5 items per list. Be specific to the profile; avoid generic advice."#;

// ─── Recommendations ────────────────────────────────────────────────────────

pub const RECOMMENDATION_SYSTEM: &str = "You are a career placement specialist who matches \
    candidates with realistic job openings and learning resources.";

/// Replace: {user_json}, {career_path}
pub const JOB_RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"Recommend 5 job roles for this candidate.

CANDIDATE:
{user_json}

CHOSEN CAREER PATH:
{career_path}

Return a JSON object with this EXACT schema:
{
  "jobs": [
    {
      "title": "Junior Data Analyst",
      "company": "Example type of company or a well-known employer",
      "location": "City / Remote",
      "salary": "Typical salary range",
      "requirements": ["Requirement 1", "Requirement 2"]
    }
  ]
}"#;

/// Replace: {user_json}, {career_path}
pub const COURSE_RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"Recommend 5 courses that close this candidate's skill gaps for the chosen path.

CANDIDATE:
{user_json}

CHOSEN CAREER PATH:
{career_path}

Return a JSON object with this EXACT schema:
{
  "courses": [
    {
      "title": "Course title",
      "provider": "Coursera / Udemy / edX / YouTube / official docs",
      "duration": "e.g. 6 weeks",
      "difficulty": "Beginner" | "Intermediate" | "Advanced",
      "skills": ["Skill 1", "Skill 2"]
    }
  ]
}"#;

// ─── Market insights, job prep, project guide ───────────────────────────────

pub const MARKET_SYSTEM: &str = "You are a labour-market analyst with up-to-date knowledge \
    of hiring trends, in-demand skills and regional job markets.";

/// Replace: {target_role}, {skills}, {location}
pub const MARKET_INSIGHTS_PROMPT_TEMPLATE: &str = r#"Assess this candidate's readiness for the target role.

TARGET ROLE: {target_role}
CURRENT SKILLS: {skills}
LOCATION: {location}

Return a JSON object with this EXACT schema:
{
  "readiness_score": 65,
  "hiring_probability": "Low" | "Medium" | "High",
  "analysis_summary": "Two or three sentences",
  "critical_missing_skills": ["string"],
  "recommended_jobs": [
    {
      "title": "string",
      "company": "string",
      "location": "string",
      "match_score": 80,
      "type": "Full-time" | "Internship" | "Contract" | "Remote"
    }
  ]
}

readiness_score and match_score are integers from 0 to 100. Recommend 4 to 6 jobs."#;

/// Replace: {job_title}, {company}, {skills}
pub const JOB_PREP_PROMPT_TEMPLATE: &str = r#"Prepare the candidate for this specific opening.

JOB: {job_title} at {company}
CANDIDATE SKILLS: {skills}

Return a JSON object with this EXACT schema:
{
  "match_summary": "How well the candidate fits and what to emphasise",
  "interview_questions": [
    {"question": "string", "type": "Technical" | "Behavioral", "answer_tip": "string"}
  ],
  "resume_keywords": ["string"],
  "project_challenge": {
    "title": "A small portfolio project that proves fit for this job",
    "description": "string"
  }
}

Give 5 interview questions and 8 to 10 resume keywords."#;

/// Replace: {title}, {description}
pub const PROJECT_GUIDE_PROMPT_TEMPLATE: &str = r#"Write a build guide for this portfolio project.

PROJECT: {title}
DESCRIPTION: {description}

Return a JSON object with this EXACT schema:
{
  "tech_stack": ["string"],
  "steps": [
    {"step": 1, "title": "string", "details": "string"}
  ],
  "bonus_challenge": "string"
}

Give 5 to 8 concrete, ordered steps."#;

// ─── Resume ─────────────────────────────────────────────────────────────────

pub const RESUME_ANALYSIS_SYSTEM: &str = "You are an expert resume reviewer and applicant \
    tracking system (ATS) specialist.";

/// Replace: {career_goal}, {resume_text}
pub const RESUME_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Review this resume for the target role "{career_goal}".

RESUME TEXT:
{resume_text}

Return a JSON object with this EXACT schema:
{
  "ats_score": 72,
  "skills_found": ["string"],
  "missing_keywords": ["string"],
  "improvements": ["string"]
}

ats_score is an integer from 0 to 100. Improvements must be concrete edits, not general advice."#;

pub const RESUME_BUILD_SYSTEM: &str = "You are a professional resume writer. You turn rough \
    notes into a clean, truthful, ATS-friendly resume. Never invent employers, degrees or dates.";

/// Replace: {resume_input_json}
pub const RESUME_BUILD_PROMPT_TEMPLATE: &str = r#"Build a structured resume from these details:
{resume_input_json}

Return a JSON object with this EXACT schema:
{
  "summary": "2-3 sentence professional summary",
  "experience": [
    {"title": "string", "company": "string", "duration": "string", "bullets": ["string"]}
  ],
  "education": [
    {"degree": "string", "institution": "string", "year": "string"}
  ],
  "skills": ["string"],
  "projects": [
    {"name": "string", "description": "string"}
  ]
}"#;

// ─── Skill assessment ───────────────────────────────────────────────────────

pub const ASSESSMENT_SYSTEM: &str = "You are an examiner who writes fair, unambiguous \
    multiple-choice questions and grades skill assessments.";

/// Replace: {count}, {difficulty}, {topic}
pub const ASSESSMENT_PROMPT_TEMPLATE: &str = r#"Write {count} {difficulty}-level multiple-choice questions on "{topic}".

Return a JSON object with this EXACT schema:
{
  "questions": [
    {
      "id": 1,
      "question": "string",
      "options": ["A", "B", "C", "D"],
      "correct_index": 0,
      "explanation": "Why the correct option is right"
    }
  ]
}

RULES:
1. Exactly 4 options per question, exactly one correct
2. ids are consecutive integers starting at 1
3. correct_index is the 0-based index into options"#;

/// Replace: {count}, {document_text}
pub const ASSESSMENT_FROM_DOCUMENT_PROMPT_TEMPLATE: &str = r#"Write {count} multiple-choice questions that test understanding of the following material. Use only facts stated in the material.

MATERIAL:
{document_text}

Return a JSON object with this EXACT schema:
{
  "questions": [
    {
      "id": 1,
      "question": "string",
      "options": ["A", "B", "C", "D"],
      "correct_index": 0,
      "explanation": "string"
    }
  ]
}"#;

/// Replace: {topic}, {correct}, {total}, {score}, {answers_json}
pub const ASSESSMENT_EVALUATION_PROMPT_TEMPLATE: &str = r#"Evaluate this "{topic}" assessment.

The candidate answered {correct} of {total} questions correctly (score {score}).

QUESTIONS WITH THE CANDIDATE'S ANSWERS:
{answers_json}

Return a JSON object with this EXACT schema:
{
  "score": {score},
  "summary": "Two sentences on overall performance",
  "weak_areas": ["Sub-topic the candidate struggled with"],
  "recommendations": ["Concrete study recommendation"]
}

Keep "score" exactly as given."#;

// ─── Mock interview ─────────────────────────────────────────────────────────

pub const INTERVIEWER_BASE: &str = "You are conducting a realistic mock job interview. \
    Ask one question at a time and keep every message short, as a real interviewer would.";

pub const PERSONA_FRIENDLY: &str = "PERSONA: Friendly HR interviewer. Warm and supportive. \
    Encourage the candidate and offer a gentle hint when an answer is weak.";

pub const PERSONA_RUTHLESS: &str = "PERSONA: Strict senior tech lead. Direct and demanding. \
    Point out mistakes immediately, do not give hints, and push back on vague answers.";

pub const PERSONA_SOCRATIC: &str = "PERSONA: Socratic mentor. Respond to answers by asking \
    'why' and probing the reasoning behind them before moving on.";

/// Replace: {role}, {focus}
pub const INTERVIEW_START_PROMPT_TEMPLATE: &str = r#"Start a {focus} interview for the role "{role}".

Return a JSON object with this EXACT schema:
{
  "message": "Short greeting and introduction in persona",
  "question": "The first interview question"
}"#;

/// Replace: {role}, {history_json}, {last_question}, {user_answer}
pub const INTERVIEW_INTERACTION_PROMPT_TEMPLATE: &str = r#"Interview for the role "{role}".

EARLIER EXCHANGES:
{history_json}

LAST QUESTION: {last_question}
CANDIDATE ANSWER: {user_answer}

React to the answer in persona, then ask the next question.

Return a JSON object with this EXACT schema:
{
  "message": "Reaction to the answer",
  "next_question": "The next interview question",
  "style_feedback": {
    "clarity": "High" | "Medium" | "Low",
    "confidence": "High" | "Medium" | "Low",
    "tips": ["Short delivery tip"]
  }
}"#;

pub const INTERVIEW_FEEDBACK_SYSTEM: &str = "You are an interview coach reviewing a finished \
    mock interview transcript.";

/// Replace: {role}, {transcript}
pub const INTERVIEW_FEEDBACK_PROMPT_TEMPLATE: &str = r#"Review this mock interview for the role "{role}".

TRANSCRIPT:
{transcript}

Return a JSON object with this EXACT schema:
{
  "score": 70,
  "communication_rating": "Excellent" | "Good" | "Average" | "Poor",
  "confidence_rating": "Excellent" | "Good" | "Average" | "Poor",
  "improvement_suggestions": ["string"],
  "ideal_answers": ["A model answer for each question, in order"]
}

score is an integer from 0 to 100."#;
