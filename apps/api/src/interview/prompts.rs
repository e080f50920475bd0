// Interview LLM prompt templates.
// Placeholders in `{braces}` are substituted with `str::replace` before sending.

/// Replace: {count}, {position}, {difficulty}
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"You are an expert technical interviewer. Generate {count} interview questions for a {position} position with {difficulty} difficulty level.

Mix the questions between:
- Technical knowledge questions
- Behavioral questions
- Problem-solving scenarios

Return ONLY the questions, one per line, numbered 1. 2. 3. etc.
Do not include any other text or explanations.

Position: {position}
Difficulty: {difficulty}
Number of questions: {count}"#;

/// Replace: {question}, {answer}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are an expert interviewer evaluating a candidate's response.

Question: {question}

Candidate's Answer: {answer}

Please provide:
1. A score from 0-10 (where 10 is excellent)
2. Constructive feedback (2-3 sentences)

Format your response EXACTLY as:
Score: X
Feedback: Your feedback here

Be constructive and specific in your feedback."#;

/// Replace: {position}, {average_score}, {total_questions}
pub const FINAL_FEEDBACK_PROMPT_TEMPLATE: &str = r#"You are an expert interviewer providing final feedback for a candidate.

Position: {position}
Average Score: {average_score}/10
Total Questions: {total_questions}

Provide a comprehensive summary (3-4 sentences) that includes:
1. Overall performance assessment
2. Key strengths observed
3. Areas for improvement
4. Recommendation (hire/consider/not recommended)

Be professional, constructive, and specific."#;

pub fn questions_prompt(position: &str, difficulty: &str, count: usize) -> String {
    QUESTIONS_PROMPT_TEMPLATE
        .replace("{count}", &count.to_string())
        .replace("{position}", position)
        .replace("{difficulty}", difficulty)
}

pub fn evaluation_prompt(question: &str, answer: &str) -> String {
    // Answer substituted last; its text is never re-scanned for placeholders.
    EVALUATION_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer)
}

pub fn final_feedback_prompt(position: &str, average_score: f64, total_questions: usize) -> String {
    FINAL_FEEDBACK_PROMPT_TEMPLATE
        .replace("{position}", position)
        .replace("{average_score}", &format!("{average_score:.2}"))
        .replace("{total_questions}", &total_questions.to_string())
}
