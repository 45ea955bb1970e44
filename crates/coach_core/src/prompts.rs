//! Prompt construction.
//!
//! Plain string building, no template engine. The question retry
//! ladder is a data-driven ordered slice of prompt builders so each
//! escalation step is independently testable.

/// JSON field contract handed to the model for evaluations.
pub const EVALUATION_JSON_FIELDS: &str = "{clarityScore: int, clarityFeedback: string, structureScore: int, structureFeedback: string, relevanceScore: int, relevanceFeedback: string, communicationScore: int, communicationFeedback: string, depthScore: int, depthFeedback: string}";

/// Fixed prompt used once at startup to measure responsiveness.
pub const CALIBRATION_PROMPT: &str = "You are an interview coach. Give a short STAR feedback for this example answer: At my previous job, I improved the load time of a service by 30% by introducing caching. The challenge was balancing consistency and performance. I implemented a TTL cache, monitored results, and reduced user complaints by 40%.";

fn question_restriction(word_limit: usize) -> String {
    format!(
        "The question must be less than {} words. Generate ONLY the behavioral interview question — do not include any explanations or introductions.",
        word_limit
    )
}

pub fn first_question(profession: &str, word_limit: usize) -> String {
    format!(
        "You are a concise behavioral interview coach. Generate a single, realistic behavioral interview question for a {}. {}",
        profession,
        question_restriction(word_limit)
    )
}

pub fn followup_question(profession: &str, word_limit: usize) -> String {
    format!(
        "Give me another behavioral interview question for a {}. {}",
        profession,
        question_restriction(word_limit)
    )
}

/// Inputs available to every rung of the question retry ladder.
pub struct QuestionRetryContext<'a> {
    pub profession: &'a str,
    pub word_limit: usize,
    /// The over-length candidate from the previous attempt.
    pub previous_question: &'a str,
}

type RetryPromptFn = fn(&QuestionRetryContext) -> String;

fn shorten_previous(ctx: &QuestionRetryContext) -> String {
    format!(
        "Please provide the next behavioral interview question in {} words or less: {}",
        ctx.word_limit, ctx.previous_question
    )
}

fn totally_different(ctx: &QuestionRetryContext) -> String {
    format!(
        "Give me a totally different behavioral interview question for a {}. {}",
        ctx.profession,
        question_restriction(ctx.word_limit)
    )
}

fn most_common(ctx: &QuestionRetryContext) -> String {
    format!(
        "Give me the most common behavioral interview question for a {}. {}",
        ctx.profession,
        question_restriction(ctx.word_limit)
    )
}

fn generic_fallback(ctx: &QuestionRetryContext) -> String {
    format!(
        "Give me a generic behavioral interview question for a {}. {}",
        ctx.profession,
        question_restriction(ctx.word_limit)
    )
}

/// Escalation order: shorten the exact previous question, then ask for
/// a different one, then the most common one for the profession.
const QUESTION_RETRY_LADDER: &[RetryPromptFn] = &[shorten_previous, totally_different, most_common];

/// Prompt for retry number `attempt` (1-based). Attempts past the
/// ladder fall back to a generic request.
pub fn question_retry_prompt(attempt: usize, ctx: &QuestionRetryContext) -> String {
    match QUESTION_RETRY_LADDER.get(attempt.saturating_sub(1)) {
        Some(builder) => builder(ctx),
        None => generic_fallback(ctx),
    }
}

pub fn feedback(profession: &str, question: &str, transcript: &str) -> String {
    format!(
        "You are a technical hiring manager. Evaluate the following interview answer, focusing on clarity, structure, relevance, and communication style. \
         Provide actionable feedback in 3–4 concise sentences, output only the feedback, no extra commentary. \
         Candidate profession: {}. Question: {}. Candidate answer: {}",
        profession, question, transcript
    )
}

/// Feedback retries use a single strategy: shorten what came back.
pub fn shorten_feedback(word_limit: usize, previous_feedback: &str) -> String {
    format!(
        "Please provide the next feedback in {} words or less: {}",
        word_limit, previous_feedback
    )
}

pub fn evaluation(profession: &str, question: &str, transcript: &str) -> String {
    format!(
        "You are a technical hiring manager. Evaluate the following {} candidate's response to a behavioral interview question: {} \
         Parameters to evaluate (score each from 1 to 10, 10 = excellent): \
         1. Clarity: How understandable the answer is, considering content and depth. Minimal answers get low scores. \
         2. Structure: Logical flow of the answer; use of STAR or other coherent structure. Single sentences or unorganized responses score low. \
         3. Relevance: How well the answer addresses the question. Off-topic answers score 1–2. \
         4. Communication: How effectively the candidate conveys ideas, including grammar, vocabulary, and conciseness. Minimal answers with no examples are scored low even if grammar is correct. \
         5. Depth: Specificity, examples, measurable outcomes, and demonstration of skills. Minimal or vague answers score low. \
         Instructions: \
         - Provide numeric scores for each parameter. \
         - Add a one-sentence comment per parameter if needed. \
         - Be very strict: If the candidate provides a minimal answer, off-topic, irrelevant answer, does not directly address the question, does not contain examples or meaningful details, lacks detail and examples, or even if grammar and vocabulary are correct, give low scores (1-2). \
         - Output only in JSON format, create a JSON using the next parameters: {} \
         - Include all JSON parameters, even if one of them is missing or not applicable. \
         Candidate Response: {}",
        profession, question, EVALUATION_JSON_FIELDS, transcript
    )
}

/// Shorter feedback prompt for hosts too slow for the full pipeline.
pub fn degraded_feedback(question: &str, transcript: &str) -> String {
    format!(
        "You are an interview coach. Read the following answer and give short, clear feedback using the STAR method. \
         Identify which parts of Situation, Task, Action, and Result are strong and which could be improved. \
         Be concise, 2-3 sentences max.\nQuestion: {}\nAnswer: {}",
        question, transcript
    )
}

/// Shorter evaluation prompt for hosts too slow for the full pipeline.
pub fn degraded_evaluation(question: &str, transcript: &str) -> String {
    format!(
        "You are an interview coach. Evaluate the following candidate's answer to a behavioral question: {}\n\
         Candidate Response: {}\n\
         Instructions:\n\
         - Evaluate 5 parameters: Clarity, Structure, Relevance, Communication, Depth.\n\
         - Provide scores 1-10 for each parameter and a very short comment (1 sentence) per parameter.\n\
         - Be strict: minimal, vague, or off-topic answers should get low scores.\n\
         - Output only JSON using these fields: {}\n\
         - Keep JSON concise and include all fields, even if not applicable.\n\
         - Keep the output short (1-2 sentences per comment).",
        question, transcript, EVALUATION_JSON_FIELDS
    )
}
