//! Prompt assembly for the chat model.
//!
//! The prompt is one user message made of a fixed system preamble, the chat
//! history, the retrieved document context (when any) and an instruction
//! derived from the current message. Intent detection is a handful of
//! keyword rules; it is deliberately simple.

use serde::{Deserialize, Serialize};

/// Message text that switches an image request into transcription mode.
pub const OCR_MODE_MARKER: &str = "[[OCR_MODE]]";

const SYSTEM_PREAMBLE: &str = "You are a helpful assistant. \n\
Use the provided CHAT HISTORY and DOCUMENT CONTEXT to answer the user.\n\
1. Prioritize CHAT HISTORY for personal details.\n\
2. Use DOCUMENT CONTEXT for factual queries.\n\
3. If irrelevant, ignore the context.\n\
4. IMPORTANT: If the user provides a Multiple Choice Question (MCQ), you MUST output the Correct Option(s), the Answer text, and a short explanation.\n\n";

const OCR_INSTRUCTION: &str = "Transcribe the text in this image verbatim.";

const IMAGE_INSTRUCTION: &str = "First, carefully read the text in the image. Then, answer the question found in the text. if it is a multiple-choice question, provide the correct option and answer.";

const QUIZ_KEYWORDS: [&str; 5] = [
    "create quiz",
    "generate quiz",
    "make a quiz",
    "create a test",
    "create mcq",
];

const MCQ_MARKERS: [&str; 10] = ["A)", "B)", "C)", "1.", "2.", "3.", "a.", "b.", "c.", "option"];

/// One prior turn of the conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryMessage {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// What the current message is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Ordinary question
    Plain,
    /// Transcribe the attached image
    Ocr,
    /// Image attached with no text: answer the question in the image
    ImageOnly,
    /// Image attached with a question about it
    ImageQuestion,
    /// Generate a quiz from the document context
    QuizCreation,
    /// Text that looks like a multiple-choice question
    MultipleChoice,
}

impl Intent {
    pub fn detect(message: &str, has_image: bool) -> Self {
        let lowered = message.to_lowercase();
        if QUIZ_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            return Intent::QuizCreation;
        }
        if has_image {
            let trimmed = message.trim();
            return if trimmed == OCR_MODE_MARKER {
                Intent::Ocr
            } else if trimmed.is_empty() {
                Intent::ImageOnly
            } else {
                Intent::ImageQuestion
            };
        }
        if MCQ_MARKERS.iter().any(|m| message.contains(m)) {
            return Intent::MultipleChoice;
        }
        Intent::Plain
    }

    fn instruction(self, message: &str) -> String {
        match self {
            Intent::Plain => message.to_string(),
            Intent::Ocr => OCR_INSTRUCTION.to_string(),
            Intent::ImageOnly => IMAGE_INSTRUCTION.to_string(),
            Intent::ImageQuestion => format!(
                "User Question: {message}\n\n\
                 IMPORTANT SYSTEM INSTRUCTION:\n\
                 1. Analyze the image carefully.\n\
                 2. This is a MULTI-SELECT question. Evaluate EACH option individually.\n\
                 3. Step-by-step reasoning required:\n   \
                 - Option A: [Correct/Incorrect] because...\n   \
                 - Option B: [Correct/Incorrect] because...\n   \
                 - ... (repeat for all options)\n\
                 4. Final Conclusion:\n   \
                 - Correct Option(s): [List ALL verified options, e.g., A & C]"
            ),
            Intent::QuizCreation => format!(
                "User Request: {message}\n\n\
                 IMPORTANT SYSTEM INSTRUCTION:\n\
                 The user wants you to GENERATE a quiz based on the 'DOCUMENT CONTEXT' provided above.\n\
                 1. Create the requested number of Multiple Choice Questions.\n\
                 2. Use the content from the documents.\n\
                 3. Format each question clearly with Options (A, B, C, D).\n\
                 4. Provide the correct answer and a brief explanation at the end of the quiz."
            ),
            Intent::MultipleChoice => format!(
                "User Question: {message}\n\n\
                 IMPORTANT SYSTEM INSTRUCTION:\n\
                 This looks like a Multiple Choice Question.\n\
                 1. Search 'DOCUMENT CONTEXT' for the answer.\n\
                 2. EVALUATE EACH OPTION SEPARATELY.\n   \
                 - Check if Option 1 is supported by context.\n   \
                 - Check if Option 2 is supported by context.\n   \
                 - ... and so on.\n\
                 3. Final Answer:\n   \
                 - Provide Correct Option(s) and Explanation."
            ),
        }
    }
}

/// Assemble the full prompt sent to the chat model.
pub fn build_prompt(history: &[HistoryMessage], context: &str, message: &str, has_image: bool) -> String {
    let mut prompt = String::from(SYSTEM_PREAMBLE);

    if !history.is_empty() {
        prompt.push_str("--- CHAT HISTORY ---\n");
        for turn in history {
            let speaker = if turn.role == "user" { "User" } else { "Assistant" };
            prompt.push_str(&format!("{speaker}: {}\n", turn.content));
        }
        prompt.push_str("--------------------\n\n");
    }

    if !context.is_empty() {
        prompt.push_str(&format!(
            "--- DOCUMENT CONTEXT ---\n{context}\n------------------------\n\n"
        ));
    }

    let intent = Intent::detect(message, has_image);
    tracing::debug!("Prompt intent: {:?}", intent);
    prompt.push_str(&format!("User: {}\nAssistant:", intent.instruction(message)));
    prompt
}
