// Prompt builders for each workflow step

use super::types::{Interview, Persona};
use crate::generation::{Prompt, PromptKind};

/// Sections every requirements document must contain, in order
pub const DOCUMENT_SECTIONS: [&str; 7] = [
    "Project overview",
    "Key features",
    "Non-functional requirements",
    "Constraints",
    "Target users",
    "Priorities",
    "Risks and mitigations",
];

const EXTRACTION_SYSTEM: &str =
    "You are an expert at extracting specified data from documents and converting it to JSON.";

pub fn persona_brainstorm(user_request: &str, count: usize) -> Prompt {
    Prompt::new(
        PromptKind::PersonaBrainstorm,
        "You are an expert at creating diverse personas for user interviews.",
        format!(
            "Generate {count} diverse personas to interview about the following user request.\n\n\
             User request: {user_request}\n\n\
             Give each persona a name and a background. Ensure diversity in age, gender, \
             occupation and technical expertise."
        ),
    )
}

pub fn persona_extraction(brainstorm: &str) -> Prompt {
    Prompt::new(
        PromptKind::PersonaExtraction,
        EXTRACTION_SYSTEM,
        format!(
            "Extract the following attributes from the document below and output them as JSON.\n\n\
             Document: {brainstorm}\n\n\
             Use exactly these keys:\n\
             name: array of the personas' names\n\
             background: array of the personas' backgrounds, in the same order\n\n\
             Example:\n\
             {{\n  \"name\": [\"first person's name\", \"second person's name\"],\n  \
             \"background\": [\"first person's background\", \"second person's background\"]\n}}\n\n\
             Output only the JSON object."
        ),
    )
}

pub fn interview_question(user_request: &str, persona: &Persona) -> Prompt {
    Prompt::new(
        PromptKind::InterviewQuestion,
        "You are an expert at writing interview questions that uncover user requirements.",
        format!(
            "Write one interview question about the user request below for this persona.\n\n\
             User request: {user_request}\n\
             Persona: {name} - {background}\n\n\
             Make the question specific, and design it to draw out information that matters \
             from this persona's point of view. Output only the question.",
            name = persona.name,
            background = persona.background,
        ),
    )
}

pub fn interview_answer(persona: &Persona, question: &str) -> Prompt {
    Prompt::new(
        PromptKind::InterviewAnswer,
        format!(
            "You answer as the following persona.\n{name} - {background}",
            name = persona.name,
            background = persona.background,
        ),
        format!("Question: {question}"),
    )
}

pub fn sufficiency_judgment(user_request: &str, interviews: &[Interview]) -> Prompt {
    Prompt::new(
        PromptKind::SufficiencyJudgment,
        "You are an expert at judging whether enough information has been gathered to write \
         a comprehensive requirements document.",
        format!(
            "Based on the user request and interview results below, decide whether enough \
             information has been collected to write a comprehensive requirements document. \
             Explain your reasoning.\n\n\
             User request: {user_request}\n\n\
             Interview results:\n{transcript}",
            transcript = transcript(interviews),
        ),
    )
}

pub fn sufficiency_extraction(judgment: &str) -> Prompt {
    Prompt::new(
        PromptKind::SufficiencyExtraction,
        EXTRACTION_SYSTEM,
        format!(
            "Extract the following attributes from the document below and output them as JSON.\n\n\
             Document: {judgment}\n\n\
             Use exactly these keys:\n\
             is_information_sufficient: true if the document concludes there is enough \
             information for the final requirements document, otherwise false\n\
             reason: why it is true or false\n\n\
             Output only the JSON object."
        ),
    )
}

pub fn requirements_document(
    user_request: &str,
    interviews: &[Interview],
    language: Option<&str>,
) -> Prompt {
    let sections = DOCUMENT_SECTIONS
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {s}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    let mut user = format!(
        "Write a requirements document based on the user request and the interviews with \
         several personas below.\n\n\
         User request: {user_request}\n\n\
         Interview results:\n{transcript}\n\
         The document must contain these sections, in this order:\n\n\
         {sections}\n",
        transcript = transcript(interviews),
    );
    if let Some(lang) = language {
        user.push_str(&format!("\nWrite the entire document in {lang}.\n"));
    }
    user.push_str("\nRequirements document:");

    Prompt::new(
        PromptKind::RequirementsDocument,
        "You are an expert at writing requirements documents from gathered information.",
        user,
    )
}

/// Render interviews as persona/question/answer blocks in accumulation order
pub fn transcript(interviews: &[Interview]) -> String {
    interviews
        .iter()
        .map(|i| {
            format!(
                "Persona: {} - {}\nQuestion: {}\nAnswer: {}\n",
                i.persona.name, i.persona.background, i.question, i.answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
