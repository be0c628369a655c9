// Scripted generation service for driving the workflow deterministically
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use elicit::generation::{GenerationService, Prompt, PromptKind, ServiceError};

/// How a scripted call misbehaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFailure {
    /// The service call itself errors
    Service,
    /// The call succeeds but returns text no extractor accepts
    Garbage,
}

/// Answers every prompt according to its `PromptKind`.
///
/// - persona extraction returns `personas_per_call` fresh personas `P1`, `P2`, ...
/// - questions and answers name the persona they were asked of
/// - verdicts are popped from a queue; once empty the last verdict repeats
/// - the document echoes the request and the number of interviews it saw
pub struct ScriptedService {
    personas_per_call: usize,
    verdicts: Mutex<VecDeque<bool>>,
    last_verdict: Mutex<bool>,
    document: Option<String>,
    failures: HashMap<PromptKind, (usize, ScriptFailure)>,
    delays: HashMap<String, Duration>,
    next_persona: AtomicUsize,
    calls: Mutex<HashMap<PromptKind, usize>>,
    prompts: Mutex<Vec<Prompt>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    concurrency: usize,
}

impl ScriptedService {
    pub fn new(personas_per_call: usize) -> Self {
        Self {
            personas_per_call,
            verdicts: Mutex::new(VecDeque::new()),
            last_verdict: Mutex::new(false),
            document: None,
            failures: HashMap::new(),
            delays: HashMap::new(),
            next_persona: AtomicUsize::new(1),
            calls: Mutex::new(HashMap::new()),
            prompts: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            concurrency: 8,
        }
    }

    pub fn with_verdicts(self, verdicts: &[bool]) -> Self {
        *self.verdicts.lock().unwrap() = verdicts.iter().copied().collect();
        self
    }

    /// Fixed document text instead of the echo
    pub fn with_document(mut self, text: &str) -> Self {
        self.document = Some(text.to_string());
        self
    }

    /// Fail every `kind` call after `successes` successful ones
    pub fn fail_after(mut self, kind: PromptKind, successes: usize, failure: ScriptFailure) -> Self {
        self.failures.insert(kind, (successes, failure));
        self
    }

    /// Delay question and answer calls for the named persona
    pub fn with_delay(mut self, persona: &str, delay: Duration) -> Self {
        self.delays.insert(persona.to_string(), delay);
        self
    }

    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit;
        self
    }

    pub fn calls(&self, kind: PromptKind) -> usize {
        self.calls.lock().unwrap().get(&kind).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// Every prompt of `kind`, in dispatch order
    pub fn prompts(&self, kind: PromptKind) -> Vec<Prompt> {
        self.prompts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.kind == kind)
            .cloned()
            .collect()
    }

    /// Highest number of concurrent calls observed
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn record(&self, prompt: &Prompt) -> usize {
        self.prompts.lock().unwrap().push(prompt.clone());
        let mut calls = self.calls.lock().unwrap();
        let count = calls.entry(prompt.kind).or_insert(0);
        *count += 1;
        *count
    }

    fn reply(&self, prompt: &Prompt) -> String {
        match prompt.kind {
            PromptKind::PersonaBrainstorm => "Some people who would care about this.".to_string(),
            PromptKind::PersonaExtraction => {
                let names: Vec<String> = (0..self.personas_per_call)
                    .map(|_| format!("P{}", self.next_persona.fetch_add(1, Ordering::SeqCst)))
                    .collect();
                let backgrounds: Vec<String> =
                    names.iter().map(|n| format!("background of {n}")).collect();
                format!(
                    "```json\n{}\n```",
                    serde_json::json!({ "name": names, "background": backgrounds })
                )
            }
            PromptKind::InterviewQuestion => {
                format!("question for {}", persona_name(prompt).unwrap_or_default())
            }
            PromptKind::InterviewAnswer => {
                format!("answer from {}", persona_name(prompt).unwrap_or_default())
            }
            PromptKind::SufficiencyJudgment => "Here is my judgment.".to_string(),
            PromptKind::SufficiencyExtraction => {
                let mut last = self.last_verdict.lock().unwrap();
                if let Some(v) = self.verdicts.lock().unwrap().pop_front() {
                    *last = v;
                }
                serde_json::json!({
                    "is_information_sufficient": *last,
                    "reason": if *last { "enough material" } else { "need more perspectives" },
                })
                .to_string()
            }
            PromptKind::RequirementsDocument => match &self.document {
                Some(text) => text.clone(),
                None => format!(
                    "# Requirements\n\nInterviews used: {}\n",
                    prompt.user.matches("Persona: ").count()
                ),
            },
        }
    }
}

#[async_trait]
impl GenerationService for ScriptedService {
    async fn complete(&self, prompt: &Prompt) -> Result<String, ServiceError> {
        let nth = self.record(prompt);

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = persona_name(prompt).and_then(|n| self.delays.get(&n)) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some((successes, failure)) = self.failures.get(&prompt.kind) {
            if nth > *successes {
                return match failure {
                    ScriptFailure::Service => Err(ServiceError::Request(format!(
                        "scripted {} failure",
                        prompt.kind
                    ))),
                    ScriptFailure::Garbage => Ok("I'd rather not answer in JSON.".to_string()),
                };
            }
        }

        Ok(self.reply(prompt))
    }

    fn max_concurrency(&self) -> usize {
        self.concurrency
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Persona a question or answer prompt is about
pub fn persona_name(prompt: &Prompt) -> Option<String> {
    let line = match prompt.kind {
        PromptKind::InterviewQuestion => prompt
            .user
            .lines()
            .find_map(|l| l.strip_prefix("Persona: "))?,
        PromptKind::InterviewAnswer => prompt.system.lines().nth(1)?,
        _ => return None,
    };
    line.split(" - ").next().map(str::to_string)
}
