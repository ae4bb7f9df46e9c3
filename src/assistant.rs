//! Offline help desk: canned answers matched by keyword.

struct Canned {
    keyword: &'static str,
    answer: &'static str,
}

const CANNED: &[Canned] = &[
    Canned {
        keyword: "what is parkinson",
        answer: "Parkinson's disease is a progressive nervous system disorder that affects movement. \
                 Common signs include tremor, stiffness, and slow movement.",
    },
    Canned {
        keyword: "symptoms",
        answer: "Common symptoms: tremor, bradykinesia (slowness), rigidity, postural instability, \
                 speech changes, masked face.",
    },
    Canned {
        keyword: "how accurate",
        answer: "Accuracy depends on the model and data. This app shows a probability; \
                 always consult a medical professional for diagnosis.",
    },
    Canned {
        keyword: "how to use",
        answer: "Describe your symptoms, select a severity, and run `predict`. \
                 Use `history` to view past results.",
    },
];

pub const FALLBACK: &str = "Sorry, I don't know that. Try: 'symptoms', 'how to use', or 'what is parkinson'.";

/// First canned answer whose keyword appears in the question, if any.
pub fn answer(question: &str) -> Option<&'static str> {
    let q = question.trim().to_lowercase();
    if q.is_empty() {
        return None;
    }
    CANNED.iter().find(|c| q.contains(c.keyword)).map(|c| c.answer)
}

pub fn reply(question: &str) -> &'static str {
    answer(question).unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_keyword_inside_question() {
        assert!(reply("What are the SYMPTOMS to look for?").starts_with("Common symptoms"));
        assert!(reply("so, what is Parkinson exactly").starts_with("Parkinson's disease"));
    }

    #[test]
    fn unknown_question_falls_back() {
        assert_eq!(reply("weather tomorrow"), FALLBACK);
        assert_eq!(answer("   "), None);
    }
}
