// Candidate-facing copy emitted by the dialogue controller.

use crate::dialogue::session::ClosureReason;

/// Whole-message commands that end the session early.
pub const EXIT_KEYWORDS: &[&str] = &["bye", "exit", "end", "stop", "quit", "thank you", "thanks"];

pub fn closing_message(reason: ClosureReason) -> &'static str {
    match reason {
        ClosureReason::Completed | ClosureReason::CandidateExited => {
            "Thank you for your time! Your information has been noted, and our team \
             will review it shortly. Best of luck!"
        }
        ClosureReason::IdleTimeout => {
            "This session was closed after a period of inactivity. Thank you for your \
             time; the details you shared so far have been noted."
        }
        ClosureReason::GenerationFailed => {
            "Sorry, I couldn't prepare your technical questions right now. Your details \
             have been saved and our team will follow up with you directly."
        }
    }
}

/// True when the whole message is an exit keyword, ignoring case and
/// trailing punctuation. "backend" or "I'll stop by later" are not exits.
pub fn is_exit_request(text: &str) -> bool {
    let normalized = text
        .trim()
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?' | ','))
        .trim()
        .to_lowercase();
    EXIT_KEYWORDS.contains(&normalized.as_str())
}
