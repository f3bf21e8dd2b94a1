//! Wake-word normalization and keyword command dispatch.
//!
//! `normalize` owns all wake-word handling: it gates on the presence of a
//! wake word and strips every occurrence in one pass, so no other layer ever
//! inspects wake words. `dispatch` maps the stripped remainder onto an
//! ordered list of substring rules; the first match wins.

use chrono::Local;

const SEARCH_BASE_URL: &str = "https://duckduckgo.com/?q=";

/// What the main loop should do after speaking a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Shutdown,
}

/// A spoken reply plus the loop action it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub action: Action,
}

impl Reply {
    fn say(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: Action::Continue,
        }
    }

    fn shutdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: Action::Shutdown,
        }
    }
}

/// Keyword command dispatcher. Rules are fixed at construction; only the
/// wake-word list is configurable.
pub struct Dispatcher {
    wake_words: Vec<String>,
}

impl Dispatcher {
    pub fn new(wake_words: Vec<String>) -> Self {
        Self {
            wake_words: wake_words
                .into_iter()
                .map(|word| word.to_lowercase())
                .collect(),
        }
    }

    /// Gate and strip in one step: returns `None` when no wake word is
    /// present (the utterance is ignored), otherwise the lowercased command
    /// with every wake-word occurrence removed and whitespace collapsed.
    pub fn normalize(&self, transcript: &str) -> Option<String> {
        let text = transcript.to_lowercase();
        if !self.wake_words.iter().any(|word| text.contains(word)) {
            return None;
        }
        let mut stripped = text;
        for word in &self.wake_words {
            stripped = stripped.replace(word, " ");
        }
        Some(collapse_whitespace(&stripped))
    }

    /// Pure mapping from a normalized command to a reply. Checks run top to
    /// bottom; ordering is part of the contract.
    pub fn dispatch(&self, command: &str) -> Reply {
        if command.is_empty() {
            return Reply::say("Yes, I am listening.");
        }

        if contains_any(command, &["time", "samay", "baj"]) {
            return Reply::say(format!("The time is {}.", current_time()));
        }

        if contains_any(command, &["hello", "hi"]) {
            return Reply::say("Hello, how can I help you?");
        }

        if command.contains("how are you") {
            return Reply::say("I am just code, but I am running perfectly fine!");
        }

        if contains_any(command, &["your name", "who are you"]) {
            return Reply::say("My name is voxassist, your voice assistant.");
        }

        if contains_any(command, &["search", "google"]) {
            let query = extract_search_query(command);
            if query.is_empty() {
                return Reply::say("What should I search for?");
            }
            return Reply::say(search_reply(&query));
        }

        if contains_any(command, &["shutdown", "band ho ja", "exit"]) {
            return Reply::shutdown("Okay, shutting down. Bye!");
        }

        Reply::say(format!(
            "You said: {command}. I have not been taught this command yet."
        ))
    }
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn current_time() -> String {
    Local::now().format("%I:%M %p").to_string()
}

fn extract_search_query(command: &str) -> String {
    let stripped = command
        .replace("on google", " ")
        .replace("google", " ")
        .replace("search", " ");
    collapse_whitespace(&stripped)
}

fn search_reply(query: &str) -> String {
    let url = format!("{SEARCH_BASE_URL}{}", query.replace(' ', "+"));
    format!("Here is what I found about {query}. You can open: {url}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(vec!["jarvis".to_string(), "jervis".to_string()])
    }

    #[test]
    fn normalize_rejects_transcripts_without_wake_word() {
        assert_eq!(dispatcher().normalize("goodbye"), None);
        assert_eq!(dispatcher().normalize("what time is it"), None);
    }

    #[test]
    fn normalize_strips_wake_word_at_any_position() {
        let d = dispatcher();
        assert_eq!(d.normalize("jarvis what time is it").as_deref(), Some("what time is it"));
        assert_eq!(d.normalize("what time is it jarvis").as_deref(), Some("what time is it"));
        assert_eq!(d.normalize("what jarvis time is it").as_deref(), Some("what time is it"));
    }

    #[test]
    fn normalize_strips_every_occurrence() {
        let d = dispatcher();
        assert_eq!(d.normalize("jarvis jarvis hello").as_deref(), Some("hello"));
        assert_eq!(d.normalize("jervis hello jarvis").as_deref(), Some("hello"));
    }

    #[test]
    fn normalize_lowercases_input() {
        let d = dispatcher();
        assert_eq!(d.normalize("Jarvis HELLO").as_deref(), Some("hello"));
    }

    #[test]
    fn empty_command_yields_listening_acknowledgment() {
        let d = dispatcher();
        let command = d.normalize("jarvis").expect("wake word present");
        assert_eq!(command, "");
        assert_eq!(d.dispatch(&command).text, "Yes, I am listening.");
    }

    #[test]
    fn time_reply_matches_clock_format() {
        let d = dispatcher();
        let command = d.normalize("jarvis what time is it").unwrap();
        let reply = d.dispatch(&command);
        let pattern = Regex::new(r"^The time is \d{2}:\d{2} (AM|PM)\.$").unwrap();
        assert!(
            pattern.is_match(&reply.text),
            "unexpected time reply: {}",
            reply.text
        );
        assert_eq!(reply.action, Action::Continue);
    }

    #[test]
    fn time_wins_over_greeting_by_rule_order() {
        let d = dispatcher();
        let reply = d.dispatch("hello what time is it");
        assert!(reply.text.starts_with("The time is"));
    }

    #[test]
    fn greeting_matches_hello() {
        let d = dispatcher();
        assert_eq!(d.dispatch("hello there").text, "Hello, how can I help you?");
    }

    #[test]
    fn how_are_you_reply() {
        let d = dispatcher();
        assert_eq!(
            d.dispatch("how are you today").text,
            "I am just code, but I am running perfectly fine!"
        );
    }

    #[test]
    fn identity_reply() {
        let d = dispatcher();
        let reply = d.dispatch("tell me your name");
        assert!(reply.text.contains("voxassist"));
        assert_eq!(d.dispatch("who are you").text, reply.text);
    }

    #[test]
    fn search_reply_contains_query_and_url() {
        let d = dispatcher();
        let command = d.normalize("jarvis search python tutorials").unwrap();
        let reply = d.dispatch(&command);
        assert!(reply.text.contains("python tutorials"));
        assert!(reply
            .text
            .contains("https://duckduckgo.com/?q=python+tutorials"));
        assert_eq!(reply.action, Action::Continue);
    }

    #[test]
    fn google_keyword_also_triggers_search() {
        let d = dispatcher();
        let reply = d.dispatch("google rust language");
        assert!(reply.text.contains("rust language"));
        assert!(reply.text.contains("https://duckduckgo.com/?q=rust+language"));
    }

    #[test]
    fn empty_search_query_asks_for_one() {
        let d = dispatcher();
        assert_eq!(d.dispatch("search").text, "What should I search for?");
    }

    #[test]
    fn shutdown_phrases_request_termination() {
        let d = dispatcher();
        for phrase in ["shutdown now", "band ho ja", "exit"] {
            let reply = d.dispatch(phrase);
            assert_eq!(reply.action, Action::Shutdown, "phrase: {phrase}");
            assert_eq!(reply.text, "Okay, shutting down. Bye!");
        }
    }

    #[test]
    fn unknown_commands_echo_with_fallback() {
        let d = dispatcher();
        let reply = d.dispatch("make me a sandwich");
        assert_eq!(
            reply.text,
            "You said: make me a sandwich. I have not been taught this command yet."
        );
        assert_eq!(reply.action, Action::Continue);
    }
}
