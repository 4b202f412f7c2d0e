//! Conversation topic suggestions for contacts who are due.
//!
//! The suggester is a one-way switch: the first failed call disables it for
//! the rest of the process. It is never retried and never re-enabled, and a
//! failure here has no effect on anything else.

use tracing::warn;

use super::{AiConfig, AiProvider, ChatMessage, RemoteProvider};
use crate::db::Database;
use crate::models::ContactId;

/// Number of past conversations summarized in the prompt
const RECENT_CONVERSATIONS: usize = 3;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that suggests conversation topics.";

/// Everything about a contact the provider gets to see
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPrompt {
    pub contact_name: String,
    pub birthday: Option<String>,
    pub residence: Option<String>,
    pub hobbies: Option<String>,
    pub recent_summary: String,
    pub additional_info: String,
}

impl TopicPrompt {
    pub fn for_contact(db: &Database, id: ContactId) -> crate::Result<Self> {
        let contact = db.contact(id)?;
        let recent = db.most_recent(id, RECENT_CONVERSATIONS)?;

        let recent_summary = if recent.is_empty() {
            "No recent conversations available.".to_string()
        } else {
            recent
                .iter()
                .map(|e| format!("Date: {}, Topics: {}.", e.date, e.importance_summary()))
                .collect::<Vec<_>>()
                .join(" ")
        };

        Ok(Self {
            contact_name: contact.name.clone(),
            birthday: contact.birthday.clone(),
            residence: contact.residence.clone(),
            hobbies: contact.hobbies.clone(),
            recent_summary,
            additional_info: contact.additional_info.clone(),
        })
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        let unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| "unknown".to_string());
        let user = format!(
            "Generate a conversation topic for {}. They were born on {}, they live in {}, \
             and their hobbies include {}. Recent conversation history: {} Additional notes: {}.",
            self.contact_name,
            unknown(&self.birthday),
            unknown(&self.residence),
            unknown(&self.hobbies),
            self.recent_summary,
            self.additional_info,
        );
        vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    Topic(String),
    /// Feature is off (not configured, turned off, or tripped earlier)
    Disabled,
    /// This call failed and the feature is now off
    Failed(String),
}

pub struct TopicSuggester {
    provider: Option<Box<dyn AiProvider>>,
    disabled_reason: Option<String>,
}

impl TopicSuggester {
    pub fn new(provider: Box<dyn AiProvider>) -> Self {
        Self {
            provider: Some(provider),
            disabled_reason: None,
        }
    }

    pub fn disabled(reason: impl Into<String>) -> Self {
        Self {
            provider: None,
            disabled_reason: Some(reason.into()),
        }
    }

    /// Build from configuration; `allowed = false` comes from `--no-ai`
    pub fn from_config(config: &AiConfig, allowed: bool) -> Self {
        if !allowed {
            return Self::disabled("turned off with --no-ai");
        }
        if !config.is_configured() {
            return Self::disabled("no AI_API_KEY set");
        }
        match RemoteProvider::new(config) {
            Ok(provider) => Self::new(Box::new(provider)),
            Err(e) => {
                warn!(error = %e, "could not create AI provider");
                Self::disabled(e.to_string())
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.disabled_reason.is_none() && self.provider.as_ref().map_or(false, |p| p.is_ready())
    }

    pub fn disabled_reason(&self) -> Option<&str> {
        self.disabled_reason.as_deref()
    }

    pub fn suggest(&mut self, prompt: &TopicPrompt) -> Suggestion {
        if !self.is_enabled() {
            return Suggestion::Disabled;
        }
        let Some(provider) = self.provider.as_ref() else {
            return Suggestion::Disabled;
        };

        match provider.complete_text(&prompt.messages()) {
            Ok(topic) => Suggestion::Topic(topic),
            Err(e) => {
                let reason = e.to_string();
                warn!(provider = provider.name(), error = %reason, "topic suggestions disabled after failure");
                self.disabled_reason = Some(reason.clone());
                Suggestion::Failed(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ai::AiResponse;
    use crate::models::{Category, ContactDraft, Importance, TopicNote};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeProvider {
        calls: Arc<AtomicUsize>,
        fail_on: usize,
    }

    impl AiProvider for FakeProvider {
        fn complete(&self, _messages: &[ChatMessage]) -> anyhow::Result<AiResponse> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n >= self.fail_on {
                anyhow::bail!("quota exceeded");
            }
            Ok(AiResponse::text("  Ask about the marathon  "))
        }

        fn name(&self) -> &str {
            "fake"
        }

        fn is_ready(&self) -> bool {
            true
        }
    }

    fn prompt() -> TopicPrompt {
        TopicPrompt {
            contact_name: "Alex".into(),
            birthday: None,
            residence: Some("Seoul".into()),
            hobbies: None,
            recent_summary: "No recent conversations available.".into(),
            additional_info: String::new(),
        }
    }

    #[test]
    fn test_breaker_trips_once_and_stays_off() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut suggester = TopicSuggester::new(Box::new(FakeProvider {
            calls: calls.clone(),
            fail_on: 1,
        }));

        assert_eq!(
            suggester.suggest(&prompt()),
            Suggestion::Topic("Ask about the marathon".into())
        );
        assert_eq!(
            suggester.suggest(&prompt()),
            Suggestion::Failed("quota exceeded".into())
        );
        assert!(!suggester.is_enabled());

        // No further calls reach the provider
        assert_eq!(suggester.suggest(&prompt()), Suggestion::Disabled);
        assert_eq!(suggester.suggest(&prompt()), Suggestion::Disabled);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(suggester.disabled_reason(), Some("quota exceeded"));
    }

    #[test]
    fn test_disabled_without_key_or_when_turned_off() {
        let mut suggester = TopicSuggester::from_config(&AiConfig::default(), true);
        assert!(!suggester.is_enabled());
        assert_eq!(suggester.suggest(&prompt()), Suggestion::Disabled);

        let config = AiConfig {
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        let suggester = TopicSuggester::from_config(&config, false);
        assert!(!suggester.is_enabled());
        assert_eq!(suggester.disabled_reason(), Some("turned off with --no-ai"));
    }

    #[test]
    fn test_prompt_uses_unknown_for_unset_fields() {
        let messages = prompt().messages();
        assert_eq!(messages.len(), 2);
        let user = messages[1].content.clone().unwrap();
        assert!(user.contains("born on unknown"));
        assert!(user.contains("live in Seoul"));
        assert!(user.contains("hobbies include unknown"));
    }

    #[test]
    fn test_prompt_summarizes_recent_history() {
        let mut db = Database::open_memory();
        let group = db.add_group("Friends", "14", "3").unwrap();
        let id = db.add_contact(ContactDraft::new("Alex"), group).unwrap();
        for (date, importance) in [("2024-01-01", 1), ("2024-03-01", 3), ("2024-02-01", 2), ("2024-04-01", 4)] {
            let mut topics = BTreeMap::new();
            topics.insert(Category::Work, TopicNote::new(Importance::new(importance).unwrap(), ""));
            db.record_conversation(id, date, topics).unwrap();
        }

        let prompt = TopicPrompt::for_contact(&db, id).unwrap();
        assert_eq!(
            prompt.recent_summary,
            "Date: 2024-04-01, Topics: Work: 4. Date: 2024-03-01, Topics: Work: 3. \
             Date: 2024-02-01, Topics: Work: 2."
        );
    }
}
