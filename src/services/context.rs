use tokio_util::sync::CancellationToken;

use crate::i18n::{self, TextKey};
use crate::models::{Language, Notice, NoticeKind};

/// Per-run state shared by the pipeline stages: the caller's cancellation
/// token and the notices collected for the caller.
#[derive(Debug)]
pub struct RunContext {
    cancel: CancellationToken,
    language: Language,
    notices: Vec<Notice>,
}

impl RunContext {
    pub fn new(language: Language, cancel: CancellationToken) -> Self {
        Self {
            cancel,
            language,
            notices: Vec::new(),
        }
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Records a localized warning; `detail` is appended when present
    pub fn notify(&mut self, kind: NoticeKind, detail: Option<&str>) {
        let base = i18n::text(notice_text(kind), self.language);
        let message = match detail {
            Some(detail) => format!("{} Error: {}", base, detail),
            None => base.to_string(),
        };

        tracing::warn!(kind = ?kind, message = %message, "Pipeline notice");
        self.notices.push(Notice { kind, message });
    }

    pub fn into_notices(self) -> Vec<Notice> {
        self.notices
    }
}

fn notice_text(kind: NoticeKind) -> TextKey {
    match kind {
        NoticeKind::ComposerFailed | NoticeKind::SummarizerFailed | NoticeKind::FallbackFailed => {
            TextKey::ErrorLlm
        }
        NoticeKind::RateLimited => TextKey::RateLimitWarning,
        NoticeKind::SearchFailed => TextKey::ErrorSearch,
        NoticeKind::NoResults => TextKey::NoResults,
        NoticeKind::Cancelled => TextKey::SearchCancelled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_is_localized() {
        let mut ctx = RunContext::new(Language::De, CancellationToken::new());
        ctx.notify(NoticeKind::SearchFailed, Some("timeout"));

        let notices = ctx.into_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(
            notices[0].message,
            "Suche fehlgeschlagen. Überprüfe deine Verbindung. Error: timeout"
        );
    }
}
