use ratatui::layout::Rect;

use crate::backend::{BackendClient, ProcessVideoResponse, DEFAULT_SERVER_URL};
use crate::config::Config;
use crate::input::InputBox;
use crate::theme::Theme;
use crate::transcript::Transcript;
use crate::youtube;

pub const WELCOME_TEXT: &str = "I'm ready! What would you like to know about the video?";
pub const FALLBACK_ANSWER_TEXT: &str = "Sorry, I couldn't generate a response.";
pub const CHAT_ERROR_TEXT: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    VideoInput,
    ChatInput,
    Transcript,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusLine {
    pub text: String,
    pub kind: StatusKind,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub focus: FocusPane,
    pub theme: Theme,

    // Form state
    pub video_input: InputBox,
    pub chat_input: InputBox,

    // Conversation state
    pub transcript: Transcript,
    pub chat_enabled: bool,
    pub status: Option<StatusLine>,

    // One session per submitted video; replies tagged with an older session
    // are dropped instead of landing in the new conversation
    pub session: u64,
    pub video_task: Option<tokio::task::JoinHandle<anyhow::Result<ProcessVideoResponse>>>,
    pub chat_task: Option<(u64, tokio::task::JoinHandle<anyhow::Result<String>>)>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Transcript view state
    pub transcript_scroll: u16,
    pub scroll_pending: bool,

    // Transcript area from the last render, for mouse hit-testing
    pub transcript_area: Option<Rect>,

    pub backend: BackendClient,
}

impl App {
    pub fn new(config: &Config) -> Self {
        // Saved preference wins, then whatever the terminal reports, then light
        let theme = config
            .theme
            .as_deref()
            .and_then(Theme::from_str)
            .or_else(Theme::detect)
            .unwrap_or(Theme::Light);

        let server_url = config.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL);

        Self {
            should_quit: false,
            focus: FocusPane::VideoInput,
            theme,

            video_input: InputBox::new(),
            chat_input: InputBox::new(),

            transcript: Transcript::new(),
            chat_enabled: false,
            status: None,

            session: 0,
            video_task: None,
            chat_task: None,

            animation_frame: 0,

            transcript_scroll: 0,
            scroll_pending: false,

            transcript_area: None,

            backend: BackendClient::new(server_url),
        }
    }

    pub fn video_busy(&self) -> bool {
        self.video_task.is_some()
    }

    pub fn chat_busy(&self) -> bool {
        self.chat_task.is_some()
    }

    pub fn set_status(&mut self, text: &str, kind: StatusKind) {
        self.status = Some(StatusLine {
            text: text.to_string(),
            kind,
        });
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        // Persisting the preference is best-effort
        let _ = Config::save_theme(self.theme);
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FocusPane::VideoInput => {
                if self.chat_enabled {
                    FocusPane::ChatInput
                } else {
                    FocusPane::Transcript
                }
            }
            FocusPane::ChatInput => FocusPane::Transcript,
            FocusPane::Transcript => FocusPane::VideoInput,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            FocusPane::VideoInput => FocusPane::Transcript,
            FocusPane::ChatInput => FocusPane::VideoInput,
            FocusPane::Transcript => {
                if self.chat_enabled {
                    FocusPane::ChatInput
                } else {
                    FocusPane::VideoInput
                }
            }
        };
    }

    /// Inline validation feedback while the URL is being typed. Submission
    /// re-validates; this only drives the status line.
    pub fn refresh_url_feedback(&mut self) {
        let url = self.video_input.content().trim().to_string();
        if url.is_empty() {
            self.status = None;
        } else if youtube::is_video_url(&url) {
            self.set_status("Valid YouTube URL", StatusKind::Success);
        } else {
            self.set_status("Please enter a valid YouTube URL", StatusKind::Error);
        }
    }

    /// Validate the URL field and kick off video processing. A new video
    /// starts a fresh session: the prior conversation is cleared and chat
    /// stays locked until this one processes successfully.
    pub fn submit_video(&mut self) {
        if self.video_task.is_some() {
            return;
        }
        let url = self.video_input.content().trim().to_string();
        if url.is_empty() {
            return;
        }
        if !youtube::is_video_url(&url) {
            self.set_status("Please enter a valid YouTube URL", StatusKind::Error);
            return;
        }

        self.session += 1;
        self.transcript.clear();
        self.chat_enabled = false;
        self.transcript_scroll = 0;
        self.set_status("Processing video transcript...", StatusKind::Loading);

        tracing::info!("processing video: {}", url);
        let backend = self.backend.clone();
        self.video_task = Some(tokio::spawn(async move { backend.process_video(&url).await }));
    }

    /// Send the chat field's content as a question about the current video
    pub fn send_chat(&mut self) {
        if !self.chat_enabled || self.chat_task.is_some() {
            return;
        }
        let message = self.chat_input.content().trim().to_string();
        if message.is_empty() {
            return;
        }

        self.transcript.push_user(&message);
        self.chat_input.clear();
        self.transcript.push_thinking();
        self.scroll_pending = true;

        tracing::info!("sending chat query ({} chars)", message.chars().count());
        let backend = self.backend.clone();
        let session = self.session;
        self.chat_task = Some((
            session,
            tokio::spawn(async move { backend.chat(&message).await }),
        ));
    }

    /// Consume finished request tasks and apply their outcome. Called from
    /// the event loop after every event, including ticks, so completions are
    /// picked up within one tick interval.
    pub async fn poll_tasks(&mut self) {
        if self.video_task.as_ref().map(|t| t.is_finished()).unwrap_or(false) {
            if let Some(task) = self.video_task.take() {
                let result = match task.await {
                    Ok(result) => result,
                    Err(e) => Err(anyhow::anyhow!("video task failed: {}", e)),
                };
                self.on_video_result(result);
            }
        }

        if self.chat_task.as_ref().map(|(_, t)| t.is_finished()).unwrap_or(false) {
            if let Some((session, task)) = self.chat_task.take() {
                let result = match task.await {
                    Ok(result) => result,
                    Err(e) => Err(anyhow::anyhow!("chat task failed: {}", e)),
                };
                self.on_chat_result(session, result);
            }
        }
    }

    fn on_video_result(&mut self, result: anyhow::Result<ProcessVideoResponse>) {
        match result {
            Ok(response) => {
                tracing::info!(
                    "video processed: id={:?} chunks={:?}",
                    response.video_id,
                    response.chunks
                );
                self.set_status(
                    "Video processed! You can now ask questions.",
                    StatusKind::Success,
                );
                self.chat_enabled = true;
                self.transcript.push_bot(WELCOME_TEXT);
                self.scroll_pending = true;
                self.focus = FocusPane::ChatInput;
            }
            Err(e) => {
                tracing::warn!("video processing failed: {}", e);
                self.set_status(&format!("Error: {}", e), StatusKind::Error);
                self.chat_enabled = false;
            }
        }
    }

    fn on_chat_result(&mut self, session: u64, result: anyhow::Result<String>) {
        if session != self.session {
            // A new video was submitted while this reply was in flight
            tracing::info!("dropping chat reply from a previous session");
            return;
        }

        match result {
            Ok(answer) => {
                if answer.is_empty() {
                    self.transcript.resolve_thinking(FALLBACK_ANSWER_TEXT);
                } else {
                    self.transcript.resolve_thinking(&answer);
                }
            }
            Err(e) => {
                tracing::warn!("chat request failed: {}", e);
                self.transcript.resolve_thinking(CHAT_ERROR_TEXT);
            }
        }

        self.scroll_pending = true;
        self.focus = FocusPane::ChatInput;
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.video_task.is_some() || self.transcript.has_thinking() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn test_app() -> App {
        App::new(&Config::new())
    }

    fn type_into_video(app: &mut App, text: &str) {
        for c in text.chars() {
            app.video_input.insert_char(c);
        }
    }

    fn type_into_chat(app: &mut App, text: &str) {
        for c in text.chars() {
            app.chat_input.insert_char(c);
        }
    }

    fn ok_response() -> ProcessVideoResponse {
        ProcessVideoResponse {
            status: "ok".to_string(),
            video_id: Some("abc123".to_string()),
            chunks: Some(12),
            message: None,
        }
    }

    #[test]
    fn test_video_success_enables_chat_with_one_welcome_message() {
        let mut app = test_app();
        app.on_video_result(Ok(ok_response()));

        assert!(app.chat_enabled);
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.transcript.messages()[0].content, WELCOME_TEXT);
        assert_eq!(app.focus, FocusPane::ChatInput);
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Success));
    }

    #[test]
    fn test_video_failure_keeps_chat_disabled() {
        let mut app = test_app();
        app.on_video_result(Err(anyhow!("No transcript available")));

        assert!(!app.chat_enabled);
        assert!(app.transcript.is_empty());
        let status = app.status.expect("status should be set");
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.text, "Error: No transcript available");
    }

    #[test]
    fn test_chat_reply_replaces_thinking() {
        let mut app = test_app();
        app.chat_enabled = true;
        app.transcript.push_user("What is this about?");
        app.transcript.push_thinking();

        app.on_chat_result(0, Ok("**It's** about cats.".to_string()));

        assert!(!app.transcript.has_thinking());
        assert_eq!(app.transcript.len(), 2);
        assert_eq!(app.transcript.messages()[1].content, "**It's** about cats.");
    }

    #[test]
    fn test_empty_answer_falls_back() {
        let mut app = test_app();
        app.transcript.push_user("hello?");
        app.transcript.push_thinking();

        app.on_chat_result(0, Ok(String::new()));

        assert!(!app.transcript.has_thinking());
        assert_eq!(app.transcript.messages()[1].content, FALLBACK_ANSWER_TEXT);
    }

    #[test]
    fn test_chat_error_shows_fixed_warning() {
        let mut app = test_app();
        app.transcript.push_user("hello?");
        app.transcript.push_thinking();

        app.on_chat_result(0, Err(anyhow!("connection refused")));

        assert!(!app.transcript.has_thinking());
        assert_eq!(app.transcript.messages()[1].content, CHAT_ERROR_TEXT);
    }

    #[test]
    fn test_stale_chat_reply_is_dropped() {
        let mut app = test_app();
        // The reply belongs to session 1; a new video bumped us to session 2
        // and cleared the transcript
        app.session = 2;

        app.on_chat_result(1, Ok("late answer".to_string()));

        assert!(app.transcript.is_empty());
    }

    #[test]
    fn test_send_chat_requires_enabled_chat() {
        let mut app = test_app();
        type_into_chat(&mut app, "hi");
        app.send_chat();

        assert!(app.transcript.is_empty());
        assert!(app.chat_task.is_none());
    }

    #[test]
    fn test_send_chat_ignores_whitespace_only() {
        let mut app = test_app();
        app.chat_enabled = true;
        type_into_chat(&mut app, "   ");
        app.chat_input.insert_newline();
        app.send_chat();

        assert!(app.transcript.is_empty());
        assert!(app.chat_task.is_none());
    }

    #[tokio::test]
    async fn test_send_chat_appends_user_then_thinking() {
        let mut app = test_app();
        app.chat_enabled = true;
        type_into_chat(&mut app, "  What is this about?  ");
        app.send_chat();

        assert_eq!(app.transcript.len(), 2);
        assert_eq!(app.transcript.messages()[0].content, "What is this about?");
        assert!(app.transcript.messages()[1].thinking);
        assert!(app.chat_input.is_empty());
        assert!(app.chat_busy());

        // A second send while the reply is pending is ignored
        type_into_chat(&mut app, "again");
        app.send_chat();
        assert_eq!(app.transcript.len(), 2);
    }

    #[tokio::test]
    async fn test_submit_video_starts_fresh_session() {
        let mut app = test_app();
        app.transcript.push_user("old conversation");
        app.chat_enabled = true;

        type_into_video(&mut app, "https://youtu.be/abc123");
        app.submit_video();

        assert!(app.video_busy());
        assert!(app.transcript.is_empty());
        assert!(!app.chat_enabled);
        assert_eq!(app.session, 1);
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Loading));

        // Submitting again while busy is ignored
        app.submit_video();
        assert_eq!(app.session, 1);
    }

    #[test]
    fn test_submit_video_rejects_invalid_url() {
        let mut app = test_app();
        type_into_video(&mut app, "https://notyoutube.com/x");
        app.submit_video();

        assert!(app.video_task.is_none());
        assert_eq!(app.session, 0);
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Error));
    }

    #[test]
    fn test_submit_video_ignores_empty_input() {
        let mut app = test_app();
        type_into_video(&mut app, "   ");
        app.submit_video();

        assert!(app.video_task.is_none());
        assert!(app.status.is_none());
    }

    #[tokio::test]
    async fn test_poll_applies_finished_video_task() {
        let mut app = test_app();
        app.video_task = Some(tokio::spawn(async { Ok(ok_response()) }));

        for _ in 0..100 {
            app.poll_tasks().await;
            if app.video_task.is_none() {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert!(app.video_task.is_none());
        assert!(app.chat_enabled);
        assert_eq!(app.transcript.len(), 1);
        assert_eq!(app.transcript.messages()[0].content, WELCOME_TEXT);
    }

    #[tokio::test]
    async fn test_poll_drops_stale_chat_reply() {
        let mut app = test_app();
        app.session = 3;
        app.chat_task = Some((2, tokio::spawn(async { Ok("late".to_string()) })));

        for _ in 0..100 {
            app.poll_tasks().await;
            if app.chat_task.is_none() {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert!(app.chat_task.is_none());
        assert!(app.transcript.is_empty());
    }

    #[test]
    fn test_focus_cycle_skips_disabled_chat() {
        let mut app = test_app();
        assert_eq!(app.focus, FocusPane::VideoInput);

        app.focus_next();
        assert_eq!(app.focus, FocusPane::Transcript);
        app.focus_next();
        assert_eq!(app.focus, FocusPane::VideoInput);

        app.chat_enabled = true;
        app.focus_next();
        assert_eq!(app.focus, FocusPane::ChatInput);
        app.focus_next();
        assert_eq!(app.focus, FocusPane::Transcript);

        app.focus_prev();
        assert_eq!(app.focus, FocusPane::ChatInput);
        app.focus_prev();
        assert_eq!(app.focus, FocusPane::VideoInput);
    }

    #[test]
    fn test_url_feedback_tracks_field_content() {
        let mut app = test_app();
        type_into_video(&mut app, "https://notyet");
        app.refresh_url_feedback();
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Error));

        type_into_video(&mut app, "...");
        app.video_input.clear();
        type_into_video(&mut app, "https://youtu.be/abc");
        app.refresh_url_feedback();
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Success));

        app.video_input.clear();
        app.refresh_url_feedback();
        assert!(app.status.is_none());
    }
}
