use advisor_core::{AdvisorClient, Command, Config, DocumentKind, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Chat,
    Roadmap,
    Stories,
    Architecture,
    Legal,
}

impl Screen {
    pub fn all() -> [Screen; 5] {
        [
            Screen::Chat,
            Screen::Roadmap,
            Screen::Stories,
            Screen::Architecture,
            Screen::Legal,
        ]
    }

    pub fn index(&self) -> usize {
        match self {
            Screen::Chat => 0,
            Screen::Roadmap => 1,
            Screen::Stories => 2,
            Screen::Architecture => 3,
            Screen::Legal => 4,
        }
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::all().get(idx).copied()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::Chat => "Chat",
            Screen::Roadmap => "Roadmap",
            Screen::Stories => "User Stories",
            Screen::Architecture => "Architecture",
            Screen::Legal => "Legal",
        }
    }

    /// The document a screen shows, if it is one of the informational tabs.
    pub fn document(&self) -> Option<DocumentKind> {
        match self {
            Screen::Chat => None,
            Screen::Roadmap => Some(DocumentKind::Roadmap),
            Screen::Stories => Some(DocumentKind::UserStories),
            Screen::Architecture => Some(DocumentKind::Architecture),
            Screen::Legal => Some(DocumentKind::Legal),
        }
    }

    pub fn next(&self) -> Self {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn prev(&self) -> Self {
        let all = Self::all();
        all[(self.index() + all.len() - 1) % all.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Which text field receives keystrokes in editing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Question,
    Comment,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub edit_target: EditTarget,

    // View controller and the client its commands run against
    pub session: Session,
    pub client: AdvisorClient,

    // Text cursors (character positions)
    pub question_cursor: usize,
    pub comment_cursor: usize,

    // Per-screen scroll offsets, updated during render
    pub scroll: [u16; 5],
    pub max_scroll: [u16; 5],
    pub body_height: u16,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Requests waiting to be dispatched by the event loop
    pending: Vec<Command>,
}

impl App {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = AdvisorClient::from_config(config)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: AdvisorClient) -> Self {
        Self {
            should_quit: false,
            screen: Screen::Chat,
            input_mode: InputMode::Normal,
            edit_target: EditTarget::Question,

            session: Session::new(),
            client,

            question_cursor: 0,
            comment_cursor: 0,

            scroll: [0; 5],
            max_scroll: [0; 5],
            body_height: 0,

            animation_frame: 0,

            pending: Vec::new(),
        }
    }

    /// Drain the requests produced since the last call.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.pending)
    }

    fn queue(&mut self, command: Option<Command>) {
        if let Some(command) = command {
            self.pending.push(command);
        }
    }

    // Screen switching

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.input_mode = InputMode::Normal;
    }

    // Chat

    pub fn start_editing(&mut self, target: EditTarget) {
        self.edit_target = target;
        self.input_mode = InputMode::Editing;
        match target {
            EditTarget::Question => {
                self.question_cursor = self.session.input.chars().count();
            }
            EditTarget::Comment => {
                self.comment_cursor = self.session.feedback.comment.chars().count();
                // The form sits at the bottom of the chat panel
                self.scroll[Screen::Chat.index()] = self.max_scroll[Screen::Chat.index()];
            }
        }
    }

    pub fn submit_question(&mut self) {
        let command = self.session.submit_question();
        if command.is_some() {
            self.input_mode = InputMode::Normal;
            self.scroll[Screen::Chat.index()] = 0;
        }
        self.queue(command);
    }

    pub fn submit_feedback(&mut self) {
        let command = self.session.submit_feedback();
        self.queue(command);
    }

    // Tabs

    /// Load the current informational tab, or retry it after an error.
    pub fn load_current_tab(&mut self) {
        if let Some(kind) = self.screen.document() {
            let command = self.session.load_tab(kind);
            self.queue(command);
        }
    }

    // Scrolling

    pub fn scroll_down(&mut self, lines: u16) {
        let idx = self.screen.index();
        self.scroll[idx] = self.scroll[idx].saturating_add(lines).min(self.max_scroll[idx]);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        let idx = self.screen.index();
        self.scroll[idx] = self.scroll[idx].saturating_sub(lines);
    }

    pub fn scroll_half_page_down(&mut self) {
        self.scroll_down((self.body_height / 2).max(1));
    }

    pub fn scroll_half_page_up(&mut self) {
        self.scroll_up((self.body_height / 2).max(1));
    }

    pub fn scroll_top(&mut self) {
        self.scroll[self.screen.index()] = 0;
    }

    pub fn scroll_bottom(&mut self) {
        let idx = self.screen.index();
        self.scroll[idx] = self.max_scroll[idx];
    }

    /// Record how far the current content can scroll, clamping the offset.
    pub fn set_scroll_limit(&mut self, screen: Screen, max: u16) {
        let idx = screen.index();
        self.max_scroll[idx] = max;
        self.scroll[idx] = self.scroll[idx].min(max);
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn ellipsis(&self) -> &'static str {
        match self.animation_frame {
            0 => ".",
            1 => "..",
            _ => "...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_app() -> App {
        App::with_client(AdvisorClient::new("http://127.0.0.1:9"))
    }

    #[test]
    fn test_screen_cycle() {
        assert_eq!(Screen::Chat.next(), Screen::Roadmap);
        assert_eq!(Screen::Legal.next(), Screen::Chat);
        assert_eq!(Screen::Chat.prev(), Screen::Legal);
        assert_eq!(Screen::from_index(2), Some(Screen::Stories));
        assert_eq!(Screen::from_index(5), None);
        assert_eq!(Screen::Stories.document(), Some(DocumentKind::UserStories));
        assert_eq!(Screen::Chat.document(), None);
    }

    #[test]
    fn test_submit_queues_one_command() {
        let mut app = new_app();
        app.session.input = "What now?".to_string();
        app.submit_question();
        app.submit_question();
        assert_eq!(
            app.take_commands(),
            vec![Command::Ask {
                message: "What now?".to_string()
            }]
        );
        assert!(app.take_commands().is_empty());
    }

    #[test]
    fn test_load_on_chat_screen_does_nothing() {
        let mut app = new_app();
        app.load_current_tab();
        assert!(app.take_commands().is_empty());
    }

    #[test]
    fn test_load_current_tab_is_guarded() {
        let mut app = new_app();
        app.switch_screen(Screen::Architecture);
        app.load_current_tab();
        app.load_current_tab();
        assert_eq!(
            app.take_commands(),
            vec![Command::Fetch(DocumentKind::Architecture)]
        );
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = new_app();
        app.body_height = 10;
        app.set_scroll_limit(Screen::Chat, 7);
        app.scroll_half_page_down();
        app.scroll_half_page_down();
        assert_eq!(app.scroll[0], 7);
        app.set_scroll_limit(Screen::Chat, 3);
        assert_eq!(app.scroll[0], 3);
        app.scroll_top();
        assert_eq!(app.scroll[0], 0);
        app.scroll_bottom();
        assert_eq!(app.scroll[0], 3);
    }

    #[test]
    fn test_animation_only_runs_while_busy() {
        let mut app = new_app();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);

        app.switch_screen(Screen::Legal);
        app.load_current_tab();
        app.tick_animation();
        app.tick_animation();
        assert_eq!(app.animation_frame, 2);
        assert_eq!(app.ellipsis(), "...");
    }
}
