use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};

use crate::config::Config;
use crate::engine::operation::Operation;
use crate::event::{Deferred, Pacer};
use crate::feedback::{FeedbackSink, Notice, Reply, Tone};
use crate::session::lesson::{LessonError, LessonState, Navigation, StepState};
use crate::session::quiz::{Advance, QuizSession, QuizSettings};
use crate::session::tables::{TableAdvance, TableQuiz, TableRow, times_table};
use crate::ui::components::menu::{Menu, MenuAction};
use crate::ui::components::table_grid::step_base;
use crate::ui::effects::TerminalFeedback;
use crate::ui::line_input::AnswerInput;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    QuizSetup,
    Quiz,
    QuizResult,
    LearnMenu,
    Lesson,
    TablesMenu,
    TableView,
    TableQuiz,
    TableResult,
    Settings,
}

/// Rows of the settings screen. The quiz setup screen shows the first three.
pub const SETTINGS_ROWS: [&str; 6] = [
    "Quiz Operation",
    "Digits",
    "Questions",
    "Theme",
    "Sound",
    "Celebrations",
];
pub const QUIZ_SETUP_ROWS: usize = 3;

pub struct App {
    pub screen: AppScreen,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    /// Write config changes back to disk. Off for throwaway instances.
    pub persist_config: bool,
    pub feedback: TerminalFeedback,
    pub pacer: Pacer,
    pub input: AnswerInput,
    /// One-line message under the current screen, e.g. a rejected answer.
    pub status: Option<Notice>,
    pub quiz: Option<QuizSession>,
    pub quiz_setup_selected: usize,
    pub lesson: Option<LessonState>,
    pub learn_selected: usize,
    pub table_base: u32,
    pub table_rows: Vec<TableRow>,
    pub table_quiz: Option<TableQuiz>,
    pub settings_selected: usize,
    pub should_quit: bool,
    rng: SmallRng,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    pub fn with_rng(config: Config, rng: SmallRng) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let feedback = TerminalFeedback::new(config.sound, config.celebrations);

        Self {
            screen: AppScreen::Menu,
            menu: Menu::new(theme),
            theme,
            config,
            persist_config: false,
            feedback,
            pacer: Pacer::default(),
            input: AnswerInput::default(),
            status: None,
            quiz: None,
            quiz_setup_selected: 0,
            lesson: None,
            learn_selected: 0,
            table_base: 2,
            table_rows: Vec::new(),
            table_quiz: None,
            settings_selected: 0,
            should_quit: false,
            rng,
        }
    }

    /// Independent generator for a new session.
    fn session_rng(&mut self) -> SmallRng {
        SmallRng::seed_from_u64(self.rng.next_u64())
    }

    fn apply<T>(&mut self, reply: Reply<T>) -> T {
        self.feedback.apply(&reply.effects);
        reply.outcome
    }

    fn warn(&mut self, text: impl Into<String>) {
        self.status = Some(Notice::new(text, Tone::Warn));
    }

    /// Drops every running session and any pending action tied to it.
    fn reset_sessions(&mut self) {
        self.pacer.next_generation();
        self.quiz = None;
        self.lesson = None;
        self.table_quiz = None;
        self.input.clear();
        self.status = None;
    }

    pub fn go_to_menu(&mut self) {
        self.reset_sessions();
        self.screen = AppScreen::Menu;
    }

    pub fn open(&mut self, action: MenuAction) {
        self.status = None;
        match action {
            MenuAction::Quiz => {
                self.quiz_setup_selected = 0;
                self.screen = AppScreen::QuizSetup;
            }
            MenuAction::Learn => self.go_to_learn_menu(),
            MenuAction::TimesTables => self.screen = AppScreen::TablesMenu,
            MenuAction::Settings => {
                self.settings_selected = 0;
                self.screen = AppScreen::Settings;
            }
        }
    }

    // --- Quiz ---

    pub fn start_quiz(&mut self) {
        let settings = QuizSettings {
            operation: self.config.operation,
            level: self.config.level(),
            total_questions: self.config.question_count,
        };
        let rng = self.session_rng();
        match QuizSession::start(settings, rng) {
            Ok(quiz) => {
                self.reset_sessions();
                self.quiz = Some(quiz);
                self.screen = AppScreen::Quiz;
            }
            Err(e) => self.warn(e.to_string()),
        }
    }

    /// Enter on the quiz screen: check the typed answer while the question
    /// is open, otherwise move on.
    pub fn quiz_enter(&mut self) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        if quiz.state.is_open() {
            let raw = self.input.take();
            match quiz.submit_answer(&raw) {
                Ok(reply) => {
                    self.status = None;
                    self.apply(reply);
                }
                Err(e) if e.is_blank_input() => {}
                Err(e) => self.warn(e.to_string()),
            }
        } else {
            self.input.clear();
            match quiz.next_problem() {
                Ok(reply) => {
                    if let Advance::Finished(_) = self.apply(reply) {
                        self.screen = AppScreen::QuizResult;
                    }
                }
                Err(e) => self.warn(e.to_string()),
            }
        }
    }

    // --- Lessons ---

    pub fn go_to_learn_menu(&mut self) {
        self.reset_sessions();
        self.screen = AppScreen::LearnMenu;
    }

    pub fn start_lesson(&mut self, operation: Operation) {
        self.reset_sessions();
        let rng = self.session_rng();
        let lesson = LessonState::start(operation, rng);
        self.lesson = Some(self.apply(lesson));
        self.screen = AppScreen::Lesson;
    }

    fn lesson_error(&mut self, e: LessonError) {
        match e {
            LessonError::NotInteractive => {}
            LessonError::Answer(ref inner) if inner.is_blank_input() => {}
            e => self.warn(e.to_string()),
        }
    }

    fn navigated(&mut self, result: Result<Reply<Navigation>, LessonError>) {
        match result {
            Ok(reply) => {
                self.input.clear();
                self.status = None;
                if self.apply(reply) == Navigation::Finished {
                    self.lesson = None;
                    self.screen = AppScreen::LearnMenu;
                    self.status = Some(Notice::correct(
                        "\u{1f389} Lesson complete! Pick another or try a quiz.",
                    ));
                }
            }
            Err(e) => self.lesson_error(e),
        }
    }

    pub fn lesson_next(&mut self) {
        if let Some(lesson) = self.lesson.as_mut() {
            let result = lesson.next();
            self.navigated(result);
        }
    }

    pub fn lesson_prev(&mut self) {
        if let Some(lesson) = self.lesson.as_mut() {
            let result = lesson.prev();
            self.navigated(result);
        }
    }

    pub fn lesson_tap(&mut self) {
        let Some(lesson) = self.lesson.as_mut() else {
            return;
        };
        match lesson.tap() {
            Ok(reply) => {
                self.apply(reply);
            }
            Err(e) => self.lesson_error(e),
        }
    }

    pub fn lesson_submit(&mut self) {
        let Some(lesson) = self.lesson.as_mut() else {
            return;
        };
        let raw = self.input.take();
        match lesson.submit(&raw) {
            Ok(reply) => {
                self.status = None;
                self.apply(reply);
            }
            Err(e) => self.lesson_error(e),
        }
    }

    pub fn lesson_borrow(&mut self) {
        let Some(lesson) = self.lesson.as_mut() else {
            return;
        };
        match lesson.request_borrow() {
            Ok(reply) => {
                self.status = None;
                self.apply(reply);
            }
            Err(e) => self.lesson_error(e),
        }
    }

    /// Enter on the lesson screen does the obvious thing for the step:
    /// check an answer, show the next demo step, or turn the page.
    pub fn lesson_enter(&mut self) {
        let Some(lesson) = self.lesson.as_ref() else {
            return;
        };
        let (answering, tapping) = match &lesson.step {
            StepState::TryIt(ex) => (!ex.is_complete(), false),
            StepState::Demo(demo) => (false, !demo.done),
            StepState::Static(_) => (false, false),
        };
        if answering {
            self.lesson_submit();
        } else if tapping {
            self.lesson_tap();
        } else {
            self.lesson_next();
        }
    }

    // --- Times tables ---

    pub fn tables_move(&mut self, dx: i32, dy: i32) {
        self.table_base = step_base(self.table_base, dx, dy);
    }

    pub fn open_table(&mut self) {
        match times_table(self.table_base) {
            Ok(rows) => {
                self.table_rows = rows;
                self.screen = AppScreen::TableView;
            }
            Err(e) => self.warn(e.to_string()),
        }
    }

    pub fn start_table_quiz(&mut self) {
        let mut rng = self.session_rng();
        match TableQuiz::new(self.table_base, &mut rng) {
            Ok(quiz) => {
                self.reset_sessions();
                self.table_quiz = Some(quiz);
                self.screen = AppScreen::TableQuiz;
            }
            Err(e) => self.warn(e.to_string()),
        }
    }

    pub fn leave_table_quiz(&mut self) {
        self.reset_sessions();
        self.screen = AppScreen::TableView;
    }

    pub fn table_submit(&mut self) {
        let Some(quiz) = self.table_quiz.as_mut() else {
            return;
        };
        let raw = self.input.take();
        match quiz.submit(&raw) {
            Ok(reply) => {
                let pause = quiz.pause();
                self.status = None;
                self.apply(reply);
                if let Some(pause) = pause {
                    self.pacer
                        .schedule(Deferred::AdvanceTable, pause, Instant::now());
                }
            }
            Err(e) if e.is_blank_input() => {}
            Err(e) => self.warn(e.to_string()),
        }
    }

    fn table_advance(&mut self) {
        let Some(quiz) = self.table_quiz.as_mut() else {
            return;
        };
        match quiz.advance() {
            Ok(reply) => {
                if let TableAdvance::Finished(_) = self.apply(reply) {
                    self.screen = AppScreen::TableResult;
                }
            }
            Err(e) => log::warn!("table advance fired too early: {e}"),
        }
    }

    /// Runs once per event-loop tick.
    pub fn on_tick(&mut self, now: Instant) {
        self.feedback.tick(now);
        if let Some(action) = self.pacer.poll(now) {
            match action {
                Deferred::AdvanceTable => self.table_advance(),
            }
        }
    }

    // --- Settings ---

    fn cycle_operation(&mut self, forward: bool) {
        let ops = Operation::QUIZ;
        let idx = ops
            .iter()
            .position(|&op| op == self.config.operation)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % ops.len()
        } else {
            (idx + ops.len() - 1) % ops.len()
        };
        self.config.operation = ops[next];
    }

    fn cycle_theme(&mut self, forward: bool) {
        let themes = Theme::available_themes();
        if themes.is_empty() {
            return;
        }
        let next = match themes.iter().position(|t| *t == self.config.theme) {
            Some(idx) if forward => (idx + 1) % themes.len(),
            Some(idx) => (idx + themes.len() - 1) % themes.len(),
            None => 0,
        };
        self.config.theme = themes[next].clone();
        if let Some(new_theme) = Theme::load(&self.config.theme) {
            let theme: &'static Theme = Box::leak(Box::new(new_theme));
            self.theme = theme;
            self.menu.theme = theme;
        }
    }

    /// Changes the value on settings row `row` and saves.
    pub fn cycle_setting(&mut self, row: usize, forward: bool) {
        match row {
            0 => self.cycle_operation(forward),
            1 => {
                let level = self.config.level();
                self.config
                    .set_level(if forward { level.next() } else { level.prev() });
            }
            2 => {
                if forward {
                    self.config.cycle_question_count();
                } else {
                    self.config.cycle_question_count_back();
                }
            }
            3 => self.cycle_theme(forward),
            4 => self.config.sound = !self.config.sound,
            5 => self.config.celebrations = !self.config.celebrations,
            _ => return,
        }
        self.feedback.sound_on = self.config.sound;
        self.feedback.celebrations_on = self.config.celebrations;
        self.save_config();
    }

    /// Display value for settings row `row`.
    pub fn setting_value(&self, row: usize) -> String {
        let on_off = |b: bool| if b { "On" } else { "Off" }.to_string();
        match row {
            0 => format!(
                "{} {}",
                self.config.operation.symbol(),
                self.config.operation.label()
            ),
            1 => self.config.level().label().to_string(),
            2 => self.config.question_count.to_string(),
            3 => self.config.theme.clone(),
            4 => on_off(self.config.sound),
            5 => on_off(self.config.celebrations),
            _ => String::new(),
        }
    }

    fn save_config(&self) {
        if self.persist_config {
            if let Err(e) = self.config.save() {
                log::warn!("could not save config: {e}");
            }
        }
    }
}
