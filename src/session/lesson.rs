use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::columns::BorrowTrace;
use crate::engine::operation::Operation;
use crate::feedback::{Effect, Notice, Reply, Sound};
use crate::generator::lesson as problems;
use crate::session::demo::{DemoProgress, DemoState};
use crate::session::input::AnswerError;
use crate::session::plan::{self, Page, StepSpec};
use crate::session::try_it::{ColumnExercise, Exercise, ShotKind, SingleShot, TryOutcome};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LessonError {
    #[error("finish this step before moving on")]
    Locked,

    #[error("this step has nothing to answer")]
    NotInteractive,

    #[error("the lesson is over")]
    Finished,

    #[error(transparent)]
    Answer(#[from] AnswerError),
}

/// Live state of the active step. Rebuilt from its [`StepSpec`] on every entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepState {
    Static(Page),
    Demo(DemoState),
    TryIt(Exercise),
}

impl StepState {
    pub fn can_advance(&self) -> bool {
        match self {
            StepState::Static(_) => true,
            StepState::Demo(demo) => demo.done,
            StepState::TryIt(exercise) => exercise.is_complete(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Navigation {
    Entered(usize),
    Stayed,
    Finished,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LessonView<'a> {
    pub operation: Operation,
    pub title: &'static str,
    pub progress_label: String,
    pub progress: f64,
    pub prev_visible: bool,
    pub next_enabled: bool,
    pub next_label: &'static str,
    pub step: &'a StepState,
}

pub struct LessonState {
    pub operation: Operation,
    pub plan: Vec<StepSpec>,
    pub index: usize,
    pub step: StepState,
    pub finished: bool,
    rng: SmallRng,
}

impl LessonState {
    pub fn start(operation: Operation, rng: SmallRng) -> Reply<Self> {
        let plan = plan::lesson_plan(operation);
        let mut lesson = Self {
            operation,
            step: StepState::Static(plan::intro_page(operation)),
            plan,
            index: 0,
            finished: false,
            rng,
        };
        let mut effects = vec![Effect::Sound(Sound::Click)];
        effects.extend(lesson.enter());
        log::debug!("lesson {} started", operation.as_str());
        Reply::new(lesson, effects)
    }

    pub fn step_count(&self) -> usize {
        self.plan.len()
    }

    pub fn is_last_step(&self) -> bool {
        self.index + 1 >= self.plan.len()
    }

    pub fn can_advance(&self) -> bool {
        self.step.can_advance()
    }

    fn build_step(&mut self, spec: StepSpec) -> StepState {
        match spec {
            StepSpec::Intro(op) => StepState::Static(plan::intro_page(op)),
            StepSpec::Connection => StepState::Static(plan::connection_page()),
            StepSpec::Summary(op) => StepState::Static(plan::summary_page(op)),
            StepSpec::ColumnDemo { operation, a, b } => {
                StepState::Demo(DemoState::columns(operation, a, b))
            }
            StepSpec::GroupsDemo { groups, per_group } => {
                StepState::Demo(DemoState::groups(groups, per_group))
            }
            StepSpec::BreakApartDemo { a, b } => StepState::Demo(DemoState::break_apart(a, b)),
            StepSpec::SharingDemo { total, plates } => {
                StepState::Demo(DemoState::sharing(total, plates))
            }
            StepSpec::GroupingDemo { total, per_group } => {
                StepState::Demo(DemoState::grouping(total, per_group))
            }
            StepSpec::TryIt(op) => StepState::TryIt(self.fresh_exercise(op)),
        }
    }

    fn fresh_exercise(&mut self, operation: Operation) -> Exercise {
        match operation {
            Operation::Add => {
                let (a, b) = problems::carry_addition(&mut self.rng);
                Exercise::Columns(ColumnExercise::addition(a, b))
            }
            Operation::Subtract => {
                let (a, b) = problems::borrow_subtraction(&mut self.rng);
                Exercise::Columns(ColumnExercise::subtraction(a, b))
            }
            Operation::Multiply => {
                let (groups, per_group) = problems::equal_groups(&mut self.rng);
                Exercise::Single(SingleShot::new(ShotKind::Groups { groups, per_group }))
            }
            Operation::Divide => {
                let (dividend, divisor) = problems::exact_division(&mut self.rng);
                Exercise::Single(SingleShot::new(ShotKind::Share { dividend, divisor }))
            }
        }
    }

    /// Rebuilds the active step from scratch and returns its entry effects.
    fn enter(&mut self) -> Vec<Effect> {
        let spec = self.plan[self.index];
        self.step = self.build_step(spec);
        log::debug!("lesson step {} entered: {:?}", self.index + 1, spec);
        match &mut self.step {
            StepState::Demo(demo) => demo.enter(),
            StepState::Static(_) if matches!(spec, StepSpec::Summary(_)) => {
                vec![Effect::Sound(Sound::Perfect), Effect::Celebrate(80)]
            }
            _ => Vec::new(),
        }
    }

    pub fn next(&mut self) -> Result<Reply<Navigation>, LessonError> {
        if self.finished {
            return Err(LessonError::Finished);
        }
        if !self.can_advance() {
            return Err(LessonError::Locked);
        }

        let mut effects = vec![Effect::Sound(Sound::Click)];
        if self.is_last_step() {
            self.finished = true;
            effects.push(Effect::Sound(Sound::Perfect));
            effects.push(Effect::Celebrate(100));
            log::debug!("lesson {} finished", self.operation.as_str());
            return Ok(Reply::new(Navigation::Finished, effects));
        }

        self.index += 1;
        effects.extend(self.enter());
        Ok(Reply::new(Navigation::Entered(self.index), effects))
    }

    pub fn prev(&mut self) -> Result<Reply<Navigation>, LessonError> {
        if self.finished {
            return Err(LessonError::Finished);
        }
        let mut effects = vec![Effect::Sound(Sound::Click)];
        if self.index == 0 {
            return Ok(Reply::new(Navigation::Stayed, effects));
        }
        self.index -= 1;
        effects.extend(self.enter());
        Ok(Reply::new(Navigation::Entered(self.index), effects))
    }

    /// A tap on the workspace. Only guided demos react.
    pub fn tap(&mut self) -> Result<Reply<DemoProgress>, LessonError> {
        match &mut self.step {
            StepState::Demo(demo) => Ok(demo.tap()),
            _ => Err(LessonError::NotInteractive),
        }
    }

    pub fn submit(&mut self, raw: &str) -> Result<Reply<TryOutcome>, LessonError> {
        match &mut self.step {
            StepState::TryIt(exercise) => Ok(exercise.submit(raw)?),
            _ => Err(LessonError::NotInteractive),
        }
    }

    pub fn request_borrow(&mut self) -> Result<Reply<BorrowTrace>, LessonError> {
        match &mut self.step {
            StepState::TryIt(exercise) => Ok(exercise.request_borrow()?),
            _ => Err(LessonError::NotInteractive),
        }
    }

    pub fn feedback(&self) -> Option<&Notice> {
        match &self.step {
            StepState::TryIt(exercise) => exercise.feedback(),
            _ => None,
        }
    }

    pub fn view(&self) -> LessonView<'_> {
        let total = self.plan.len();
        LessonView {
            operation: self.operation,
            title: plan::lesson_title(self.operation),
            progress_label: format!("Step {} of {total}", self.index + 1),
            progress: (self.index + 1) as f64 / total as f64,
            prev_visible: self.index > 0,
            next_enabled: self.can_advance(),
            next_label: if self.is_last_step() {
                "Finish! \u{1f389}"
            } else {
                "Next \u{2192}"
            },
            step: &self.step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::demo::DemoBoard;
    use rand::SeedableRng;

    fn lesson(op: Operation) -> LessonState {
        LessonState::start(op, SmallRng::seed_from_u64(5)).outcome
    }

    fn finish_demo(lesson: &mut LessonState) {
        while !lesson.can_advance() {
            lesson.tap().unwrap();
        }
    }

    #[test]
    fn test_start_on_intro() {
        let reply = LessonState::start(Operation::Add, SmallRng::seed_from_u64(1));
        assert!(reply.has_sound(Sound::Click));
        let lesson = reply.outcome;
        assert_eq!(lesson.index, 0);
        assert!(lesson.can_advance());
        let view = lesson.view();
        assert_eq!(view.progress_label, "Step 1 of 6");
        assert!(!view.prev_visible);
        assert_eq!(view.next_label, "Next \u{2192}");
    }

    #[test]
    fn test_demo_locks_until_every_substep_ran() {
        let mut lesson = lesson(Operation::Add);
        let reply = lesson.next().unwrap();
        assert_eq!(reply.outcome, Navigation::Entered(1));
        assert!(!lesson.can_advance());
        assert_eq!(lesson.next().unwrap_err(), LessonError::Locked);
        assert_eq!(lesson.index, 1);

        finish_demo(&mut lesson);
        assert!(lesson.next().is_ok());
        assert_eq!(lesson.index, 2);
    }

    #[test]
    fn test_tap_and_submit_need_the_right_step() {
        let mut lesson = lesson(Operation::Subtract);
        assert_eq!(lesson.tap().unwrap_err(), LessonError::NotInteractive);
        assert_eq!(lesson.submit("3").unwrap_err(), LessonError::NotInteractive);
        assert_eq!(lesson.request_borrow().unwrap_err(), LessonError::NotInteractive);
    }

    #[test]
    fn test_going_back_resets_the_step() {
        let mut lesson = lesson(Operation::Multiply);
        lesson.next().unwrap();
        finish_demo(&mut lesson);
        lesson.next().unwrap();
        lesson.prev().unwrap();
        match &lesson.step {
            StepState::Demo(demo) => {
                assert_eq!(demo.next_sub, 1);
                assert!(!demo.done);
                assert_eq!(demo.board, DemoBoard::Groups { groups: 3, per_group: 4, shown: 1 });
            }
            other => panic!("expected the groups demo, got {other:?}"),
        }
        assert!(!lesson.can_advance());
    }

    #[test]
    fn test_prev_on_first_step_stays() {
        let mut lesson = lesson(Operation::Divide);
        assert_eq!(lesson.prev().unwrap().outcome, Navigation::Stayed);
        assert_eq!(lesson.index, 0);
    }

    #[test]
    fn test_wrong_try_it_answer_stays_locked() {
        let mut lesson = lesson(Operation::Divide);
        for _ in 0..4 {
            lesson.next().unwrap();
            if !lesson.can_advance() {
                finish_demo(&mut lesson);
            }
        }
        lesson.next().unwrap();
        assert!(matches!(lesson.step, StepState::TryIt(_)));
        let reply = lesson.submit("0").unwrap();
        assert!(matches!(reply.outcome, TryOutcome::Retry { .. }));
        assert_eq!(lesson.next().unwrap_err(), LessonError::Locked);
        assert!(matches!(
            lesson.submit("abc").unwrap_err(),
            LessonError::Answer(AnswerError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_summary_entry_celebrates() {
        let mut lesson = lesson(Operation::Multiply);
        lesson.index = 4;
        lesson.step = StepState::Static(plan::intro_page(Operation::Multiply));
        let reply = lesson.next().unwrap();
        assert_eq!(reply.outcome, Navigation::Entered(5));
        assert!(reply.has_sound(Sound::Perfect));
        assert!(reply.effects.contains(&Effect::Celebrate(80)));
        assert_eq!(lesson.view().next_label, "Finish! \u{1f389}");

        let done = lesson.next().unwrap();
        assert_eq!(done.outcome, Navigation::Finished);
        assert!(done.effects.contains(&Effect::Celebrate(100)));
        assert_eq!(lesson.next().unwrap_err(), LessonError::Finished);
    }

    #[test]
    fn test_view_does_not_mutate() {
        let mut lesson = lesson(Operation::Add);
        lesson.next().unwrap();
        let before = lesson.step.clone();
        let _ = lesson.view();
        let _ = lesson.view();
        assert_eq!(lesson.step, before);
    }
}
