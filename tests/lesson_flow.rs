use rand::SeedableRng;
use rand::rngs::SmallRng;

use mathkids::engine::operation::Operation;
use mathkids::feedback::{Effect, FeedbackSink, RecordingSink, Sound};
use mathkids::session::input::AnswerError;
use mathkids::session::lesson::{LessonError, LessonState, Navigation, StepState};
use mathkids::session::try_it::{ColumnExercise, ColumnPhase, Exercise, TryOutcome};

/// Plays the active step through: taps demos and answers exercises correctly.
fn finish_step(lesson: &mut LessonState, sink: &mut RecordingSink) {
    while !lesson.can_advance() {
        let effects = match &lesson.step {
            StepState::Static(_) => return,
            StepState::Demo(_) => lesson.tap().unwrap().effects,
            StepState::TryIt(Exercise::Columns(ex)) => {
                if ex.phase == ColumnPhase::NeedsBorrow {
                    lesson.request_borrow().unwrap().effects
                } else {
                    let expected = ex.expected().to_string();
                    lesson.submit(&expected).unwrap().effects
                }
            }
            StepState::TryIt(Exercise::Single(shot)) => {
                let expected = shot.expected().to_string();
                lesson.submit(&expected).unwrap().effects
            }
        };
        sink.apply(&effects);
    }
}

#[test]
fn every_lesson_can_be_walked_to_the_end() {
    for (seed, op) in Operation::ALL.into_iter().enumerate() {
        let mut sink = RecordingSink::default();
        let start = LessonState::start(op, SmallRng::seed_from_u64(seed as u64));
        sink.apply(&start.effects);
        let mut lesson = start.outcome;

        let steps = lesson.step_count();
        for _ in 0..steps {
            finish_step(&mut lesson, &mut sink);
            let reply = lesson.next().unwrap();
            sink.apply(&reply.effects);
            if reply.outcome == Navigation::Finished {
                break;
            }
        }

        assert!(lesson.finished, "{} lesson did not finish", op.label());
        assert!(sink.effects.contains(&Effect::Sound(Sound::Perfect)));
        assert_eq!(lesson.next().unwrap_err(), LessonError::Finished);
    }
}

#[test]
fn demo_locks_next_until_it_is_done() {
    let mut lesson = LessonState::start(Operation::Add, SmallRng::seed_from_u64(1)).outcome;
    lesson.next().unwrap();
    assert!(matches!(lesson.step, StepState::Demo(_)));
    assert_eq!(lesson.next().unwrap_err(), LessonError::Locked);

    let mut sink = RecordingSink::default();
    finish_step(&mut lesson, &mut sink);
    assert_eq!(lesson.next().unwrap().outcome, Navigation::Entered(2));
}

#[test]
fn carry_exercise_takes_column_sum_then_tens() {
    let mut ex = ColumnExercise::addition(47, 35);

    let first = ex.submit("12").unwrap();
    assert_eq!(
        first.outcome,
        TryOutcome::ColumnSolved {
            col: 1,
            digit: 2,
            carry: Some(1),
        }
    );
    assert_eq!(ex.board.carries[0], Some(1));
    assert_eq!(ex.prompt(), "Tens column: What is 4 + 3 + 1 (carry)?");

    let second = ex.submit("8").unwrap();
    assert_eq!(second.outcome, TryOutcome::Solved);
    assert!(ex.is_complete());
    assert_eq!(ex.board.result(), 82);

    let json = serde_json::to_value(StepState::TryIt(Exercise::Columns(ex))).unwrap();
    assert_eq!(json["TryIt"]["Columns"]["phase"], "Complete");
}

#[test]
fn borrow_through_zero_cascades_to_the_hundreds() {
    let mut ex = ColumnExercise::subtraction(304, 156);
    assert_eq!(ex.phase, ColumnPhase::NeedsBorrow);
    assert_eq!(ex.submit("8").unwrap_err(), AnswerError::BorrowRequired);

    let trace = ex.request_borrow().unwrap().outcome;
    assert_eq!(trace.raised, 14);
    assert_eq!(trace.lender, Some(0));
    assert_eq!(ex.board.top, vec![2, 9, 14]);

    assert_eq!(ex.submit("8").unwrap().outcome, TryOutcome::ColumnSolved {
        col: 2,
        digit: 8,
        carry: None,
    });
    assert_eq!(ex.request_borrow().unwrap_err(), AnswerError::BorrowNotNeeded);
    ex.submit("4").unwrap();
    assert_eq!(ex.submit("1").unwrap().outcome, TryOutcome::Solved);
    assert_eq!(ex.board.result(), 148);
}
