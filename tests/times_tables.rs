use rand::SeedableRng;
use rand::rngs::SmallRng;

use mathkids::engine::scoring::TableTier;
use mathkids::session::tables::{
    CORRECT_PAUSE, REVEAL_PAUSE, TableAdvance, TableAnswer, TableError, TableQuiz, times_table,
};

#[test]
fn seven_times_table_reference() {
    let rows = times_table(7).unwrap();
    let products: Vec<u32> = rows.iter().map(|r| r.product).collect();
    assert_eq!(products, vec![7, 14, 21, 28, 35, 42, 49, 56, 63, 70]);
    assert_eq!(times_table(21).unwrap_err(), TableError::BaseOutOfRange(21));
    assert_eq!(times_table(0).unwrap_err(), TableError::BaseOutOfRange(0));
}

#[test]
fn quiz_covers_every_multiplier_once() {
    let quiz = TableQuiz::new(7, &mut SmallRng::seed_from_u64(9)).unwrap();
    let mut multipliers: Vec<u32> = quiz.questions.iter().map(|q| q.multiplier).collect();
    multipliers.sort_unstable();
    assert_eq!(multipliers, (1..=10).collect::<Vec<_>>());
}

#[test]
fn one_reveal_out_of_ten_is_great() {
    let mut quiz = TableQuiz::new(7, &mut SmallRng::seed_from_u64(5)).unwrap();

    let first = *quiz.current().unwrap();
    let wrong = (first.answer + 1).to_string();
    assert_eq!(quiz.submit(&wrong).unwrap().outcome, TableAnswer::TryAgain);
    assert_eq!(
        quiz.submit(&wrong).unwrap().outcome,
        TableAnswer::Revealed {
            answer: first.answer
        }
    );
    assert_eq!(quiz.pause(), Some(REVEAL_PAUSE));
    assert!(quiz.submit("1").is_err());
    quiz.advance().unwrap();

    let mut finished = None;
    while let Some(question) = quiz.current().copied() {
        let reply = quiz.submit(&question.answer.to_string()).unwrap();
        assert_eq!(reply.outcome, TableAnswer::Correct { scored: true });
        assert_eq!(quiz.pause(), Some(CORRECT_PAUSE));
        if let TableAdvance::Finished(summary) = quiz.advance().unwrap().outcome {
            finished = Some(summary);
        }
    }

    let summary = finished.unwrap();
    assert_eq!(summary.score, 9);
    assert_eq!(summary.percentage, 90);
    assert_eq!(summary.tier, TableTier::Great);
    assert_eq!(summary.stars(), 2);
}

#[test]
fn advance_requires_a_resolved_question() {
    let mut quiz = TableQuiz::new(3, &mut SmallRng::seed_from_u64(1)).unwrap();
    assert_eq!(quiz.advance().unwrap_err(), TableError::NotResolved);
}
