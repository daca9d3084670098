use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chapterquiz_core::answers::AnswerSheet;
use chapterquiz_core::model::{Answer, ChoiceOption, Question, QuestionKind};
use chapterquiz_core::scoring::{grade, mark_choices, score_question_set};

fn make_question(n: usize) -> Question {
    let kind = match n % 3 {
        0 => QuestionKind::Single { answer_index: 1 },
        1 => QuestionKind::Multiple {
            answer_indices: BTreeSet::from([0, 2]),
        },
        _ => QuestionKind::Fill,
    };
    let options = match kind {
        QuestionKind::Fill => vec![],
        _ => (0..4).map(|i| ChoiceOption::text(format!("option {i}"))).collect(),
    };
    Question {
        id: format!("q{n}"),
        stem: "bench".into(),
        image: None,
        options,
        kind,
        explain: None,
    }
}

fn make_chapter(size: usize) -> (Vec<Question>, AnswerSheet) {
    let questions: Vec<Question> = (0..size).map(make_question).collect();
    let answers = questions
        .iter()
        .map(|q| {
            let answer = match q.kind {
                QuestionKind::Single { .. } => Answer::Index(1),
                QuestionKind::Multiple { .. } => Answer::Indices(BTreeSet::from([0])),
                QuestionKind::Fill => Answer::Text("work".into()),
            };
            (q.id.clone(), answer)
        })
        .collect();
    (questions, answers)
}

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");
    let multiple = make_question(1);

    group.bench_function("multiple_full", |b| {
        let answer = Answer::Indices(BTreeSet::from([0, 2]));
        b.iter(|| grade(black_box(&multiple), black_box(Some(&answer))))
    });

    group.bench_function("multiple_wrong_pick", |b| {
        let answer = Answer::Indices(BTreeSet::from([0, 2, 3]));
        b.iter(|| grade(black_box(&multiple), black_box(Some(&answer))))
    });

    group.bench_function("mark_choices", |b| {
        let answer = Answer::Indices(BTreeSet::from([0, 3]));
        b.iter(|| mark_choices(black_box(&multiple), black_box(Some(&answer))))
    });

    group.finish();
}

fn bench_chapter(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_question_set");

    for size in [30, 300] {
        let (questions, answers) = make_chapter(size);
        group.bench_function(format!("{size}_questions"), |b| {
            b.iter(|| score_question_set(black_box(&questions), black_box(&answers)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_grade, bench_chapter);
criterion_main!(benches);
