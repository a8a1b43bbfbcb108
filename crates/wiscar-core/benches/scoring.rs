use criterion::{black_box, criterion_group, criterion_main, Criterion};

use wiscar_core::model::{
    AnswerRecord, AnswerValue, Guidance, Phase, QuestionBank, QuestionDefinition, QuestionKind,
};
use wiscar_core::scoring::WiscarScorer;
use wiscar_core::traits::{AnswerSheet, Scorer};

fn make_bank(questions_per_phase: usize) -> QuestionBank {
    let scale = |i: usize| QuestionDefinition {
        id: format!("p{i}"),
        prompt: format!("Rate {i}"),
        kind: QuestionKind::Scale {
            min: 1,
            max: 5,
            labels: None,
        },
    };
    let keyed = |i: usize| QuestionDefinition {
        id: format!("t{i}"),
        prompt: format!("Pick {i}"),
        kind: QuestionKind::Choice {
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct: Some("b".into()),
        },
    };

    QuestionBank {
        id: "bench".into(),
        name: "Bench".into(),
        subject: "Benchmarking".into(),
        description: String::new(),
        phases: vec![
            Phase {
                id: "psychometric".into(),
                title: "Psych".into(),
                description: String::new(),
                questions: (0..questions_per_phase).map(scale).collect(),
            },
            Phase {
                id: "technical".into(),
                title: "Tech".into(),
                description: String::new(),
                questions: (0..questions_per_phase).map(keyed).collect(),
            },
        ],
        guidance: Guidance::default(),
    }
}

fn make_answers(questions_per_phase: usize) -> Vec<AnswerRecord> {
    let psych = (0..questions_per_phase)
        .map(|i| (format!("p{i}"), AnswerValue::Scale((i % 5) as i64 + 1)))
        .collect();
    let tech = (0..questions_per_phase)
        .map(|i| {
            let pick = if i % 3 == 0 { "a" } else { "b" };
            (format!("t{i}"), AnswerValue::Choice(pick.into()))
        })
        .collect();
    vec![psych, tech]
}

fn bench_wiscar_scorer(c: &mut Criterion) {
    let mut group = c.benchmark_group("wiscar_scorer");
    let scorer = WiscarScorer::default();

    for n in [5, 50, 500] {
        let bank = make_bank(n);
        let answers = make_answers(n);
        group.bench_function(format!("questions_per_phase={n}"), |b| {
            let sheet = AnswerSheet::new(&bank, &answers);
            b.iter(|| scorer.score(black_box(&sheet)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_wiscar_scorer);
criterion_main!(benches);
