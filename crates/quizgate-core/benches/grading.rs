use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizgate_core::{Question, QuizFactory, QuizHistory, QuizPolicy, RegularQuiz, Student};

fn make_bank(size: usize) -> Vec<Question> {
    (0..size)
        .map(|i| {
            if i % 2 == 0 {
                Question::free_response(&format!("Question {i}?"), &format!("Answer  number {i}"))
                    .unwrap()
            } else {
                Question::multiple_choice(&format!("Question {i}?"), &["a", "c", "d"]).unwrap()
            }
        })
        .collect()
}

fn bench_check_answer(c: &mut Criterion) {
    let mut group = c.benchmark_group("check_answer");

    let free = Question::free_response("Who painted the Mona Lisa?", "Leonardo da Vinci").unwrap();
    group.bench_function("free_response", |b| {
        b.iter(|| free.check_answer(black_box("   leonardo   DA vinci ")))
    });

    let choice = Question::multiple_choice("Which are primes?", &["a", "b", "c", "d"]).unwrap();
    group.bench_function("multiple_choice", |b| {
        b.iter(|| choice.check_answer(black_box("d, C ,b,a")))
    });

    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_quiz");
    let policy = QuizPolicy {
        seed: Some(7),
        ..QuizPolicy::default()
    };

    for size in [10usize, 100, 1000] {
        let mut factory = RegularQuiz::with_policy(make_bank(size), policy.clone()).unwrap();
        group.bench_function(format!("pool={size},n=10"), |b| {
            b.iter(|| factory.generate_quiz(black_box(10)).unwrap())
        });
    }

    group.finish();
}

fn bench_take_quiz(c: &mut Criterion) {
    let factory = RegularQuiz::new(make_bank(20)).unwrap();
    let questions = factory.pool().questions().to_vec();
    let answers: Vec<String> = (0..questions.len()).map(|i| format!("answer number {i}")).collect();
    let birth = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();

    c.bench_function("take_quiz/20", |b| {
        b.iter(|| {
            let mut history = QuizHistory::new();
            let mut student = Student::new("Bench", "Student", birth).unwrap();
            factory
                .take_quiz(&mut history, &mut student, black_box(&questions), &answers)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_check_answer, bench_generate, bench_take_quiz);
criterion_main!(benches);
