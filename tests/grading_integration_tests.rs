//! Grading Integration Tests
//!
//! Exercises the public API end to end: request in, graded exam and JSON
//! report out, for free-text and dual-dimension exams.

use approx::assert_relative_eq;
use exam_grader_rust::report::round2;
use exam_grader_rust::{
    count_block_matches, DualAnswerRow, DualKeyRow, ExamGrader, ExamReport, FreeTextAnswer,
    GradingConfig, GradingError, GradingRequest, JsonFormatter, KeyQuestion, Lexicon, Normalizer,
    QuestionState, ScoringPolicy, StrategyType, Submission,
};
use std::sync::Arc;

fn grader() -> ExamGrader {
    ExamGrader::new(GradingConfig::default()).unwrap()
}

fn key_row(id: &str, points: f64, grammatical: &str, classification: &str) -> DualKeyRow {
    DualKeyRow {
        id: id.to_string(),
        prompt: format!("{}. palabra", id),
        point_value: points,
        grammatical: grammatical.to_string(),
        classification: classification.to_string(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_block_matches_consume_once() {
    assert_eq!(count_block_matches(&strings(&["a", "a"]), &strings(&["a"])), 1);
    assert_eq!(count_block_matches(&strings(&["a"]), &strings(&["a", "a"])), 1);
    assert_eq!(count_block_matches(&strings(&["a", "b"]), &strings(&["b", "a"])), 2);
    assert_eq!(count_block_matches(&[], &strings(&["a"])), 0);
}

#[test]
fn test_alternative_phrase_scenario() {
    let key = vec![KeyQuestion::new("1", "masculino o femenino", 1.0)];
    let answers = vec![FreeTextAnswer::new("1", "es masculino singular")];

    let exam = grader().grade_free_text(&key, &answers).unwrap();
    let outcome = &exam.outcomes[0];

    assert_eq!(outcome.state, QuestionState::Correct);
    assert_relative_eq!(outcome.points_awarded, 1.0);
    assert_relative_eq!(exam.summary.final_grade, 20.0);
}

#[test]
fn test_dual_partial_scenario() {
    let key = vec![key_row("1", 3.0, "singular", "nombre, comun")];
    let answers = vec![DualAnswerRow::new("1", "singular", "nombre")];

    let exam = grader().grade_dual(&key, &answers).unwrap();
    let outcome = &exam.outcomes[0];

    assert_relative_eq!(outcome.points_awarded, 2.0);
    assert_eq!(outcome.state, QuestionState::Partial);
}

#[test]
fn test_trap_row_cheat_scenario() {
    let key = vec![
        key_row("1", 1.0, "plural", ""),
        key_row("2", 1.0, "", ""),
    ];
    let answers = vec![
        DualAnswerRow::new("1", "pl.", ""),
        DualAnswerRow::new("2", "plural", ""),
    ];

    let exam = grader().grade_dual(&key, &answers).unwrap();
    let trap = &exam.outcomes[1];

    assert_eq!(trap.state, QuestionState::Cheat);
    assert_relative_eq!(trap.points_awarded, 0.0);
    assert_eq!(exam.summary.tally.cheat, 1);
    assert_eq!(exam.summary.tally.correct, 1);
}

#[test]
fn test_free_text_trap_question() {
    let key = vec![
        KeyQuestion::new("1", "", 1.0),
        KeyQuestion::new("2", "", 1.0),
        KeyQuestion::new("3", "", 1.0),
        KeyQuestion::new("4", "verbo", 1.0),
    ];
    let answers = vec![
        FreeTextAnswer::new("1", "nombre comun"),
        FreeTextAnswer::new("2", ""),
        FreeTextAnswer::new("4", "verbo"),
    ];

    let exam = grader().grade_free_text(&key, &answers).unwrap();

    assert_eq!(exam.outcomes[0].state, QuestionState::Cheat);
    assert_relative_eq!(exam.outcomes[0].points_awarded, 0.0);
    assert!(exam.outcomes[0].feedback.starts_with("Trap row"));
    assert_eq!(exam.outcomes[1].state, QuestionState::Neutral);
    assert_eq!(exam.outcomes[2].state, QuestionState::Unanswered);
    assert_eq!(exam.outcomes[3].state, QuestionState::Correct);
    assert_eq!(exam.summary.tally.cheat, 1);
}

#[test]
fn test_strict_zero_value_question_is_not_correct() {
    let config = GradingConfig {
        free_text_policy: ScoringPolicy::Strict,
        ..GradingConfig::default()
    };
    let exam = ExamGrader::new(config)
        .unwrap()
        .grade_free_text(&[KeyQuestion::new("1", "verbo", 0.0)], &[FreeTextAnswer::new("1", "verbo")])
        .unwrap();

    assert_ne!(exam.outcomes[0].state, QuestionState::Correct);
    assert_relative_eq!(exam.outcomes[0].points_awarded, 0.0);
}

#[test]
fn test_missing_answers_are_unanswered() {
    let key: Vec<KeyQuestion> = (1..=5)
        .map(|i| KeyQuestion::new(i.to_string(), "nombre, comun", 2.0))
        .collect();
    let answers = vec![
        FreeTextAnswer::new("1", "nombre comun"),
        FreeTextAnswer::new("3", "nombre"),
        FreeTextAnswer::new("5", "adjetivo"),
    ];

    let exam = grader().grade_free_text(&key, &answers).unwrap();

    assert_eq!(exam.outcomes.len(), 5);
    assert_eq!(exam.outcomes[1].state, QuestionState::Unanswered);
    assert_eq!(exam.outcomes[3].state, QuestionState::Unanswered);
    assert_relative_eq!(exam.outcomes[1].points_awarded, 0.0);
    assert_relative_eq!(exam.summary.total_possible, 10.0);
    assert_relative_eq!(exam.summary.total_awarded, 3.0);
    assert_eq!(exam.summary.tally.unanswered, 2);
    assert_eq!(exam.summary.tally.incorrect, 1);
}

#[test]
fn test_score_never_exceeds_value() {
    let key = vec![
        KeyQuestion::new("1", "nombre, comun, masculino, singular", 1.5),
        KeyQuestion::new("2", "verbo", 0.0),
    ];
    let answers = vec![
        FreeTextAnswer::new("1", "Sust. común, masc., sing."),
        FreeTextAnswer::new("2", "verbo"),
    ];

    let exam = grader().grade_free_text(&key, &answers).unwrap();
    for outcome in &exam.outcomes {
        assert!(outcome.points_awarded >= 0.0);
        assert!(outcome.points_awarded <= outcome.points_possible);
    }
    assert_relative_eq!(exam.outcomes[0].points_awarded, 1.5);
}

#[test]
fn test_final_grade_formula() {
    let key = vec![
        KeyQuestion::new("1", "nombre, comun, plural", 3.0),
        KeyQuestion::new("2", "verbo", 1.0),
        KeyQuestion::new("3", "adjetivo, calificativo", 2.0),
    ];
    let answers = vec![
        FreeTextAnswer::new("1", "nombre plural"),
        FreeTextAnswer::new("2", "verbo"),
        FreeTextAnswer::new("3", "adverbio"),
    ];

    let exam = grader().grade_free_text(&key, &answers).unwrap();
    let summary = &exam.summary;

    assert_relative_eq!(summary.total_awarded, 3.0);
    assert_relative_eq!(summary.total_possible, 6.0);
    assert_relative_eq!(
        round2(summary.final_grade),
        round2(summary.total_awarded * 20.0 / summary.total_possible)
    );
    assert_relative_eq!(round2(summary.final_grade), 10.0);
}

#[test]
fn test_zero_value_exam_grades_zero() {
    let key = vec![key_row("1", 0.0, "", "")];
    let exam = grader().grade_dual(&key, &[DualAnswerRow::new("1", "", "")]).unwrap();

    assert_eq!(exam.outcomes[0].state, QuestionState::Neutral);
    assert_relative_eq!(exam.summary.final_grade, 0.0);
}

#[test]
fn test_empty_key_is_an_error() {
    let g = grader();
    let request = GradingRequest::FreeText {
        key: Vec::new(),
        answers: vec![FreeTextAnswer::new("1", "nombre")],
    };
    assert_eq!(g.grade_request(&request), Err(GradingError::EmptyKey));

    let submissions = vec![Submission {
        student_id: "s1".to_string(),
        answers: Vec::new(),
    }];
    assert_eq!(g.grade_batch_parallel(&[], &submissions), Err(GradingError::EmptyKey));
}

#[test]
fn test_normalization_is_idempotent() {
    let n = Normalizer::spanish();
    for raw in [
        "Verbo: 3ra persona del sing., pret. perf. de indic.",
        "Artículo determinado, fem. plur. [1 punto]",
        "nombre común, masculino o femenino",
    ] {
        for strategy in [StrategyType::WordLevel, StrategyType::BlockLevel] {
            let once = n.extract(raw, strategy);
            let rejoined = match strategy {
                StrategyType::WordLevel => once.join(" "),
                StrategyType::BlockLevel => once.join(", "),
            };
            assert_eq!(n.extract(&rejoined, strategy), once, "{:?} on {:?}", strategy, raw);
        }
    }
}

#[test]
fn test_request_json_to_report() {
    let json = r#"{
        "mode": "dual",
        "key": [
            { "id": "2", "prompt": "casas", "point_value": 2,
              "grammatical": "plural, femenino", "classification": "nombre, comun" },
            { "id": "1", "prompt": "corre", "point_value": 2,
              "grammatical": "3ra persona", "classification": "verbo" }
        ],
        "answers": [
            { "id": "1", "grammatical": "Persona: 3a persona", "classification": "v." },
            { "id": "2", "grammatical": "plur.", "classification": "" }
        ]
    }"#;
    let request: GradingRequest = serde_json::from_str(json).unwrap();
    let exam = grader().grade_request(&request).unwrap();

    // Canonical order regardless of input order
    assert_eq!(exam.outcomes[0].question_id, "1");
    assert_eq!(exam.outcomes[0].state, QuestionState::Correct);
    assert_eq!(exam.outcomes[1].state, QuestionState::Partial);
    assert_eq!(exam.outcomes[1].dimensions[1].received_text, "---");

    let report = JsonFormatter::format(&ExamReport::from(&exam)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(value["questions"][1]["state"], "PARTIAL");
    assert_eq!(value["summary"]["questionCount"], 2);
}

#[test]
fn test_strict_policy_and_word_level_strategy() {
    let config = GradingConfig {
        free_text_policy: ScoringPolicy::Strict,
        strategy: StrategyType::WordLevel,
        ..GradingConfig::default()
    };
    let g = ExamGrader::new(config).unwrap();

    let free = g
        .grade_free_text(
            &[KeyQuestion::new("1", "nombre, comun", 2.0)],
            &[FreeTextAnswer::new("1", "nombre")],
        )
        .unwrap();
    assert_relative_eq!(free.outcomes[0].points_awarded, 0.0);
    assert_eq!(free.outcomes[0].state, QuestionState::Partial);

    // Word level: "nombre comun" yields two concepts
    let dual = g
        .grade_dual(
            &[key_row("1", 5.0, "", "nombre comun")],
            &[DualAnswerRow::new("1", "", "comun")],
        )
        .unwrap();
    assert_eq!(dual.outcomes[0].dimensions[1].expected, 2);
    assert_relative_eq!(dual.outcomes[0].points_awarded, 1.0);
}

#[test]
fn test_custom_lexicon() {
    let lexicon = Lexicon::from_json(
        r#"{ "synonyms": { "n": "noun" }, "stop_words": ["a"], "alternative_markers": ["or"] }"#,
    )
    .unwrap();
    let g = ExamGrader::with_normalizer(GradingConfig::default(), Normalizer::new(Arc::new(lexicon))).unwrap();

    let exam = g
        .grade_free_text(
            &[KeyQuestion::new("1", "noun or verb", 1.0)],
            &[FreeTextAnswer::new("1", "n")],
        )
        .unwrap();
    assert_eq!(exam.outcomes[0].state, QuestionState::Correct);
}

#[test]
fn test_invalid_config_rejected() {
    let err = ExamGrader::new(GradingConfig::default().with_scale(-1.0)).unwrap_err();
    assert!(err.to_string().contains("scale"));
}
