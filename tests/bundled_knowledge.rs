use fiqh::{
    Knowledge,
    MatchOutcome,
    answer::{self, Answer},
    text_util::normalize,
};

fn title_for(knowledge: &Knowledge, question: &str) -> Option<String> {
    knowledge
        .matcher()
        .find(question)
        .entry()
        .map(|e| e.title.clone())
}

#[test]
fn how_to_pray_matches_prayer_topic() {
    let knowledge = Knowledge::bundled().unwrap();
    assert_eq!(normalize("Как делать намаз?"), "как делать намаз");
    assert_eq!(
        title_for(&knowledge, "Как делать намаз?").as_deref(),
        Some("Намаз (молитва)")
    );
}

#[test]
fn nisab_question_matches_zakat() {
    let knowledge = Knowledge::bundled().unwrap();
    assert_eq!(
        title_for(&knowledge, "нисаб для закята").as_deref(),
        Some("Закят")
    );
}

#[test]
fn typo_outside_stem_reach_is_an_accepted_miss() {
    let knowledge = Knowledge::bundled().unwrap();
    assert_eq!(
        knowledge.matcher().find("что такое рибо"),
        MatchOutcome::NoMatch
    );
}

#[test]
fn empty_and_punctuation_only_questions_do_not_match() {
    let knowledge = Knowledge::bundled().unwrap();
    let matcher = knowledge.matcher();
    assert_eq!(matcher.find(""), MatchOutcome::NoMatch);
    assert_eq!(matcher.find("???"), MatchOutcome::NoMatch);
    assert_eq!(matcher.find("!!!   ..."), MatchOutcome::NoMatch);
}

#[test]
fn unrelated_questions_do_not_match() {
    let knowledge = Knowledge::bundled().unwrap();
    for question in ["привет", "погода в москве", "what is rust"] {
        assert_eq!(title_for(&knowledge, question), None, "{question}");
    }
}

#[test]
fn stem_only_questions_match_through_synonyms() {
    let knowledge = Knowledge::bundled().unwrap();
    let cases = [
        ("Можно ли брать ипотеку в банке?", "Риба (ростовщичество)"),
        ("мне нужен махр для свадьбы", "Никах (брак)"),
        ("Сокращение намаза в путешествии", "Намаз путника (сафар)"),
        ("Как совершать тайаммум песком?", "Тайаммум"),
    ];
    for (question, title) in cases {
        assert_eq!(
            title_for(&knowledge, question).as_deref(),
            Some(title),
            "{question}"
        );
    }
}

#[test]
fn inflected_forms_are_tolerated() {
    let knowledge = Knowledge::bundled().unwrap();
    assert_eq!(
        title_for(&knowledge, "что делать при разводе").as_deref(),
        Some("Развод (талак)")
    );
    assert_eq!(
        title_for(&knowledge, "молитва").as_deref(),
        Some("Намаз (молитва)")
    );
}

#[test]
fn single_stem_word_stays_below_threshold() {
    let knowledge = Knowledge::bundled().unwrap();
    let matcher = knowledge.matcher();

    // "кальян" only reaches the smoking topic through one stem rule.
    let card = matcher.scores("Можно ли курить кальян");
    assert_eq!(card.best_score(), 2);
    assert_eq!(matcher.find("Можно ли курить кальян"), MatchOutcome::NoMatch);

    // Mentioning it twice is enough.
    assert_eq!(
        title_for(&knowledge, "кальян кальян").as_deref(),
        Some("Курение")
    );
}

#[test]
fn case_does_not_change_the_outcome() {
    let knowledge = Knowledge::bundled().unwrap();
    let matcher = knowledge.matcher();
    assert_eq!(matcher.find("НАМАЗ"), matcher.find("намаз"));
    assert_eq!(matcher.find("ЗАКЯТ С ЗОЛОТА"), matcher.find("закят с золота"));
}

#[test]
fn every_topic_is_reachable_by_its_first_key() {
    let knowledge = Knowledge::bundled().unwrap();
    for entry in knowledge.catalog.entries() {
        let key = &entry.keys[0];
        assert_eq!(
            title_for(&knowledge, key).as_deref(),
            Some(entry.title.as_str()),
            "key {key:?}"
        );
    }
}

#[test]
fn every_stem_topic_has_a_catalog_entry() {
    let knowledge = Knowledge::bundled().unwrap();
    for topic in knowledge.stems.topics() {
        let covered = (0..knowledge.catalog.len()).any(|idx| {
            knowledge
                .catalog
                .normalized_keys(idx)
                .iter()
                .any(|key| key.contains(topic))
        });
        assert!(covered, "stem topic {topic:?} has no entry");
    }
}

#[test]
fn resolve_falls_back_to_topic_list() {
    let knowledge = Knowledge::bundled().unwrap();
    match answer::resolve("что такое рибо", &knowledge) {
        Answer::NotFound { topics, links, .. } => {
            assert_eq!(topics.len(), knowledge.catalog.len());
            assert_eq!(topics[0], "Намаз (молитва)");
            assert!(!links.is_empty());
        }
        other => panic!("expected fallback, got {other:?}"),
    }
}
