//! Behavioural coverage for recommendation ranking.

#![expect(
    clippy::expect_used,
    reason = "tests should fail fast when setup breaks"
)]

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;
use volio_core::test_support::{FailingLookup, MemoryDirectory};
use volio_core::{Event, EventId, VolunteerId, VolunteerProfile};
use volio_match::{Ranking, RankingOptions, RecommendationRanker};

/// Shared state for the ranking scenarios.
pub struct TestContext {
    runtime: Runtime,
    volunteer: RefCell<VolunteerProfile>,
    event: RefCell<Event>,
    events: RefCell<Vec<Event>>,
    volunteers: RefCell<Vec<VolunteerProfile>>,
    lookup: RefCell<FailingLookup>,
    event_ranking: RefCell<Option<Ranking<EventId>>>,
    volunteer_ranking: RefCell<Option<Ranking<VolunteerId>>>,
}

#[fixture]
/// Build a fresh `TestContext` for each scenario run.
pub fn context() -> TestContext {
    let directory = MemoryDirectory::default()
        .with_friendship("dev", "ana")
        .with_friendship("eve", "zoe");
    TestContext {
        runtime: tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("build tokio runtime"),
        volunteer: RefCell::new(VolunteerProfile::default()),
        event: RefCell::new(Event::default()),
        events: RefCell::new(Vec::new()),
        volunteers: RefCell::new(Vec::new()),
        lookup: RefCell::new(
            FailingLookup::new("unused")
                .only_for("nobody")
                .with_fallback(directory),
        ),
        event_ranking: RefCell::new(None),
        volunteer_ranking: RefCell::new(None),
    }
}

fn volunteer_ids(context: &TestContext) -> Vec<String> {
    context
        .volunteer_ranking
        .borrow()
        .as_ref()
        .expect("volunteers must be ranked first")
        .ids()
        .map(ToString::to_string)
        .collect()
}

#[given("a volunteer holding the eco-warrior badge who likes Environment")]
fn eco_volunteer(context: &TestContext) {
    *context.volunteer.borrow_mut() = VolunteerProfile::new("vol-1")
        .with_badge("eco-warrior")
        .with_interest("Environment");
}

#[given("four candidate events including a tie")]
fn four_events(context: &TestContext) {
    *context.events.borrow_mut() = vec![
        Event::new("evt-d", "Education", "org-1"),
        Event::new("evt-b", "Environment", "org-1"),
        Event::new("evt-c", "Environment", "org-1").with_required_badge("eco-warrior"),
        Event::new("evt-a", "Environment", "org-1"),
    ];
}

#[given("an environment event with two participants")]
fn environment_event(context: &TestContext) {
    *context.event.borrow_mut() = Event::new("evt-1", "Environment", "org-1")
        .with_participant("ana")
        .with_participant("ben");
}

#[given("candidate volunteers dev, cai, and eve")]
fn three_candidates(context: &TestContext) {
    *context.volunteers.borrow_mut() = vec![
        VolunteerProfile::new("eve"),
        VolunteerProfile::new("cai").with_interest("Environment"),
        VolunteerProfile::new("dev").with_interest("Environment"),
    ];
}

#[given("candidate volunteers including the organiser and a participant")]
fn involved_candidates(context: &TestContext) {
    *context.volunteers.borrow_mut() = vec![
        VolunteerProfile::new("org-1").with_interest("Environment"),
        VolunteerProfile::new("ana").with_interest("Environment"),
        VolunteerProfile::new("dev"),
        VolunteerProfile::new("eve"),
    ];
}

#[given("friend lookups fail for cai")]
fn lookups_fail_for_cai(context: &TestContext) {
    let mut lookup = context.lookup.borrow_mut();
    *lookup = lookup.clone().only_for("cai");
}

#[when("events are ranked for the volunteer")]
fn rank_events(context: &TestContext) {
    let ranking = context
        .runtime
        .block_on(RecommendationRanker::default().rank_events(
            &context.volunteer.borrow(),
            &context.events.borrow(),
            &*context.lookup.borrow(),
            &RankingOptions::default(),
        ))
        .expect("event ranking succeeds");
    *context.event_ranking.borrow_mut() = Some(ranking);
}

fn rank_volunteers_with(context: &TestContext, options: &RankingOptions) {
    let ranking = context
        .runtime
        .block_on(RecommendationRanker::default().rank_volunteers(
            &context.event.borrow(),
            &context.volunteers.borrow(),
            &*context.lookup.borrow(),
            options,
        ))
        .expect("volunteer ranking succeeds");
    *context.volunteer_ranking.borrow_mut() = Some(ranking);
}

#[when("volunteers are ranked for the event")]
fn rank_volunteers(context: &TestContext) {
    rank_volunteers_with(context, &RankingOptions::default());
}

#[when("volunteers are ranked for the event skipping involved ones")]
fn rank_volunteers_skipping_involved(context: &TestContext) {
    rank_volunteers_with(context, &RankingOptions::default().skipping_involved());
}

#[then("the events are ordered evt-c, evt-a, evt-b, evt-d")]
fn events_in_order(context: &TestContext) {
    let ids: Vec<String> = context
        .event_ranking
        .borrow()
        .as_ref()
        .expect("events must be ranked first")
        .ids()
        .map(ToString::to_string)
        .collect();
    assert_eq!(ids, vec!["evt-c", "evt-a", "evt-b", "evt-d"]);
}

#[then("the volunteers are ordered dev, eve")]
fn volunteers_in_order(context: &TestContext) {
    assert_eq!(volunteer_ids(context), vec!["dev", "eve"]);
}

#[then("cai is reported as a failed candidate")]
fn cai_failed(context: &TestContext) {
    let ranking = context.volunteer_ranking.borrow();
    let failures: Vec<&str> = ranking
        .as_ref()
        .expect("volunteers must be ranked first")
        .failures
        .iter()
        .map(|failure| failure.id.as_str())
        .collect();
    assert_eq!(failures, vec!["cai"]);
}

#[then("only outsiders are ranked")]
fn only_outsiders(context: &TestContext) {
    assert_eq!(volunteer_ids(context), vec!["dev", "eve"]);
}

#[scenario(path = "tests/features/ranking.feature", index = 0)]
fn events_best_first(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/ranking.feature", index = 1)]
fn failed_lookup_excludes_candidate(context: TestContext) {
    let _ = context;
}

#[scenario(path = "tests/features/ranking.feature", index = 2)]
fn involved_volunteers_skipped(context: TestContext) {
    let _ = context;
}
