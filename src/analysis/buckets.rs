//! Local event bucketing.
//!
//! Sorts raw calendar events into the same categories the summary service
//! produces, so an exported event list can be summarized without a network
//! round trip.

use crate::models::{Event, EventDuration, RawSummaryInput, BASELINE_CATEGORY};
use serde::Deserialize;

/// Response statuses that count as "going".
const ACCEPTED_STATUSES: [&str; 3] = ["tentative", "needsAction", "accepted"];

/// A bucket rule: name plus predicate over an event.
type Rule = (&'static str, Box<dyn Fn(&Event) -> bool>);

/// Raw event file: either a bare array or an `events.list` response.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawEventFile {
    Events(Vec<Event>),
    Listing { items: Vec<Event> },
}

impl RawEventFile {
    pub fn into_events(self) -> Vec<Event> {
        match self {
            RawEventFile::Events(events) => events,
            RawEventFile::Listing { items } => items,
        }
    }
}

/// Whether `owner` is on the event with a status that is not a decline.
pub fn is_accepted_by(event: &Event, owner: &str) -> bool {
    event
        .attendee(owner)
        .and_then(|a| a.response_status.as_deref())
        .is_some_and(|status| ACCEPTED_STATUSES.contains(&status))
}

fn attendee_count_in(event: &Event, min: usize, max: usize) -> bool {
    (min..max).contains(&event.attendees.len())
}

fn duration_in(event: &Event, min: f64, max: f64) -> bool {
    (min..max).contains(&event.duration_hours())
}

fn rule(name: &'static str, matches: impl Fn(&Event) -> bool + 'static) -> Rule {
    (name, Box::new(matches))
}

/// Bucket rules in output order.
fn rules(owner: &str) -> Vec<Rule> {
    let owner = owner.to_string();
    let accepted = move |e: &Event| is_accepted_by(e, &owner);

    let accepted_and = |check: fn(&Event) -> bool| {
        let accepted = accepted.clone();
        move |e: &Event| accepted(e) && check(e)
    };

    vec![
        rule(BASELINE_CATEGORY, accepted.clone()),
        rule("personal", |e: &Event| e.attendees.is_empty()),
        rule("1on1", accepted_and(|e| e.attendees.len() == 2)),
        rule("workshop", accepted_and(|e| attendee_count_in(e, 3, 15))),
        rule("allhands", accepted_and(|e| attendee_count_in(e, 15, 1000))),
        rule("short", accepted_and(|e| duration_in(e, 0.0, 0.51))),
        rule("regular", accepted_and(|e| duration_in(e, 0.51, 1.1))),
        rule("long", accepted_and(|e| duration_in(e, 1.1, 4.0))),
    ]
}

/// Sort events into buckets for `owner`.
///
/// An event may land in several buckets. Buckets with no events are left
/// out; the remaining ones keep rule order.
pub fn bucket_events(events: &[Event], owner: &str) -> RawSummaryInput<Event> {
    let mut input = RawSummaryInput::new();

    for (name, matches) in rules(owner) {
        let bucket: Vec<Event> = events.iter().filter(|&e| matches(e)).cloned().collect();
        if !bucket.is_empty() {
            input.insert(name, bucket);
        }
    }

    input
}
