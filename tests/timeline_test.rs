use std::time::Duration;

use partview::timeline::{Action, Step, Timeline};

fn combined_steps() -> Vec<Step> {
    vec![
        Step::new(0, Action::SetAutoRotateSpeed(10.0)),
        Step::new(0, Action::LoadAsset(0)),
        Step::new(1000, Action::LoadAsset(1)),
        Step::new(2000, Action::LoadAsset(2)),
        Step::new(2000, Action::SetAutoRotateSpeed(50.0)),
        Step::new(2800, Action::SetAutoRotateSpeed(1.5)),
    ]
}

#[test]
fn should_fire_only_elapsed_steps() {
    let mut timeline = Timeline::new(combined_steps());

    let due = timeline.poll(Duration::from_millis(1500));

    assert_eq!(
        due,
        vec![
            Action::SetAutoRotateSpeed(10.0),
            Action::LoadAsset(0),
            Action::LoadAsset(1),
        ]
    );
    assert!(!timeline.is_finished());
}

#[test]
fn should_fire_each_step_exactly_once() {
    let mut timeline = Timeline::new(combined_steps());

    let first = timeline.poll(Duration::from_secs(10));
    assert_eq!(first.len(), 6);
    assert!(timeline.is_finished());

    // Later polls return nothing, no matter how far time advances.
    assert!(timeline.poll(Duration::from_secs(60)).is_empty());
}

#[test]
fn should_keep_same_delay_steps_in_given_order() {
    // The load request has to go out before the speed change at the same
    // offset takes effect.
    let mut timeline = Timeline::new(vec![
        Step::new(2000, Action::LoadAsset(2)),
        Step::new(2000, Action::SetAutoRotateSpeed(50.0)),
    ]);

    let due = timeline.poll(Duration::from_millis(2000));
    assert_eq!(
        due,
        vec![Action::LoadAsset(2), Action::SetAutoRotateSpeed(50.0)]
    );
}

#[test]
fn should_sort_steps_by_delay() {
    let mut timeline = Timeline::new(vec![
        Step::new(2000, Action::LoadAsset(2)),
        Step::new(0, Action::LoadAsset(0)),
        Step::new(1000, Action::LoadAsset(1)),
    ]);

    assert_eq!(
        timeline.poll(Duration::from_millis(500)),
        vec![Action::LoadAsset(0)]
    );
    assert_eq!(
        timeline.poll(Duration::from_millis(2500)),
        vec![Action::LoadAsset(1), Action::LoadAsset(2)]
    );
}

#[test]
fn should_return_nothing_before_the_first_delay() {
    let mut timeline = Timeline::new(vec![Step::new(100, Action::LoadAsset(0))]);
    assert!(timeline.poll(Duration::from_millis(99)).is_empty());
    // A step fires when its delay is reached, not strictly passed.
    assert_eq!(
        timeline.poll(Duration::from_millis(100)),
        vec![Action::LoadAsset(0)]
    );
}

#[test]
fn should_drop_remaining_steps_on_cancel() {
    let mut timeline = Timeline::new(combined_steps());
    assert_eq!(timeline.poll(Duration::ZERO).len(), 2);

    timeline.cancel();

    assert!(timeline.is_finished());
    assert!(timeline.poll(Duration::from_secs(10)).is_empty());
}

#[test]
fn should_finish_immediately_when_empty() {
    let mut timeline = Timeline::new(Vec::new());
    assert!(timeline.is_finished());
    assert!(timeline.poll(Duration::ZERO).is_empty());
}
