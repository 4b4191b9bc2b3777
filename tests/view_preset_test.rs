use partview::{
    timeline::Action,
    view::ViewPreset,
};

#[test]
fn should_resolve_presets_by_name() {
    for name in ["slider", "spring", "housing", "combined"] {
        let preset = ViewPreset::from_name(name).unwrap();
        assert_eq!(preset.name, name);
        assert!(!preset.slots.is_empty());
    }
    assert!(ViewPreset::from_name("flux-capacitor").is_none());
}

#[test]
fn should_load_every_slot_of_each_preset() {
    for name in ["slider", "spring", "housing", "combined"] {
        let preset = ViewPreset::from_name(name).unwrap();
        for slot in 0..preset.slots.len() {
            assert!(
                preset
                    .steps
                    .iter()
                    .any(|s| s.action == Action::LoadAsset(slot)),
                "{name}: slot {slot} is never loaded"
            );
        }
    }
}

#[test]
fn should_stagger_the_combined_assembly() {
    let preset = ViewPreset::combined();
    assert_eq!(preset.slots.len(), 3);

    let load_delay = |slot| {
        preset
            .steps
            .iter()
            .find(|s| s.action == Action::LoadAsset(slot))
            .map(|s| s.delay.as_millis())
            .unwrap()
    };
    assert_eq!(load_delay(0), 0);
    assert_eq!(load_delay(1), 1000);
    assert_eq!(load_delay(2), 2000);

    // The rotation flourish brackets the housing load.
    assert!(preset.steps.iter().any(|s| {
        s.action == Action::SetAutoRotateSpeed(50.0) && s.delay.as_millis() == 2000
    }));
    assert!(preset.steps.iter().any(|s| {
        s.action == Action::SetAutoRotateSpeed(1.5) && s.delay.as_millis() == 2800
    }));
}
