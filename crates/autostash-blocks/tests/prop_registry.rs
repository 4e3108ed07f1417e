use autostash_blocks::config::{BlockDef, BlocksConfig};
use autostash_blocks::registry::BlockRegistry;
use proptest::prelude::*;

fn config_with(names: &[String]) -> BlocksConfig {
    let mut blocks = vec![BlockDef {
        solid: Some(false),
        passable: Some(true),
        ..BlockDef::named("air")
    }];
    blocks.extend(names.iter().map(|n| BlockDef::named(n)));
    BlocksConfig {
        blocks,
        container_patterns: vec!["shulker".into()],
        passable_patterns: vec!["sign".into()],
    }
}

#[test]
fn explicit_ids_leave_gaps_unregistered() {
    let cfg = BlocksConfig {
        blocks: vec![
            BlockDef {
                id: Some(0),
                solid: Some(false),
                ..BlockDef::named("air")
            },
            BlockDef {
                id: Some(5),
                container: Some(true),
                ..BlockDef::named("chest")
            },
        ],
        ..Default::default()
    };
    let reg = BlockRegistry::from_config(cfg).expect("registry");
    assert_eq!(reg.id_by_name("chest"), Some(5));
    for gap in 1..5 {
        assert!(reg.get(gap).is_none());
        assert!(!reg.is_container(gap));
        assert!(!reg.is_passable(gap));
    }
    assert!(reg.is_container(5));
}

proptest! {
    // Name patterns mark whole block families regardless of the explicit flags
    #[test]
    fn patterns_classify_by_substring(prefix in "[a-z]{0,6}", suffix in "[a-z_]{0,6}") {
        let names = vec![
            format!("{prefix}shulker{suffix}"),
            format!("{prefix}_sign{suffix}"),
        ];
        prop_assume!(names[0] != names[1]);
        let reg = BlockRegistry::from_config(config_with(&names)).unwrap();
        let shulker = reg.id_by_name(&names[0]).unwrap();
        let sign = reg.id_by_name(&names[1]).unwrap();
        prop_assert!(reg.is_container(shulker));
        prop_assert!(reg.is_passable(sign));
    }

    // Ids outside the table behave like an unknown block
    #[test]
    fn unknown_ids_are_inert(id in 64u16..) {
        let reg = BlockRegistry::bundled().unwrap();
        prop_assert!(!reg.is_container(id));
        prop_assert!(!reg.is_passable(id));
        prop_assert!(!reg.is_solid(id));
        prop_assert!(!reg.obstructs_opening(Some(id)));
    }

    // Every registered name maps back to its own id
    #[test]
    fn by_name_round_trips(names in proptest::collection::hash_set("[a-z]{3,8}", 0..16)) {
        let names: Vec<String> = names.into_iter().filter(|n| n != "air").collect();
        let reg = BlockRegistry::from_config(config_with(&names)).unwrap();
        for n in &names {
            let id = reg.id_by_name(n).unwrap();
            prop_assert_eq!(reg.name_of(id), n.as_str());
        }
    }
}
