use eegfocus::{select_channels, BoardRegistry, BuildConfig, ChannelMap};

#[test]
fn builtin_boards_resolve() {
    let reg = BoardRegistry::builtin();
    for id in [-1, 0, 1, 2, 21, 22] {
        assert!(!select_channels(&reg, id, &[]).unwrap().is_empty(), "board {id}");
    }
}

#[test]
fn muse_temporal_sites_excluded() {
    let reg = BoardRegistry::builtin();
    let muse = select_channels(&reg, 22, &["tp9".to_string(), "TP 10".to_string()]).unwrap();
    assert_eq!(muse, vec![2, 3]);
}

#[test]
fn ganglion_has_no_names_so_exclusion_is_ignored() {
    let reg = BoardRegistry::builtin();
    let got = select_channels(&reg, 1, &["Fp1".to_string()]).unwrap();
    assert_eq!(got, vec![1, 2, 3, 4]);
}

#[test]
fn config_exclusions_apply_through_channel_map() {
    let cfg = BuildConfig {
        excluded_channels: vec!["O1".into(), "O2".into()],
        ..BuildConfig::default()
    };
    let reg = BoardRegistry::builtin();
    let mut map = ChannelMap::new();
    assert_eq!(map.resolve(&reg, 0, &cfg.excluded_channels).unwrap(), &[1, 2, 3, 4, 5, 6]);
    assert_eq!(map.get(0).map(<[usize]>::len), Some(6));
}
