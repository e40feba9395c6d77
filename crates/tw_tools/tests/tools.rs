//! The tools working on map files.

use tw_core::grid::World;
use tw_tools::render::render;
use tw_tools::simulate::simulate;
use tw_tools::validate::{new_map, validate_map_file};
use tw_test_utils::fixtures::duel;

#[test]
fn test_new_map_validates_with_warning() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("blank.json");
    new_map(15, 8, 1).unwrap().save(&path).unwrap();

    let summary = validate_map_file(&path).unwrap();
    assert_eq!((summary.width, summary.height), (15, 8));
    assert!(summary.players.is_empty());
    assert_eq!(summary.warnings, vec!["only 0 player(s) on the map".to_string()]);
}

#[test]
fn test_saved_duel_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("duel.json");
    duel().to_map_document().save(&path).unwrap();

    let summary = validate_map_file(&path).unwrap();
    assert_eq!(summary.players, vec![1, 2]);
    assert_eq!(summary.reinforcements, 1);
    // the duel's units start next to their bases, not on them
    assert_eq!(summary.warnings.len(), 2);

    let a = simulate(World::from_map_file(&path).unwrap(), 200, 5);
    let b = simulate(World::from_map_file(&path).unwrap(), 200, 5);
    assert_eq!(a, b);
    assert_eq!(a.units.values().sum::<usize>(), 4);

    let picture = render(&World::from_map_file(&path).unwrap());
    assert_eq!(picture.lines().count(), 11);
    assert!(picture.contains("T1") && picture.contains("T2"));
    assert!(picture.contains("U1") && picture.contains("U2"));
}
