// Integration tests for draft-scout.
//
// These tests exercise the full system end-to-end using the library crate's
// public API. They verify that the engines compose (join + combine +
// classify), that the registered archetype rules reproduce the documented
// scenarios, and that the file-based pipeline round-trips CSV input to the
// expected archetype output files.

use std::fs;
use std::path::PathBuf;

use draft_scout::archetypes;
use draft_scout::config::Config;
use draft_scout::engine::classify::classify;
use draft_scout::engine::combine::combine_aligned;
use draft_scout::engine::join::{join, JoinSpec};
use draft_scout::io::read_table;
use draft_scout::pipeline;
use draft_scout::table::{Table, Value};

// ===========================================================================
// Test helpers
// ===========================================================================

fn str_val(s: &str) -> Value {
    Value::Str(s.to_string())
}

fn num(n: f64) -> Value {
    Value::Num(n)
}

fn table(columns: &[&str]) -> Table {
    Table::new(columns.iter().map(|c| c.to_string()).collect())
}

fn rule(name: &str) -> draft_scout::engine::classify::ClassificationRule {
    archetypes::all_archetypes()
        .into_iter()
        .find(|a| a.name == name)
        .unwrap_or_else(|| panic!("archetype {name} not registered"))
        .rule
}

/// A compiled-RB-shaped table with a single row.
#[allow(clippy::too_many_arguments)]
fn compiled_rb_row(
    player: &str,
    games: f64,
    rec_targ: f64,
    team_targets: f64,
    adp: f64,
    age: f64,
    ol_rank: f64,
) -> Table {
    let mut t = table(&[
        "player",
        "team",
        "games",
        "recTarg",
        "teamTargets",
        "ADP",
        "age",
        "olRank",
    ]);
    t.push_row(vec![
        str_val(player),
        str_val("IND"),
        num(games),
        num(rec_targ),
        num(team_targets),
        num(adp),
        num(age),
        num(ol_rank),
    ]);
    t
}

// ===========================================================================
// Legendary archetype scenarios
// ===========================================================================

#[test]
fn legendary_scenario_qualifying_row_survives() {
    // trgt% = 40 / ((500/17) * 17) * 100 = 8.0
    // ADP 20 <= 26; trgt% 8 >= 7 with age 22 <= 22; olRank 10 <= 24.
    let compiled = compiled_rb_row("X", 17.0, 40.0, 500.0, 20.0, 22.0, 10.0);
    let result = classify(&compiled, &rule("legendary-runningbacks")).unwrap();

    assert_eq!(result.n_rows(), 1);
    assert_eq!(
        result.columns(),
        &[
            "player".to_string(),
            "team".to_string(),
            "age".to_string(),
            "ADP".to_string()
        ]
    );
    assert_eq!(result.rows()[0][0], str_val("X"));
    assert_eq!(result.rows()[0][2], num(22.0));
    assert_eq!(result.rows()[0][3], num(20.0));
}

#[test]
fn legendary_scenario_adp_gate_excludes_row() {
    // Same player but ADP 30 fails the ADP <= 26 gate regardless of the
    // other columns.
    let compiled = compiled_rb_row("X", 17.0, 40.0, 500.0, 30.0, 22.0, 10.0);
    let result = classify(&compiled, &rule("legendary-runningbacks")).unwrap();
    assert_eq!(result.n_rows(), 0);
    assert_eq!(result.n_cols(), 4);
}

#[test]
fn legendary_age_brackets_widen_with_target_share() {
    // trgt% = 60 / ((500/17) * 17) * 100 = 12.0: not enough at age 25
    // (needs 13), enough at age 23 (needs 11).
    let at_23 = compiled_rb_row("Y", 17.0, 60.0, 500.0, 10.0, 23.0, 5.0);
    let at_25 = compiled_rb_row("Y", 17.0, 60.0, 500.0, 10.0, 25.0, 5.0);

    let legendary = rule("legendary-runningbacks");
    assert_eq!(classify(&at_23, &legendary).unwrap().n_rows(), 1);
    assert_eq!(classify(&at_25, &legendary).unwrap().n_rows(), 0);
}

#[test]
fn legendary_missing_team_data_disqualifies_quietly() {
    // An unmatched team join leaves teamTargets absent; trgt% is NaN and the
    // row drops out with no error.
    let mut compiled = table(&[
        "player",
        "team",
        "games",
        "recTarg",
        "teamTargets",
        "ADP",
        "age",
        "olRank",
    ]);
    compiled.push_row(vec![
        str_val("Orphan"),
        str_val("???"),
        num(17.0),
        num(40.0),
        Value::Absent,
        num(20.0),
        num(22.0),
        num(10.0),
    ]);

    let result = classify(&compiled, &rule("legendary-runningbacks")).unwrap();
    assert_eq!(result.n_rows(), 0);
}

// ===========================================================================
// Other archetype rules
// ===========================================================================

#[test]
fn deadzone_accepts_elite_rusher_behind_good_line() {
    let mut compiled = table(&[
        "player",
        "team",
        "games",
        "recTarg",
        "rushCarries",
        "forcedMissedTackles",
        "teamTargets",
        "ADP",
        "age",
        "olRank",
        "rushGrade",
    ]);
    // Low target share, but rushGrade 90 behind olRank 12.
    compiled.push_row(vec![
        str_val("Grinder"),
        str_val("DAL"),
        num(16.0),
        num(20.0),
        num(240.0),
        num(50.0),
        num(520.0),
        num(45.0),
        num(26.0),
        num(12.0),
        num(90.0),
    ]);
    // Identical profile but ADP 20 is out of the deadzone window.
    compiled.push_row(vec![
        str_val("EarlyPick"),
        str_val("DAL"),
        num(16.0),
        num(20.0),
        num(240.0),
        num(50.0),
        num(520.0),
        num(20.0),
        num(26.0),
        num(12.0),
        num(90.0),
    ]);

    let result = classify(&compiled, &rule("deadzone-runningbacks")).unwrap();
    assert_eq!(result.n_rows(), 1);
    assert_eq!(result.rows()[0][0], str_val("Grinder"));
}

#[test]
fn breakout_receiver_requires_all_gates() {
    let mut compiled = table(&[
        "player", "team", "games", "recTarg", "teamTargets", "ADP", "age", "recGrade",
    ]);
    // trgt% = 110 / ((510/17) * 17) * 100 = 21.57 >= 20.
    compiled.push_row(vec![
        str_val("Riser"),
        str_val("CIN"),
        num(17.0),
        num(110.0),
        num(510.0),
        num(55.0),
        num(23.0),
        num(82.0),
    ]);
    // Same but one year too old.
    compiled.push_row(vec![
        str_val("TooOld"),
        str_val("CIN"),
        num(17.0),
        num(110.0),
        num(510.0),
        num(55.0),
        num(26.0),
        num(82.0),
    ]);

    let result = classify(&compiled, &rule("breakout-receivers")).unwrap();
    assert_eq!(result.n_rows(), 1);
    assert_eq!(result.rows()[0][0], str_val("Riser"));
}

#[test]
fn must_draft_quarterback_any_route_qualifies() {
    let mut compiled = table(&[
        "player",
        "team",
        "games",
        "rushCarries",
        "depthAim",
        "ADP",
        "age",
        "olRank",
        "offenseGrade",
    ]);
    // Route 1: rushing volume + downfield aggression.
    compiled.push_row(vec![
        str_val("Runner"),
        str_val("BAL"),
        num(16.0),
        num(96.0), // 6 carries/game
        num(9.5),
        num(70.0),
        num(27.0),
        num(20.0),
        num(80.0),
    ]);
    // Route 2: young passer in an elite offense.
    compiled.push_row(vec![
        str_val("Prodigy"),
        str_val("KC"),
        num(17.0),
        num(30.0),
        num(7.5),
        num(60.0),
        num(26.0),
        num(5.0),
        num(94.0),
    ]);
    // Route 3: early draft capital.
    compiled.push_row(vec![
        str_val("Consensus"),
        str_val("BUF"),
        num(17.0),
        num(40.0),
        num(8.0),
        num(25.0),
        num(31.0),
        num(8.0),
        num(88.0),
    ]);
    // No route: old pocket passer drafted late in a mediocre offense.
    compiled.push_row(vec![
        str_val("Journeyman"),
        str_val("CAR"),
        num(15.0),
        num(20.0),
        num(6.5),
        num(140.0),
        num(34.0),
        num(28.0),
        num(70.0),
    ]);

    let result = classify(&compiled, &rule("must-draft-quarterbacks")).unwrap();
    let names: Vec<String> = result.rows().iter().map(|r| r[0].to_string()).collect();
    assert_eq!(names, vec!["Runner", "Prodigy", "Consensus"]);
}

// ===========================================================================
// Engine composition (compile flow in memory)
// ===========================================================================

#[test]
fn combine_then_join_builds_a_compiled_table() {
    // Base stats and a grade file with no shared key column, both sorted by
    // player display name; then an ADP join on top.
    let mut base = table(&["player", "team", "games"]);
    base.push_row(vec![str_val("Alpha Back"), str_val("IND"), num(17.0)]);
    base.push_row(vec![str_val("Bravo Back"), str_val("DAL"), num(15.0)]);

    let mut grades = table(&["rushGrade"]);
    grades.push_row(vec![num(88.0)]);
    grades.push_row(vec![num(74.0)]);

    let combined = combine_aligned(&base, &[grades]).unwrap();
    assert_eq!(combined.n_cols(), 4);

    let mut adp_source = table(&["player", "adp"]);
    adp_source.push_row(vec![str_val("Bravo Back"), num(33.0)]);
    adp_source.push_row(vec![str_val("Alpha Back"), num(8.0)]);

    let compiled = join(
        &combined,
        &JoinSpec {
            source: adp_source,
            match_column_in_source: "player".into(),
            value_column_in_source: "adp".into(),
            output_column: "ADP".into(),
            match_column_in_target: None,
        },
    )
    .unwrap();

    assert_eq!(compiled.n_rows(), 2);
    assert_eq!(compiled.rows()[0][3], num(88.0));
    assert_eq!(compiled.rows()[0][4], num(8.0));
    assert_eq!(compiled.rows()[1][4], num(33.0));
}

// ===========================================================================
// File-based pipeline
// ===========================================================================

/// Create an isolated workspace under the system temp directory with a
/// populated RB data directory.
fn rb_workspace(test_name: &str) -> (PathBuf, Config) {
    let root = std::env::temp_dir().join(format!(
        "draftscout-{}-{}",
        test_name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&root);
    let data_dir = root.join("2021_data");
    fs::create_dir_all(&data_dir).unwrap();

    fs::write(
        data_dir.join("data_rb_stats.csv"),
        "\
player,team,games,recTarg,rushCarries,ydsPerCarry
Breakout Back,IND,17,40,200,4.6
Veteran Back,DAL,16,50,240,4.9
Practice Squad,FA,4,2,10,3.1
",
    )
    .unwrap();
    fs::write(
        data_dir.join("data_player_adp.csv"),
        "\
player,adp
Breakout Back,20
Veteran Back,30
",
    )
    .unwrap();
    fs::write(
        data_dir.join("data_player_age.csv"),
        "\
player,age
Breakout Back,22
Veteran Back,27
",
    )
    .unwrap();
    fs::write(
        data_dir.join("data_team_olrank.csv"),
        "\
team,rank
IND,10
DAL,2
",
    )
    .unwrap();
    fs::write(
        data_dir.join("data_team_trgt%.csv"),
        "\
team,targets
IND,500
DAL,520
",
    )
    .unwrap();
    fs::write(
        data_dir.join("data_player_rushgrade.csv"),
        "\
player,rushGrade,forcedMissedTackles
Breakout Back,85,40
Veteran Back,90,60
",
    )
    .unwrap();

    let config = Config {
        year: 2022,
        data_dir,
        output_dir: root.join("2022_calculations"),
        archetypes: vec![
            "legendary-runningbacks".into(),
            "deadzone-runningbacks".into(),
            "hero-runningbacks".into(),
        ],
    };
    (root, config)
}

#[test]
fn pipeline_run_writes_rb_archetype_files() {
    let (root, config) = rb_workspace("full-run");

    pipeline::run(&config).unwrap();

    // Breakout Back: trgt% 8 at age 22, ADP 20, olRank 10 -> legendary.
    let legendary = read_table(&config.output_dir.join("legendary_runningbacks.csv")).unwrap();
    assert_eq!(legendary.n_rows(), 1);
    assert_eq!(legendary.rows()[0][0], str_val("Breakout Back"));
    assert_eq!(legendary.rows()[0][1], str_val("IND"));
    assert_eq!(legendary.rows()[0][2], num(22.0));
    assert_eq!(legendary.rows()[0][3], num(20.0));

    // Veteran Back: ADP 30, age 27, rushGrade 90 behind olRank 2 -> deadzone.
    let deadzone = read_table(&config.output_dir.join("deadzone_runningbacks.csv")).unwrap();
    assert_eq!(deadzone.n_rows(), 1);
    assert_eq!(deadzone.rows()[0][0], str_val("Veteran Back"));

    // Nobody in the ADP 81-120 window: empty result, schema intact.
    let hero = read_table(&config.output_dir.join("hero_runningbacks.csv")).unwrap();
    assert_eq!(hero.n_rows(), 0);
    assert_eq!(hero.columns()[0], "player");

    let _ = fs::remove_dir_all(root);
}

#[test]
fn pipeline_compiles_and_caches_the_position_table() {
    let (root, config) = rb_workspace("compile-cache");

    pipeline::run(&config).unwrap();

    // The compiled table was cached next to the raw data, sorted by ADP,
    // with the no-ADP player dropped.
    let compiled = read_table(&config.data_dir.join("compiled_rb_data.csv")).unwrap();
    assert_eq!(compiled.n_rows(), 2);
    assert_eq!(compiled.rows()[0][0], str_val("Breakout Back"));
    assert_eq!(compiled.rows()[1][0], str_val("Veteran Back"));
    assert!(compiled.column_index("olRank").is_some());
    assert!(compiled.column_index("teamTargets").is_some());
    assert!(compiled.column_index("forcedMissedTackles").is_some());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn pipeline_reuses_an_existing_compiled_table() {
    let (root, config) = rb_workspace("reuse-compiled");

    // Pre-seed a compiled table containing a fabricated qualifier; the raw
    // stats files must then be ignored.
    fs::write(
        config.data_dir.join("compiled_rb_data.csv"),
        "\
player,team,games,recTarg,rushCarries,ADP,age,olRank,teamTargets,rushGrade,forcedMissedTackles
Seeded Star,SEA,17,40,180,10,22,5,500,85,40
",
    )
    .unwrap();

    pipeline::run(&config).unwrap();

    let legendary = read_table(&config.output_dir.join("legendary_runningbacks.csv")).unwrap();
    assert_eq!(legendary.n_rows(), 1);
    assert_eq!(legendary.rows()[0][0], str_val("Seeded Star"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn pipeline_rejects_unknown_archetype_before_touching_files() {
    let config = Config {
        year: 2022,
        data_dir: PathBuf::from("does-not-exist"),
        output_dir: std::env::temp_dir().join(format!(
            "draftscout-unknown-archetype-{}",
            std::process::id()
        )),
        archetypes: vec!["no-such-archetype".into()],
    };
    let err = pipeline::run(&config).unwrap_err();
    assert!(err.to_string().contains("no-such-archetype"));
    let _ = fs::remove_dir_all(&config.output_dir);
}
