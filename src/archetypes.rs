// The archetype registry: per-position compile plans and the classification
// rules for every named archetype.
//
// Everything here is data. Thresholds are deliberately kept in one place so
// a season-over-season tuning change is an edit to a literal, not a new code
// path. The values shipped are the latest agreed-on criteria; treat them as
// stakeholder-owned configuration.

use crate::engine::classify::{
    col, ge, le, lit, ClassificationRule, DerivedColumn, Predicate,
};

// ---------------------------------------------------------------------------
// Compile plans
// ---------------------------------------------------------------------------

/// One enrichment join in a position's compile plan. The source file lives
/// in the season's data directory.
#[derive(Debug, Clone, Copy)]
pub struct JoinPlan {
    pub file: &'static str,
    pub match_column_in_source: &'static str,
    pub value_column_in_source: &'static str,
    pub output_column: &'static str,
    /// Target column carrying the match key; `None` means the target's
    /// primary (first) column.
    pub match_column_in_target: Option<&'static str>,
}

/// A companion file combined positionally rather than joined by key.
///
/// These files share no reliable identifier with the base stats, only an
/// implicit sort-by-name alignment: each is sorted by `sort_column`, its
/// identifier columns are dropped, and the rest is appended column-wise.
#[derive(Debug, Clone, Copy)]
pub struct AlignedPlan {
    pub file: &'static str,
    pub sort_column: &'static str,
    pub drop_columns: &'static [&'static str],
}

/// How to build one position's compiled table.
#[derive(Debug, Clone, Copy)]
pub struct PositionPlan {
    pub position: &'static str,
    pub stats_file: &'static str,
    /// Columns to keep from the base stats file, primary identifier first.
    pub base_columns: &'static [&'static str],
    pub aligned: &'static [AlignedPlan],
    pub joins: &'static [JoinPlan],
    /// Cached compiled table, written to (and reused from) the data
    /// directory.
    pub compiled_file: &'static str,
}

const ADP_JOIN: JoinPlan = JoinPlan {
    file: "data_player_adp.csv",
    match_column_in_source: "player",
    value_column_in_source: "adp",
    output_column: "ADP",
    match_column_in_target: None,
};

const AGE_JOIN: JoinPlan = JoinPlan {
    file: "data_player_age.csv",
    match_column_in_source: "player",
    value_column_in_source: "age",
    output_column: "age",
    match_column_in_target: None,
};

const OL_RANK_JOIN: JoinPlan = JoinPlan {
    file: "data_team_olrank.csv",
    match_column_in_source: "team",
    value_column_in_source: "rank",
    output_column: "olRank",
    match_column_in_target: Some("team"),
};

const TEAM_TARGETS_JOIN: JoinPlan = JoinPlan {
    file: "data_team_trgt%.csv",
    match_column_in_source: "team",
    value_column_in_source: "targets",
    output_column: "teamTargets",
    match_column_in_target: Some("team"),
};

const RB_PLAN: PositionPlan = PositionPlan {
    position: "rb",
    stats_file: "data_rb_stats.csv",
    base_columns: &["player", "team", "games", "recTarg", "rushCarries"],
    aligned: &[],
    joins: &[
        ADP_JOIN,
        AGE_JOIN,
        OL_RANK_JOIN,
        TEAM_TARGETS_JOIN,
        JoinPlan {
            file: "data_player_rushgrade.csv",
            match_column_in_source: "player",
            value_column_in_source: "rushGrade",
            output_column: "rushGrade",
            match_column_in_target: None,
        },
        JoinPlan {
            file: "data_player_rushgrade.csv",
            match_column_in_source: "player",
            value_column_in_source: "forcedMissedTackles",
            output_column: "forcedMissedTackles",
            match_column_in_target: None,
        },
    ],
    compiled_file: "compiled_rb_data.csv",
};

const WR_PLAN: PositionPlan = PositionPlan {
    position: "wr",
    stats_file: "data_wr_stats.csv",
    base_columns: &["player", "team", "games", "recTarg"],
    aligned: &[],
    joins: &[
        ADP_JOIN,
        AGE_JOIN,
        TEAM_TARGETS_JOIN,
        JoinPlan {
            file: "data_player_recgrade.csv",
            match_column_in_source: "player",
            value_column_in_source: "recGrade",
            output_column: "recGrade",
            match_column_in_target: None,
        },
    ],
    compiled_file: "compiled_wr_data.csv",
};

const QB_PLAN: PositionPlan = PositionPlan {
    position: "qb",
    stats_file: "data_qb_stats.csv",
    base_columns: &["player", "team", "games", "rushCarries", "depthAim"],
    aligned: &[],
    joins: &[
        ADP_JOIN,
        AGE_JOIN,
        OL_RANK_JOIN,
        JoinPlan {
            file: "data_team_offensegrade.csv",
            match_column_in_source: "team",
            value_column_in_source: "offenseGrade",
            output_column: "offenseGrade",
            match_column_in_target: Some("team"),
        },
    ],
    compiled_file: "compiled_qb_data.csv",
};

/// All position compile plans.
pub fn position_plans() -> &'static [PositionPlan] {
    &[RB_PLAN, WR_PLAN, QB_PLAN]
}

// ---------------------------------------------------------------------------
// Archetype rules
// ---------------------------------------------------------------------------

/// A registered archetype: which position's compiled table it reads, the
/// rule to apply, and the file its survivors are written to.
#[derive(Debug, Clone)]
pub struct Archetype {
    pub name: &'static str,
    pub position: &'static str,
    pub output_file: &'static str,
    pub rule: ClassificationRule,
}

/// Shared output projection: every archetype reports the same four columns.
fn draft_projection() -> Vec<String> {
    vec!["player".into(), "team".into(), "age".into(), "ADP".into()]
}

/// Estimated share of the team's per-game passing targets going to this
/// player, normalized across games played.
fn target_share() -> DerivedColumn {
    DerivedColumn::new(
        "trgt%",
        col("recTarg") / ((col("teamTargets") / lit(17.0)) * col("games")) * lit(100.0),
    )
}

/// Early-round RBs with league-winning upside: heavy receiving involvement
/// for their age, behind a competent offensive line.
fn legendary_runningbacks() -> ClassificationRule {
    ClassificationRule {
        name: "legendary-runningbacks".into(),
        derived: vec![target_share()],
        predicates: vec![
            Predicate::single(le("ADP", 26.0)),
            Predicate::any_of(vec![
                vec![ge("trgt%", 7.0), le("age", 22.0)],
                vec![ge("trgt%", 11.0), le("age", 23.0)],
                vec![ge("trgt%", 13.0), le("age", 25.0)],
                vec![ge("trgt%", 15.0), le("age", 27.0)],
            ]),
            Predicate::single(le("olRank", 24.0)),
        ],
        projection: draft_projection(),
    }
}

/// Mid-round RBs with the profile to beat the RB deadzone: either a real
/// receiving role, or elite rushing behind a good line.
fn deadzone_runningbacks() -> ClassificationRule {
    ClassificationRule {
        name: "deadzone-runningbacks".into(),
        derived: vec![
            target_share(),
            DerivedColumn::new(
                "evadeRate",
                col("forcedMissedTackles") / col("rushCarries") * lit(100.0),
            ),
        ],
        predicates: vec![
            Predicate::all_of(vec![ge("ADP", 27.0), le("ADP", 80.0)]),
            Predicate::any_of(vec![
                vec![ge("trgt%", 12.0)],
                vec![ge("rushGrade", 80.0), le("olRank", 16.0)],
                vec![ge("rushGrade", 70.0), ge("evadeRate", 15.0), le("olRank", 10.0)],
            ]),
            Predicate::single(le("age", 27.0)),
        ],
        projection: draft_projection(),
    }
}

/// Late-round RBs worth pairing with an early anchor back.
fn hero_runningbacks() -> ClassificationRule {
    ClassificationRule {
        name: "hero-runningbacks".into(),
        derived: vec![],
        predicates: vec![
            Predicate::all_of(vec![ge("ADP", 81.0), le("ADP", 120.0)]),
            Predicate::single(le("age", 26.0)),
            Predicate::single(ge("rushGrade", 80.0)),
        ],
        projection: draft_projection(),
    }
}

/// Mid-round WRs with breakout potential: young, already commanding a big
/// target share, grading well as receivers.
fn breakout_receivers() -> ClassificationRule {
    ClassificationRule {
        name: "breakout-receivers".into(),
        derived: vec![target_share()],
        predicates: vec![
            Predicate::all_of(vec![ge("ADP", 30.0), le("ADP", 100.0)]),
            Predicate::single(ge("trgt%", 20.0)),
            Predicate::single(ge("recGrade", 75.0)),
            Predicate::single(le("age", 25.0)),
        ],
        projection: draft_projection(),
    }
}

/// QBs likely to finish as a QB1: rushing volume with downfield aggression,
/// a young passer in an elite offense, or simply early draft capital.
fn must_draft_quarterbacks() -> ClassificationRule {
    ClassificationRule {
        name: "must-draft-quarterbacks".into(),
        derived: vec![DerivedColumn::new(
            "rushPerGame",
            col("rushCarries") / col("games"),
        )],
        predicates: vec![Predicate::any_of(vec![
            vec![ge("rushPerGame", 5.0), ge("depthAim", 9.0)],
            vec![le("age", 30.0), ge("offenseGrade", 90.0)],
            vec![le("ADP", 30.0)],
        ])],
        projection: draft_projection(),
    }
}

/// Every registered archetype, in run order.
pub fn all_archetypes() -> Vec<Archetype> {
    vec![
        Archetype {
            name: "legendary-runningbacks",
            position: "rb",
            output_file: "legendary_runningbacks.csv",
            rule: legendary_runningbacks(),
        },
        Archetype {
            name: "deadzone-runningbacks",
            position: "rb",
            output_file: "deadzone_runningbacks.csv",
            rule: deadzone_runningbacks(),
        },
        Archetype {
            name: "hero-runningbacks",
            position: "rb",
            output_file: "hero_runningbacks.csv",
            rule: hero_runningbacks(),
        },
        Archetype {
            name: "breakout-receivers",
            position: "wr",
            output_file: "breakout_receivers.csv",
            rule: breakout_receivers(),
        },
        Archetype {
            name: "must-draft-quarterbacks",
            position: "qb",
            output_file: "must_draft_quarterbacks.csv",
            rule: must_draft_quarterbacks(),
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
