use slidershow_timeline::{compile, compile_row, CompileError, Moment, Token};

fn directives(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn cells(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|v| Some(v.to_string())).collect()
}

#[test]
fn zero_moment_with_goto() {
    let timeline = compile(&directives(&["0", "→60.5"])).unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline.events[0].moment, Moment::Text("0".into()));
    assert_eq!(timeline.events[0].tags(), vec!["goto:60.5"]);
}

#[test]
fn trailing_number_closes_moment_and_pauses() {
    let timeline = compile(&directives(&["15", "rate 2", "30"])).unwrap();
    assert_eq!(timeline.points(), r#"[15, "rate:2"],[30, "pause"]"#);
}

#[test]
fn single_trailing_number_is_only_a_pause() {
    let timeline = compile(&directives(&["42"])).unwrap();
    assert_eq!(timeline.points(), r#"[42, "pause"]"#);
}

#[test]
fn moment_followed_by_action_succeeds() {
    let timeline = compile(&directives(&["5", "M"])).unwrap();
    assert_eq!(timeline.points(), r#"[5, "mute"]"#);
}

#[test]
fn reopened_moment_without_action_is_dangling() {
    let err = compile(&directives(&["5", "10", "M"])).unwrap_err();
    assert!(matches!(
        err,
        CompileError::DanglingMoment { ref directive, .. } if directive == "10"
    ));
}

#[test]
fn combined_goto_uses_target_moment() {
    let timeline = compile(&directives(&["48→60.5"])).unwrap();
    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline.events[0].moment, Moment::Text("60.5".into()));
    assert_eq!(
        timeline.events[0].tokens,
        vec![Token::goto(Moment::Text("60.5".into()))]
    );
}

#[test]
fn combined_goto_after_open_moment_conflicts() {
    let err = compile(&directives(&["48", "48→60.5"])).unwrap_err();
    match err {
        CompileError::MomentConflict {
            moment, directive, ..
        } => {
            assert_eq!(moment, "48");
            assert_eq!(directive, "48→60.5");
        }
        other => panic!("expected MomentConflict, got {other:?}"),
    }
}

#[test]
fn combined_goto_conflicts_even_after_moment_has_actions() {
    let err = compile(&directives(&["5", "M", "48→60"])).unwrap_err();
    match err {
        CompileError::MomentConflict {
            moment, directive, ..
        } => {
            assert_eq!(moment, "5");
            assert_eq!(directive, "48→60");
        }
        other => panic!("expected MomentConflict, got {other:?}"),
    }
}

#[test]
fn rate_keyword_without_space() {
    let timeline = compile(&directives(&["10", "rate2", "20"])).unwrap();
    assert_eq!(timeline.points(), r#"[10, "rate:2"],[20, "pause"]"#);
}

#[test]
fn unknown_directive_names_the_row() {
    let err = compile(&directives(&["5", "jump"])).unwrap_err();
    assert_eq!(err.directive(), "jump");
    let message = err.to_string();
    assert!(message.contains("Unknown command jump"));
    assert!(message.contains("\"5\""));
}

#[test]
fn events_keep_row_order_when_jumping_back() {
    let timeline = compile(&directives(&["30", "→10", "20", "R2M", "40"])).unwrap();
    assert_eq!(
        timeline.points(),
        r#"[30, "goto:10"],[20, "rate:2","mute"],[40, "pause"]"#
    );
}

#[test]
fn start_time_seeks_at_zero() {
    let timeline = compile_row(Some("1:30"), &cells(&["95"])).unwrap();
    assert_eq!(timeline.points(), r#"[0, "goto:90.0"],[95, "pause"]"#);
}

#[test]
fn start_time_conflicts_with_combined_goto() {
    let err = compile_row(Some("12"), &cells(&["48→60"])).unwrap_err();
    assert!(matches!(err, CompileError::MomentConflict { .. }));
}

#[test]
fn malformed_start_is_rejected_by_grammar() {
    let err = compile_row(Some("ab:cd"), &[]).unwrap_err();
    assert!(matches!(
        err,
        CompileError::UnknownDirective { ref directive, .. } if directive == "→ab:cd"
    ));
}

#[test]
fn full_row_with_point_and_pipes() {
    let timeline = compile_row(
        None,
        &cells(&["15", "point:[161.2,204.9,5]", "F2M|30, P", "1:10"]),
    )
    .unwrap();
    assert_eq!(
        timeline.points(),
        concat!(
            r#"[15, "point:[161.2,204.9,5]","rate:1.2","mute"],"#,
            r#"[30, "rate:1","unmute"],"#,
            r#"[70.0, "pause"]"#
        )
    );
}

#[test]
fn actions_without_moment_default_to_zero() {
    let timeline = compile_row(None, &cells(&["R2, unmute"])).unwrap();
    assert_eq!(timeline.points(), r#"[0, "rate:2","unmute"]"#);
}

#[test]
fn empty_row_compiles_to_empty_timeline() {
    let timeline = compile_row(None, &[None, None]).unwrap();
    assert!(timeline.is_empty());
    assert_eq!(timeline.points(), "");
}
