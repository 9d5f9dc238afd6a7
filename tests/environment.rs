// tests/environment.rs

mod common;
use crate::common::host_env;

use std::error::Error;

use proptest::prelude::*;

use coco::errors::CocoError;
use coco::exec::{build_environment, make_environment};

type TestResult = Result<(), Box<dyn Error>>;

fn additions(entries: &[&str]) -> Vec<String> {
    entries.iter().map(|s| s.to_string()).collect()
}

#[test]
fn additions_are_appended_and_expanded_against_host() -> TestResult {
    let host = host_env(&[
        ("FIRST_ENV", "THIS"),
        ("SECOND_ENV", "THAT"),
        ("A_PATH", "/tmp/path"),
    ]);
    let to_add = additions(&[
        "MORE_ENVS=MORE",
        "EXPAND=$A_PATH:/tmp/more",
        "ALSO_EXP=/tmp/some/$SECOND_ENV",
    ]);

    let env = build_environment(host, &to_add)?;

    assert_eq!(
        env,
        vec![
            "FIRST_ENV=THIS",
            "SECOND_ENV=THAT",
            "A_PATH=/tmp/path",
            "MORE_ENVS=MORE",
            "EXPAND=/tmp/path:/tmp/more",
            "ALSO_EXP=/tmp/some/THAT",
        ]
    );
    Ok(())
}

#[test]
fn expansion_does_not_see_earlier_additions() -> TestResult {
    let host = host_env(&[("HOME", "/home/me")]);
    let to_add = additions(&["NEW_VAR=fresh", "USES_NEW=[$NEW_VAR]", "BRACED=${HOME}/src"]);

    let env = build_environment(host, &to_add)?;

    assert!(env.contains(&"USES_NEW=[]".to_string()));
    assert!(env.contains(&"BRACED=/home/me/src".to_string()));
    Ok(())
}

#[test]
fn unknown_variables_expand_to_empty() -> TestResult {
    let env = build_environment(host_env(&[]), &additions(&["X=a${NOPE_NOT_SET}b$ALSO_NOPE"]))?;
    assert_eq!(env, vec!["X=ab"]);
    Ok(())
}

#[test]
fn entry_without_equals_is_rejected() {
    let result = build_environment(host_env(&[("A", "1")]), &additions(&["OK=1", "NOT VALID"]));

    match result {
        Err(CocoError::EnvironmentFormat(entry)) => assert_eq!(entry, "NOT VALID"),
        other => panic!("expected EnvironmentFormat, got {other:?}"),
    }
}

#[test]
fn entry_with_two_equals_is_rejected() {
    let result = build_environment(host_env(&[]), &additions(&["TOO=MANY=EQUALS"]));

    match result {
        Err(err @ CocoError::EnvironmentFormat(_)) => {
            assert!(err.to_string().contains("TOO=MANY=EQUALS"));
        }
        other => panic!("expected EnvironmentFormat, got {other:?}"),
    }
}

#[test]
fn make_environment_uses_the_process_environment() -> TestResult {
    let Ok(path) = std::env::var("PATH") else {
        return Ok(());
    };

    let env = make_environment(&additions(&["COPIED_PATH=$PATH"]))?;

    assert_eq!(env.last(), Some(&format!("COPIED_PATH={path}")));
    assert!(env.iter().any(|e| e.starts_with("PATH=")));
    Ok(())
}

fn key_strategy() -> impl Strategy<Value = String> {
    "[A-Z_][A-Z0-9_]{0,8}"
}

fn plain_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_/:.-]{0,12}"
}

proptest! {
    #[test]
    fn well_formed_additions_extend_the_host(
        host in proptest::collection::vec((key_strategy(), plain_value_strategy()), 0..6),
        adds in proptest::collection::vec((key_strategy(), plain_value_strategy()), 0..6),
    ) {
        let entries: Vec<String> = adds.iter().map(|(k, v)| format!("{k}={v}")).collect();

        let env = build_environment(host.clone(), &entries).unwrap();

        prop_assert_eq!(env.len(), host.len() + entries.len());
        for (i, (k, v)) in host.iter().enumerate() {
            prop_assert_eq!(&env[i], &format!("{k}={v}"));
        }
        prop_assert_eq!(&env[host.len()..], &entries[..]);
    }

    #[test]
    fn malformed_addition_is_named_in_the_error(
        key in key_strategy(),
        extra_equals in prop_oneof![Just(0usize), 2usize..4],
        prefix in proptest::collection::vec((key_strategy(), plain_value_strategy()), 0..3),
    ) {
        let bad = match extra_equals {
            0 => key.clone(),
            n => std::iter::repeat_n(key.as_str(), n + 1).collect::<Vec<_>>().join("="),
        };
        let mut entries: Vec<String> = prefix.iter().map(|(k, v)| format!("{k}={v}")).collect();
        entries.push(bad.clone());

        match build_environment(Vec::<(String, String)>::new(), &entries) {
            Err(CocoError::EnvironmentFormat(entry)) => prop_assert_eq!(entry, bad),
            other => prop_assert!(false, "expected EnvironmentFormat, got {:?}", other),
        }
    }
}
