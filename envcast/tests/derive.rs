use std::collections::HashMap;

use envcast::{DecodeEnv, EnvironmentError, as_number_union, as_string, as_string_union};

fn env<const N: usize>(vars: [(&str, &str); N]) -> HashMap<String, String> {
    vars.into_iter()
        .map(|(name, value)| (name.to_owned(), value.to_owned()))
        .collect()
}

#[derive(DecodeEnv, Debug, PartialEq)]
pub struct Settings {
    #[env(decoder = as_string().with_default("Diablo"))]
    game: String,
    #[env(from = "MOVIE", decoder = as_string_union(["Batman Begins", "Inception"]))]
    film: String,
    #[env(default = 1)]
    age: f64,
    #[env(decoder = as_number_union([1994, 2023]))]
    year: f64,
    #[env]
    is_cool: Option<bool>,
}

#[test]
fn decodes_struct_from_source() {
    let expected = Settings {
        game: "Diablo".into(),
        film: "Inception".into(),
        age: 1.0,
        year: 2023.0,
        is_cool: Some(true),
    };

    let actual = Settings::from_env()
        .finalize_from(&env([
            ("MOVIE", "Inception"),
            ("YEAR", "2023"),
            ("IS_COOL", "1"),
        ]))
        .unwrap();

    assert_eq!(expected, actual);
}

#[test]
fn decodes_struct_from_process_environment() {
    let actual = temp_env::with_vars(
        [
            ("GAME", Some("Doom")),
            ("MOVIE", Some("Batman Begins")),
            ("AGE", Some("40")),
            ("YEAR", Some("1994")),
            ("IS_COOL", None),
        ],
        || Settings::from_env().finalize(),
    )
    .unwrap();

    assert_eq!(
        actual,
        Settings {
            game: "Doom".into(),
            film: "Batman Begins".into(),
            age: 40.0,
            year: 1994.0,
            is_cool: None,
        }
    );
}

#[test]
fn reports_missing_variables_by_environment_name() {
    let expected = "Missing environment variables: \nMOVIE\nYEAR\n";
    let actual = Settings::from_env()
        .finalize_from(&env([("IS_COOL", "not a bool")]))
        .unwrap_err()
        .to_string();

    assert_eq!(expected, actual);
}

#[test]
fn reports_every_decode_error() {
    let error = Settings::from_env()
        .finalize_from(&env([
            ("MOVIE", "Heat"),
            ("AGE", "old"),
            ("YEAR", "1994"),
            ("IS_COOL", "yes"),
        ]))
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "Decoder errors: \n\
         MOVIE: allowed strings are Batman Begins, Inception, got Heat\n\
         AGE: value \"old\" cannot be cast to number\n\
         IS_COOL: value \"yes\" cannot be cast to boolean\n"
    );
    assert!(matches!(error, EnvironmentError::DecodeErrors { .. }));
}

#[test]
fn builder_overrides_env_values() {
    let actual = Settings::from_env()
        .film("Batman Begins".into())
        .year(1994.0)
        .age(2.0)
        .finalize_from(&env([("MOVIE", "Heat"), ("AGE", "old")]))
        .unwrap();

    assert_eq!(
        actual,
        Settings {
            game: "Diablo".into(),
            film: "Batman Begins".into(),
            age: 2.0,
            year: 1994.0,
            is_cool: None,
        }
    );
}

#[test]
fn requirements() {
    let expected = "\
        GAME=Diablo\n\
        MOVIE=\n\
        AGE=1\n\
        YEAR=\n\
        IS_COOL=\n\
    ";

    assert_eq!(expected, Settings::requirements());
}
