//! Fields whose type has no built-in decoder use a hand-written one.

use std::collections::HashMap;

use envcast::{DecodeEnv, DecodeError, Decoder, as_string};

fn port() -> Decoder<u16> {
    Decoder::new(|input| {
        let raw = input.ok_or(DecodeError::MissingValue)?;
        raw.parse().map_err(|_| DecodeError::NotANumber {
            value: Some(raw.to_owned()),
        })
    })
}

fn comma_separated() -> Decoder<Vec<String>> {
    Decoder::new(|input| {
        let raw = input.ok_or(DecodeError::MissingValue)?;
        Ok(raw.split(',').map(ToOwned::to_owned).collect())
    })
}

#[derive(DecodeEnv, Debug, PartialEq)]
pub struct Config {
    #[env(from = "SERVER_PORT", decoder = port())]
    port: u16,
    #[env(from = "KAFKA_TOPICS", decoder = comma_separated())]
    topics: Vec<String>,
    #[env(decoder = port().optional())]
    metrics_port: Option<u16>,
    #[env(from = "API_KEY", decoder = as_string())]
    api_key: String,
}

#[test]
fn custom_decoders() {
    let source = HashMap::from([
        ("SERVER_PORT".to_owned(), "8080".to_owned()),
        ("KAFKA_TOPICS".to_owned(), "a,b,c".to_owned()),
        ("API_KEY".to_owned(), "definitely-not-an-api-key".to_owned()),
    ]);

    let expected = Config {
        port: 8080,
        topics: vec!["a".to_owned(), "b".to_owned(), "c".to_owned()],
        metrics_port: None,
        api_key: "definitely-not-an-api-key".to_owned(),
    };
    let actual = Config::from_env().finalize_from(&source).unwrap();

    assert_eq!(expected, actual);
}

#[test]
fn custom_decoder_errors_are_aggregated() {
    let source = HashMap::from([
        ("SERVER_PORT".to_owned(), "70000".to_owned()),
        ("KAFKA_TOPICS".to_owned(), "a".to_owned()),
        ("METRICS_PORT".to_owned(), "-1".to_owned()),
        ("API_KEY".to_owned(), "key".to_owned()),
    ]);

    let expected = "Decoder errors: \n\
        SERVER_PORT: value \"70000\" cannot be cast to number\n\
        METRICS_PORT: value \"-1\" cannot be cast to number\n";
    let actual = Config::from_env()
        .finalize_from(&source)
        .unwrap_err()
        .to_string();

    assert_eq!(expected, actual);
}

#[test]
fn decoders_with_a_closure_source() {
    let source = envcast::source::from_fn(|name| match name {
        "SERVER_PORT" => Some("1".to_owned()),
        "KAFKA_TOPICS" => Some("t".to_owned()),
        "API_KEY" => Some("k".to_owned()),
        _ => None,
    });

    let actual = Config::from_env().finalize_from(&source).unwrap();

    assert_eq!(actual.port, 1);
    assert_eq!(actual.topics, ["t"]);
}
