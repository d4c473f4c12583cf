use std::env;
use std::fmt::{self, Debug, Display};
use std::io;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    pub fn is_location_unavailable_error(&self) -> bool {
        self.code == 100
    }

    pub fn is_user_facing(&self) -> bool {
        self.code >= 100
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        io_error(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        parse_error(err)
    }
}

pub fn location_unavailable_error() -> Error {
    Error {
        code: 100,
        message: "location not available".into(),
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 101,
        message: "invalid input".into(),
    }
}

pub fn share_error(reason: impl Display) -> Error {
    Error {
        code: 102,
        message: reason.to_string(),
    }
}

pub fn no_route_error() -> Error {
    Error {
        code: 103,
        message: "no route found".into(),
    }
}

pub fn no_safe_place_error() -> Error {
    Error {
        code: 104,
        message: "no safe place known".into(),
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

pub fn reqwest_error(_: reqwest::Error) -> Error {
    Error {
        code: 3,
        message: "reqwest error".into(),
    }
}

pub fn upstream_error() -> Error {
    Error {
        code: 4,
        message: "upstream error".into(),
    }
}

pub fn io_error(err: io::Error) -> Error {
    Error {
        code: 6,
        message: format!("io error: {}", err),
    }
}

pub fn parse_error<T: Debug>(_: T) -> Error {
    Error {
        code: 7,
        message: "parse error".into(),
    }
}

#[test]
fn user_facing_codes() {
    assert!(location_unavailable_error().is_location_unavailable_error());
    assert!(location_unavailable_error().is_user_facing());
    assert!(share_error("AbortError").is_user_facing());
    assert!(!upstream_error().is_user_facing());
    assert_eq!(share_error("AbortError").to_string(), "AbortError");
}
